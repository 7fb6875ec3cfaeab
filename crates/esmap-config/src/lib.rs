#![doc = include_str!("../README.md")]

use std::path::{Path, PathBuf};

use esmap_mapping::script::{DEFAULT_HOST, DEFAULT_PORT};
use esmap_mapping::{ModelData, ScriptKind};
use serde::Deserialize;
use tracing::debug;

/// The standard configuration filename.
pub const CONFIG_FILENAME: &str = "Esmap.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Instance that `curl` scripts are addressed to when the request names none.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    pub host: String,
    pub port: u16,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// The main esmap configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EsmapConfig {
    /// Script emitted when the request does not ask for an update script.
    pub script: ScriptKind,

    pub target: TargetConfig,
}

impl EsmapConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse configuration from a string.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Find the configuration file by searching upward from the given directory.
    pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILENAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration by searching upward from the given directory.
    pub fn load_from_dir(start_dir: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        if let Some(config_path) = Self::find_config_file(start_dir) {
            debug!(path = %config_path.display(), "loading configuration");
            let config = Self::load(&config_path)?;
            Ok(Some((config_path, config)))
        } else {
            Ok(None)
        }
    }

    /// Fills the host and port the request left empty from the target.
    pub fn complete_model_data(&self, model: &ModelData) -> ModelData {
        let mut model = model.clone();
        if model.explicit_host().is_none() {
            model.host = Some(self.target.host.clone());
        }
        if model.explicit_port().is_none() {
            model.port = Some(self.target.port.into());
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let content = r#"
script = "curl"

[target]
host = "es.internal"
port = 9201
"#;

        let config = EsmapConfig::parse_str(content).unwrap();
        assert_eq!(config.script, ScriptKind::Curl);
        assert_eq!(config.target.host, "es.internal");
        assert_eq!(config.target.port, 9201);
    }

    #[test]
    fn test_empty_config() {
        let config = EsmapConfig::parse_str("").unwrap();
        assert_eq!(config.script, ScriptKind::Console);
        assert_eq!(config.target, TargetConfig::default());
        assert_eq!(config.target.port, 9200);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = EsmapConfig::parse_str("scrpit = \"curl\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_complete_model_data() {
        let config = EsmapConfig::parse_str("[target]\nhost = \"es\"\nport = 9300").unwrap();

        let completed = config.complete_model_data(&ModelData::default());
        assert_eq!(completed.host(), "es");
        assert_eq!(completed.port(), "9300");

        let explicit = ModelData {
            host: Some("other".to_string()),
            port: Some("9400".into()),
        };
        assert_eq!(config.complete_model_data(&explicit), explicit);
    }

    #[test]
    fn test_empty_port_takes_configured_target() {
        let config = EsmapConfig::parse_str("[target]\nport = 9300").unwrap();

        let empty = ModelData {
            host: Some(String::new()),
            port: Some("".into()),
        };
        let zero = ModelData {
            host: None,
            port: Some(0.into()),
        };
        for model in [empty, zero] {
            let completed = config.complete_model_data(&model);
            assert_eq!(completed.host(), "localhost");
            assert_eq!(completed.port(), "9300");
        }
    }
}
