//! Administrative scripts that create an index from a mapping document.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::document::MappingDocument;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 9200;

/// How the mapping document is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    /// `PUT /<index>` request for a developer console.
    #[default]
    Console,
    /// `curl -XPUT` command line.
    Curl,
}

/// Connection details of the model, used by `curl` scripts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Number or numeric string, as the modeling tool stores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<Value>,
}

impl ModelData {
    /// The host the request names, if it names a non-empty one.
    pub fn explicit_host(&self) -> Option<&str> {
        self.host.as_deref().filter(|host| !host.is_empty())
    }

    /// The port the request names. Empty strings and `0` count as unset.
    pub fn explicit_port(&self) -> Option<String> {
        match &self.port {
            Some(Value::String(port)) if !port.is_empty() => Some(port.clone()),
            Some(Value::Number(port)) if port.as_f64() != Some(0.0) => Some(port.to_string()),
            _ => None,
        }
    }

    pub fn host(&self) -> &str {
        self.explicit_host().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> String {
        self.explicit_port()
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
    }
}

/// Serializes with a four-space indent.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(serde::ser::Error::custom)
}

pub fn console_script(document: &MappingDocument, index_name: &str) -> serde_json::Result<String> {
    Ok(format!(
        "PUT /{}\n{}",
        index_name.to_lowercase(),
        to_pretty_json(document)?
    ))
}

pub fn curl_script(
    document: &MappingDocument,
    model: &ModelData,
    index_name: &str,
) -> serde_json::Result<String> {
    Ok(format!(
        "curl -XPUT '{}:{}/{}?pretty' -H 'Content-Type: application/json' -d '\n{}\n'",
        model.host(),
        model.port(),
        index_name.to_lowercase(),
        to_pretty_json(document)?
    ))
}

pub fn render(
    kind: ScriptKind,
    document: &MappingDocument,
    model: &ModelData,
    index_name: &str,
) -> serde_json::Result<String> {
    match kind {
        ScriptKind::Console => console_script(document, index_name),
        ScriptKind::Curl => curl_script(document, model, index_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContainerDescriptor;
    use crate::field::{MappingField, Properties};
    use serde_json::json;

    fn document() -> MappingDocument {
        let mut properties = Properties::new();
        properties.insert("age".to_string(), MappingField::with_type("long"));
        MappingDocument::for_container(&ContainerDescriptor::default(), properties)
    }

    const BODY: &str = r#"{
    "mappings": {
        "properties": {
            "age": {
                "type": "long"
            }
        }
    }
}"#;

    #[test]
    fn test_four_space_indent() {
        assert_eq!(to_pretty_json(&document()).unwrap(), BODY);
    }

    #[test]
    fn test_console_script() {
        let script = console_script(&document(), "Shop").unwrap();
        assert_eq!(script, format!("PUT /shop\n{BODY}"));
    }

    #[test]
    fn test_curl_script_defaults() {
        let script = curl_script(&document(), &ModelData::default(), "Shop").unwrap();
        assert_eq!(
            script,
            format!(
                "curl -XPUT 'localhost:9200/shop?pretty' -H 'Content-Type: application/json' -d '\n{BODY}\n'"
            )
        );
    }

    #[test]
    fn test_curl_script_with_model_data() {
        let model: ModelData =
            serde_json::from_value(json!({ "host": "es.internal", "port": "9201" })).unwrap();
        let script = render(ScriptKind::Curl, &document(), &model, "shop").unwrap();
        assert!(script.starts_with("curl -XPUT 'es.internal:9201/shop?pretty'"));
    }

    #[test]
    fn test_empty_connection_values_are_unset() {
        let model: ModelData =
            serde_json::from_value(json!({ "host": "", "port": 0 })).unwrap();
        assert_eq!(model.explicit_host(), None);
        assert_eq!(model.explicit_port(), None);
        assert_eq!(model.port(), "9200");

        let model: ModelData = serde_json::from_value(json!({ "port": "" })).unwrap();
        assert_eq!(model.explicit_port(), None);
    }

    #[test]
    fn test_empty_object_stays_compact() {
        let document =
            MappingDocument::for_container(&ContainerDescriptor::default(), Properties::new());
        assert_eq!(
            to_pretty_json(&document).unwrap(),
            "{\n    \"mappings\": {\n        \"properties\": {}\n    }\n}"
        );
    }
}
