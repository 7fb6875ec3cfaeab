use serde::Serialize;

/// A script request the modeling tool sent in a shape we cannot read.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{what} is not valid JSON: {source}")]
    MalformedJson {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{what} does not describe a schema: {source}")]
    InvalidSchema {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize mapping document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Error report handed back to the host tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub message: String,
    /// The error followed by its causes, one per line.
    pub stack: String,
}

impl Failure {
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut stack = vec![error.to_string()];
        let mut cause = error.source();
        while let Some(err) = cause {
            stack.push(format!("caused by: {err}"));
            cause = err.source();
        }

        Self {
            message: error.to_string(),
            stack: stack.join("\n"),
        }
    }
}

impl From<&RequestError> for Failure {
    fn from(error: &RequestError) -> Self {
        Failure::from_error(error)
    }
}
