use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed notebook document: {0}")]
    MalformedDocument(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Notebook does not conform to schema: {message} (at {path})")]
    SchemaViolation { message: String, path: String },

    #[error("Unknown schema reference: {0}")]
    UnknownSchemaRef(String),

    #[error("Unsupported notebook version: {0}.{1}")]
    UnsupportedVersion(i64, i64),

    #[error("Cannot convert notebook from version {from} to version {to}")]
    UnsupportedConversion { from: i64, to: i64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a schema violation with a `/`-joined structural path
    /// (e.g. `cells/3/source`).
    pub(crate) fn violation(message: impl Into<String>, path: impl Into<String>) -> Self {
        Error::SchemaViolation {
            message: message.into(),
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
