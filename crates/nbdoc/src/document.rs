//! The in-memory notebook value and the version/options types that
//! accompany it through every operation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Which format revision a read or write should target.
///
/// The default, [`VersionSpec::NoConvert`], preserves whatever version the
/// document already declares. Requesting an explicit version only succeeds
/// within the declared major version; cross-major conversion is not
/// performed by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionSpec {
    /// Keep the document's own declared version.
    #[default]
    NoConvert,
    /// Target a major version, optionally pinning the minor revision.
    Version { major: i64, minor: Option<i64> },
}

impl VersionSpec {
    /// Target a major version, leaving the minor revision as declared.
    pub fn major(major: i64) -> Self {
        VersionSpec::Version { major, minor: None }
    }

    /// Target an exact major.minor revision.
    pub fn exact(major: i64, minor: i64) -> Self {
        VersionSpec::Version {
            major,
            minor: Some(minor),
        }
    }
}

/// Named options forwarded verbatim to parse, serialize, and validate.
///
/// The I/O layers never interpret these themselves.
#[derive(Debug, Clone, Default)]
pub struct Options {
    relaxed: bool,
    schema_ref: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tolerate additional properties the schema does not name.
    pub fn with_relaxed(mut self) -> Self {
        self.relaxed = true;
        self
    }

    /// Validate against a named schema fragment instead of the whole
    /// notebook schema (e.g. `"code_cell"`).
    pub fn with_schema_ref(mut self, schema_ref: impl Into<String>) -> Self {
        self.schema_ref = Some(schema_ref.into());
        self
    }

    pub fn relaxed(&self) -> bool {
        self.relaxed
    }

    pub fn schema_ref(&self) -> Option<&str> {
        self.schema_ref.as_deref()
    }
}

/// A notebook document: a JSON mapping with `nbformat`, `nbformat_minor`,
/// and an ordered `cells` array. Cell entries are opaque JSON values at
/// this layer; the validator is what gives them shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    map: Map<String, Value>,
}

impl Document {
    /// An empty notebook declaring the given format version.
    pub fn new(major: i64, minor: i64) -> Self {
        let mut map = Map::new();
        map.insert("nbformat".into(), Value::from(major));
        map.insert("nbformat_minor".into(), Value::from(minor));
        map.insert("cells".into(), Value::Array(Vec::new()));
        map.insert("metadata".into(), Value::Object(Map::new()));
        Document { map }
    }

    /// Wrap a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Document { map }),
            other => Err(Error::MalformedDocument(format!(
                "notebook must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.map
    }

    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.map
    }

    /// The declared major format version, if present and integral.
    pub fn nbformat(&self) -> Option<i64> {
        self.map.get("nbformat").and_then(Value::as_i64)
    }

    /// The declared minor format revision, if present and integral.
    pub fn nbformat_minor(&self) -> Option<i64> {
        self.map.get("nbformat_minor").and_then(Value::as_i64)
    }

    /// The ordered cell entries, if `cells` is present and an array.
    pub fn cells(&self) -> Option<&Vec<Value>> {
        self.map.get("cells").and_then(Value::as_array)
    }
}

/// Human name for a JSON value's type, used in diagnostics.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
