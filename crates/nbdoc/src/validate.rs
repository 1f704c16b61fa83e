//! Structural validation of notebook documents.
//!
//! The validator is selected explicitly through the `schema_ref` and
//! version arguments; there is no implicit environment-driven switching.
//! Violations carry a human-readable message plus a `/`-joined structural
//! path locating the offending field (e.g. `cells/3/source`).

use serde_json::Value;

use crate::document::{json_type_name, Document};
use crate::error::{Error, Result};

/// Latest minor revision shipped for each supported major version.
const LATEST_MINOR_V4: i64 = 5;
const LATEST_MINOR_V3: i64 = 0;

/// Validate a notebook document or a schema fragment.
///
/// Exactly one of `doc` and `raw_json` must supply the value to check;
/// `raw_json` wins when both are given. `schema_ref` selects a fragment
/// (`"cell"`, `"code_cell"`, `"markdown_cell"`, `"raw_cell"`) instead of
/// the whole notebook; `version` and `version_minor` override the
/// document's declared version; `relaxed` tolerates additional
/// properties the schema does not name.
pub fn validate(
    doc: Option<&Document>,
    schema_ref: Option<&str>,
    version: Option<i64>,
    version_minor: Option<i64>,
    relaxed: bool,
    raw_json: Option<&Value>,
) -> Result<()> {
    let owned;
    let target: &Value = match (raw_json, doc) {
        (Some(value), _) => value,
        (None, Some(doc)) => {
            owned = Value::Object(doc.as_map().clone());
            &owned
        }
        (None, None) => return Err(Error::MissingField("document")),
    };

    let declared = target.get("nbformat").and_then(Value::as_i64);
    let major = version.or(declared).unwrap_or(4);
    let minor = version_minor
        .or_else(|| target.get("nbformat_minor").and_then(Value::as_i64))
        .unwrap_or(match major {
            3 => LATEST_MINOR_V3,
            _ => LATEST_MINOR_V4,
        });

    match schema_ref {
        None | Some("notebook") => match major {
            4 => validate_notebook_v4(target, minor, relaxed),
            3 => validate_notebook_v3(target, relaxed),
            other => Err(Error::UnsupportedVersion(other, minor)),
        },
        Some("cell") => validate_cell(target, minor, relaxed, "", None),
        Some(ref_name @ ("code_cell" | "markdown_cell" | "raw_cell")) => {
            let expected = ref_name.trim_end_matches("_cell");
            validate_cell(target, minor, relaxed, "", Some(expected))
        }
        Some(other) => Err(Error::UnknownSchemaRef(other.to_string())),
    }
}

fn validate_notebook_v4(value: &Value, minor: i64, relaxed: bool) -> Result<()> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::violation("notebook must be an object", ""))?;

    // Wrong-typed fields are reported before missing ones so the
    // diagnostic points at the field the caller actually wrote.
    if let Some(v) = map.get("nbformat") {
        if !v.is_i64() {
            return Err(Error::violation(
                format!("nbformat must be an integer, got {}", json_type_name(v)),
                "nbformat",
            ));
        }
    }
    if let Some(v) = map.get("nbformat_minor") {
        if !v.is_i64() {
            return Err(Error::violation(
                format!(
                    "nbformat_minor must be an integer, got {}",
                    json_type_name(v)
                ),
                "nbformat_minor",
            ));
        }
    }
    if let Some(v) = map.get("cells") {
        if !v.is_array() {
            return Err(Error::violation(
                format!("cells must be an array, got {}", json_type_name(v)),
                "cells",
            ));
        }
    }
    if let Some(v) = map.get("metadata") {
        if !v.is_object() {
            return Err(Error::violation(
                format!("metadata must be an object, got {}", json_type_name(v)),
                "metadata",
            ));
        }
    }
    for key in ["nbformat", "nbformat_minor", "cells", "metadata"] {
        if !map.contains_key(key) {
            return Err(Error::violation(format!("{key} is a required field"), key));
        }
    }

    if !relaxed {
        for key in map.keys() {
            if !matches!(
                key.as_str(),
                "nbformat" | "nbformat_minor" | "cells" | "metadata"
            ) {
                return Err(Error::violation(
                    format!("additional property {key} is not allowed"),
                    key.as_str(),
                ));
            }
        }
    }

    if let Some(cells) = map["cells"].as_array() {
        for (i, cell) in cells.iter().enumerate() {
            validate_cell(cell, minor, relaxed, &format!("cells/{i}"), None)?;
        }
    }

    Ok(())
}

fn validate_cell(
    value: &Value,
    minor: i64,
    relaxed: bool,
    path: &str,
    expected_type: Option<&str>,
) -> Result<()> {
    let at = |field: &str| -> String {
        if path.is_empty() {
            field.to_string()
        } else {
            format!("{path}/{field}")
        }
    };

    let map = value
        .as_object()
        .ok_or_else(|| Error::violation("cell must be an object", path))?;

    let cell_type = map
        .get("cell_type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::violation("cell_type must be a string", at("cell_type")))?;
    if !matches!(cell_type, "code" | "markdown" | "raw") {
        return Err(Error::violation(
            format!("unknown cell_type {cell_type:?}"),
            at("cell_type"),
        ));
    }
    if let Some(expected) = expected_type {
        if cell_type != expected {
            return Err(Error::violation(
                format!("expected a {expected} cell, got cell_type {cell_type:?}"),
                at("cell_type"),
            ));
        }
    }

    match map.get("source") {
        Some(source) if is_multiline_string(source) => {}
        Some(source) => {
            return Err(Error::violation(
                format!(
                    "source must be a string or an array of strings, got {}",
                    json_type_name(source)
                ),
                at("source"),
            ));
        }
        None => return Err(Error::violation("source is a required field", at("source"))),
    }

    match map.get("metadata") {
        Some(metadata) if metadata.is_object() => {}
        Some(metadata) => {
            return Err(Error::violation(
                format!("metadata must be an object, got {}", json_type_name(metadata)),
                at("metadata"),
            ));
        }
        None => {
            return Err(Error::violation(
                "metadata is a required field",
                at("metadata"),
            ));
        }
    }

    // Cell ids were introduced in 4.5.
    if minor >= 5 {
        match map.get("id") {
            Some(id) if id.is_string() => {}
            Some(id) => {
                return Err(Error::violation(
                    format!("id must be a string, got {}", json_type_name(id)),
                    at("id"),
                ));
            }
            None => return Err(Error::violation("id is a required field", at("id"))),
        }
    }

    if cell_type == "code" {
        match map.get("outputs") {
            Some(outputs) => {
                let outputs = outputs.as_array().ok_or_else(|| {
                    Error::violation(
                        format!("outputs must be an array, got {}", json_type_name(outputs)),
                        at("outputs"),
                    )
                })?;
                for (j, output) in outputs.iter().enumerate() {
                    validate_output(output, &at(&format!("outputs/{j}")))?;
                }
            }
            None => {
                return Err(Error::violation(
                    "outputs is a required field",
                    at("outputs"),
                ));
            }
        }
        match map.get("execution_count") {
            Some(count) if count.is_null() || count.is_i64() => {}
            Some(count) => {
                return Err(Error::violation(
                    format!(
                        "execution_count must be an integer or null, got {}",
                        json_type_name(count)
                    ),
                    at("execution_count"),
                ));
            }
            None => {
                return Err(Error::violation(
                    "execution_count is a required field",
                    at("execution_count"),
                ));
            }
        }
    }

    if !relaxed {
        for key in map.keys() {
            let known = match cell_type {
                "code" => matches!(
                    key.as_str(),
                    "cell_type" | "source" | "metadata" | "id" | "outputs" | "execution_count"
                ),
                _ => matches!(
                    key.as_str(),
                    "cell_type" | "source" | "metadata" | "id" | "attachments"
                ),
            };
            if !known {
                return Err(Error::violation(
                    format!("additional property {key} is not allowed on a {cell_type} cell"),
                    at(key),
                ));
            }
        }
    }

    Ok(())
}

fn validate_output(value: &Value, path: &str) -> Result<()> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::violation("output must be an object", path))?;
    match map.get("output_type").and_then(Value::as_str) {
        Some("execute_result" | "display_data" | "stream" | "error") => Ok(()),
        Some(other) => Err(Error::violation(
            format!("unknown output_type {other:?}"),
            format!("{path}/output_type"),
        )),
        None => Err(Error::violation(
            "output_type must be a string",
            format!("{path}/output_type"),
        )),
    }
}

fn validate_notebook_v3(value: &Value, _relaxed: bool) -> Result<()> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::violation("notebook must be an object", ""))?;

    match map.get("nbformat").and_then(Value::as_i64) {
        Some(3) => {}
        Some(other) => return Err(Error::UnsupportedVersion(other, 0)),
        None => return Err(Error::violation("nbformat is a required field", "nbformat")),
    }

    // v3 checks stay shallow: the worksheet nesting is all that
    // distinguishes it structurally at this layer.
    match map.get("worksheets") {
        Some(worksheets) => {
            let worksheets = worksheets.as_array().ok_or_else(|| {
                Error::violation(
                    format!(
                        "worksheets must be an array, got {}",
                        json_type_name(worksheets)
                    ),
                    "worksheets",
                )
            })?;
            for (i, worksheet) in worksheets.iter().enumerate() {
                if !worksheet.is_object() {
                    return Err(Error::violation(
                        "worksheet must be an object",
                        format!("worksheets/{i}"),
                    ));
                }
            }
            Ok(())
        }
        None => Err(Error::violation(
            "worksheets is a required field",
            "worksheets",
        )),
    }
}

fn is_multiline_string(value: &Value) -> bool {
    match value {
        Value::String(_) => true,
        Value::Array(lines) => lines.iter().all(Value::is_string),
        _ => false,
    }
}
