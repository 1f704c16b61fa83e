//! # nbdoc
//!
//! Notebook document model, JSON text codec, and structural validator.
//!
//! A notebook is a JSON mapping carrying `nbformat` / `nbformat_minor`
//! version fields and an ordered `cells` array. This crate provides the
//! blocking surface: parse a document from text, serialize it back, read
//! and write it at filesystem paths, and validate it against the
//! structural rules of a format revision. The async adapter in
//! `nbdoc-async` layers non-blocking access over these same functions
//! with identical options and identical error kinds.
//!
//! ## Example
//!
//! ```rust
//! use nbdoc::{reads, writes, Document, Options, VersionSpec};
//!
//! let nb = Document::new(4, 5);
//! let text = writes(&nb, VersionSpec::NoConvert, &Options::default())?;
//! let back = reads(&text, VersionSpec::NoConvert, &Options::default())?;
//! assert_eq!(back.nbformat(), Some(4));
//! # Ok::<(), nbdoc::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod validate;

use std::path::Path;

use serde::Serialize as _;
use serde_json::Value;

pub use document::{Document, Options, VersionSpec};
pub use error::{Error, Result};
pub use validate::validate;

/// Parse notebook text into a [`Document`], targeting `as_version`.
///
/// Fails with the JSON parser's own error on malformed input. When an
/// explicit version is requested, the document's declared major version
/// must already match it; only the minor revision is normalized.
pub fn reads(text: &str, as_version: VersionSpec, _options: &Options) -> Result<Document> {
    let value: Value = serde_json::from_str(text)?;
    let mut doc = Document::from_value(value)?;
    apply_version(&mut doc, as_version)?;
    Ok(doc)
}

/// Serialize a [`Document`] to notebook JSON text.
///
/// The caller's document is never mutated; version application happens on
/// a clone. Output is pretty-printed with a one-space indent and a
/// trailing newline.
pub fn writes(doc: &Document, version: VersionSpec, _options: &Options) -> Result<String> {
    if !doc.as_map().contains_key("nbformat") {
        return Err(Error::MissingField("nbformat"));
    }
    if !doc.as_map().contains_key("cells") {
        return Err(Error::MissingField("cells"));
    }

    let mut doc = doc.clone();
    apply_version(&mut doc, version)?;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.into_value().serialize(&mut ser)?;
    buf.push(b'\n');

    // serde_json always emits valid UTF-8.
    Ok(String::from_utf8(buf).expect("serializer output is valid UTF-8"))
}

/// Read and parse a notebook from a filesystem path (blocking).
pub fn read(path: impl AsRef<Path>, as_version: VersionSpec, options: &Options) -> Result<Document> {
    let text = std::fs::read_to_string(path)?;
    reads(&text, as_version, options)
}

/// Serialize a notebook and write it to a filesystem path (blocking).
///
/// The text is fully serialized before the path is opened; a
/// serialization failure leaves the target untouched. The write itself is
/// not atomic.
pub fn write(
    doc: &Document,
    path: impl AsRef<Path>,
    version: VersionSpec,
    options: &Options,
) -> Result<()> {
    let text = writes(doc, version, options)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Normalize a document's declared version to the requested spec.
///
/// `NoConvert` leaves the document alone. An explicit request must match
/// the declared major version; a pinned minor revision overwrites the
/// declared one.
fn apply_version(doc: &mut Document, spec: VersionSpec) -> Result<()> {
    let VersionSpec::Version { major, minor } = spec else {
        return Ok(());
    };

    let declared = doc.nbformat().ok_or(Error::MissingField("nbformat"))?;
    if declared != major {
        return Err(Error::UnsupportedConversion {
            from: declared,
            to: major,
        });
    }
    if let Some(minor) = minor {
        doc.as_map_mut()
            .insert("nbformat_minor".into(), Value::from(minor));
    }
    Ok(())
}
