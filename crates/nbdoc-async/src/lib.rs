//! # nbdoc-async
//!
//! Non-blocking access to notebook documents, layered over the blocking
//! [`nbdoc`] codec and validator.
//!
//! ## What it does
//!
//! - **Handles**: read or write through a filesystem path or a
//!   caller-owned open stream, resolved once as an explicit tagged handle
//! - **Worker pool**: parse, serialize, and validate run on a bounded
//!   pool of blocking slots, never on the scheduler thread
//! - **Same surface**: option-for-option and error-for-error compatible
//!   with the blocking functions in `nbdoc`
//!
//! ## Example
//!
//! ```rust,no_run
//! use nbdoc::{Document, Options, VersionSpec};
//!
//! # async fn demo() -> nbdoc_async::Result<()> {
//! let nb = Document::new(4, 5);
//! nbdoc_async::write(&nb, "notebook.ipynb", VersionSpec::NoConvert, &Options::default())
//!     .await?;
//!
//! let back = nbdoc_async::read("notebook.ipynb", VersionSpec::major(4), &Options::default())
//!     .await?;
//! assert_eq!(back.nbformat(), Some(4));
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Operations against different targets run concurrently up to the worker
//! pool bound. The adapter does no per-document locking: two concurrent
//! `write` calls against the same path can interleave and corrupt the
//! target, so ordering against a single target is the caller's job. A
//! `write` to a path is not atomic either; a failure mid-write can leave
//! partial bytes. Callers needing atomicity should write to a temporary
//! path and rename.

pub mod error;
pub mod handle;
pub mod pool;

use serde_json::Value;

use nbdoc::{Document, Options, VersionSpec};

pub use error::{Error, Result};
pub use handle::{ReadHandle, WriteHandle};
pub use pool::{PoolConfig, QueuePolicy, WorkerPool};

/// Parse notebook text into a [`Document`] on the worker pool.
pub async fn reads(
    text: impl Into<String>,
    as_version: VersionSpec,
    options: &Options,
) -> Result<Document> {
    let text = text.into();
    let options = options.clone();
    WorkerPool::shared()
        .run_result(move || nbdoc::reads(&text, as_version, &options))
        .await
}

/// Read a notebook from a path or an open stream, then parse it.
///
/// The full text is drained before parsing begins; the two steps are
/// sequential. Path handles are opened here and released on every exit
/// path, including cancellation.
pub async fn read<'a>(
    handle: impl Into<ReadHandle<'a>>,
    as_version: VersionSpec,
    options: &Options,
) -> Result<Document> {
    let text = handle.into().drain().await?;
    reads(text, as_version, options).await
}

/// Serialize a [`Document`] to notebook text on the worker pool.
pub async fn writes(doc: &Document, version: VersionSpec, options: &Options) -> Result<String> {
    let doc = doc.clone();
    let options = options.clone();
    WorkerPool::shared()
        .run_result(move || nbdoc::writes(&doc, version, &options))
        .await
}

/// Serialize a notebook and write it to a path or an open stream.
///
/// Serialization completes fully in memory before the target is touched:
/// if it fails, a path target is never opened and existing content stays
/// intact. The write itself is a single one-shot write and is not atomic.
pub async fn write<'a>(
    doc: &Document,
    handle: impl Into<WriteHandle<'a>>,
    version: VersionSpec,
    options: &Options,
) -> Result<()> {
    let text = writes(doc, version, options).await?;
    handle.into().store(&text).await
}

/// Arguments for [`validate`], forwarded verbatim to the blocking
/// validator.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    schema_ref: Option<String>,
    version: Option<i64>,
    version_minor: Option<i64>,
    relaxed: bool,
    raw_json: Option<Value>,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate against a named schema fragment (e.g. `"code_cell"`).
    pub fn with_schema_ref(mut self, schema_ref: impl Into<String>) -> Self {
        self.schema_ref = Some(schema_ref.into());
        self
    }

    /// Override the major version to validate against.
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    /// Override the minor revision to validate against.
    pub fn with_version_minor(mut self, version_minor: i64) -> Self {
        self.version_minor = Some(version_minor);
        self
    }

    /// Tolerate additional properties the schema does not name.
    pub fn with_relaxed(mut self) -> Self {
        self.relaxed = true;
        self
    }

    /// Validate a raw JSON value instead of a [`Document`].
    pub fn with_raw_json(mut self, raw_json: Value) -> Self {
        self.raw_json = Some(raw_json);
        self
    }
}

/// Validate a notebook on the worker pool.
///
/// Schema violations surface as [`nbdoc::Error::SchemaViolation`] through
/// the transparent [`Error::Document`] variant, carrying the validator's
/// diagnostic and structural path; any other validator error passes
/// through unchanged.
pub async fn validate(doc: Option<&Document>, options: &ValidateOptions) -> Result<()> {
    let doc = doc.cloned();
    let options = options.clone();
    WorkerPool::shared()
        .run_result(move || {
            nbdoc::validate(
                doc.as_ref(),
                options.schema_ref.as_deref(),
                options.version,
                options.version_minor,
                options.relaxed,
                options.raw_json.as_ref(),
            )
        })
        .await
}
