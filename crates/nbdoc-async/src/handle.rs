//! Read and write targets for notebook I/O.
//!
//! A target is either a filesystem path or a caller-owned, already-open
//! stream. The distinction is an explicit tagged handle resolved once at
//! the entry of each operation. Path handles are opened and closed by
//! this crate within a single call; stream handles are only borrowed and
//! are never closed or re-opened.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::{Error, Result};

/// Where notebook text is read from.
pub enum ReadHandle<'a> {
    /// A filesystem path, opened (and closed) by the adapter for the
    /// duration of one call.
    Path(PathBuf),
    /// A caller-owned open stream. Drained, never closed.
    Stream(&'a mut (dyn AsyncRead + Send + Unpin)),
}

/// Where notebook text is written to.
pub enum WriteHandle<'a> {
    /// A filesystem path, created or truncated by the adapter.
    Path(PathBuf),
    /// A caller-owned open stream. Written and flushed, never closed.
    Stream(&'a mut (dyn AsyncWrite + Send + Unpin)),
}

impl std::fmt::Debug for ReadHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadHandle::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ReadHandle::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl std::fmt::Debug for WriteHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteHandle::Path(path) => f.debug_tuple("Path").field(path).finish(),
            WriteHandle::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl<'a> ReadHandle<'a> {
    /// Wrap a caller-owned open stream.
    pub fn from_reader<R: AsyncRead + Send + Unpin>(reader: &'a mut R) -> Self {
        ReadHandle::Stream(reader)
    }

    /// Interpret raw bytes as a filesystem path.
    ///
    /// Rejects byte strings that cannot name a file on this platform
    /// with [`Error::UnsupportedHandle`], before any I/O happens.
    pub fn from_path_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(ReadHandle::Path(path_from_bytes(bytes)?))
    }

    /// Drain the full text content, decoding as UTF-8.
    pub(crate) async fn drain(self) -> Result<String> {
        let mut text = String::new();
        match self {
            ReadHandle::Path(path) => {
                debug!(path = %path.display(), "reading notebook");
                let mut file = open_for_read(&path).await?;
                file.read_to_string(&mut text).await?;
            }
            ReadHandle::Stream(reader) => {
                reader.read_to_string(&mut text).await?;
            }
        }
        Ok(text)
    }
}

impl<'a> WriteHandle<'a> {
    /// Wrap a caller-owned open stream.
    pub fn from_writer<W: AsyncWrite + Send + Unpin>(writer: &'a mut W) -> Self {
        WriteHandle::Stream(writer)
    }

    /// Interpret raw bytes as a filesystem path.
    pub fn from_path_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(WriteHandle::Path(path_from_bytes(bytes)?))
    }

    /// Write fully serialized text to the target in one shot.
    ///
    /// Callers must serialize before resolving the handle; a path target
    /// is not opened until this point. The write is not atomic: a failure
    /// mid-write can leave partial bytes at a path target.
    pub(crate) async fn store(self, text: &str) -> Result<()> {
        match self {
            WriteHandle::Path(path) => {
                debug!(path = %path.display(), bytes = text.len(), "writing notebook");
                let mut file = open_for_write(&path).await?;
                file.write_all(text.as_bytes()).await?;
                file.flush().await?;
            }
            WriteHandle::Stream(writer) => {
                writer.write_all(text.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }
}

/// Open a path for text reading. The returned file is released on every
/// exit path, including cancellation, when it goes out of scope.
async fn open_for_read(path: &Path) -> Result<File> {
    File::open(path).await.map_err(|source| Error::ResourceAcquisition {
        path: path.to_path_buf(),
        source,
    })
}

/// Open a path for writing, truncating or creating it.
async fn open_for_write(path: &Path) -> Result<File> {
    File::create(path)
        .await
        .map_err(|source| Error::ResourceAcquisition {
            path: path.to_path_buf(),
            source,
        })
}

fn path_from_bytes(bytes: &[u8]) -> Result<PathBuf> {
    if bytes.is_empty() {
        return Err(Error::UnsupportedHandle("empty path".to_string()));
    }
    if bytes.contains(&0) {
        return Err(Error::UnsupportedHandle(
            "path contains a NUL byte".to_string(),
        ));
    }

    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        Ok(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
    }
    #[cfg(not(unix))]
    {
        let text = std::str::from_utf8(bytes).map_err(|_| {
            Error::UnsupportedHandle("path bytes are not valid UTF-8".to_string())
        })?;
        Ok(PathBuf::from(text))
    }
}

macro_rules! path_like {
    ($handle:ident) => {
        impl From<&str> for $handle<'_> {
            fn from(path: &str) -> Self {
                $handle::Path(PathBuf::from(path))
            }
        }

        impl From<String> for $handle<'_> {
            fn from(path: String) -> Self {
                $handle::Path(PathBuf::from(path))
            }
        }

        impl From<&Path> for $handle<'_> {
            fn from(path: &Path) -> Self {
                $handle::Path(path.to_path_buf())
            }
        }

        impl From<PathBuf> for $handle<'_> {
            fn from(path: PathBuf) -> Self {
                $handle::Path(path)
            }
        }
    };
}

path_like!(ReadHandle);
path_like!(WriteHandle);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nul_bytes_are_not_a_path() {
        let err = ReadHandle::from_path_bytes(b"note\0book.ipynb").unwrap_err();
        assert!(matches!(err, Error::UnsupportedHandle(_)));

        let err = WriteHandle::from_path_bytes(b"").unwrap_err();
        assert!(matches!(err, Error::UnsupportedHandle(_)));
    }

    #[test]
    fn plain_bytes_resolve_to_a_path() {
        let handle = ReadHandle::from_path_bytes(b"notebook.ipynb").expect("valid path bytes");
        match handle {
            ReadHandle::Path(path) => assert_eq!(path, PathBuf::from("notebook.ipynb")),
            ReadHandle::Stream(_) => panic!("expected a path handle"),
        }
    }

    #[test]
    fn handles_are_debuggable_without_exposing_the_stream() {
        let read: ReadHandle = "nb.ipynb".into();
        assert_eq!(format!("{read:?}"), "Path(\"nb.ipynb\")");

        let mut bytes: &[u8] = b"{}";
        let read = ReadHandle::from_reader(&mut bytes);
        assert_eq!(format!("{read:?}"), "Stream(..)");

        let write: WriteHandle = PathBuf::from("nb.ipynb").into();
        assert_eq!(format!("{write:?}"), "Path(\"nb.ipynb\")");

        let mut sink: Vec<u8> = Vec::new();
        let write = WriteHandle::from_writer(&mut sink);
        assert_eq!(format!("{write:?}"), "Stream(..)");
    }
}
