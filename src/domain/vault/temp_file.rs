//! Scoped temporary files for plaintext documents.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// A plaintext file on local disk that is removed when dropped.
///
/// Holders get deletion on every exit path (early return, `?`, panic
/// unwinding) without a `finally` block.
#[derive(Debug)]
pub struct ScopedTempFile {
    path: TempPath,
}

impl ScopedTempFile {
    /// Writes `bytes` to a new temp file, inside `dir` when given.
    pub async fn write(bytes: Vec<u8>, dir: Option<PathBuf>, suffix: &'static str) -> io::Result<Self> {
        tokio::task::spawn_blocking(move || {
            let mut builder = tempfile::Builder::new();
            builder.prefix("tact-").suffix(suffix);
            let mut file = match dir {
                Some(dir) => builder.tempfile_in(dir)?,
                None => builder.tempfile()?,
            };
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(Self {
                path: file.into_temp_path(),
            })
        })
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file now, surfacing any removal error.
    pub fn close(self) -> io::Result<()> {
        self.path.close()
    }
}
