//! File helpers shared by the document-backed adapters.
//!
//! Documents are opened through a capability handle on their parent
//! directory, and blocking filesystem work runs on tokio's blocking pool.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::io;

/// A document addressed by its parent directory and file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    dir: Utf8PathBuf,
    file_name: String,
}

impl DocumentPath {
    /// Splits `path` into directory and file name.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] when `path` has no file name.
    pub fn new(path: &Utf8Path) -> io::Result<Self> {
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path '{path}' has no file name"),
            )
        })?;
        let dir = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_path_buf);
        Ok(Self {
            dir,
            file_name: file_name.to_owned(),
        })
    }

    /// Returns the full path.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Reads the document as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory or file cannot be read.
    pub fn read(&self) -> io::Result<String> {
        self.open_dir()?.read_to_string(&self.file_name)
    }

    /// Replaces the document contents via a sibling temporary file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when writing or renaming fails.
    pub fn write(&self, contents: &str) -> io::Result<()> {
        let dir = self.open_dir()?;
        let staging = format!(".{}.tmp", self.file_name);
        dir.write(&staging, contents)?;
        dir.rename(&staging, &dir, &self.file_name)
    }

    fn open_dir(&self) -> io::Result<Dir> {
        Dir::open_ambient_dir(&self.dir, ambient_authority())
    }
}

/// Returns the hex SHA-256 digest of `contents`.
#[must_use]
pub fn fingerprint(contents: &str) -> String {
    let digest = Sha256::digest(contents.as_bytes());
    digest
        .iter()
        .fold(String::with_capacity(64), |mut out, byte| {
            let _ignored = write!(out, "{byte:02x}");
            out
        })
}

/// Runs blocking filesystem work on tokio's blocking pool.
///
/// Join failures are mapped into the caller's error type.
pub async fn run_blocking_with<F, T, E, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_err)?
}
