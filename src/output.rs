//! Persisting rendered pages.
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing a page to its destination.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for finished HTML pages.
///
/// Each call writes one complete page; there are no partial writes.
pub trait OutputSink {
    fn persist(&self, destination: &str, content: &str) -> Result<(), OutputError>;
}

/// Writes pages to files under a base directory.
///
/// Relative destinations are resolved against the base directory; absolute
/// ones are used as-is. Files are replaced atomically, so a reader never
/// sees a half-written page.
#[derive(Debug, Clone)]
pub struct FileSink {
    base_dir: PathBuf,
}

impl FileSink {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn resolve(&self, destination: &str) -> PathBuf {
        self.base_dir.join(destination)
    }
}

impl OutputSink for FileSink {
    fn persist(&self, destination: &str, content: &str) -> Result<(), OutputError> {
        let path = self.resolve(destination);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| OutputError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        write_atomic(&path, content.as_bytes())
    }
}

/// Write-to-temp-then-rename so the destination is never left partial.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), OutputError> {
    use std::time::{SystemTime, UNIX_EPOCH};

    // Unpredictable temp name so nothing else can claim it first
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

    let io_error = |path: &Path, source: std::io::Error| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| io_error(&temp_path, e))?;

    let written = file.write_all(content).and_then(|()| file.sync_all());
    drop(file);
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(io_error(&temp_path, e));
    }

    // On Windows, rename fails if destination exists, so remove it first
    #[cfg(windows)]
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(io_error(path, e));
        }
    }

    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        io_error(path, e)
    })
}
