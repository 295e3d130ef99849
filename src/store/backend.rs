//! Durable storage behind the scan log
//!
//! A backend stores one opaque JSON document. The store decides what goes
//! in it; the backend only has to make each save all-or-nothing.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Result, ScanError};

/// Load/save contract for the persisted scan log
pub trait LogBackend: Send + Sync {
    /// Current document, `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<String>>;

    /// Replace the document; on error the previous document stays readable
    fn save(&self, contents: &str) -> Result<()>;

    /// Remove the document
    fn clear(&self) -> Result<()>;
}

/// JSON file on disk, replaced atomically via a sibling temp file
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "scans.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_temp(&self, temp: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(temp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    }
}

impl LogBackend for FileBackend {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ScanError::storage_read(self.path.display().to_string(), e)),
        }
    }

    fn save(&self, contents: &str) -> Result<()> {
        let temp = self.temp_path();
        let written = self
            .write_temp(&temp, contents)
            .and_then(|()| fs::rename(&temp, &self.path));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp);
            return Err(ScanError::storage_write(self.path.display().to_string(), e));
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ScanError::storage_write(self.path.display().to_string(), e)),
        }
    }
}

/// In-process backend; clones share the same document
///
/// Writes can be made to fail on demand to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that starts out holding `contents`
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let backend = Self::default();
        *backend.inner.contents.lock() = Some(contents.into());
        backend
    }

    pub fn contents(&self) -> Option<String> {
        self.inner.contents.lock().clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(ScanError::storage_write(
                "memory backend",
                io::Error::new(io::ErrorKind::Other, "writes disabled"),
            ));
        }
        Ok(())
    }
}

impl LogBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn save(&self, contents: &str) -> Result<()> {
        self.check_writable()?;
        *self.inner.contents.lock() = Some(contents.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.check_writable()?;
        *self.inner.contents.lock() = None;
        Ok(())
    }
}
