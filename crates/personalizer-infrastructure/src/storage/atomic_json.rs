//! Atomic JSON file operations.
//!
//! Several processes (one per execution context) may share the same state
//! file, so every read-modify-write runs under an exclusive lock and every
//! write goes through a temporary file and a rename.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use personalizer_core::PersonalizerError;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors raised by [`AtomicJsonFile`].
#[derive(Debug, Error)]
pub enum AtomicJsonError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Lock error: {0}")]
    LockError(String),
}

impl From<AtomicJsonError> for PersonalizerError {
    fn from(e: AtomicJsonError) -> Self {
        match e {
            AtomicJsonError::IoError(io) => io.into(),
            AtomicJsonError::JsonError(json) => json.into(),
            AtomicJsonError::LockError(message) => Self::backend(message),
        }
    }
}

/// How a locked update treats a file that no longer parses.
#[derive(Clone, Copy, PartialEq, Eq)]
enum OnCorrupt {
    Fail,
    Reset,
}

/// A JSON file that is only ever replaced whole.
///
/// Writes land in a hidden sibling (`.<name>.tmp`) that is synced and then
/// renamed over the target, so readers see either the old or the new
/// content. [`AtomicJsonFile::update`] holds an exclusive lock across its
/// read and write.
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. A missing or blank file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<T>, AtomicJsonError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Replaces the file with `data`.
    pub fn save(&self, data: &T) -> Result<(), AtomicJsonError> {
        ensure_parent(&self.path)?;
        let encoded = serde_json::to_vec_pretty(data)?;

        let staging = self.staging_path();
        let mut file = File::create(&staging)?;
        file.write_all(&encoded)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    /// Read-modify-write under an exclusive lock.
    ///
    /// Starts from `default_value` when the file does not exist. Nothing is
    /// written if `f` fails.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<(), AtomicJsonError>
    where
        F: FnOnce(&mut T) -> Result<(), AtomicJsonError>,
    {
        self.locked_update(default_value, OnCorrupt::Fail, f)
    }

    /// Like [`AtomicJsonFile::update`], but an unparsable file is treated as missing.
    pub fn update_or_reset<F>(&self, default_value: T, f: F) -> Result<(), AtomicJsonError>
    where
        F: FnOnce(&mut T) -> Result<(), AtomicJsonError>,
    {
        self.locked_update(default_value, OnCorrupt::Reset, f)
    }

    fn locked_update<F>(
        &self,
        default_value: T,
        on_corrupt: OnCorrupt,
        f: F,
    ) -> Result<(), AtomicJsonError>
    where
        F: FnOnce(&mut T) -> Result<(), AtomicJsonError>,
    {
        let _guard = LockGuard::acquire(&self.path)?;

        let mut data = match self.load() {
            Ok(loaded) => loaded.unwrap_or(default_value),
            Err(AtomicJsonError::JsonError(e)) if on_corrupt == OnCorrupt::Reset => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Replacing unparsable file"
                );
                default_value
            }
            Err(e) => return Err(e),
        };

        f(&mut data)?;
        self.save(&data)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_default());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn ensure_parent(path: &Path) -> Result<(), AtomicJsonError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Exclusive lock on the `.lock` sibling of a file; released on drop.
struct LockGuard {
    _file: File,
}

impl LockGuard {
    fn acquire(path: &Path) -> Result<Self, AtomicJsonError> {
        let lock_path = path.with_extension("lock");
        ensure_parent(&lock_path)?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()
            .map_err(|e| AtomicJsonError::LockError(format!("{}: {}", lock_path.display(), e)))?;

        Ok(Self { _file: file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("counter.json"));

        let counter = Counter {
            name: "test".to_string(),
            count: 42,
        };
        file.save(&counter).unwrap();

        assert_eq!(file.load().unwrap(), Some(counter));
    }

    #[test]
    fn test_load_missing_or_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        let file = AtomicJsonFile::<Counter>::new(path.clone());
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        fs::write(&path, "{ nope").unwrap();

        let file = AtomicJsonFile::<Counter>::new(path);
        assert!(matches!(file.load(), Err(AtomicJsonError::JsonError(_))));
    }

    #[test]
    fn test_update_creates_then_modifies() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("nested/counter.json"));
        let default = Counter {
            name: "default".to_string(),
            count: 0,
        };

        file.update(default.clone(), |c| {
            c.count += 10;
            Ok(())
        })
        .unwrap();
        file.update(default, |c| {
            c.count += 5;
            Ok(())
        })
        .unwrap();

        assert_eq!(file.load().unwrap().unwrap().count, 15);
    }

    #[test]
    fn test_failed_update_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Counter>::new(temp_dir.path().join("counter.json"));
        let default = Counter {
            name: "default".to_string(),
            count: 1,
        };
        file.save(&default).unwrap();

        let result = file.update(default.clone(), |c| {
            c.count = 99;
            Err(AtomicJsonError::LockError("abort".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(file.load().unwrap(), Some(default));
    }

    #[test]
    fn test_update_or_reset_overwrites_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        fs::write(&path, "{ nope").unwrap();
        let file = AtomicJsonFile::<Counter>::new(path);

        let default = Counter {
            name: "fresh".to_string(),
            count: 0,
        };
        file.update_or_reset(default, |c| {
            c.count = 3;
            Ok(())
        })
        .unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.name, "fresh");
        assert_eq!(loaded.count, 3);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        let file = AtomicJsonFile::<Counter>::new(path.clone());

        file.save(&Counter {
            name: "x".to_string(),
            count: 1,
        })
        .unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join(".counter.json.tmp").exists());
    }

    #[test]
    fn test_lock_is_exclusive_until_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        let lock_path = temp_dir.path().join("counter.lock");

        let guard = LockGuard::acquire(&path).unwrap();
        let other = OpenOptions::new().write(true).open(&lock_path).unwrap();
        assert!(other.try_lock_exclusive().is_err());

        drop(guard);
        assert!(other.try_lock_exclusive().is_ok());
        other.unlock().unwrap();
    }
}
