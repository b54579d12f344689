//! JSON file persistence.
//!
//! Used for the local item database and for UI preferences. Writes are
//! atomic: the document is written to a temporary sibling file which then
//! replaces the target, and the previous version is kept as a backup.

use crate::error::{GearCrateError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A JSON document stored at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Create a handle; nothing is read or written yet.
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn backup_path(&self) -> PathBuf {
        self.sibling(".bak")
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// Check if the document exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the document atomically.
    pub fn save<T: Serialize>(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        if self.path.exists() {
            let backup_path = self.backup_path();
            let _ = fs::remove_file(&backup_path);
            let _ = fs::rename(&self.path, &backup_path);
        }

        fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), "Saved JSON document");
        Ok(())
    }

    /// Read the document.
    pub fn load<T: DeserializeOwned>(&self) -> Result<T> {
        Self::read(&self.path)
    }

    fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let file = File::open(path)?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            GearCrateError::DataFileInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    /// Read the document, falling back to the backup if it cannot be parsed.
    ///
    /// Returns `Ok(None)` if the document does not exist. Fails with the
    /// original error when the backup is missing or invalid as well.
    pub fn load_or_backup<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if !self.exists() {
            return Ok(None);
        }

        match self.load() {
            Ok(value) => Ok(Some(value)),
            Err(e @ GearCrateError::DataFileInvalid { .. }) => {
                warn!(path = %self.path.display(), error = %e, "Failed to load document");
                match self.restore_from_backup() {
                    Ok(value) => Ok(Some(value)),
                    Err(_) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Read the backup written by the previous save.
    pub fn restore_from_backup<T: DeserializeOwned>(&self) -> Result<T> {
        let backup_path = self.backup_path();
        if !backup_path.exists() {
            return Err(GearCrateError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no backup at {}", backup_path.display()),
            )));
        }

        info!(path = %backup_path.display(), "Restoring from backup");
        Self::read(&backup_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        value: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = JsonFile::new(temp_dir.path().join("nested").join("doc.json"));

        file.save(&Doc { value: 7 }).unwrap();
        assert!(file.exists());
        assert_eq!(file.load::<Doc>().unwrap(), Doc { value: 7 });
    }

    #[test]
    fn test_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let file = JsonFile::new(temp_dir.path().join("missing.json"));
        assert_eq!(file.load_or_backup::<Doc>().unwrap(), None);
    }

    #[test]
    fn test_corrupted_file_uses_backup() {
        let temp_dir = TempDir::new().unwrap();
        let file = JsonFile::new(temp_dir.path().join("doc.json"));

        file.save(&Doc { value: 1 }).unwrap();
        file.save(&Doc { value: 2 }).unwrap();
        fs::write(file.path(), "{ not json").unwrap();

        assert!(file.load::<Doc>().is_err());
        assert_eq!(file.load_or_backup::<Doc>().unwrap(), Some(Doc { value: 1 }));
    }

    #[test]
    fn test_corrupted_file_without_backup_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file = JsonFile::new(temp_dir.path().join("doc.json"));
        fs::write(file.path(), "{ not json").unwrap();

        let err = file.load_or_backup::<Doc>().unwrap_err();
        assert!(matches!(err, GearCrateError::DataFileInvalid { .. }));
    }
}
