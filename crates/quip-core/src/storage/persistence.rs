//! Quote collection persistence
//!
//! Saves and loads the quote sequence and its derived category set as
//! JSON files in the data directory. Uses atomic writes (write to temp
//! file, then rename) to prevent corruption.
//!
//! Loading is deliberately tolerant: a missing or unparseable file is
//! treated as an empty collection, never as an error, so the process
//! always starts from some valid state.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::warn;

use crate::config::Config;
use crate::models::{LastViewed, Quote};

use super::error::{StorageError, StorageResult};

/// Persistence layer for the quote collection
///
/// Provides atomic file operations for the quote sequence, the derived
/// category set, the display filter, and the last-viewed record.
pub struct QuotePersistence {
    config: Config,
}

impl QuotePersistence {
    /// Create a new persistence handler with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if a quote collection exists on disk
    pub fn exists(&self) -> bool {
        self.config.quotes_path().exists()
    }

    /// Save the quote sequence and its category set
    ///
    /// Both files are written atomically. The quotes file is written
    /// first; a failure leaves any previously saved state in place.
    pub fn save(&self, quotes: &[Quote], categories: &[String]) -> StorageResult<()> {
        self.write_json(&self.config.quotes_path(), quotes)?;
        self.write_json(&self.config.categories_path(), categories)?;
        Ok(())
    }

    /// Load the previously saved quote sequence
    ///
    /// Returns an empty sequence if nothing was saved or the stored
    /// value fails to parse (treated as absence, not a fatal error).
    pub fn load(&self) -> Vec<Quote> {
        self.read_json_or_default(&self.config.quotes_path())
    }

    /// Load the previously saved category set
    ///
    /// Cached form of the derivable set; same tolerance as `load`.
    pub fn load_categories(&self) -> Vec<String> {
        self.read_json_or_default(&self.config.categories_path())
    }

    /// Persist the selected category filter
    ///
    /// `None` clears the selection.
    pub fn save_selected_category(&self, category: Option<&str>) -> StorageResult<()> {
        let path = self.config.selected_category_path();
        match category {
            Some(name) => atomic_write(&path, name.as_bytes()),
            None => {
                if path.exists() {
                    fs::remove_file(&path)
                        .map_err(|e| StorageError::from_io(e, path.clone()))?;
                }
                Ok(())
            }
        }
    }

    /// Load the selected category filter, if any
    pub fn load_selected_category(&self) -> Option<String> {
        let path = self.config.selected_category_path();
        let content = fs::read_to_string(path).ok()?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Record the last quote shown to the user
    ///
    /// Written for the presentation layer's benefit; the core never
    /// reads it back.
    pub fn save_last_viewed(&self, record: &LastViewed) -> StorageResult<()> {
        self.write_json(&self.config.last_viewed_path(), record)
    }

    /// Delete all stored data
    ///
    /// Use with caution!
    pub fn delete_all(&self) -> StorageResult<()> {
        let paths = [
            self.config.quotes_path(),
            self.config.categories_path(),
            self.config.selected_category_path(),
            self.config.last_viewed_path(),
        ];

        for path in paths {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| StorageError::from_io(e, path.clone()))?;
            }
        }

        Ok(())
    }

    /// Serialize a value and write it atomically
    fn write_json<T: serde::Serialize + ?Sized>(&self, path: &Path, value: &T) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        atomic_write(path, &bytes)
    }

    /// Read and parse a JSON file, defaulting on absence or corruption
    fn read_json_or_default<T: serde::de::DeserializeOwned + Default>(&self, path: &Path) -> T {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(_) => return T::default(),
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring unparseable store file {:?}: {}", path, e);
                T::default()
            }
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Create temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Atomic rename
    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path,
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            server_url: None,
            sync_enabled: false,
            sync_interval_secs: 60,
        }
    }

    fn quote(text: &str, category: &str) -> Quote {
        Quote::new(text, category).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = QuotePersistence::new(test_config(&temp_dir));

        // Initially no collection
        assert!(!persistence.exists());
        assert!(persistence.load().is_empty());

        let quotes = vec![quote("Stay hungry", "Motivation"), quote("Know thyself", "Stoic")];
        let categories = vec!["Motivation".to_string(), "Stoic".to_string()];

        persistence.save(&quotes, &categories).unwrap();
        assert!(persistence.exists());

        assert_eq!(persistence.load(), quotes);
        assert_eq!(persistence.load_categories(), categories);
    }

    #[test]
    fn test_load_missing_returns_empty() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = QuotePersistence::new(test_config(&temp_dir));

        assert!(persistence.load().is_empty());
        assert!(persistence.load_categories().is_empty());
    }

    #[test]
    fn test_load_corrupt_returns_empty() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let persistence = QuotePersistence::new(config.clone());

        fs::write(config.quotes_path(), b"{not json").unwrap();
        fs::write(config.categories_path(), b"[1, 2").unwrap();

        assert!(persistence.load().is_empty());
        assert!(persistence.load_categories().is_empty());
    }

    #[test]
    fn test_load_wrong_shape_returns_empty() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let persistence = QuotePersistence::new(config.clone());

        // Valid JSON, wrong shape
        fs::write(config.quotes_path(), br#"{"text": "lonely object"}"#).unwrap();

        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_save_overwrites_previous() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = QuotePersistence::new(test_config(&temp_dir));

        persistence
            .save(&[quote("First", "A")], &["A".to_string()])
            .unwrap();
        persistence
            .save(&[quote("Second", "B")], &["B".to_string()])
            .unwrap();

        let loaded = persistence.load();
        assert_eq!(loaded, vec![quote("Second", "B")]);
        assert_eq!(persistence.load_categories(), vec!["B".to_string()]);
    }

    #[test]
    fn test_selected_category_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = QuotePersistence::new(test_config(&temp_dir));

        assert!(persistence.load_selected_category().is_none());

        persistence.save_selected_category(Some("Stoic")).unwrap();
        assert_eq!(
            persistence.load_selected_category(),
            Some("Stoic".to_string())
        );

        persistence.save_selected_category(None).unwrap();
        assert!(persistence.load_selected_category().is_none());
    }

    #[test]
    fn test_last_viewed_written() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let persistence = QuotePersistence::new(config.clone());

        let record = LastViewed::now(quote("Stay hungry", "Motivation"));
        persistence.save_last_viewed(&record).unwrap();

        // The core never reads this back; verify the surface directly.
        let raw = fs::read_to_string(config.last_viewed_path()).unwrap();
        let parsed: LastViewed = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_delete_all() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = QuotePersistence::new(test_config(&temp_dir));

        persistence
            .save(&[quote("A", "X")], &["X".to_string()])
            .unwrap();
        persistence.save_selected_category(Some("X")).unwrap();
        assert!(persistence.exists());

        persistence.delete_all().unwrap();
        assert!(!persistence.exists());
        assert!(persistence.load_selected_category().is_none());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("file.txt");

        atomic_write(&nested_path, b"test data").unwrap();

        assert!(nested_path.exists());
        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quotes.json");

        atomic_write(&path, b"[]").unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
