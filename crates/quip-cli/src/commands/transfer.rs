//! Export and import command handlers
//!
//! Export serializes the current collection verbatim. Import appends a
//! parsed quote array directly, bypassing the merge policy (trusted
//! bulk load).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use quip_core::{Quote, QuoteStore};

use crate::output::Output;

/// Export all quotes to a JSON file
pub fn export(store: &QuoteStore, path: &Path, output: &Output) -> Result<()> {
    let json = serde_json::to_string_pretty(store.all()).context("Failed to serialize quotes")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    output.success(&format!(
        "Exported {} quote(s) to {}",
        store.quote_count(),
        path.display()
    ));
    Ok(())
}

/// Import quotes from a JSON file
pub fn import(store: &mut QuoteStore, path: &Path, output: &Output) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let quotes: Vec<Quote> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of quotes", path.display()))?;

    let added = store.import(quotes)?;
    output.success(&format!("Imported {} quote(s)", added));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use quip_core::Config;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> QuoteStore {
        let config = Config {
            data_dir: temp_dir.path().join("data"),
            server_url: None,
            sync_enabled: false,
            sync_interval_secs: 60,
        };
        QuoteStore::open_with_config(config).unwrap()
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[test]
    fn test_export_import_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        store.append("Stay hungry", "Motivation").unwrap();
        store.append("Know thyself", "Stoic").unwrap();

        let file = temp_dir.path().join("quotes.json");
        export(&store, &file, &quiet()).unwrap();

        let temp_dir2 = TempDir::new().unwrap();
        let mut other = test_store(&temp_dir2);
        import(&mut other, &file, &quiet()).unwrap();

        assert_eq!(other.all(), store.all());
    }

    #[test]
    fn test_import_appends_without_dedup() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        store.append("Same", "X").unwrap();

        let file = temp_dir.path().join("quotes.json");
        fs::write(&file, r#"[{"text": "Same", "category": "Y"}]"#).unwrap();

        import(&mut store, &file, &quiet()).unwrap();
        // No collision policy on import
        assert_eq!(store.quote_count(), 2);
    }

    #[test]
    fn test_import_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);

        let file = temp_dir.path().join("bad.json");
        fs::write(&file, "{not an array").unwrap();

        assert!(import(&mut store, &file, &quiet()).is_err());
        assert_eq!(store.quote_count(), 0);
    }
}
