//! Unified storage interface
//!
//! The `QuoteStore` is the single source of truth for local state. It
//! owns the ordered quote sequence, the cached category set, and the
//! persistence handle, and it keeps all three consistent: every
//! mutation recomputes the category cache and persists before
//! returning.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = QuoteStore::open()?;
//!
//! store.append("Know thyself", "Stoic")?;
//! let quotes = store.all();
//! ```

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

use anyhow::{Context, Result};

use crate::categories::category_set;
use crate::config::Config;
use crate::models::{LastViewed, Quote};
use crate::storage::QuotePersistence;

/// Unified storage interface for quip
///
/// Holds the canonical quote sequence and keeps the persisted files and
/// the derived category cache in sync with it.
pub struct QuoteStore {
    /// Ordered quote sequence, insertion-order-significant for display
    quotes: Vec<Quote>,
    /// Cached category set, first-seen order
    categories: Vec<String>,
    /// Persistence handler
    persistence: QuotePersistence,
    /// Configuration
    config: Config,
}

impl QuoteStore {
    /// Open the store, loading the previously persisted sequence
    ///
    /// A missing or unreadable collection yields an empty store; the
    /// process always starts from some valid state.
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = QuotePersistence::new(config.clone());
        let quotes = persistence.load();
        let categories = category_set(&quotes);

        Ok(Self {
            quotes,
            categories,
            persistence,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if this is a new store (nothing stored yet)
    pub fn is_new(&self) -> bool {
        self.quotes.is_empty() && !self.persistence.exists()
    }

    // ==================== Quote Operations ====================

    /// Append a user-authored quote
    ///
    /// Input is trimmed and validated; an empty text or category aborts
    /// with a `ValidationError` and leaves the store unchanged. The new
    /// sequence is persisted before returning; a persistence failure
    /// rolls the append back.
    pub fn append(&mut self, text: &str, category: &str) -> Result<Quote> {
        let quote = Quote::new(text, category)?;

        self.quotes.push(quote.clone());
        if let Err(e) = self.commit() {
            self.quotes.pop();
            self.refresh_categories();
            return Err(e);
        }

        Ok(quote)
    }

    /// Get the current ordered sequence (read-only view)
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    /// Atomically swap the entire contents
    ///
    /// Used to apply a merge result. Persists the new sequence; a
    /// persistence failure restores the prior contents.
    pub fn replace(&mut self, sequence: Vec<Quote>) -> Result<()> {
        let previous = std::mem::replace(&mut self.quotes, sequence);
        if let Err(e) = self.commit() {
            self.quotes = previous;
            self.refresh_categories();
            return Err(e);
        }
        Ok(())
    }

    /// Append already-parsed quotes from a bulk import
    ///
    /// Entries are adopted verbatim: no validation, no merge policy
    /// (trusted bulk load). Returns how many were added.
    pub fn import(&mut self, quotes: Vec<Quote>) -> Result<usize> {
        let added = quotes.len();
        let prior_len = self.quotes.len();

        self.quotes.extend(quotes);
        if let Err(e) = self.commit() {
            self.quotes.truncate(prior_len);
            self.refresh_categories();
            return Err(e);
        }

        Ok(added)
    }

    /// Pick a random quote, optionally restricted to a category
    ///
    /// Returns `None` when no quote matches.
    pub fn random_quote(&self, category: Option<&str>) -> Option<&Quote> {
        let pool: Vec<&Quote> = match category {
            Some(name) => self.quotes.iter().filter(|q| q.category == name).collect(),
            None => self.quotes.iter().collect(),
        };

        if pool.is_empty() {
            return None;
        }
        Some(pool[random_index(pool.len())])
    }

    /// Record the last quote shown to the user
    ///
    /// Session surface for the presentation layer; never read back by
    /// the core, so failures are logged rather than surfaced.
    pub fn record_viewed(&self, quote: &Quote) {
        let record = LastViewed::now(quote.clone());
        if let Err(e) = self.persistence.save_last_viewed(&record) {
            tracing::warn!("Failed to record last-viewed quote: {}", e);
        }
    }

    // ==================== Category Operations ====================

    /// Get the distinct categories, first-seen order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Get the persisted display filter, if any
    pub fn selected_category(&self) -> Option<String> {
        self.persistence.load_selected_category()
    }

    /// Persist the display filter; `None` clears it
    pub fn select_category(&self, category: Option<&str>) -> Result<()> {
        self.persistence
            .save_selected_category(category)
            .context("Failed to save category selection")
    }

    // ==================== Stats ====================

    /// Get count of quotes
    pub fn quote_count(&self) -> usize {
        self.quotes.len()
    }

    /// Get count of distinct categories
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    // ==================== Internal ====================

    /// Recompute the category cache and persist quotes + categories
    fn commit(&mut self) -> Result<()> {
        self.refresh_categories();
        self.persistence
            .save(&self.quotes, &self.categories)
            .context("Failed to persist quote collection")
    }

    fn refresh_categories(&mut self) {
        self.categories = category_set(&self.quotes);
    }
}

/// Pick a pseudo-random index in `0..len`
///
/// `RandomState` is randomly seeded per instance, which is plenty for
/// choosing a quote to display.
fn random_index(len: usize) -> usize {
    let hasher = RandomState::new().build_hasher();
    (hasher.finish() as usize) % len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationError;
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
    fn test_open_creates_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(store.is_new());
        assert!(store.all().is_empty());
        assert!(store.categories().is_empty());
    }

    #[test]
    fn test_append_and_all() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.append("Stay hungry", "Motivation").unwrap();
        store.append("Know thyself", "Stoic").unwrap();

        assert_eq!(store.quote_count(), 2);
        assert_eq!(store.all()[0].text, "Stay hungry");
        assert_eq!(store.all()[1].text, "Know thyself");
        assert!(!store.is_new());
    }

    #[test]
    fn test_append_trims_input() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        let added = store.append("  padded  ", " Humor ").unwrap();
        assert_eq!(added.text, "padded");
        assert_eq!(added.category, "Humor");
    }

    #[test]
    fn test_append_validation_leaves_store_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.append("Existing", "X").unwrap();

        let err = store.append("", "X").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::EmptyText)
        );

        let err = store.append("Y", "   ").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::EmptyCategory)
        );

        assert_eq!(store.quote_count(), 1);
        assert_eq!(store.all()[0].text, "Existing");
    }

    #[test]
    fn test_duplicate_appends_permitted() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.append("Same", "X").unwrap();
        store.append("Same", "X").unwrap();

        assert_eq!(store.quote_count(), 2);
    }

    #[test]
    fn test_categories_follow_mutations() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.append("A", "Stoic").unwrap();
        store.append("B", "Humor").unwrap();
        store.append("C", "Stoic").unwrap();

        assert_eq!(store.categories(), &["Stoic", "Humor"]);
        assert_eq!(store.category_count(), 2);

        store.replace(vec![quote("D", "Science")]).unwrap();
        assert_eq!(store.categories(), &["Science"]);
    }

    #[test]
    fn test_replace_swaps_contents() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.append("Old", "X").unwrap();
        store
            .replace(vec![quote("New one", "Y"), quote("New two", "Z")])
            .unwrap();

        assert_eq!(store.quote_count(), 2);
        assert_eq!(store.all()[0].text, "New one");
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut store = QuoteStore::open_with_config(config.clone()).unwrap();
            store.append("Persistent", "Memory").unwrap();
        }

        {
            let store = QuoteStore::open_with_config(config).unwrap();
            assert_eq!(store.quote_count(), 1);
            assert_eq!(store.all()[0].text, "Persistent");
            // Category cache rebuilt from the loaded sequence
            assert_eq!(store.categories(), &["Memory"]);
        }
    }

    #[test]
    fn test_import_bypasses_validation() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.append("Local", "X").unwrap();

        // Import adopts entries verbatim, duplicates and all
        let imported = vec![quote("Local", "Y"), quote("Bulk", "Z")];
        let added = store.import(imported).unwrap();

        assert_eq!(added, 2);
        assert_eq!(store.quote_count(), 3);
    }

    #[test]
    fn test_random_quote_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(store.random_quote(None).is_none());
        assert!(store.random_quote(Some("X")).is_none());
    }

    #[test]
    fn test_random_quote_respects_filter() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.append("A", "Stoic").unwrap();
        store.append("B", "Humor").unwrap();

        for _ in 0..20 {
            let picked = store.random_quote(Some("Stoic")).unwrap();
            assert_eq!(picked.category, "Stoic");
        }

        // Unknown category matches nothing
        assert!(store.random_quote(Some("Nope")).is_none());
    }

    #[test]
    fn test_selected_category_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(store.selected_category().is_none());

        store.select_category(Some("Stoic")).unwrap();
        assert_eq!(store.selected_category(), Some("Stoic".to_string()));

        store.select_category(None).unwrap();
        assert!(store.selected_category().is_none());
    }

    #[test]
    fn test_record_viewed_is_best_effort() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = QuoteStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.append("Shown", "X").unwrap();
        let shown = store.all()[0].clone();

        // Must not panic or surface errors
        store.record_viewed(&shown);
        assert!(store.config().last_viewed_path().exists());
    }

    #[test]
    fn test_random_index_in_bounds() {
        for len in [1usize, 2, 7, 100] {
            for _ in 0..50 {
                assert!(random_index(len) < len);
            }
        }
    }
}
