//! Persistence for the quote collection
//!
//! The durable store is a small set of JSON files in the data directory:
//!
//! - `quotes.json` - the canonical quote sequence
//! - `categories.json` - the derived category set
//! - `selected_category` - the last chosen display filter
//! - `last_viewed.json` - the last quote shown (session surface)
//!
//! Writes go through an atomic temp-file-and-rename so a crash never
//! leaves a half-written file behind.

mod error;
mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::QuotePersistence;
