//! quip Core Library
//!
//! This crate provides the core functionality for quip, a quote
//! collection manager with periodic remote synchronization.
//!
//! # Architecture
//!
//! - **QuoteStore**: single source of truth for local state; every
//!   mutation persists and recomputes the derived category set
//! - **Merge engine**: pure, local-wins reconciliation of the store
//!   against a fetched remote snapshot
//! - **Sync task**: fetch -> merge -> persist on a fixed interval
//!
//! # Quick Start
//!
//! ```text
//! let mut store = QuoteStore::open()?;
//!
//! // Add a quote
//! store.append("Know thyself", "Stoic")?;
//!
//! // Browse
//! let quote = store.random_quote(None);
//! ```
//!
//! # Modules
//!
//! - `store`: unified storage interface (main entry point)
//! - `models`: quote and remote record data structures
//! - `categories`: derived category set
//! - `merge`: the merge engine
//! - `storage`: persistence gateway
//! - `sync`: remote fetcher and sync orchestration
//! - `config`: application configuration

pub mod categories;
pub mod config;
pub mod merge;
pub mod models;
pub mod storage;
pub mod store;
pub mod sync;

pub use config::Config;
pub use merge::merge;
pub use models::{LastViewed, Quote, RemoteRecord, ValidationError, UNCATEGORIZED};
pub use storage::{QuotePersistence, StorageError};
pub use store::QuoteStore;
pub use sync::{FetchError, RemoteFetcher};
