//! Data models for quip
//!
//! Defines the core data structures: Quote, the remote record shape,
//! and the last-viewed session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback category for quotes adopted from the remote source
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Error raised when a user-authored quote fails validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Quote text is empty after trimming
    #[error("Quote text must not be empty")]
    EmptyText,

    /// Category is empty after trimming
    #[error("Quote category must not be empty")]
    EmptyCategory,
}

/// A single quote entry
///
/// Identity for merge purposes is defined by `text` equality alone
/// (case-sensitive, exact). Two quotes with the same text are the same
/// logical quote regardless of category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    /// The quote text
    pub text: String,
    /// Category for filtering and display
    pub category: String,
}

impl Quote {
    /// Create a validated quote from user input
    ///
    /// Both fields are trimmed; either being empty afterwards is a
    /// `ValidationError`.
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into().trim().to_string();
        let category = category.into().trim().to_string();

        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        Ok(Self { text, category })
    }

    /// Check whether this quote shares its identity with another
    pub fn same_text(&self, other: &Quote) -> bool {
        self.text == other.text
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: \"{}\"", self.category, self.text)
    }
}

/// A record as returned by the remote source
///
/// Only `title` is required; everything else the server sends is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRecord {
    /// Title field, mapped to the quote text
    pub title: String,
}

impl From<RemoteRecord> for Quote {
    fn from(record: RemoteRecord) -> Self {
        Quote {
            text: record.title,
            category: UNCATEGORIZED.to_string(),
        }
    }
}

/// The last quote shown to the user
///
/// Written for the presentation layer's benefit whenever a quote is
/// displayed; the core never reads it back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LastViewed {
    /// The displayed quote
    pub quote: Quote,
    /// When it was displayed
    pub viewed_at: DateTime<Utc>,
}

impl LastViewed {
    /// Record a quote as viewed now
    pub fn now(quote: Quote) -> Self {
        Self {
            quote,
            viewed_at: Utc::now(),
        }
    }
}
