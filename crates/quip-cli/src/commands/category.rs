//! Category command handlers

use anyhow::Result;

use quip_core::QuoteStore;

use crate::output::Output;

/// List the distinct categories, first-seen order
pub fn list(store: &QuoteStore, output: &Output) -> Result<()> {
    output.print_categories(store.categories());
    Ok(())
}

/// Persist the category filter used by `show`
///
/// "all" clears the filter.
pub fn select(store: &QuoteStore, category: &str, output: &Output) -> Result<()> {
    if category == "all" {
        store.select_category(None)?;
        output.success("Cleared category filter");
    } else {
        store.select_category(Some(category))?;
        output.success(&format!("Filtering on '{}'", category));
    }
    Ok(())
}
