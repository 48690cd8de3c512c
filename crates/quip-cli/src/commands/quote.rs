//! Quote command handlers

use anyhow::Result;

use quip_core::QuoteStore;

use crate::output::Output;

/// Add a new quote
pub fn add(store: &mut QuoteStore, text: &str, category: &str, output: &Output) -> Result<()> {
    let added = store.append(text, category)?;
    output.success(&format!("Added quote to '{}'", added.category));
    Ok(())
}

/// Show a random quote
///
/// An explicit category overrides the saved filter; a saved filter of
/// "all" means no restriction.
pub fn show(store: &QuoteStore, category: Option<&str>, output: &Output) -> Result<()> {
    let filter = match category {
        Some(name) => Some(name.to_string()),
        None => store.selected_category().filter(|c| c != "all"),
    };

    match store.random_quote(filter.as_deref()) {
        Some(quote) => {
            output.print_quote(quote);
            store.record_viewed(quote);
        }
        None => match filter {
            Some(name) => output.message(&format!("No quotes available for '{}'.", name)),
            None => output.message("No quotes available. Add one!"),
        },
    }

    Ok(())
}

/// List quotes, optionally filtered by category
pub fn list(store: &QuoteStore, category: Option<&str>, output: &Output) -> Result<()> {
    match category {
        Some(name) => {
            let filtered: Vec<_> = store
                .all()
                .iter()
                .filter(|q| q.category == name)
                .cloned()
                .collect();
            output.print_quotes(&filtered);
        }
        None => output.print_quotes(store.all()),
    }
    Ok(())
}
