//! Status command handler

use anyhow::Result;

use quip_core::QuoteStore;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &QuoteStore, output: &Output) -> Result<()> {
    let config = store.config();
    let filter = store.selected_category();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "sync_enabled": config.sync_enabled,
                    "server_url": config.server_url,
                    "sync_interval_secs": config.sync_interval_secs,
                    "selected_category": filter,
                    "counts": {
                        "quotes": store.quote_count(),
                        "categories": store.category_count()
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.quote_count());
        }
        OutputFormat::Human => {
            println!("quip Status");
            println!("===========");
            println!();
            println!("Sync:");
            println!(
                "  Status:   {}",
                if config.sync_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            if let Some(ref url) = config.server_url {
                println!("  Source:   {}", url);
            }
            println!("  Interval: {}s", config.sync_interval_secs);
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!();
            println!("Contents:");
            println!("  Quotes:     {}", store.quote_count());
            println!("  Categories: {}", store.category_count());
            if let Some(name) = filter {
                println!("  Filter:     {}", name);
            }
        }
    }

    Ok(())
}
