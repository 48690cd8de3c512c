//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use quip_core::Quote;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single quote
    pub fn print_quote(&self, quote: &Quote) {
        match self.format {
            OutputFormat::Human => {
                println!("{}: \"{}\"", quote.category, quote.text);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(quote).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", quote.text);
            }
        }
    }

    /// Print a list of quotes
    pub fn print_quotes(&self, quotes: &[Quote]) {
        match self.format {
            OutputFormat::Human => {
                if quotes.is_empty() {
                    println!("No quotes found.");
                    return;
                }
                for quote in quotes {
                    println!("{} | {}", truncate(&quote.category, 20), quote.text);
                }
                println!("\n{} quote(s)", quotes.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(quotes).unwrap());
            }
            OutputFormat::Quiet => {
                for quote in quotes {
                    println!("{}", quote.text);
                }
            }
        }
    }

    /// Print the category list
    pub fn print_categories(&self, categories: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories yet.");
                    return;
                }
                for name in categories {
                    println!("{}", name);
                }
                println!("\n{} categor{}", categories.len(), plural_y(categories.len()));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(categories).unwrap());
            }
            OutputFormat::Quiet => {
                for name in categories {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}
