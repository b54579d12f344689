//! Search command - token search over the item catalog.

use super::item_line;
use crate::app::App;
use crate::OutputFormat;
use gearcrate_core::{Config, SearchLimit};
use std::time::Instant;

/// Run the search command.
pub fn run(
    config: Config,
    query: &str,
    limit: Option<usize>,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let app = App::new(config)?;

    let limit = match limit {
        Some(value) => SearchLimit::new(value)?,
        None => app.prefs().search_limit,
    };

    let start = Instant::now();
    let Some(page) = app.catalog.search(query, limit) else {
        eprintln!("{}", app.tr("searchTooShort"));
        return Ok(());
    };
    let elapsed = start.elapsed();

    match output {
        OutputFormat::Text => {
            if page.is_empty() {
                println!("{}", app.tr("searchNoResults"));
                return Ok(());
            }

            let times = app.tr("times");
            for item in &page.items {
                println!("{}", item_line(item, &times));
            }

            eprintln!();
            eprintln!(
                "{} ({:.3}ms)",
                app.t(
                    "searchShowingResults",
                    &[
                        ("shown", &page.shown().to_string()),
                        ("total", &page.total.to_string()),
                    ],
                ),
                elapsed.as_secs_f64() * 1000.0
            );
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "total": page.total,
                "shown": page.shown(),
                "items": page.items,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
