//! Stats command - show catalog statistics.

use crate::app::App;
use crate::OutputFormat;
use gearcrate_core::types::FAVORITES_CATEGORY;
use gearcrate_core::Config;

/// Run the stats command.
pub fn run(config: Config, output: OutputFormat) -> anyhow::Result<()> {
    let app = App::new(config)?;
    let stats = app.api.get_stats()?;

    if let OutputFormat::Json = output {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let title = app.tr("statsTitle");
    println!("{}", title);
    println!("{}", "=".repeat(title.chars().count()));
    println!();

    println!("  {:<24} {}", app.tr("statsTotalInDb"), stats.total_items_in_db);
    println!("  {:<24} {}", app.tr("statsInInventory"), stats.inventory_unique_items);
    println!("  {:<24} {}", app.tr("statsTotalCount"), stats.total_item_count);
    if let Some(size) = stats.cache_size_mb {
        println!("  {:<24} {:.2} MB", app.tr("statsCacheSize"), size);
    }

    if !stats.category_counts.is_empty() {
        println!();
        println!("{}:", app.tr("statsByCategory"));
        for (category, count) in &stats.category_counts {
            let label = if category == FAVORITES_CATEGORY {
                app.tr("categoryFavorites")
            } else {
                category.clone()
            };
            println!("  {:<24} {}{}", label, count, app.tr("times"));
        }
    }

    println!();
    match app.config.api.transport {
        gearcrate_core::Transport::Local => {
            println!("Data file: {}", app.config.data_file()?.display())
        }
        gearcrate_core::Transport::Http => println!("Backend: {}", app.config.api.base_url),
    }

    Ok(())
}
