//! Inventory and categories commands.

use super::item_line;
use crate::app::App;
use crate::OutputFormat;
use gearcrate_core::inventory::{SortKey, SortOrder};
use gearcrate_core::state::Message;
use gearcrate_core::types::FAVORITES_CATEGORY;
use gearcrate_core::Config;

/// Listing options given on the command line
#[derive(Debug, Default)]
pub struct Options {
    pub sort: Option<SortKey>,
    pub order: Option<SortOrder>,
    pub category: Option<String>,
    pub favorites: bool,
    pub filter: Option<String>,
}

/// Run the inventory command.
pub fn run(config: Config, options: Options, output: OutputFormat) -> anyhow::Result<()> {
    let mut app = App::new(config)?;

    // Sort and category choices are remembered like in the interactive view
    if let Some(sort) = options.sort {
        app.dispatch(Message::SetSort(sort))?;
    }
    if let Some(order) = options.order {
        if order != app.prefs().sort_order {
            app.dispatch(Message::ToggleSortOrder)?;
        }
    }
    if let Some(category) = options.category {
        let category = (!category.eq_ignore_ascii_case("all")).then_some(category);
        app.dispatch(Message::SetCategory(category))?;
    }

    let mut query = app.prefs().inventory_query();
    query.favorites_only = options.favorites;
    if let Some(filter) = options.filter {
        query = query.matching(filter);
    }

    let items = app.api.inventory(&query)?;

    match output {
        OutputFormat::Text => {
            if items.is_empty() {
                match query.category {
                    Some(ref category) => println!(
                        "{}",
                        app.t("inventoryCategoryEmpty", &[("category", category)])
                    ),
                    None => println!("{}", app.tr("inventoryEmpty")),
                }
                return Ok(());
            }

            let times = app.tr("times");
            for item in &items {
                println!("{}", item_line(item, &times));
            }

            eprintln!();
            eprintln!(
                "{} {} {}",
                app.tr("sortBy"),
                app.tr(sort_key_label(query.sort_by)),
                match query.sort_order {
                    SortOrder::Asc => "↑",
                    SortOrder::Desc => "↓",
                }
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }

    Ok(())
}

/// Translation key of a sort column
pub fn sort_key_label(key: SortKey) -> &'static str {
    match key {
        SortKey::Name => "sortName",
        SortKey::Count => "sortCount",
        SortKey::Date => "sortDate",
    }
}

/// Run the categories command.
pub fn categories(config: Config) -> anyhow::Result<()> {
    let app = App::new(config)?;
    let selected = app.prefs().category_filter.clone();

    let marker = |name: Option<&str>| if selected.as_deref() == name { "*" } else { " " };

    println!("{} {}", marker(None), app.tr("categoryAll"));
    if app.catalog.inventory().any(|i| i.is_favorite) {
        println!(
            "{} {}",
            marker(Some(FAVORITES_CATEGORY)),
            app.tr("categoryFavorites")
        );
    }
    for category in app.api.get_categories()? {
        println!("{} {}", marker(Some(category.as_str())), category);
    }

    Ok(())
}
