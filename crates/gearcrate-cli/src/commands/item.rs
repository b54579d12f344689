//! Single-item commands: show, add, count, notes, favorite, delete.

use super::{confirm, item_line};
use crate::app::App;
use crate::OutputFormat;
use gearcrate_core::{AddAction, Config, GearCrateError, NewItem};

/// A count given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountChange {
    Set(u32),
    Adjust(i64),
}

impl std::str::FromStr for CountChange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || format!("Invalid count: {}", s);
        if s.starts_with('+') || s.starts_with('-') {
            s.parse::<i64>().map(CountChange::Adjust).map_err(|_| invalid())
        } else {
            s.parse::<u32>().map(CountChange::Set).map_err(|_| invalid())
        }
    }
}

/// Show one item.
pub fn show(config: Config, name: &str, output: OutputFormat) -> anyhow::Result<()> {
    let app = App::new(config)?;

    let Some(item) = app.api.get_item(name)? else {
        eprintln!("{}", app.t("itemNotFound", &[("name", name)]));
        return Err(GearCrateError::item_not_found(name).into());
    };

    match output {
        OutputFormat::Text => {
            println!("{}", item_line(&item, &app.tr("times")));
            if let Some(ref notes) = item.notes {
                println!("  {} {}", app.tr("modalNotes"), notes);
            }
            if let Some(added) = item.added_to_inventory_at {
                println!("  {} {}", app.tr("sortDate"), added.format("%Y-%m-%d %H:%M"));
            }
            if let Some(ref url) = item.image_url {
                println!("  {}", url);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
    }

    Ok(())
}

/// Add an item or increase its count.
pub fn add(
    config: Config,
    name: &str,
    category: Option<String>,
    count: u32,
    notes: Option<String>,
    image_url: Option<String>,
) -> anyhow::Result<()> {
    let mut app = App::new(config)?;

    let mut item = NewItem::new(name).with_count(count);
    item.category = category;
    item.notes = notes;
    item.image_url = image_url;

    let outcome = match app.add_item(&item) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{}: {}", app.tr("errorAdding"), e);
            return Err(e);
        }
    };

    match outcome.action {
        AddAction::Added => println!("{}", app.t("itemAdded", &[("name", name.trim())])),
        AddAction::Updated => println!(
            "{}",
            app.t(
                "countUpdated",
                &[("name", name.trim()), ("count", &outcome.count.to_string())]
            )
        ),
    }

    Ok(())
}

/// Set or adjust the count of an item.
pub fn count(config: Config, name: &str, change: &str) -> anyhow::Result<()> {
    let change: CountChange = change.parse().map_err(anyhow::Error::msg)?;
    let mut app = App::new(config)?;

    let result = match change {
        CountChange::Set(count) => app.set_count(name, count),
        CountChange::Adjust(delta) => app.adjust_count(name, delta),
    };

    match result {
        Ok(count) => {
            println!(
                "{}",
                app.t("countUpdated", &[("name", name), ("count", &count.to_string())])
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", app.tr("errorUpdating"), e);
            Err(e)
        }
    }
}

/// Replace the notes of an item.
pub fn notes(config: Config, name: &str, text: &str) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.set_notes(name, text)?;
    println!("{}", app.t("notesSaved", &[("name", name)]));
    Ok(())
}

/// Mark or unmark a favorite.
pub fn favorite(config: Config, name: &str, is_favorite: bool) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.set_favorite(name, is_favorite)?;

    let key = if is_favorite { "favoriteItem" } else { "unfavoriteItem" };
    println!("{}: {}", app.tr(key), name);
    Ok(())
}

/// Delete an item after confirmation.
pub fn delete(config: Config, name: &str, skip_confirm: bool) -> anyhow::Result<()> {
    let mut app = App::new(config)?;

    if app.catalog.get(name).is_none() {
        eprintln!("{}", app.t("itemNotFound", &[("name", name)]));
        return Err(GearCrateError::item_not_found(name).into());
    }

    if !skip_confirm && !confirm(&app.t("modalConfirmDelete", &[("name", name)]))? {
        return Ok(());
    }

    if let Err(e) = app.delete_item(name) {
        eprintln!("{}: {}", app.tr("errorDeleting"), e);
        return Err(e);
    }
    println!("{}", app.t("itemDeleted", &[("name", name)]));
    Ok(())
}
