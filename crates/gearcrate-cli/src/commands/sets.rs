//! Sets command - gear set completion overview.

use crate::app::App;
use crate::OutputFormat;
use gearcrate_core::gear_sets::{CompletionFilter, FilterCounts, SetVariant};
use gearcrate_core::state::Message;
use gearcrate_core::Config;

/// Options given on the command line
#[derive(Debug, Default)]
pub struct Options {
    pub name: Option<String>,
    pub variant: Option<String>,
    pub filter: Option<CompletionFilter>,
    pub toggle_favorite: bool,
}

/// Resolve every variant of one set, or of all sets.
pub fn load_variants(app: &App, set_name: Option<&str>) -> anyhow::Result<Vec<SetVariant>> {
    let names: Vec<String> = match set_name {
        Some(name) => vec![name.to_string()],
        None => app
            .api
            .get_all_gear_sets()?
            .into_iter()
            .map(|s| s.set_name)
            .collect(),
    };

    let mut variants = Vec::new();
    for name in names {
        for variant in app.api.get_gear_set_variants(&name)? {
            variants.push(app.api.get_gear_set_details(&name, &variant)?);
        }
    }
    Ok(variants)
}

/// Run the sets command.
pub fn run(config: Config, options: Options, output: OutputFormat) -> anyhow::Result<()> {
    let mut app = App::new(config)?;

    if let Some(filter) = options.filter {
        app.dispatch(Message::SetGearSetsFilter(filter))?;
    }

    if let Some(ref name) = options.name {
        app.dispatch(Message::SelectSet(name.clone()))?;

        if let Some(ref variant) = options.variant {
            if options.toggle_favorite {
                app.dispatch(Message::ToggleFavoriteSet {
                    set_name: name.clone(),
                    variant: variant.clone(),
                })?;
            }
            let details = app.api.get_gear_set_details(name, variant)?;
            match output {
                OutputFormat::Text => print_variant(&app, &details, true),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&details)?),
            }
            return Ok(());
        }
    }

    let variants = load_variants(&app, options.name.as_deref())?;
    let prefs = app.prefs();
    let filter = prefs.gear_sets_filter;
    let shown = filter.apply(&variants, &prefs.favorite_sets);

    match output {
        OutputFormat::Text => {
            let counts = FilterCounts::tally(&variants, &prefs.favorite_sets);
            let header: Vec<String> = CompletionFilter::ALL
                .iter()
                .map(|f| {
                    let label = format!("{} ({})", f, counts.get(*f));
                    if *f == filter {
                        format!("[{}]", label)
                    } else {
                        label
                    }
                })
                .collect();
            println!("{}", header.join("  "));
            println!();

            if variants.is_empty() {
                println!("{}", app.tr("setsNone"));
            } else if shown.is_empty() {
                println!("{}", app.tr("setsNoneForFilter"));
            }
            for variant in shown {
                print_variant(&app, variant, options.name.is_some());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
    }

    Ok(())
}

fn print_variant(app: &App, variant: &SetVariant, with_pieces: bool) {
    let star = if app.prefs().is_favorite_set(&variant.set_name, &variant.variant) {
        "★"
    } else {
        " "
    };
    println!(
        "{} {} {} {}",
        star,
        variant.set_name,
        variant.variant,
        variant.completion()
    );

    if !with_pieces {
        return;
    }
    for (slot, piece) in &variant.pieces {
        let status = match (piece.exists, piece.owned) {
            (true, true) => "✓",
            (true, false) => "✗",
            (false, _) => "-",
        };
        let name = piece.name.as_deref().unwrap_or("");
        if piece.owned {
            println!("    {:<7} {} {} ({}{})", slot.to_string(), status, name, piece.count, app.tr("times"));
        } else {
            println!("    {:<7} {} {}", slot.to_string(), status, name);
        }
    }
}
