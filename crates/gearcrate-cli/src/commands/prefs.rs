//! Preference commands: search limit and language.

use crate::app::App;
use gearcrate_core::state::Message;
use gearcrate_core::{Config, Language};

/// Show, set or reset the search result limit.
pub fn limit(config: Config, value: Option<usize>, reset: bool) -> anyhow::Result<()> {
    let mut app = App::new(config)?;

    let message = match (value, reset) {
        (_, true) => Message::ResetSearchLimit,
        (Some(value), false) => Message::SetSearchLimit(value),
        (None, false) => {
            println!("{} {}", app.tr("searchLimit"), app.prefs().search_limit);
            return Ok(());
        }
    };

    if let Some(notice) = app.dispatch(message)? {
        println!("{}", notice);
    }
    Ok(())
}

/// Show or change the UI language.
pub fn lang(config: Config, code: Option<&str>) -> anyhow::Result<()> {
    let mut app = App::new(config)?;

    let Some(code) = code else {
        let current = app.translator.language();
        for language in Language::ALL {
            let marker = if language == current { "*" } else { " " };
            println!("{} {}  {}", marker, language.code(), language.native_name());
        }
        return Ok(());
    };

    let language: Language = code.parse()?;
    app.set_language(language)?;
    println!("{} {}", app.tr("language"), language.native_name());

    if app.config.ui.language.as_deref().is_some_and(|l| l != language.code()) {
        eprintln!("Note: the configuration file overrides the language at startup");
    }
    Ok(())
}
