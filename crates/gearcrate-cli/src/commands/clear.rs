//! Clear-inventory command - set every item count to zero.

use super::confirm;
use crate::app::App;
use gearcrate_core::Config;

/// Run the clear-inventory command.
pub fn run(config: Config, skip_confirm: bool) -> anyhow::Result<()> {
    let mut app = App::new(config)?;

    if app.catalog.inventory().next().is_none() {
        println!("{}", app.tr("inventoryEmpty"));
        return Ok(());
    }

    if !skip_confirm && !confirm(&app.tr("confirmClearInventory"))? {
        println!("{}", app.tr("clearInventoryAborted"));
        return Ok(());
    }

    let affected = app.clear_inventory()?;
    println!("{}", app.tr("clearInventorySuccess"));
    eprintln!("({} items)", affected);

    Ok(())
}
