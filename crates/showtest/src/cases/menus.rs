//! Menu open and select.

use tracing::info;

use crate::{
    config,
    error::Result,
    runner::{Area, Runner},
};

/// Open the first menu, pick an item when one is addressable, and make
/// sure the menu closed again.
pub fn run(runner: &mut Runner) -> Result<()> {
    // Menus sits far down the sidebar; the reconciler scrolls it into view.
    runner.navigate_and_verify(
        "Menus",
        "nav_menus",
        config::NAV.retries,
        config::ms(config::NAV.matrix_settle_ms),
    )?;
    runner.capture_with_baseline("menu_section")?;

    runner.require_click("menu_trigger_0")?;
    runner.capture_with_baseline("menu_open")?;

    // Menu items appear only while the menu is open.
    let picked = ["menu_item_0", "menu_item_1"]
        .iter()
        .any(|id| runner.try_click_reconciled(id, Area::Main) || runner.click_element(id));
    if picked {
        runner.capture_with_baseline("menu_selected")?;
    } else {
        info!("[SKIP] no addressable menu items; closing menu");
        runner.require_click("menu_trigger_0")?;
    }
    Ok(())
}
