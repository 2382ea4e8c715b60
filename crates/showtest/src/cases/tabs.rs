//! Tab selection.

use crate::{config, error::Result, runner::Runner};

/// Walk the primary tab bar and verify the selected index tracks clicks.
pub fn run(runner: &mut Runner) -> Result<()> {
    runner.navigate_and_verify(
        "Tabs",
        "nav_tabs",
        config::NAV.retries,
        config::ms(config::NAV.settle_ms),
    )?;
    runner.capture_with_baseline("tabs_section")?;

    // The section opens on the first tab.
    runner.verify_state_raw("tab_selected", "0")?;

    runner.require_click("tab_2")?;
    runner.verify_state_raw("tab_selected", "1")?;
    runner.capture_with_baseline("tabs_tab2_selected")?;

    runner.require_click("tab_3")?;
    runner.verify_state_raw("tab_selected", "2")?;
    runner.capture_with_baseline("tabs_tab3_selected")?;
    Ok(())
}
