//! Sidebar navigation highlighting.

use crate::{config, error::Result, runner::Runner};

/// Click through several sections and verify each selection, then return
/// to a known-good section for whatever runs next.
pub fn run(runner: &mut Runner) -> Result<()> {
    let sections = [
        ("nav_buttons", "Buttons"),
        ("nav_checkboxes", "Checkboxes"),
        ("nav_chips", "Chips"),
        ("nav_fab", "FAB"),
    ];

    for (nav_id, section) in sections {
        runner.navigate_and_verify(
            section,
            nav_id,
            config::NAV.retries,
            config::ms(config::NAV.settle_ms),
        )?;
        runner.capture_with_baseline(&format!("nav_{}", section.to_ascii_lowercase()))?;
    }

    // Leave the app in a stable section for subsequent cases.
    runner.navigate_and_verify(
        "Buttons",
        "nav_buttons",
        config::NAV.matrix_retries,
        config::ms(config::NAV.matrix_settle_ms),
    )
}
