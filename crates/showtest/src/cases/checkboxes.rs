//! Checkbox toggling.

use crate::{
    config,
    error::{Error, Result},
    runner::Runner,
};

/// Toggle the first checkbox twice and require a toggle event each time.
pub fn run(runner: &mut Runner) -> Result<()> {
    runner.navigate_and_verify(
        "Checkboxes",
        "nav_checkboxes",
        config::NAV.retries,
        config::ms(config::NAV.settle_ms),
    )?;
    runner.capture_with_baseline("checkbox_initial")?;

    let cursor = runner.event_cursor();
    runner.require_click("checkbox_0")?;
    if !runner.events_since_contain(cursor, "Checkbox") {
        return Err(Error::VerificationMismatch {
            key: "events".to_string(),
            expected: "Checkbox toggle event".to_string(),
            actual: None,
        });
    }
    runner.capture_with_baseline("checkbox_toggled")?;

    // Toggle back so the section is left in its starting state.
    let cursor = runner.event_cursor();
    runner.require_click("checkbox_0")?;
    if !runner.events_since_contain(cursor, "Checkbox") {
        return Err(Error::VerificationMismatch {
            key: "events".to_string(),
            expected: "Checkbox toggle event".to_string(),
            actual: None,
        });
    }
    runner.capture_with_baseline("checkbox_untoggled")?;
    Ok(())
}
