//! List item interaction inside the scrollable list area.

use tracing::info;

use crate::{
    config,
    error::{Error, Result},
    runner::{Area, Runner},
};

/// Click through the first few list items in their on-screen order.
pub fn run(runner: &mut Runner) -> Result<()> {
    runner.navigate_and_verify(
        "Lists",
        "nav_lists",
        config::NAV.retries + 1,
        config::ms(config::NAV.matrix_settle_ms),
    )?;
    runner.require_element("list_scroll_area", config::ms(config::ELEMENT.required_wait_ms))?;
    runner.require_element("list_item_0", config::ms(config::ELEMENT.required_wait_ms))?;
    runner.capture_with_baseline("lists_section")?;

    let mut items = runner.resolver().ids_with_prefix("list_item_");
    if items.is_empty() {
        items = vec![
            "list_item_0".to_string(),
            "list_item_1".to_string(),
            "list_item_2".to_string(),
        ];
    }

    let cursor = runner.event_cursor();
    let mut clicked = 0;
    for id in items.iter().take(3) {
        if runner.try_click_reconciled(id, Area::Main) || runner.click_element(id) {
            clicked += 1;
        } else {
            info!("[SKIP] {} not interactable", id);
        }
    }
    if clicked == 0 {
        return Err(Error::RequiredElementMissing("list_item_0".to_string()));
    }
    if !runner.events_since_contain(cursor, "List") {
        return Err(Error::VerificationMismatch {
            key: "events".to_string(),
            expected: "List item activation event".to_string(),
            actual: None,
        });
    }
    runner.capture_with_baseline("lists_after_clicks")?;
    Ok(())
}
