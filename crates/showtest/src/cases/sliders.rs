//! Slider drags and track clicks.

use tracing::info;

use crate::{config, error::Result, runner::Runner};

/// Drag both slider thumbs and click the track, reading the published
/// values along the way.
pub fn run(runner: &mut Runner) -> Result<()> {
    runner.navigate_and_verify(
        "Sliders",
        "nav_sliders",
        config::NAV.retries,
        config::ms(config::NAV.settle_ms),
    )?;
    runner.capture_with_baseline("slider_section")?;

    // Continuous slider.
    runner.require_drag("slider_thumb_0", 150.0, 0.0)?;
    let value = runner.resolver().state_raw("slider_0_value");
    info!("slider 0 value: {}", value.as_deref().unwrap_or("N/A"));
    runner.capture_with_baseline("slider_continuous_after")?;

    // Discrete slider snaps to ticks.
    runner.require_drag("slider_thumb_1", 100.0, 0.0)?;
    let value = runner.resolver().state_raw("slider_1_value");
    info!("slider 1 value: {}", value.as_deref().unwrap_or("N/A"));
    runner.capture_with_baseline("slider_discrete_after")?;

    // Track clicks reposition the thumb too.
    runner.require_click("slider_track_0")?;
    runner.capture("slider_track_after")?;
    Ok(())
}
