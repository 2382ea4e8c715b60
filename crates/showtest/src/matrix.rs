//! Responsive size-matrix sweep with resume support.

use std::path::PathBuf;

use tracing::info;

use crate::{
    config::{self, WindowSize},
    error::Result,
    resume::{self, Checkpoint},
    runner::Harness,
    suite,
};

/// Options for a matrix run.
#[derive(Debug, Clone)]
pub struct MatrixOptions {
    /// Client-area sizes to sweep.
    pub sizes: Vec<WindowSize>,
    /// Start each size iteration at this section.
    pub start_from: Option<String>,
    /// Restrict to these sections.
    pub only: Vec<String>,
    /// Continue from the last persisted failure.
    pub resume: bool,
    /// With resume: continue through the remaining sizes instead of only
    /// replaying the failing one.
    pub resume_all_sizes: bool,
    /// Checkpoint file location.
    pub resume_path: PathBuf,
}

/// Keep only the sizes a resume run still needs.
fn filter_sizes_for_resume(
    sizes: Vec<WindowSize>,
    failing: Option<&str>,
    resume_all_sizes: bool,
) -> Vec<WindowSize> {
    let Some(name) = failing else {
        return sizes;
    };
    let tok = suite::normalize_token(name);
    let Some(index) = sizes
        .iter()
        .position(|s| suite::normalize_token(&s.name) == tok)
    else {
        return sizes;
    };
    if resume_all_sizes {
        sizes[index..].to_vec()
    } else {
        vec![sizes[index].clone()]
    }
}

/// Run nav + smoke checks across multiple window sizes.
///
/// Fail-fast: the first hard failure persists a resume checkpoint and
/// aborts the remaining run. The app is terminated on every exit path.
pub fn run(opts: MatrixOptions) -> Result<()> {
    println!("{}", "=".repeat(60));
    println!("RESPONSIVE SIZE MATRIX");
    println!("{}", "=".repeat(60));

    let mut sizes = opts.sizes;
    let mut start_from = opts.start_from;
    if opts.resume {
        if let Some(cp) = resume::load(&opts.resume_path) {
            info!(
                "resuming from checkpoint: size={:?} section={} step={}",
                cp.size, cp.section, cp.step
            );
            if start_from.is_none() && suite::section_by_token(&cp.section).is_some() {
                start_from = Some(cp.section.clone());
            }
            sizes = filter_sizes_for_resume(sizes, cp.size.as_deref(), opts.resume_all_sizes);
        }
    }

    let mut harness = Harness::launch(None)?;

    for size in &sizes {
        println!("\n{}", "-".repeat(60));
        println!("SIZE: {} ({}x{})", size.name, size.width, size.height);
        println!("{}", "-".repeat(60));

        if let Err(e) = harness.runner.resize_client(size) {
            resume::save(
                &opts.resume_path,
                &Checkpoint::new(Some(&size.name), "resize", None, "resize", &e.to_string()),
            );
            return Err(e);
        }

        if let Err(e) = harness.runner.require_layout() {
            resume::save(
                &opts.resume_path,
                &Checkpoint::new(
                    Some(&size.name),
                    "layout_telemetry",
                    None,
                    "require_layout",
                    &e.to_string(),
                ),
            );
            return Err(e);
        }

        harness.runner.scroll_sidebar_to_top();

        let sections = suite::filter_for_run(start_from.as_deref(), &opts.only)?;
        let sections = suite::order_by_nav(sections, harness.runner.resolver());

        for section in sections {
            if let Err(e) = harness.runner.navigate_and_verify(
                section.name,
                section.nav_id,
                config::NAV.matrix_retries,
                config::ms(config::NAV.matrix_settle_ms),
            ) {
                resume::save(
                    &opts.resume_path,
                    &Checkpoint::new(
                        Some(&size.name),
                        section.name,
                        Some(section.nav_id),
                        "navigate",
                        &e.to_string(),
                    ),
                );
                return Err(e);
            }

            for rid in section.required {
                if let Err(e) = harness
                    .runner
                    .require_element(rid, config::ms(config::ELEMENT.required_wait_ms))
                {
                    resume::save(
                        &opts.resume_path,
                        &Checkpoint::new(
                            Some(&size.name),
                            section.name,
                            Some(section.nav_id),
                            "require_element",
                            &e.to_string(),
                        ),
                    );
                    return Err(e);
                }
            }
        }

        if let Err(e) = harness.runner.smoke_interactions(
            config::NAV.retries,
            config::ms(config::NAV.settle_ms),
        ) {
            resume::save(
                &opts.resume_path,
                &Checkpoint::new(
                    Some(&size.name),
                    "smoke_interactions",
                    None,
                    "smoke",
                    &e.to_string(),
                ),
            );
            return Err(e);
        }

        println!("[PASS] size matrix iteration: {}", size.name);
    }

    // The whole run succeeded; a stale checkpoint would mislead the next one.
    resume::clear(&opts.resume_path);
    harness.session.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes() -> Vec<WindowSize> {
        config::size_presets()
    }

    #[test]
    fn resume_keeps_only_the_failing_size() {
        let kept = filter_sizes_for_resume(sizes(), Some("tablet"), false);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "tablet");
    }

    #[test]
    fn resume_all_sizes_continues_from_the_failing_one() {
        let kept = filter_sizes_for_resume(sizes(), Some("tablet"), true);
        let names: Vec<&str> = kept.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["tablet", "desktop"]);
    }

    #[test]
    fn unknown_or_absent_size_keeps_everything() {
        assert_eq!(filter_sizes_for_resume(sizes(), Some("ultrawide"), false).len(), 3);
        assert_eq!(filter_sizes_for_resume(sizes(), None, false).len(), 3);
    }
}
