//! Per-component test cases, runnable individually or as a suite.

mod checkboxes;
mod lists;
mod menus;
mod nav;
mod sliders;
mod tabs;
mod theme;

use crate::{error::Result, runner::Runner, suite::normalize_token};

/// Registry entry describing one component case.
pub struct CaseEntry {
    /// Case slug used for CLI dispatch.
    pub name: &'static str,
    /// Short description surfaced in headings.
    pub info: &'static str,
    /// Function invoked to execute the case.
    pub run: fn(&mut Runner) -> Result<()>,
}

/// All registered cases, in suite order.
pub const CASES: &[CaseEntry] = &[
    CaseEntry {
        name: "nav",
        info: "sidebar navigation highlighting",
        run: nav::run,
    },
    CaseEntry {
        name: "checkboxes",
        info: "checkbox toggling",
        run: checkboxes::run,
    },
    CaseEntry {
        name: "sliders",
        info: "slider drags and track clicks",
        run: sliders::run,
    },
    CaseEntry {
        name: "tabs",
        info: "tab selection",
        run: tabs::run,
    },
    CaseEntry {
        name: "lists",
        info: "list item interaction",
        run: lists::run,
    },
    CaseEntry {
        name: "menus",
        info: "menu open and select",
        run: menus::run,
    },
    CaseEntry {
        name: "theme",
        info: "theme mode reactivity",
        run: theme::run,
    },
];

/// Find a case by (token-normalized) slug.
pub fn case_by_slug(slug: &str) -> Option<&'static CaseEntry> {
    let tok = normalize_token(slug);
    CASES.iter().find(|c| normalize_token(c.name) == tok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_resolve_case_insensitively() {
        assert!(case_by_slug("Checkboxes").is_some());
        assert!(case_by_slug("checkboxes").is_some());
        assert!(case_by_slug("nope").is_none());
    }

    #[test]
    fn case_names_are_unique() {
        let mut names: Vec<&str> = CASES.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CASES.len());
    }
}
