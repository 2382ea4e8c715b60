//! Section registry and run filtering.

use showtest_telemetry::BoundsResolver;

use crate::error::{Error, Result};

/// One navigable showcase section with the elements its content must expose.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    /// Section name as published in `selected_section`.
    pub name: &'static str,
    /// Sidebar nav element id.
    pub nav_id: &'static str,
    /// Element ids that must be present once the section is shown.
    pub required: &'static [&'static str],
}

/// All sections in default sidebar order.
pub const SECTIONS: &[Section] = &[
    Section { name: "Buttons", nav_id: "nav_buttons", required: &["button_0"] },
    Section { name: "Checkboxes", nav_id: "nav_checkboxes", required: &["checkbox_0"] },
    Section { name: "Switches", nav_id: "nav_switches", required: &["switch_0"] },
    Section { name: "RadioButtons", nav_id: "nav_radiobuttons", required: &["radio_0"] },
    Section { name: "Chips", nav_id: "nav_chips", required: &["chip_0"] },
    Section { name: "FAB", nav_id: "nav_fab", required: &["fab_0"] },
    Section { name: "Badges", nav_id: "nav_badges", required: &["badge_0"] },
    Section { name: "Progress", nav_id: "nav_progress", required: &["progress_linear_0"] },
    Section { name: "Cards", nav_id: "nav_cards", required: &["card_0"] },
    Section { name: "Dividers", nav_id: "nav_dividers", required: &["divider_0"] },
    Section { name: "Lists", nav_id: "nav_lists", required: &["list_scroll_area", "list_item_0"] },
    Section { name: "Icons", nav_id: "nav_icons", required: &["icon_0"] },
    Section { name: "IconButtons", nav_id: "nav_iconbuttons", required: &["icon_button_0"] },
    Section { name: "Sliders", nav_id: "nav_sliders", required: &["slider_thumb_0"] },
    Section { name: "TextFields", nav_id: "nav_textfields", required: &["text_field_0"] },
    Section { name: "Dialogs", nav_id: "nav_dialogs", required: &["dialog_open_0"] },
    Section { name: "DatePicker", nav_id: "nav_datepicker", required: &["date_picker_open_0"] },
    Section { name: "TimePicker", nav_id: "nav_timepicker", required: &["time_picker_open_0"] },
    Section { name: "Menus", nav_id: "nav_menus", required: &["menu_trigger_0"] },
    Section { name: "Tabs", nav_id: "nav_tabs", required: &["tabs_primary"] },
    Section { name: "Select", nav_id: "nav_select", required: &["select_0"] },
    Section { name: "Snackbar", nav_id: "nav_snackbar", required: &["snackbar_trigger_0"] },
    Section { name: "Tooltips", nav_id: "nav_tooltips", required: &["tooltip_demo_0"] },
    Section { name: "AppBar", nav_id: "nav_appbar", required: &["app_bar_icon_0"] },
    Section { name: "Toolbar", nav_id: "nav_toolbar", required: &["toolbar_example"] },
    Section { name: "Layouts", nav_id: "nav_layouts", required: &["layout_bottom_content", "layout_list_primary"] },
    Section { name: "LoadingIndicator", nav_id: "nav_loadingindicator", required: &["loading_indicator_default"] },
    Section { name: "Search", nav_id: "nav_search", required: &["search_bar_default"] },
    Section { name: "ThemeColors", nav_id: "nav_themecolors", required: &["theme_mode_dark", "theme_seed_purple"] },
    Section { name: "Translations", nav_id: "nav_translations", required: &["translations_language_select"] },
];

/// Normalize a user-supplied section token for matching: lowercase, spaces
/// and underscores stripped.
pub fn normalize_token(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '_')
        .collect()
}

/// Find a section by name or nav id, token-normalized.
pub fn section_by_token(token: &str) -> Option<&'static Section> {
    let tok = normalize_token(token);
    SECTIONS
        .iter()
        .find(|s| normalize_token(s.name) == tok || normalize_token(s.nav_id) == tok)
}

/// Apply `--start-from` and `--only` filters to the section list.
pub fn filter_for_run(
    start_from: Option<&str>,
    only: &[String],
) -> Result<Vec<&'static Section>> {
    let mut ordered: Vec<&'static Section> = SECTIONS.iter().collect();

    if let Some(start) = start_from {
        let tok = normalize_token(start);
        let index = ordered
            .iter()
            .position(|s| normalize_token(s.name) == tok || normalize_token(s.nav_id) == tok)
            .ok_or_else(|| Error::UnknownSection(start.to_string()))?;
        ordered.drain(..index);
    }

    if !only.is_empty() {
        let tokens: Vec<String> = only
            .iter()
            .map(|s| normalize_token(s))
            .filter(|s| !s.is_empty())
            .collect();
        ordered.retain(|s| {
            tokens.contains(&normalize_token(s.name)) || tokens.contains(&normalize_token(s.nav_id))
        });
        if ordered.is_empty() {
            return Err(Error::UnknownSection(only.join(",")));
        }
    }

    Ok(ordered)
}

/// Reorder sections to match the sidebar's current on-screen nav order.
/// Sections missing from telemetry keep their default relative order at the
/// end.
pub fn order_by_nav(
    sections: Vec<&'static Section>,
    resolver: &BoundsResolver,
) -> Vec<&'static Section> {
    let nav_order = resolver.ids_with_prefix("nav_");
    if nav_order.is_empty() {
        return sections;
    }

    let mut remaining = sections;
    let mut ordered = Vec::with_capacity(remaining.len());
    for nav_id in &nav_order {
        if let Some(pos) = remaining.iter().position(|s| s.nav_id == nav_id) {
            ordered.push(remaining.remove(pos));
        }
    }
    ordered.extend(remaining);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_normalize_names_and_ids() {
        assert_eq!(normalize_token("Theme Colors"), "themecolors");
        assert_eq!(normalize_token("nav_themecolors"), "navthemecolors");
        assert!(section_by_token("themecolors").is_some());
        assert!(section_by_token("nav_checkboxes").is_some());
        assert!(section_by_token("nonexistent").is_none());
    }

    #[test]
    fn start_from_drops_preceding_sections() {
        let run = filter_for_run(Some("Sliders"), &[]).unwrap();
        assert_eq!(run[0].name, "Sliders");
        assert!(run.len() < SECTIONS.len());
    }

    #[test]
    fn start_from_accepts_nav_ids() {
        let run = filter_for_run(Some("nav_sliders"), &[]).unwrap();
        assert_eq!(run[0].name, "Sliders");
    }

    #[test]
    fn unknown_start_section_is_an_error() {
        assert!(filter_for_run(Some("Nope"), &[]).is_err());
    }

    #[test]
    fn only_filter_keeps_matches_in_order() {
        let only = vec!["tabs".to_string(), "Checkboxes".to_string()];
        let run = filter_for_run(None, &only).unwrap();
        let names: Vec<&str> = run.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Checkboxes", "Tabs"]);
    }

    #[test]
    fn only_with_no_matches_is_an_error() {
        assert!(filter_for_run(None, &["bogus".to_string()]).is_err());
    }

    #[test]
    fn sections_have_unique_ids() {
        let mut names: Vec<&str> = SECTIONS.iter().map(|s| s.nav_id).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SECTIONS.len());
    }
}
