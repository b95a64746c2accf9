//! Option filtering.

use erpkit_lib::model::SelectOption;

/// Indices of options whose label contains `query`, ignoring case.
///
/// Empty query returns all options. Order follows the option list.
pub fn filter_options(query: &str, options: &[SelectOption]) -> Vec<usize> {
    let needle = query.to_lowercase();
    options
        .iter()
        .enumerate()
        .filter(|(_, option)| needle.is_empty() || option.label.to_lowercase().contains(&needle))
        .map(|(index, _)| index)
        .collect()
}

/// Index of the option whose label is exactly `text` (case-sensitive).
pub fn exact_label_match(text: &str, options: &[SelectOption]) -> Option<usize> {
    options.iter().position(|option| option.label == text)
}

/// Whether any option label equals `text` ignoring case.
pub fn has_label_ignore_case(text: &str, options: &[SelectOption]) -> bool {
    let text = text.to_lowercase();
    options.iter().any(|option| option.label.to_lowercase() == text)
}
