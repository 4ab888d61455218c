//! Windows and panels drawn over the map.
//!
//! UI functions never change the application state directly. They return [`UiAction`]s that
//! the app applies after the frame is laid out.

use gismap::SelectionAction;

mod hierarchy_overview;
mod selected_data;
mod selection_button;
mod selection_window;
mod status_indicator;

pub use hierarchy_overview::hierarchy_overview;
pub use selected_data::selected_data_panel;
pub use selection_button::selection_button;
pub use selection_window::selection_window;
pub use status_indicator::{status_indicator, LayerStatus};

/// User request produced by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Change of the selection.
    Select(SelectionAction),
    /// Clear the selection and the stored document.
    ClearAll,
    /// Remove all layers from the map and add the selected ones again.
    RefreshLayers,
    /// Request the hierarchy again.
    RetryHierarchy,
    /// Show or hide the hierarchy overview window.
    SetOverviewOpen(bool),
}

impl From<SelectionAction> for UiAction {
    fn from(action: SelectionAction) -> Self {
        Self::Select(action)
    }
}

/// Formats a count with `,` as the thousands separator.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }

    formatted
}

/// Text shown next to a count, in singular or plural.
fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_counts() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(45210), "45,210");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn pluralizes() {
        assert_eq!(plural(1, "city", "cities"), "1 city");
        assert_eq!(plural(0, "city", "cities"), "0 cities");
        assert_eq!(plural(3, "layer", "layers"), "3 layers");
    }
}
