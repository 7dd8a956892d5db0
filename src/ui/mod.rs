mod detail_panel;
mod failure_list;
mod layout;
mod notifications;
mod raw_panel;
mod report_tab;
mod results_table;
mod search_box;
mod status_bar;
mod summary_tab;
pub mod theme;

pub use layout::draw;

/// Format a duration in seconds with two decimals, `-` when absent.
pub fn format_seconds(seconds: Option<f64>) -> String {
    seconds.map_or_else(|| "-".to_string(), |s| format!("{:.2}", s))
}

/// Checkmark or cross for yes/no settings on the summary tab.
pub fn flag(enabled: bool) -> &'static str {
    if enabled { "✅" } else { "❌" }
}
