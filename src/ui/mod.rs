//! Terminal User Interface components for expense-tui.

pub mod chart;
pub mod dialog;
mod help;
pub mod theme;
pub mod widgets;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub use help::HelpOverlay;
pub use theme::Theme;

/// Currency prefix used wherever an amount is shown
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format an amount with the currency prefix and two decimals
pub fn format_amount(value: f64) -> String {
    if value < 0.0 {
        format!("-{CURRENCY_SYMBOL}{:.2}", -value)
    } else {
        format!("{CURRENCY_SYMBOL}{value:.2}")
    }
}

/// Create a centered rect for popup dialogs
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
