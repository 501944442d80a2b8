//! Help overlay widget showing keyboard shortcuts.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use super::theme::Theme;

/// Help overlay showing all keyboard shortcuts
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        HelpOverlay { theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(65, 85, area);

        frame.render_widget(Clear, popup_area);

        const DESCRIPTION: &str = "Log your daily spending, filter past records, and see where the money goes. Records are kept in a local SQLite file.";

        let shortcuts = [
            ("Panels", vec![
                ("Tab", "Cycle focus: form, filters, table"),
                ("Shift+Tab", "Cycle focus backwards"),
            ]),
            ("Add Expense / Filters", vec![
                ("↑ / ↓", "Move between fields"),
                ("← / →", "Choose a category"),
                ("Enter", "Add expense / apply filter"),
                ("Ctrl+L", "Clear the focused form"),
                ("Esc", "Jump to the table"),
            ]),
            ("Expense Records", vec![
                ("j / ↓", "Move down"),
                ("k / ↑", "Move up"),
                ("Space", "Mark row for deletion"),
                ("Esc", "Clear marks"),
                ("d / Del", "Delete marked (or current) rows"),
                ("r", "Reset filter and reload"),
                ("c", "Show charts"),
                ("e", "Export to spreadsheet"),
                ("? / h", "Toggle this help"),
                ("q", "Quit"),
            ]),
            ("Anywhere", vec![
                ("F1", "Toggle this help"),
                ("F5", "Show charts"),
                ("F6", "Export to spreadsheet"),
                ("Ctrl+Q / Ctrl+C", "Quit"),
            ]),
        ];

        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {DESCRIPTION}"),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));

        for (section, items) in shortcuts {
            lines.push(Line::from(Span::styled(
                format!("  {section} "),
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::UNDERLINED),
            )));
            lines.push(Line::from(""));

            for (key, desc) in items {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        format!("{key:<16}"),
                        Style::default().fg(self.theme.title),
                    ),
                    Span::raw(desc),
                ]));
            }
            lines.push(Line::from(""));
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" expense-tui Help ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title_style(self.theme.title_style())
                    .style(self.theme.surface_style()),
            )
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false })
            .style(self.theme.surface_style());

        frame.render_widget(paragraph, popup_area);
    }
}
