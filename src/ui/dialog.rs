//! Modal dialogs: yes/no confirmations and the export path prompt.

use std::path::Path;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use super::theme::Theme;

fn dialog_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(theme.focused_border_style())
        .title_style(theme.title_style())
        .style(theme.surface_style())
}

/// Yes/no question before a destructive action
pub struct ConfirmDialog<'a> {
    question: String,
    theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    /// Before deleting `count` records
    pub fn delete(count: usize, theme: &'a Theme) -> Self {
        let question = if count == 1 {
            "Delete the selected record?".to_string()
        } else {
            format!("Delete {count} selected records?")
        };
        ConfirmDialog { question, theme }
    }

    /// Before an export replaces an existing file
    pub fn overwrite(path: &Path, theme: &'a Theme) -> Self {
        ConfirmDialog {
            question: format!("{} already exists. Replace it?", path.display()),
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(""),
            Line::from(self.question.as_str()),
            Line::from(""),
            Line::from(Span::styled(
                "[y] Yes   [n] No",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .block(dialog_block(" Confirm ", self.theme))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
    }
}

/// Text prompt asking where to write the export
pub struct PathPrompt<'a> {
    input: &'a str,
    theme: &'a Theme,
}

impl<'a> PathPrompt<'a> {
    pub fn new(input: &'a str, theme: &'a Theme) -> Self {
        PathPrompt { input, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 25, area);
        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(""),
            Line::from("Save spreadsheet as:"),
            Line::from(vec![
                Span::styled(self.input, self.theme.highlight_style()),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] Save   [Esc] Cancel",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .block(dialog_block(" Export to Spreadsheet ", self.theme))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup_area);
    }
}
