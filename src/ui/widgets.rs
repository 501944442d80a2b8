//! UI widgets for the expense dashboard.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::format_amount;
use super::theme::Theme;
use crate::data::{Expense, SpendingStats};
use crate::form::{ExpenseField, ExpenseForm, FilterField, FilterForm};
use crate::selection::Selection;

const LABEL_WIDTH: usize = 19;

fn panel_block<'a>(title: String, focused: bool, theme: &Theme) -> Block<'a> {
    let (border_style, title_style) = theme.panel_styles(focused);
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(if focused {
            BorderType::Double
        } else {
            BorderType::Plain
        })
        .border_style(border_style)
        .title_style(title_style)
}

/// One `label: value` line of a form. Choice fields show arrows, text fields a cursor.
fn field_line<'a>(
    label: &'a str,
    value: &'a str,
    is_choice: bool,
    active: bool,
    theme: &Theme,
) -> Line<'a> {
    let label = Span::styled(
        format!("{label:>LABEL_WIDTH$}: "),
        Style::default().add_modifier(Modifier::DIM),
    );
    let value_style = if active {
        theme.highlight_style()
    } else {
        theme.normal_style()
    };

    let mut spans = vec![label];
    if is_choice {
        let shown = if value.is_empty() { "(choose)" } else { value };
        if active {
            spans.push(Span::styled(format!("◀ {shown} ▶"), value_style));
        } else {
            spans.push(Span::styled(format!("  {shown}"), value_style));
        }
    } else {
        spans.push(Span::styled(value, value_style));
        if active {
            spans.push(Span::styled("_", value_style.add_modifier(Modifier::SLOW_BLINK)));
        }
    }
    Line::from(spans)
}

/// Today / This Month / All Time totals
pub struct StatsBar<'a> {
    stats: SpendingStats,
    theme: &'a Theme,
}

impl<'a> StatsBar<'a> {
    pub fn new(stats: SpendingStats, theme: &'a Theme) -> Self {
        StatsBar { stats, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let value_style = self.theme.title_style();
        let line = Line::from(vec![
            Span::raw("  Today: "),
            Span::styled(format_amount(self.stats.today), value_style),
            Span::raw("     This Month: "),
            Span::styled(format_amount(self.stats.month), value_style),
            Span::raw("     All Time: "),
            Span::styled(format_amount(self.stats.all_time), value_style),
        ]);

        let paragraph = Paragraph::new(line).block(
            Block::default()
                .title(" Expense Dashboard ")
                .borders(Borders::ALL)
                .border_style(self.theme.border_style())
                .title_style(self.theme.title_style()),
        );
        frame.render_widget(paragraph, area);
    }
}

/// "Add Expense" form panel
pub struct ExpenseFormPanel<'a> {
    form: &'a ExpenseForm,
    theme: &'a Theme,
}

impl<'a> ExpenseFormPanel<'a> {
    pub fn new(form: &'a ExpenseForm, theme: &'a Theme) -> Self {
        ExpenseFormPanel { form, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let lines: Vec<Line> = ExpenseField::ALL
            .iter()
            .map(|&field| {
                field_line(
                    field.label(),
                    self.form.value(field),
                    field == ExpenseField::Category,
                    focused && self.form.active == field,
                    self.theme,
                )
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(panel_block(
            " Add Expense  [Enter] Add  [Ctrl+L] Clear ".to_string(),
            focused,
            self.theme,
        ));
        frame.render_widget(paragraph, area);
    }
}

/// "Filters" panel
pub struct FilterPanel<'a> {
    form: &'a FilterForm,
    applied: bool,
    theme: &'a Theme,
}

impl<'a> FilterPanel<'a> {
    pub fn new(form: &'a FilterForm, applied: bool, theme: &'a Theme) -> Self {
        FilterPanel {
            form,
            applied,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let mut lines: Vec<Line> = FilterField::ALL
            .iter()
            .map(|&field| {
                field_line(
                    field.label(),
                    self.form.value(field),
                    field == FilterField::Category,
                    focused && self.form.active == field,
                    self.theme,
                )
            })
            .collect();

        if self.applied {
            lines.push(Line::from(Span::styled(
                format!("{:>LABEL_WIDTH$}  filter applied, [r] in table resets", ""),
                Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
            )));
        }

        let paragraph = Paragraph::new(lines).block(panel_block(
            " Filters  [Enter] Apply ".to_string(),
            focused,
            self.theme,
        ));
        frame.render_widget(paragraph, area);
    }
}

/// "Expense Records" table
pub struct ExpenseTable<'a> {
    expenses: &'a [Expense],
    selected: usize,
    selection: &'a Selection,
    theme: &'a Theme,
}

impl<'a> ExpenseTable<'a> {
    pub fn new(
        expenses: &'a [Expense],
        selected: usize,
        selection: &'a Selection,
        theme: &'a Theme,
    ) -> Self {
        ExpenseTable {
            expenses,
            selected,
            selection,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let header = Row::new(["", "ID", "Category", "Amount", "Date", "Description"])
            .style(self.theme.title_style())
            .bottom_margin(1);

        let rows: Vec<Row> = self
            .expenses
            .iter()
            .map(|e| {
                let marked = self.selection.is_marked(e.id);
                let row = Row::new(vec![
                    Cell::from(if marked { "●" } else { " " }),
                    Cell::from(e.id.to_string()),
                    Cell::from(e.category.clone()),
                    Cell::from(format_amount(e.amount)),
                    Cell::from(e.date.clone()),
                    Cell::from(e.description.clone()),
                ]);
                if marked {
                    row.style(self.theme.marked_style())
                } else {
                    row
                }
            })
            .collect();

        let widths = [
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Min(10),
        ];

        let title = if self.selection.is_empty() {
            format!(" Expense Records ({}) ", self.expenses.len())
        } else {
            format!(
                " Expense Records ({}, {} marked) ",
                self.expenses.len(),
                self.selection.len()
            )
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(panel_block(title, focused, self.theme))
            .row_highlight_style(self.theme.highlight_style())
            .highlight_symbol("> ");

        let mut state = TableState::default();
        if !self.expenses.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    message: &'a str,
    is_error: bool,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(message: &'a str, is_error: bool, theme: &'a Theme) -> Self {
        StatusBar {
            message,
            is_error,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let text = if self.is_error {
            format!("Error: {}", self.message)
        } else {
            self.message.to_string()
        };

        let line = Line::from(vec![
            Span::styled(text, self.theme.message_style(self.is_error)),
            Span::styled(
                "  |  [Tab] Panels [F1] Help [Ctrl+Q] Quit",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]);

        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::TOP));

        frame.render_widget(paragraph, area);
    }
}
