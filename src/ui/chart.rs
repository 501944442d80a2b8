//! Category summary charts: a pie of spending shares and a bar per category.

use std::f64::consts::PI;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph,
    },
    Frame,
};

use super::theme::Theme;
use super::{centered_rect, format_amount};
use crate::data::CategoryTotal;

/// Distance between sampled points when filling the pie, in unit-circle coordinates
const PIE_SAMPLE_STEP: f64 = 0.02;

/// One wedge of the pie
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub category: String,
    pub total: f64,
    /// Share of the pie in [0, 1]
    pub fraction: f64,
}

/// Compute pie wedges. Only positive totals have an area, so other
/// categories are left out of the pie (they still appear as bars).
pub fn pie_slices(totals: &[CategoryTotal]) -> Vec<PieSlice> {
    let sum: f64 = totals.iter().map(|t| t.total).filter(|t| *t > 0.0).sum();
    if sum <= 0.0 {
        return Vec::new();
    }
    totals
        .iter()
        .filter(|t| t.total > 0.0)
        .map(|t| PieSlice {
            category: t.category.clone(),
            total: t.total,
            fraction: t.total / sum,
        })
        .collect()
}

/// Which wedge covers `turn`, the clockwise angle from 12 o'clock as a fraction of a circle
fn slice_at(slices: &[PieSlice], turn: f64) -> Option<usize> {
    let mut end = 0.0;
    for (i, slice) in slices.iter().enumerate() {
        end += slice.fraction;
        if turn < end {
            return Some(i);
        }
    }
    // Rounding can leave the last sliver uncovered
    slices.len().checked_sub(1)
}

/// Fill the unit circle with sample points, grouped by the wedge they fall in
fn pie_points(slices: &[PieSlice]) -> Vec<Vec<(f64, f64)>> {
    let mut points = vec![Vec::new(); slices.len()];
    let steps = (2.0 / PIE_SAMPLE_STEP) as i64;

    for yi in 0..=steps {
        let y = -1.0 + yi as f64 * PIE_SAMPLE_STEP;
        for xi in 0..=steps {
            let x = -1.0 + xi as f64 * PIE_SAMPLE_STEP;
            if x * x + y * y > 1.0 {
                continue;
            }
            let mut turn = x.atan2(y) / (2.0 * PI);
            if turn < 0.0 {
                turn += 1.0;
            }
            if let Some(idx) = slice_at(slices, turn) {
                points[idx].push((x, y));
            }
        }
    }
    points
}

/// Overlay showing the category summary as a pie chart and a bar chart
pub struct SummaryCharts<'a> {
    totals: &'a [CategoryTotal],
    theme: &'a Theme,
}

impl<'a> SummaryCharts<'a> {
    pub fn new(totals: &'a [CategoryTotal], theme: &'a Theme) -> Self {
        SummaryCharts { totals, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(90, 85, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Spending Summary  [Esc] Close ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style())
            .style(self.theme.surface_style());
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        if self.totals.is_empty() {
            render_message(frame, inner, "No expenses to chart.");
            return;
        }

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        self.render_pie(frame, halves[0]);
        self.render_bars(frame, halves[1]);
    }

    fn render_pie(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" By Category ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let slices = pie_slices(self.totals);
        if slices.is_empty() {
            render_message(frame, inner, "No positive totals to chart.");
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),                      // Pie
                Constraint::Length(slices.len() as u16), // Legend
            ])
            .split(inner);

        // Terminal cells are about twice as tall as wide; widen the x range to keep the pie round
        let canvas_area = chunks[0];
        let half_width = if canvas_area.height == 0 {
            1.0
        } else {
            (f64::from(canvas_area.width) / (2.0 * f64::from(canvas_area.height))).max(1.0)
        };
        let points = pie_points(&slices);

        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-half_width, half_width])
            .y_bounds([-1.0, 1.0])
            .paint(|ctx| {
                for (i, coords) in points.iter().enumerate() {
                    ctx.draw(&Points {
                        coords: coords.as_slice(),
                        color: self.theme.chart_color(i),
                    });
                }
            });
        frame.render_widget(canvas, canvas_area);

        let legend: Vec<Line> = slices
            .iter()
            .enumerate()
            .map(|(i, slice)| {
                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(self.theme.chart_color(i))),
                    Span::styled(
                        format!("{} {:.1}%", slice.category, slice.fraction * 100.0),
                        self.theme.normal_style(),
                    ),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(legend), chunks[1]);
    }

    fn render_bars(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Spending per Category ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style());

        let bars: Vec<Bar> = self
            .totals
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let color = self.theme.chart_color(i);
                Bar::default()
                    .value(bar_height(t.total))
                    .text_value(format!("{:.2}", t.total))
                    .label(Line::from(t.category.clone()))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(color).add_modifier(Modifier::REVERSED))
            })
            .collect();

        let inner_width = block.inner(area).width;
        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width(inner_width, bars.len()))
            .bar_gap(1);

        frame.render_widget(chart, area);
    }
}

/// Bars are drawn in hundredths; negative totals have no height
fn bar_height(total: f64) -> u64 {
    (total.max(0.0) * 100.0).round() as u64
}

/// Share the width between bars, leaving one column of gap each
fn bar_width(available: u16, bars: usize) -> u16 {
    if bars == 0 {
        return 1;
    }
    let per_bar = available / bars as u16;
    per_bar.saturating_sub(1).clamp(3, 12)
}

fn render_message(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message)
        .style(Style::default().add_modifier(Modifier::DIM))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Header line summarising the total charted, used in the status bar
pub fn summary_line(totals: &[CategoryTotal]) -> String {
    let sum: f64 = totals.iter().map(|t| t.total).sum();
    format!("{} categories, {} total", totals.len(), format_amount(sum))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(category: &str, total: f64) -> CategoryTotal {
        CategoryTotal {
            category: category.to_string(),
            total,
        }
    }

    #[test]
    fn test_pie_slices_fractions() {
        let slices = pie_slices(&[total("Food", 30.0), total("Transport", 10.0)]);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].fraction, 0.75);
        assert_eq!(slices[1].fraction, 0.25);
    }

    #[test]
    fn test_pie_slices_skip_non_positive() {
        let slices = pie_slices(&[total("Food", 10.0), total("Refunds", -5.0), total("Bills", 0.0)]);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].category, "Food");
        assert_eq!(slices[0].fraction, 1.0);

        assert!(pie_slices(&[total("Refunds", -5.0)]).is_empty());
        assert!(pie_slices(&[]).is_empty());
    }

    #[test]
    fn test_slice_at_walks_clockwise() {
        let slices = pie_slices(&[total("A", 1.0), total("B", 1.0), total("C", 2.0)]);
        assert_eq!(slice_at(&slices, 0.0), Some(0));
        assert_eq!(slice_at(&slices, 0.3), Some(1));
        assert_eq!(slice_at(&slices, 0.6), Some(2));
        assert_eq!(slice_at(&slices, 1.0), Some(2));
        assert_eq!(slice_at(&[], 0.5), None);
    }

    #[test]
    fn test_pie_points_are_proportional() {
        let slices = pie_slices(&[total("Big", 3.0), total("Small", 1.0)]);
        let points = pie_points(&slices);
        let big = points[0].len() as f64;
        let small = points[1].len() as f64;
        let ratio = big / small;
        assert!((2.7..3.3).contains(&ratio), "unexpected ratio {ratio}");
        assert!(points.iter().flatten().all(|(x, y)| x * x + y * y <= 1.0));
    }

    #[test]
    fn test_bar_height() {
        assert_eq!(bar_height(19.5), 1950);
        assert_eq!(bar_height(-3.0), 0);
    }

    #[test]
    fn test_bar_width_bounds() {
        assert_eq!(bar_width(100, 2), 12);
        assert_eq!(bar_width(20, 5), 3);
        assert_eq!(bar_width(40, 6), 5);
        assert_eq!(bar_width(10, 0), 1);
    }

    #[test]
    fn test_summary_line() {
        let line = summary_line(&[total("Food", 19.5), total("Transport", 20.0)]);
        assert_eq!(line, "2 categories, ₹39.50 total");
    }
}
