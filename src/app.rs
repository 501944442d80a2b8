//! Main application logic and TUI event loop.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::cli::AppConfig;
use crate::data::{CategoryTotal, Expense, ExpenseFilter, ExpenseStore, SpendingStats};
use crate::export::{self, ExportOutcome, DEFAULT_EXPORT_FILE};
use crate::form::{ExpenseForm, FilterForm, DATE_FORMAT};
use crate::selection::Selection;
use crate::ui::{
    chart::{summary_line, SummaryCharts},
    dialog::{ConfirmDialog, PathPrompt},
    widgets::{ExpenseFormPanel, ExpenseTable, FilterPanel, StatsBar, StatusBar},
    HelpOverlay, Theme,
};

/// Which panel is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    Form,
    Filter,
    Table,
}

impl FocusedPanel {
    fn next(self) -> Self {
        match self {
            FocusedPanel::Form => FocusedPanel::Filter,
            FocusedPanel::Filter => FocusedPanel::Table,
            FocusedPanel::Table => FocusedPanel::Form,
        }
    }

    fn prev(self) -> Self {
        match self {
            FocusedPanel::Form => FocusedPanel::Table,
            FocusedPanel::Filter => FocusedPanel::Form,
            FocusedPanel::Table => FocusedPanel::Filter,
        }
    }
}

/// Modal layer drawn over the dashboard. While one is open it receives all keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Help,
    Charts(Vec<CategoryTotal>),
    ConfirmDelete(Vec<i64>),
    ExportPath(String),
    ConfirmOverwrite(PathBuf),
}

/// Message shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Application state
pub struct App {
    theme: Theme,

    // Data
    store: ExpenseStore,
    db_path: Option<PathBuf>,
    expenses: Vec<Expense>,
    stats: SpendingStats,
    applied_filter: Option<ExpenseFilter>,

    // Forms
    form: ExpenseForm,
    filter_form: FilterForm,

    // Table state
    selection: Selection,
    selected_row: usize,

    // UI State
    focused: FocusedPanel,
    overlay: Option<Overlay>,
    status: StatusMessage,
    should_quit: bool,

    // Pinned date for tests; the local clock otherwise
    fixed_today: Option<NaiveDate>,
}

impl App {
    /// Create a new App over an initialised store living at `db_path`
    pub fn new(store: ExpenseStore, db_path: PathBuf) -> Result<Self> {
        Self::build(store, Some(db_path), None)
    }

    fn build(
        store: ExpenseStore,
        db_path: Option<PathBuf>,
        fixed_today: Option<NaiveDate>,
    ) -> Result<Self> {
        let today = fixed_today.unwrap_or_else(|| Local::now().date_naive());

        let mut app = App {
            theme: Theme::default(),
            store,
            db_path,
            expenses: Vec::new(),
            stats: SpendingStats::default(),
            applied_filter: None,
            form: ExpenseForm::new(today),
            filter_form: FilterForm::new(),
            selection: Selection::new(),
            selected_row: 0,
            focused: FocusedPanel::Form,
            overlay: None,
            status: StatusMessage::info("Connected to database."),
            should_quit: false,
            fixed_today,
        };

        app.reload()?;

        Ok(app)
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Re-run the applied filter (or fetch everything) and recompute the totals
    fn reload(&mut self) -> Result<()> {
        self.expenses = match &self.applied_filter {
            Some(filter) => self.store.fetch_filtered(filter)?,
            None => self.store.fetch_all()?,
        };
        let today = self.today().format(DATE_FORMAT).to_string();
        self.stats = self.store.stats(&today)?;

        self.selection.prune(&self.expenses);
        if self.selected_row >= self.expenses.len() {
            self.selected_row = self.expenses.len().saturating_sub(1);
        }

        self.status = StatusMessage::info(format!("Loaded {} records.", self.expenses.len()));
        Ok(())
    }

    /// Set an error message to display (non-fatal)
    pub fn set_error(&mut self, message: String) {
        self.status = StatusMessage::error(message);
    }

    /// Validate the form and store it as a new record
    fn add_expense(&mut self) -> Result<()> {
        let expense = match self.form.validate() {
            Ok(expense) => expense,
            Err(e) => {
                tracing::debug!(error = %e, "rejected expense form");
                self.status = StatusMessage::error(e.to_string());
                return Ok(());
            }
        };

        let id = self.store.insert(&expense)?;
        tracing::info!(
            id,
            category = %expense.category,
            amount = expense.amount,
            date = %expense.date,
            "added expense"
        );

        let today = self.today();
        self.form.clear(today);
        self.reload()?;
        self.status = StatusMessage::info(format!(
            "Added expense #{id}. Loaded {} records.",
            self.expenses.len()
        ));
        Ok(())
    }

    /// Apply the filter panel to the table
    fn apply_filter(&mut self) -> Result<()> {
        let filter = match self.filter_form.to_filter() {
            Ok(filter) => filter,
            Err(e) => {
                tracing::debug!(error = %e, "rejected filter");
                self.status = StatusMessage::error(e.to_string());
                return Ok(());
            }
        };

        tracing::debug!(?filter, "applying filter");
        self.applied_filter = if filter.is_empty() { None } else { Some(filter) };
        self.selected_row = 0;
        self.reload()
    }

    /// Drop the filter and show every record
    fn reset_filter(&mut self) -> Result<()> {
        self.applied_filter = None;
        self.filter_form.clear();
        self.reload()
    }

    /// Ask for confirmation before deleting the marked rows (or the current row)
    fn request_delete(&mut self) {
        let targets = self.selection.targets(&self.expenses, self.selected_row);
        if targets.is_empty() {
            self.status = StatusMessage::info("Select an expense to delete.");
            return;
        }
        self.overlay = Some(Overlay::ConfirmDelete(targets));
    }

    fn delete_expenses(&mut self, ids: &[i64]) -> Result<()> {
        for &id in ids {
            let removed = self.store.delete(id)?;
            tracing::info!(id, removed, "deleted expense");
        }
        self.selection.clear();
        self.reload()?;
        self.status = StatusMessage::info(format!(
            "Deleted {} record(s). Loaded {} records.",
            ids.len(),
            self.expenses.len()
        ));
        Ok(())
    }

    /// Show the category charts, unless there is nothing to chart
    fn open_charts(&mut self) -> Result<()> {
        let totals = self.store.category_totals()?;
        if totals.is_empty() {
            self.status = StatusMessage::info("No expenses to chart.");
            return Ok(());
        }
        self.status = StatusMessage::info(summary_line(&totals));
        self.overlay = Some(Overlay::Charts(totals));
        Ok(())
    }

    /// Prompt for an export path, unless there is nothing to export
    fn start_export(&mut self) -> Result<()> {
        if self.store.count()? == 0 {
            tracing::info!("export skipped, no records");
            self.status = StatusMessage::info("Nothing to export.");
            return Ok(());
        }
        self.overlay = Some(Overlay::ExportPath(DEFAULT_EXPORT_FILE.to_string()));
        Ok(())
    }

    /// Check the typed path before writing: never the store, and ask before replacing a file
    fn finish_export(&mut self, input: &str) -> Result<()> {
        let Some(path) = export::resolve_export_path(input) else {
            self.status = StatusMessage::info("Export cancelled.");
            return Ok(());
        };

        if self.is_store_file(&path) {
            tracing::warn!(?path, "refused to export over the expense database");
            self.status =
                StatusMessage::error("That is the expense database. Choose another file.");
            self.overlay = Some(Overlay::ExportPath(input.to_string()));
            return Ok(());
        }

        if path.exists() {
            self.overlay = Some(Overlay::ConfirmOverwrite(path));
            return Ok(());
        }

        self.write_export(&path)
    }

    fn is_store_file(&self, path: &Path) -> bool {
        let Some(db_path) = &self.db_path else {
            return false;
        };
        match (std::fs::canonicalize(path), std::fs::canonicalize(db_path)) {
            (Ok(target), Ok(store)) => target == store,
            _ => path == db_path.as_path(),
        }
    }

    fn write_export(&mut self, path: &Path) -> Result<()> {
        let expenses = self.store.fetch_all()?;
        match export::export_expenses(path, &expenses)? {
            ExportOutcome::Empty => {
                tracing::info!("export skipped, no records");
                self.status = StatusMessage::info("Nothing to export.");
            }
            ExportOutcome::Written { path, rows } => {
                tracing::info!(?path, rows, "exported expenses");
                self.status =
                    StatusMessage::info(format!("Data exported successfully to {}", path.display()));
            }
        }
        Ok(())
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return Ok(());
        }

        if let Some(overlay) = self.overlay.take() {
            return self.handle_overlay_key(overlay, key);
        }

        // Global shortcuts
        match key.code {
            KeyCode::F(1) => {
                self.overlay = Some(Overlay::Help);
                return Ok(());
            }
            KeyCode::F(5) => return self.open_charts(),
            KeyCode::F(6) => return self.start_export(),
            KeyCode::Tab => {
                self.focused = self.focused.next();
                return Ok(());
            }
            KeyCode::BackTab => {
                self.focused = self.focused.prev();
                return Ok(());
            }
            _ => {}
        }

        // Panel-specific input
        match self.focused {
            FocusedPanel::Form => self.handle_form_key(key),
            FocusedPanel::Filter => self.handle_filter_key(key),
            FocusedPanel::Table => self.handle_table_key(key),
        }
    }

    fn handle_overlay_key(&mut self, overlay: Overlay, key: KeyEvent) -> Result<()> {
        match overlay {
            Overlay::Help => match key.code {
                KeyCode::Esc
                | KeyCode::F(1)
                | KeyCode::Char('?')
                | KeyCode::Char('h')
                | KeyCode::Char('q') => {}
                _ => self.overlay = Some(Overlay::Help),
            },
            Overlay::Charts(totals) => match key.code {
                KeyCode::Esc | KeyCode::F(5) | KeyCode::Char('c') | KeyCode::Char('q') => {}
                _ => self.overlay = Some(Overlay::Charts(totals)),
            },
            Overlay::ConfirmDelete(ids) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.delete_expenses(&ids)?;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.status = StatusMessage::info("Delete cancelled.");
                }
                _ => self.overlay = Some(Overlay::ConfirmDelete(ids)),
            },
            Overlay::ExportPath(mut input) => match key.code {
                KeyCode::Enter => self.finish_export(&input)?,
                KeyCode::Esc => {
                    self.status = StatusMessage::info("Export cancelled.");
                }
                KeyCode::Backspace => {
                    input.pop();
                    self.overlay = Some(Overlay::ExportPath(input));
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    self.overlay = Some(Overlay::ExportPath(input));
                }
                _ => self.overlay = Some(Overlay::ExportPath(input)),
            },
            Overlay::ConfirmOverwrite(path) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.write_export(&path)?;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.status = StatusMessage::info("Export cancelled.");
                }
                _ => self.overlay = Some(Overlay::ConfirmOverwrite(path)),
            },
        }
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return self.add_expense(),
            KeyCode::Char('l') if ctrl => {
                let today = self.today();
                self.form.clear(today);
            }
            KeyCode::Char(c) if !ctrl => self.form.push_char(c),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Up => self.form.prev_field(),
            KeyCode::Down => self.form.next_field(),
            KeyCode::Left => self.form.cycle_category(false),
            KeyCode::Right => self.form.cycle_category(true),
            KeyCode::Esc => self.focused = FocusedPanel::Table,
            _ => {}
        }
        Ok(())
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return self.apply_filter(),
            KeyCode::Char('l') if ctrl => self.filter_form.clear(),
            KeyCode::Char(c) if !ctrl => self.filter_form.push_char(c),
            KeyCode::Backspace => self.filter_form.backspace(),
            KeyCode::Up => self.filter_form.prev_field(),
            KeyCode::Down => self.filter_form.next_field(),
            KeyCode::Left => self.filter_form.cycle_category(false),
            KeyCode::Right => self.filter_form.cycle_category(true),
            KeyCode::Esc => self.focused = FocusedPanel::Table,
            _ => {}
        }
        Ok(())
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::Char('h') => self.overlay = Some(Overlay::Help),
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.expenses.is_empty() {
                    self.selected_row = (self.selected_row + 1) % self.expenses.len();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if !self.expenses.is_empty() {
                    self.selected_row = self
                        .selected_row
                        .checked_sub(1)
                        .unwrap_or(self.expenses.len() - 1);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(expense) = self.expenses.get(self.selected_row) {
                    self.selection.toggle(expense.id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
            KeyCode::Char('r') => return self.reset_filter(),
            KeyCode::Char('c') => return self.open_charts(),
            KeyCode::Char('e') => return self.start_export(),
            KeyCode::Esc => self.selection.clear(),
            _ => {}
        }
        Ok(())
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Stats
                Constraint::Length(6), // Form + filters
                Constraint::Min(5),    // Table
                Constraint::Length(2), // Status bar
            ])
            .split(size);

        let form_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[1]);

        StatsBar::new(self.stats, &self.theme).render(frame, main_chunks[0]);

        ExpenseFormPanel::new(&self.form, &self.theme).render(
            frame,
            form_chunks[0],
            self.focused == FocusedPanel::Form,
        );
        FilterPanel::new(&self.filter_form, self.applied_filter.is_some(), &self.theme).render(
            frame,
            form_chunks[1],
            self.focused == FocusedPanel::Filter,
        );

        ExpenseTable::new(
            &self.expenses,
            self.selected_row,
            &self.selection,
            &self.theme,
        )
        .render(frame, main_chunks[2], self.focused == FocusedPanel::Table);

        StatusBar::new(&self.status.text, self.status.is_error, &self.theme)
            .render(frame, main_chunks[3]);

        match &self.overlay {
            Some(Overlay::Help) => HelpOverlay::new(&self.theme).render(frame, size),
            Some(Overlay::Charts(totals)) => {
                SummaryCharts::new(totals, &self.theme).render(frame, size)
            }
            Some(Overlay::ConfirmDelete(ids)) => {
                ConfirmDialog::delete(ids.len(), &self.theme).render(frame, size)
            }
            Some(Overlay::ExportPath(input)) => {
                PathPrompt::new(input, &self.theme).render(frame, size)
            }
            Some(Overlay::ConfirmOverwrite(path)) => {
                ConfirmDialog::overwrite(path, &self.theme).render(frame, size)
            }
            None => {}
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Open the store at the configured path, creating the file and table if needed
pub fn open_store(config: &AppConfig) -> Result<ExpenseStore> {
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory: {parent:?}"))?;
    }
    let store = ExpenseStore::open(&config.db_path)?;
    store.ensure_schema()?;
    tracing::info!(db_path = ?config.db_path, "opened expense database");
    Ok(store)
}

/// Run the TUI application
pub fn run(config: AppConfig) -> Result<()> {
    let store = open_store(&config)?;
    let mut app = App::new(store, config.db_path.clone())
        .context("Failed to initialize application")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    let result = run_main_loop(&mut terminal, &mut app);

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();

    result
}

/// Main application loop
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if let Err(e) = app.handle_key(key) {
                    tracing::error!(error = ?e, "operation failed");
                    app.set_error(format!("{e:#}"));
                }
            }
        }

        if app.should_quit {
            tracing::info!("exiting");
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NewExpense;
    use crate::form::ExpenseField;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn empty_store() -> ExpenseStore {
        let store = ExpenseStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store
    }

    fn seeded_store() -> ExpenseStore {
        let store = empty_store();
        store
            .insert(&NewExpense::new("Food", 12.50, "2024-01-01", "lunch"))
            .unwrap();
        store
            .insert(&NewExpense::new("Food", 7.00, "2024-01-02", "snack"))
            .unwrap();
        store
            .insert(&NewExpense::new("Transport", 20.00, "2024-02-01", "bus"))
            .unwrap();
        store
    }

    fn app_with(store: ExpenseStore) -> App {
        App::build(store, None, Some(today())).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
            .unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_startup_loads_rows_and_stats() {
        let app = app_with(seeded_store());
        assert_eq!(app.expenses.len(), 3);
        assert_eq!(app.expenses[0].date, "2024-02-01");
        assert_eq!(app.stats.today, 7.0);
        assert_eq!(app.stats.month, 19.5);
        assert_eq!(app.stats.all_time, 39.5);
        assert_eq!(app.status, StatusMessage::info("Loaded 3 records."));
        assert_eq!(app.form.date, "2024-01-02");
    }

    #[test]
    fn test_add_expense_through_keyboard() {
        let mut app = app_with(empty_store());
        assert_eq!(app.focused, FocusedPanel::Form);

        press(&mut app, KeyCode::Right); // Food
        press(&mut app, KeyCode::Down);
        type_text(&mut app, "4.25");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        type_text(&mut app, "tea and q");
        press(&mut app, KeyCode::Enter);

        assert!(!app.should_quit);
        assert_eq!(app.expenses.len(), 1);
        let row = &app.expenses[0];
        assert_eq!(row.category, "Food");
        assert_eq!(row.amount, 4.25);
        assert_eq!(row.date, "2024-01-02");
        assert_eq!(row.description, "tea and q");
        assert_eq!(app.stats.today, 4.25);
        assert!(!app.status.is_error);

        // Form resets after a successful add
        assert_eq!(app.form.amount, "");
        assert_eq!(app.form.category, "");
        assert_eq!(app.form.active, ExpenseField::Category);

        // The next entry starts from the category
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.category, "Food");
    }

    #[test]
    fn test_invalid_form_does_not_touch_store() {
        let mut app = app_with(seeded_store());
        app.form.category = "Food".to_string();
        app.form.amount = "twelve".to_string();

        press(&mut app, KeyCode::Enter);

        assert!(app.status.is_error);
        assert_eq!(app.store.count().unwrap(), 3);
        assert_eq!(app.form.amount, "twelve");

        app.form.amount = "12".to_string();
        app.form.date = "2024-1-2".to_string();
        press(&mut app, KeyCode::Enter);
        assert!(app.status.is_error);
        assert_eq!(app.store.count().unwrap(), 3);

        app.form.category.clear();
        app.form.date = "2024-01-02".to_string();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status, StatusMessage::error("Please choose a category."));
        assert_eq!(app.store.count().unwrap(), 3);
    }

    #[test]
    fn test_clear_form_shortcut() {
        let mut app = app_with(empty_store());
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        type_text(&mut app, "99");
        ctrl(&mut app, 'l');
        assert_eq!(app.form, ExpenseForm::new(today()));
    }

    #[test]
    fn test_filter_applies_and_survives_insert() {
        let mut app = app_with(seeded_store());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused, FocusedPanel::Filter);

        press(&mut app, KeyCode::Right); // Food
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.expenses.len(), 2);
        assert!(app.expenses.iter().all(|e| e.category == "Food"));

        app.form.category = "Transport".to_string();
        app.form.amount = "3".to_string();
        app.add_expense().unwrap();
        assert_eq!(app.expenses.len(), 2, "filter stays applied after insert");
        assert_eq!(app.stats.all_time, 42.5);

        app.form.category = "Food".to_string();
        app.form.amount = "1".to_string();
        app.add_expense().unwrap();
        assert_eq!(app.expenses.len(), 3);
    }

    #[test]
    fn test_filter_date_range() {
        let mut app = app_with(seeded_store());
        app.filter_form.start_date = "2024-01-02".to_string();
        app.filter_form.end_date = "2024-02-01".to_string();
        app.apply_filter().unwrap();

        let dates: Vec<&str> = app.expenses.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-02-01", "2024-01-02"]);
    }

    #[test]
    fn test_filter_with_no_matches_shows_empty_table() {
        let mut app = app_with(seeded_store());
        app.filter_form.category = "Bills".to_string();
        app.apply_filter().unwrap();
        assert!(app.expenses.is_empty());
        assert_eq!(app.status, StatusMessage::info("Loaded 0 records."));
    }

    #[test]
    fn test_invalid_filter_keeps_previous_rows() {
        let mut app = app_with(seeded_store());
        app.filter_form.start_date = "yesterday".to_string();
        app.apply_filter().unwrap();
        assert!(app.status.is_error);
        assert_eq!(app.expenses.len(), 3);
        assert!(app.applied_filter.is_none());
    }

    #[test]
    fn test_reset_filter() {
        let mut app = app_with(seeded_store());
        app.filter_form.category = "Transport".to_string();
        app.apply_filter().unwrap();
        assert_eq!(app.expenses.len(), 1);

        app.focused = FocusedPanel::Table;
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.expenses.len(), 3);
        assert_eq!(app.filter_form, FilterForm::new());
    }

    #[test]
    fn test_delete_current_row_with_confirmation() {
        let mut app = app_with(seeded_store());
        app.focused = FocusedPanel::Table;
        press(&mut app, KeyCode::Down);
        let target = app.expenses[1].id;

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.overlay, Some(Overlay::ConfirmDelete(vec![target])));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.overlay, None);
        assert_eq!(app.expenses.len(), 3);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.overlay, None);
        assert_eq!(app.expenses.len(), 2);
        assert!(app.expenses.iter().all(|e| e.id != target));
        assert_eq!(app.stats.all_time, 32.5);
    }

    #[test]
    fn test_delete_marked_rows() {
        let mut app = app_with(seeded_store());
        app.focused = FocusedPanel::Table;
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.selection.len(), 2);

        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.expenses.len(), 1);
        assert_eq!(app.expenses[0].description, "snack");
        assert!(app.selection.is_empty());
        assert_eq!(app.selected_row, 0);
    }

    #[test]
    fn test_delete_already_removed_record_is_not_an_error() {
        let mut app = app_with(seeded_store());
        let id = app.expenses[0].id;
        app.store.delete(id).unwrap();
        app.delete_expenses(&[id]).unwrap();
        assert!(!app.status.is_error);
        assert_eq!(app.expenses.len(), 2);
    }

    #[test]
    fn test_delete_with_empty_table_is_informational() {
        let mut app = app_with(empty_store());
        app.focused = FocusedPanel::Table;
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.overlay, None);
        assert_eq!(app.status, StatusMessage::info("Select an expense to delete."));
    }

    #[test]
    fn test_charts_with_no_data() {
        let mut app = app_with(empty_store());
        press(&mut app, KeyCode::F(5));
        assert_eq!(app.overlay, None);
        assert_eq!(app.status, StatusMessage::info("No expenses to chart."));
        assert_eq!(app.store.count().unwrap(), 0);
    }

    #[test]
    fn test_charts_show_category_totals() {
        let mut app = app_with(seeded_store());
        app.focused = FocusedPanel::Table;
        press(&mut app, KeyCode::Char('c'));

        let Some(Overlay::Charts(totals)) = &app.overlay else {
            panic!("charts overlay not open");
        };
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].total, 19.5);
        assert_eq!(totals[1].total, 20.0);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, None);
    }

    #[test]
    fn test_export_with_no_data() {
        let mut app = app_with(empty_store());
        press(&mut app, KeyCode::F(6));
        assert_eq!(app.overlay, None);
        assert_eq!(app.status, StatusMessage::info("Nothing to export."));
    }

    #[test]
    fn test_export_writes_all_records() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report");

        let mut app = app_with(seeded_store());
        app.filter_form.category = "Transport".to_string();
        app.apply_filter().unwrap();

        press(&mut app, KeyCode::F(6));
        assert_eq!(
            app.overlay,
            Some(Overlay::ExportPath(DEFAULT_EXPORT_FILE.to_string()))
        );

        app.overlay = Some(Overlay::ExportPath(String::new()));
        type_text(&mut app, target.to_str().unwrap());
        press(&mut app, KeyCode::Enter);

        let written = dir.path().join("report.csv");
        assert_eq!(app.overlay, None);
        assert!(!app.status.is_error);
        let contents = std::fs::read_to_string(&written).unwrap();
        assert_eq!(contents.lines().count(), 4, "header plus every record");
        assert_eq!(app.store.count().unwrap(), 3);
    }

    #[test]
    fn test_export_refuses_to_overwrite_store() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("expenses.db");
        let config = AppConfig {
            db_path: db_path.clone(),
            log_path: dir.path().join("expenses.db.log"),
        };
        let store = open_store(&config).unwrap();
        store
            .insert(&NewExpense::new("Food", 12.50, "2024-01-01", "lunch"))
            .unwrap();

        let mut app = App::build(store, Some(db_path.clone()), Some(today())).unwrap();
        press(&mut app, KeyCode::F(6));
        app.overlay = Some(Overlay::ExportPath(String::new()));
        type_text(&mut app, db_path.to_str().unwrap());
        press(&mut app, KeyCode::Enter);

        assert!(app.status.is_error);
        assert!(matches!(app.overlay, Some(Overlay::ExportPath(_))));

        let reopened = ExpenseStore::open(&db_path).unwrap();
        reopened.ensure_schema().unwrap();
        assert_eq!(reopened.fetch_all().unwrap().len(), 1);
    }

    #[test]
    fn test_export_asks_before_replacing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("report.csv");
        std::fs::write(&target, "keep me").unwrap();

        let mut app = app_with(seeded_store());
        app.overlay = Some(Overlay::ExportPath(target.to_str().unwrap().to_string()));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, Some(Overlay::ConfirmOverwrite(target.clone())));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "keep me");

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.overlay, None);
        assert_eq!(app.status, StatusMessage::info("Export cancelled."));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "keep me");

        app.overlay = Some(Overlay::ExportPath(target.to_str().unwrap().to_string()));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.overlay, None);
        assert!(!app.status.is_error);
        let contents = std::fs::read_to_string(&target).unwrap();
        assert_eq!(contents.lines().count(), 4);
    }

    #[test]
    fn test_export_cancelled() {
        let mut app = app_with(seeded_store());
        press(&mut app, KeyCode::F(6));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, None);
        assert_eq!(app.status, StatusMessage::info("Export cancelled."));
    }

    #[test]
    fn test_help_toggle() {
        let mut app = app_with(empty_store());
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.overlay, Some(Overlay::Help));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.overlay, Some(Overlay::Help));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, None);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(empty_store());
        type_text(&mut app, "q");
        assert!(!app.should_quit, "q types into the form");

        app.focused = FocusedPanel::Table;
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = app_with(empty_store());
        ctrl(&mut app, 'q');
        assert!(app.should_quit);
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = app_with(empty_store());
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused, FocusedPanel::Table);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused, FocusedPanel::Form);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused, FocusedPanel::Table);
    }

    #[test]
    fn test_open_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            db_path: dir.path().join("nested").join("expenses.db"),
            log_path: dir.path().join("nested").join("expenses.log"),
        };
        let store = open_store(&config).unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(config.db_path.exists());
    }
}
