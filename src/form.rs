//! Form state for the "Add Expense" and "Filters" panels.
//!
//! Both forms are plain view-models: they hold the text the user typed and
//! turn it into store requests, rejecting bad input before the store is touched.

use chrono::NaiveDate;
use thiserror::Error;

use crate::data::{ExpenseFilter, NewExpense, ALL_CATEGORIES, CATEGORIES};

/// Canonical date format accepted by both forms
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input rejected before reaching the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please choose a category.")]
    MissingCategory,
    #[error("Please enter an amount.")]
    MissingAmount,
    #[error("Amount '{0}' is not a number.")]
    InvalidAmount(String),
    #[error("Date '{0}' is not a valid YYYY-MM-DD date.")]
    InvalidDate(String),
}

/// Parse an ISO date, requiring the zero-padded form so stored dates sort correctly.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        // chrono accepts "2024-1-5"; only the padded spelling compares correctly as text
        .filter(|date| date.format(DATE_FORMAT).to_string() == input)
        .ok_or_else(|| ValidationError::InvalidDate(input.to_string()))
}

/// Parse an amount, rejecting empty, non-numeric, and non-finite input
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingAmount);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| ValidationError::InvalidAmount(trimmed.to_string()))
}

/// Step through `options` (with wraparound) starting from `current`
fn cycle<'a>(options: &[&'a str], current: &str, forward: bool) -> &'a str {
    let len = options.len();
    let next = match options.iter().position(|o| *o == current) {
        Some(idx) if forward => (idx + 1) % len,
        Some(idx) => (idx + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    options[next]
}

/// Fields of the "Add Expense" form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    Category,
    Amount,
    Date,
    Description,
}

impl ExpenseField {
    pub const ALL: [ExpenseField; 4] = [
        ExpenseField::Category,
        ExpenseField::Amount,
        ExpenseField::Date,
        ExpenseField::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseField::Category => "Category",
            ExpenseField::Amount => "Amount",
            ExpenseField::Date => "Date (YYYY-MM-DD)",
            ExpenseField::Description => "Description",
        }
    }

    fn next(self) -> Self {
        match self {
            ExpenseField::Category => ExpenseField::Amount,
            ExpenseField::Amount => ExpenseField::Date,
            ExpenseField::Date => ExpenseField::Description,
            ExpenseField::Description => ExpenseField::Category,
        }
    }

    fn prev(self) -> Self {
        match self {
            ExpenseField::Category => ExpenseField::Description,
            ExpenseField::Amount => ExpenseField::Category,
            ExpenseField::Date => ExpenseField::Amount,
            ExpenseField::Description => ExpenseField::Date,
        }
    }
}

/// View-model for the "Add Expense" panel
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub category: String,
    pub amount: String,
    pub date: String,
    pub description: String,
    pub active: ExpenseField,
}

impl ExpenseForm {
    /// Empty form with the date prefilled to `today`
    pub fn new(today: NaiveDate) -> Self {
        ExpenseForm {
            category: String::new(),
            amount: String::new(),
            date: today.format(DATE_FORMAT).to_string(),
            description: String::new(),
            active: ExpenseField::Category,
        }
    }

    /// Back to a fresh form with focus on the category
    pub fn clear(&mut self, today: NaiveDate) {
        *self = ExpenseForm::new(today);
    }

    pub fn value(&self, field: ExpenseField) -> &str {
        match field {
            ExpenseField::Category => &self.category,
            ExpenseField::Amount => &self.amount,
            ExpenseField::Date => &self.date,
            ExpenseField::Description => &self.description,
        }
    }

    /// Text buffer for the active field. Category is chosen, not typed.
    fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.active {
            ExpenseField::Category => None,
            ExpenseField::Amount => Some(&mut self.amount),
            ExpenseField::Date => Some(&mut self.date),
            ExpenseField::Description => Some(&mut self.description),
        }
    }

    pub fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub fn prev_field(&mut self) {
        self.active = self.active.prev();
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.active_text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        match self.active_text_mut() {
            Some(text) => {
                text.pop();
            }
            None => self.category.clear(),
        }
    }

    /// Step the category through the fixed label set when it is the active field
    pub fn cycle_category(&mut self, forward: bool) {
        if self.active == ExpenseField::Category {
            self.category = cycle(&CATEGORIES, &self.category, forward).to_string();
        }
    }

    /// Turn the form into an insert request, or explain what is wrong with it
    pub fn validate(&self) -> Result<NewExpense, ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let amount = parse_amount(&self.amount)?;
        let date = self.date.trim();
        parse_iso_date(date)?;

        Ok(NewExpense::new(
            self.category.clone(),
            amount,
            date,
            self.description.clone(),
        ))
    }
}

/// Fields of the "Filters" panel, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Category,
    StartDate,
    EndDate,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [
        FilterField::Category,
        FilterField::StartDate,
        FilterField::EndDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Category => "Category",
            FilterField::StartDate => "Start Date",
            FilterField::EndDate => "End Date",
        }
    }

    fn next(self) -> Self {
        match self {
            FilterField::Category => FilterField::StartDate,
            FilterField::StartDate => FilterField::EndDate,
            FilterField::EndDate => FilterField::Category,
        }
    }

    fn prev(self) -> Self {
        match self {
            FilterField::Category => FilterField::EndDate,
            FilterField::StartDate => FilterField::Category,
            FilterField::EndDate => FilterField::StartDate,
        }
    }
}

/// View-model for the "Filters" panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterForm {
    pub category: String,
    pub start_date: String,
    pub end_date: String,
    pub active: FilterField,
}

impl Default for FilterForm {
    fn default() -> Self {
        FilterForm {
            category: ALL_CATEGORIES.to_string(),
            start_date: String::new(),
            end_date: String::new(),
            active: FilterField::Category,
        }
    }
}

impl FilterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to "All" with no date bounds
    pub fn clear(&mut self) {
        let active = self.active;
        *self = FilterForm::default();
        self.active = active;
    }

    pub fn value(&self, field: FilterField) -> &str {
        match field {
            FilterField::Category => &self.category,
            FilterField::StartDate => &self.start_date,
            FilterField::EndDate => &self.end_date,
        }
    }

    fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.active {
            FilterField::Category => None,
            FilterField::StartDate => Some(&mut self.start_date),
            FilterField::EndDate => Some(&mut self.end_date),
        }
    }

    pub fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub fn prev_field(&mut self) {
        self.active = self.active.prev();
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.active_text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        match self.active_text_mut() {
            Some(text) => {
                text.pop();
            }
            None => self.category = ALL_CATEGORIES.to_string(),
        }
    }

    /// Step through "All" followed by the fixed label set
    pub fn cycle_category(&mut self, forward: bool) {
        if self.active == FilterField::Category {
            let mut options = vec![ALL_CATEGORIES];
            options.extend(CATEGORIES);
            self.category = cycle(&options, &self.category, forward).to_string();
        }
    }

    /// Build the store filter. Empty bounds are dropped; non-empty ones must be ISO dates.
    pub fn to_filter(&self) -> Result<ExpenseFilter, ValidationError> {
        let bound = |text: &str| -> Result<Option<String>, ValidationError> {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            parse_iso_date(text)?;
            Ok(Some(text.to_string()))
        };

        let category = Some(self.category.clone()).filter(|c| c != ALL_CATEGORIES && !c.is_empty());

        Ok(ExpenseFilter::new(
            category,
            bound(&self.start_date)?,
            bound(&self.end_date)?,
        ))
    }
}
