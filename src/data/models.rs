//! Data models representing logged expenses and their aggregates.

use serde::{Deserialize, Serialize};

/// Sentinel filter value meaning "every category"
pub const ALL_CATEGORIES: &str = "All";

/// Fixed set of labels offered when logging an expense
pub const CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Entertainment",
    "Others",
];

/// A single persisted expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Description")]
    pub description: String,
}

/// An expense that has not been stored yet (the store assigns the id)
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    pub date: String,
    pub description: String,
}

impl NewExpense {
    pub fn new(
        category: impl Into<String>,
        amount: f64,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        NewExpense {
            category: category.into(),
            amount,
            date: date.into(),
            description: description.into(),
        }
    }
}

/// Optional constraints for a filtered fetch.
///
/// Dates are inclusive bounds compared as ISO strings. A category equal to
/// [`ALL_CATEGORIES`] and empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ExpenseFilter {
    pub fn new(
        category: Option<String>,
        start_date: Option<String>,
        end_date: Option<String>,
    ) -> Self {
        ExpenseFilter {
            category,
            start_date,
            end_date,
        }
    }

    /// Category constraint, if any
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    }

    /// Inclusive lower date bound, if any
    pub fn start_date(&self) -> Option<&str> {
        self.start_date.as_deref().filter(|d| !d.is_empty())
    }

    /// Inclusive upper date bound, if any
    pub fn end_date(&self) -> Option<&str> {
        self.end_date.as_deref().filter(|d| !d.is_empty())
    }

    /// True when no constraint would be applied
    pub fn is_empty(&self) -> bool {
        self.category().is_none() && self.start_date().is_none() && self.end_date().is_none()
    }
}

/// Sum of amounts for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Running totals shown in the header
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpendingStats {
    pub today: f64,
    pub month: f64,
    pub all_time: f64,
}
