//! Data layer for the local expense database.
//!
//! Handles schema setup, inserts, deletes, filtered fetches and aggregates.

mod models;
mod storage;

pub use models::{
    CategoryTotal, Expense, ExpenseFilter, NewExpense, SpendingStats, ALL_CATEGORIES, CATEGORIES,
};
pub use storage::ExpenseStore;
