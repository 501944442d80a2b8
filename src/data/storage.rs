//! SQLite storage layer for the expense log.
//!
//! Database schema:
//! - A single `expenses` table: id, category, amount, date, description
//! - Dates are ISO `YYYY-MM-DD` strings so range filters compare lexicographically

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, params_from_iter, Connection, Row};

use super::models::{CategoryTotal, Expense, ExpenseFilter, NewExpense, SpendingStats};

const SELECT_COLUMNS: &str = "SELECT id, category, amount, date, description FROM expenses";
const ORDER_BY: &str = " ORDER BY date DESC, id ASC";

/// Map a row selected with [`SELECT_COLUMNS`] into an Expense.
/// Columns are nullable in the schema, so NULL text reads as empty and NULL amount as 0.
fn expense_from_row(row: &Row) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        category: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        amount: row.get::<_, Option<f64>>(2)?.unwrap_or_default(),
        date: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        description: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

/// Storage interface for the expense database
pub struct ExpenseStore {
    conn: Connection,
}

impl ExpenseStore {
    /// Open (or create) the database file at `path`.
    ///
    /// The schema is not touched here; call [`ExpenseStore::ensure_schema`] once at startup.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {path:?}"))?;
        Ok(ExpenseStore { conn })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Ok(ExpenseStore { conn })
    }

    /// Create the `expenses` table if it does not exist. Never drops data.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS expenses (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    category TEXT,
                    amount REAL,
                    date TEXT,
                    description TEXT
                )",
                [],
            )
            .context("Failed to create expenses table")?;
        Ok(())
    }

    /// Append a record and return its freshly assigned id
    pub fn insert(&self, expense: &NewExpense) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO expenses (category, amount, date, description) VALUES (?1, ?2, ?3, ?4)",
                params![
                    expense.category,
                    expense.amount,
                    expense.date,
                    expense.description
                ],
            )
            .context("Failed to insert expense")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All records, newest date first
    pub fn fetch_all(&self) -> Result<Vec<Expense>> {
        self.query_expenses(&format!("{SELECT_COLUMNS}{ORDER_BY}"), Vec::new())
    }

    /// Records matching every constraint present in `filter`, newest date first
    pub fn fetch_filtered(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut sql = format!("{SELECT_COLUMNS} WHERE 1=1");
        let mut params: Vec<&str> = Vec::new();

        if let Some(category) = filter.category() {
            sql.push_str(" AND category = ?");
            params.push(category);
        }
        if let Some(start) = filter.start_date() {
            sql.push_str(" AND date >= ?");
            params.push(start);
        }
        if let Some(end) = filter.end_date() {
            sql.push_str(" AND date <= ?");
            params.push(end);
        }
        sql.push_str(ORDER_BY);

        self.query_expenses(&sql, params)
    }

    fn query_expenses(&self, sql: &str, params: Vec<&str>) -> Result<Vec<Expense>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .context("Failed to prepare expense query")?;
        let rows = stmt.query_map(params_from_iter(params), expense_from_row)?;

        let mut expenses = Vec::new();
        for row in rows {
            expenses.push(row.context("Failed to read expense row")?);
        }
        Ok(expenses)
    }

    /// Remove the record with `id`. Returns the number of rows removed (0 if absent).
    pub fn delete(&self, id: i64) -> Result<usize> {
        self.conn
            .execute("DELETE FROM expenses WHERE id = ?1", [id])
            .with_context(|| format!("Failed to delete expense {id}"))
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))
            .context("Failed to count expenses")?;
        Ok(count as usize)
    }

    /// Sum of amounts per distinct category, sorted by category name
    pub fn category_totals(&self) -> Result<Vec<CategoryTotal>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, TOTAL(amount) FROM expenses GROUP BY category ORDER BY category",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CategoryTotal {
                category: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                total: row.get(1)?,
            })
        })?;

        let mut totals = Vec::new();
        for row in rows {
            totals.push(row.context("Failed to read category total")?);
        }
        Ok(totals)
    }

    /// Totals for the day `today`, its calendar month, and all time.
    ///
    /// `today` is an ISO date; the month window is its first 7 characters (`YYYY-MM`).
    pub fn stats(&self, today: &str) -> Result<SpendingStats> {
        let month_prefix: String = today.chars().take(7).collect();

        let today_total = self.sum_where("date = ?1", today)?;
        let month_total = self.sum_where("substr(date, 1, 7) = ?1", &month_prefix)?;
        let all_time: f64 = self
            .conn
            .query_row("SELECT TOTAL(amount) FROM expenses", [], |row| row.get(0))
            .context("Failed to sum all expenses")?;

        Ok(SpendingStats {
            today: today_total,
            month: month_total,
            all_time,
        })
    }

    /// TOTAL() yields 0.0 rather than NULL when nothing matches
    fn sum_where(&self, predicate: &str, value: &str) -> Result<f64> {
        self.conn
            .query_row(
                &format!("SELECT TOTAL(amount) FROM expenses WHERE {predicate}"),
                [value],
                |row| row.get(0),
            )
            .with_context(|| format!("Failed to sum expenses where {predicate}"))
    }
}
