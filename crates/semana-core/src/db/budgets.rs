//! Budget book persistence

use rusqlite::{params, OptionalExtension};

use super::{Database, DbConn};
use crate::budget::{BudgetBook, BudgetOverride, DEFAULT_WEEKLY_BUDGET};
use crate::error::Result;
use crate::store::BudgetStore;

const BASE_DEFAULT_KEY: &str = "base_default";

fn load_week_amounts(conn: &DbConn, table: &str) -> Result<Vec<BudgetOverride>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT year, week_number, amount FROM {} ORDER BY year, week_number",
        table
    ))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(BudgetOverride {
                year: row.get(0)?,
                week: row.get(1)?,
                amount: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

impl Database {
    /// Load the budget book, falling back to the default book
    pub fn load_budget_book(&self) -> Result<BudgetBook> {
        let conn = self.conn()?;

        let base_default: Option<f64> = conn
            .query_row(
                "SELECT value FROM budget_settings WHERE key = ?",
                params![BASE_DEFAULT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let default_changes = load_week_amounts(&conn, "budget_default_changes")?;
        let overrides = load_week_amounts(&conn, "budget_overrides")?;

        Ok(BudgetBook::from_parts(
            base_default.unwrap_or(DEFAULT_WEEKLY_BUDGET),
            default_changes,
            overrides,
        ))
    }

    /// Replace the stored budget book
    pub fn save_budget_book(&self, book: &BudgetBook) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO budget_settings (key, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![BASE_DEFAULT_KEY, book.base_default()],
        )?;

        tx.execute("DELETE FROM budget_default_changes", [])?;
        for change in book.default_changes() {
            tx.execute(
                "INSERT INTO budget_default_changes (year, week_number, amount) VALUES (?, ?, ?)",
                params![change.year, change.week, change.amount],
            )?;
        }

        tx.execute("DELETE FROM budget_overrides", [])?;
        for o in book.overrides() {
            tx.execute(
                "INSERT INTO budget_overrides (year, week_number, amount) VALUES (?, ?, ?)",
                params![o.year, o.week, o.amount],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

impl BudgetStore for Database {
    fn load_budgets(&self) -> Result<BudgetBook> {
        self.load_budget_book()
    }

    fn save_budgets(&self, book: &BudgetBook) -> Result<()> {
        self.save_budget_book(book)
    }
}
