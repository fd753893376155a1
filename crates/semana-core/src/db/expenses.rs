//! Expense operations

use chrono::Utc;
use rusqlite::{params, Row};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Expense, NewExpense};
use crate::store::{generate_identifier, ExpenseStore};
use crate::week::WeekKey;

const EXPENSE_COLUMNS: &str = "identifier, amount, concept, occurred_at, week_number, year";

/// Raw row, converted after the query so timestamp errors surface as ours
struct ExpenseRow {
    identifier: String,
    amount: f64,
    concept: String,
    occurred_at: String,
    week_number: u32,
    year: i32,
}

impl ExpenseRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            identifier: row.get(0)?,
            amount: row.get(1)?,
            concept: row.get(2)?,
            occurred_at: row.get(3)?,
            week_number: row.get(4)?,
            year: row.get(5)?,
        })
    }

    fn into_expense(self) -> Result<Expense> {
        Ok(Expense {
            identifier: self.identifier,
            amount: self.amount,
            concept: self.concept,
            occurred_at: parse_datetime(&self.occurred_at)?,
            week_number: self.week_number,
            year: self.year,
        })
    }
}

impl Database {
    /// Insert a new expense, assigning its identifier
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<Expense> {
        let now = Utc::now();
        let resolved = expense.resolve(now)?;
        let identifier =
            generate_identifier(resolved.amount, &resolved.concept, resolved.week, now);
        let stored = resolved.into_expense(identifier);

        let conn = self.conn()?;
        conn.execute(
            &format!("INSERT INTO expenses ({}) VALUES (?, ?, ?, ?, ?, ?)", EXPENSE_COLUMNS),
            params![
                stored.identifier,
                stored.amount,
                stored.concept,
                stored.occurred_at.to_rfc3339(),
                stored.week_number,
                stored.year,
            ],
        )?;

        Ok(stored)
    }

    /// Insert or replace an expense under its own identifier
    pub fn upsert_expense(&self, expense: &Expense) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO expenses (identifier, amount, concept, occurred_at, week_number, year)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(identifier) DO UPDATE SET
                amount = excluded.amount,
                concept = excluded.concept,
                occurred_at = excluded.occurred_at,
                week_number = excluded.week_number,
                year = excluded.year
            "#,
            params![
                expense.identifier,
                expense.amount,
                expense.concept,
                expense.occurred_at.to_rfc3339(),
                expense.week_number,
                expense.year,
            ],
        )?;
        Ok(())
    }

    /// Get a single expense by identifier
    pub fn get_expense(&self, identifier: &str) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE identifier = ?",
            EXPENSE_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![identifier], ExpenseRow::from_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?.into_expense()?)),
            None => Ok(None),
        }
    }

    /// List the expenses of one week, oldest first
    pub fn list_expenses_for_week(&self, week: WeekKey) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE year = ? AND week_number = ? ORDER BY occurred_at, identifier",
            EXPENSE_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![week.year, week.week], ExpenseRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(ExpenseRow::into_expense).collect()
    }

    /// List every expense in week order
    pub fn list_expenses(&self) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses ORDER BY year, week_number, occurred_at, identifier",
            EXPENSE_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], ExpenseRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(ExpenseRow::into_expense).collect()
    }

    /// Delete an expense. Returns whether a row was removed.
    pub fn delete_expense(&self, identifier: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE identifier = ?",
            params![identifier],
        )?;
        Ok(deleted > 0)
    }

    /// Count stored expenses
    pub fn count_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl ExpenseStore for Database {
    fn insert(&self, expense: &NewExpense) -> Result<Expense> {
        self.insert_expense(expense)
    }

    fn find_by_week(&self, week: WeekKey) -> Result<Vec<Expense>> {
        self.list_expenses_for_week(week)
    }

    fn find_all(&self) -> Result<Vec<Expense>> {
        self.list_expenses()
    }

    fn delete_by_id(&self, identifier: &str) -> Result<bool> {
        self.delete_expense(identifier)
    }

    fn upsert(&self, expense: &Expense) -> Result<()> {
        self.upsert_expense(expense)
    }
}
