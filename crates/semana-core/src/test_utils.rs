//! Test utilities for semana-core
//!
//! An in-memory store implementing both storage traits, with a switch that
//! makes every call fail as if the backing store were unreachable.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use crate::budget::BudgetBook;
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};
use crate::store::{generate_identifier, BudgetStore, ExpenseStore};
use crate::week::WeekKey;

/// In-memory expense and budget store
#[derive(Default)]
pub struct MemoryStore {
    expenses: Mutex<Vec<Expense>>,
    budgets: Mutex<BudgetBook>,
    offline: AtomicBool,
    upserts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `expenses`
    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: Mutex::new(expenses),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of the stored expenses
    pub fn stored(&self) -> Vec<Expense> {
        self.lock_expenses().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of successful upserts so far
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("memory store is offline".into()));
        }
        Ok(())
    }

    fn lock_expenses(&self) -> Result<std::sync::MutexGuard<'_, Vec<Expense>>> {
        self.expenses
            .lock()
            .map_err(|_| Error::StoreUnavailable("expense lock poisoned".into()))
    }
}

impl ExpenseStore for MemoryStore {
    fn insert(&self, expense: &NewExpense) -> Result<Expense> {
        self.check_online()?;
        let now = Utc::now();
        let resolved = expense.resolve(now)?;
        let id = generate_identifier(resolved.amount, &resolved.concept, resolved.week, now);
        let stored = resolved.into_expense(id);
        self.lock_expenses()?.push(stored.clone());
        Ok(stored)
    }

    fn find_by_week(&self, week: WeekKey) -> Result<Vec<Expense>> {
        self.check_online()?;
        Ok(self
            .lock_expenses()?
            .iter()
            .filter(|e| e.week_key() == week)
            .cloned()
            .collect())
    }

    fn find_all(&self) -> Result<Vec<Expense>> {
        self.check_online()?;
        Ok(self.lock_expenses()?.clone())
    }

    fn delete_by_id(&self, identifier: &str) -> Result<bool> {
        self.check_online()?;
        let mut expenses = self.lock_expenses()?;
        let before = expenses.len();
        expenses.retain(|e| e.identifier != identifier);
        Ok(expenses.len() != before)
    }

    fn upsert(&self, expense: &Expense) -> Result<()> {
        self.check_online()?;
        let mut expenses = self.lock_expenses()?;
        match expenses
            .iter_mut()
            .find(|e| e.identifier == expense.identifier)
        {
            Some(existing) => *existing = expense.clone(),
            None => expenses.push(expense.clone()),
        }
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl BudgetStore for MemoryStore {
    fn load_budgets(&self) -> Result<BudgetBook> {
        self.check_online()?;
        self.budgets
            .lock()
            .map(|b| b.clone())
            .map_err(|_| Error::StoreUnavailable("budget lock poisoned".into()))
    }

    fn save_budgets(&self, book: &BudgetBook) -> Result<()> {
        self.check_online()?;
        let mut budgets = self
            .budgets
            .lock()
            .map_err(|_| Error::StoreUnavailable("budget lock poisoned".into()))?;
        *budgets = book.clone();
        Ok(())
    }
}
