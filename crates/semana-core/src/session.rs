//! Optimistic working set over a store
//!
//! A [`Session`] keeps every expense and the budget book in memory. Each
//! [`Command`] is applied to the working set first, then sent to the store;
//! if the store rejects it the working set is put back exactly as it was.
//! Carry-over entries are reconciled after every successful command.

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::budget::{BudgetBook, BudgetScope};
use crate::carry_over::{reconcile, CarryOverReport};
use crate::error::Result;
use crate::models::{Expense, NewExpense};
use crate::store::{BudgetStore, ExpenseStore};
use crate::summary::WeekOverview;
use crate::week::WeekKey;

/// Prefix of placeholder identifiers used until the store assigns one
pub const PENDING_ID_PREFIX: &str = "pending-";

/// A user intent against the working set
#[derive(Debug, Clone)]
pub enum Command {
    AddExpense(NewExpense),
    DeleteExpense(String),
    UpdateBudget {
        amount: f64,
        scope: BudgetScope,
        week: WeekKey,
    },
    SelectWeek(WeekKey),
}

/// What a successful command did
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Added(Expense),
    Deleted(String),
    BudgetUpdated,
    WeekSelected(WeekKey),
    /// The record to delete was not in the store; nothing changed
    NotFound(String),
}

struct Snapshot {
    expenses: Vec<Expense>,
    budgets: BudgetBook,
}

pub struct Session<S> {
    store: S,
    expenses: Vec<Expense>,
    budgets: BudgetBook,
    week: WeekKey,
    next_pending: u64,
}

impl<S: ExpenseStore + BudgetStore> Session<S> {
    /// Load everything from `store` and reconcile carry-overs
    pub fn open(store: S, week: WeekKey) -> Result<Self> {
        let expenses = store.find_all()?;
        let budgets = store.load_budgets()?;

        let mut session = Self {
            store,
            expenses,
            budgets,
            week,
            next_pending: 0,
        };
        session.settle();
        Ok(session)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn budgets(&self) -> &BudgetBook {
        &self.budgets
    }

    /// The week being looked at
    pub fn week(&self) -> WeekKey {
        self.week
    }

    /// Overview of the active week
    pub fn overview(&self) -> WeekOverview {
        WeekOverview::build(self.week, &self.expenses, &self.budgets)
    }

    /// Apply a command, reverting the working set if the store fails
    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
        let snapshot = self.snapshot();

        let outcome = match self.apply(command) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Command failed, reverting: {}", e);
                self.restore(snapshot);
                return Err(e);
            }
        };

        if let CommandOutcome::NotFound(id) = &outcome {
            debug!("Expense {} not found in store, reverting", id);
            self.restore(snapshot);
            return Ok(outcome);
        }

        self.settle();
        Ok(outcome)
    }

    fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        match command {
            Command::AddExpense(new) => {
                let resolved = new.resolve(Utc::now())?;
                let placeholder = format!("{}{}", PENDING_ID_PREFIX, self.next_pending);
                self.next_pending += 1;
                self.expenses
                    .push(resolved.into_expense(placeholder.clone()));

                let stored = self.store.insert(&new)?;
                if let Some(slot) = self
                    .expenses
                    .iter_mut()
                    .find(|e| e.identifier == placeholder)
                {
                    *slot = stored.clone();
                }
                Ok(CommandOutcome::Added(stored))
            }
            Command::DeleteExpense(identifier) => {
                self.expenses.retain(|e| e.identifier != identifier);
                if self.store.delete_by_id(&identifier)? {
                    Ok(CommandOutcome::Deleted(identifier))
                } else {
                    Ok(CommandOutcome::NotFound(identifier))
                }
            }
            Command::UpdateBudget {
                amount,
                scope,
                week,
            } => {
                self.budgets.set_budget(amount, scope, week)?;
                self.store.save_budgets(&self.budgets)?;
                Ok(CommandOutcome::BudgetUpdated)
            }
            Command::SelectWeek(week) => {
                self.week = week;
                Ok(CommandOutcome::WeekSelected(week))
            }
        }
    }

    /// Reconcile carry-overs and persist what changed.
    ///
    /// Store failures here are logged; the entries stay in the working set
    /// and are written again by the next successful reconcile that touches them.
    fn settle(&mut self) -> CarryOverReport {
        let report = reconcile(&mut self.expenses, &self.budgets, Utc::now());
        for id in report.touched() {
            let Some(entry) = self.expenses.iter().find(|e| e.identifier == id) else {
                continue;
            };
            if let Err(e) = self.store.upsert(entry) {
                warn!("Failed to persist carry-over {}: {}", id, e);
            }
        }
        report
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            expenses: self.expenses.clone(),
            budgets: self.budgets.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.expenses = snapshot.expenses;
        self.budgets = snapshot.budgets;
    }
}
