//! Deficit carry-over between weeks
//!
//! When a week's spend exceeds its budget, the excess is logged as an expense
//! in the following week. Each source week owns exactly one carry-over entry,
//! identified by `deficit-{year}-{week}`, whose amount tracks the current
//! deficit. Entries are never retracted when a deficit disappears.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::budget::BudgetBook;
use crate::error::Result;
use crate::models::{Expense, CARRY_OVER_ID_PREFIX, CARRY_OVER_MARKER};
use crate::store::ExpenseStore;
use crate::week::WeekKey;

/// Upper bound on passes in [`reconcile`]
pub const MAX_RECONCILE_PASSES: usize = 64;

/// Changes made by one or more carry-over passes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarryOverReport {
    /// Identifiers of carry-over entries appended to the set
    pub created: Vec<String>,
    /// Identifiers of carry-over entries whose amount was corrected
    pub updated: Vec<String>,
}

impl CarryOverReport {
    /// No change means the set was already at a fixpoint
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty()
    }

    /// Identifiers touched, without duplicates, in first-touched order
    pub fn touched(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.created.iter().chain(self.updated.iter()) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }

    fn merge(&mut self, other: CarryOverReport) {
        for id in other.created {
            if !self.created.contains(&id) {
                self.created.push(id);
            }
        }
        for id in other.updated {
            if !self.created.contains(&id) && !self.updated.contains(&id) {
                self.updated.push(id);
            }
        }
    }
}

/// Identifier of the carry-over entry owned by `source`
pub fn carry_over_id(source: WeekKey) -> String {
    format!("{}{}-{}", CARRY_OVER_ID_PREFIX, source.year, source.week)
}

/// Concept text of the carry-over entry owned by `source`
pub fn carry_over_concept(source: WeekKey) -> String {
    format!(
        "{} de la semana {}, {}",
        CARRY_OVER_MARKER, source.week, source.year
    )
}

/// Run a single carry-over pass over `expenses`.
///
/// Week totals are taken from the set as it was when the pass started, so a
/// deficit carried into a week during this pass is only seen by the next one.
pub fn carry_over(
    expenses: &mut Vec<Expense>,
    budgets: &BudgetBook,
    now: DateTime<Utc>,
) -> CarryOverReport {
    let mut totals: BTreeMap<WeekKey, f64> = BTreeMap::new();
    for expense in expenses.iter() {
        *totals.entry(expense.week_key()).or_insert(0.0) += expense.amount;
    }

    let mut report = CarryOverReport::default();

    for (week, spent) in totals {
        let deficit = spent - budgets.budget_for(week);
        if deficit <= 0.0 {
            continue;
        }

        let Some(target) = week.carry_over_target() else {
            warn!("Week {} has no following week, skipping its deficit", week);
            continue;
        };
        let id = carry_over_id(week);

        match expenses.iter_mut().find(|e| e.identifier == id) {
            Some(existing) => {
                if existing.amount != deficit {
                    debug!(
                        "Correcting carry-over {} from {:.2} to {:.2}",
                        id, existing.amount, deficit
                    );
                    existing.amount = deficit;
                    report.updated.push(id);
                }
            }
            None => {
                debug!("Carrying {:.2} from week {} into {}", deficit, week, target);
                expenses.push(Expense {
                    identifier: id.clone(),
                    amount: deficit,
                    concept: carry_over_concept(week),
                    occurred_at: now,
                    week_number: target.week,
                    year: target.year,
                });
                report.created.push(id);
            }
        }
    }

    report
}

/// Repeat carry-over passes until one makes no change.
///
/// Gives up after [`MAX_RECONCILE_PASSES`]; that only happens when a budget
/// is zero or negative and every carried deficit produces a new one.
pub fn reconcile(
    expenses: &mut Vec<Expense>,
    budgets: &BudgetBook,
    now: DateTime<Utc>,
) -> CarryOverReport {
    let mut total = CarryOverReport::default();

    for _ in 0..MAX_RECONCILE_PASSES {
        let pass = carry_over(expenses, budgets, now);
        if pass.is_empty() {
            return total;
        }
        total.merge(pass);
    }

    warn!(
        "Carry-over did not settle after {} passes, stopping",
        MAX_RECONCILE_PASSES
    );
    total
}

/// Reconcile everything in `store` and persist the carry-over entries that
/// were created or corrected. Returns the reconciled set.
pub fn sync_store<S: ExpenseStore + ?Sized>(
    store: &S,
    budgets: &BudgetBook,
    now: DateTime<Utc>,
) -> Result<(Vec<Expense>, CarryOverReport)> {
    let mut expenses = store.find_all()?;
    let report = reconcile(&mut expenses, budgets, now);

    let touched = report.touched();
    for id in &touched {
        if let Some(entry) = expenses.iter().find(|e| &e.identifier == id) {
            store.upsert(entry)?;
        }
    }

    if !touched.is_empty() {
        info!(
            "Carry-over sync: {} created, {} corrected",
            report.created.len(),
            report.updated.len()
        );
    }

    Ok((expenses, report))
}
