//! Weekly budget resolution
//!
//! A [`BudgetBook`] holds the default weekly budget plus per-week overrides.
//! It is a plain value: callers own it and pass it to whatever needs to
//! resolve a budget (the carry-over engine, the weekly summary, the server
//! state, a CLI session).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::week::WeekKey;

/// Default weekly budget for a fresh book
pub const DEFAULT_WEEKLY_BUDGET: f64 = 2000.0;

/// How far a budget edit reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetScope {
    /// Override only the given week
    ThisWeek,
    /// Change the default and drop overrides from the given week on
    AllFuture,
}

impl BudgetScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThisWeek => "this_week",
            Self::AllFuture => "all_future",
        }
    }
}

impl std::str::FromStr for BudgetScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "this_week" | "week" => Ok(Self::ThisWeek),
            "all_future" | "future" | "all" => Ok(Self::AllFuture),
            _ => Err(format!(
                "Unknown budget scope: {} (valid: this_week, all_future)",
                s
            )),
        }
    }
}

impl std::fmt::Display for BudgetScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A per-week budget override
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverride {
    pub year: i32,
    pub week: u32,
    pub amount: f64,
}

/// Default budget plus per-week overrides.
///
/// "All future" edits do not rewrite history: each one schedules a new default
/// effective from the week it was made at, so earlier weeks without an
/// override keep resolving to the default that applied to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BudgetBookRepr", into = "BudgetBookRepr")]
pub struct BudgetBook {
    base_default: f64,
    default_changes: BTreeMap<WeekKey, f64>,
    overrides: BTreeMap<WeekKey, f64>,
}

impl Default for BudgetBook {
    fn default() -> Self {
        Self::new(DEFAULT_WEEKLY_BUDGET)
    }
}

impl BudgetBook {
    pub fn new(default: f64) -> Self {
        Self {
            base_default: default,
            default_changes: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }

    /// Rebuild a book from stored parts
    pub fn from_parts(
        base_default: f64,
        default_changes: Vec<BudgetOverride>,
        overrides: Vec<BudgetOverride>,
    ) -> Self {
        Self {
            base_default,
            default_changes: from_entries(default_changes),
            overrides: from_entries(overrides),
        }
    }

    /// The default before any "all future" edit
    pub fn base_default(&self) -> f64 {
        self.base_default
    }

    /// The budget in effect for `week`
    pub fn budget_for(&self, week: WeekKey) -> f64 {
        self.overrides
            .get(&week)
            .copied()
            .unwrap_or_else(|| self.default_for(week))
    }

    /// The default that applies to `week`, ignoring overrides
    pub fn default_for(&self, week: WeekKey) -> f64 {
        self.default_changes
            .range(..=week)
            .next_back()
            .map(|(_, amount)| *amount)
            .unwrap_or(self.base_default)
    }

    /// The most recently set default
    pub fn default_amount(&self) -> f64 {
        self.default_changes
            .values()
            .next_back()
            .copied()
            .unwrap_or(self.base_default)
    }

    pub fn override_for(&self, week: WeekKey) -> Option<f64> {
        self.overrides.get(&week).copied()
    }

    /// Overrides in week order
    pub fn overrides(&self) -> Vec<BudgetOverride> {
        to_entries(&self.overrides)
    }

    /// Scheduled default changes in week order
    pub fn default_changes(&self) -> Vec<BudgetOverride> {
        to_entries(&self.default_changes)
    }

    /// Apply a budget edit made while looking at week `at`
    pub fn set_budget(&mut self, amount: f64, scope: BudgetScope, at: WeekKey) -> Result<()> {
        if !amount.is_finite() {
            return Err(Error::Validation(
                "Budget amount must be a finite number".into(),
            ));
        }

        match scope {
            BudgetScope::ThisWeek => {
                self.overrides.insert(at, amount);
            }
            BudgetScope::AllFuture => {
                // Weeks from `at` on revert to the new default
                self.overrides.retain(|key, _| *key < at);
                self.default_changes.retain(|key, _| *key < at);
                self.default_changes.insert(at, amount);
            }
        }
        Ok(())
    }
}

fn to_entries(map: &BTreeMap<WeekKey, f64>) -> Vec<BudgetOverride> {
    map.iter()
        .map(|(key, amount)| BudgetOverride {
            year: key.year,
            week: key.week,
            amount: *amount,
        })
        .collect()
}

fn from_entries(entries: Vec<BudgetOverride>) -> BTreeMap<WeekKey, f64> {
    entries
        .into_iter()
        .map(|o| {
            (
                WeekKey {
                    year: o.year,
                    week: o.week,
                },
                o.amount,
            )
        })
        .collect()
}

/// Wire form of a budget book: maps as lists
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BudgetBookRepr {
    base_default: f64,
    #[serde(default)]
    default_changes: Vec<BudgetOverride>,
    #[serde(default)]
    overrides: Vec<BudgetOverride>,
}

impl From<BudgetBookRepr> for BudgetBook {
    fn from(repr: BudgetBookRepr) -> Self {
        Self::from_parts(repr.base_default, repr.default_changes, repr.overrides)
    }
}

impl From<BudgetBook> for BudgetBookRepr {
    fn from(book: BudgetBook) -> Self {
        Self {
            base_default: book.base_default,
            default_changes: book.default_changes(),
            overrides: book.overrides(),
        }
    }
}
