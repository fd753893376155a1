//! Domain models for Semana

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::week::{week_key_of_instant, WeekKey};

/// Marker contained in the concept of every carry-over entry
pub const CARRY_OVER_MARKER: &str = "Excedente";

/// Prefix of the deterministic identifier of carry-over entries
pub const CARRY_OVER_ID_PREFIX: &str = "deficit-";

/// A logged expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub identifier: String,
    /// Positive values are spend
    pub amount: f64,
    pub concept: String,
    /// When the expense was logged (not necessarily the spend date)
    pub occurred_at: DateTime<Utc>,
    pub week_number: u32,
    pub year: i32,
}

impl Expense {
    /// The ISO week this expense is attributed to
    pub fn week_key(&self) -> WeekKey {
        WeekKey {
            year: self.year,
            week: self.week_number,
        }
    }

    /// Whether this entry was synthesized by the carry-over engine
    pub fn is_carry_over(&self) -> bool {
        self.concept.contains(CARRY_OVER_MARKER)
    }
}

/// An expense that has not been stored yet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: f64,
    pub concept: String,
    /// Defaults to now
    pub occurred_at: Option<DateTime<Utc>>,
    /// Must be given together with `year`; derived from `occurred_at` otherwise
    pub week_number: Option<u32>,
    pub year: Option<i32>,
}

impl NewExpense {
    pub fn new(amount: f64, concept: impl Into<String>) -> Self {
        Self {
            amount,
            concept: concept.into(),
            ..Default::default()
        }
    }

    /// Attribute the expense to a specific week
    pub fn in_week(mut self, week: WeekKey) -> Self {
        self.week_number = Some(week.week);
        self.year = Some(week.year);
        self
    }

    /// Check required fields and resolve the timestamp and week attribution
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<ResolvedExpense> {
        if !self.amount.is_finite() {
            return Err(Error::Validation("Amount must be a finite number".into()));
        }
        let concept = self.concept.trim();
        if concept.is_empty() {
            return Err(Error::Validation("Concept is required".into()));
        }

        let occurred_at = self.occurred_at.unwrap_or(now);
        let week = match (self.week_number, self.year) {
            (Some(week), Some(year)) => WeekKey::new(year, week)?,
            (None, None) => week_key_of_instant(occurred_at),
            _ => {
                return Err(Error::Validation(
                    "weekNumber and year must be provided together".into(),
                ))
            }
        };

        Ok(ResolvedExpense {
            amount: self.amount,
            concept: concept.to_string(),
            occurred_at,
            week,
        })
    }
}

/// A validated expense, ready for the store to assign an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExpense {
    pub amount: f64,
    pub concept: String,
    pub occurred_at: DateTime<Utc>,
    pub week: WeekKey,
}

impl ResolvedExpense {
    pub fn into_expense(self, identifier: String) -> Expense {
        Expense {
            identifier,
            amount: self.amount,
            concept: self.concept,
            occurred_at: self.occurred_at,
            week_number: self.week.week,
            year: self.week.year,
        }
    }
}

/// A devotional verse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verse {
    pub reference: &'static str,
    pub text: &'static str,
}
