//! Derived totals for a single week

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::budget::BudgetBook;
use crate::models::Expense;
use crate::week::WeekKey;

/// Budget position of one week
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekOverview {
    pub week: WeekKey,
    /// Monday of the week
    pub starts_on: Option<NaiveDate>,
    /// Sunday of the week
    pub ends_on: Option<NaiveDate>,
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    /// Nothing left to spend
    pub exhausted: bool,
    pub summary: WeeklySummary,
    pub expenses: Vec<Expense>,
}

/// Statistics over a week's expenses
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub count: usize,
    pub total: f64,
    pub average: f64,
    /// Weekday with the largest summed amount, by when expenses were logged
    pub busiest_day: Option<Weekday>,
    pub budget_used_percent: f64,
}

impl WeekOverview {
    /// Build the overview of `week` from any set of expenses.
    ///
    /// Expenses attributed to other weeks are ignored.
    pub fn build(week: WeekKey, expenses: &[Expense], budgets: &BudgetBook) -> Self {
        let mut in_week: Vec<Expense> = expenses
            .iter()
            .filter(|e| e.week_key() == week)
            .cloned()
            .collect();
        in_week.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at));

        let budget = budgets.budget_for(week);
        let summary = WeeklySummary::compute(&in_week, budget);
        let spent = summary.total;
        let remaining = budget - spent;

        Self {
            week,
            starts_on: week.first_day(),
            ends_on: week.last_day(),
            budget,
            spent,
            remaining,
            exhausted: remaining <= 0.0,
            summary,
            expenses: in_week,
        }
    }
}

impl WeeklySummary {
    pub fn compute(expenses: &[Expense], budget: f64) -> Self {
        let count = expenses.len();
        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let average = if count > 0 { total / count as f64 } else { 0.0 };
        let budget_used_percent = if budget > 0.0 {
            total / budget * 100.0
        } else {
            0.0
        };

        Self {
            count,
            total,
            average,
            busiest_day: busiest_day(expenses),
            budget_used_percent,
        }
    }
}

/// Weekday with the most spend. Ties go to the earlier day, Monday first.
fn busiest_day(expenses: &[Expense]) -> Option<Weekday> {
    let mut by_day: [Option<f64>; 7] = [None; 7];
    for expense in expenses {
        let day = expense.occurred_at.weekday().num_days_from_monday() as usize;
        *by_day[day].get_or_insert(0.0) += expense.amount;
    }

    let mut best: Option<(usize, f64)> = None;
    for (day, total) in by_day.iter().enumerate() {
        let Some(total) = *total else { continue };
        if best.map_or(true, |(_, top)| total > top) {
            best = Some((day, total));
        }
    }

    best.map(|(day, _)| weekday_from_monday(day))
}

fn weekday_from_monday(days: usize) -> Weekday {
    match days {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// Spanish name of a weekday, as shown to users
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BudgetScope;
    use chrono::{TimeZone, Utc};

    // 2024-W05 runs Monday 29 Jan to Sunday 4 Feb
    fn expense(id: &str, amount: f64, day: u32, month: u32) -> Expense {
        Expense {
            identifier: id.to_string(),
            amount,
            concept: id.to_string(),
            occurred_at: Utc.with_ymd_and_hms(2024, month, day, 10, 0, 0).unwrap(),
            week_number: 5,
            year: 2024,
        }
    }

    fn week5() -> WeekKey {
        WeekKey { year: 2024, week: 5 }
    }

    #[test]
    fn test_overview_totals() {
        let expenses = vec![
            expense("a", 500.0, 29, 1),
            expense("b", 250.0, 30, 1),
            expense("c", 250.0, 30, 1),
        ];
        let overview = WeekOverview::build(week5(), &expenses, &BudgetBook::default());

        assert_eq!(overview.budget, 2000.0);
        assert_eq!(overview.spent, 1000.0);
        assert_eq!(overview.remaining, 1000.0);
        assert!(!overview.exhausted);
        assert_eq!(overview.summary.count, 3);
        assert!((overview.summary.average - 333.333).abs() < 0.01);
        assert_eq!(overview.summary.budget_used_percent, 50.0);
        assert_eq!(overview.starts_on, NaiveDate::from_ymd_opt(2024, 1, 29));
        assert_eq!(overview.ends_on, NaiveDate::from_ymd_opt(2024, 2, 4));
    }

    #[test]
    fn test_overview_ignores_other_weeks() {
        let mut other = expense("x", 900.0, 5, 2);
        other.week_number = 6;
        let expenses = vec![expense("a", 100.0, 29, 1), other];

        let overview = WeekOverview::build(week5(), &expenses, &BudgetBook::default());
        assert_eq!(overview.expenses.len(), 1);
        assert_eq!(overview.spent, 100.0);
    }

    #[test]
    fn test_exhausted_at_exact_budget() {
        let mut budgets = BudgetBook::default();
        budgets.set_budget(300.0, BudgetScope::ThisWeek, week5())
            .unwrap();
        let expenses = vec![expense("a", 300.0, 29, 1)];

        let overview = WeekOverview::build(week5(), &expenses, &budgets);
        assert_eq!(overview.remaining, 0.0);
        assert!(overview.exhausted);
    }

    #[test]
    fn test_empty_week() {
        let overview = WeekOverview::build(week5(), &[], &BudgetBook::default());
        assert_eq!(overview.summary.count, 0);
        assert_eq!(overview.summary.average, 0.0);
        assert_eq!(overview.summary.busiest_day, None);
        assert_eq!(overview.summary.budget_used_percent, 0.0);
        assert_eq!(overview.remaining, 2000.0);
    }

    #[test]
    fn test_busiest_day() {
        let expenses = vec![
            expense("mon", 100.0, 29, 1),
            expense("wed1", 80.0, 31, 1),
            expense("wed2", 80.0, 31, 1),
            expense("sun", 150.0, 4, 2),
        ];
        let summary = WeeklySummary::compute(&expenses, 2000.0);
        assert_eq!(summary.busiest_day, Some(Weekday::Wed));
    }

    #[test]
    fn test_busiest_day_tie_goes_to_earlier_day() {
        let expenses = vec![expense("fri", 200.0, 2, 2), expense("tue", 200.0, 30, 1)];
        let summary = WeeklySummary::compute(&expenses, 2000.0);
        assert_eq!(summary.busiest_day, Some(Weekday::Tue));
    }

    #[test]
    fn test_busiest_day_with_only_refunds() {
        let expenses = vec![expense("thu", -50.0, 1, 2)];
        let summary = WeeklySummary::compute(&expenses, 2000.0);
        assert_eq!(summary.busiest_day, Some(Weekday::Thu));
    }

    #[test]
    fn test_zero_budget_percent() {
        let summary = WeeklySummary::compute(&[expense("a", 10.0, 29, 1)], 0.0);
        assert_eq!(summary.budget_used_percent, 0.0);
    }

    #[test]
    fn test_overview_json() {
        let overview = WeekOverview::build(
            week5(),
            &[expense("a", 100.0, 29, 1)],
            &BudgetBook::default(),
        );
        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["week"]["week"], 5);
        assert_eq!(json["startsOn"], "2024-01-29");
        assert_eq!(json["summary"]["busiestDay"], "Mon");
        assert_eq!(json["summary"]["budgetUsedPercent"], 5.0);
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(Weekday::Wed), "miércoles");
    }
}
