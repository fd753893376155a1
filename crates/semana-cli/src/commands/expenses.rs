//! Expense command implementations

use anyhow::{bail, Context, Result};
use semana_core::{
    current_week, week_key_of, Command, CommandOutcome, Database, Expense, ExpenseStore,
    NewExpense, Session,
};

use super::{format_remaining, parse_date_arg, parse_week_arg, truncate};

pub fn cmd_add(
    db: Database,
    amount: f64,
    concept: &str,
    week: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let mut new = NewExpense::new(amount, concept);

    let date = date.map(parse_date_arg).transpose()?;
    if let Some(date) = date {
        let noon = date
            .and_hms_opt(12, 0, 0)
            .context("Invalid time of day")?
            .and_utc();
        new.occurred_at = Some(noon);
    }

    let target = match week {
        Some(raw) => {
            let key = parse_week_arg(raw)?;
            new = new.in_week(key);
            key
        }
        None => date.map(week_key_of).unwrap_or_else(current_week),
    };

    let mut session = Session::open(db, target).context("Failed to load expenses")?;
    let stored = match session.execute(Command::AddExpense(new))? {
        CommandOutcome::Added(stored) => stored,
        other => bail!("Unexpected result: {:?}", other),
    };

    println!(
        "✅ Logged ${:.2} \"{}\" in week {} ({})",
        stored.amount,
        stored.concept,
        stored.week_key(),
        stored.identifier
    );

    let overview = session.overview();
    println!(
        "   Remaining this week: {} of ${:.2}",
        format_remaining(overview.remaining),
        overview.budget
    );
    if overview.exhausted {
        println!("   ⚠️  Budget exhausted; the excess carries into next week");
    }

    Ok(())
}

pub fn cmd_list(db: &Database, week: &str, all: bool, json: bool) -> Result<()> {
    let expenses = if all {
        db.find_all()?
    } else {
        db.find_by_week(parse_week_arg(week)?)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&expenses)?);
        return Ok(());
    }

    if expenses.is_empty() {
        println!("No expenses found. Log one with:");
        println!("  semana add 120 \"Super\"");
        return Ok(());
    }

    println!();
    println!("📝 Expenses");
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in &expenses {
        print_expense(expense);
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {} expense(s), ${:.2} total", expenses.len(), total);

    Ok(())
}

fn print_expense(expense: &Expense) {
    let marker = if expense.is_carry_over() { "↪" } else { " " };
    println!(
        "   {} │ {} │ {:>10} │ {} {}",
        expense.week_key(),
        expense.occurred_at.format("%Y-%m-%d"),
        format!("${:.2}", expense.amount),
        marker,
        truncate(&expense.concept, 36)
    );
    println!("           id: {}", expense.identifier);
}

pub fn cmd_delete(db: Database, identifier: &str) -> Result<()> {
    let mut session = Session::open(db, current_week()).context("Failed to load expenses")?;

    match session.execute(Command::DeleteExpense(identifier.to_string()))? {
        CommandOutcome::Deleted(id) => {
            println!("✓ Deleted expense {}", id);
            Ok(())
        }
        CommandOutcome::NotFound(id) => bail!("Expense not found: {}", id),
        other => bail!("Unexpected result: {:?}", other),
    }
}
