//! Week command implementations (overview, weeks, week-of)

use anyhow::Result;
use chrono::Utc;
use semana_core::summary::weekday_name;
use semana_core::{
    sync_store, week_key_of, week_selector, BudgetStore, Database, WeekOverview,
};

use super::{format_remaining, parse_date_arg, parse_week_arg, truncate};

pub fn cmd_overview(db: &Database, week: &str, json: bool) -> Result<()> {
    let week = parse_week_arg(week)?;
    let budgets = db.load_budgets()?;
    let (expenses, _) = sync_store(db, &budgets, Utc::now())?;
    let overview = WeekOverview::build(week, &expenses, &budgets);

    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│        📅 Semana {:<24}│", overview.week.to_string());
    println!("╰─────────────────────────────────────────╯");
    if let (Some(start), Some(end)) = (overview.starts_on, overview.ends_on) {
        println!("  {} → {}", start.format("%d %b"), end.format("%d %b %Y"));
    }
    println!();
    println!("  Budget:     ${:.2}", overview.budget);
    println!("  Spent:      ${:.2}", overview.spent);
    println!("  Remaining:  {}", format_remaining(overview.remaining));
    if overview.exhausted {
        println!("  ⚠️  Budget exhausted");
    }

    let summary = &overview.summary;
    println!();
    println!("  Expenses:        {}", summary.count);
    println!("  Average:         ${:.2}", summary.average);
    println!(
        "  Busiest day:     {}",
        summary.busiest_day.map(weekday_name).unwrap_or("N/A")
    );
    println!("  Budget used:     {:.1}%", summary.budget_used_percent);

    if !overview.expenses.is_empty() {
        println!();
        for expense in &overview.expenses {
            println!(
                "  {:>10}  {}",
                format!("${:.2}", expense.amount),
                truncate(&expense.concept, 40)
            );
        }
    }

    Ok(())
}

pub fn cmd_weeks(from: Option<&str>, to: Option<&str>) -> Result<()> {
    let from = from.map(parse_week_arg).transpose()?;
    let to = to.map(parse_week_arg).transpose()?;

    for week in week_selector(from, to)? {
        println!(
            "{}  {} - {}",
            week.key,
            week.starts_on.format("%d %b"),
            week.ends_on.format("%d %b %Y")
        );
    }

    Ok(())
}

pub fn cmd_week_of(date: Option<&str>) -> Result<()> {
    let date = match date {
        Some(raw) => parse_date_arg(raw)?,
        None => Utc::now().date_naive(),
    };
    let week = week_key_of(date);
    println!("{} is in week {} (week {} of {})", date, week, week.week, week.year);
    Ok(())
}
