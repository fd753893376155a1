//! Budget command implementations

use anyhow::{anyhow, Context, Result};
use semana_core::{BudgetScope, BudgetStore, Command, Database, Session};

use super::parse_week_arg;

pub fn cmd_budget_show(db: &Database, week: &str) -> Result<()> {
    let week = parse_week_arg(week)?;
    let book = db.load_budgets()?;

    println!();
    println!("💰 Budget for week {}", week);
    println!("   ─────────────────────────────");
    println!("   Amount:  ${:.2}", book.budget_for(week));
    match book.override_for(week) {
        Some(_) => println!("   Source:  override for this week"),
        None => println!("   Source:  default"),
    }
    println!("   Current default: ${:.2}", book.default_amount());

    let overrides = book.overrides();
    if !overrides.is_empty() {
        println!();
        println!("   Overrides:");
        for o in overrides {
            println!("     {}-{:02}  ${:.2}", o.year, o.week, o.amount);
        }
    }

    Ok(())
}

pub fn cmd_budget_set(db: Database, amount: f64, scope: &str, week: &str) -> Result<()> {
    let scope: BudgetScope = scope.parse().map_err(|e: String| anyhow!(e))?;
    let week = parse_week_arg(week)?;

    let mut session = Session::open(db, week).context("Failed to load budget")?;
    session.execute(Command::UpdateBudget {
        amount,
        scope,
        week,
    })?;

    match scope {
        BudgetScope::ThisWeek => {
            println!("✓ Budget for week {} set to ${:.2}", week, amount)
        }
        BudgetScope::AllFuture => {
            println!(
                "✓ Default budget set to ${:.2} from week {} on",
                amount, week
            )
        }
    }

    let overview = session.overview();
    println!(
        "   Week {}: ${:.2} spent, ${:.2} remaining",
        week, overview.spent, overview.remaining
    );

    Ok(())
}
