//! Verse of the day command

use anyhow::Result;
use chrono::Utc;
use semana_core::verse_for;

use super::parse_date_arg;

pub fn cmd_verse(date: Option<&str>) -> Result<()> {
    let date = match date {
        Some(raw) => parse_date_arg(raw)?,
        None => Utc::now().date_naive(),
    };
    let verse = verse_for(date);

    println!();
    println!("✝  {}", verse.reference);
    println!("   \"{}\"", verse.text);

    Ok(())
}
