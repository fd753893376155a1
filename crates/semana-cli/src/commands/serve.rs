//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

/// Split a comma separated origin list
pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub async fn cmd_serve(
    db_url: &str,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allowed_origins: Option<&str>,
) -> Result<()> {
    let allowed_origins = parse_origins(allowed_origins);

    println!("🚀 Starting Semana web server...");
    println!("   Database: {}", db_url);
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS: {}", allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_url)?;

    let config = semana_server::ServerConfig { allowed_origins };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    semana_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
