//! SQLite storage with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `expenses` - Expense records and the `ExpenseStore` implementation
//! - `budgets` - Default budget, scheduled defaults and per-week overrides

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info};

use crate::error::{Error, Result};

mod budgets;
mod expenses;


pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable holding the store connection string
pub const DB_URL_ENV: &str = "SEMANA_DB";

/// Scheme prefix accepted in connection strings
const SQLITE_SCHEME: &str = "sqlite://";

/// Parse an RFC 3339 timestamp stored by this module
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidData(format!("Bad timestamp '{}': {}", s, e)))
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open a database from a connection string (`sqlite://path` or a plain path)
    pub fn connect(url: &str) -> Result<Self> {
        let path = url.strip_prefix(SQLITE_SCHEME).unwrap_or(url).trim();
        if path.is_empty() {
            return Err(Error::Validation(format!(
                "Empty database path in '{}'",
                url
            )));
        }
        Self::new(path)
    }

    /// Create a connection pool over the file at `path`, creating it if needed
    pub fn new(path: &str) -> Result<Self> {
        // Concurrent writers wait for the lock instead of failing with SQLITE_BUSY
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.busy_timeout(std::time::Duration::from_secs(5)));
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;
        debug!("Opened database at {}", path);

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same data.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "semana_test_{}_{}.db",
            std::process::id(),
            id
        ));
        let path = path.to_string_lossy().into_owned();

        // Remove any leftover file from an earlier run
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Delete every expense and budget setting
    pub fn reset(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            DELETE FROM expenses;
            DELETE FROM budget_overrides;
            DELETE FROM budget_default_changes;
            DELETE FROM budget_settings;
            "#,
        )?;

        info!("Database reset complete");
        Ok(())
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Expenses, attributed to an ISO week
            CREATE TABLE IF NOT EXISTS expenses (
                identifier TEXT PRIMARY KEY,
                amount REAL NOT NULL,
                concept TEXT NOT NULL,
                occurred_at TEXT NOT NULL,
                week_number INTEGER NOT NULL CHECK (week_number BETWEEN 1 AND 53),
                year INTEGER NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_week ON expenses(year, week_number);

            -- Scalar budget settings (base default)
            CREATE TABLE IF NOT EXISTS budget_settings (
                key TEXT PRIMARY KEY,
                value REAL NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Defaults set with "all future" scope, effective from their week
            CREATE TABLE IF NOT EXISTS budget_default_changes (
                year INTEGER NOT NULL,
                week_number INTEGER NOT NULL,
                amount REAL NOT NULL,
                PRIMARY KEY (year, week_number)
            );

            -- Single-week overrides
            CREATE TABLE IF NOT EXISTS budget_overrides (
                year INTEGER NOT NULL,
                week_number INTEGER NOT NULL,
                amount REAL NOT NULL,
                PRIMARY KEY (year, week_number)
            );
            "#,
        )?;

        Ok(())
    }
}
