//! Versioned schema migrations driven by a directory of SQL scripts.
//!
//! Scripts are named `<version>.<suffix>` and applied once, in ascending
//! version order. The `migrations` ledger keeps one row per successful run,
//! holding the highest version that run applied.

mod script;

use std::path::{Path, PathBuf};

use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbErr, Statement, TransactionTrait,
};

pub use script::{MigrationScript, discover};

const CREATE_LEDGER: &str = "CREATE TABLE IF NOT EXISTS migrations (version INTEGER NOT NULL)";
const CURRENT_VERSION: &str = "SELECT COALESCE(MAX(version), 0) AS version FROM migrations";
const RECORD_VERSION: &str = "INSERT INTO migrations (version) VALUES (?)";

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("migration database error: {0}")]
    Database(#[from] DbErr),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("migration file {name:?} does not start with an integer version")]
    InvalidFileName { name: String },
}

/// Outcome of a migration run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Ledger version before the run.
    pub from: i64,
    /// Ledger version after the run.
    pub to: i64,
    /// Versions whose scripts were executed, in order.
    pub applied: Vec<i64>,
}

/// Opens the store at `database_url`, applies pending scripts from `dir`
/// and closes the connection again.
pub async fn up(database_url: &str, dir: impl AsRef<Path>) -> Result<MigrationReport, MigrationError> {
    let db = Database::connect(database_url).await?;
    let result = run(&db, dir.as_ref()).await;
    let closed = db.close().await;

    let report = result?;
    closed?;
    tracing::info!(database_url, from = report.from, to = report.to, "migrations up");
    Ok(report)
}

/// Applies every script in `dir` newer than the ledger's maximum version.
///
/// Everything after the ledger's creation runs in one transaction, so a
/// failing statement leaves both the schema and the ledger untouched.
pub async fn run(db: &DatabaseConnection, dir: &Path) -> Result<MigrationReport, MigrationError> {
    db.execute_unprepared(CREATE_LEDGER).await?;

    let txn = db.begin().await?;
    let backend = txn.get_database_backend();

    let from = match txn.query_one(Statement::from_string(backend, CURRENT_VERSION)).await? {
        Some(row) => row.try_get::<i64>("", "version")?,
        None => 0,
    };

    let pending: Vec<MigrationScript> =
        discover(dir)?.into_iter().filter(|s| s.version > from).collect();

    let Some(latest) = pending.last().map(|s| s.version) else {
        tracing::debug!(version = from, "no pending migrations");
        return Ok(MigrationReport { from, to: from, applied: Vec::new() });
    };

    let mut applied = Vec::with_capacity(pending.len());
    for script in &pending {
        let body = script.read_body()?;
        if script::is_blank(&body) {
            tracing::debug!(name = %script.name, "skipping empty migration");
            continue;
        }

        tracing::info!(version = script.version, name = %script.name, "applying migration");
        txn.execute_unprepared(&body).await?;
        applied.push(script.version);
    }

    txn.execute(Statement::from_sql_and_values(backend, RECORD_VERSION, [latest.into()])).await?;
    txn.commit().await?;

    Ok(MigrationReport { from, to: latest, applied })
}
