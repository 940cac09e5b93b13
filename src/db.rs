use std::time::Duration;

use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DbErr,
    sqlx::sqlite::{SqliteJournalMode, SqliteSynchronous},
};

/// Opens a bounded SQLite connection pool.
///
/// `acquire_timeout` bounds how long a caller waits for a free connection.
/// WAL and `synchronous=NORMAL` are applied to every pooled connection as it
/// is opened.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections.max(1))
        .min_connections(1)
        .acquire_timeout(acquire_timeout)
        .sqlx_logging(false)
        .map_sqlx_sqlite_opts(|opts| {
            opts.journal_mode(SqliteJournalMode::Wal).synchronous(SqliteSynchronous::Normal)
        });

    Database::connect(options).await
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, DatabaseTransaction, DbBackend, Statement, TransactionTrait};

    use super::*;

    async fn pragma<T: sea_orm::TryGetable>(txn: &DatabaseTransaction, name: &str) -> T {
        txn.query_one(Statement::from_string(DbBackend::Sqlite, format!("PRAGMA {name}")))
            .await
            .unwrap()
            .unwrap()
            .try_get_by_index::<T>(0)
            .unwrap()
    }

    #[tokio::test]
    async fn every_pooled_connection_gets_pragmas() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("pool.db").display());
        let db = connect(&url, 3, Duration::from_secs(2)).await.unwrap();

        // Holding all three forces three distinct connections.
        let mut held = Vec::new();
        for _ in 0..3 {
            held.push(db.begin().await.unwrap());
        }

        for txn in &held {
            assert_eq!(pragma::<i32>(txn, "synchronous").await, 1);
            assert_eq!(pragma::<String>(txn, "journal_mode").await, "wal");
        }
    }
}
