//! SQLite RecordStore implementation.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use sea_query::{OnConflict, Query, SqliteQueryBuilder};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::record::{is_record_id, Record};
use crate::storage::schema::{CostLogs, CREATE_COST_LOGS_TABLE};
use crate::storage::{MalformedItem, RecordStore, Result, ScanOutput};

/// SQLite implementation of RecordStore.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Create a new SQLite record store on an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database file at `path`.
    ///
    /// `:memory:` opens a private in-memory database on a single connection
    /// that the pool never retires, since a replacement would be a new empty
    /// database.
    pub async fn open(path: &str) -> Result<Self> {
        if path == ":memory:" {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(
                    SqliteConnectOptions::new()
                        .filename(path)
                        .create_if_missing(true),
                )
                .await?;
            return Ok(Self::new(pool));
        }

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let opts = SqliteConnectOptions::new()
            .filename(path)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        info!(path = %path, "Opened SQLite record store");
        Ok(Self::new(pool))
    }

    /// Create the log table if it doesn't exist.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(CREATE_COST_LOGS_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn put(&self, record: &Record) -> Result<()> {
        let query = Query::insert()
            .into_table(CostLogs::Table)
            .columns([CostLogs::Id, CostLogs::Message])
            .values_panic([record.id.clone().into(), record.message.clone().into()])
            .on_conflict(
                OnConflict::column(CostLogs::Id)
                    .update_column(CostLogs::Message)
                    .to_owned(),
            )
            .to_string(SqliteQueryBuilder);

        sqlx::query(&query).execute(&self.pool).await?;

        debug!(id = %record.id, "Stored record in SQLite");
        Ok(())
    }

    async fn scan(&self, _limit_hint: usize) -> Result<ScanOutput> {
        let query = Query::select()
            .columns([CostLogs::Id, CostLogs::Message])
            .from(CostLogs::Table)
            .to_string(SqliteQueryBuilder);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut output = ScanOutput::default();
        for row in rows {
            let id = row.try_get::<Option<String>, _>("id").ok().flatten();
            let message = row.try_get::<Option<String>, _>("message").ok().flatten();

            match (id, message) {
                (Some(id), Some(message)) if is_record_id(&id) => {
                    output.records.push(Record { id, message });
                }
                (Some(id), Some(_)) => {
                    output
                        .malformed
                        .push(MalformedItem::new(Some(id), "id is not a timestamp"));
                }
                (Some(id), None) => {
                    output
                        .malformed
                        .push(MalformedItem::new(Some(id), "missing or non-text message"));
                }
                (None, _) => {
                    output
                        .malformed
                        .push(MalformedItem::new(None, "missing or non-text id"));
                }
            }
        }

        debug!(
            records = output.records.len(),
            malformed = output.malformed.len(),
            "Scanned SQLite record store"
        );
        Ok(output)
    }
}
