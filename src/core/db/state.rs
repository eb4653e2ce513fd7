use anyhow::Context;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

use std::path::{Path, PathBuf};

pub(super) struct StoreState {
    db_file: PathBuf,
    pool: SqlitePool,
}

impl std::fmt::Debug for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreState")
            .field("db_file", &self.db_file)
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}

impl StoreState {
    pub(super) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub(super) fn db_file(&self) -> &Path {
        &self.db_file
    }

    /// Flush the WAL into the main database file and release every pooled
    /// connection. The store is unusable afterwards.
    pub(super) async fn close(&self) -> anyhow::Result<()> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE);")
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to checkpoint {:?}", self.db_file))?;
        self.pool.close().await;
        Ok(())
    }

    pub(super) async fn new<P: AsRef<Path>>(db_file: P) -> anyhow::Result<Self> {
        let db_file = db_file.as_ref().to_path_buf();

        // A bare file name has an empty parent, which means the working directory.
        if let Some(parent) = db_file.parent().filter(|p| !p.as_os_str().is_empty())
            && !parent.is_dir()
        {
            anyhow::bail!("Database file parent does not exist: {:?}", db_file);
        }

        let connect_opts = SqliteConnectOptions::new()
            .filename(&db_file)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_opts)
            .await
            .with_context(|| format!("Failed to open database {:?}", db_file))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .with_context(|| format!("Failed to initialize schema in {:?}", db_file))?;
        tracing::debug!(db_file = ?db_file, "record store opened");
        Ok(Self { db_file, pool })
    }
}
