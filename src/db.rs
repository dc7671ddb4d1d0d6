// src/db.rs

//! Pool construction and migrations. The backend is picked from the URL scheme:
//! `sqlite:` selects SQLite, anything else is handed to Postgres.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};

use crate::store::{
    PgPostStore, PgUserStore, PostStore, SqlitePostStore, SqliteUserStore, UserStore,
};

const MAX_CONNECT_RETRIES: u32 = 5;

enum Pool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

/// Connects the post service's database and applies its migrations.
pub async fn connect_post_store(database_url: &str) -> anyhow::Result<Arc<dyn PostStore>> {
    let store: Arc<dyn PostStore> = match connect(database_url).await? {
        Pool::Postgres(pool) => {
            sqlx::migrate!("./migrations/posts/postgres")
                .run(&pool)
                .await
                .context("failed to run post service migrations")?;
            Arc::new(PgPostStore::new(pool))
        }
        Pool::Sqlite(pool) => {
            sqlx::migrate!("./migrations/posts/sqlite")
                .run(&pool)
                .await
                .context("failed to run post service migrations")?;
            Arc::new(SqlitePostStore::new(pool))
        }
    };
    tracing::info!("Post store ready.");
    Ok(store)
}

/// Connects the auth service's database and applies its migrations.
pub async fn connect_user_store(database_url: &str) -> anyhow::Result<Arc<dyn UserStore>> {
    let store: Arc<dyn UserStore> = match connect(database_url).await? {
        Pool::Postgres(pool) => {
            sqlx::migrate!("./migrations/auth/postgres")
                .run(&pool)
                .await
                .context("failed to run auth service migrations")?;
            Arc::new(PgUserStore::new(pool))
        }
        Pool::Sqlite(pool) => {
            sqlx::migrate!("./migrations/auth/sqlite")
                .run(&pool)
                .await
                .context("failed to run auth service migrations")?;
            Arc::new(SqliteUserStore::new(pool))
        }
    };
    tracing::info!("User store ready.");
    Ok(store)
}

async fn connect(database_url: &str) -> anyhow::Result<Pool> {
    if database_url.starts_with("sqlite:") {
        return connect_sqlite(database_url).await.map(Pool::Sqlite);
    }

    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > MAX_CONNECT_RETRIES {
                    return Err(e).context(format!(
                        "failed to connect to database after {} retries",
                        MAX_CONNECT_RETRIES
                    ));
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {})",
                    retry_count
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");
    Ok(Pool::Postgres(pool))
}

async fn connect_sqlite(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid SQLite URL: {}", database_url))?
        .create_if_missing(true);

    // Every connection to `:memory:` is its own database, so keep exactly one alive.
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let max_connections = if in_memory { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("failed to open SQLite database")?;

    tracing::info!("Database connected...");
    Ok(pool)
}
