//! PostgreSQL connection pool initialization.
//!
//! The connection string is read from `DATABASE_URL`. Pending migrations
//! under `migrations/` are applied on startup.

use anyhow::Context;
use sqlx::PgPool;
use std::env;

pub async fn init_db_pool() -> anyhow::Result<PgPool> {
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}
