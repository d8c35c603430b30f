use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;

pub type DbPool = Pool<Postgres>;

pub async fn init_db(database_url: &str, pointer_id: i32) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .max_lifetime(Duration::from_secs(30 * 60))
        .idle_timeout(Duration::from_secs(10 * 60))
        .connect(database_url)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS active_talk (
            id INTEGER PRIMARY KEY,
            talk_id TEXT,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS enquetes (
            id TEXT PRIMARY KEY,
            title TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(&pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_enquetes_position ON enquetes(position, created_at)
        "#,
    )
    .execute(&pool)
    .await?;

    // the pointer row must exist for single-row lookups to succeed
    sqlx::query("INSERT INTO active_talk (id, talk_id) VALUES ($1, NULL) ON CONFLICT (id) DO NOTHING")
        .bind(pointer_id)
        .execute(&pool)
        .await?;

    Ok(pool)
}

pub fn get_pool_stats(pool: &DbPool) -> String {
    let size = pool.size() as usize;
    let num_idle = pool.num_idle();
    format!(
        "Pool stats: size={}, idle={}, available={}",
        size,
        num_idle,
        size.saturating_sub(num_idle)
    )
}
