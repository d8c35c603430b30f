use crate::db::connection::DbPool;
use crate::db::models::Enquete;
use sqlx::Error;

pub async fn list_enquetes(pool: &DbPool) -> Result<Vec<Enquete>, Error> {
    let rows = sqlx::query_as::<_, Enquete>(
        "SELECT id, title, position, created_at FROM enquetes ORDER BY position, created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn enquete_exists(pool: &DbPool, enquete_id: &str) -> Result<bool, Error> {
    let row = sqlx::query("SELECT id FROM enquetes WHERE id = $1")
        .bind(enquete_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}
