use crate::db::connection::DbPool;
use crate::db::models::ActiveTalkPointer;
use crate::error::RemoteError;
use sqlx::Error;

/// Point lookup that insists on exactly one matching row.
pub async fn fetch_active_talk_pointer(
    pool: &DbPool,
    pointer_id: i32,
) -> Result<ActiveTalkPointer, RemoteError> {
    let rows = sqlx::query_as::<_, ActiveTalkPointer>(
        "SELECT id, talk_id, updated_at FROM active_talk WHERE id = $1",
    )
    .bind(pointer_id)
    .fetch_all(pool)
    .await?;

    expect_single(rows)
}

/// Zero rows and more than one row are both errors.
pub fn expect_single(mut rows: Vec<ActiveTalkPointer>) -> Result<ActiveTalkPointer, RemoteError> {
    if rows.len() != 1 {
        return Err(RemoteError::NotSingle(rows.len()));
    }

    Ok(rows.remove(0))
}

pub async fn set_active_talk(
    pool: &DbPool,
    pointer_id: i32,
    talk_id: Option<&str>,
) -> Result<(), Error> {
    sqlx::query(
        r#"
        INSERT INTO active_talk (id, talk_id, updated_at)
        VALUES ($1, $2, CURRENT_TIMESTAMP)
        ON CONFLICT (id) DO UPDATE SET talk_id = EXCLUDED.talk_id, updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(pointer_id)
    .bind(talk_id)
    .execute(pool)
    .await?;

    Ok(())
}
