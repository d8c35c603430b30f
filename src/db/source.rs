use crate::coordinator::ActiveTalkSource;
use crate::db::connection::DbPool;
use crate::db::repositories::fetch_active_talk_pointer;
use crate::error::RemoteError;

/// Reads the active talk pointer from Postgres.
#[derive(Clone)]
pub struct PgActiveTalkSource {
    pool: DbPool,
    pointer_id: i32,
}

impl PgActiveTalkSource {
    pub fn new(pool: DbPool, pointer_id: i32) -> Self {
        Self { pool, pointer_id }
    }
}

impl ActiveTalkSource for PgActiveTalkSource {
    async fn fetch_active_talk_id(&self) -> Result<Option<String>, RemoteError> {
        let pointer = fetch_active_talk_pointer(&self.pool, self.pointer_id).await?;
        Ok(pointer.active_id().map(str::to_string))
    }
}
