use crate::error::RemoteError;
use std::future::Future;

/// Read access to the remote "which talk is live" pointer.
pub trait ActiveTalkSource: Send + Sync {
    /// `Ok(None)` when the pointer exists but names nothing.
    fn fetch_active_talk_id(
        &self,
    ) -> impl Future<Output = Result<Option<String>, RemoteError>> + Send;
}
