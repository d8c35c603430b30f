use crate::coordinator::{NoticeKind, NotificationSink};
use crate::sse::models::{BoardEvent, BoardSender, Notice};
use chrono::Utc;
use tokio::sync::broadcast;

pub fn create_board_broadcaster() -> BoardSender {
    let (tx, _rx) = broadcast::channel(100);
    tx
}

/// Pushes notices to every connected moderator view.
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: BoardSender,
}

impl BroadcastNotifier {
    pub fn new(tx: BoardSender) -> Self {
        Self { tx }
    }
}

impl NotificationSink for BroadcastNotifier {
    fn show(&self, message: &str, kind: NoticeKind) {
        // no subscribers is fine
        let _ = self.tx.send(BoardEvent::Notice(Notice {
            message: message.to_string(),
            kind,
            at: Utc::now(),
        }));
    }
}
