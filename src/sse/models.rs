use crate::coordinator::{BoardSnapshot, NoticeKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum BoardEvent {
    ActiveChanged(BoardSnapshot),
    Notice(Notice),
}

impl BoardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::ActiveChanged(_) => "active_changed",
            BoardEvent::Notice(_) => "notice",
        }
    }
}

pub type BoardSender = tokio::sync::broadcast::Sender<BoardEvent>;
