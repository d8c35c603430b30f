use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toast-style message display. Implementations must not block.
pub trait NotificationSink: Send + Sync {
    fn show(&self, message: &str, kind: NoticeKind);
}

/// Writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn show(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Error => error!(kind = %kind, "{}", message),
            NoticeKind::Warning => warn!(kind = %kind, "{}", message),
            NoticeKind::Info | NoticeKind::Success => info!(kind = %kind, "{}", message),
        }
    }
}

/// Fans a notice out to several sinks.
#[derive(Default)]
pub struct FanoutNotifier {
    sinks: Vec<std::sync::Arc<dyn NotificationSink>>,
}

impl FanoutNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: std::sync::Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl NotificationSink for FanoutNotifier {
    fn show(&self, message: &str, kind: NoticeKind) {
        for sink in &self.sinks {
            sink.show(message, kind);
        }
    }
}
