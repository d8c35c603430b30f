//! Keeps one view's poll board in line with the remote active-talk pointer.
//!
//! Reconciliations are ticketed: every fetch takes a sequence number before it
//! suspends, and its result is only applied if nothing newer has been applied
//! in the meantime. A direct [`ActivePollCoordinator::mark_active_poll_in_ui`]
//! counts as newer than every reconciliation still in flight.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::coordinator::notify::{NoticeKind, NotificationSink};
use crate::coordinator::rows::{BoardSnapshot, Poll, PollBoard};
use crate::coordinator::source::ActiveTalkSource;
use crate::sse::{BoardEvent, BoardSender};

#[derive(Debug, Default)]
struct BoardState {
    board: PollBoard,
    issued: u64,
    applied: u64,
}

impl BoardState {
    fn next_ticket(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReconcileOutcome {
    Applied { snapshot: BoardSnapshot },
    /// A newer reconciliation or mark landed first; this result was dropped.
    Stale { ticket: u64 },
}

impl ReconcileOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReconcileOutcome::Applied { .. })
    }

    /// True when this outcome was applied and left `expected` as the active id.
    pub fn confirms(&self, expected: Option<&str>) -> bool {
        match self {
            ReconcileOutcome::Applied { snapshot } => {
                snapshot.active_enquete_id.as_deref() == expected
            }
            ReconcileOutcome::Stale { .. } => false,
        }
    }
}

pub const UNCONFIRMED_NOTICE: &str = "Enquete saved but board could not be refreshed";

pub struct ActivePollCoordinator<S> {
    source: S,
    notifier: Option<Arc<dyn NotificationSink>>,
    events: Option<BoardSender>,
    state: Mutex<BoardState>,
}

impl<S: ActiveTalkSource> ActivePollCoordinator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            notifier: None,
            events: None,
            state: Mutex::new(BoardState::default()),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_events(mut self, events: BoardSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Looks up the active talk. Remote failures are logged and read as
    /// "nothing active".
    pub async fn fetch_active_talk(&self) -> Option<String> {
        match self.source.fetch_active_talk_id().await {
            Ok(active) => active.filter(|id| !id.is_empty()),
            Err(e) => {
                error!("Failed to fetch active talk: {}", e);
                None
            }
        }
    }

    /// Applies `enquete_id` as the active poll on every row and supersedes
    /// any reconciliation still waiting on the remote store.
    pub async fn mark_active_poll_in_ui(&self, enquete_id: Option<&str>) -> BoardSnapshot {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.applied = state.next_ticket();
            state.board.mark_active(enquete_id);
            state.board.snapshot()
        };

        self.publish(&snapshot);
        snapshot
    }

    /// Forwards to the notification sink, if one was configured.
    pub fn notify(&self, message: &str, kind: NoticeKind) {
        if let Some(notifier) = self.notifier.as_ref() {
            notifier.show(message, kind);
        }
    }

    /// Fetches the active talk and applies it, unless a newer result has
    /// already been applied by the time the fetch completes.
    pub async fn reconcile(&self) -> ReconcileOutcome {
        let ticket = self.state.lock().await.next_ticket();

        let active = self.fetch_active_talk().await;

        let snapshot = {
            let mut state = self.state.lock().await;
            if ticket <= state.applied {
                debug!(
                    "Dropping stale reconciliation {} (applied {})",
                    ticket, state.applied
                );
                return ReconcileOutcome::Stale { ticket };
            }
            state.applied = ticket;
            state.board.mark_active(active.as_deref());
            state.board.snapshot()
        };

        info!(
            "Reconciled active poll: {}",
            snapshot.active_enquete_id.as_deref().unwrap_or("none")
        );
        self.publish(&snapshot);
        ReconcileOutcome::Applied { snapshot }
    }

    /// Reconciles after a pointer write and announces `confirmation` only if
    /// the board now shows `expected`; otherwise warns that the view is behind.
    pub async fn reconcile_and_confirm(
        &self,
        expected: Option<&str>,
        confirmation: &str,
        kind: NoticeKind,
    ) -> ReconcileOutcome {
        let outcome = self.reconcile().await;
        if outcome.confirms(expected) {
            self.notify(confirmation, kind);
        } else {
            warn!(
                "Board did not confirm active enquete {}",
                expected.unwrap_or("none")
            );
            self.notify(UNCONFIRMED_NOTICE, NoticeKind::Warning);
        }
        outcome
    }

    /// Swaps in a fresh poll list, keeping the current active id applied.
    pub async fn replace_polls(&self, polls: Vec<Poll>) -> BoardSnapshot {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.board.replace_polls(polls);
            state.board.snapshot()
        };

        self.publish(&snapshot);
        snapshot
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        self.state.lock().await.board.snapshot()
    }

    pub async fn active_enquete_id(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .board
            .active_enquete_id()
            .map(str::to_string)
    }

    fn publish(&self, snapshot: &BoardSnapshot) {
        if let Some(tx) = self.events.as_ref() {
            let _ = tx.send(BoardEvent::ActiveChanged(snapshot.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::sse::create_board_broadcaster;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    type FetchResult = Result<Option<String>, RemoteError>;

    /// Returns the same canned result on every fetch.
    struct FixedSource {
        result: fn() -> FetchResult,
    }

    impl ActiveTalkSource for FixedSource {
        async fn fetch_active_talk_id(&self) -> FetchResult {
            (self.result)()
        }
    }

    /// Each fetch waits on the next queued channel, so tests decide when and
    /// in which order fetches complete.
    struct GatedSource {
        gates: std::sync::Mutex<VecDeque<oneshot::Receiver<FetchResult>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ActiveTalkSource for GatedSource {
        async fn fetch_active_talk_id(&self) -> FetchResult {
            let gate = self.gates.lock().unwrap().pop_front();
            self.calls.fetch_add(1, Ordering::SeqCst);
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(RemoteError::Query("gate dropped".to_string()))),
                None => Ok(None),
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        seen: std::sync::Mutex<Vec<(String, NoticeKind)>>,
    }

    impl NotificationSink for RecordingSink {
        fn show(&self, message: &str, kind: NoticeKind) {
            self.seen.lock().unwrap().push((message.to_string(), kind));
        }
    }

    fn polls(ids: &[&str]) -> Vec<Poll> {
        ids.iter().map(|id| Poll::new(*id)).collect()
    }

    fn fixed(result: fn() -> FetchResult) -> ActivePollCoordinator<FixedSource> {
        ActivePollCoordinator::new(FixedSource { result })
    }

    async fn wait_for_calls(calls: &AtomicUsize, n: usize) {
        while calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn reconcile_highlights_fetched_poll() {
        let coord = fixed(|| Ok(Some("p2".to_string())));
        coord.replace_polls(polls(&["p1", "p2", "p3"])).await;

        let outcome = coord.reconcile().await;
        assert!(outcome.is_applied());

        let snap = coord.snapshot().await;
        let active: Vec<_> = snap.rows.iter().filter(|r| r.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].enquete_id, "p2");
        assert_eq!(active[0].badge_visible, Some(true));
        assert!(
            snap.rows
                .iter()
                .filter(|r| r.enquete_id != "p2")
                .all(|r| r.badge_visible == Some(false))
        );
    }

    #[tokio::test]
    async fn reconcile_with_nothing_active_clears_rows() {
        let coord = fixed(|| Ok(None));
        coord.replace_polls(polls(&["p1", "p2"])).await;
        coord.mark_active_poll_in_ui(Some("p1")).await;

        coord.reconcile().await;

        assert_eq!(coord.active_enquete_id().await, None);
        assert!(coord.snapshot().await.rows.iter().all(|r| !r.active));
    }

    #[tokio::test]
    async fn remote_error_degrades_to_nothing_active() {
        let coord = fixed(|| Err(RemoteError::NotSingle(0)));
        coord.replace_polls(polls(&["p1", "p2"])).await;
        coord.mark_active_poll_in_ui(Some("p2")).await;

        assert_eq!(coord.fetch_active_talk().await, None);
        let outcome = coord.reconcile().await;

        assert!(outcome.is_applied());
        assert_eq!(coord.active_enquete_id().await, None);
        assert!(coord.snapshot().await.rows.iter().all(|r| !r.active));
    }

    #[tokio::test]
    async fn empty_talk_id_reads_as_none() {
        let coord = fixed(|| Ok(Some(String::new())));
        assert_eq!(coord.fetch_active_talk().await, None);
    }

    #[tokio::test]
    async fn marking_twice_is_idempotent() {
        let coord = fixed(|| Ok(None));
        coord.replace_polls(polls(&["p1", "p2", "p3"])).await;

        let once = coord.mark_active_poll_in_ui(Some("p3")).await;
        let twice = coord.mark_active_poll_in_ui(Some("p3")).await;

        let strip = |s: &BoardSnapshot| {
            s.rows
                .iter()
                .map(|r| (r.enquete_id.clone(), r.active, r.badge_visible))
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(&once), strip(&twice));
        assert_eq!(twice.active_enquete_id.as_deref(), Some("p3"));
    }

    #[tokio::test]
    async fn stale_completion_is_dropped() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let calls = Arc::new(AtomicUsize::new(0));
        let coord = Arc::new(ActivePollCoordinator::new(GatedSource {
            gates: std::sync::Mutex::new(VecDeque::from([first_rx, second_rx])),
            calls: calls.clone(),
        }));
        coord.replace_polls(polls(&["p1", "p2", "p3"])).await;

        let c1 = coord.clone();
        let first = tokio::spawn(async move { c1.reconcile().await });
        wait_for_calls(&calls, 1).await;

        let c2 = coord.clone();
        let second = tokio::spawn(async move { c2.reconcile().await });
        wait_for_calls(&calls, 2).await;

        second_tx.send(Ok(Some("p2".to_string()))).unwrap();
        assert!(second.await.unwrap().is_applied());

        first_tx.send(Ok(Some("p1".to_string()))).unwrap();
        let first = first.await.unwrap();
        assert!(matches!(first, ReconcileOutcome::Stale { ticket: 1 }));

        assert_eq!(coord.active_enquete_id().await.as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn direct_mark_supersedes_in_flight_reconcile() {
        let (tx, rx) = oneshot::channel();
        let calls = Arc::new(AtomicUsize::new(0));
        let coord = Arc::new(ActivePollCoordinator::new(GatedSource {
            gates: std::sync::Mutex::new(VecDeque::from([rx])),
            calls: calls.clone(),
        }));
        coord.replace_polls(polls(&["p1", "p2"])).await;

        let c = coord.clone();
        let pending = tokio::spawn(async move { c.reconcile().await });
        wait_for_calls(&calls, 1).await;

        coord.mark_active_poll_in_ui(Some("p1")).await;
        tx.send(Ok(None)).unwrap();

        assert!(!pending.await.unwrap().is_applied());
        assert_eq!(coord.active_enquete_id().await.as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn notify_without_sink_is_noop() {
        let coord = fixed(|| Ok(None));
        coord.replace_polls(polls(&["p1", "p2"])).await;
        let before = coord.snapshot().await;

        coord.notify("Enquete ativada", NoticeKind::Info);

        assert_eq!(coord.active_enquete_id().await, None);
        let after = coord.snapshot().await;
        assert_eq!(after.rows.len(), before.rows.len());
        assert!(after.rows.iter().all(|r| !r.active));
    }

    #[tokio::test]
    async fn notify_forwards_to_sink() {
        let sink = Arc::new(RecordingSink::default());
        let coord = fixed(|| Ok(None)).with_notifier(sink.clone());

        coord.notify("Enquete ativada", NoticeKind::Success);

        let seen = sink.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[("Enquete ativada".to_string(), NoticeKind::Success)]
        );
    }

    #[tokio::test]
    async fn confirmation_sent_when_board_shows_expected_poll() {
        let sink = Arc::new(RecordingSink::default());
        let coord = fixed(|| Ok(Some("p1".to_string()))).with_notifier(sink.clone());
        coord.replace_polls(polls(&["p1", "p2"])).await;

        let outcome = coord
            .reconcile_and_confirm(Some("p1"), "Enquete p1 is now live", NoticeKind::Success)
            .await;

        assert!(outcome.confirms(Some("p1")));
        let seen = sink.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[("Enquete p1 is now live".to_string(), NoticeKind::Success)]
        );
    }

    #[tokio::test]
    async fn failed_refetch_warns_instead_of_confirming() {
        let sink = Arc::new(RecordingSink::default());
        let coord = fixed(|| Err(RemoteError::Query("connection reset".to_string())))
            .with_notifier(sink.clone());
        coord.replace_polls(polls(&["p1", "p2"])).await;

        let outcome = coord
            .reconcile_and_confirm(Some("p1"), "Enquete p1 is now live", NoticeKind::Success)
            .await;

        assert!(outcome.is_applied());
        assert!(!outcome.confirms(Some("p1")));
        assert_eq!(coord.active_enquete_id().await, None);
        let seen = sink.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[(UNCONFIRMED_NOTICE.to_string(), NoticeKind::Warning)]
        );
    }

    #[test]
    fn stale_outcome_never_confirms() {
        let stale = ReconcileOutcome::Stale { ticket: 3 };
        assert!(!stale.confirms(None));
        assert!(!stale.confirms(Some("p1")));
    }

    #[tokio::test]
    async fn applied_changes_are_broadcast() {
        let tx = create_board_broadcaster();
        let mut rx = tx.subscribe();
        let coord = fixed(|| Ok(Some("p1".to_string()))).with_events(tx);
        coord.replace_polls(polls(&["p1"])).await;
        coord.reconcile().await;

        // replace_polls, then reconcile
        let _ = rx.recv().await.unwrap();
        match rx.recv().await.unwrap() {
            BoardEvent::ActiveChanged(snap) => {
                assert_eq!(snap.active_enquete_id.as_deref(), Some("p1"))
            }
            other => panic!("unexpected event {}", other.name()),
        }
    }
}
