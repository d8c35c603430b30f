use crate::sse::models::{BoardEvent, BoardSender};
use crate::startup::AppState;
use axum::{
    extract::Extension,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde_json::json;
use std::{convert::Infallible, time::Duration};
use tokio::sync::broadcast::error::RecvError;

pub async fn board_events_sse(
    Extension(app_state): Extension<AppState>,
    Extension(board_tx): Extension<BoardSender>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = board_tx.subscribe();

    let stream = async_stream::stream! {
        let snapshot = app_state.coordinator.snapshot().await;
        yield Ok(Event::default()
            .event("init")
            .data(json!({ "board": snapshot }).to_string()));

        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    // the view missed updates; resend the current board
                    warn!("board event stream lagged by {} events", skipped);
                    BoardEvent::ActiveChanged(app_state.coordinator.snapshot().await)
                }
                Err(RecvError::Closed) => break,
            };

            let data = match &event {
                BoardEvent::ActiveChanged(snapshot) => json!({ "board": snapshot }),
                BoardEvent::Notice(notice) => json!({ "notice": notice }),
            };

            yield Ok(Event::default()
                .event(event.name())
                .data(data.to_string()));
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keep-alive"),
    )
}
