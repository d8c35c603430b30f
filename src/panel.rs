use crate::coordinator::{NoticeKind, Poll};
use crate::db;
use crate::error::PanelError;
use crate::startup::AppState;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
};

/// The identity this process hands to participant-facing code
pub async fn get_device(Extension(app_state): Extension<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.device))
}

pub async fn get_board(Extension(app_state): Extension<AppState>) -> impl IntoResponse {
    let snapshot = app_state.coordinator.snapshot().await;
    (StatusCode::OK, Json(snapshot))
}

/// Re-read the active talk pointer and apply it to the board
pub async fn reconcile_board(Extension(app_state): Extension<AppState>) -> impl IntoResponse {
    let outcome = app_state.coordinator.reconcile().await;
    (StatusCode::OK, Json(outcome))
}

/// Reload the enquete list, then reconcile
pub async fn refresh_board(
    Extension(app_state): Extension<AppState>,
) -> Result<impl IntoResponse, PanelError> {
    let enquetes = db::list_enquetes(&app_state.db).await?;
    let polls: Vec<Poll> = enquetes.into_iter().map(Poll::from).collect();
    info!("Loaded {} enquetes", polls.len());

    app_state.coordinator.replace_polls(polls).await;
    let outcome = app_state.coordinator.reconcile().await;

    Ok((StatusCode::OK, Json(outcome)))
}

/// Point the active talk at an enquete (moderator action)
pub async fn activate_enquete(
    Extension(app_state): Extension<AppState>,
    Path(enquete_id): Path<String>,
) -> Result<impl IntoResponse, PanelError> {
    if enquete_id.trim().is_empty() {
        return Err(PanelError::InvalidRequest);
    }

    if !db::enquete_exists(&app_state.db, &enquete_id).await? {
        return Err(PanelError::EnqueteNotFound);
    }

    if let Err(e) = db::set_active_talk(&app_state.db, app_state.pointer_id, Some(&enquete_id)).await {
        app_state
            .coordinator
            .notify("Could not activate enquete", NoticeKind::Error);
        return Err(e.into());
    }

    let outcome = app_state
        .coordinator
        .reconcile_and_confirm(
            Some(&enquete_id),
            &format!("Enquete {} is now live", enquete_id),
            NoticeKind::Success,
        )
        .await;

    Ok((StatusCode::OK, Json(outcome)))
}

pub async fn clear_active(
    Extension(app_state): Extension<AppState>,
) -> Result<impl IntoResponse, PanelError> {
    db::set_active_talk(&app_state.db, app_state.pointer_id, None).await?;

    let outcome = app_state
        .coordinator
        .reconcile_and_confirm(None, "No enquete is live", NoticeKind::Info)
        .await;

    Ok((StatusCode::OK, Json(outcome)))
}
