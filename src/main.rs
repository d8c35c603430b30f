use axum::{
    Router,
    extract::Extension,
    http::{
        HeaderValue, StatusCode,
        header::{ACCEPT, CONTENT_TYPE},
    },
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use enquete_live::config::Config;
use enquete_live::db::init_db;
use enquete_live::panel::{
    activate_enquete, clear_active, get_board, get_device, reconcile_board, refresh_board,
};
use enquete_live::sse::{board_events_sse, create_board_broadcaster};
use enquete_live::startup::AppState;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let db = init_db(&config.database_url, config.active_talk_pointer_id)
        .await
        .expect("Failed to initialize database");

    let board_tx = create_board_broadcaster();
    let app_state = AppState::new(db, &config, board_tx.clone());

    // load rows and the current pointer before the first view connects
    if let Err(e) = enquete_live::panel::refresh_board(Extension(app_state.clone())).await {
        error!("Initial board refresh failed: {}", e);
    }

    let allow_origin = match config
        .allowed_origin
        .as_deref()
        .and_then(|origin| HeaderValue::from_str(origin).ok())
    {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::mirror_request(),
    };

    let app = Router::new()
        .route("/device", get(get_device))
        .route("/board", get(get_board))
        .route("/board/reconcile", post(reconcile_board))
        .route("/board/refresh", post(refresh_board))
        .route("/active/:enquete_id", put(activate_enquete))
        .route("/active", delete(clear_active))
        .route("/events", get(board_events_sse))
        .layer(Extension(app_state))
        .layer(Extension(board_tx))
        .layer(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_credentials(true)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([CONTENT_TYPE, ACCEPT]),
        )
        .fallback(handler_404);

    info!("listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Unable to spawn tcp listener");

    axum::serve(listener, app).await.unwrap();
}

async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}
