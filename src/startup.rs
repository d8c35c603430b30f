use crate::config::Config;
use crate::coordinator::{ActivePollCoordinator, FanoutNotifier, TracingNotifier};
use crate::db::connection::{DbPool, get_pool_stats};
use crate::db::source::PgActiveTalkSource;
use crate::identity::{DeviceIdentity, FileStore};
use crate::sse::{BoardSender, BroadcastNotifier};
use std::sync::Arc;
use tokio::time::{Duration, interval};

pub type Coordinator = ActivePollCoordinator<PgActiveTalkSource>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub coordinator: Arc<Coordinator>,
    pub device: DeviceIdentity,
    pub pointer_id: i32,
}

impl AppState {
    pub fn new(db: DbPool, config: &Config, board_tx: BoardSender) -> Self {
        let device = DeviceIdentity::load(&FileStore::new(&config.device_store_path));
        info!(
            "device id {} ({:?})",
            device.device_id, device.persistence
        );

        let notifier = FanoutNotifier::new()
            .with(Arc::new(TracingNotifier))
            .with(Arc::new(BroadcastNotifier::new(board_tx.clone())));

        let coordinator = ActivePollCoordinator::new(PgActiveTalkSource::new(
            db.clone(),
            config.active_talk_pointer_id,
        ))
        .with_notifier(Arc::new(notifier))
        .with_events(board_tx);

        let db_clone = db.clone();
        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                match db_clone.acquire().await {
                    Ok(conn) => {
                        drop(conn);
                        debug!("{}", get_pool_stats(&db_clone));
                    }
                    Err(e) => {
                        error!("Database connection health check failed: {}", e);
                    }
                }
            }
        });

        AppState {
            db,
            coordinator: Arc::new(coordinator),
            device,
            pointer_id: config.active_talk_pointer_id,
        }
    }
}
