use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use coupon_api::{
    cache::CatalogCache,
    config::AppConfig,
    db::{establish_connection_with_config, run_migrations, DbConfig},
    events::{process_events, EventSender},
    handlers::AppServices,
    AppState,
};

/// Test harness over an in-memory SQLite database with migrations applied.
pub struct TestApp {
    pub state: AppState,
    /// Handle onto the same cache the coupon service owns.
    pub cache: CatalogCache,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_config = DbConfig {
            url: "sqlite::memory:".to_string(),
            // A single connection keeps every query on the same in-memory database
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = establish_connection_with_config(&db_config)
            .await
            .expect("failed to open in-memory database");
        run_migrations(&pool).await.expect("failed to migrate");

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        tokio::spawn(process_events(event_rx));

        let cache = CatalogCache::new(Duration::from_secs(60));
        let db = Arc::new(pool);
        let services = AppServices::new(db.clone(), Arc::new(event_sender.clone()), cache.clone());

        let config = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "development".to_string(),
        );

        Self {
            state: AppState {
                db,
                config,
                event_sender,
                services,
            },
            cache,
        }
    }
}
