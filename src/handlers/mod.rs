pub mod common;
pub mod coupons;
pub mod items;
pub mod orders;
pub mod users;

use crate::cache::CatalogCache;
use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub coupons: Arc<crate::services::coupons::CouponService>,
    pub items: Arc<crate::services::items::ItemService>,
    pub orders: Arc<crate::services::orders::OrderService>,
    pub users: Arc<crate::services::users::UserService>,
}

impl AppServices {
    /// Builds the service container. The catalog cache is handed to the
    /// coupon service here; nothing else holds a reference to it.
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        catalog_cache: CatalogCache,
    ) -> Self {
        let coupons = Arc::new(crate::services::coupons::CouponService::new(
            db_pool.clone(),
            catalog_cache,
            event_sender.clone(),
        ));
        let items = Arc::new(crate::services::items::ItemService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let orders = Arc::new(crate::services::orders::OrderService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let users = Arc::new(crate::services::users::UserService::new(
            db_pool,
            event_sender,
        ));

        Self {
            coupons,
            items,
            orders,
            users,
        }
    }
}
