use std::sync::Arc;

use crate::db::{DbPool, OrmConn};
use crate::notify::NotificationQueue;
use crate::shipping::ShippingPolicy;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub shipping: Arc<dyn ShippingPolicy>,
    pub notifier: NotificationQueue,
}
