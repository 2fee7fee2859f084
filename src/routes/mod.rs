use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod analytics;
pub mod doc;
pub mod health;
pub mod offers;
pub mod orders;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/orders", orders::router())
        .nest("/offers", offers::router())
        .nest("/analytics", analytics::router())
}

pub fn create_admin_router() -> Router<AppState> {
    admin::router()
}
