use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::analytics::{AnalyticsList, SellerSummary},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::analytics_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_analytics))
        .route("/summary", get(seller_summary))
}

#[utoipa::path(
    get,
    path = "/api/analytics",
    responses(
        (status = 200, description = "Per-order financial records for the calling seller", body = ApiResponse<AnalyticsList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn list_analytics(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AnalyticsList>>> {
    let resp = analytics_service::list_for_seller(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics/summary",
    responses(
        (status = 200, description = "Earnings summary for the calling seller", body = ApiResponse<SellerSummary>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn seller_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SellerSummary>>> {
    let resp = analytics_service::seller_summary(&state, &user).await?;
    Ok(Json(resp))
}
