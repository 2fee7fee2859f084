use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        analytics::SettlementUpdateRequest,
        offers::{CreateOfferRequest, UpdateOfferRequest},
        orders::{AssignPartnerRequest, OrderList, OrderWithItems},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Offer, Order, SellerAnalytics},
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{admin_service, analytics_service, assignment_service, offer_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}", get(get_order_admin))
        .route("/orders/{id}/assign", post(assign_partner))
        .route("/offers", post(create_offer))
        .route("/offers/{id}", patch(update_offer))
        .route("/analytics/{id}", patch(update_settlement).delete(purge_analytics))
}

#[utoipa::path(
    get,
    path = "/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "All orders (admin only)", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Any order with items (admin only)", body = ApiResponse<OrderWithItems>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = admin_service::get_order_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/orders/{id}/assign",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = AssignPartnerRequest,
    responses(
        (status = 200, description = "Partner assigned (status forced to CONFIRMED) or unassigned", body = ApiResponse<Order>),
        (status = 400, description = "Pincode mismatch or unresolved pincode"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order or partner not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn assign_partner(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignPartnerRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = assignment_service::assign_partner(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/offers",
    request_body = CreateOfferRequest,
    responses(
        (status = 200, description = "Offer created", body = ApiResponse<Offer>),
        (status = 400, description = "Duplicate code or invalid kind"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_offer(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOfferRequest>,
) -> AppResult<Json<ApiResponse<Offer>>> {
    let resp = offer_service::create_offer(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/admin/offers/{id}",
    params(("id" = Uuid, Path, description = "Offer ID")),
    request_body = UpdateOfferRequest,
    responses(
        (status = 200, description = "Offer toggled", body = ApiResponse<Offer>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_offer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOfferRequest>,
) -> AppResult<Json<ApiResponse<Offer>>> {
    let resp = offer_service::set_offer_active(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/admin/analytics/{id}",
    params(("id" = Uuid, Path, description = "Analytics record ID")),
    request_body = SettlementUpdateRequest,
    responses(
        (status = 200, description = "Settlement flags updated", body = ApiResponse<SellerAnalytics>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_settlement(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SettlementUpdateRequest>,
) -> AppResult<Json<ApiResponse<SellerAnalytics>>> {
    let resp = analytics_service::update_settlement(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/analytics/{id}",
    params(("id" = Uuid, Path, description = "Analytics record ID")),
    responses(
        (status = 200, description = "Record purged", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn purge_analytics(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = analytics_service::purge_record(&state, &user, id).await?;
    Ok(Json(resp))
}
