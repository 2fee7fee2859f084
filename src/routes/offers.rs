use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::offers::OfferList,
    error::AppResult,
    response::ApiResponse,
    services::offer_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_offers))
}

#[utoipa::path(
    get,
    path = "/api/offers",
    responses(
        (status = 200, description = "Currently applicable offers", body = ApiResponse<OfferList>)
    ),
    tag = "Offers"
)]
pub async fn list_offers(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<OfferList>>> {
    let resp = offer_service::list_active_offers(&state).await?;
    Ok(Json(resp))
}
