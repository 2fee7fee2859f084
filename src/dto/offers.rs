use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Offer;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOfferRequest {
    pub code: String,
    pub tagline: String,
    /// flat | percentage
    pub kind: String,
    pub value: i64,
    pub min_cart_amount: Option<i64>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub applicable_categories: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOfferRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OfferList {
    pub items: Vec<Offer>,
}
