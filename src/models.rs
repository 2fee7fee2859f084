use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::status::{OrderStatus, PaymentMode, PaymentStatus, SettlementStatus};

/// Delivery address snapshotted onto an order at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderAddress {
    pub full_address: String,
    pub mobile: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// One seller's fulfillment of a subset of a buyer's cart.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub delivery_partner_id: Option<Uuid>,
    /// Subtotal + shipping − discount: what the buyer owes for this portion.
    pub total_amount: i64,
    pub shipping_charge: i64,
    pub discount_amount: i64,
    pub coupon_code: Option<String>,
    pub discount_remark: Option<String>,
    pub order_status: OrderStatus,
    pub payment_mode: PaymentMode,
    pub payment_status: PaymentStatus,
    pub address: OrderAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price snapshot at order time.
    pub price: i64,
    /// Commission rate snapshot at order time.
    pub commission_percent: i32,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Promotional coupon. Codes are unique and matched case-insensitively
/// (stored uppercase).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Offer {
    pub id: Uuid,
    pub code: String,
    pub tagline: String,
    pub kind: DiscountKind,
    pub value: i64,
    pub min_cart_amount: i64,
    pub expiry_date: Option<DateTime<Utc>>,
    /// Empty or absent means the offer applies to every category.
    pub applicable_categories: Option<Vec<Uuid>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Flat,
    Percentage,
}

impl DiscountKind {
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if s.eq_ignore_ascii_case("flat") {
            Some(Self::Flat)
        } else if s.eq_ignore_ascii_case("percentage") {
            Some(Self::Percentage)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Percentage => "percentage",
        }
    }
}

/// Per-order financial snapshot; settlement flags move independently.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SellerAnalytics {
    pub id: Uuid,
    pub order_id: Uuid,
    pub seller_id: Uuid,
    pub platform_commission: i64,
    pub total_commission_percentage: i32,
    pub seller_earning: i64,
    pub delivery_partner_fee: i64,
    pub platform_commission_status: SettlementStatus,
    pub delivery_partner_fee_status: SettlementStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
