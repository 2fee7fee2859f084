use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderAddress, OrderItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub address: OrderAddress,
    /// COD when omitted.
    pub payment_mode: Option<String>,
    pub coupon_code: Option<String>,
    /// Manual discount amount; ignored when a coupon code is present.
    pub discount: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignPartnerRequest {
    /// `null` unassigns the current partner.
    pub partner_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

/// Seller-facing order view: includes the buyer's contact so the seller can
/// coordinate fulfilment. Buyers never receive this shape.
#[derive(Debug, Serialize, ToSchema)]
pub struct SellerOrderView {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub buyer_name: Option<String>,
    pub buyer_mobile: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SellerOrderList {
    pub items: Vec<SellerOrderView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStats {
    pub total_orders: i64,
    pub total_spent: i64,
}
