use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::SellerAnalytics;

/// Settlement flags update independently; omitted fields are left untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SettlementUpdateRequest {
    pub platform_commission_status: Option<String>,
    pub delivery_partner_fee_status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsList {
    pub items: Vec<SellerAnalytics>,
}

/// Summary cards for the seller dashboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct SellerSummary {
    pub total_orders: i64,
    pub total_earning: i64,
    pub total_platform_commission: i64,
    pub total_delivery_fees: i64,
    pub pending_platform_commission: i64,
}
