use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::analytics::{AnalyticsList, SellerSummary, SettlementUpdateRequest},
    entity::seller_analytics::{
        ActiveModel as AnalyticsActive, Column as AnalyticsCol, Entity as Analytics,
        Model as AnalyticsModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_seller},
    models::SellerAnalytics,
    response::{ApiResponse, Meta},
    state::AppState,
    status::SettlementStatus,
};

/// Update one or both settlement flags. The flags move independently: paying
/// out a delivery fee says nothing about the platform commission.
pub async fn update_settlement(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: SettlementUpdateRequest,
) -> AppResult<ApiResponse<SellerAnalytics>> {
    ensure_admin(user)?;

    if payload.platform_commission_status.is_none() && payload.delivery_partner_fee_status.is_none()
    {
        return Err(AppError::Validation("No settlement field to update".into()));
    }

    let existing = Analytics::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Analytics record"))?;

    let mut active: AnalyticsActive = existing.into();
    if let Some(raw) = payload.platform_commission_status.as_deref() {
        let status = parse_settlement(raw)?;
        active.platform_commission_status = Set(status.as_str().into());
    }
    if let Some(raw) = payload.delivery_partner_fee_status.as_deref() {
        let status = parse_settlement(raw)?;
        active.delivery_partner_fee_status = Set(status.as_str().into());
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "settlement_update",
        Some("seller_analytics"),
        Some(serde_json::json!({ "analytics_id": updated.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Settlement updated",
        analytics_from_entity(updated)?,
        Some(Meta::empty()),
    ))
}

/// Admin purge; the only deletion path for analytics records.
pub async fn purge_record(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Analytics::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Analytics record"));
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "analytics_purge",
        Some("seller_analytics"),
        Some(serde_json::json!({ "analytics_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Analytics record deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_for_seller(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AnalyticsList>> {
    ensure_seller(user)?;

    let items = Analytics::find()
        .filter(AnalyticsCol::SellerId.eq(user.user_id))
        .order_by_desc(AnalyticsCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(analytics_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success("OK", AnalyticsList { items }, Some(Meta::empty())))
}

/// Summary cards for the seller dashboard, aggregated in SQL.
pub async fn seller_summary(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<SellerSummary>> {
    ensure_seller(user)?;

    let row: (i64, i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COALESCE(SUM(seller_earning), 0)::BIGINT,
               COALESCE(SUM(platform_commission), 0)::BIGINT,
               COALESCE(SUM(delivery_partner_fee), 0)::BIGINT,
               COALESCE(SUM(platform_commission) FILTER (WHERE platform_commission_status = 'PENDING'), 0)::BIGINT
        FROM seller_analytics
        WHERE seller_id = $1
        "#,
    )
    .bind(user.user_id)
    .fetch_one(&state.pool)
    .await?;

    let summary = SellerSummary {
        total_orders: row.0,
        total_earning: row.1,
        total_platform_commission: row.2,
        total_delivery_fees: row.3,
        pending_platform_commission: row.4,
    };

    Ok(ApiResponse::success("OK", summary, Some(Meta::empty())))
}

fn parse_settlement(raw: &str) -> AppResult<SettlementStatus> {
    SettlementStatus::parse(raw)
        .ok_or_else(|| AppError::Validation(format!("Unknown settlement status: {raw}")))
}

fn analytics_from_entity(model: AnalyticsModel) -> AppResult<SellerAnalytics> {
    let platform_commission_status = parse_settlement(&model.platform_commission_status)?;
    let delivery_partner_fee_status = parse_settlement(&model.delivery_partner_fee_status)?;

    Ok(SellerAnalytics {
        id: model.id,
        order_id: model.order_id,
        seller_id: model.seller_id,
        platform_commission: model.platform_commission,
        total_commission_percentage: model.total_commission_percentage,
        seller_earning: model.seller_earning,
        delivery_partner_fee: model.delivery_partner_fee,
        platform_commission_status,
        delivery_partner_fee_status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
