use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::AssignPartnerRequest,
    entity::{
        orders::{ActiveModel as OrderActive, Entity as Orders, Model as OrderModel},
        seller_profiles::{Column as ProfileCol, Entity as SellerProfiles},
        users::{Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Order,
    notify::Notification,
    pincode,
    response::{ApiResponse, Meta},
    services::order_service::order_from_entity,
    state::AppState,
    status::OrderStatus,
};

/// Assign or unassign a delivery partner for one order.
///
/// Assignment only goes through when the partner serves the seller's pincode;
/// a mismatch leaves both the partner field and the order status untouched.
pub async fn assign_partner(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
    payload: AssignPartnerRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let order = Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    let Some(partner_id) = payload.partner_id else {
        return unassign(state, user, order).await;
    };

    let partner = Users::find_by_id(partner_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Delivery partner"))?;
    if partner.role != "delivery_partner" {
        return Err(AppError::Validation("User is not a delivery partner".into()));
    }

    let seller_pincode = resolve_seller_pincode(state, order.seller_id).await?;
    let partner_pincode = partner
        .pincode
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(AppError::PartnerPincodeUnknown)?
        .to_string();

    if seller_pincode.trim() != partner_pincode {
        return Err(AppError::PincodeMismatch {
            seller: seller_pincode,
            partner: partner_pincode,
        });
    }

    let seller_id = order.seller_id;
    let mut active: OrderActive = order.into();
    active.delivery_partner_id = Set(Some(partner.id));
    active.order_status = Set(OrderStatus::Confirmed.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    enqueue_notifications(state, &updated, &partner, seller_id).await;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "partner_assigned",
        Some("orders"),
        Some(serde_json::json!({ "order_id": updated.id, "partner_id": partner.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Delivery partner assigned",
        order_from_entity(updated)?,
        Some(Meta::empty()),
    ))
}

/// Clearing the partner does not touch the order status.
async fn unassign(
    state: &AppState,
    user: &AuthUser,
    order: OrderModel,
) -> AppResult<ApiResponse<Order>> {
    let mut active: OrderActive = order.into();
    active.delivery_partner_id = Set(None);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "partner_unassigned",
        Some("orders"),
        Some(serde_json::json!({ "order_id": updated.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Delivery partner unassigned",
        order_from_entity(updated)?,
        Some(Meta::empty()),
    ))
}

/// Seller pincode: structured profile field first, then a 6-digit token from
/// the profile's free-text address, then from the seller user's address.
async fn resolve_seller_pincode(state: &AppState, seller_id: Uuid) -> AppResult<String> {
    let profile = SellerProfiles::find()
        .filter(ProfileCol::UserId.eq(seller_id))
        .one(&state.orm)
        .await?;

    if let Some(profile) = &profile {
        if let Some(pin) = profile.pincode.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            return Ok(pin.to_string());
        }
        if let Some(pin) = profile.address.as_deref().and_then(pincode::extract_pincode) {
            return Ok(pin);
        }
    }

    let seller = Users::find_by_id(seller_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Seller"))?;
    if let Some(pin) = seller.address.as_deref().and_then(pincode::extract_pincode) {
        return Ok(pin);
    }

    Err(AppError::SellerPincodeUnknown)
}

/// Fire-and-forget: the queue feeds the external messaging collaborator and
/// never fails the assignment.
async fn enqueue_notifications(
    state: &AppState,
    order: &OrderModel,
    partner: &UserModel,
    seller_id: Uuid,
) {
    let pickup_address = match SellerProfiles::find()
        .filter(ProfileCol::UserId.eq(seller_id))
        .one(&state.orm)
        .await
    {
        Ok(profile) => profile
            .and_then(|p| p.address)
            .unwrap_or_else(|| "seller address on file".to_string()),
        Err(err) => {
            tracing::warn!(error = %err, "pickup address lookup failed");
            "seller address on file".to_string()
        }
    };

    state.notifier.enqueue(Notification::PartnerAssignment {
        partner_id: partner.id,
        order_id: order.id,
        pickup_address,
        drop_address: order.address_full.clone(),
        drop_pincode: order.address_pincode.clone(),
    });
    state.notifier.enqueue(Notification::SellerAssignment {
        seller_id,
        order_id: order.id,
        partner_name: partner.full_name.clone().unwrap_or_default(),
        partner_mobile: partner.mobile.clone(),
    });
}
