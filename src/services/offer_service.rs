use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::offers::{CreateOfferRequest, OfferList, UpdateOfferRequest},
    entity::offers::{ActiveModel as OfferActive, Column as OfferCol, Entity as Offers, Model as OfferModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{DiscountKind, Offer},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn create_offer(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOfferRequest,
) -> AppResult<ApiResponse<Offer>> {
    ensure_admin(user)?;

    let code = payload.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(AppError::Validation("Coupon code is required".into()));
    }
    let kind = DiscountKind::parse(&payload.kind)
        .ok_or_else(|| AppError::Validation(format!("Unknown discount kind: {}", payload.kind)))?;
    if payload.value <= 0 {
        return Err(AppError::Validation("Discount value must be positive".into()));
    }

    let existing = Offers::find()
        .filter(OfferCol::Code.eq(code.clone()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Validation("Coupon code already exists".into()));
    }

    let categories = payload
        .applicable_categories
        .filter(|cats| !cats.is_empty())
        .map(|cats| serde_json::json!(cats));

    let offer = OfferActive {
        id: Set(Uuid::new_v4()),
        code: Set(code),
        tagline: Set(payload.tagline),
        kind: Set(kind.as_str().into()),
        value: Set(payload.value),
        min_cart_amount: Set(payload.min_cart_amount.unwrap_or(0)),
        expiry_date: Set(payload.expiry_date.map(Into::into)),
        applicable_categories: Set(categories),
        is_active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "offer_create",
        Some("offers"),
        Some(serde_json::json!({ "offer_id": offer.id, "code": offer.code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Offer created",
        offer_from_entity(offer)?,
        Some(Meta::empty()),
    ))
}

/// Toggling only affects future checkouts; orders already referencing the
/// code keep their discount.
pub async fn set_offer_active(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOfferRequest,
) -> AppResult<ApiResponse<Offer>> {
    ensure_admin(user)?;

    let existing = Offers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Offer"))?;

    let mut active: OfferActive = existing.into();
    active.is_active = Set(payload.is_active);
    let offer = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "offer_toggle",
        Some("offers"),
        Some(serde_json::json!({ "offer_id": offer.id, "is_active": offer.is_active })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Offer updated",
        offer_from_entity(offer)?,
        Some(Meta::empty()),
    ))
}

/// Offers a buyer can currently apply: active and not past expiry.
pub async fn list_active_offers(state: &AppState) -> AppResult<ApiResponse<OfferList>> {
    let now = Utc::now();
    let condition = Condition::all().add(OfferCol::IsActive.eq(true)).add(
        Condition::any()
            .add(OfferCol::ExpiryDate.is_null())
            .add(OfferCol::ExpiryDate.gte(now)),
    );

    let items = Offers::find()
        .filter(condition)
        .order_by_desc(OfferCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(offer_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::success("Offers", OfferList { items }, Some(Meta::empty())))
}

fn offer_from_entity(model: OfferModel) -> AppResult<Offer> {
    let kind = DiscountKind::parse(&model.kind)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("corrupt discount kind in store")))?;
    let applicable_categories = match model.applicable_categories {
        None => None,
        Some(value) => {
            let cats: Vec<Uuid> = serde_json::from_value(value).map_err(|err| {
                AppError::Internal(anyhow::anyhow!("bad category list on offer: {err}"))
            })?;
            if cats.is_empty() { None } else { Some(cats) }
        }
    };

    Ok(Offer {
        id: model.id,
        code: model.code,
        tagline: model.tagline,
        kind,
        value: model.value,
        min_cart_amount: model.min_cart_amount,
        expiry_date: model.expiry_date.map(|dt| dt.with_timezone(&Utc)),
        applicable_categories,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
