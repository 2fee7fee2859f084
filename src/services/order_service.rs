use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    checkout::{self, GroupItem, SellerGroup},
    dto::orders::{
        CreateOrderRequest, OrderList, OrderStats, OrderWithItems, SellerOrderList,
        SellerOrderView, UpdateOrderStatusRequest,
    },
    entity::{
        offer_redemptions::ActiveModel as RedemptionActive,
        offers::{Column as OfferCol, Entity as Offers, Model as OfferModel},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
        seller_analytics::ActiveModel as AnalyticsActive,
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    invoice::{self, InvoiceLine},
    middleware::auth::{AuthUser, ensure_buyer},
    models::{DiscountKind, Order, OrderAddress, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    status::{OrderStatus, PaymentMode, PaymentStatus, authorize_transition},
    state::AppState,
};

/// Split the cart by seller and create one order per seller group, all inside
/// a single transaction: either every group's order, items, analytics row and
/// stock decrement land, or none do.
pub async fn create_orders(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Vec<OrderWithItems>>> {
    ensure_buyer(user)?;

    if payload.items.is_empty() {
        return Err(AppError::Validation("Items required".into()));
    }
    if payload.items.iter().any(|it| it.quantity <= 0) {
        return Err(AppError::Validation("quantity must be greater than 0".into()));
    }

    let payment_mode = match payload.payment_mode.as_deref() {
        None => PaymentMode::Cod,
        Some(raw) => PaymentMode::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Unknown payment mode: {raw}")))?,
    };

    let txn = state.orm.begin().await?;

    // Resolve, validate and decrement under row locks. The conditional
    // decrement (stock >= qty) closes the check/decrement race against
    // writers outside this lock set.
    let mut groups: Vec<SellerGroup> = Vec::new();
    for item in &payload.items {
        let product = Products::find_by_id(item.product_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or(AppError::ProductNotFound { product_id: item.product_id })?;

        if product.stock < item.quantity {
            return Err(AppError::InsufficientStock {
                product_id: product.id,
                available: product.stock,
            });
        }

        let decremented = Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(item.quantity))
            .filter(ProdCol::Id.eq(product.id))
            .filter(ProdCol::Stock.gte(item.quantity))
            .exec(&txn)
            .await?;
        if decremented.rows_affected == 0 {
            return Err(AppError::InsufficientStock {
                product_id: product.id,
                available: product.stock,
            });
        }

        checkout::add_line(
            &mut groups,
            product.seller_id,
            GroupItem {
                product_id: product.id,
                quantity: item.quantity,
                price: product.price,
                commission_percent: product.commission_percent,
                category_id: product.category_id,
            },
        );
    }

    let shipping: Vec<i64> = groups
        .iter()
        .map(|g| state.shipping.fee(g.items.len(), g.subtotal))
        .collect();
    let cart_subtotal: i64 = groups.iter().map(|g| g.subtotal).sum();

    let mut coupon: Option<OfferModel> = None;
    let mut categories: Option<Vec<Uuid>> = None;
    let mut total_discount: i64 = 0;

    if let Some(code) = payload
        .coupon_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        let offer = resolve_offer(&txn, code, cart_subtotal).await?;
        categories = offer_categories(&offer)?;
        let global_eligible: i64 = groups
            .iter()
            .map(|g| checkout::eligible_subtotal(g, categories.as_deref()))
            .sum();
        total_discount = match DiscountKind::parse(&offer.kind) {
            Some(DiscountKind::Flat) => offer.value,
            Some(DiscountKind::Percentage) => global_eligible * offer.value / 100,
            None => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "offer {} has unknown discount kind {}",
                    offer.id,
                    offer.kind
                )));
            }
        };
        coupon = Some(offer);
    } else if let Some(amount) = payload.discount {
        if amount < 0 {
            return Err(AppError::Validation("discount must not be negative".into()));
        }
        total_discount = amount;
    }

    let allocations =
        checkout::allocate_discount(&groups, &shipping, total_discount, categories.as_deref())
            .map_err(|_| AppError::CouponNotApplicable("no item in the cart qualifies".into()))?;

    let mut created: Vec<OrderWithItems> = Vec::new();
    let mut total_allocated: i64 = 0;

    for (i, group) in groups.iter().enumerate() {
        let fin = checkout::settle_group(group, shipping[i], allocations[i]);
        total_allocated += fin.discount;

        let remark = coupon
            .as_ref()
            .filter(|_| fin.discount > 0)
            .map(|offer| format!("Coupon {} applied", offer.code));

        let order = OrderActive {
            id: Set(Uuid::new_v4()),
            buyer_id: Set(user.user_id),
            seller_id: Set(group.seller_id),
            delivery_partner_id: Set(None),
            total_amount: Set(fin.final_total),
            shipping_charge: Set(fin.shipping_charge),
            discount_amount: Set(fin.discount),
            coupon_code: Set(coupon
                .as_ref()
                .filter(|_| fin.discount > 0)
                .map(|o| o.code.clone())),
            discount_remark: Set(remark),
            order_status: Set(OrderStatus::Placed.as_str().into()),
            payment_mode: Set(payment_mode.as_str().into()),
            payment_status: Set(payment_mode.initial_payment_status().as_str().into()),
            address_full: Set(payload.address.full_address.clone()),
            address_mobile: Set(payload.address.mobile.clone()),
            address_city: Set(payload.address.city.clone()),
            address_state: Set(payload.address.state.clone()),
            address_pincode: Set(payload.address.pincode.clone()),
            address_lat: Set(payload.address.lat),
            address_lng: Set(payload.address.lng),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;

        let mut items: Vec<OrderItem> = Vec::new();
        for gi in &group.items {
            let item = OrderItemActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                product_id: Set(gi.product_id),
                quantity: Set(gi.quantity),
                price: Set(gi.price),
                commission_percent: Set(gi.commission_percent),
                category_id: Set(gi.category_id),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?;
            items.push(order_item_from_entity(item));
        }

        AnalyticsActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            seller_id: Set(group.seller_id),
            platform_commission: Set(fin.platform_commission),
            total_commission_percentage: Set(fin.total_commission_percentage),
            seller_earning: Set(fin.seller_earning),
            delivery_partner_fee: Set(fin.delivery_partner_fee),
            platform_commission_status: Set("PENDING".into()),
            delivery_partner_fee_status: Set("PENDING".into()),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;

        created.push(OrderWithItems {
            order: order_from_entity(order)?,
            items,
        });
    }

    if let Some(offer) = &coupon {
        if total_allocated > 0 {
            RedemptionActive {
                id: Set(Uuid::new_v4()),
                offer_id: Set(offer.id),
                buyer_id: Set(user.user_id),
                original_amount: Set(cart_subtotal),
                discount_amount: Set(total_allocated),
                final_amount: Set(cart_subtotal - total_allocated),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({
            "orders": created.iter().map(|o| o.order.id).collect::<Vec<_>>(),
            "coupon": coupon.as_ref().map(|o| o.code.clone()),
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Orders placed", created, Some(Meta::empty())))
}

async fn resolve_offer(
    txn: &sea_orm::DatabaseTransaction,
    code: &str,
    cart_subtotal: i64,
) -> AppResult<OfferModel> {
    let offer = Offers::find()
        .filter(OfferCol::Code.eq(code.to_uppercase()))
        .one(txn)
        .await?
        .ok_or_else(|| AppError::CouponNotApplicable(format!("unknown code {code}")))?;

    if !offer.is_active {
        return Err(AppError::CouponNotApplicable("code is no longer active".into()));
    }
    if let Some(expiry) = offer.expiry_date {
        if expiry.with_timezone(&Utc) < Utc::now() {
            return Err(AppError::CouponNotApplicable("code has expired".into()));
        }
    }
    if cart_subtotal < offer.min_cart_amount {
        return Err(AppError::CouponNotApplicable(format!(
            "cart is below the minimum of {}",
            offer.min_cart_amount
        )));
    }

    Ok(offer)
}

/// Decode the offer's category restriction. Empty array and null both mean
/// unrestricted.
fn offer_categories(offer: &OfferModel) -> AppResult<Option<Vec<Uuid>>> {
    let Some(value) = &offer.applicable_categories else {
        return Ok(None);
    };
    let cats: Vec<Uuid> = serde_json::from_value(value.clone())
        .map_err(|err| AppError::Internal(anyhow::anyhow!("bad category list on offer: {err}")))?;
    if cats.is_empty() { Ok(None) } else { Ok(Some(cats)) }
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::BuyerId.eq(user.user_id));
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status = OrderStatus::parse(status)
            .ok_or_else(|| AppError::Validation(format!("Unknown order status: {status}")))?;
        condition = condition.add(OrderCol::OrderStatus.eq(status.as_str()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", OrderList { items: orders }, Some(meta)))
}

/// Seller-facing listing: same orders, plus the buyer contact the seller
/// needs for fulfilment.
pub async fn list_seller_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<SellerOrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::SellerId.eq(user.user_id));
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status = OrderStatus::parse(status)
            .ok_or_else(|| AppError::Validation(format!("Unknown order status: {status}")))?;
        condition = condition.add(OrderCol::OrderStatus.eq(status.as_str()));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let buyer_ids: Vec<Uuid> = orders.iter().map(|o| o.buyer_id).collect();
    let buyers = Users::find()
        .filter(UserCol::Id.is_in(buyer_ids))
        .all(&state.orm)
        .await?;

    let mut views = Vec::with_capacity(orders.len());
    for model in orders {
        let buyer = buyers.iter().find(|u| u.id == model.buyer_id);
        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(model.id))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(order_item_from_entity)
            .collect();
        views.push(SellerOrderView {
            buyer_name: buyer.and_then(|u| u.full_name.clone()),
            buyer_mobile: buyer.map(|u| u.mobile.clone()).unwrap_or_default(),
            order: order_from_entity(model)?,
            items,
        });
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", SellerOrderList { items: views }, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let model = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    if model.buyer_id != user.user_id && model.seller_id != user.user_id && user.role != "admin" {
        return Err(AppError::Forbidden);
    }

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(model.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems { order: order_from_entity(model)?, items },
        Some(Meta::empty()),
    ))
}

/// Status change guarded by the per-actor transition policy.
pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let requested = OrderStatus::parse(&payload.status)
        .ok_or_else(|| AppError::Validation(format!("Unknown order status: {}", payload.status)))?;

    let model = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    if user.role == "buyer" && model.buyer_id != user.user_id {
        return Err(AppError::Forbidden);
    }
    if user.role == "seller" && model.seller_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let current = parse_stored_status(&model.order_status)?;
    authorize_transition(&user.role, current, requested)
        .map_err(|_| AppError::UnauthorizedTransition)?;

    let mut active: OrderActive = model.into();
    active.order_status = Set(requested.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": updated.id, "status": updated.order_status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(updated)?,
        Some(Meta::empty()),
    ))
}

pub async fn order_stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderStats>> {
    let row: (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(total_amount), 0)::BIGINT FROM orders WHERE buyer_id = $1",
    )
    .bind(user.user_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "OK",
        OrderStats { total_orders: row.0, total_spent: row.1 },
        Some(Meta::empty()),
    ))
}

/// Render the invoice for an order the caller may see. Returns the suggested
/// filename and the document body.
pub async fn invoice_document(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<(String, String)> {
    let resp = get_order(state, user, id).await?;
    let data = resp
        .data
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("missing order data")))?;

    let product_ids: Vec<Uuid> = data.items.iter().map(|i| i.product_id).collect();
    let products = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .all(&state.orm)
        .await?;

    let lines: Vec<InvoiceLine> = data
        .items
        .iter()
        .map(|item| InvoiceLine {
            name: products
                .iter()
                .find(|p| p.id == item.product_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| item.product_id.to_string()),
            quantity: item.quantity,
            price: item.price,
        })
        .collect();

    let body = invoice::render_invoice(&data.order, &lines);
    Ok((format!("invoice-{}.txt", data.order.id), body))
}

pub(crate) fn parse_stored_status(raw: &str) -> AppResult<OrderStatus> {
    OrderStatus::parse(raw)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("corrupt order status in store: {raw}")))
}

pub(crate) fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let order_status = parse_stored_status(&model.order_status)?;
    let payment_mode = PaymentMode::parse(&model.payment_mode)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("corrupt payment mode in store")))?;
    let payment_status = match model.payment_status.as_str() {
        "PAID" => PaymentStatus::Paid,
        _ => PaymentStatus::Pending,
    };

    Ok(Order {
        id: model.id,
        buyer_id: model.buyer_id,
        seller_id: model.seller_id,
        delivery_partner_id: model.delivery_partner_id,
        total_amount: model.total_amount,
        shipping_charge: model.shipping_charge,
        discount_amount: model.discount_amount,
        coupon_code: model.coupon_code,
        discount_remark: model.discount_remark,
        order_status,
        payment_mode,
        payment_status,
        address: OrderAddress {
            full_address: model.address_full,
            mobile: model.address_mobile,
            city: model.address_city,
            state: model.address_state,
            pincode: model.address_pincode,
            lat: model.address_lat,
            lng: model.address_lng,
        },
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

pub(crate) fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        commission_percent: model.commission_percent,
        category_id: model.category_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
