use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        analytics::{AnalyticsList, SellerSummary, SettlementUpdateRequest},
        offers::{CreateOfferRequest, OfferList, UpdateOfferRequest},
        orders::{
            AssignPartnerRequest, CreateOrderRequest, OrderItemRequest, OrderList, OrderStats,
            OrderWithItems, SellerOrderList, SellerOrderView, UpdateOrderStatusRequest,
        },
    },
    models::{DiscountKind, Offer, Order, OrderAddress, OrderItem, SellerAnalytics},
    response::{ApiResponse, Meta},
    routes::{admin, analytics, health, offers, orders, params},
    status::{OrderStatus, PaymentMode, PaymentStatus, SettlementStatus},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::create_orders,
        orders::list_orders,
        orders::list_seller_orders,
        orders::order_stats,
        orders::get_order,
        orders::update_status,
        orders::download_invoice,
        offers::list_offers,
        analytics::list_analytics,
        analytics::seller_summary,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::assign_partner,
        admin::create_offer,
        admin::update_offer,
        admin::update_settlement,
        admin::purge_analytics
    ),
    components(
        schemas(
            Order,
            OrderItem,
            OrderAddress,
            Offer,
            SellerAnalytics,
            OrderStatus,
            PaymentMode,
            PaymentStatus,
            SettlementStatus,
            DiscountKind,
            CreateOrderRequest,
            OrderItemRequest,
            UpdateOrderStatusRequest,
            AssignPartnerRequest,
            OrderList,
            OrderWithItems,
            SellerOrderView,
            SellerOrderList,
            OrderStats,
            CreateOfferRequest,
            UpdateOfferRequest,
            OfferList,
            SettlementUpdateRequest,
            AnalyticsList,
            SellerSummary,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OfferList>,
            ApiResponse<SellerSummary>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Checkout, listings, status and invoices"),
        (name = "Offers", description = "Promotional coupons"),
        (name = "Analytics", description = "Seller earnings and settlement"),
        (name = "Admin", description = "Order oversight, delivery assignment, offers, settlement"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
