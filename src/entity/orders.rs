use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub delivery_partner_id: Option<Uuid>,
    pub total_amount: i64,
    pub shipping_charge: i64,
    pub discount_amount: i64,
    pub coupon_code: Option<String>,
    pub discount_remark: Option<String>,
    pub order_status: String,
    pub payment_mode: String,
    pub payment_status: String,
    pub address_full: String,
    pub address_mobile: String,
    pub address_city: String,
    pub address_state: String,
    pub address_pincode: String,
    pub address_lat: Option<f64>,
    pub address_lng: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::BuyerId",
        to = "super::users::Column::Id"
    )]
    Buyer,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
    #[sea_orm(has_one = "super::seller_analytics::Entity")]
    SellerAnalytics,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buyer.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::seller_analytics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SellerAnalytics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
