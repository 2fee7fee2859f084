use sea_orm::entity::prelude::*;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    /// Stored uppercase; lookups uppercase the input first.
    #[sea_orm(unique)]
    pub code: String,
    pub tagline: String,
    /// flat | percentage
    pub kind: String,
    pub value: i64,
    pub min_cart_amount: i64,
    pub expiry_date: Option<DateTimeWithTimeZone>,
    /// JSON array of category ids; null/empty means unrestricted.
    pub applicable_categories: Option<Value>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::offer_redemptions::Entity")]
    OfferRedemptions,
}

impl Related<super::offer_redemptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OfferRedemptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
