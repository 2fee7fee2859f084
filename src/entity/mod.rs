pub mod offer_redemptions;
pub mod offers;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod seller_analytics;
pub mod seller_profiles;
pub mod users;

pub use offer_redemptions::Entity as OfferRedemptions;
pub use offers::Entity as Offers;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use seller_analytics::Entity as SellerAnalytics;
pub use seller_profiles::Entity as SellerProfiles;
pub use users::Entity as Users;
