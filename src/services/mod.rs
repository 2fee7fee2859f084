pub mod admin_service;
pub mod analytics_service;
pub mod assignment_service;
pub mod offer_service;
pub mod order_service;
