use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Order lifecycle states. PLACED is the state every checkout starts in;
/// CANCELLED is terminal for buyers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Case-insensitive parse. "COMPLETED" is a legacy alias for DELIVERED
    /// still sent by older clients.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        let status = if s.eq_ignore_ascii_case("placed") {
            Self::Placed
        } else if s.eq_ignore_ascii_case("pending") {
            Self::Pending
        } else if s.eq_ignore_ascii_case("confirmed") {
            Self::Confirmed
        } else if s.eq_ignore_ascii_case("shipped") {
            Self::Shipped
        } else if s.eq_ignore_ascii_case("delivered") || s.eq_ignore_ascii_case("completed") {
            Self::Delivered
        } else if s.eq_ignore_ascii_case("cancelled") {
            Self::Cancelled
        } else {
            return None;
        };
        Some(status)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placed => "PLACED",
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDenied {
    /// The acting role may not move the order from its current state to the
    /// requested one.
    NotPermitted,
}

/// Per-actor transition allow-list.
///
/// Buyers get exactly one move: cancelling an order that is still PLACED.
/// Sellers and admins may set any non-initial status without a progression
/// check; operationally they re-flag orders back and forth (e.g. SHIPPED back
/// to CONFIRMED after a failed pickup), so the policy stays deliberately lax.
pub fn authorize_transition(
    role: &str,
    current: OrderStatus,
    requested: OrderStatus,
) -> Result<(), TransitionDenied> {
    match role {
        "buyer" => {
            if current == OrderStatus::Placed && requested == OrderStatus::Cancelled {
                Ok(())
            } else {
                Err(TransitionDenied::NotPermitted)
            }
        }
        "seller" | "admin" => {
            if requested == OrderStatus::Placed {
                Err(TransitionDenied::NotPermitted)
            } else {
                Ok(())
            }
        }
        _ => Err(TransitionDenied::NotPermitted),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    Cod,
    Online,
}

impl PaymentMode {
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if s.eq_ignore_ascii_case("cod") {
            Some(Self::Cod)
        } else if s.eq_ignore_ascii_case("online") {
            Some(Self::Online)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cod => "COD",
            Self::Online => "ONLINE",
        }
    }

    /// COD settles on delivery, online payments are captured upstream before
    /// the order reaches us.
    pub fn initial_payment_status(&self) -> PaymentStatus {
        match self {
            Self::Cod => PaymentStatus::Pending,
            Self::Online => PaymentStatus::Paid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
        }
    }
}

/// Settlement state of a commission or fee line in seller analytics, tracked
/// independently from order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    Pending,
    Completed,
}

impl SettlementStatus {
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim();
        if s.eq_ignore_ascii_case("pending") {
            Some(Self::Pending)
        } else if s.eq_ignore_ascii_case("completed") {
            Some(Self::Completed)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(OrderStatus::parse("placed"), Some(OrderStatus::Placed));
        assert_eq!(OrderStatus::parse(" SHIPPED "), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::parse("Cancelled"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::parse("delivered"), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::parse("REFUNDED"), None);
    }

    #[test]
    fn completed_aliases_delivered() {
        assert_eq!(OrderStatus::parse("COMPLETED"), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::parse("completed"), Some(OrderStatus::Delivered));
    }

    #[test]
    fn buyer_may_only_cancel_placed() {
        assert!(authorize_transition("buyer", OrderStatus::Placed, OrderStatus::Cancelled).is_ok());
        assert!(
            authorize_transition("buyer", OrderStatus::Confirmed, OrderStatus::Cancelled).is_err()
        );
        assert!(authorize_transition("buyer", OrderStatus::Placed, OrderStatus::Shipped).is_err());
    }

    #[test]
    fn seller_and_admin_set_any_non_initial_status() {
        for role in ["seller", "admin"] {
            assert!(authorize_transition(role, OrderStatus::Delivered, OrderStatus::Pending).is_ok());
            assert!(authorize_transition(role, OrderStatus::Placed, OrderStatus::Shipped).is_ok());
            assert!(authorize_transition(role, OrderStatus::Shipped, OrderStatus::Placed).is_err());
        }
    }

    #[test]
    fn delivery_partner_cannot_change_status() {
        assert!(
            authorize_transition("delivery_partner", OrderStatus::Placed, OrderStatus::Shipped)
                .is_err()
        );
    }

    #[test]
    fn payment_mode_defaults() {
        assert_eq!(PaymentMode::parse("cod"), Some(PaymentMode::Cod));
        assert_eq!(PaymentMode::parse("ONLINE"), Some(PaymentMode::Online));
        assert_eq!(PaymentMode::parse("upi"), None);
        assert_eq!(PaymentMode::Cod.initial_payment_status(), PaymentStatus::Pending);
        assert_eq!(PaymentMode::Online.initial_payment_status(), PaymentStatus::Paid);
    }
}
