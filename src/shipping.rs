/// Shipping fee policy, injected through `AppState` so the active tiering can
/// be swapped without touching checkout code.
pub trait ShippingPolicy: Send + Sync {
    fn fee(&self, item_count: usize, subtotal: i64) -> i64;

    fn name(&self) -> &'static str;
}

/// Reference tiering: single-item orders pay by value band, multi-item orders
/// only ship free above 2000 with at least 5 items.
#[derive(Debug, Default)]
pub struct TieredShipping;

impl ShippingPolicy for TieredShipping {
    fn fee(&self, item_count: usize, subtotal: i64) -> i64 {
        if item_count == 1 {
            if subtotal > 2000 {
                return 0;
            }
            if subtotal < 500 {
                return 80;
            }
            return 100;
        }

        if subtotal > 2000 {
            if item_count >= 5 {
                return 0;
            }
            return 100;
        }

        100
    }

    fn name(&self) -> &'static str {
        "tiered"
    }
}

/// Promotional flat-zero policy.
#[derive(Debug, Default)]
pub struct FreeShipping;

impl ShippingPolicy for FreeShipping {
    fn fee(&self, _item_count: usize, _subtotal: i64) -> i64 {
        0
    }

    fn name(&self) -> &'static str {
        "free"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_item_bands() {
        let policy = TieredShipping;
        assert_eq!(policy.fee(1, 400), 80);
        assert_eq!(policy.fee(1, 499), 80);
        assert_eq!(policy.fee(1, 500), 100);
        assert_eq!(policy.fee(1, 1000), 100);
        assert_eq!(policy.fee(1, 2000), 100);
        assert_eq!(policy.fee(1, 2500), 0);
    }

    #[test]
    fn multi_item_bands() {
        let policy = TieredShipping;
        assert_eq!(policy.fee(3, 2500), 100);
        assert_eq!(policy.fee(5, 2500), 0);
        assert_eq!(policy.fee(6, 2500), 0);
        assert_eq!(policy.fee(2, 1500), 100);
        assert_eq!(policy.fee(7, 2000), 100);
    }

    #[test]
    fn free_policy_is_always_zero() {
        let policy = FreeShipping;
        assert_eq!(policy.fee(1, 400), 0);
        assert_eq!(policy.fee(9, 99999), 0);
    }
}
