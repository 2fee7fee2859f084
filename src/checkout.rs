use uuid::Uuid;

/// One resolved cart line inside a seller group. Price, commission percent and
/// category are snapshotted from the product at checkout time.
#[derive(Debug, Clone)]
pub struct GroupItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: i64,
    pub commission_percent: i32,
    pub category_id: Uuid,
}

/// The subset of a buyer's cart belonging to one seller; becomes one order.
#[derive(Debug, Clone)]
pub struct SellerGroup {
    pub seller_id: Uuid,
    pub items: Vec<GroupItem>,
    pub subtotal: i64,
    pub platform_commission: i64,
}

/// Commission for a single line, floored to whole currency units.
pub fn line_commission(price: i64, quantity: i32, commission_percent: i32) -> i64 {
    price * quantity as i64 * commission_percent as i64 / 100
}

/// Accumulate a resolved line into its seller's group, creating the group on
/// first sight. Groups keep the order sellers first appear in the cart.
pub fn add_line(groups: &mut Vec<SellerGroup>, seller_id: Uuid, item: GroupItem) {
    let amount = item.price * item.quantity as i64;
    let commission = line_commission(item.price, item.quantity, item.commission_percent);

    let idx = match groups.iter().position(|g| g.seller_id == seller_id) {
        Some(idx) => idx,
        None => {
            groups.push(SellerGroup {
                seller_id,
                items: Vec::new(),
                subtotal: 0,
                platform_commission: 0,
            });
            groups.len() - 1
        }
    };
    let group = &mut groups[idx];

    group.subtotal += amount;
    group.platform_commission += commission;
    group.items.push(item);
}

/// Portion of a group's value that qualifies for a coupon's category
/// restriction. `None` means the coupon is unrestricted.
pub fn eligible_subtotal(group: &SellerGroup, categories: Option<&[Uuid]>) -> i64 {
    match categories {
        None => group.subtotal,
        Some(cats) if cats.is_empty() => group.subtotal,
        Some(cats) => group
            .items
            .iter()
            .filter(|item| cats.contains(&item.category_id))
            .map(|item| item.price * item.quantity as i64)
            .sum(),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AllocationError {
    /// A positive discount was requested but no line in the cart qualifies.
    NothingEligible,
}

/// Distribute a global discount across seller groups in proportion to each
/// group's eligible subtotal.
///
/// Per-group shares are floored; the rounding residual is dropped rather than
/// redistributed, so the sum of allocations never exceeds the request. Each
/// share is additionally clamped to that group's subtotal plus shipping.
pub fn allocate_discount(
    groups: &[SellerGroup],
    shipping: &[i64],
    total_discount: i64,
    categories: Option<&[Uuid]>,
) -> Result<Vec<i64>, AllocationError> {
    if total_discount <= 0 {
        return Ok(vec![0; groups.len()]);
    }

    let eligibles: Vec<i64> = groups
        .iter()
        .map(|g| eligible_subtotal(g, categories))
        .collect();
    let global_eligible: i64 = eligibles.iter().sum();

    if global_eligible == 0 {
        return Err(AllocationError::NothingEligible);
    }

    let allocations = groups
        .iter()
        .zip(eligibles.iter())
        .zip(shipping.iter())
        .map(|((group, eligible), fee)| {
            let share =
                (total_discount as i128 * *eligible as i128 / global_eligible as i128) as i64;
            share.min(group.subtotal + fee)
        })
        .collect();

    Ok(allocations)
}

/// Financial snapshot for one seller group, persisted alongside the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFinancials {
    pub shipping_charge: i64,
    pub discount: i64,
    /// What the buyer owes for this seller's portion.
    pub final_total: i64,
    pub platform_commission: i64,
    /// Straight sum of per-line commission rates. Not a weighted average;
    /// downstream settlement reports consume it as-is.
    pub total_commission_percentage: i32,
    pub delivery_partner_fee: i64,
    pub seller_earning: i64,
}

/// Commission, fee split and earnings for one group. The discount must already
/// be folded into `final_total` before earnings is derived from it.
pub fn settle_group(group: &SellerGroup, shipping_charge: i64, discount: i64) -> GroupFinancials {
    let final_total = group.subtotal + shipping_charge - discount;
    let total_commission_percentage = group.items.iter().map(|i| i.commission_percent).sum();

    GroupFinancials {
        shipping_charge,
        discount,
        final_total,
        platform_commission: group.platform_commission,
        total_commission_percentage,
        // 80% of shipping goes to the delivery partner, the rest is platform
        // margin on shipping.
        delivery_partner_fee: shipping_charge * 80 / 100,
        seller_earning: final_total - group.platform_commission - shipping_charge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, qty: i32, percent: i32, category: Uuid) -> GroupItem {
        GroupItem {
            product_id: Uuid::new_v4(),
            quantity: qty,
            price,
            commission_percent: percent,
            category_id: category,
        }
    }

    #[test]
    fn lines_group_by_seller_preserving_first_seen_order() {
        let (s1, s2) = (Uuid::new_v4(), Uuid::new_v4());
        let cat = Uuid::new_v4();
        let mut groups = Vec::new();

        add_line(&mut groups, s1, item(300, 1, 10, cat));
        add_line(&mut groups, s2, item(500, 2, 5, cat));
        add_line(&mut groups, s1, item(100, 3, 0, cat));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].seller_id, s1);
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].subtotal, 600);
        assert_eq!(groups[0].platform_commission, 30);
        assert_eq!(groups[1].seller_id, s2);
        assert_eq!(groups[1].subtotal, 1000);
        assert_eq!(groups[1].platform_commission, 50);
    }

    #[test]
    fn line_commission_floors() {
        assert_eq!(line_commission(333, 1, 10), 33);
        assert_eq!(line_commission(100, 2, 15), 30);
        assert_eq!(line_commission(99, 1, 0), 0);
    }

    #[test]
    fn eligible_subtotal_honours_category_restriction() {
        let seller = Uuid::new_v4();
        let (books, toys) = (Uuid::new_v4(), Uuid::new_v4());
        let mut groups = Vec::new();
        add_line(&mut groups, seller, item(400, 1, 0, books));
        add_line(&mut groups, seller, item(600, 1, 0, toys));

        assert_eq!(eligible_subtotal(&groups[0], None), 1000);
        assert_eq!(eligible_subtotal(&groups[0], Some(&[])), 1000);
        assert_eq!(eligible_subtotal(&groups[0], Some(&[books])), 400);
        assert_eq!(eligible_subtotal(&groups[0], Some(&[Uuid::new_v4()])), 0);
    }

    #[test]
    fn discount_splits_proportionally_and_drops_residual() {
        let cat = Uuid::new_v4();
        let mut groups = Vec::new();
        add_line(&mut groups, Uuid::new_v4(), item(300, 1, 0, cat));
        add_line(&mut groups, Uuid::new_v4(), item(700, 1, 0, cat));

        // 100 over 300/700: floor gives 30 + 70, nothing lost here.
        let alloc = allocate_discount(&groups, &[0, 0], 100, None).unwrap();
        assert_eq!(alloc, vec![30, 70]);

        // 100 over 333/667: floors to 33 + 66, residual 1 is dropped.
        let mut uneven = Vec::new();
        add_line(&mut uneven, Uuid::new_v4(), item(333, 1, 0, cat));
        add_line(&mut uneven, Uuid::new_v4(), item(667, 1, 0, cat));
        let alloc = allocate_discount(&uneven, &[0, 0], 100, None).unwrap();
        assert_eq!(alloc, vec![33, 66]);
        assert!(alloc.iter().sum::<i64>() <= 100);
    }

    #[test]
    fn discount_clamps_to_group_value_plus_shipping() {
        let cat = Uuid::new_v4();
        let mut groups = Vec::new();
        add_line(&mut groups, Uuid::new_v4(), item(100, 1, 0, cat));

        let alloc = allocate_discount(&groups, &[80], 10_000, None).unwrap();
        assert_eq!(alloc, vec![180]);
    }

    #[test]
    fn nothing_eligible_is_an_error_not_a_silent_skip() {
        let mut groups = Vec::new();
        add_line(&mut groups, Uuid::new_v4(), item(500, 1, 0, Uuid::new_v4()));

        let restricted = [Uuid::new_v4()];
        let err = allocate_discount(&groups, &[80], 50, Some(&restricted)).unwrap_err();
        assert_eq!(err, AllocationError::NothingEligible);

        // Zero requested discount short-circuits to zero allocations.
        let alloc = allocate_discount(&groups, &[80], 0, Some(&restricted)).unwrap();
        assert_eq!(alloc, vec![0]);
    }

    #[test]
    fn settlement_matches_reference_arithmetic() {
        let cat = Uuid::new_v4();
        let mut groups = Vec::new();
        add_line(&mut groups, Uuid::new_v4(), item(1000, 2, 10, cat));
        add_line(&mut groups, Uuid::new_v4(), item(500, 1, 5, cat));
        let group = &groups[0];

        let fin = settle_group(group, 100, 200);
        assert_eq!(fin.final_total, 2000 + 100 - 200);
        assert_eq!(fin.platform_commission, 200);
        assert_eq!(fin.total_commission_percentage, 10);
        assert_eq!(fin.delivery_partner_fee, 80);
        assert_eq!(
            fin.seller_earning,
            fin.final_total - fin.platform_commission - fin.shipping_charge
        );
    }

    #[test]
    fn single_cheap_item_reference_example() {
        // 300 subtotal, one item: 80 shipping, buyer owes 380.
        let cat = Uuid::new_v4();
        let mut groups = Vec::new();
        add_line(&mut groups, Uuid::new_v4(), item(300, 1, 0, cat));
        let fin = settle_group(&groups[0], 80, 0);
        assert_eq!(fin.final_total, 380);
        assert_eq!(fin.seller_earning, 300);
    }
}
