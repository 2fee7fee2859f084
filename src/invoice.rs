use crate::models::Order;

/// One printable line of an invoice.
#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: i32,
    pub price: i64,
}

/// Render an order as a plain-text invoice document.
///
/// Layout/branding (PDF styling) is an external concern; this produces the
/// durable arithmetic: gross subtotal + shipping − discount = total.
pub fn render_invoice(order: &Order, lines: &[InvoiceLine]) -> String {
    let mut doc = String::new();

    doc.push_str(&format!("INVOICE {}\n", order.id));
    doc.push_str(&format!("Date: {}\n", order.created_at.format("%Y-%m-%d")));
    doc.push_str(&format!(
        "Ship to: {}, {}, {} {}\n",
        order.address.full_address, order.address.city, order.address.state, order.address.pincode
    ));
    doc.push_str(&format!("Contact: {}\n\n", order.address.mobile));

    doc.push_str(&format!("{:<40} {:>5} {:>10} {:>10}\n", "Item", "Qty", "Price", "Amount"));
    doc.push_str(&format!("{}\n", "-".repeat(68)));

    let mut gross: i64 = 0;
    for line in lines {
        let amount = line.price * line.quantity as i64;
        gross += amount;
        doc.push_str(&format!(
            "{:<40} {:>5} {:>10} {:>10}\n",
            truncate(&line.name, 40),
            line.quantity,
            line.price,
            amount
        ));
    }

    doc.push_str(&format!("{}\n", "-".repeat(68)));
    doc.push_str(&format!("{:<58} {:>9}\n", "Subtotal:", gross));
    doc.push_str(&format!("{:<58} {:>9}\n", "Shipping:", order.shipping_charge));

    if order.discount_amount > 0 {
        let label = match &order.coupon_code {
            Some(code) => format!("Discount ({code}):"),
            None => "Discount:".to_string(),
        };
        doc.push_str(&format!("{:<58} -{:>8}\n", label, order.discount_amount));
        if let Some(remark) = &order.discount_remark {
            doc.push_str(&format!("  ({remark})\n"));
        }
    }

    doc.push_str(&format!("{:<58} {:>9}\n", "Total:", order.total_amount));
    doc.push_str(&format!(
        "\nPayment: {} ({})\n",
        order.payment_mode.as_str(),
        order.payment_status.as_str()
    ));

    doc
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).chain(std::iter::once('…')).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderAddress;
    use crate::status::{OrderStatus, PaymentMode, PaymentStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_order(discount: i64, coupon: Option<&str>) -> Order {
        Order {
            id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            delivery_partner_id: None,
            total_amount: 600 + 100 - discount,
            shipping_charge: 100,
            discount_amount: discount,
            coupon_code: coupon.map(|c| c.to_string()),
            discount_remark: coupon.map(|c| format!("Coupon {c} applied")),
            order_status: OrderStatus::Placed,
            payment_mode: PaymentMode::Cod,
            payment_status: PaymentStatus::Pending,
            address: OrderAddress {
                full_address: "12 Market Road".into(),
                mobile: "9876543210".into(),
                city: "Katni".into(),
                state: "MP".into(),
                pincode: "483501".into(),
                lat: None,
                lng: None,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn totals_line_up() {
        let order = sample_order(0, None);
        let doc = render_invoice(
            &order,
            &[
                InvoiceLine { name: "Blue Mug".into(), quantity: 2, price: 150 },
                InvoiceLine { name: "Tea Tin".into(), quantity: 1, price: 300 },
            ],
        );
        assert!(doc.contains("Subtotal:"));
        assert!(doc.contains("600"));
        assert!(doc.contains("Total:"));
        assert!(doc.contains("700"));
        assert!(!doc.contains("Discount"));
    }

    #[test]
    fn discount_line_names_the_coupon() {
        let order = sample_order(50, Some("DIWALI50"));
        let doc = render_invoice(
            &order,
            &[InvoiceLine { name: "Blue Mug".into(), quantity: 2, price: 300 }],
        );
        assert!(doc.contains("Discount (DIWALI50):"));
        assert!(doc.contains("Coupon DIWALI50 applied"));
    }
}
