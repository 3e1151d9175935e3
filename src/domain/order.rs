use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::shipping::{ShippingAddress, TrackingInfo};

/// Lifecycle state of an order.
///
/// Transitions requested through a status change must appear in
/// [`OrderStatus::can_transition_to`]. Cancellation is the one exception and
/// is applied from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Paid) | (Pending, Cancelled) | (Paid, Shipped) | (Paid, Cancelled) | (Shipped, Delivered)
        )
    }

    /// Every status from which `self` may be entered.
    pub fn predecessors(self) -> Vec<OrderStatus> {
        Self::ALL
            .into_iter()
            .filter(|from| from.can_transition_to(self))
            .collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown order status '{}'", s)))
    }
}

#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub user_id: Uuid,
    pub shipping_address: ShippingAddress,
    pub lines: Vec<OrderLineInput>,
}

impl PlaceOrder {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.lines.is_empty() {
            return Err(DomainError::InvalidInput(
                "an order needs at least one line".to_string(),
            ));
        }
        if let Some(line) = self.lines.iter().find(|l| l.quantity <= 0) {
            return Err(DomainError::InvalidInput(format!(
                "quantity for product {} must be positive, got {}",
                line.product_id, line.quantity
            )));
        }
        self.shipping_address.validate()
    }

    /// Total quantity requested per product, keyed in ascending id order.
    pub fn requested_per_product(&self) -> BTreeMap<Uuid, i64> {
        let mut requested = BTreeMap::new();
        for line in &self.lines {
            *requested.entry(line.product_id).or_insert(0) += i64::from(line.quantity);
        }
        requested
    }
}

/// A quantity paired with the unit price captured for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl PricedLine {
    pub fn subtotal(&self) -> BigDecimal {
        BigDecimal::from(self.quantity) * &self.unit_price
    }
}

pub fn order_total<'a>(lines: impl IntoIterator<Item = &'a PricedLine>) -> BigDecimal {
    lines
        .into_iter()
        .fold(BigDecimal::from(0), |acc, line| acc + line.subtotal())
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: BigDecimal,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    pub tracking: Option<TrackingInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

#[derive(Debug, Clone)]
pub struct StatusChange {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ShippingChange {
    pub order_id: Uuid,
    pub tracking: TrackingInfo,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: "1 Loom Lane".to_string(),
            city: "Samarkand".to_string(),
            state: None,
            postal_code: "140100".to_string(),
            country: "UZ".to_string(),
        }
    }

    #[test]
    fn total_is_sum_of_quantity_times_price() {
        let lines = vec![
            PricedLine {
                product_id: Uuid::new_v4(),
                quantity: 2,
                unit_price: dec("10.00"),
            },
            PricedLine {
                product_id: Uuid::new_v4(),
                quantity: 3,
                unit_price: dec("4.25"),
            },
        ];
        assert_eq!(order_total(&lines), dec("32.75"));
    }

    #[test]
    fn total_of_no_lines_is_zero() {
        assert_eq!(order_total(&Vec::<PricedLine>::new()), dec("0"));
    }

    #[test]
    fn transition_table() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Paid));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Paid.can_transition_to(Shipped));
        assert!(Paid.can_transition_to(Cancelled));
        assert!(Shipped.can_transition_to(Delivered));

        assert!(!Pending.can_transition_to(Shipped));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Paid));
        assert!(!Paid.can_transition_to(Paid));
    }

    #[test]
    fn predecessors_follow_the_table() {
        assert_eq!(
            OrderStatus::Cancelled.predecessors(),
            vec![OrderStatus::Pending, OrderStatus::Paid]
        );
        assert_eq!(OrderStatus::Delivered.predecessors(), vec![OrderStatus::Shipped]);
        assert!(OrderStatus::Pending.predecessors().is_empty());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert_eq!(" paid ".parse::<OrderStatus>().unwrap(), OrderStatus::Paid);
        assert!(matches!(
            "refunded".parse::<OrderStatus>(),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn status_display_matches_stored_form() {
        for status in OrderStatus::ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn validate_rejects_empty_and_non_positive_lines() {
        let mut order = PlaceOrder {
            user_id: Uuid::new_v4(),
            shipping_address: address(),
            lines: vec![],
        };
        assert!(matches!(order.validate(), Err(DomainError::InvalidInput(_))));

        order.lines.push(OrderLineInput {
            product_id: Uuid::new_v4(),
            quantity: 0,
        });
        assert!(matches!(order.validate(), Err(DomainError::InvalidInput(_))));

        order.lines[0].quantity = 1;
        assert!(order.validate().is_ok());
    }

    #[test]
    fn requested_quantities_merge_duplicate_products() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let order = PlaceOrder {
            user_id: Uuid::new_v4(),
            shipping_address: address(),
            lines: vec![
                OrderLineInput { product_id: a, quantity: 2 },
                OrderLineInput { product_id: b, quantity: 1 },
                OrderLineInput { product_id: a, quantity: 5 },
            ],
        };
        let requested = order.requested_per_product();
        assert_eq!(requested.len(), 2);
        assert_eq!(requested[&a], 7);
        assert_eq!(requested[&b], 1);
    }
}
