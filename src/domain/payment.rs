use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

/// The only state a recorded payment can be in; there is no gateway round trip.
pub const PAYMENT_STATUS_PAID: &str = "paid";

/// Stored in place of a gateway transaction id until settlement is integrated.
pub const PLACEHOLDER_TRANSACTION_REF: &str = "unsettled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let method = raw.trim();
        if method.is_empty() {
            return Err(DomainError::InvalidInput(
                "payment method must not be empty".to_string(),
            ));
        }
        if method.chars().count() > 64 {
            return Err(DomainError::InvalidInput(
                "payment method is longer than 64 characters".to_string(),
            ));
        }
        Ok(Self(method.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct PaymentView {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: BigDecimal,
    pub status: String,
    pub payment_method: String,
    pub transaction_ref: String,
    pub created_at: DateTime<Utc>,
}
