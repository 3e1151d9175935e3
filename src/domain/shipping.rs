use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::DomainError;

/// Destination captured when the order is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("street", &self.street),
            ("city", &self.city),
            ("country", &self.country),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidInput(format!(
                    "shipping address {} must not be empty",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Carrier tracking metadata. Stored apart from the destination address and
/// always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub tracking_number: String,
    pub carrier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_date: Option<NaiveDate>,
}

impl TrackingInfo {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.tracking_number.trim().is_empty() || self.carrier.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "tracking number and carrier are required".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Value, DomainError> {
    serde_json::to_value(value)
        .map_err(|e| DomainError::InvalidInput(format!("cannot encode document: {}", e)))
}

pub fn from_document<T: DeserializeOwned>(document: Value) -> Result<T, DomainError> {
    serde_json::from_value(document)
        .map_err(|e| DomainError::InvalidInput(format!("stored document is unreadable: {}", e)))
}
