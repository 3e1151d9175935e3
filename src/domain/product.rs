use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

/// Longest product name the catalogue stores, in characters.
pub const MAX_NAME_CHARS: usize = 255;

/// Prices are stored with two decimals and ten integer digits.
const PRICE_DIGITS_BEFORE_POINT: u32 = 10;

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub artisan_id: Uuid,
    pub price: BigDecimal,
    pub category_id: Uuid,
    pub quantity: i32,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "product name must not be empty".to_string(),
            ));
        }
        if self.name.chars().count() > MAX_NAME_CHARS {
            return Err(DomainError::InvalidInput(format!(
                "product name is longer than {} characters",
                MAX_NAME_CHARS
            )));
        }
        if self.price < BigDecimal::from(0) {
            return Err(DomainError::InvalidInput(format!(
                "price must not be negative, got {}",
                self.price
            )));
        }
        if self.price.round(2) >= BigDecimal::from(10_i64.pow(PRICE_DIGITS_BEFORE_POINT)) {
            return Err(DomainError::InvalidInput(format!(
                "price {} is out of range",
                self.price
            )));
        }
        if self.quantity < 0 {
            return Err(DomainError::InvalidInput(format!(
                "quantity must not be negative, got {}",
                self.quantity
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub artisan_id: Uuid,
    pub price: BigDecimal,
    pub category_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Live price and stock of a product at the moment it was read.
#[derive(Debug, Clone)]
pub struct PriceQuote {
    pub product_id: Uuid,
    pub unit_price: BigDecimal,
    pub available: i32,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn product(price: &str, quantity: i32) -> NewProduct {
        NewProduct {
            name: "Suzani wall hanging".to_string(),
            description: "Hand-embroidered".to_string(),
            artisan_id: Uuid::new_v4(),
            price: BigDecimal::from_str(price).unwrap(),
            category_id: Uuid::new_v4(),
            quantity,
        }
    }

    #[test]
    fn accepts_free_and_out_of_stock_products() {
        assert!(product("0", 0).validate().is_ok());
    }

    #[test]
    fn rejects_negative_price_or_quantity() {
        assert!(product("-0.01", 1).validate().is_err());
        assert!(product("5.00", -1).validate().is_err());
    }

    #[test]
    fn rejects_blank_name() {
        let mut p = product("5.00", 1);
        p.name = "  ".to_string();
        assert!(matches!(p.validate(), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn rejects_values_the_catalogue_cannot_store() {
        assert!(product("9999999999.99", 1).validate().is_ok());
        assert!(matches!(
            product("100000000000", 1).validate(),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(product("9999999999.999", 1).validate().is_err());

        let mut p = product("5.00", 1);
        p.name = "ж".repeat(MAX_NAME_CHARS);
        assert!(p.validate().is_ok());
        p.name.push('ж');
        assert!(matches!(p.validate(), Err(DomainError::InvalidInput(_))));
    }
}
