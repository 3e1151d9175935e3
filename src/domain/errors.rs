use thiserror::Error;
use uuid::Uuid;

use super::order::OrderStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: Uuid,
        requested: i64,
        available: i32,
    },
    #[error("Operation cancelled before commit")]
    Cancelled,
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        DomainError::NotFound { entity, id }
    }
}
