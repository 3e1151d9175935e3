use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{OrderView, PlaceOrder};
use crate::domain::ports::OrderRepository;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn place_order(
        &self,
        order: PlaceOrder,
        cancel: &CancellationToken,
    ) -> Result<OrderView, DomainError> {
        order.validate()?;
        let user_id = order.user_id;
        match self.repo.place(order, cancel) {
            Ok(placed) => {
                log::info!(
                    "order {} placed for user {}: {} line(s), total {}",
                    placed.id,
                    user_id,
                    placed.lines.len(),
                    placed.total_amount
                );
                Ok(placed)
            }
            Err(e) => {
                log::warn!("order for user {} rejected: {}", user_id, e);
                Err(e)
            }
        }
    }

    pub fn get_order(&self, id: Uuid, cancel: &CancellationToken) -> Result<OrderView, DomainError> {
        self.repo
            .find_by_id(id, cancel)?
            .ok_or(DomainError::not_found("Order", id))
    }
}
