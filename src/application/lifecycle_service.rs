use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{OrderStatus, ShippingChange, StatusChange};
use crate::domain::ports::OrderLifecycleRepository;
use crate::domain::shipping::TrackingInfo;

pub struct LifecycleService<R> {
    repo: R,
}

impl<R: OrderLifecycleRepository> LifecycleService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Cancels regardless of the current status.
    pub fn cancel_order(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<StatusChange, DomainError> {
        let change = self.repo.cancel(id, cancel)?;
        log::info!("order {} cancelled", id);
        Ok(change)
    }

    /// Accepts the raw status so unknown values surface as invalid input.
    pub fn change_status(
        &self,
        id: Uuid,
        status: &str,
        cancel: &CancellationToken,
    ) -> Result<StatusChange, DomainError> {
        let to: OrderStatus = status.parse()?;
        match self.repo.change_status(id, to, cancel) {
            Ok(change) => {
                log::info!("order {} moved to {}", id, change.status);
                Ok(change)
            }
            Err(e) => {
                log::warn!("status change of order {} to {} refused: {}", id, to, e);
                Err(e)
            }
        }
    }

    pub fn update_shipping(
        &self,
        id: Uuid,
        tracking: TrackingInfo,
        cancel: &CancellationToken,
    ) -> Result<ShippingChange, DomainError> {
        tracking.validate()?;
        let change = self.repo.update_shipping(id, tracking, cancel)?;
        log::info!(
            "order {} shipping via {} ({})",
            id,
            change.tracking.carrier,
            change.tracking.tracking_number
        );
        Ok(change)
    }
}
