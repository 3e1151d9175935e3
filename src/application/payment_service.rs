use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::payment::{PaymentMethod, PaymentView};
use crate::domain::ports::PaymentRepository;

pub struct PaymentService<R> {
    repo: R,
}

impl<R: PaymentRepository> PaymentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records a payment for whatever the order's line items add up to.
    ///
    /// Not idempotent: each call inserts a new payment row.
    pub fn record_payment(
        &self,
        order_id: Uuid,
        method: &str,
        cancel: &CancellationToken,
    ) -> Result<PaymentView, DomainError> {
        let method = PaymentMethod::parse(method)?;
        let payment = self.repo.record(order_id, &method, cancel)?;
        log::info!(
            "payment {} of {} recorded for order {} via {}",
            payment.id,
            payment.amount,
            order_id,
            payment.payment_method
        );
        Ok(payment)
    }

    pub fn payments_for(
        &self,
        order_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Vec<PaymentView>, DomainError> {
        self.repo.list_for_order(order_id, cancel)
    }
}
