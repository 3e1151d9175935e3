use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{OrderStatus, OrderView, PlaceOrder, ShippingChange, StatusChange};
use super::payment::{PaymentMethod, PaymentView};
use super::product::{NewProduct, ProductView};
use super::shipping::TrackingInfo;

// Every call takes the caller's cancellation token; a cancelled token aborts
// the unit of work before its next statement and rolls it back.

pub trait OrderRepository: Send + Sync + 'static {
    /// Prices the lines, reserves stock and writes the order with its items.
    fn place(&self, order: PlaceOrder, cancel: &CancellationToken)
        -> Result<OrderView, DomainError>;
    fn find_by_id(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Option<OrderView>, DomainError>;
}

pub trait OrderLifecycleRepository: Send + Sync + 'static {
    fn cancel(&self, id: Uuid, cancel: &CancellationToken) -> Result<StatusChange, DomainError>;
    fn change_status(
        &self,
        id: Uuid,
        to: OrderStatus,
        cancel: &CancellationToken,
    ) -> Result<StatusChange, DomainError>;
    fn update_shipping(
        &self,
        id: Uuid,
        tracking: TrackingInfo,
        cancel: &CancellationToken,
    ) -> Result<ShippingChange, DomainError>;
}

pub trait PaymentRepository: Send + Sync + 'static {
    fn record(
        &self,
        order_id: Uuid,
        method: &PaymentMethod,
        cancel: &CancellationToken,
    ) -> Result<PaymentView, DomainError>;
    fn list_for_order(
        &self,
        order_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Vec<PaymentView>, DomainError>;
}

pub trait ProductRepository: Send + Sync + 'static {
    /// Inserts the product if, and only if, its category exists.
    fn add(&self, product: NewProduct, cancel: &CancellationToken)
        -> Result<ProductView, DomainError>;
}
