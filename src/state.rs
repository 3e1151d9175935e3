use std::time::Duration;

use crate::application::lifecycle_service::LifecycleService;
use crate::application::order_service::OrderService;
use crate::application::payment_service::PaymentService;
use crate::application::product_service::ProductService;
use crate::db::DbPool;
use crate::infrastructure::{DieselOrderRepository, DieselPaymentRepository, DieselProductRepository};

/// Services shared by every worker of the HTTP server.
pub struct AppState {
    pub orders: OrderService<DieselOrderRepository>,
    pub lifecycle: LifecycleService<DieselOrderRepository>,
    pub payments: PaymentService<DieselPaymentRepository>,
    pub products: ProductService<DieselProductRepository>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(pool: DbPool, request_timeout: Duration) -> Self {
        Self {
            orders: OrderService::new(DieselOrderRepository::new(pool.clone())),
            lifecycle: LifecycleService::new(DieselOrderRepository::new(pool.clone())),
            payments: PaymentService::new(DieselPaymentRepository::new(pool.clone())),
            products: ProductService::new(DieselProductRepository::new(pool)),
            request_timeout,
        }
    }
}
