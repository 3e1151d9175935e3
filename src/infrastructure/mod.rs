pub mod lifecycle_repo;
pub mod models;
pub mod order_repo;
pub mod payment_repo;
pub mod price_oracle;
pub mod product_repo;
pub mod unit_of_work;

#[cfg(test)]
pub(crate) mod test_support;

pub use order_repo::DieselOrderRepository;
pub use payment_repo::DieselPaymentRepository;
pub use product_repo::DieselProductRepository;
