use diesel::prelude::*;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, ProductView};
use crate::schema::{product_categories, products};

use super::models::{NewProductRow, ProductRow};
use super::unit_of_work::{self, UnitOfWork};

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Fails with `NotFound` unless the category exists. The read shares the
/// insert's transaction and takes a key-share lock, so the category cannot be
/// deleted between the check and the insert.
fn guard_category(uow: &mut UnitOfWork<'_>, category_id: Uuid) -> Result<(), DomainError> {
    product_categories::table
        .find(category_id)
        .select(product_categories::id)
        .for_key_share()
        .first::<Uuid>(uow.conn()?)
        .optional()?
        .map(|_| ())
        .ok_or(DomainError::not_found("Category", category_id))
}

impl ProductRepository for DieselProductRepository {
    fn add(&self, product: NewProduct, cancel: &CancellationToken) -> Result<ProductView, DomainError> {
        unit_of_work::run(&self.pool, cancel, |uow| {
            guard_category(uow, product.category_id)?;

            let row = diesel::insert_into(products::table)
                .values(&NewProductRow {
                    id: Uuid::new_v4(),
                    name: product.name,
                    description: product.description,
                    artisan_id: product.artisan_id,
                    price: product.price,
                    category_id: product.category_id,
                    quantity: product.quantity,
                })
                .returning(ProductRow::as_returning())
                .get_result(uow.conn()?)?;
            Ok(row.into())
        })
    }
}
