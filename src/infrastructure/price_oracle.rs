use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::product::PriceQuote;
use crate::schema::products;

use super::unit_of_work::UnitOfWork;

/// Reads the live price and stock of a product, locking its row until the
/// surrounding unit of work ends.
pub fn quote(uow: &mut UnitOfWork<'_>, product_id: Uuid) -> Result<PriceQuote, DomainError> {
    let row: Option<(BigDecimal, i32)> = products::table
        .find(product_id)
        .select((products::price, products::quantity))
        .for_update()
        .first(uow.conn()?)
        .optional()?;

    let (unit_price, available) = row.ok_or(DomainError::not_found("Product", product_id))?;
    Ok(PriceQuote {
        product_id,
        unit_price,
        available,
    })
}
