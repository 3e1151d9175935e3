use bigdecimal::BigDecimal;
use diesel::prelude::*;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{order_total, PricedLine};
use crate::domain::payment::{
    PaymentMethod, PaymentView, PAYMENT_STATUS_PAID, PLACEHOLDER_TRANSACTION_REF,
};
use crate::domain::ports::PaymentRepository;
use crate::schema::{order_items, orders, payments};

use super::models::{NewPaymentRow, PaymentRow};
use super::unit_of_work::{self, UnitOfWork};

pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Locks the order row so the amount read below and the payment written from
/// it belong to the same view of the order.
fn lock_order(uow: &mut UnitOfWork<'_>, order_id: Uuid) -> Result<(), DomainError> {
    orders::table
        .find(order_id)
        .select(orders::id)
        .for_update()
        .first::<Uuid>(uow.conn()?)
        .optional()?
        .map(|_| ())
        .ok_or(DomainError::not_found("Order", order_id))
}

fn ensure_order_exists(uow: &mut UnitOfWork<'_>, order_id: Uuid) -> Result<(), DomainError> {
    let exists: bool = diesel::select(diesel::dsl::exists(orders::table.find(order_id)))
        .get_result(uow.conn()?)?;
    if !exists {
        return Err(DomainError::not_found("Order", order_id));
    }
    Ok(())
}

/// Sum of quantity × captured unit price over the order's persisted items.
fn payable_amount(uow: &mut UnitOfWork<'_>, order_id: Uuid) -> Result<BigDecimal, DomainError> {
    let lines: Vec<PricedLine> = order_items::table
        .filter(order_items::order_id.eq(order_id))
        .select((
            order_items::product_id,
            order_items::quantity,
            order_items::unit_price,
        ))
        .load::<(Uuid, i32, BigDecimal)>(uow.conn()?)?
        .into_iter()
        .map(|(product_id, quantity, unit_price)| PricedLine {
            product_id,
            quantity,
            unit_price,
        })
        .collect();
    Ok(order_total(&lines))
}

impl PaymentRepository for DieselPaymentRepository {
    fn record(
        &self,
        order_id: Uuid,
        method: &PaymentMethod,
        cancel: &CancellationToken,
    ) -> Result<PaymentView, DomainError> {
        unit_of_work::run(&self.pool, cancel, |uow| {
            lock_order(uow, order_id)?;
            let amount = payable_amount(uow, order_id)?;

            let row = diesel::insert_into(payments::table)
                .values(&NewPaymentRow {
                    id: Uuid::new_v4(),
                    order_id,
                    amount,
                    status: PAYMENT_STATUS_PAID,
                    payment_method: method.as_str(),
                    transaction_ref: PLACEHOLDER_TRANSACTION_REF,
                })
                .returning(PaymentRow::as_returning())
                .get_result(uow.conn()?)?;
            Ok(row.into())
        })
    }

    fn list_for_order(
        &self,
        order_id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Vec<PaymentView>, DomainError> {
        unit_of_work::run(&self.pool, cancel, |uow| {
            ensure_order_exists(uow, order_id)?;
            let rows = payments::table
                .filter(payments::order_id.eq(order_id))
                .select(PaymentRow::as_select())
                .order((payments::created_at.asc(), payments::id.asc()))
                .load(uow.conn()?)?;
            Ok(rows.into_iter().map(PaymentView::from).collect())
        })
    }
}
