use chrono::Utc;
use diesel::prelude::*;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{OrderStatus, ShippingChange, StatusChange};
use crate::domain::ports::OrderLifecycleRepository;
use crate::domain::shipping::{from_document, to_document, TrackingInfo};
use crate::schema::orders;

use super::order_repo::DieselOrderRepository;
use super::unit_of_work::{self, UnitOfWork};

type StatusRow = (Uuid, String, chrono::DateTime<Utc>);

fn into_status_change(row: StatusRow) -> Result<StatusChange, DomainError> {
    let (order_id, status, updated_at) = row;
    Ok(StatusChange {
        order_id,
        status: status.parse()?,
        updated_at,
    })
}

fn current_status(uow: &mut UnitOfWork<'_>, id: Uuid) -> Result<Option<OrderStatus>, DomainError> {
    orders::table
        .find(id)
        .select(orders::status)
        .first::<String>(uow.conn()?)
        .optional()?
        .map(|s| s.parse())
        .transpose()
}

// Cancel and shipping updates are plain last-write-wins updates. Status
// changes are guarded by the transition table inside the UPDATE itself, so a
// concurrent change cannot be silently overwritten.
impl OrderLifecycleRepository for DieselOrderRepository {
    fn cancel(&self, id: Uuid, cancel: &CancellationToken) -> Result<StatusChange, DomainError> {
        unit_of_work::run(self.pool(), cancel, |uow| {
            let row: Option<StatusRow> = diesel::update(orders::table.find(id))
                .set((
                    orders::status.eq(OrderStatus::Cancelled.as_str()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .returning((orders::id, orders::status, orders::updated_at))
                .get_result(uow.conn()?)
                .optional()?;

            match row {
                Some(row) => into_status_change(row),
                None => Err(DomainError::not_found("Order", id)),
            }
        })
    }

    fn change_status(
        &self,
        id: Uuid,
        to: OrderStatus,
        cancel: &CancellationToken,
    ) -> Result<StatusChange, DomainError> {
        let predecessors: Vec<&'static str> =
            to.predecessors().into_iter().map(OrderStatus::as_str).collect();

        unit_of_work::run(self.pool(), cancel, |uow| {
            let row: Option<StatusRow> = diesel::update(
                orders::table
                    .find(id)
                    .filter(orders::status.eq_any(predecessors)),
            )
            .set((
                orders::status.eq(to.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .returning((orders::id, orders::status, orders::updated_at))
            .get_result(uow.conn()?)
            .optional()?;

            if let Some(row) = row {
                return into_status_change(row);
            }
            match current_status(uow, id)? {
                None => Err(DomainError::not_found("Order", id)),
                Some(from) => Err(DomainError::InvalidTransition { from, to }),
            }
        })
    }

    fn update_shipping(
        &self,
        id: Uuid,
        tracking: TrackingInfo,
        cancel: &CancellationToken,
    ) -> Result<ShippingChange, DomainError> {
        let document = to_document(&tracking)?;

        unit_of_work::run(self.pool(), cancel, |uow| {
            let row: Option<(Uuid, Option<serde_json::Value>, chrono::DateTime<Utc>)> =
                diesel::update(orders::table.find(id))
                    .set((
                        orders::shipping_details.eq(Some(document)),
                        orders::updated_at.eq(Utc::now()),
                    ))
                    .returning((orders::id, orders::shipping_details, orders::updated_at))
                    .get_result(uow.conn()?)
                    .optional()?;

            let (order_id, stored, updated_at) =
                row.ok_or(DomainError::not_found("Order", id))?;
            let stored = stored.ok_or_else(|| {
                DomainError::Persistence(format!("order {} lost its shipping details", order_id))
            })?;
            Ok(ShippingChange {
                order_id,
                tracking: from_document(stored)?,
                updated_at,
            })
        })
    }
}
