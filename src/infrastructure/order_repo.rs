use std::collections::BTreeMap;

use diesel::prelude::*;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{order_total, OrderStatus, OrderView, PlaceOrder, PricedLine};
use crate::domain::ports::OrderRepository;
use crate::domain::product::PriceQuote;
use crate::domain::shipping::to_document;
use crate::schema::{order_items, orders, products};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};
use super::price_oracle;
use super::unit_of_work::{self, UnitOfWork};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Quotes every distinct product once, in ascending id order so concurrent
/// orders lock product rows in the same sequence, and checks stock against the
/// summed request.
fn quote_all(
    uow: &mut UnitOfWork<'_>,
    requested: &BTreeMap<Uuid, i64>,
) -> Result<BTreeMap<Uuid, PriceQuote>, DomainError> {
    let mut quotes = BTreeMap::new();
    for (&product_id, &wanted) in requested {
        let quote = price_oracle::quote(uow, product_id)?;
        if wanted > i64::from(quote.available) {
            return Err(DomainError::InsufficientStock {
                product_id,
                requested: wanted,
                available: quote.available,
            });
        }
        quotes.insert(product_id, quote);
    }
    Ok(quotes)
}

fn reserve_stock(
    uow: &mut UnitOfWork<'_>,
    requested: &BTreeMap<Uuid, i64>,
) -> Result<(), DomainError> {
    let now = chrono::Utc::now();
    for (&product_id, &wanted) in requested {
        // Bounded by the available quantity checked in `quote_all`.
        let wanted = i32::try_from(wanted).map_err(|_| {
            DomainError::InvalidInput(format!("quantity for product {} is too large", product_id))
        })?;
        diesel::update(products::table.find(product_id))
            .set((
                products::quantity.eq(products::quantity - wanted),
                products::updated_at.eq(now),
            ))
            .execute(uow.conn()?)?;
    }
    Ok(())
}

fn load_order(
    uow: &mut UnitOfWork<'_>,
    id: Uuid,
) -> Result<Option<OrderView>, DomainError> {
    let order = orders::table
        .find(id)
        .select(OrderRow::as_select())
        .first(uow.conn()?)
        .optional()?;

    let Some(order) = order else {
        return Ok(None);
    };

    let items = OrderItemRow::belonging_to(&order)
        .select(OrderItemRow::as_select())
        .order(order_items::position.asc())
        .load(uow.conn()?)?;

    order.into_view(items).map(Some)
}

impl OrderRepository for DieselOrderRepository {
    fn place(&self, order: PlaceOrder, cancel: &CancellationToken) -> Result<OrderView, DomainError> {
        let requested = order.requested_per_product();
        let address = to_document(&order.shipping_address)?;

        unit_of_work::run(&self.pool, cancel, |uow| {
            // 1. Price every line from the live catalogue before writing anything.
            let quotes = quote_all(uow, &requested)?;
            let priced: Vec<PricedLine> = order
                .lines
                .iter()
                .map(|line| PricedLine {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: quotes[&line.product_id].unit_price.clone(),
                })
                .collect();
            let total_amount = order_total(&priced);

            // 2. Insert the order
            let order_id = Uuid::new_v4();
            let order_row = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    user_id: order.user_id,
                    total_amount,
                    status: OrderStatus::Pending.as_str().to_string(),
                    shipping_address: address,
                })
                .returning(OrderRow::as_returning())
                .get_result(uow.conn()?)?;

            // 3. Insert line items carrying the captured unit prices
            let new_items = priced
                .iter()
                .enumerate()
                .map(|(position, line)| {
                    let position = i32::try_from(position).map_err(|_| {
                        DomainError::InvalidInput("too many lines in one order".to_string())
                    })?;
                    Ok(NewOrderItemRow::snapshot(order_id, position, line))
                })
                .collect::<Result<Vec<_>, DomainError>>()?;
            let mut items: Vec<OrderItemRow> = diesel::insert_into(order_items::table)
                .values(&new_items)
                .returning(OrderItemRow::as_returning())
                .get_results(uow.conn()?)?;
            items.sort_by_key(|item| item.position);

            // 4. Take the ordered quantities out of stock
            reserve_stock(uow, &requested)?;

            order_row.into_view(items)
        })
    }

    fn find_by_id(
        &self,
        id: Uuid,
        cancel: &CancellationToken,
    ) -> Result<Option<OrderView>, DomainError> {
        unit_of_work::run(&self.pool, cancel, |uow| load_order(uow, id))
    }
}
