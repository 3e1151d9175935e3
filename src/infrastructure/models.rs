use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{OrderLineView, OrderView, PricedLine};
use crate::domain::payment::PaymentView;
use crate::domain::product::ProductView;
use crate::domain::shipping::{from_document, TrackingInfo};
use crate::schema::{order_items, orders, payments, products};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: BigDecimal,
    pub status: String,
    pub shipping_address: Value,
    pub shipping_details: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_view(self, items: Vec<OrderItemRow>) -> Result<OrderView, DomainError> {
        Ok(OrderView {
            id: self.id,
            user_id: self.user_id,
            total_amount: self.total_amount,
            status: self.status.parse()?,
            shipping_address: from_document(self.shipping_address)?,
            tracking: self
                .shipping_details
                .map(from_document::<TrackingInfo>)
                .transpose()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
            lines: items.into_iter().map(OrderItemRow::into_view).collect(),
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: BigDecimal,
    pub status: String,
    pub shipping_address: Value,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl OrderItemRow {
    pub fn into_view(self) -> OrderLineView {
        OrderLineView {
            id: self.id,
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub position: i32,
}

impl NewOrderItemRow {
    /// `position` is the line's index in the placed order.
    pub fn snapshot(order_id: Uuid, position: i32, line: &PricedLine) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price.clone(),
            position,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: BigDecimal,
    pub status: String,
    pub payment_method: String,
    pub transaction_ref: String,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentRow> for PaymentView {
    fn from(row: PaymentRow) -> Self {
        PaymentView {
            id: row.id,
            order_id: row.order_id,
            amount: row.amount,
            status: row.status,
            payment_method: row.payment_method,
            transaction_ref: row.transaction_ref,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentRow<'a> {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: BigDecimal,
    pub status: &'a str,
    pub payment_method: &'a str,
    pub transaction_ref: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub artisan_id: Uuid,
    pub price: BigDecimal,
    pub category_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductView {
    fn from(row: ProductRow) -> Self {
        ProductView {
            id: row.id,
            name: row.name,
            description: row.description,
            artisan_id: row.artisan_id,
            price: row.price,
            category_id: row.category_id,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub artisan_id: Uuid,
    pub price: BigDecimal,
    pub category_id: Uuid,
    pub quantity: i32,
}
