use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::{OrderLineInput, OrderView, PlaceOrder, ShippingChange, StatusChange};
use crate::domain::shipping::{ShippingAddress, TrackingInfo};
use crate::errors::AppError;
use crate::state::AppState;

use super::run_blocking;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShippingAddressBody {
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        ShippingAddress {
            street: body.street,
            city: body.city,
            state: body.state,
            postal_code: body.postal_code,
            country: body.country,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        ShippingAddressBody {
            street: address.street,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Prices are never accepted from the client; each line is priced from the
/// catalogue when the order is placed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub user_id: Uuid,
    pub shipping_address: ShippingAddressBody,
    pub lines: Vec<PlaceOrderLineRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price captured when the order was placed, e.g. "9.99"
    pub unit_price: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrackingBody {
    pub tracking_number: String,
    pub carrier: String,
    #[serde(default)]
    pub estimated_delivery_date: Option<NaiveDate>,
}

impl From<TrackingInfo> for TrackingBody {
    fn from(tracking: TrackingInfo) -> Self {
        TrackingBody {
            tracking_number: tracking.tracking_number,
            carrier: tracking.carrier,
            estimated_delivery_date: tracking.estimated_delivery_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: String,
    pub status: String,
    pub shipping_address: ShippingAddressBody,
    pub tracking: Option<TrackingBody>,
    pub created_at: String,
    pub updated_at: String,
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        OrderResponse {
            id: order.id,
            user_id: order.user_id,
            total_amount: order.total_amount.to_string(),
            status: order.status.to_string(),
            shipping_address: order.shipping_address.into(),
            tracking: order.tracking.map(TrackingBody::from),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
            lines: order
                .lines
                .into_iter()
                .map(|l| OrderLineResponse {
                    id: l.id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeStatusRequest {
    /// One of pending, paid, shipped, delivered, cancelled
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub id: Uuid,
    pub status: String,
    pub updated_at: String,
}

impl From<StatusChange> for StatusResponse {
    fn from(change: StatusChange) -> Self {
        StatusResponse {
            id: change.order_id,
            status: change.status.to_string(),
            updated_at: change.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShippingResponse {
    pub id: Uuid,
    pub tracking: TrackingBody,
    pub updated_at: String,
}

impl From<ShippingChange> for ShippingResponse {
    fn from(change: ShippingChange) -> Self {
        ShippingResponse {
            id: change.order_id,
            tracking: change.tracking.into(),
            updated_at: change.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Prices every line from the catalogue, reserves stock, and writes the order
/// with its line items in one transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Malformed order"),
        (status = 404, description = "A referenced product does not exist"),
        (status = 409, description = "Not enough stock"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn place_order(
    state: web::Data<AppState>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let order = PlaceOrder {
        user_id: body.user_id,
        shipping_address: body.shipping_address.into(),
        lines: body
            .lines
            .into_iter()
            .map(|l| OrderLineInput {
                product_id: l.product_id,
                quantity: l.quantity,
            })
            .collect(),
    };

    let placed = run_blocking(&state, move |app, cancel| app.orders.place_order(order, cancel)).await?;

    Ok(HttpResponse::Created().json(OrderResponse::from(placed)))
}

/// GET /orders/{id}
///
/// Returns the order together with its line items and shipping data.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = run_blocking(&state, move |app, cancel| app.orders.get_order(order_id, cancel)).await?;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// POST /orders/{id}/cancel
#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order cancelled", body = StatusResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let change =
        run_blocking(&state, move |app, cancel| app.lifecycle.cancel_order(order_id, cancel)).await?;

    Ok(HttpResponse::Ok().json(StatusResponse::from(change)))
}

/// PUT /orders/{id}/status
#[utoipa::path(
    put,
    path = "/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = StatusResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed from the current status"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn change_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ChangeStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = body.into_inner().status;

    let change = run_blocking(&state, move |app, cancel| {
        app.lifecycle.change_status(order_id, &status, cancel)
    })
    .await?;

    Ok(HttpResponse::Ok().json(StatusResponse::from(change)))
}

/// PUT /orders/{id}/shipping
///
/// Replaces the order's tracking details as a whole; the destination address
/// captured at placement is kept.
#[utoipa::path(
    put,
    path = "/orders/{id}/shipping",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = TrackingBody,
    responses(
        (status = 200, description = "Shipping details replaced", body = ShippingResponse),
        (status = 400, description = "Missing tracking number or carrier"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_shipping(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<TrackingBody>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();
    let tracking = TrackingInfo {
        tracking_number: body.tracking_number,
        carrier: body.carrier,
        estimated_delivery_date: body.estimated_delivery_date,
    };

    let change = run_blocking(&state, move |app, cancel| {
        app.lifecycle.update_shipping(order_id, tracking, cancel)
    })
    .await?;

    Ok(HttpResponse::Ok().json(ShippingResponse::from(change)))
}
