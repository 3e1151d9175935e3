use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::payment::PaymentView;
use crate::errors::AppError;
use crate::state::AppState;

use super::run_blocking;

/// The amount is not part of the request; it is recomputed from the order.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordPaymentRequest {
    pub payment_method: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: String,
    pub status: String,
    pub payment_method: String,
    pub transaction_ref: String,
    pub created_at: String,
}

impl From<PaymentView> for PaymentResponse {
    fn from(p: PaymentView) -> Self {
        PaymentResponse {
            id: p.id,
            order_id: p.order_id,
            amount: p.amount.to_string(),
            status: p.status,
            payment_method: p.payment_method,
            transaction_ref: p.transaction_ref,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// POST /orders/{id}/payments
///
/// Records a payment for the sum of the order's line items. Every call creates
/// a new payment.
#[utoipa::path(
    post,
    path = "/orders/{id}/payments",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentResponse),
        (status = 400, description = "Missing payment method"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "payments"
)]
pub async fn record_payment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let method = body.into_inner().payment_method;

    let payment = run_blocking(&state, move |app, cancel| {
        app.payments.record_payment(order_id, &method, cancel)
    })
    .await?;

    Ok(HttpResponse::Created().json(PaymentResponse::from(payment)))
}

/// GET /orders/{id}/payments
#[utoipa::path(
    get,
    path = "/orders/{id}/payments",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Payments recorded for the order, oldest first", body = [PaymentResponse]),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "payments"
)]
pub async fn list_payments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let payments =
        run_blocking(&state, move |app, cancel| app.payments.payments_for(order_id, cancel)).await?;

    let body: Vec<PaymentResponse> = payments.into_iter().map(PaymentResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
