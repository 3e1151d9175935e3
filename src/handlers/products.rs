use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::product::{NewProduct, ProductView};
use crate::errors::AppError;
use crate::state::AppState;

use super::run_blocking;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub artisan_id: Uuid,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub category_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub artisan_id: Uuid,
    pub price: String,
    pub category_id: Uuid,
    pub quantity: i32,
    pub created_at: String,
}

impl From<ProductView> for ProductResponse {
    fn from(p: ProductView) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            description: p.description,
            artisan_id: p.artisan_id,
            price: p.price.to_string(),
            category_id: p.category_id,
            quantity: p.quantity,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// POST /products
///
/// Adds a product; the referenced category must already exist.
#[utoipa::path(
    post,
    path = "/products",
    request_body = AddProductRequest,
    responses(
        (status = 201, description = "Product added", body = ProductResponse),
        (status = 400, description = "Invalid product data"),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn add_product(
    state: web::Data<AppState>,
    body: web::Json<AddProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let price = BigDecimal::from_str(&body.price)
        .map_err(|e| AppError::BadRequest(format!("Invalid price '{}': {}", body.price, e)))?;
    let product = NewProduct {
        name: body.name,
        description: body.description,
        artisan_id: body.artisan_id,
        price,
        category_id: body.category_id,
        quantity: body.quantity,
    };

    let added = run_blocking(&state, move |app, cancel| app.products.add_product(product, cancel)).await?;

    Ok(HttpResponse::Created().json(ProductResponse::from(added)))
}
