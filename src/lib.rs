pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use db::{create_pool, DbPool};
pub use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::products::add_product,
        handlers::orders::place_order,
        handlers::orders::get_order,
        handlers::orders::cancel_order,
        handlers::orders::change_status,
        handlers::orders::update_shipping,
        handlers::payments::record_payment,
        handlers::payments::list_payments,
    ),
    components(schemas(
        handlers::products::AddProductRequest,
        handlers::products::ProductResponse,
        handlers::orders::ShippingAddressBody,
        handlers::orders::PlaceOrderLineRequest,
        handlers::orders::PlaceOrderRequest,
        handlers::orders::OrderLineResponse,
        handlers::orders::TrackingBody,
        handlers::orders::OrderResponse,
        handlers::orders::ChangeStatusRequest,
        handlers::orders::StatusResponse,
        handlers::orders::ShippingResponse,
        handlers::payments::RecordPaymentRequest,
        handlers::payments::PaymentResponse,
    )),
    tags(
        (name = "products", description = "Catalogue entries"),
        (name = "orders", description = "Order placement and lifecycle"),
        (name = "payments", description = "Payments recorded against orders"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .route("/products", web::post().to(handlers::products::add_product))
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::place_order))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}/cancel", web::post().to(handlers::orders::cancel_order))
                    .route("/{id}/status", web::put().to(handlers::orders::change_status))
                    .route("/{id}/shipping", web::put().to(handlers::orders::update_shipping))
                    .route("/{id}/payments", web::post().to(handlers::payments::record_payment))
                    .route("/{id}/payments", web::get().to(handlers::payments::list_payments)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
