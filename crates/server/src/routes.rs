use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::auth::{self, ServerState};
use crate::openapi::ApiDoc;

pub mod clientes;
pub mod facturas;
pub mod fotos;

// Photo uploads go up to 5 MiB plus multipart framing, so the default
// body limit is too small.
const BODY_LIMIT_BYTES: usize = 8 * 1024 * 1024;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: a public health/docs surface plus the
/// token-protected API.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let api = Router::new()
        .route("/clients", get(clientes::list).post(clientes::create))
        .route("/clients/self", get(clientes::self_profile))
        .route(
            "/clients/:dni",
            put(clientes::update).delete(clientes::delete),
        )
        .route("/invoices", get(facturas::list).post(facturas::create))
        .route(
            "/invoices/:numero",
            get(facturas::get_one)
                .put(facturas::update)
                .delete(facturas::delete),
        )
        .route("/invoices/client/:dni", get(facturas::by_cliente))
        .route("/invoices/meter/:numero_medidor", get(facturas::by_medidor))
        .route("/profile-photo/upload", post(fotos::upload))
        .route("/profile-photo", get(fotos::fetch))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token,
        ));

    public
        .merge(api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
