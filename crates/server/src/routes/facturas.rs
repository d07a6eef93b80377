use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use service::domain::{FacturaConRelaciones, FacturaDraft, FacturaPatch};
use service::identity::Caller;

use crate::auth::ServerState;
use crate::errors::JsonApiError;

#[utoipa::path(post, path = "/invoices", tag = "invoices",
    request_body = crate::openapi::FacturaDraftDoc,
    responses(
        (status = 201, description = "Created, billed to the authenticated caller"),
        (status = 401, description = "Caller has no resolvable DNI claim"),
        (status = 404, description = "Cliente or domicilio not found")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    Json(draft): Json<FacturaDraft>,
) -> Result<impl IntoResponse, JsonApiError> {
    let created = state.facturas.create_factura(&caller, draft).await?;
    info!(numero_factura = created.numero_factura, "factura created");
    let location = format!("/invoices/{}", created.numero_factura);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

#[utoipa::path(get, path = "/invoices", tag = "invoices",
    responses((status = 200, description = "All invoices with relations attached"))
)]
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<FacturaConRelaciones>>, JsonApiError> {
    Ok(Json(state.facturas.list_facturas().await?))
}

#[utoipa::path(get, path = "/invoices/{numero}", tag = "invoices",
    params(("numero" = i32, Path, description = "Invoice number")),
    responses(
        (status = 200, description = "Invoice with relations"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_one(
    State(state): State<ServerState>,
    Path(numero): Path<i32>,
) -> Result<Json<FacturaConRelaciones>, JsonApiError> {
    Ok(Json(state.facturas.get_factura(numero).await?))
}

#[utoipa::path(get, path = "/invoices/client/{dni}", tag = "invoices",
    params(("dni" = i32, Path, description = "Cliente DNI")),
    responses(
        (status = 200, description = "Invoices billed to the cliente"),
        (status = 404, description = "No invoices for that DNI")
    )
)]
pub async fn by_cliente(
    State(state): State<ServerState>,
    Path(dni): Path<i32>,
) -> Result<Json<Vec<FacturaConRelaciones>>, JsonApiError> {
    Ok(Json(state.facturas.facturas_by_cliente_dni(dni).await?))
}

#[utoipa::path(get, path = "/invoices/meter/{numero_medidor}", tag = "invoices",
    params(("numero_medidor" = i32, Path, description = "Meter number")),
    responses(
        (status = 200, description = "Invoices measured at the meter"),
        (status = 404, description = "No invoices for that meter")
    )
)]
pub async fn by_medidor(
    State(state): State<ServerState>,
    Path(numero_medidor): Path<i32>,
) -> Result<Json<Vec<FacturaConRelaciones>>, JsonApiError> {
    Ok(Json(state.facturas.facturas_by_numero_medidor(numero_medidor).await?))
}

#[utoipa::path(put, path = "/invoices/{numero}", tag = "invoices",
    params(("numero" = i32, Path, description = "Invoice number")),
    request_body = crate::openapi::FacturaPatchDoc,
    responses(
        (status = 204, description = "Due date and monthly consumption updated"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(numero): Path<i32>,
    Json(patch): Json<FacturaPatch>,
) -> Result<StatusCode, JsonApiError> {
    state.facturas.update_factura(numero, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(delete, path = "/invoices/{numero}", tag = "invoices",
    params(("numero" = i32, Path, description = "Invoice number")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(numero): Path<i32>,
) -> Result<StatusCode, JsonApiError> {
    state.facturas.delete_factura(numero).await?;
    Ok(StatusCode::NO_CONTENT)
}
