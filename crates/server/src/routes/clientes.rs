use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use service::domain::{Cliente, NuevoCliente};
use service::dto::ListadoClientes;
use service::identity::Caller;

use crate::auth::ServerState;
use crate::errors::JsonApiError;

#[utoipa::path(get, path = "/clients", tag = "clients",
    responses(
        (status = 200, description = "Full listing for staff, own record for role Cliente"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Caller not resolvable to a cliente")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ListadoClientes>, JsonApiError> {
    let listado = state.clientes.list_clientes(&caller).await?;
    Ok(Json(listado))
}

#[utoipa::path(get, path = "/clients/self", tag = "clients",
    responses(
        (status = 200, description = "Own record with domicilios and facturas attached"),
        (status = 400, description = "DNI claim missing or invalid"),
        (status = 404, description = "No cliente matches the caller")
    )
)]
pub async fn self_profile(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, JsonApiError> {
    let dto = state.clientes.own_profile(&caller).await?;
    Ok(Json(dto))
}

#[utoipa::path(post, path = "/clients", tag = "clients",
    request_body = crate::openapi::NuevoClienteDoc,
    responses(
        (status = 201, description = "Created, location keyed by DNI"),
        (status = 400, description = "Validation error"),
        (status = 409, description = "A cliente with that DNI already exists")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<NuevoCliente>,
) -> Result<impl IntoResponse, JsonApiError> {
    let created = state.clientes.create_cliente(input).await?;
    info!(dni = created.dni, "cliente created");
    let location = format!("/clients/{}", created.dni);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

#[utoipa::path(put, path = "/clients/{dni}", tag = "clients",
    params(("dni" = i32, Path, description = "Business key of the cliente")),
    request_body = crate::openapi::ClienteDoc,
    responses(
        (status = 204, description = "Replaced"),
        (status = 400, description = "DNI in path and body differ"),
        (status = 404, description = "Not found"),
        (status = 500, description = "Concurrent modification")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(dni): Path<i32>,
    Json(record): Json<Cliente>,
) -> Result<StatusCode, JsonApiError> {
    state.clientes.update_cliente(dni, record).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(delete, path = "/clients/{dni}", tag = "clients",
    params(("dni" = i32, Path, description = "Business key of the cliente")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(dni): Path<i32>,
) -> Result<StatusCode, JsonApiError> {
    state.clientes.delete_cliente(dni).await?;
    Ok(StatusCode::NO_CONTENT)
}
