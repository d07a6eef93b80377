use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use service::identity::Caller;

use crate::auth::ServerState;
use crate::errors::JsonApiError;

#[utoipa::path(post, path = "/profile-photo/upload", tag = "profile-photo",
    responses(
        (status = 200, description = "Photo stored for the authenticated user"),
        (status = 400, description = "Missing, oversize or unsupported file"),
        (status = 404, description = "No registered user matches the caller")
    )
)]
pub async fn upload(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, JsonApiError> {
    let mut payload: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "validation",
            format!("malformed multipart body: {e}"),
        )
    })? {
        if field.name() != Some("foto") {
            continue;
        }
        // content_type must be captured before bytes() consumes the field
        let content_type = field.content_type().unwrap_or("").to_string();
        let bytes = field.bytes().await.map_err(|e| {
            JsonApiError::new(
                StatusCode::BAD_REQUEST,
                "validation",
                format!("could not read file field: {e}"),
            )
        })?;
        payload = Some((bytes.to_vec(), content_type));
        break;
    }

    let (bytes, content_type) = payload.ok_or_else(|| {
        JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "validation",
            "multipart field 'foto' is required",
        )
    })?;

    state
        .fotos
        .upload_foto(&caller, bytes, &content_type)
        .await?;
    info!(username = %caller.username, "profile photo stored");
    Ok(Json(serde_json::json!({
        "mensaje": "foto de perfil actualizada"
    })))
}

#[utoipa::path(get, path = "/profile-photo", tag = "profile-photo",
    responses(
        (status = 200, description = "Photo bytes under the stored content type"),
        (status = 404, description = "No photo stored for the caller")
    )
)]
pub async fn fetch(
    State(state): State<ServerState>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, JsonApiError> {
    let foto = state.fotos.fetch_foto(&caller).await?;
    Ok(([(header::CONTENT_TYPE, foto.content_type)], foto.bytes))
}
