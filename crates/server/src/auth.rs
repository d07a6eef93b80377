use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::warn;

use service::clientes::ClienteService;
use service::facturas::FacturaService;
use service::fotos::FotoService;
use service::identity::{Caller, Rol};

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub auth: ServerAuthConfig,
    pub clientes: Arc<ClienteService>,
    pub facturas: Arc<FacturaService>,
    pub fotos: Arc<FotoService>,
}

/// Claims issued by the external authentication collaborator. `dni` is kept
/// as a raw string and parsed softly into the caller context.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    #[serde(default)]
    dni: Option<String>,
    #[allow(dead_code)]
    exp: usize,
}

/// Global middleware: every route behind it requires a valid bearer token
/// (Authorization header, with a cookie fallback). The verified claims become
/// a `Caller` in the request extensions so handlers receive the identity
/// context explicitly.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();

    let token = {
        let authz = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if let Some(h) = authz {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(StatusCode::UNAUTHORIZED);
            }
            h[prefix.len()..].to_string()
        } else {
            // Cookie fallback for browser clients
            let jar = CookieJar::from_headers(req.headers());
            match jar.get("auth_token") {
                Some(c) if !c.value().is_empty() => c.value().to_string(),
                _ => {
                    warn!(path = %path, "missing Authorization header and auth_token cookie");
                    return Err(StatusCode::UNAUTHORIZED);
                }
            }
        }
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => data,
        Err(e) => {
            warn!(path = %path, err = %e, "token validation failed");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let rol: Rol = match data.claims.role.parse() {
        Ok(rol) => rol,
        Err(e) => {
            warn!(path = %path, err = %e, "token carries an unknown role");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let caller = Caller::from_claims(&data.claims.sub, rol, data.claims.dni.as_deref());
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}
