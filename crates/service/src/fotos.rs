use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::FotoPerfil;
use crate::errors::ServiceError;
use crate::identity::Caller;
use crate::store::RecordStore;

/// Upper bound on an uploaded photo, inclusive (5 MiB).
pub const MAX_FOTO_BYTES: usize = 5_242_880;

/// Content types accepted for profile photos.
pub const TIPOS_PERMITIDOS: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

/// Stores and retrieves the opaque profile-photo payload of a registered
/// user, enforcing size and content-type constraints.
pub struct FotoService {
    store: Arc<dyn RecordStore>,
}

impl FotoService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Fully replaces the stored payload; bytes and content-type tag are
    /// written together, never one without the other.
    #[instrument(skip(self, caller, payload), fields(username = %caller.username, size = payload.len()))]
    pub async fn upload_foto(
        &self,
        caller: &Caller,
        payload: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ServiceError> {
        if caller.username.trim().is_empty() {
            return Err(ServiceError::Unauthenticated("caller identity unresolved".into()));
        }
        self.store
            .find_usuario(&caller.username)
            .await?
            .ok_or_else(|| ServiceError::not_found("usuario"))?;

        if payload.is_empty() {
            return Err(ServiceError::Validation("no image provided".into()));
        }
        if payload.len() > MAX_FOTO_BYTES {
            return Err(ServiceError::Validation("image must not exceed 5MB".into()));
        }
        if !TIPOS_PERMITIDOS.contains(&content_type) {
            return Err(ServiceError::Validation(
                "content type not allowed; use JPG, PNG or GIF".into(),
            ));
        }

        self.store
            .store_foto(&caller.username, FotoPerfil {
                bytes: payload,
                content_type: content_type.to_string(),
            })
            .await?;
        info!(username = %caller.username, "foto_perfil_updated");
        Ok(())
    }

    /// Returns the raw bytes plus content type for the transport to stream
    /// back.
    #[instrument(skip(self, caller), fields(username = %caller.username))]
    pub async fn fetch_foto(&self, caller: &Caller) -> Result<FotoPerfil, ServiceError> {
        if caller.username.trim().is_empty() {
            return Err(ServiceError::Unauthenticated("caller identity unresolved".into()));
        }
        let usuario = self
            .store
            .find_usuario(&caller.username)
            .await?
            .ok_or_else(|| ServiceError::not_found("usuario"))?;

        let bytes = usuario
            .foto_perfil
            .ok_or_else(|| ServiceError::NotFound("usuario has no profile photo".into()))?;
        // Should not occur: upload always writes both columns together
        let content_type = match usuario.tipo_contenido_foto {
            Some(ct) if !ct.trim().is_empty() => ct,
            _ => return Err(ServiceError::Validation("photo content type missing".into())),
        };
        Ok(FotoPerfil { bytes, content_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Usuario;
    use crate::identity::Rol;
    use crate::store::memory::MemoryStore;
    use crate::test_support::caller;

    fn service_with_user(username: &str) -> (FotoService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.seed_usuario(Usuario {
            username: username.to_string(),
            foto_perfil: None,
            tipo_contenido_foto: None,
        });
        (FotoService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn unknown_usuario_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let svc = FotoService::new(store);
        let err = svc
            .upload_foto(&caller("nobody", Rol::Cliente, None), vec![1], "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_payload_is_rejected() {
        let (svc, _) = service_with_user("ana");
        let err = svc
            .upload_foto(&caller("ana", Rol::Cliente, None), Vec::new(), "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn size_boundary_is_inclusive() {
        let (svc, _) = service_with_user("ana");
        let c = caller("ana", Rol::Cliente, None);

        // Exactly 5_242_880 bytes must succeed
        svc.upload_foto(&c, vec![0u8; MAX_FOTO_BYTES], "image/png").await.unwrap();

        // One byte over must fail
        let err = svc
            .upload_foto(&c, vec![0u8; MAX_FOTO_BYTES + 1], "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn content_type_whitelist_is_enforced() {
        let (svc, _) = service_with_user("ana");
        let c = caller("ana", Rol::Cliente, None);

        for ct in TIPOS_PERMITIDOS {
            svc.upload_foto(&c, vec![1, 2, 3], ct).await.unwrap();
        }
        for ct in ["image/webp", "text/plain", "application/pdf", ""] {
            let err = svc.upload_foto(&c, vec![1, 2, 3], ct).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{} must be rejected", ct);
        }
    }

    #[tokio::test]
    async fn upload_then_fetch_round_trips_exactly() {
        let (svc, _) = service_with_user("ana");
        let c = caller("ana", Rol::Cliente, None);

        let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        svc.upload_foto(&c, payload.clone(), "image/gif").await.unwrap();

        let foto = svc.fetch_foto(&c).await.unwrap();
        assert_eq!(foto.bytes, payload);
        assert_eq!(foto.content_type, "image/gif");
    }

    #[tokio::test]
    async fn fetch_without_photo_is_not_found() {
        let (svc, _) = service_with_user("ana");
        let err = svc.fetch_foto(&caller("ana", Rol::Cliente, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn fetch_with_missing_content_type_tag_is_rejected() {
        // Simulate a row that violates the both-or-neither invariant
        let store = Arc::new(MemoryStore::new());
        store.seed_usuario(Usuario {
            username: "ana".into(),
            foto_perfil: Some(vec![1, 2, 3]),
            tipo_contenido_foto: None,
        });
        let svc = FotoService::new(store);
        let err = svc.fetch_foto(&caller("ana", Rol::Cliente, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
