//! Almacenamiento de archivos
//!
//! Avatares de clientes e imágenes de vehículos. Dos backends: el storage
//! de objetos del proveedor alojado (HTTP) y el sistema de archivos local.

use std::path::PathBuf;

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Backend de almacenamiento
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Guarda el contenido en `path` y devuelve su URL pública
    async fn upload(&self, path: &str, content: Bytes, content_type: &str) -> AppResult<String>;

    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Inverso de la URL pública devuelta por `upload`
    fn path_from_url(&self, url: &str) -> Option<String>;
}

/// Extensión de archivo para los tipos de imagen aceptados
pub fn image_extension(content_type: &str) -> AppResult<&'static str> {
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    match mime {
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/webp" => Ok("webp"),
        other => Err(AppError::BadRequest(format!(
            "Tipo de archivo no soportado: '{}' (use JPEG, PNG o WebP)",
            other
        ))),
    }
}

pub fn avatar_path(client_id: Uuid, extension: &str) -> String {
    format!("avatars/{}/{}.{}", client_id, Uuid::new_v4(), extension)
}

pub fn vehicle_image_path(vehicle_id: Uuid, extension: &str) -> String {
    format!("vehicles/{}/{}.{}", vehicle_id, Uuid::new_v4(), extension)
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Storage de objetos del proveedor alojado
pub struct ObjectStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

impl ObjectStorage {
    pub fn new(client: reqwest::Client, base_url: &str, bucket: &str, service_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, encode_path(path))
    }

    fn public_prefix(&self) -> String {
        format!("{}/storage/v1/object/public/{}/", self.base_url, self.bucket)
    }
}

#[async_trait]
impl StorageBackend for ObjectStorage {
    async fn upload(&self, path: &str, content: Bytes, content_type: &str) -> AppResult<String> {
        tracing::info!("📤 Subiendo {} ({} bytes)", path, content.len());

        let response = self
            .client
            .post(self.object_url(path))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("content-type", content_type)
            .header("x-upsert", "true")
            .body(content)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error subiendo archivo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Storage respondió {} al subir {}: {}",
                status, path, body
            )));
        }

        Ok(format!("{}{}", self.public_prefix(), encode_path(path)))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.object_url(path))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error borrando archivo: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Storage respondió {} al borrar {}",
                response.status(),
                path
            )));
        }
        Ok(())
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        let encoded = url.strip_prefix(&self.public_prefix())?;
        urlencoding::decode(encoded).ok().map(|p| p.into_owned())
    }
}

/// Sistema de archivos local (desarrollo y tests)
pub struct FilesystemStorage {
    base_path: PathBuf,
}

impl FilesystemStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        if path.split('/').any(|segment| segment == ".." || segment.is_empty()) {
            return Err(AppError::BadRequest(format!("Ruta de archivo inválida: {}", path)));
        }
        Ok(self.base_path.join(path))
    }

    fn url_prefix(&self) -> String {
        format!("file://{}/", self.base_path.display())
    }
}

#[async_trait]
impl StorageBackend for FilesystemStorage {
    async fn upload(&self, path: &str, content: Bytes, _content_type: &str) -> AppResult<String> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Error creando directorio: {}", e)))?;
        }

        let mut file = fs::File::create(&full_path)
            .await
            .map_err(|e| AppError::Internal(format!("Error creando archivo: {}", e)))?;
        file.write_all(&content)
            .await
            .map_err(|e| AppError::Internal(format!("Error escribiendo archivo: {}", e)))?;

        Ok(format!("{}{}", self.url_prefix(), path))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!("Error borrando archivo: {}", e))),
        }
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.url_prefix()).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("image/png").unwrap(), "png");
        assert_eq!(image_extension("image/jpeg; charset=binary").unwrap(), "jpg");
        assert!(matches!(image_extension("application/pdf"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_object_public_url_round_trip() {
        let storage = ObjectStorage::new(reqwest::Client::new(), "https://proj.example.co/", "docs", "key");
        let url = format!("{}{}", storage.public_prefix(), encode_path("avatars/a b/x.png"));
        assert_eq!(url, "https://proj.example.co/storage/v1/object/public/docs/avatars/a%20b/x.png");
        assert_eq!(storage.path_from_url(&url).as_deref(), Some("avatars/a b/x.png"));
        assert_eq!(storage.path_from_url("https://elsewhere/x.png"), None);
    }

    #[tokio::test]
    async fn test_filesystem_upload_and_delete() {
        let dir = std::env::temp_dir().join(format!("storage-test-{}", Uuid::new_v4()));
        let storage = FilesystemStorage::new(dir.clone());

        let path = vehicle_image_path(Uuid::new_v4(), "png");
        let url = storage
            .upload(&path, Bytes::from_static(b"png-bytes"), "image/png")
            .await
            .unwrap();

        assert_eq!(storage.path_from_url(&url).as_deref(), Some(path.as_str()));
        assert_eq!(std::fs::read(dir.join(&path)).unwrap(), b"png-bytes");

        storage.delete(&path).await.unwrap();
        assert!(!dir.join(&path).exists());
        // borrar dos veces no falla
        storage.delete(&path).await.unwrap();

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_filesystem_rejects_traversal() {
        let storage = FilesystemStorage::new(std::env::temp_dir());
        let result = storage.upload("../etc/passwd", Bytes::new(), "image/png").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
