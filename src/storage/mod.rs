use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use futures::StreamExt;
use object_store::{
    ObjectMeta, ObjectStore, aws::AmazonS3Builder, azure::MicrosoftAzureBuilder,
    gcp::GoogleCloudStorageBuilder, local::LocalFileSystem, path::Path as ObjectPath,
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc};
use tracing::warn;

/// Object prefix every uploaded asset lands under.
const UPLOAD_PREFIX: &str = "uploads";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum S3Vendor {
    AWS,
    GCP,
    Azure,
    Aliyun,
    Tencent,
    Minio,
    DigitalOcean,
}

impl Default for S3Vendor {
    fn default() -> Self {
        S3Vendor::AWS
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    Local {
        path: String,
    },
    S3 {
        vendor: S3Vendor,
        bucket: String,
        region: String,
        access_key: String,
        secret_key: String,
        endpoint: Option<String>,
        prefix: Option<String>,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local {
            path: "storage".to_string(),
        }
    }
}

/// Blob asset manager. Owns the lifetime of every uploaded object: records
/// hold the public URL as an owning reference, and the last writer deletes
/// the superseded object (best-effort, no reference counting).
#[derive(Clone)]
pub struct Storage {
    inner: Arc<dyn ObjectStore>,
    prefix: String,
    is_local: bool,
    local_root: Option<PathBuf>,
    public_base_url: String,
}

impl Storage {
    pub fn new(config: &StorageConfig, public_base_url: &str) -> Result<Self> {
        let public_base_url = public_base_url.trim_end_matches('/').to_string();
        match config {
            StorageConfig::Local { path } => {
                let root = PathBuf::from(path);
                std::fs::create_dir_all(&root)
                    .with_context(|| format!("create storage directory {}", path))?;
                let store = LocalFileSystem::new_with_prefix(&root)?;
                Ok(Self {
                    inner: Arc::new(store),
                    prefix: "".to_string(),
                    is_local: true,
                    local_root: Some(root),
                    public_base_url,
                })
            }
            StorageConfig::S3 {
                vendor,
                bucket,
                region,
                access_key,
                secret_key,
                endpoint,
                prefix,
            } => {
                let store: Arc<dyn ObjectStore> = match vendor {
                    S3Vendor::AWS
                    | S3Vendor::Aliyun
                    | S3Vendor::Tencent
                    | S3Vendor::Minio
                    | S3Vendor::DigitalOcean => {
                        let mut builder = AmazonS3Builder::new()
                            .with_bucket_name(bucket)
                            .with_region(region)
                            .with_access_key_id(access_key)
                            .with_secret_access_key(secret_key);

                        if let Some(ep) = endpoint {
                            if !ep.is_empty() {
                                builder = builder.with_endpoint(ep);
                            }
                        }
                        Arc::new(builder.build()?)
                    }
                    S3Vendor::GCP => {
                        let instance = GoogleCloudStorageBuilder::new()
                            .with_bucket_name(bucket)
                            .with_service_account_key(secret_key)
                            .build()?;
                        Arc::new(instance)
                    }
                    S3Vendor::Azure => {
                        let instance = MicrosoftAzureBuilder::new()
                            .with_container_name(bucket)
                            .with_account(access_key)
                            .with_access_key(secret_key)
                            .build()?;
                        Arc::new(instance)
                    }
                };

                Ok(Self {
                    inner: store,
                    prefix: prefix.clone().unwrap_or_default(),
                    is_local: false,
                    local_root: None,
                    public_base_url,
                })
            }
        }
    }

    fn normalize_path(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.prefix.trim_end_matches('/'), path)
        }
    }

    fn object_path(&self, path: &str) -> ObjectPath {
        ObjectPath::from(self.normalize_path(path))
    }

    pub async fn write(&self, path: &str, bytes: Bytes) -> Result<()> {
        if self.is_local {
            if let Some(local_path) = self.local_path(path) {
                if let Some(parent) = local_path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
        let object_path = self.object_path(path);
        self.inner.put(&object_path, bytes.into()).await?;
        Ok(())
    }

    pub async fn read(&self, path: &str) -> Result<Bytes> {
        let object_path = self.object_path(path);
        let result = self.inner.get(&object_path).await?;
        let bytes = result.bytes().await?;
        Ok(bytes)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let object_path = self.object_path(path);
        self.inner.delete(&object_path).await?;
        Ok(())
    }

    /// List the stored upload objects, e.g. for an admin storage overview.
    pub async fn list_uploads(&self) -> Result<Vec<ObjectMeta>> {
        let prefix = self.object_path(UPLOAD_PREFIX);
        let mut stream = self.inner.list(Some(&prefix));
        let mut files = Vec::new();
        while let Some(item) = stream.next().await {
            let meta = item?;
            files.push(meta);
        }
        Ok(files)
    }

    pub fn is_local(&self) -> bool {
        self.is_local
    }

    pub fn local_path(&self, path: &str) -> Option<PathBuf> {
        if let Some(root) = &self.local_root {
            Some(root.join(path.trim_start_matches('/')))
        } else {
            None
        }
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path.trim_start_matches('/'))
    }

    /// Store an uploaded file and return its public URL.
    ///
    /// Objects are keyed by the (sanitized) client filename, so uploading a
    /// file with the same name as an existing object overwrites it. Callers
    /// must not rely on filename uniqueness for collision protection.
    pub async fn store_asset(&self, file_name: &str, bytes: Bytes) -> Result<String> {
        let name = sanitize_file_name(file_name);
        if name.is_empty() {
            return Err(anyhow!("upload has no usable file name"));
        }
        if bytes.is_empty() {
            return Err(anyhow!("upload is empty"));
        }
        let path = format!("{}/{}", UPLOAD_PREFIX, name);
        self.write(&path, bytes).await?;
        Ok(self.public_url(&path))
    }

    /// Map a public asset URL back to its object path. Returns `None` for
    /// URLs that do not belong to this store.
    pub fn object_path_for_url(&self, url: &str) -> Option<String> {
        let rest = url.strip_prefix(self.public_base_url.as_str())?;
        let path = rest.trim_start_matches('/');
        if path.is_empty() {
            return None;
        }
        Some(path.to_string())
    }

    /// Best-effort delete of a previously stored URL. Failures (and foreign
    /// URLs) are logged and swallowed: a stale blob will 404 gracefully and
    /// must never block the record mutation that superseded it.
    pub async fn delete_url(&self, url: &str) {
        let Some(path) = self.object_path_for_url(url) else {
            warn!("skipping delete of foreign asset url: {}", url);
            return;
        };
        if let Err(err) = self.delete(&path).await {
            warn!("failed to delete asset {}: {}", url, err);
        }
    }
}

fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or("");
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn local_storage(dir: &tempfile::TempDir) -> Storage {
        let config = StorageConfig::Local {
            path: dir.path().to_str().unwrap().to_string(),
        };
        Storage::new(&config, "http://localhost:8080").unwrap()
    }

    #[tokio::test]
    async fn store_asset_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let storage = local_storage(&dir);

        let url = storage
            .store_asset("hero.jpg", Bytes::from_static(b"jpegdata"))
            .await?;
        assert_eq!(url, "http://localhost:8080/uploads/hero.jpg");

        let read_back = storage.read("uploads/hero.jpg").await?;
        assert_eq!(read_back, Bytes::from_static(b"jpegdata"));
        Ok(())
    }

    #[tokio::test]
    async fn store_asset_overwrites_same_name() -> Result<()> {
        let dir = tempdir()?;
        let storage = local_storage(&dir);

        storage
            .store_asset("logo.png", Bytes::from_static(b"first"))
            .await?;
        storage
            .store_asset("logo.png", Bytes::from_static(b"second"))
            .await?;

        let read_back = storage.read("uploads/logo.png").await?;
        assert_eq!(read_back, Bytes::from_static(b"second"));
        Ok(())
    }

    #[tokio::test]
    async fn store_asset_rejects_empty_payload() {
        let dir = tempdir().unwrap();
        let storage = local_storage(&dir);
        assert!(storage.store_asset("a.png", Bytes::new()).await.is_err());
        assert!(
            storage
                .store_asset("", Bytes::from_static(b"x"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn delete_url_removes_object() -> Result<()> {
        let dir = tempdir()?;
        let storage = local_storage(&dir);

        let url = storage
            .store_asset("slide.jpg", Bytes::from_static(b"data"))
            .await?;
        storage.delete_url(&url).await;
        assert!(storage.read("uploads/slide.jpg").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn delete_url_swallows_foreign_and_missing() {
        let dir = tempdir().unwrap();
        let storage = local_storage(&dir);

        // Neither of these may panic or error.
        storage.delete_url("https://elsewhere.example/img.png").await;
        storage
            .delete_url("http://localhost:8080/uploads/ghost.png")
            .await;
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("photo 1 (2).jpg"), "photo12.jpg");
        assert_eq!(sanitize_file_name("///"), "");
    }
}
