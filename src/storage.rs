use async_trait::async_trait;
use aws_sdk_s3 as s3;
use bytes::Bytes;
use s3::primitives::ByteStream;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// StorageError
///
/// Failure reported by the object store; surfaces as a 500.
#[derive(Debug, Error)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

// 1. StorageService Contract
/// StorageService
///
/// Contract for the object storage layer. Handlers and services only see this trait, so
/// the S3 client and the in-memory mock are interchangeable.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Creates the configured bucket if it is missing. Used in `Env::Local` to provision
    /// MinIO.
    async fn ensure_bucket_exists(&self);

    /// Stores `body` under `key` and returns the URL the object can be fetched from.
    async fn upload_object(
        &self,
        key: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<String, StorageError>;

    /// Removes the object stored under `key`. Used to compensate for a failed batch.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;
}

// 2. The Real Implementation (S3/MinIO/Supabase)
/// S3StorageClient
///
/// AWS SDK client pointed at any S3-compatible endpoint. `force_path_style(true)` is
/// required by MinIO and the Supabase gateway.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
    public_url: String,
}

impl S3StorageClient {
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
        public_url: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        let client = s3::Client::from_conf(config);

        Self {
            client,
            bucket_name: bucket.to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of an object under the public base, e.g. `http://localhost:9000/bucket/key`.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_url, self.bucket_name, key)
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    async fn ensure_bucket_exists(&self) {
        // CreateBucket on an existing bucket fails harmlessly.
        if let Err(e) = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
        {
            tracing::debug!("create_bucket({}) skipped: {:?}", self.bucket_name, e);
        }
    }

    async fn upload_object(
        &self,
        key: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<String, StorageError> {
        let key = sanitize_key(key);

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::new(format!("put_object {key}: {e}")))?;

        Ok(self.object_url(&key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        let key = sanitize_key(key);

        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .send()
            .await
            .map_err(|e| StorageError::new(format!("delete_object {key}: {e}")))?;

        Ok(())
    }
}

/// sanitize_key
///
/// Drops empty, `.` and `..` segments so a key can never climb out of its prefix.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

// 3. The Mock Implementation (For Tests)
/// MockStorageService
///
/// In-memory object store. Keeps every stored key so tests can assert on compensation,
/// and can be told to fail from the n-th upload onwards.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// Index (0-based) of the first upload that fails; `None` never fails.
    pub fail_from: Option<usize>,
    objects: Arc<Mutex<Vec<String>>>,
    uploads: Arc<Mutex<usize>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self::failing_from(0)
    }

    pub fn failing_from(index: usize) -> Self {
        Self {
            fail_from: Some(index),
            ..Self::default()
        }
    }

    /// Keys currently held by the mock.
    pub async fn stored_keys(&self) -> Vec<String> {
        self.objects.lock().await.clone()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {}

    async fn upload_object(
        &self,
        key: &str,
        _content_type: &str,
        _body: Bytes,
    ) -> Result<String, StorageError> {
        let mut uploads = self.uploads.lock().await;
        let index = *uploads;
        *uploads += 1;

        if self.fail_from.is_some_and(|from| index >= from) {
            return Err(StorageError::new("Mock Storage Error: Simulation requested"));
        }

        let key = sanitize_key(key);
        self.objects.lock().await.push(key.clone());
        Ok(format!("http://localhost:9000/mock-bucket/{}", key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        let key = sanitize_key(key);
        self.objects.lock().await.retain(|stored| *stored != key);
        Ok(())
    }
}

/// StorageState
///
/// The shared handle stored in `AppState`.
pub type StorageState = Arc<dyn StorageService>;
