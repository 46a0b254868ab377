use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;

/// Connection settings for an S3-compatible object store.
#[derive(Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Host or URL of the provider, e.g. `sfo2.digitaloceanspaces.com` or `http://localhost:9000`
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub force_path_style: bool,
}

impl std::fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Settings")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    endpoint_url: String,
    force_path_style: bool,
}

/// Endpoints configured as a bare host get `https://`.
fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl S3Storage {
    /// Create a new S3Storage instance from explicit credentials.
    ///
    /// The default AWS provider chain is not consulted.
    pub async fn new(settings: S3Settings) -> StorageResult<Self> {
        if settings.access_key_id.is_empty() || settings.secret_access_key.is_empty() {
            return Err(StorageError::ConfigError(
                "S3 access credentials are empty".to_string(),
            ));
        }

        let endpoint_url = normalize_endpoint(&settings.endpoint);

        let credentials = Credentials::new(
            settings.access_key_id,
            settings.secret_access_key,
            None,
            None,
            "quill-env",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region))
            .credentials_provider(credentials)
            .endpoint_url(endpoint_url.clone())
            .load()
            .await;

        let client = Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(settings.force_path_style)
                .build(),
        );

        tracing::info!(
            bucket = %settings.bucket,
            endpoint = %endpoint_url,
            force_path_style = settings.force_path_style,
            "S3 client configured"
        );

        Ok(S3Storage {
            client,
            bucket: settings.bucket,
            endpoint_url,
            force_path_style: settings.force_path_style,
        })
    }

    /// Generate public URL for an S3 object
    ///
    /// Virtual-hosted style by default: `{scheme}://{bucket}.{host}/{key}`.
    /// Path style when configured: `{endpoint}/{bucket}/{key}`.
    fn generate_url(&self, key: &str) -> String {
        build_public_url(&self.endpoint_url, &self.bucket, key, self.force_path_style)
    }
}

fn build_public_url(endpoint_url: &str, bucket: &str, key: &str, force_path_style: bool) -> String {
    let key = encode_key(key);
    if force_path_style {
        return format!("{}/{}/{}", endpoint_url, bucket, key);
    }
    match endpoint_url.split_once("://") {
        Some((scheme, host)) => format!("{}://{}.{}/{}", scheme, bucket, host, key),
        None => format!("https://{}.{}/{}", bucket, endpoint_url, key),
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;

        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .content_length(size as i64)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await;

        result.map_err(|e| {
            let message = DisplayErrorContext(&e).to_string();
            tracing::error!(
                error = %message,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(message)
        })?;

        let url = self.generate_url(storage_key);

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                    Ok(false)
                } else {
                    Err(StorageError::BackendError(
                        DisplayErrorContext(&e).to_string(),
                    ))
                }
            }
        }
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| StorageError::BackendError(DisplayErrorContext(&e).to_string()))
    }

    fn public_url(&self, storage_key: &str) -> String {
        self.generate_url(storage_key)
    }

    fn bucket(&self) -> Option<&str> {
        Some(&self.bucket)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
