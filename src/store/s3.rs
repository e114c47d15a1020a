//! `aws-sdk-s3` implementation of [`BucketStore`].
//!
//! Works against AWS S3 and S3-compatible services (MinIO, Cloudflare R2,
//! DigitalOcean Spaces) via a custom endpoint and path-style addressing.

use async_trait::async_trait;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{
    BatchOutcome, BucketStore, FailedDelete, ObjectEntry, ObjectPage, StoreError, StoreResult,
};

/// Connection settings for the S3 client.
///
/// Credentials left unset resolve through the AWS default provider chain
/// (environment variables, shared config, instance metadata).
#[derive(Debug, Clone, Default)]
pub struct S3StoreConfig {
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub force_path_style: bool,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// S3-backed object store.
pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    /// Build a client from explicit configuration, no ambient singleton.
    pub async fn new(config: S3StoreConfig) -> Self {
        info!(
            region = config.region.as_deref(),
            endpoint = config.endpoint.as_deref(),
            "Initializing S3 client"
        );

        let mut sdk_config_builder = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            sdk_config_builder = sdk_config_builder.region(aws_config::Region::new(region.clone()));
        }

        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = aws_credential_types::Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                None, // session token
                None, // expiry
                "scour-config",
            );
            sdk_config_builder = sdk_config_builder.credentials_provider(credentials);
        }

        let sdk_config = sdk_config_builder.load().await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        if let Some(endpoint) = &config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        if config.force_path_style {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config_builder.build()),
        }
    }
}

#[async_trait]
impl BucketStore for S3Store {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        cursor: Option<&str>,
        page_size: i32,
    ) -> StoreResult<ObjectPage> {
        let mut request = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(page_size);

        if let Some(prefix) = prefix {
            request = request.prefix(prefix);
        }
        if let Some(cursor) = cursor {
            request = request.continuation_token(cursor);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Api(e.to_string()))?;

        let objects = response
            .contents()
            .iter()
            .filter_map(|obj| {
                let key = obj.key()?.to_string();
                let last_modified = obj.last_modified().and_then(to_chrono);
                Some(ObjectEntry { key, last_modified })
            })
            .collect();

        debug!(bucket, cursor, "Fetched listing page");

        Ok(ObjectPage {
            objects,
            next_cursor: response.next_continuation_token().map(str::to_string),
        })
    }

    async fn delete_batch(&self, bucket: &str, keys: &[String]) -> StoreResult<BatchOutcome> {
        let identifiers = keys
            .iter()
            .map(|key| {
                ObjectIdentifier::builder()
                    .key(key)
                    .build()
                    .map_err(|e| StoreError::InvalidRequest(e.to_string()))
            })
            .collect::<StoreResult<Vec<_>>>()?;

        // Quiet mode: the store only reports failures, not confirmations.
        let delete = Delete::builder()
            .set_objects(Some(identifiers))
            .quiet(true)
            .build()
            .map_err(|e| StoreError::InvalidRequest(e.to_string()))?;

        let response = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| StoreError::Api(e.to_string()))?;

        let failed: Vec<FailedDelete> = response
            .errors()
            .iter()
            .map(|e| FailedDelete {
                key: e.key().unwrap_or_default().to_string(),
                code: e.code().map(str::to_string),
                message: e.message().map(str::to_string),
            })
            .collect();

        let confirmed: Vec<String> = response
            .deleted()
            .iter()
            .filter_map(|d| d.key().map(str::to_string))
            .collect();

        let deleted = reconcile_deleted(keys, confirmed, &failed);

        Ok(BatchOutcome { deleted, failed })
    }
}

/// Convert an SDK timestamp to chrono, tolerating unrepresentable values.
fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    dt.to_millis().ok().and_then(DateTime::from_timestamp_millis)
}

/// Reconcile per-call confirmations.
///
/// A quiet DeleteObjects response omits the deleted list, so an empty
/// confirmation set means every submitted key not in the error list was
/// deleted. A non-empty confirmation set is taken as-is.
fn reconcile_deleted(
    submitted: &[String],
    confirmed: Vec<String>,
    failed: &[FailedDelete],
) -> Vec<String> {
    if !confirmed.is_empty() {
        return confirmed;
    }
    let errored: std::collections::HashSet<&str> =
        failed.iter().map(|f| f.key.as_str()).collect();
    submitted
        .iter()
        .filter(|key| !errored.contains(key.as_str()))
        .cloned()
        .collect()
}
