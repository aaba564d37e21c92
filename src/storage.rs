use std::time::Duration;

use anyhow::{Context, Result};
use azure_core::{FixedRetryOptions, RetryOptions};
use azure_storage::StorageCredentials;
use azure_storage_blobs::prelude::*;
use chrono::{DateTime, Utc};
use log::info;

// Transient-failure handling is delegated to the SDK's retry policy;
// nothing here retries on its own.
const UPLOAD_RETRIES: u32 = 3;
const UPLOAD_RETRY_DELAY: Duration = Duration::from_secs(10);

pub struct BlobUploader {
    container: ContainerClient,
}

impl BlobUploader {
    pub fn new(account: &str, key: &str, container: &str) -> Self {
        let credentials = StorageCredentials::access_key(account.to_owned(), key.to_owned());
        let container = ClientBuilder::new(account.to_owned(), credentials)
            .retry(RetryOptions::fixed(
                FixedRetryOptions::default()
                    .max_retries(UPLOAD_RETRIES)
                    .delay(UPLOAD_RETRY_DELAY),
            ))
            .container_client(container.to_owned());
        BlobUploader { container }
    }

    /// Uploads the payload as a single block blob. One attempt per run,
    /// beyond whatever the SDK's own policy retries internally.
    pub async fn upload(&self, blob_name: &str, payload: Vec<u8>) -> Result<()> {
        let size = payload.len();
        self.container
            .blob_client(blob_name)
            .put_block_blob(payload)
            .await
            .with_context(|| format!("Error while uploading blob {blob_name}"))?;
        info!(
            "uploaded {size} bytes to container {}",
            self.container.container_name()
        );
        Ok(())
    }
}

/// Blob names derive from the wall clock rounded down to the current UTC
/// hour, so two runs within the same hour write to the same blob. That
/// one-capture-per-hour naming is intentional.
pub fn blob_name(now: DateTime<Utc>, extension: &str) -> String {
    format!("{}.{}", now.format("%Y-%m-%dT%H:00:00Z"), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn blob_name_truncates_to_the_hour() {
        let at = Utc.with_ymd_and_hms(2024, 5, 3, 14, 30, 12).unwrap();
        assert_eq!(blob_name(at, "mp3"), "2024-05-03T14:00:00Z.mp3");
    }

    #[test]
    fn runs_within_the_same_hour_share_a_name() {
        let first = Utc.with_ymd_and_hms(2024, 5, 3, 14, 0, 1).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 3, 14, 59, 59).unwrap();
        assert_eq!(blob_name(first, "mp3"), blob_name(second, "mp3"));
    }

    #[test]
    fn extension_follows_the_output_format() {
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 5, 0).unwrap();
        assert_eq!(blob_name(at, "ogg"), "2024-12-31T23:00:00Z.ogg");
    }
}
