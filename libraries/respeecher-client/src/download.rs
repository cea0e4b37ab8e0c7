//! Recording downloads.

use crate::client::RespeecherClient;
use crate::error::{RespeecherError, Result};
use crate::types::Recording;
use futures_util::StreamExt;
use reqwest::Response;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

impl RespeecherClient {
    /// Download a recording into the configured download directory.
    ///
    /// The file is named after the last segment of the recording URL. Fails
    /// with `RequestFailed` when the recording has no usable URL or the file
    /// is already there. `progress` receives the fraction downloaded, from
    /// 0.0 to 1.0, when the server sends a content length.
    pub async fn download_recording<F>(&self, recording: &Recording, progress: F) -> Result<PathBuf>
    where
        F: FnMut(f64),
    {
        let token = self.require_token().await?;

        let mut url = recording
            .url
            .as_deref()
            .and_then(|u| Url::parse(u).ok())
            .ok_or_else(|| RespeecherError::request_failed("Recording has no valid URL"))?;

        let dest = recording
            .local_path(&self.config.download_dir)
            .ok_or_else(|| RespeecherError::request_failed("Recording URL has no file name"))?;

        if dest.exists() {
            return Err(RespeecherError::request_failed(format!(
                "File already exists: {}",
                dest.display()
            )));
        }

        url.query_pairs_mut().append_pair("token", &token);
        debug!(recording_id = %recording.id, dest = %dest.display(), "Downloading recording");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RespeecherError::request_failed(e.to_string()))?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response.bytes().await.unwrap_or_default();
            return Err(self.fail(status.as_u16(), &body).await);
        }

        match write_body(response, &dest, progress).await {
            Ok(size) => {
                info!(
                    recording_id = %recording.id,
                    dest = %dest.display(),
                    size,
                    "Recording downloaded"
                );
                Ok(dest)
            }
            Err(e) => {
                // A partial file would make every retry fail the exists check
                if let Err(remove_err) = tokio::fs::remove_file(&dest).await {
                    warn!(error = %remove_err, dest = %dest.display(), "Failed to remove partial download");
                }
                Err(e)
            }
        }
    }
}

/// Stream the response body into `dest`, returning the byte count.
async fn write_body<F>(response: Response, dest: &Path, mut progress: F) -> Result<u64>
where
    F: FnMut(f64),
{
    let total_size = response.content_length();

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RespeecherError::request_failed(e.to_string()))?;
    }

    let mut file = File::create(dest)
        .await
        .map_err(|e| RespeecherError::request_failed(e.to_string()))?;
    let mut downloaded: u64 = 0;

    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| RespeecherError::request_failed(e.to_string()))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| RespeecherError::request_failed(e.to_string()))?;
        downloaded += chunk.len() as u64;

        if let Some(total) = total_size.filter(|t| *t > 0) {
            progress(downloaded as f64 / total as f64);
        }
    }

    file.flush()
        .await
        .map_err(|e| RespeecherError::request_failed(e.to_string()))?;

    Ok(downloaded)
}
