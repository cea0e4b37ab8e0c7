//! Multipart uploads with progress reporting.

use crate::client::RespeecherClient;
use crate::error::{RespeecherError, Result};
use crate::types::AudioUpload;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Size of the slices the file is streamed in; progress is reported per slice.
const CHUNK_SIZE: usize = 64 * 1024;

impl RespeecherClient {
    /// POST `fields` plus the file as part `data`.
    ///
    /// `progress` receives the fraction of the file handed to the connection
    /// so far, from 0.0 to 1.0.
    pub(crate) async fn upload<T, P>(
        &self,
        path: &str,
        fields: Vec<(&'static str, String)>,
        upload: AudioUpload,
        progress: P,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        P: Fn(f64) + Send + Sync + 'static,
    {
        let builder = self.authorized(Method::POST, path).await?;

        let file_name = upload.file_name.clone();
        let size = upload.data.len();
        let part = Part::stream_with_length(progress_body(upload.data, progress), size as u64)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| RespeecherError::upload_failed(e.to_string()))?;

        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        let form = form.part("data", part);

        debug!(file = %file_name, size, "Uploading");

        let response = builder.multipart(form).send().await.map_err(|e| {
            debug!(error = %e, "Upload transport error");
            RespeecherError::upload_failed(e.to_string())
        })?;

        let result = self.handle_response(response).await?;
        info!(file = %file_name, size, "Upload complete");
        Ok(result)
    }
}

/// Stream `data` in slices, reporting progress as each slice goes out.
fn progress_stream<P>(
    data: Vec<u8>,
    progress: P,
) -> impl futures_util::Stream<Item = std::io::Result<Bytes>> + Send + Sync + 'static
where
    P: Fn(f64) + Send + Sync + 'static,
{
    let data = Bytes::from(data);
    let total = data.len();
    // An empty file still yields one empty slice so progress reaches 1.0
    let chunks: Vec<Bytes> = if total == 0 {
        vec![Bytes::new()]
    } else {
        (0..total)
            .step_by(CHUNK_SIZE)
            .map(|start| data.slice(start..total.min(start + CHUNK_SIZE)))
            .collect()
    };

    let mut sent = 0usize;
    futures_util::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len();
        let fraction = if total == 0 {
            1.0
        } else {
            sent as f64 / total as f64
        };
        progress(fraction);
        Ok::<Bytes, std::io::Error>(chunk)
    })
}

fn progress_body<P>(data: Vec<u8>, progress: P) -> Body
where
    P: Fn(f64) + Send + Sync + 'static,
{
    Body::wrap_stream(progress_stream(data, progress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_progress_stream_reports_fractions() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let chunks: Vec<_> = progress_stream(vec![7u8; CHUNK_SIZE * 2 + 10], move |p| {
            sink.lock().unwrap().push(p);
        })
        .collect()
        .await;

        assert_eq!(chunks.len(), 3);
        let sizes: Vec<usize> = chunks.iter().map(|c| c.as_ref().unwrap().len()).collect();
        assert_eq!(sizes, vec![CHUNK_SIZE, CHUNK_SIZE, 10]);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen.last().copied(), Some(1.0));
    }

    #[tokio::test]
    async fn test_empty_file_reports_completion() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let chunks: Vec<_> = progress_stream(Vec::new(), move |p| {
            sink.lock().unwrap().push(p);
        })
        .collect()
        .await;

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].as_ref().unwrap().is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![1.0]);
    }
}
