//! Recording operations.

use crate::client::{paths, RespeecherClient};
use crate::error::Result;
use crate::types::{AudioUpload, Listing, Recording, RecordingFilter, UpdateRecordingRequest};
use reqwest::Method;

impl RespeecherClient {
    /// List the takes and conversions of a phrase.
    pub async fn fetch_recordings(&self, phrase_id: &str) -> Result<Vec<Recording>> {
        let filter = RecordingFilter {
            phrase_id: phrase_id.to_string(),
        };
        let listing: Listing<Recording> = self.get_with_query(paths::RECORDINGS, &filter).await?;
        Ok(listing.into_items())
    }

    /// Upload an original take for a phrase.
    ///
    /// The file name doubles as the `microphone` field. Supported
    /// extensions are listed in [`SUPPORTED_EXTENSIONS`](crate::SUPPORTED_EXTENSIONS).
    pub async fn create_recording<P>(
        &self,
        phrase_id: &str,
        upload: AudioUpload,
        progress: P,
    ) -> Result<Recording>
    where
        P: Fn(f64) + Send + Sync + 'static,
    {
        let fields = vec![
            ("phrase_id", phrase_id.to_string()),
            ("microphone", upload.file_name.clone()),
        ];
        self.upload(paths::RECORDINGS, fields, upload, progress)
            .await
    }

    /// Star or unstar a recording.
    pub async fn update_recording(&self, recording_id: &str, starred: bool) -> Result<Recording> {
        let request = UpdateRecordingRequest { starred };
        let path = format!("{}/{}", paths::RECORDINGS, recording_id);
        self.send_json(Method::PATCH, &path, &request).await
    }

    pub async fn delete_recording(&self, recording_id: &str) -> Result<Recording> {
        let path = format!("{}/{}", paths::RECORDINGS, recording_id);
        self.delete(&path).await
    }
}
