//! Calibration samples for models.

use crate::client::{paths, RespeecherClient};
use crate::error::Result;
use crate::types::{AudioUpload, Calibration, CalibrationFilter, Listing};

impl RespeecherClient {
    pub async fn fetch_calibrations(&self, model_id: &str) -> Result<Vec<Calibration>> {
        let filter = CalibrationFilter {
            model_id: model_id.to_string(),
        };
        let listing: Listing<Calibration> =
            self.get_with_query(paths::CALIBRATIONS, &filter).await?;
        Ok(listing.into_items())
    }

    /// Upload a calibration sample for a model.
    pub async fn create_calibration<P>(
        &self,
        model_id: &str,
        name: &str,
        upload: AudioUpload,
        progress: P,
    ) -> Result<Calibration>
    where
        P: Fn(f64) + Send + Sync + 'static,
    {
        let fields = vec![("model_id", model_id.to_string()), ("name", name.to_string())];
        self.upload(paths::CALIBRATIONS, fields, upload, progress)
            .await
    }

    pub async fn delete_calibration(&self, calibration_id: &str) -> Result<Calibration> {
        let path = format!("{}/{}", paths::CALIBRATIONS, calibration_id);
        self.delete(&path).await
    }
}
