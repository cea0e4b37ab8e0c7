//! Voice models and conversion orders.

use crate::client::{paths, RespeecherClient};
use crate::error::Result;
use crate::types::{ConversionOrderRequest, Listing, Model, OrderModel, ParamValue, Recording};
use reqwest::Method;
use tracing::{debug, info};

impl RespeecherClient {
    /// List the models available for conversion.
    pub async fn fetch_models(&self) -> Result<Vec<Model>> {
        let listing: Listing<Model> = self.get(paths::MODELS).await?;
        let models = listing.into_items();
        debug!(count = models.len(), "Fetched models");
        Ok(models)
    }

    /// Order the conversion of an original recording with one model.
    ///
    /// Returns the recordings the server created for the order, which stay
    /// in progress until the conversion finishes.
    pub async fn create_order(
        &self,
        original_id: &str,
        model: &Model,
        params: Vec<ParamValue>,
    ) -> Result<Vec<Recording>> {
        let request = ConversionOrderRequest {
            original_id: original_id.to_string(),
            models: vec![OrderModel {
                id: model.id.clone(),
                name: model.name.clone(),
                params,
            }],
        };

        let recordings: Vec<Recording> = self
            .send_json(Method::POST, paths::CONVERSION_ORDER, &request)
            .await?;

        info!(
            original_id = %original_id,
            model = %model.name,
            recordings = recordings.len(),
            "Conversion ordered"
        );

        Ok(recordings)
    }
}
