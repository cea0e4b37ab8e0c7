//! Phrase operations.

use crate::client::{paths, RespeecherClient};
use crate::error::Result;
use crate::types::{CreatePhraseRequest, Listing, Phrase, PhraseFilter, UpdatePhraseRequest};
use reqwest::Method;

impl RespeecherClient {
    /// List the phrases of a project.
    pub async fn fetch_phrases(&self, project_id: &str) -> Result<Vec<Phrase>> {
        let filter = PhraseFilter {
            project_id: project_id.to_string(),
        };
        let listing: Listing<Phrase> = self.get_with_query(paths::PHRASES, &filter).await?;
        Ok(listing.into_items())
    }

    pub async fn create_phrase(&self, project_id: &str, text: &str) -> Result<Phrase> {
        let request = CreatePhraseRequest {
            project_id: project_id.to_string(),
            text: text.to_string(),
        };
        self.send_json(Method::POST, paths::PHRASES, &request).await
    }

    /// Replace the text of a phrase.
    pub async fn update_phrase(&self, phrase_id: &str, text: &str) -> Result<Phrase> {
        let request = UpdatePhraseRequest {
            text: text.to_string(),
        };
        let path = format!("{}/{}", paths::PHRASES, phrase_id);
        self.send_json(Method::PUT, &path, &request).await
    }

    pub async fn delete_phrase(&self, phrase_id: &str) -> Result<Phrase> {
        let path = format!("{}/{}", paths::PHRASES, phrase_id);
        self.delete(&path).await
    }
}
