//! Text-to-speech voices.

use crate::client::{paths, RespeecherClient};
use crate::error::Result;
use crate::types::{CreateTtsRequest, Recording, VoiceResponse};
use reqwest::Method;

impl RespeecherClient {
    pub async fn fetch_tts_voices(&self) -> Result<VoiceResponse> {
        self.get(paths::TTS_VOICES).await
    }

    /// Synthesize `text` with `voice` as a new original take of a phrase.
    ///
    /// `voice` is the key the voice is listed under, see
    /// [`Voice::api_code`](crate::Voice::api_code).
    pub async fn create_tts(&self, phrase_id: &str, voice: &str, text: &str) -> Result<Recording> {
        let request = CreateTtsRequest {
            phrase_id: phrase_id.to_string(),
            text: text.to_string(),
            voice: voice.to_string(),
        };
        self.send_json(Method::POST, paths::TTS_CREATE, &request).await
    }
}
