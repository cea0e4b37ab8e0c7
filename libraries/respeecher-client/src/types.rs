//! Types for Respeecher API requests and responses.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

/// The account behind the current session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub verified: bool,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// Response from successful login.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub csrf_token: String,
}

// =============================================================================
// Project & Phrase Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Project {
    pub id: String,
    pub active: bool,
    pub created_at: String,
    pub slug: String,
    pub owner: String,
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProjectRequest {
    pub name: String,
}

/// Query for listing projects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// A line of text recorded within a project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Phrase {
    pub id: String,
    pub project_id: String,
    pub text: String,
    pub active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePhraseRequest {
    pub project_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePhraseRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhraseFilter {
    pub project_id: String,
}

// =============================================================================
// Model Types
// =============================================================================

/// A tunable parameter of a voice model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelParam {
    pub id: String,
    pub alias: String,
    pub locked: Option<String>,
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(rename = "default")]
    pub default_value: String,
    pub worker_id: String,
}

/// A parameter value sent along with a conversion order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParamValue {
    pub id: String,
    pub name: String,
    pub value: String,
}

/// A target voice the original recordings can be converted to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub visibility: String,
    pub m2o: bool,
    pub date_created: String,
    #[serde(default)]
    pub params: Vec<ModelParam>,
}

impl Model {
    /// Every parameter at its default value.
    pub fn default_params(&self) -> Vec<ParamValue> {
        self.params
            .iter()
            .map(|p| ParamValue {
                id: p.id.clone(),
                name: p.alias.clone(),
                value: p.default_value.clone(),
            })
            .collect()
    }

    /// Preview audio URL under `base`.
    ///
    /// The file name is derived from the display name: `"Aaron"` becomes
    /// `aaron_d.wav`, `"Plyukh (Dog)"` becomes `dog-plyukh_d.wav`.
    pub fn preview_url(&self, base: &str) -> String {
        format!("{}{}_d.wav", base, preview_slug(&self.name))
    }
}

fn preview_slug(name: &str) -> String {
    let name = name.trim();
    let slug = match (name.find('('), name.ends_with(')')) {
        (Some(open), true) => {
            let base = name[..open].trim();
            let kind = name[open + 1..name.len() - 1].trim();
            if kind.is_empty() {
                base.to_string()
            } else {
                format!("{}-{}", kind, base)
            }
        }
        _ => name.to_string(),
    };

    slug.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// One target model of a conversion order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderModel {
    pub id: String,
    pub name: String,
    pub params: Vec<ParamValue>,
}

/// Request body for converting an original recording.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOrderRequest {
    pub original_id: String,
    pub models: Vec<OrderModel>,
}

// =============================================================================
// Recording Types
// =============================================================================

/// An original take or the result of a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Recording {
    pub id: String,
    pub phrase_id: String,
    #[serde(rename = "type")]
    pub recording_type: String,
    pub url: Option<String>,
    pub name: String,
    pub take_number: i64,
    pub state: String,
    pub original_id: Option<String>,
    pub model_id: Option<String>,
    pub model_name: Option<String>,
    pub microphone: String,
    pub size: i64,
    pub starred: bool,
    pub error: String,
    pub created_at: String,
    pub converted_at: Option<String>,
    pub tts: bool,
    pub tts_voice: Option<String>,
    pub text: Option<String>,
}

impl Recording {
    pub fn is_original(&self) -> bool {
        self.recording_type == "original"
    }

    /// Label including conversion state, for lists.
    pub fn display_name(&self) -> String {
        if self.is_original() {
            return self.original_label();
        }
        let status = if self.converted_at.is_some() {
            "Completed"
        } else {
            "In progress"
        };
        format!(
            "#Take {}, Model: {} ({})",
            self.take_number,
            self.model_name.as_deref().unwrap_or("Unknown"),
            status
        )
    }

    /// Label used when exporting the file.
    pub fn export_name(&self) -> String {
        if self.is_original() {
            return self.original_label();
        }
        format!(
            "#Take {}, Model: {}",
            self.take_number,
            self.model_name.as_deref().unwrap_or("Unknown")
        )
    }

    fn original_label(&self) -> String {
        let label = format!("#Take {} (original)", self.take_number);
        if self.tts {
            format!(
                "{} - (tts: '{}')",
                label,
                self.text.as_deref().unwrap_or("Unknown")
            )
        } else {
            label
        }
    }

    /// Last path segment of the download URL.
    pub fn file_name(&self) -> Option<String> {
        let url = url::Url::parse(self.url.as_deref()?).ok()?;
        url.path_segments()?
            .rfind(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Where a download of this recording lands inside `dir`.
    pub fn local_path(&self, dir: &Path) -> Option<PathBuf> {
        self.file_name().map(|name| dir.join(name))
    }

    pub fn file_exists(&self, dir: &Path) -> bool {
        self.local_path(dir).is_some_and(|p| p.exists())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordingFilter {
    pub phrase_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateRecordingRequest {
    pub starred: bool,
}

// =============================================================================
// Calibration Types
// =============================================================================

/// A calibration sample uploaded for a model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Calibration {
    pub id: String,
    pub model_id: String,
    pub name: String,
    pub state: String,
    pub url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalibrationFilter {
    pub model_id: String,
}

// =============================================================================
// TTS Types
// =============================================================================

/// A text-to-speech voice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Voice {
    pub code: String,
    pub name: String,
    pub gender: String,
    /// Key the server lists this voice under
    #[serde(skip)]
    pub api_code: Option<String>,
}

impl Voice {
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.name, self.gender)
    }
}

/// Voices returned by the TTS voice endpoint.
///
/// The server sends `{"voices": {"<key>": {...}}}`; the keys end up in
/// [`Voice::api_code`], ordered by key.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceResponse {
    pub voices: Vec<Voice>,
}

impl<'de> Deserialize<'de> for VoiceResponse {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            voices: BTreeMap<String, Voice>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let voices = raw
            .voices
            .into_iter()
            .map(|(key, mut voice)| {
                voice.api_code = Some(key);
                voice
            })
            .collect();

        Ok(VoiceResponse { voices })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTtsRequest {
    pub phrase_id: String,
    pub text: String,
    pub voice: String,
}

// =============================================================================
// Pagination
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
}

/// A page of results.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    pub list: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// List endpoints answer with either a bare array or a [`Page`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Items(Vec<T>),
    Paged(Page<T>),
}

impl<T> Listing<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            Listing::Items(items) => items,
            Listing::Paged(page) => page.list,
        }
    }
}

// =============================================================================
// Upload & Download Types
// =============================================================================

/// File extensions the API accepts for audio uploads.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "ogg", "mp3", "flac"];

/// An audio file to upload.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl AudioUpload {
    /// Wrap bytes, deriving the MIME type from the file extension.
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_type_for_file(Path::new(&file_name)).to_string();
        Self {
            file_name,
            mime_type,
            data,
        }
    }

    /// Read an audio file from disk.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("recording.wav")
            .to_string();
        Ok(Self::new(file_name, data))
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn is_supported(&self) -> bool {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
    }
}

/// Get MIME type for an audio file.
pub(crate) fn mime_type_for_file(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") => "audio/ogg",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Generic error body: `{"detail": "..."}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// One segment of the path to an invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LocSegment {
    Field(String),
    Index(u64),
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationError {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

/// Body of a 422 response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationErrorResponse {
    pub detail: Vec<ValidationError>,
}
