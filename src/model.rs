use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One downloadable variant offered by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Format {
    /// Quality tier identifier (e.g. "720p", "audio")
    pub quality: String,
    /// Everything else the service reports for this variant, kept opaque
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Format {
    pub fn new(quality: impl Into<String>) -> Self {
        Self {
            quality: quality.into(),
            metadata: Map::new(),
        }
    }

    /// Container extension, when the service reports one
    pub fn ext(&self) -> Option<&str> {
        self.metadata
            .get("ext")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Successful answer of the video-info lookup
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub formats: Vec<Format>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub extractor: Option<String>,
}

impl VideoInfo {
    /// Thumbnail URL, ignoring the empty string the service sends when it has none
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Successful answer of the download trigger
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadTicket {
    /// Server-relative path of the prepared file
    pub download_path: String,
}

/// How a notification is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A short-lived status message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}
