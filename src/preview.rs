//! Picks how a loaded video is previewed.

use once_cell::sync::Lazy;
use regex::Regex;

static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("YouTube id pattern is valid")
});

/// Extracts the 11-character video id from a YouTube link.
///
/// Accepts the long form (`watch?v=<id>`), embed/`/v/` links and the short
/// `youtu.be/<id>` form. Returns `None` for anything else.
pub fn extract_youtube_id(url: &str) -> Option<String> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Recognized YouTube video, shown through the platform's player.
    Embed { video_id: String },
    /// Still image supplied by the service.
    Thumbnail(String),
    None,
}

impl Preview {
    pub fn for_video(url: &str, thumbnail: Option<&str>) -> Self {
        if let Some(video_id) = extract_youtube_id(url) {
            return Preview::Embed { video_id };
        }
        match thumbnail {
            Some(t) if !t.trim().is_empty() => Preview::Thumbnail(t.to_string()),
            _ => Preview::None,
        }
    }

    pub fn embed_url(&self) -> Option<String> {
        match self {
            Preview::Embed { video_id } => Some(format!("https://www.youtube.com/embed/{video_id}")),
            _ => None,
        }
    }

    /// Image to draw for this preview, if any.
    pub fn image_url(&self) -> Option<String> {
        match self {
            Preview::Embed { video_id } => {
                Some(format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg"))
            }
            Preview::Thumbnail(url) => Some(url.clone()),
            Preview::None => None,
        }
    }
}
