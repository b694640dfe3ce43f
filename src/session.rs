//! Selection state: which video is loaded, which quality is picked, and
//! whether a request is in flight.
//!
//! Everything here is synchronous and owned; the async [`Controller`]
//! drives these transitions around the network calls.
//!
//! [`Controller`]: crate::controller::Controller

use crate::error::AppError;
use crate::model::{Format, VideoInfo};
use crate::preview::Preview;
use crate::quality::{Availability, derive_availability};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Downloading,
}

/// One loaded video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSession {
    pub source_url: String,
    pub formats: Vec<Format>,
    pub selected_quality: Option<String>,
    pub availability: Availability,
    pub preview: Preview,
    pub title: Option<String>,
}

impl VideoSession {
    fn from_info(source_url: String, info: VideoInfo) -> Self {
        let availability = derive_availability(&info.formats);
        let preview = Preview::for_video(&source_url, info.thumbnail());
        Self {
            source_url,
            availability,
            preview,
            title: info.title.filter(|t| !t.trim().is_empty()),
            formats: info.formats,
            selected_quality: None,
        }
    }

    /// Membership in this video's format list.
    pub fn offers(&self, quality: &str) -> bool {
        self.formats.iter().any(|f| f.quality == quality)
    }
}

/// What a download needs; taken from the state when the download starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub quality: String,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    phase: Phase,
    session: Option<VideoSession>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&VideoSession> {
        self.session.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::Downloading)
    }

    pub fn selected_quality(&self) -> Option<&str> {
        self.session.as_ref()?.selected_quality.as_deref()
    }

    /// Availability of the loaded video; nothing is available before a load.
    pub fn availability(&self) -> Availability {
        self.session
            .as_ref()
            .map(|s| s.availability.clone())
            .unwrap_or_default()
    }

    /// Validates the URL and enters `Loading`. Returns the trimmed URL.
    pub fn begin_load(&mut self, url: &str) -> Result<String, AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::Validation);
        }
        if self.is_busy() {
            return Err(AppError::Busy);
        }
        self.phase = Phase::Loading;
        Ok(url.to_string())
    }

    /// Settles a load started by [`begin_load`](Self::begin_load).
    ///
    /// On failure the previous session (if any) is kept untouched. Outside
    /// `Loading` nothing changes and `Busy` is returned.
    pub fn finish_load(
        &mut self,
        url: String,
        outcome: Result<VideoInfo, AppError>,
    ) -> Result<&VideoSession, AppError> {
        if self.phase != Phase::Loading {
            return Err(AppError::Busy);
        }
        match outcome {
            Ok(info) => {
                self.phase = Phase::Loaded;
                Ok(self.session.insert(VideoSession::from_info(url, info)))
            }
            Err(err) => {
                self.phase = self.stable_phase();
                Err(err)
            }
        }
    }

    pub fn select_quality(&mut self, quality: &str) -> Result<(), AppError> {
        if matches!(self.phase, Phase::Idle | Phase::Loading) {
            return Err(AppError::NotLoaded);
        }
        let session = self.session.as_mut().ok_or(AppError::NotLoaded)?;
        if !session.offers(quality) {
            return Err(AppError::Unavailable(quality.to_string()));
        }
        session.selected_quality = Some(quality.to_string());
        Ok(())
    }

    /// Checks every download precondition and enters `Downloading`.
    pub fn begin_download(&mut self) -> Result<DownloadRequest, AppError> {
        let session = self.session.as_ref();
        let quality = session
            .and_then(|s| s.selected_quality.clone())
            .ok_or(AppError::NoQualitySelected)?;
        let url = session
            .map(|s| s.source_url.clone())
            .filter(|u| !u.trim().is_empty())
            .ok_or(AppError::NoVideo)?;
        if self.phase != Phase::Loaded {
            return Err(AppError::Busy);
        }
        if !session.is_some_and(|s| s.offers(&quality)) {
            return Err(AppError::Unavailable(quality));
        }
        self.phase = Phase::Downloading;
        Ok(DownloadRequest { url, quality })
    }

    /// Leaves `Downloading`; selection and formats stay as they were.
    pub fn finish_download(&mut self) {
        if self.phase == Phase::Downloading {
            self.phase = self.stable_phase();
        }
    }

    fn stable_phase(&self) -> Phase {
        if self.session.is_some() {
            Phase::Loaded
        } else {
            Phase::Idle
        }
    }
}
