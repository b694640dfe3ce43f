use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::{VideoApi, resolve_download_target};
use crate::error::AppError;
use crate::launcher::DownloadLauncher;
use crate::notify::NotificationQueue;
use crate::session::{SelectionState, VideoSession};

/// Runs user actions against the selection state.
///
/// Every failure is reported as exactly one error notification before it
/// is returned, and the state is back in a stable phase by then. An action
/// refused with [`AppError::Busy`] is a silent no-op: the outstanding
/// request keeps the user informed. The state
/// lock is only held for the synchronous transitions, never across a
/// network call.
#[derive(Clone)]
pub struct Controller {
    state: Arc<Mutex<SelectionState>>,
    api: Arc<dyn VideoApi>,
    launcher: Arc<dyn DownloadLauncher>,
    notifier: NotificationQueue,
    base_url: String,
}

impl Controller {
    pub fn new(
        api: Arc<dyn VideoApi>,
        launcher: Arc<dyn DownloadLauncher>,
        notifier: NotificationQueue,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SelectionState::new())),
            api,
            launcher,
            notifier,
            base_url: base_url.into(),
        }
    }

    fn state(&self) -> MutexGuard<'_, SelectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state, for rendering.
    pub fn snapshot(&self) -> SelectionState {
        self.state().clone()
    }

    pub fn notifier(&self) -> &NotificationQueue {
        &self.notifier
    }

    fn fail<T>(&self, err: AppError) -> Result<T, AppError> {
        if err == AppError::Busy {
            tracing::debug!("action ignored, a request is still in flight");
        } else {
            tracing::warn!(error = %err, "action failed");
            self.notifier.error(err.to_string());
        }
        Err(err)
    }

    /// Looks up a video and makes it the current session.
    pub async fn submit_url(&self, url: &str) -> Result<VideoSession, AppError> {
        let begun = self.state().begin_load(url);
        let url = match begun {
            Ok(url) => url,
            Err(err) => return self.fail(err),
        };

        tracing::info!(%url, "loading video information");
        self.notifier.info("Loading video information...");
        let outcome = self.api.fetch_info(&url).await.map_err(AppError::from);

        let settled = self
            .state()
            .finish_load(url, outcome)
            .cloned();
        match settled {
            Ok(session) => {
                tracing::info!(
                    formats = session.formats.len(),
                    available = session.availability.available_count(),
                    "video loaded"
                );
                self.notifier
                    .success("Video loaded successfully! Select download quality below.");
                Ok(session)
            }
            Err(err) => self.fail(err),
        }
    }

    pub fn select_quality(&self, quality: &str) -> Result<(), AppError> {
        let selected = self.state().select_quality(quality);
        match selected {
            Ok(()) => {
                tracing::debug!(%quality, "quality selected");
                self.notifier.success(format!("Selected quality: {quality}"));
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Asks the service to prepare the file, then hands its URL to the launcher.
    ///
    /// Returns the resolved download target.
    pub async fn request_download(&self) -> Result<String, AppError> {
        let begun = self.state().begin_download();
        let request = match begun {
            Ok(request) => request,
            Err(err) => return self.fail(err),
        };

        tracing::info!(url = %request.url, quality = %request.quality, "requesting download");
        self.notifier.info("Starting download...");
        let outcome = self
            .api
            .request_download(&request.url, &request.quality)
            .await
            .map_err(AppError::from)
            .and_then(|ticket| {
                let target = resolve_download_target(&self.base_url, &ticket.download_path);
                self.launcher
                    .launch(&target)
                    .map_err(|e| AppError::Launch(e.to_string()))?;
                Ok(target)
            });

        self.state().finish_download();
        match outcome {
            Ok(target) => {
                self.notifier
                    .success("Download started! Your file will be saved shortly.");
                Ok(target)
            }
            Err(err) => self.fail(err),
        }
    }
}
