//! Controller behaviour against a scripted backend.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use vidgrab::{
    ApiError, AppError, Controller, DownloadLauncher, DownloadTicket, Format, Notification,
    NotificationQueue, NotificationSink, Phase, Preview, Severity, VideoApi, VideoInfo,
};

const BASE: &str = "http://localhost:5000";
const RICK: &str = "https://youtu.be/dQw4w9WgXcQ";

#[derive(Default)]
struct ScriptedApi {
    infos: Mutex<VecDeque<Result<VideoInfo, ApiError>>>,
    downloads: Mutex<VecDeque<Result<DownloadTicket, ApiError>>>,
    info_calls: AtomicUsize,
    download_calls: AtomicUsize,
    /// When set, `fetch_info` signals `entered` and waits for `release`.
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
    /// Same for `request_download`.
    download_gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl ScriptedApi {
    fn push_info(&self, res: Result<VideoInfo, ApiError>) {
        self.infos.lock().unwrap().push_back(res);
    }

    fn push_download(&self, res: Result<DownloadTicket, ApiError>) {
        self.downloads.lock().unwrap().push_back(res);
    }
}

#[async_trait]
impl VideoApi for ScriptedApi {
    async fn fetch_info(&self, _url: &str) -> Result<VideoInfo, ApiError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        self.infos
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Remote("no scripted info".into())))
    }

    async fn request_download(&self, _url: &str, _quality: &str) -> Result<DownloadTicket, ApiError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((entered, release)) = &self.download_gate {
            entered.notify_one();
            release.notified().await;
        }
        self.downloads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Remote("no scripted download".into())))
    }
}

#[derive(Default)]
struct RecordingLauncher {
    launched: Mutex<Vec<String>>,
    fail: bool,
}

impl DownloadLauncher for RecordingLauncher {
    fn launch(&self, target_url: &str) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no opener"));
        }
        self.launched.lock().unwrap().push(target_url.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct Toasts {
    shown: Mutex<Vec<Notification>>,
}

impl Toasts {
    fn errors(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.severity == Severity::Error)
            .map(|n| n.message.clone())
            .collect()
    }

    fn all(&self) -> Vec<Notification> {
        self.shown.lock().unwrap().clone()
    }
}

impl NotificationSink for Toasts {
    fn show(&self, _id: u64, notification: &Notification) {
        self.shown.lock().unwrap().push(notification.clone());
    }

    fn dismiss(&self, _id: u64) {}
}

struct Harness {
    api: Arc<ScriptedApi>,
    launcher: Arc<RecordingLauncher>,
    toasts: Arc<Toasts>,
    controller: Controller,
}

fn harness_with(api: ScriptedApi, launcher: RecordingLauncher) -> Harness {
    let api = Arc::new(api);
    let launcher = Arc::new(launcher);
    let toasts = Arc::new(Toasts::default());
    let queue = NotificationQueue::with_timing(toasts.clone(), Duration::ZERO, Duration::from_millis(1));
    let controller = Controller::new(api.clone(), launcher.clone(), queue, BASE);
    Harness {
        api,
        launcher,
        toasts,
        controller,
    }
}

fn harness() -> Harness {
    harness_with(ScriptedApi::default(), RecordingLauncher::default())
}

fn info(qualities: &[&str]) -> VideoInfo {
    VideoInfo {
        formats: qualities.iter().map(|q| Format::new(*q)).collect(),
        ..Default::default()
    }
}

/// Lets the drain task deliver everything enqueued so far.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn loading_a_youtube_link() {
    let h = harness();
    h.api.push_info(Ok(info(&["720p", "480p"])));

    let session = h.controller.submit_url(RICK).await.unwrap();

    assert_eq!(h.controller.snapshot().phase(), Phase::Loaded);
    assert_eq!(session.preview, Preview::Embed { video_id: "dQw4w9WgXcQ".into() });
    let flags: Vec<_> = session.availability.tiers().collect();
    assert_eq!(
        flags,
        vec![
            ("2160p", false),
            ("1440p", false),
            ("1080p", false),
            ("720p", true),
            ("480p", true),
            ("audio", false),
        ]
    );

    settle().await;
    let shown = h.toasts.all();
    assert_eq!(shown[0], Notification::new("Loading video information...", Severity::Info));
    assert_eq!(shown[1].severity, Severity::Success);
}

#[tokio::test]
async fn empty_url_makes_no_request() {
    let h = harness();

    assert_eq!(h.controller.submit_url("").await, Err(AppError::Validation));

    assert_eq!(h.api.info_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.controller.snapshot().phase(), Phase::Idle);
    settle().await;
    assert_eq!(h.toasts.errors(), vec!["Please enter a video URL".to_string()]);
}

#[tokio::test]
async fn unavailable_quality_is_refused() {
    let h = harness();
    h.api.push_info(Ok(info(&["720p", "480p"])));
    h.controller.submit_url(RICK).await.unwrap();

    let res = h.controller.select_quality("1080p");

    assert_eq!(res, Err(AppError::Unavailable("1080p".into())));
    assert_eq!(h.controller.snapshot().selected_quality(), None);
    settle().await;
    assert_eq!(h.toasts.errors().len(), 1);
}

#[tokio::test]
async fn selecting_before_loading() {
    let h = harness();
    assert_eq!(h.controller.select_quality("720p"), Err(AppError::NotLoaded));
}

#[tokio::test]
async fn download_without_quality_makes_no_request() {
    let h = harness();
    h.api.push_info(Ok(info(&["720p"])));
    h.controller.submit_url(RICK).await.unwrap();

    assert_eq!(h.controller.request_download().await, Err(AppError::NoQualitySelected));
    assert_eq!(h.api.download_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.controller.snapshot().phase(), Phase::Loaded);
}

#[tokio::test]
async fn download_resolves_target_and_launches_it() {
    let h = harness();
    h.api.push_info(Ok(info(&["720p", "480p"])));
    h.api.push_download(Ok(DownloadTicket {
        download_path: "/files/video.mp4".into(),
    }));
    h.controller.submit_url(RICK).await.unwrap();
    h.controller.select_quality("720p").unwrap();

    let target = h.controller.request_download().await.unwrap();

    assert_eq!(target, "http://localhost:5000/files/video.mp4");
    assert_eq!(
        *h.launcher.launched.lock().unwrap(),
        vec!["http://localhost:5000/files/video.mp4".to_string()]
    );
    let state = h.controller.snapshot();
    assert_eq!(state.phase(), Phase::Loaded);
    assert_eq!(state.selected_quality(), Some("720p"));
}

#[tokio::test]
async fn failed_download_keeps_session_for_retry() {
    let h = harness();
    h.api.push_info(Ok(info(&["480p"])));
    h.api.push_download(Err(ApiError::Remote("Quality 480p not available".into())));
    h.api.push_download(Ok(DownloadTicket {
        download_path: "/api/download/abc.mp4".into(),
    }));
    h.controller.submit_url(RICK).await.unwrap();
    h.controller.select_quality("480p").unwrap();

    let first = h.controller.request_download().await;
    assert_eq!(first, Err(AppError::Remote("Quality 480p not available".into())));
    assert_eq!(h.controller.snapshot().phase(), Phase::Loaded);

    let second = h.controller.request_download().await.unwrap();
    assert_eq!(second, "http://localhost:5000/api/download/abc.mp4");
    assert_eq!(h.api.info_calls.load(Ordering::SeqCst), 1);

    settle().await;
    assert_eq!(h.toasts.errors(), vec!["Quality 480p not available".to_string()]);
}

#[tokio::test]
async fn launcher_failure_is_reported() {
    let h = harness_with(
        ScriptedApi::default(),
        RecordingLauncher {
            fail: true,
            ..Default::default()
        },
    );
    h.api.push_info(Ok(info(&["720p"])));
    h.api.push_download(Ok(DownloadTicket {
        download_path: "/files/a.mp4".into(),
    }));
    h.controller.submit_url(RICK).await.unwrap();
    h.controller.select_quality("720p").unwrap();

    let res = h.controller.request_download().await;

    assert!(matches!(res, Err(AppError::Launch(_))));
    assert_eq!(h.controller.snapshot().phase(), Phase::Loaded);
}

#[tokio::test]
async fn remote_error_on_first_load_returns_to_idle() {
    let h = harness();
    h.api.push_info(Err(ApiError::Remote("Unsupported URL".into())));

    let res = h.controller.submit_url("https://example.com/v").await;

    assert_eq!(res, Err(AppError::Remote("Unsupported URL".into())));
    let state = h.controller.snapshot();
    assert_eq!(state.phase(), Phase::Idle);
    assert!(state.session().is_none());
    settle().await;
    assert_eq!(h.toasts.errors(), vec!["Unsupported URL".to_string()]);
}

#[tokio::test]
async fn reload_replaces_formats_and_clears_selection() {
    let h = harness();
    h.api.push_info(Ok(info(&["1080p", "720p"])));
    h.api.push_info(Ok(VideoInfo {
        thumbnail: Some("https://cdn.example/t.jpg".into()),
        ..info(&["480p"])
    }));
    h.controller.submit_url(RICK).await.unwrap();
    h.controller.select_quality("1080p").unwrap();

    let session = h.controller.submit_url("https://vimeo.com/42").await.unwrap();

    assert_eq!(session.selected_quality, None);
    assert_eq!(session.preview, Preview::Thumbnail("https://cdn.example/t.jpg".into()));
    assert!(!session.availability.is_available("1080p"));
    assert_eq!(h.controller.select_quality("1080p"), Err(AppError::Unavailable("1080p".into())));
    assert!(h.controller.select_quality("480p").is_ok());
}

#[tokio::test]
async fn concurrent_submit_is_rejected_as_busy() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let api = ScriptedApi {
        gate: Some((entered.clone(), release.clone())),
        ..Default::default()
    };
    api.push_info(Ok(info(&["720p"])));
    let h = harness_with(api, RecordingLauncher::default());

    let first = {
        let controller = h.controller.clone();
        tokio::spawn(async move { controller.submit_url(RICK).await })
    };
    entered.notified().await;

    assert!(h.controller.snapshot().is_busy());
    assert_eq!(h.controller.submit_url(RICK).await, Err(AppError::Busy));
    assert_eq!(h.controller.request_download().await, Err(AppError::NoQualitySelected));

    release.notify_one();
    assert!(first.await.unwrap().is_ok());
    assert_eq!(h.api.info_calls.load(Ordering::SeqCst), 1);
    assert!(!h.controller.snapshot().is_busy());

    // The refused submit stays silent; only the missing quality is reported.
    settle().await;
    assert_eq!(h.toasts.errors(), vec!["Please select a download quality".to_string()]);
}

#[tokio::test]
async fn concurrent_download_is_rejected_as_busy() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let api = ScriptedApi {
        download_gate: Some((entered.clone(), release.clone())),
        ..Default::default()
    };
    api.push_info(Ok(info(&["720p"])));
    api.push_download(Ok(DownloadTicket {
        download_path: "/files/video.mp4".into(),
    }));
    let h = harness_with(api, RecordingLauncher::default());
    h.controller.submit_url(RICK).await.unwrap();
    h.controller.select_quality("720p").unwrap();

    let first = {
        let controller = h.controller.clone();
        tokio::spawn(async move { controller.request_download().await })
    };
    entered.notified().await;

    assert_eq!(h.controller.snapshot().phase(), Phase::Downloading);
    assert_eq!(h.controller.request_download().await, Err(AppError::Busy));
    assert_eq!(h.controller.submit_url(RICK).await, Err(AppError::Busy));
    assert_eq!(h.api.download_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.api.info_calls.load(Ordering::SeqCst), 1);

    release.notify_one();
    assert_eq!(first.await.unwrap(), Ok("http://localhost:5000/files/video.mp4".to_string()));
    assert_eq!(h.api.download_calls.load(Ordering::SeqCst), 1);
    let state = h.controller.snapshot();
    assert_eq!(state.phase(), Phase::Loaded);
    assert_eq!(state.selected_quality(), Some("720p"));

    settle().await;
    assert!(h.toasts.errors().is_empty());
}
