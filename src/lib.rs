//! Client core for a video download front-end: a rate-limited notification
//! queue, the quality-selection state machine and the backend API client.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod launcher;
pub mod model;
pub mod notify;
pub mod preview;
pub mod quality;
pub mod session;

pub use api::{HttpApi, VideoApi, resolve_download_target};
pub use config::{Config, Deployment};
pub use controller::Controller;
pub use error::{ApiError, AppError};
pub use launcher::{DownloadLauncher, SystemLauncher};
pub use model::{DownloadTicket, Format, Notification, Severity, VideoInfo};
pub use notify::{NotificationQueue, NotificationSink};
pub use preview::{Preview, extract_youtube_id};
pub use quality::{Availability, QUALITY_TIERS, derive_availability, quality_label};
pub use session::{Phase, SelectionState, VideoSession};
