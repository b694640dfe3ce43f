//! Desktop front-end for the video download service

// Preview image fetching
mod thumbnail;
// On-screen notification stack
mod toast;

use std::sync::{Arc, Mutex, PoisonError};

// eframe/egui for GUI application framework
use eframe::{App, Frame, egui};
use egui::{ColorImage, TextureOptions, Visuals};
// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use toast::ToastBoard;
use vidgrab::{
    Config, Controller, DownloadLauncher, HttpApi, NotificationQueue, Phase, Preview,
    SelectionState, SystemLauncher, quality_label,
};

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Runs a future on the global runtime.
fn spawn<F>(fut: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    match RUNTIME.get() {
        Some(rt) => {
            rt.spawn(fut);
        }
        None => tracing::error!("runtime not initialized"),
    }
}

fn init_tracing(config: &Config) {
    let default_level = if config.is_production() { "info" } else { "debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Program entry point: reads configuration, starts the runtime and launches the GUI
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    init_tracing(&config);
    tracing::info!(base = %config.api_base_url, "starting");

    let rt = Arc::new(Runtime::new()?);
    let api = Arc::new(HttpApi::new(&config)?);
    if RUNTIME.set(Arc::clone(&rt)).is_err() {
        tracing::warn!("runtime was already initialized");
    }

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Video Downloader",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(Visuals::dark());
            // The drain task is spawned onto the global runtime
            let _guard = rt.enter();
            let toasts = ToastBoard::new(cc.egui_ctx.clone());
            let queue = NotificationQueue::new(Arc::new(toasts.clone()));
            let controller = Controller::new(api, Arc::new(SystemLauncher), queue, config.api_base_url);
            Box::new(VideoApp::new(controller, toasts))
        }),
    )?;
    Ok(())
}

/// Application state for the GUI
struct VideoApp {
    /// Input field for the video URL
    url_input: String,
    controller: Controller,
    toasts: ToastBoard,
    /// Texture for the current preview, keyed by its image URL
    preview: Option<(String, egui::TextureHandle)>,
    /// Image URL most recently sent for fetching
    requested_image: Option<String>,
    /// Incoming thumbnail fetch results (image url, image)
    thumbnail_results: Arc<Mutex<Vec<(String, ColorImage)>>>,
}

impl VideoApp {
    fn new(controller: Controller, toasts: ToastBoard) -> Self {
        Self {
            url_input: String::new(),
            controller,
            toasts,
            preview: None,
            requested_image: None,
            thumbnail_results: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn submit(&self) {
        let controller = self.controller.clone();
        let url = self.url_input.clone();
        spawn(async move {
            let _ = controller.submit_url(&url).await;
        });
    }

    fn download(&self) {
        let controller = self.controller.clone();
        spawn(async move {
            let _ = controller.request_download().await;
        });
    }

    /// Starts a background fetch when the loaded video's preview image changed.
    fn refresh_preview(&mut self, ctx: &egui::Context, state: &SelectionState) {
        let wanted = state.session().and_then(|s| s.preview.image_url());
        if wanted == self.requested_image {
            return;
        }
        self.requested_image = wanted.clone();
        self.preview = None;

        let Some(image_url) = wanted else { return };
        let results = Arc::clone(&self.thumbnail_results);
        let ctx = ctx.clone();
        if let Some(rt) = RUNTIME.get() {
            rt.spawn_blocking(move || {
                if let Some(img) = thumbnail::fetch_thumbnail(&image_url) {
                    results
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((image_url, img));
                    ctx.request_repaint();
                }
            });
        }
    }

    fn preview_panel(&self, ui: &mut egui::Ui, state: &SelectionState) {
        let Some(session) = state.session() else {
            ui.label("Paste a video URL above to get started.");
            return;
        };
        if let Some(title) = &session.title {
            ui.label(egui::RichText::new(title).strong());
        }
        if let Some((_, tex)) = &self.preview {
            ui.add(egui::Image::new(tex).max_width(480.0).rounding(10.0));
        }
        if let Preview::Embed { .. } = session.preview {
            if let Some(embed) = session.preview.embed_url() {
                if ui.button("▶ Watch").clicked() {
                    if let Err(e) = SystemLauncher.launch(&embed) {
                        self.controller.notifier().error(format!("Could not open player: {e}"));
                    }
                }
            }
        }
    }

    fn quality_panel(&self, ui: &mut egui::Ui, state: &SelectionState) {
        let availability = state.availability();
        let selected = state.selected_quality();

        ui.label("Select download quality:");
        ui.horizontal_wrapped(|ui| {
            for (tier, available) in availability.tiers() {
                let mut button = egui::Button::new(quality_label(tier)).selected(selected == Some(tier));
                if !available {
                    button = button.fill(egui::Color32::from_gray(40));
                }
                let response = ui.add(button);
                let response = if available {
                    response
                } else {
                    response.on_hover_text("Not available for this video")
                };
                // Unavailable tiers still go through the controller so the user is told why.
                if response.clicked() {
                    let _ = self.controller.select_quality(tier);
                }
            }
        });

        let busy = state.is_busy();
        let label = if state.phase() == Phase::Downloading {
            "⏳ Processing..."
        } else {
            "⬇️ Download"
        };
        if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
            self.download();
        }
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for VideoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Handle completed thumbnail fetches; stale images are discarded
        {
            let mut pending = self
                .thumbnail_results
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            for (url, img) in pending.drain(..) {
                if self.requested_image.as_deref() == Some(url.as_str()) {
                    let tex = ctx.load_texture(&url, img, TextureOptions::default());
                    self.preview = Some((url, tex));
                }
            }
        }

        let state = self.controller.snapshot();
        self.refresh_preview(ctx, &state);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Video Downloader");

            ui.label("Paste video URL:");
            let busy = state.is_busy();
            ui.horizontal(|ui| {
                let field = ui.text_edit_singleline(&mut self.url_input);
                let enter = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let load_label = if state.phase() == Phase::Loading { "Loading..." } else { "Load" };
                let clicked = ui.add_enabled(!busy, egui::Button::new(load_label)).clicked();
                if (clicked || enter) && !busy {
                    self.submit();
                }
            });

            ui.separator();
            self.preview_panel(ui, &state);

            if state.session().is_some() {
                ui.separator();
                self.quality_panel(ui, &state);
            }
        });

        self.toasts.draw(ctx);

        // Request periodic repaint so phase changes from background tasks show up
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
