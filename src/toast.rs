use std::sync::{Arc, Mutex, PoisonError};

use eframe::egui;
use vidgrab::{Notification, NotificationSink, Severity};

/// Notifications currently on screen, fed by the queue's drain task.
#[derive(Clone)]
pub struct ToastBoard {
    visible: Arc<Mutex<Vec<(u64, Notification)>>>,
    ctx: egui::Context,
}

impl ToastBoard {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            visible: Arc::new(Mutex::new(Vec::new())),
            ctx,
        }
    }

    pub fn visible(&self) -> Vec<(u64, Notification)> {
        self.visible
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Draws the stack in the top-right corner.
    pub fn draw(&self, ctx: &egui::Context) {
        let toasts = self.visible();
        if toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_TOP, [-20.0, 20.0])
            .show(ctx, |ui| {
                for (_, toast) in &toasts {
                    egui::Frame::popup(ui.style())
                        .fill(severity_color(toast.severity))
                        .rounding(10.0)
                        .inner_margin(egui::Margin::symmetric(25.0, 15.0))
                        .show(ui, |ui| {
                            ui.colored_label(egui::Color32::WHITE, toast.message.as_str());
                        });
                    ui.add_space(6.0);
                }
            });
    }
}

fn severity_color(severity: Severity) -> egui::Color32 {
    match severity {
        Severity::Error => egui::Color32::from_rgb(0xff, 0x41, 0x6c),
        Severity::Success => egui::Color32::from_rgb(0x00, 0xb0, 0x9b),
        Severity::Info => egui::Color32::from_rgb(0x00, 0x72, 0xff),
    }
}

impl NotificationSink for ToastBoard {
    fn show(&self, id: u64, notification: &Notification) {
        self.visible
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, notification.clone()));
        self.ctx.request_repaint();
    }

    fn dismiss(&self, id: u64) {
        self.visible
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(shown, _)| *shown != id);
        self.ctx.request_repaint();
    }
}
