//! Application shell: header, tab bar, toasts and the blocking alert

use std::time::{Duration, Instant};

use egui::{Align2, Context, RichText};
use eudr_core::{Notification, Tab};

use crate::theme::{error_color, notification_color};
use crate::icons;

/// A notification with the moment it was raised
pub struct Toast {
    pub notification: Notification,
    pub raised_at: Instant,
}

/// Transient notifications, oldest first, each shown for a fixed lifetime
pub struct Toasts {
    items: Vec<Toast>,
    lifetime: Duration,
}

impl Toasts {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            items: Vec::new(),
            lifetime,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }

    pub fn push_at(&mut self, notification: Notification, raised_at: Instant) {
        tracing::debug!("Toast: {}", notification.message);
        self.items.push(Toast {
            notification,
            raised_at,
        });
    }

    /// Drop every toast older than the lifetime
    pub fn prune(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.items
            .retain(|toast| now.saturating_duration_since(toast.raised_at) < lifetime);
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    /// Draw the toast stack in the bottom-right corner
    pub fn show(&mut self, ctx: &Context) {
        self.prune(Instant::now());
        if self.items.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new("toasts")
            .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| {
                for (index, toast) in self.items.iter().enumerate() {
                    let color = notification_color(toast.notification.level);
                    egui::Frame::none()
                        .fill(color.linear_multiply(0.2))
                        .stroke(egui::Stroke::new(1.0, color))
                        .rounding(4.0)
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(&toast.notification.message);
                                if ui.small_button(icons::CLOSE).clicked() {
                                    dismissed = Some(index);
                                }
                            });
                        });
                    ui.add_space(4.0);
                }
            });

        if let Some(index) = dismissed {
            self.dismiss(index);
        }
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

/// Modal message box; closing it clears the message
pub fn show_alert(ctx: &Context, alert: &mut Option<String>) {
    let Some(message) = alert.as_ref() else {
        return;
    };

    let mut close = false;
    egui::Window::new("Notice")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(icons::WARNING).color(error_color()));
                ui.label(message);
            });
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                close = true;
            }
        });

    if close {
        *alert = None;
    }
}

/// Title strip above the tabs
pub fn header(ui: &mut egui::Ui, loaded: usize) {
    ui.horizontal(|ui| {
        ui.heading("EUDR Legal Restrictions");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(format!("{} restrictions loaded", loaded));
        });
    });
}

/// Table/Map switcher
pub fn tab_bar(ui: &mut egui::Ui, active: &mut Tab) {
    ui.horizontal(|ui| {
        ui.selectable_value(active, Tab::Table, format!("{} Table", icons::TABLE));
        ui.selectable_value(active, Tab::Map, format!("{} Map", icons::MAP));
    });
}
