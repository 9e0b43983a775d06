use std::collections::VecDeque;

use eframe::egui;

use crate::error::PlotError;
use crate::state::tree_model::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Warning,
    Error,
}

/// One message box: headline, optional detail text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
    pub details: Option<String>,
}

impl From<&PlotError> for Message {
    fn from(err: &PlotError) -> Self {
        Self {
            level: MessageLevel::Warning,
            text: err.summary(),
            details: err.details(),
        }
    }
}

impl From<&ModelError> for Message {
    fn from(err: &ModelError) -> Self {
        Self {
            level: MessageLevel::Error,
            text: "Internal error in the plot tree".to_string(),
            details: Some(err.to_string()),
        }
    }
}

/// Queue of modal messages, shown one at a time.
#[derive(Debug, Default)]
pub struct MessageDialog {
    queue: VecDeque<Message>,
}

impl MessageDialog {
    pub fn push(&mut self, message: impl Into<Message>) {
        self.queue.push_back(message.into());
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let Some(message) = self.queue.front() else {
            return;
        };

        let mut ok = false;
        let response = egui::Modal::new(egui::Id::new("message_dialog")).show(ctx, |ui| {
            ui.set_max_width(420.0);
            ui.heading("JustPlot");
            ui.add_space(6.0);
            let color = match message.level {
                MessageLevel::Warning => egui::Color32::from_rgb(230, 160, 40),
                MessageLevel::Error => egui::Color32::from_rgb(255, 80, 80),
            };
            ui.colored_label(color, &message.text);
            if let Some(details) = &message.details {
                ui.collapsing("Details", |ui| {
                    ui.monospace(details);
                });
            }
            ui.separator();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("OK").clicked() {
                    ok = true;
                }
            });
        });

        if ok || response.should_close() {
            self.queue.pop_front();
        }
    }
}
