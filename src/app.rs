use std::path::PathBuf;

use eframe::egui;

use crate::controller::PlotController;
use crate::state::settings::Settings;
use crate::ui::message_dialog::MessageDialog;
use crate::ui::plot_tree_view::{PlotTreeView, TreeAction};

/// The main JustPlot window.
pub struct JustPlotApp {
    controller: PlotController,
    tree_view: PlotTreeView,
    settings: Settings,
    messages: MessageDialog,
}

impl JustPlotApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, files: Vec<PathBuf>) -> Self {
        tracing::info!("Main window initialization");

        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.5));
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        ctx.set_style(style);

        let mut controller = PlotController::new(settings.delimiter());
        let tree_view = PlotTreeView::new(controller.subscribe());
        let mut app = Self {
            controller,
            tree_view,
            settings,
            messages: MessageDialog::default(),
        };
        app.open_files(&files);
        app
    }

    /// Ask for one or more files, starting in the last used directory.
    fn add_plot_dialog(&mut self) {
        tracing::info!("Show open file dialog");
        let mut dialog = rfd::FileDialog::new()
            .set_title("Open file")
            .add_filter("All Files", &["*"]);
        if let Some(dir) = &self.settings.last_dir {
            dialog = dialog.set_directory(dir);
        }
        if let Some(paths) = dialog.pick_files() {
            if let Some(first) = paths.first() {
                self.settings.remember_dir_of(first);
            }
            self.open_files(&paths);
        }
    }

    fn open_files(&mut self, paths: &[PathBuf]) {
        for (_, err) in self.controller.load_files(paths) {
            self.messages.push(&err);
        }
    }

    fn delete_selected(&mut self) {
        let Some(index) = self.tree_view.selected() else {
            return;
        };
        if let Err(e) = self.controller.delete_node(index) {
            tracing::error!("Delete failed: {e}");
            self.messages.push(&e);
        }
    }

    fn apply_tree_actions(&mut self, actions: Vec<TreeAction>) {
        for action in actions {
            match action {
                TreeAction::SetVisible(index, visible) => {
                    if let Err(e) = self.controller.set_visible(index, visible) {
                        tracing::error!("Visibility change failed: {e}");
                        self.messages.push(&e);
                    }
                }
            }
        }
    }
}

impl eframe::App for JustPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tree_view.sync();

        // Collect dropped paths first to avoid borrow issues.
        let dropped_paths: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if !dropped_paths.is_empty() {
            tracing::info!("{} file(s) dropped onto the window", dropped_paths.len());
            self.open_files(&dropped_paths);
        }

        let mut add_plot = false;
        let mut delete_plot = false;
        let mut delete_all = false;
        egui::TopBottomPanel::top("toolbar")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(12, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Add plot").on_hover_text("Open one or more data files").clicked() {
                        add_plot = true;
                    }
                    let has_selection = self.tree_view.selected().is_some();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete plot"))
                        .on_hover_text("Remove the selected file or series")
                        .clicked()
                    {
                        delete_plot = true;
                    }
                    let delete_all_btn = egui::Button::new(
                        egui::RichText::new("Delete all").color(egui::Color32::from_rgb(220, 60, 60)),
                    );
                    if ui
                        .add_enabled(!self.controller.model().is_empty(), delete_all_btn)
                        .clicked()
                    {
                        delete_all = true;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.small(format!("v{}", env!("CARGO_PKG_VERSION")));
                    });
                });
            });

        let actions = egui::SidePanel::left("plot_tree")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| self.tree_view.show(ui, self.controller.model()))
            .inner;

        egui::CentralPanel::default().show(ctx, |ui| {
            self.controller.surface().show(ui);
        });

        self.messages.show(ctx);

        self.apply_tree_actions(actions);
        if add_plot {
            self.add_plot_dialog();
        }
        if delete_plot {
            self.delete_selected();
        }
        if delete_all {
            self.controller.delete_all();
        }
        self.tree_view.sync();
    }
}
