use std::sync::mpsc;

use eframe::egui;

use crate::state::tree_model::{ModelEvent, ModelIndex, Node, PlotTreeModel};

/// Requests the tree view hands back to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeAction {
    SetVisible(ModelIndex, bool),
}

/// Checkable file/series tree. Reads the model only through its
/// navigation API and keeps the selection in step with structural changes.
pub struct PlotTreeView {
    selected: Option<ModelIndex>,
    events: mpsc::Receiver<ModelEvent>,
}

impl PlotTreeView {
    pub fn new(events: mpsc::Receiver<ModelEvent>) -> Self {
        Self {
            selected: None,
            events,
        }
    }

    pub fn selected(&self) -> Option<ModelIndex> {
        self.selected
    }

    /// Consume pending model notifications.
    pub fn sync(&mut self) {
        for event in self.events.try_iter() {
            match &event {
                ModelEvent::RowsAboutToBeInserted { parent, first, last } => {
                    tracing::trace!("Rows {first}..={last} about to be inserted under {parent:?}");
                }
                ModelEvent::RowsAboutToBeRemoved { parent, first, last } => {
                    tracing::trace!("Rows {first}..={last} about to be removed under {parent:?}");
                }
                ModelEvent::DataChanged(index) => tracing::trace!("Node {index:?} changed"),
                _ => {}
            }
            self.selected = adjust_selection(self.selected, &event);
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, model: &PlotTreeModel) -> Vec<TreeAction> {
        let mut actions = Vec::new();
        ui.label(egui::RichText::new(model.header()).strong());
        ui.separator();

        let file_count = model.row_count(ModelIndex::Root).unwrap_or(0);
        if file_count == 0 {
            ui.label(egui::RichText::new("No files loaded.").weak());
            return actions;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for file_row in 0..file_count {
                let Some(file) = model.index(file_row, ModelIndex::Root) else {
                    continue;
                };
                let Some(key) = file_key(model, file) else {
                    continue;
                };
                let id = ui.make_persistent_id(("plot_tree_file", key));
                egui::collapsing_header::CollapsingState::load_with_default_open(ui.ctx(), id, true)
                    .show_header(ui, |ui| self.node_row(ui, model, file, &mut actions))
                    .body(|ui| {
                        let child_count = model.row_count(file).unwrap_or(0);
                        for row in 0..child_count {
                            if let Some(child) = model.index(row, file) {
                                ui.horizontal(|ui| self.node_row(ui, model, child, &mut actions));
                            }
                        }
                    });
            }
        });
        actions
    }

    fn node_row(
        &mut self,
        ui: &mut egui::Ui,
        model: &PlotTreeModel,
        index: ModelIndex,
        actions: &mut Vec<TreeAction>,
    ) {
        let (Ok(text), Ok(mut checked)) = (model.display_text(index), model.is_checked(index)) else {
            return;
        };
        let (text, hover) = match model.node(index) {
            Ok(Node::File(file)) => (egui::RichText::new(text).strong(), file.path.display().to_string()),
            Ok(Node::Series(series)) => {
                let source = model
                    .parent(index)
                    .and_then(|file| model.display_text(file).ok())
                    .unwrap_or_default();
                let hover = format!("{} points from {source}", series.series.point_count());
                (egui::RichText::new(text).color(series.series.color32()), hover)
            }
            Err(_) => return,
        };

        if ui.checkbox(&mut checked, "").changed() {
            actions.push(TreeAction::SetVisible(index, checked));
        }
        let response = ui
            .selectable_label(self.selected == Some(index), text)
            .on_hover_text(hover);
        if response.clicked() {
            self.selected = Some(index);
        }
    }
}

/// Key for the expanded/collapsed state of a file row. It follows the file,
/// not its row, so removing an earlier file does not move the state.
fn file_key(model: &PlotTreeModel, index: ModelIndex) -> Option<u64> {
    if model.column_count(index) == 0 {
        return None;
    }
    match model.node(index) {
        Ok(Node::File(file)) => Some(file.id),
        _ => None,
    }
}

fn at_row(index: ModelIndex, row: usize) -> ModelIndex {
    match index {
        ModelIndex::Series { parent, .. } => ModelIndex::Series { parent, row },
        _ => ModelIndex::File { row },
    }
}

/// Where a selection ends up after the model reports `event`.
pub fn adjust_selection(selected: Option<ModelIndex>, event: &ModelEvent) -> Option<ModelIndex> {
    let current = selected?;
    match *event {
        ModelEvent::ModelAboutToBeReset | ModelEvent::ModelReset => None,
        ModelEvent::RowsRemoved { parent, first, last } => {
            let removed = last - first + 1;
            let shift = |row: usize| -> Option<usize> {
                if row < first {
                    Some(row)
                } else if row <= last {
                    None
                } else {
                    Some(row - removed)
                }
            };
            match current {
                _ if current.parent() == Some(parent) => {
                    shift(current.row()?).map(|row| at_row(current, row))
                }
                ModelIndex::Series { parent: file, row } if parent == ModelIndex::Root => {
                    shift(file).map(|file| ModelIndex::Series { parent: file, row })
                }
                _ => Some(current),
            }
        }
        ModelEvent::RowsInserted { parent, first, last } => {
            let inserted = last - first + 1;
            let shift = |row: usize| if row >= first { row + inserted } else { row };
            Some(match current {
                _ if current.parent() == Some(parent) => match current.row() {
                    Some(row) => at_row(current, shift(row)),
                    None => current,
                },
                ModelIndex::Series { parent: file, row } if parent == ModelIndex::Root => {
                    ModelIndex::Series { parent: shift(file), row }
                }
                _ => current,
            })
        }
        _ => Some(current),
    }
}
