use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};

use crate::data::loader::{self, Delimiter};
use crate::error::PlotError;
use crate::render::plot_surface::PlotSurface;
use crate::state::color_cycler::ColorCycler;
use crate::state::file_plot::FilePlot;
use crate::state::tree_model::{ModelError, ModelEvent, ModelIndex, PlotTreeModel};

/// Ties the plot tree to the plot surface: loads files, forwards user
/// actions to the model and replays model events onto the surface.
pub struct PlotController {
    model: PlotTreeModel,
    events: mpsc::Receiver<ModelEvent>,
    colors: ColorCycler,
    surface: PlotSurface,
    delimiter: Delimiter,
}

impl PlotController {
    pub fn new(delimiter: Delimiter) -> Self {
        let mut model = PlotTreeModel::new();
        let events = model.subscribe();
        Self {
            model,
            events,
            colors: ColorCycler::new(),
            surface: PlotSurface::new(),
            delimiter,
        }
    }

    pub fn model(&self) -> &PlotTreeModel {
        &self.model
    }

    pub fn surface(&self) -> &PlotSurface {
        &self.surface
    }

    /// Extra observer of the plot tree, e.g. a view tracking its selection.
    pub fn subscribe(&mut self) -> mpsc::Receiver<ModelEvent> {
        self.model.subscribe()
    }

    /// Parse `path` and plot every data column. Nothing is added to the tree
    /// or the surface unless the whole file loads.
    pub fn load_file(&mut self, path: &Path) -> Result<ModelIndex, PlotError> {
        tracing::info!("Loading file {}", path.display());
        let table = loader::load_table(path, self.delimiter)?;
        let plot = FilePlot::from_table(path, &table, &mut self.colors)?;
        for series in &plot.series {
            self.surface.add(Arc::clone(series));
        }
        let index = self.model.add_file(plot);
        self.sync();
        Ok(index)
    }

    /// Load several files. A failing file is reported and skipped so the
    /// rest still load.
    pub fn load_files(&mut self, paths: &[PathBuf]) -> Vec<(PathBuf, PlotError)> {
        let mut failures = Vec::new();
        for path in paths {
            if let Err(e) = self.load_file(path) {
                tracing::error!("Failed to load {}: {e}", path.display());
                failures.push((path.clone(), e));
            }
        }
        failures
    }

    pub fn delete_node(&mut self, index: ModelIndex) -> Result<(), ModelError> {
        let result = self.model.delete_node(index);
        self.sync();
        result
    }

    pub fn delete_all(&mut self) {
        self.model.delete_all();
        self.sync();
    }

    pub fn set_visible(&mut self, index: ModelIndex, visible: bool) -> Result<(), ModelError> {
        let result = self.model.set_visible(index, visible);
        self.sync();
        result
    }

    /// Apply pending model events to the plot surface.
    fn sync(&mut self) {
        for event in self.events.try_iter() {
            self.surface.apply(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::temp_file;
    use crate::state::color_cycler::COLOR_PALETTE;

    fn hidden_count(events: &[ModelEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, ModelEvent::VisibilityChanged(v) if !v.is_visible))
            .count()
    }

    #[test]
    fn three_column_file_gives_two_colored_series() {
        let mut controller = PlotController::new(Delimiter::Whitespace);
        let path = temp_file("tab.dat", "t a b\n0 1 2\n1 2 3\n2 3 4\n");
        let index = controller.load_file(&path).unwrap();

        assert_eq!(index, ModelIndex::File { row: 0 });
        let file = &controller.model().files()[0];
        let labels: Vec<_> = file.children.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(labels, vec!["a(t)", "b(t)"]);
        assert!(file.children.iter().all(|c| c.series.point_count() == 3));
        assert_eq!(file.children[0].series.color, COLOR_PALETTE[0]);
        assert_eq!(file.children[1].series.color, COLOR_PALETTE[1]);
        assert_eq!(controller.surface().curves().len(), 2);
    }

    #[test]
    fn single_column_file_changes_nothing() {
        let mut controller = PlotController::new(Delimiter::Whitespace);
        let events = controller.subscribe();
        let path = temp_file("one.dat", "t\n0\n1\n");

        let err = controller.load_file(&path).unwrap_err();
        assert!(err.to_string().contains("need at least an X and one Y column"));
        assert!(controller.model().is_empty());
        assert!(controller.surface().curves().is_empty());
        assert_eq!(events.try_iter().count(), 0);
    }

    #[test]
    fn one_bad_file_does_not_stop_the_rest() {
        let mut controller = PlotController::new(Delimiter::Byte(b','));
        let good = temp_file("good.csv", "x,y\n1,2\n");
        let missing = std::env::temp_dir().join("justplot-missing.csv");
        let also_good = temp_file("also_good.csv", "x,y,z\n1,2,3\n");

        let failures = controller.load_files(&[good, missing.clone(), also_good]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, missing);
        assert!(matches!(failures[0].1, PlotError::MissingFile(_)));
        assert_eq!(controller.model().file_count(), 2);
        assert_eq!(controller.surface().curves().len(), 3);
    }

    #[test]
    fn deleting_first_of_two_files() {
        let mut controller = PlotController::new(Delimiter::Whitespace);
        let f1 = temp_file("f1.dat", "t a b\n0 1 2\n");
        let f2 = temp_file("f2.dat", "t c\n0 5\n");
        controller.load_file(&f1).unwrap();
        controller.load_file(&f2).unwrap();
        let events = controller.subscribe();

        controller.delete_node(ModelIndex::File { row: 0 }).unwrap();

        let events: Vec<_> = events.try_iter().collect();
        assert_eq!(hidden_count(&events), 2);
        let model = controller.model();
        assert_eq!(model.file_count(), 1);
        assert_eq!(model.display_text(ModelIndex::File { row: 0 }).unwrap(), "f2.dat");
        assert_eq!(model.row_count(ModelIndex::File { row: 0 }), Ok(1));
        let shown: Vec<_> = controller.surface().curves().iter().map(|s| s.label.clone()).collect();
        assert_eq!(shown, vec!["c(t)"]);
    }

    #[test]
    fn unchecking_a_file_hides_its_curves() {
        let mut controller = PlotController::new(Delimiter::Whitespace);
        let path = temp_file("vis.dat", "t a b\n0 1 2\n");
        controller.load_file(&path).unwrap();
        let file = ModelIndex::File { row: 0 };

        controller.set_visible(file, false).unwrap();
        assert!(controller.surface().curves().is_empty());
        controller.set_visible(ModelIndex::Series { parent: 0, row: 1 }, true).unwrap();
        assert_eq!(controller.surface().curves()[0].label, "b(t)");
        controller.set_visible(file, true).unwrap();
        assert_eq!(controller.surface().curves().len(), 2);
    }

    #[test]
    fn delete_all_clears_the_surface() {
        let mut controller = PlotController::new(Delimiter::Whitespace);
        controller.load_file(&temp_file("x.dat", "t a\n0 1\n")).unwrap();
        controller.load_file(&temp_file("y.dat", "t a b\n0 1 2\n")).unwrap();

        controller.delete_all();
        assert!(controller.model().is_empty());
        assert!(controller.surface().curves().is_empty());
    }

    #[test]
    fn files_with_the_same_columns_keep_separate_legend_entries() {
        let mut controller = PlotController::new(Delimiter::Whitespace);
        controller.load_file(&temp_file("run1.dat", "t a\n0 1\n")).unwrap();
        controller.load_file(&temp_file("run2.dat", "t a\n0 5\n")).unwrap();

        let names = controller.surface().legend_names();
        assert_eq!(names, vec!["run1.dat: a(t)", "run2.dat: a(t)"]);
        let tree_names: Vec<_> = (0..2)
            .map(|row| controller.model().display_text(ModelIndex::Series { parent: row, row: 0 }).unwrap())
            .collect();
        assert_eq!(tree_names, vec!["a(t)", "a(t)"]);
    }
}
