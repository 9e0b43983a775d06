use std::sync::Arc;

use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::state::data_series::DataSeries;
use crate::state::tree_model::{ModelEvent, VisibilityChanged};

/// The set of curves currently drawn, in the order they were shown.
#[derive(Debug, Default)]
pub struct PlotSurface {
    curves: Vec<Arc<DataSeries>>,
}

impl PlotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a curve. Returns false if it was already shown.
    pub fn add(&mut self, series: Arc<DataSeries>) -> bool {
        if self.contains(series.id) {
            return false;
        }
        self.curves.push(series);
        true
    }

    /// Hide a curve. Returns false if it was not shown.
    pub fn remove(&mut self, series_id: u64) -> bool {
        match self.curves.iter().position(|s| s.id == series_id) {
            Some(pos) => {
                self.curves.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.curves.clear();
    }

    pub fn contains(&self, series_id: u64) -> bool {
        self.curves.iter().any(|s| s.id == series_id)
    }

    #[cfg(test)]
    pub fn curves(&self) -> &[Arc<DataSeries>] {
        &self.curves
    }

    /// Legend entry for each curve, in drawing order. `egui_plot` merges
    /// items that share a name, so a repeated name gets a counter.
    pub fn legend_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.curves.len());
        for series in &self.curves {
            let base = series.legend_name();
            let mut name = base.clone();
            let mut n = 1;
            while names.contains(&name) {
                n += 1;
                name = format!("{base} ({n})");
            }
            names.push(name);
        }
        names
    }

    /// React to a tree-model event. Structural events are ignored.
    pub fn apply(&mut self, event: &ModelEvent) {
        match event {
            ModelEvent::VisibilityChanged(VisibilityChanged { series, is_visible: true }) => {
                self.add(Arc::clone(series));
            }
            ModelEvent::VisibilityChanged(VisibilityChanged { series, is_visible: false }) => {
                self.remove(series.id);
            }
            ModelEvent::Cleared => self.clear(),
            _ => {}
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let names = self.legend_names();
        Plot::new("justplot_surface")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (series, name) in self.curves.iter().zip(names) {
                    plot_ui.line(
                        Line::new(PlotPoints::Borrowed(&series.points))
                            .name(name)
                            .id(egui::Id::new(("justplot_curve", series.id)))
                            .color(series.color32())
                            .width(series.line_width),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(label: &str) -> Arc<DataSeries> {
        from_file(label, "f.dat")
    }

    fn from_file(label: &str, source: &str) -> Arc<DataSeries> {
        Arc::new(DataSeries::new(label.into(), source.into(), &[0.0, 1.0], &[1.0, 2.0], [0; 4]))
    }

    fn visibility(series: &Arc<DataSeries>, is_visible: bool) -> ModelEvent {
        ModelEvent::VisibilityChanged(VisibilityChanged {
            series: Arc::clone(series),
            is_visible,
        })
    }

    #[test]
    fn add_and_remove_are_idempotent() {
        let mut surface = PlotSurface::new();
        let a = series("a");
        assert!(surface.add(Arc::clone(&a)));
        assert!(!surface.add(Arc::clone(&a)));
        assert_eq!(surface.curves().len(), 1);

        assert!(surface.remove(a.id));
        assert!(!surface.remove(a.id));
        assert!(surface.curves().is_empty());
    }

    #[test]
    fn events_drive_visibility() {
        let mut surface = PlotSurface::new();
        let (a, b) = (series("a"), series("b"));

        surface.apply(&visibility(&a, true));
        surface.apply(&visibility(&b, true));
        surface.apply(&visibility(&a, false));
        surface.apply(&ModelEvent::ModelReset);
        assert!(!surface.contains(a.id));
        assert!(surface.contains(b.id));

        surface.apply(&ModelEvent::Cleared);
        assert!(surface.curves().is_empty());
    }

    #[test]
    fn same_column_names_get_distinct_legend_entries() {
        let mut surface = PlotSurface::new();
        surface.add(from_file("a(t)", "run1.dat"));
        surface.add(from_file("a(t)", "run2.dat"));
        surface.add(from_file("a(t)", "run1.dat"));
        surface.add(from_file("b(t)", "run1.dat"));

        assert_eq!(
            surface.legend_names(),
            vec!["run1.dat: a(t)", "run2.dat: a(t)", "run1.dat: a(t) (2)", "run1.dat: b(t)"]
        );
    }
}
