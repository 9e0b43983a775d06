use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::loader::LoadedData;
use crate::error::PlotError;
use crate::state::color_cycler::ColorCycler;
use crate::state::data_series::DataSeries;

/// All series plotted from one file, in column order.
#[derive(Debug, Clone)]
pub struct FilePlot {
    pub path: PathBuf,
    pub series: Vec<Arc<DataSeries>>,
}

impl FilePlot {
    /// Build one series per non-first column of `table`, using the first
    /// column as X. Colors are only drawn from `cycler` once the table is
    /// known to be plottable.
    pub fn from_table(
        path: &Path,
        table: &LoadedData,
        cycler: &mut ColorCycler,
    ) -> Result<Self, PlotError> {
        let ncols = table.column_count();
        if ncols < 2 {
            let err = PlotError::TooFewColumns { columns: ncols };
            tracing::error!("{err}");
            return Err(err);
        }

        let x_name = &table.columns[0];
        tracing::debug!("Table X column: {x_name}, {} rows", table.row_count);
        let x = &table.column_data[0];
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let series = table.columns[1..]
            .iter()
            .zip(&table.column_data[1..])
            .map(|(name, y)| {
                let label = format!("{name}({x_name})");
                Arc::new(DataSeries::new(label, source.clone(), x, y, cycler.next_color()))
            })
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::color_cycler::COLOR_PALETTE;

    fn table(columns: &[&str], rows: usize) -> LoadedData {
        LoadedData {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            column_data: (0..columns.len())
                .map(|c| (0..rows).map(|r| (r * 10 + c) as f64).collect())
                .collect(),
            row_count: rows,
        }
    }

    #[test]
    fn one_series_per_data_column() {
        let mut cycler = ColorCycler::new();
        let plot = FilePlot::from_table(Path::new("f.dat"), &table(&["t", "a", "b"], 4), &mut cycler)
            .unwrap();

        let labels: Vec<_> = plot.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["a(t)", "b(t)"]);
        assert!(plot.series.iter().all(|s| s.point_count() == 4));
        assert_eq!(plot.series[0].color, COLOR_PALETTE[0]);
        assert_eq!(plot.series[1].color, COLOR_PALETTE[1]);
        let pairs: Vec<[f64; 2]> = plot.series[1].points.iter().map(|p| [p.x, p.y]).collect();
        assert_eq!(pairs, vec![[0.0, 2.0], [10.0, 12.0], [20.0, 22.0], [30.0, 32.0]]);
        assert_eq!(plot.series[0].source, "f.dat");
        assert_eq!(plot.series[0].legend_name(), "f.dat: a(t)");
    }

    #[test]
    fn single_column_is_rejected_without_using_colors() {
        let mut cycler = ColorCycler::new();
        let err = FilePlot::from_table(Path::new("f.dat"), &table(&["t"], 3), &mut cycler)
            .unwrap_err();
        assert!(matches!(err, PlotError::TooFewColumns { columns: 1 }));
        assert_eq!(cycler.next_color(), COLOR_PALETTE[0]);
    }
}
