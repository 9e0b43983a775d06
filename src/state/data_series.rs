use egui_plot::PlotPoint;

static NEXT_SERIES_ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

fn next_series_id() -> u64 {
    NEXT_SERIES_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
}

/// Default pen width for plotted lines (pixels).
pub const PEN_WIDTH: f32 = 2.0;

/// One renderable curve: a Y column plotted against the shared X column.
#[derive(Debug, Clone)]
pub struct DataSeries {
    pub id: u64,
    pub label: String,
    /// Base name of the file the curve came from.
    pub source: String,
    /// `(x, y)` pairs, built once so drawing can borrow them every frame.
    pub points: Vec<PlotPoint>,
    pub color: [u8; 4],
    /// Line width for this series (pixels).
    pub line_width: f32,
}

impl DataSeries {
    /// Pair `x` with `y`. The shorter column decides the point count.
    pub fn new(label: String, source: String, x: &[f64], y: &[f64], color: [u8; 4]) -> Self {
        Self {
            id: next_series_id(),
            label,
            source,
            points: x.iter().zip(y).map(|(&x, &y)| PlotPoint::new(x, y)).collect(),
            color,
            line_width: PEN_WIDTH,
        }
    }

    pub fn color32(&self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.color[0], self.color[1], self.color[2], self.color[3])
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Name shown in the plot legend. The file name keeps curves with the
    /// same column names apart.
    pub fn legend_name(&self) -> String {
        if self.source.is_empty() {
            self.label.clone()
        } else {
            format!("{}: {}", self.source, self.label)
        }
    }
}
