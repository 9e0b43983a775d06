use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a file on disk into plotted series.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("file {} does not exist", .0.display())]
    MissingFile(PathBuf),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse file {}", path.display())]
    Parse { path: PathBuf, detail: String },
    #[error("cannot plot: need at least an X and one Y column (table has {columns})")]
    TooFewColumns { columns: usize },
}

impl PlotError {
    /// Short message for the dialog headline.
    pub fn summary(&self) -> String {
        format!("Failed to plot data from file: {self}")
    }

    /// Extra text shown under "Details" in the message dialog, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            PlotError::Parse { detail, .. } => Some(detail.clone()),
            PlotError::Io { source, .. } => Some(source.to_string()),
            PlotError::MissingFile(_) | PlotError::TooFewColumns { .. } => None,
        }
    }
}
