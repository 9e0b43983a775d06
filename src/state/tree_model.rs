//! Two-level tree of loaded files and their series.
//!
//! ```text
//! Root
//!  |-- File (row)            FileNode
//!  |     |-- Series (row)    SeriesNode
//!  |     |-- Series (row)    SeriesNode
//! ...
//! ```
//!
//! Views address nodes with [`ModelIndex`] and observe changes through the
//! channel returned by [`PlotTreeModel::subscribe`]. Every structural change
//! is bracketed by an "about to" event and a "done" event.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};

use thiserror::Error;

use crate::state::data_series::DataSeries;
use crate::state::file_plot::FilePlot;

/// Position of a node in the tree. A series carries the row of its parent
/// file, which is how a child finds its way back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelIndex {
    Root,
    File { row: usize },
    Series { parent: usize, row: usize },
}

impl ModelIndex {
    /// Row among siblings, `None` for the root.
    pub fn row(&self) -> Option<usize> {
        match *self {
            ModelIndex::Root => None,
            ModelIndex::File { row } | ModelIndex::Series { row, .. } => Some(row),
        }
    }

    pub fn parent(&self) -> Option<ModelIndex> {
        match *self {
            ModelIndex::Root => None,
            ModelIndex::File { .. } => Some(ModelIndex::Root),
            ModelIndex::Series { parent, .. } => Some(ModelIndex::File { row: parent }),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("plot tree index {0:?} does not resolve to a node")]
    InvalidIndex(ModelIndex),
}

#[derive(Debug, Clone)]
pub struct SeriesNode {
    pub series: Arc<DataSeries>,
    pub is_visible: bool,
}

impl SeriesNode {
    pub fn name(&self) -> &str {
        &self.series.label
    }
}

static NEXT_FILE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
pub struct FileNode {
    /// Stays with the file while rows around it come and go.
    pub id: u64,
    pub path: PathBuf,
    pub children: Vec<SeriesNode>,
    pub is_visible: bool,
}

impl FileNode {
    fn new(file: FilePlot) -> Self {
        Self {
            id: NEXT_FILE_ID.fetch_add(1, Ordering::Relaxed),
            path: file.path,
            children: file
                .series
                .into_iter()
                .map(|series| SeriesNode {
                    series,
                    is_visible: true,
                })
                .collect(),
            is_visible: true,
        }
    }

    /// Base name of the source file.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Resolved node data.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    File(&'a FileNode),
    Series(&'a SeriesNode),
}

impl Node<'_> {
    pub fn display_text(&self) -> String {
        match self {
            Node::File(file) => file.name(),
            Node::Series(series) => series.name().to_string(),
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Node::File(file) => file.is_visible,
            Node::Series(series) => series.is_visible,
        }
    }
}

/// A series was shown or hidden.
#[derive(Debug, Clone)]
pub struct VisibilityChanged {
    pub series: Arc<DataSeries>,
    pub is_visible: bool,
}

#[derive(Debug, Clone)]
pub enum ModelEvent {
    RowsAboutToBeInserted { parent: ModelIndex, first: usize, last: usize },
    RowsInserted { parent: ModelIndex, first: usize, last: usize },
    RowsAboutToBeRemoved { parent: ModelIndex, first: usize, last: usize },
    RowsRemoved { parent: ModelIndex, first: usize, last: usize },
    ModelAboutToBeReset,
    ModelReset,
    /// Display text or check state of a node changed.
    DataChanged(ModelIndex),
    VisibilityChanged(VisibilityChanged),
    /// Every series was removed at once.
    Cleared,
}

#[derive(Debug, Default)]
pub struct PlotTreeModel {
    files: Vec<FileNode>,
    subscribers: Vec<mpsc::Sender<ModelEvent>>,
}

impl PlotTreeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Events arrive in emission order.
    pub fn subscribe(&mut self) -> mpsc::Receiver<ModelEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: ModelEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn emit_visibility(&mut self, series: Arc<DataSeries>, is_visible: bool) {
        self.emit(ModelEvent::VisibilityChanged(VisibilityChanged { series, is_visible }));
    }

    #[cfg(test)]
    pub fn files(&self) -> &[FileNode] {
        &self.files
    }

    #[cfg(test)]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Append a file at the end of the root level and return its index.
    pub fn add_file(&mut self, file: FilePlot) -> ModelIndex {
        tracing::debug!("Add file {} to plot tree", file.path.display());
        let row = self.files.len();
        let parent = ModelIndex::Root;
        self.emit(ModelEvent::RowsAboutToBeInserted { parent, first: row, last: row });
        self.files.push(FileNode::new(file));
        self.emit(ModelEvent::RowsInserted { parent, first: row, last: row });
        ModelIndex::File { row }
    }

    /// Remove a file (with all of its series) or a single series. Every
    /// removed series is announced as hidden before it leaves the tree.
    pub fn delete_node(&mut self, index: ModelIndex) -> Result<(), ModelError> {
        tracing::debug!("Delete plot with index {index:?}");
        match index {
            ModelIndex::Root => Ok(()),
            ModelIndex::File { row } => {
                if row >= self.files.len() {
                    return Err(fault(index));
                }
                let parent = ModelIndex::Root;
                self.emit(ModelEvent::RowsAboutToBeRemoved { parent, first: row, last: row });
                let hidden: Vec<Arc<DataSeries>> = self.files[row]
                    .children
                    .iter()
                    .map(|child| Arc::clone(&child.series))
                    .collect();
                for series in hidden {
                    self.emit_visibility(series, false);
                }
                self.files.remove(row);
                self.emit(ModelEvent::RowsRemoved { parent, first: row, last: row });
                Ok(())
            }
            ModelIndex::Series { parent: file_row, row } => {
                let child_count = self
                    .files
                    .get(file_row)
                    .map(|file| file.children.len())
                    .ok_or_else(|| fault(index))?;
                if row >= child_count {
                    tracing::warn!("Selected index {index:?} is out of range");
                    return Ok(());
                }
                let parent = ModelIndex::File { row: file_row };
                self.emit(ModelEvent::RowsAboutToBeRemoved { parent, first: row, last: row });
                let series = Arc::clone(&self.files[file_row].children[row].series);
                self.emit_visibility(series, false);
                self.files[file_row].children.remove(row);
                self.emit(ModelEvent::RowsRemoved { parent, first: row, last: row });
                Ok(())
            }
        }
    }

    /// Drop every file in one step. Observers get a single `Cleared`
    /// instead of one hide event per series.
    pub fn delete_all(&mut self) {
        tracing::debug!("Delete all plots");
        self.emit(ModelEvent::ModelAboutToBeReset);
        self.files.clear();
        self.emit(ModelEvent::Cleared);
        self.emit(ModelEvent::ModelReset);
    }

    /// Set the check state of a node. Checking a file applies the same state
    /// to each of its series in order.
    pub fn set_visible(&mut self, index: ModelIndex, visible: bool) -> Result<(), ModelError> {
        match index {
            ModelIndex::Root => return Err(fault(index)),
            ModelIndex::File { row } => {
                let file = self.files.get_mut(row).ok_or_else(|| fault(index))?;
                file.is_visible = visible;
                let child_count = file.children.len();
                tracing::debug!("File node {index:?} is checked (visible={visible})");
                for child in 0..child_count {
                    self.set_visible(ModelIndex::Series { parent: row, row: child }, visible)?;
                }
            }
            ModelIndex::Series { parent, row } => {
                let child = self
                    .files
                    .get_mut(parent)
                    .and_then(|file| file.children.get_mut(row))
                    .ok_or_else(|| fault(index))?;
                child.is_visible = visible;
                let series = Arc::clone(&child.series);
                tracing::debug!("Plot node {index:?} is checked (visible={visible})");
                self.emit_visibility(series, visible);
            }
        }
        self.emit(ModelEvent::DataChanged(index));
        Ok(())
    }

    pub fn node(&self, index: ModelIndex) -> Result<Node<'_>, ModelError> {
        let node = match index {
            ModelIndex::Root => None,
            ModelIndex::File { row } => self.files.get(row).map(Node::File),
            ModelIndex::Series { parent, row } => self
                .files
                .get(parent)
                .and_then(|file| file.children.get(row))
                .map(Node::Series),
        };
        node.ok_or_else(|| fault(index))
    }

    pub fn row_count(&self, parent: ModelIndex) -> Result<usize, ModelError> {
        match parent {
            ModelIndex::Root => Ok(self.files.len()),
            _ => match self.node(parent)? {
                Node::File(file) => Ok(file.children.len()),
                Node::Series(_) => Ok(0),
            },
        }
    }

    pub fn column_count(&self, parent: ModelIndex) -> usize {
        match parent {
            ModelIndex::Root => 1,
            _ => usize::from(self.node(parent).is_ok()),
        }
    }

    /// Child `row` of `parent`, if it exists.
    pub fn index(&self, row: usize, parent: ModelIndex) -> Option<ModelIndex> {
        match parent {
            ModelIndex::Root => (row < self.files.len()).then_some(ModelIndex::File { row }),
            ModelIndex::File { row: file_row } => {
                let file = self.files.get(file_row)?;
                (row < file.children.len()).then_some(ModelIndex::Series { parent: file_row, row })
            }
            ModelIndex::Series { .. } => None,
        }
    }

    pub fn parent(&self, index: ModelIndex) -> Option<ModelIndex> {
        index.parent()
    }

    pub fn display_text(&self, index: ModelIndex) -> Result<String, ModelError> {
        Ok(self.node(index)?.display_text())
    }

    pub fn is_checked(&self, index: ModelIndex) -> Result<bool, ModelError> {
        Ok(self.node(index)?.is_visible())
    }

    pub fn header(&self) -> &'static str {
        "Plots"
    }
}

fn fault(index: ModelIndex) -> ModelError {
    let err = ModelError::InvalidIndex(index);
    tracing::error!("{err}");
    err
}
