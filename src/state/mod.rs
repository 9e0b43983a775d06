pub mod color_cycler;
pub mod data_series;
pub mod file_plot;
pub mod settings;
pub mod tree_model;
