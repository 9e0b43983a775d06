pub mod message_dialog;
pub mod plot_tree_view;
