pub mod plot_surface;
