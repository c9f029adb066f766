//! egui front end: the clock window and its settings window

mod app;
mod clock_view;
pub mod components;
mod constants;
mod window;

pub use app::run_gui;
