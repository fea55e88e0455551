//! Settings editor window

mod components;
mod constants;
pub mod manager;

pub use manager::run_gui;
