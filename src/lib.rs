//! Net64 settings editor: draft/commit controller, persisted store, live
//! session link and gamepad discovery, plus the egui window that drives them.

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod devices;
pub mod editor;
pub mod gui;
pub mod ipc;
pub mod types;
