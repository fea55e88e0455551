//! Settings persistence for Net64
//!
//! - **save_data**: the persisted settings shape and load-time repairs
//! - **store**: JSON file store used as the commit target for persistence

pub mod save_data;
pub mod store;

pub use save_data::{HotkeyBindings, SaveData};
pub use store::JsonFileStore;
