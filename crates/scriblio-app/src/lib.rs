//! Scriblio application shell.

mod app;
mod event_handler;
mod shortcuts;
mod ui;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::{App, AppConfig};
pub use shortcuts::ShortcutRegistry;
