//! Renderer abstraction and implementations for Scriblio.

mod renderer;
#[cfg(feature = "vello-renderer")]
mod text_editor;
#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
#[cfg(feature = "vello-renderer")]
pub use text_editor::TextEditState;
#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
