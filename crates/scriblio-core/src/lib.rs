//! Scriblio Core Library
//!
//! Platform-agnostic core data structures and logic for the Scriblio whiteboard.

pub mod board;
pub mod camera;
pub mod canvas;
pub mod events;
pub mod input;
pub mod minimap;
pub mod selection;
pub mod shapes;
pub mod tools;

pub use board::BoardId;
pub use camera::Camera;
pub use canvas::Canvas;
pub use events::DocumentEvent;
pub use input::InputState;
pub use minimap::MiniMap;
pub use selection::ManipulationState;
