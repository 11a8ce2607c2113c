//! Reveal rendering
//!
//! `shapes` turns simulation state into `DrawCmd`s without side effects; the
//! canvas backend (web only) paints them.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod draw;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use draw::{DrawCmd, Rgba};
pub use shapes::scene;
