//! WebGPU rendering module
//!
//! `scene` turns a state snapshot into coloured triangles in arena space;
//! `pipeline` letterboxes them onto the canvas.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, arena_to_ndc};
pub use scene::build_scene;
pub use vertex::Vertex;
