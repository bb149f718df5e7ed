//! WebGPU rendering module
//!
//! `scene` builds a triangle list in layout space from the app state;
//! `pipeline` maps it to the canvas and draws it.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;
pub mod view;

pub use pipeline::RenderState;
pub use view::Viewport;
