//! WebGPU rendering module
//!
//! Frames are plain triangle lists built on the CPU in pixel space
//! ([`frame::build_frame`]) and uploaded by [`pipeline::RenderState`].

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use frame::build_frame;
pub use pipeline::{RenderInitError, RenderState};
pub use vertex::Vertex;
