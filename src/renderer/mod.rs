//! WebGPU rendering module
//!
//! Draws the dune terrain and the convoy with a depth buffer, a sun,
//! ambient and hemisphere light, and linear distance fog. `SceneCamera` and
//! `ConvoyTransform` are the objects the camera director writes into.

pub mod camera;
pub mod meshes;
pub mod scene_pipeline;
pub mod vertex;

pub use camera::{ConvoyTransform, SceneCamera};
pub use meshes::MeshData;
pub use scene_pipeline::SceneRenderState;
pub use vertex::SceneVertex;
