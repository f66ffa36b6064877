//! Rendering backend for neuroscope.
//!
//! This crate provides the wgpu-based rendering engine, including:
//! - GPU buffers for triangle meshes and instanced markers
//! - The WGSL surface shader with lights and fog
//! - Materials and camera
//! - Offscreen capture and image saving

#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

pub mod buffer;
pub mod camera;
pub mod color;
pub mod engine;
pub mod error;
pub mod lights;
pub mod materials;
pub mod mesh_render;
pub mod screenshot;

pub use camera::Camera;
pub use engine::{CameraUniforms, RenderEngine};
pub use error::{RenderError, RenderResult};
pub use lights::LightUniforms;
pub use materials::{Material, MaterialKind, MaterialRenderData, MaterialUniforms};
pub use mesh_render::{MeshInstance, MeshRenderData, MeshVertex};
pub use screenshot::{encode_png, save_image, ScreenshotError};
