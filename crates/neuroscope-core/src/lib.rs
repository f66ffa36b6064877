//! Core types for neuroscope.
//!
//! This crate provides the building blocks shared by the generator, the
//! renderer and the viewer:
//! - [`Options`] and the per-part configuration structs
//! - [`NeuronError`] and the crate-wide [`Result`]
//! - [`RandomSource`], the pluggable source of randomness
//! - [`MeshGeometry`], an indexed triangle mesh
//! - [`CatmullRomCurve`], the interpolating curve tubes are swept along

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Mesh sizes stay far below f32 precision limits
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod curve;
pub mod error;
pub mod mesh;
pub mod options;
pub mod random;

pub use curve::CatmullRomCurve;
pub use error::{NeuronError, Result};
pub use mesh::MeshGeometry;
pub use options::{
    hex_color, AxonConfig, CameraConfig, DendriteConfig, DirectionalLightConfig, FogConfig,
    LightingConfig, MaterialConfig, NeuronConfig, Options, ParticleConfig, PulseConfig,
    SomaConfig, ViewerOptions, ViewportConfig,
};
pub use random::{ConstantRandom, RandomSource, StdRandom};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
