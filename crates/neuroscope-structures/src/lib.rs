//! Procedural neuron geometry for neuroscope.
//!
//! This crate generates the meshes of a stylized neuron:
//! - [`SomaMesh`] - an irregular cell body
//! - [`TubeMesh`] - tapered limbs swept along Catmull-Rom curves
//! - [`grow_branch`] - recursive dendrite branching
//! - [`place_dendrites`] / [`build_axon`] - limb placement around the soma
//! - [`ParticleField`] - decorative particles
//! - [`NeuronModel`] - all of the above, built once

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Mesh sizes stay far below f32 precision limits
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod branch;
pub mod limbs;
pub mod neuron;
pub mod particles;
pub mod soma;
pub mod tube;

pub use branch::{grow_branch, max_tube_count, BranchParams, BranchSeed, OrganicOffset};
pub use limbs::{build_axon, limb_direction, place_dendrites};
pub use neuron::NeuronModel;
pub use particles::{scatter_particles, ParticleField};
pub use soma::{generate_soma, SomaMesh};
pub use tube::{tapered_radius, TubeMesh};
