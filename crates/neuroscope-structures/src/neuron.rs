//! The composite neuron model.

use glam::Vec3;
use neuroscope_core::{MeshGeometry, NeuronConfig, RandomSource, Result};

use crate::limbs::{build_axon, place_dendrites};
use crate::particles::{scatter_particles, ParticleField};
use crate::soma::{generate_soma, SomaMesh};
use crate::tube::TubeMesh;

/// Every piece of geometry that makes up one neuron scene.
///
/// Built once and never modified; dropping it releases all geometry.
#[derive(Debug, Clone)]
pub struct NeuronModel {
    /// Cell body.
    pub soma: SomaMesh,
    /// Dendrite tubes, each root followed by its branches.
    pub dendrites: Vec<TubeMesh>,
    /// The axon.
    pub axon: TubeMesh,
    /// Ambient particles.
    pub particles: ParticleField,
}

impl NeuronModel {
    /// Validates `config` and generates a neuron.
    ///
    /// Randomness is drawn in a fixed order: soma noise, then per dendrite
    /// elevation, length and thickness, then particle positions.
    pub fn generate(config: &NeuronConfig, rng: &mut dyn RandomSource) -> Result<Self> {
        config.validate()?;

        let soma = generate_soma(&config.soma, rng);
        let dendrites = place_dendrites(config, soma.center, rng);
        let axon = build_axon(config, soma.center);
        let particles = scatter_particles(&config.particles, soma.center, rng);

        let model = Self {
            soma,
            dendrites,
            axon,
            particles,
        };
        log::info!(
            "generated neuron: {} dendrite tubes, 1 axon, {} particles, {} triangles",
            model.dendrites.len(),
            model.particles.len(),
            model.triangle_count()
        );
        Ok(model)
    }

    /// Number of tubes (dendrites and axon).
    #[must_use]
    pub fn tube_count(&self) -> usize {
        self.dendrites.len() + 1
    }

    /// Iterates over every tube, dendrites first.
    pub fn tubes(&self) -> impl Iterator<Item = &TubeMesh> {
        self.dendrites.iter().chain(std::iter::once(&self.axon))
    }

    /// Iterates over every surface drawn with the neuron material.
    pub fn surfaces(&self) -> impl Iterator<Item = &MeshGeometry> {
        std::iter::once(&self.soma.geometry).chain(self.tubes().map(|t| &t.geometry))
    }

    /// Total triangles across the soma and all tubes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.surfaces().map(MeshGeometry::triangle_count).sum()
    }

    /// Bounding box of the soma and all tubes (particles excluded).
    #[must_use]
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        self.surfaces()
            .filter_map(MeshGeometry::bounding_box)
            .fold(
                (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
                |(min, max), (lo, hi)| (min.min(lo), max.max(hi)),
            )
    }
}
