//! Uploading a generated neuron to the render engine.

use neuroscope_render::{MaterialKind, RenderEngine};
use neuroscope_structures::NeuronModel;

/// Uploads every surface of `model`: soma and tubes with the neuron
/// material, particles as instanced markers.
///
/// Adds one mesh per surface of [`NeuronModel::surfaces`] plus one instanced
/// particle mesh when the model has particles.
pub fn upload_model(engine: &mut RenderEngine, model: &NeuronModel) {
    for surface in model.surfaces() {
        engine.add_mesh(surface, MaterialKind::Neuron, &[]);
    }

    if !model.particles.is_empty() {
        engine.add_mesh(
            &model.particles.marker_geometry(),
            MaterialKind::Particle,
            &model.particles.positions,
        );
    }

    log::info!(
        "uploaded neuron: {} meshes, {} triangles, {} particles",
        engine.mesh_count(),
        model.triangle_count(),
        model.particles.len()
    );
}
