//! Headless rendering API.
//!
//! Renders a generated neuron to an image buffer or file without opening a
//! window. Useful for integration tests and thumbnails.

use std::path::Path;

use pollster::FutureExt;

use neuroscope_core::{NeuronError, Options, Result};
use neuroscope_render::RenderEngine;
use neuroscope_structures::NeuronModel;

use crate::scene::upload_model;
use crate::viewport::ViewportController;

/// Renders one frame of `model` and saves it as PNG or JPEG.
///
/// The camera sits at its initial position with the pointer centered, and
/// the emissive pulse is sampled at time zero, so the output is reproducible.
///
/// # Example
/// ```no_run
/// let options = neuroscope::Options::default();
/// let model = neuroscope::generate_neuron(&options)?;
/// neuroscope::render_to_file(&model, &options, "neuron.png", 800, 600)?;
/// # Ok::<(), neuroscope::NeuronError>(())
/// ```
pub fn render_to_file(
    model: &NeuronModel,
    options: &Options,
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
) -> Result<()> {
    let data = render_to_image(model, options, width, height)?;
    neuroscope_render::save_image(path, &data, width, height)
        .map_err(|e| NeuronError::RenderError(format!("failed to save image: {e}")))
}

/// Renders one frame of `model` to tightly packed RGBA8 pixels,
/// `width * height * 4` bytes, top row first.
pub fn render_to_image(
    model: &NeuronModel,
    options: &Options,
    width: u32,
    height: u32,
) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(NeuronError::invalid("image size", "must be non-zero"));
    }

    let mut engine = RenderEngine::new_headless(width, height, &options.viewer)
        .block_on()
        .map_err(|e| NeuronError::RenderError(format!("failed to create headless engine: {e}")))?;

    upload_model(&mut engine, model);

    let viewport = ViewportController::from_options(&options.viewer);
    viewport.resized(&mut engine.camera, width, height);
    let frame = viewport.tick(&mut engine.camera, 0.0);
    engine.set_emissive_intensity(frame.emissive_intensity);

    engine
        .capture_frame()
        .map_err(|e| NeuronError::RenderError(format!("failed to capture frame: {e}")))
}
