//! neuroscope: an animated, procedurally generated 3D neuron.
//!
//! A soma with noisy surface, six branching dendrites, a long axon and a
//! cloud of particles, lit in blue tones. Moving the pointer orbits the
//! camera, the wheel zooms, and the membrane glow pulses over time.
//!
//! # Quick Start
//!
//! ```no_run
//! use neuroscope::*;
//!
//! fn main() -> Result<()> {
//!     let options = Options::default();
//!     let model = generate_neuron(&options)?;
//!     show(model, &options)
//! }
//! ```
//!
//! # Crates
//!
//! - `neuroscope-core` - options, errors, meshes, curves, randomness
//! - `neuroscope-structures` - the procedural geometry generator
//! - `neuroscope-render` - the wgpu renderer
//!
//! Every value the generator and viewer use lives in [`Options`], which can be
//! loaded from JSON with [`Options::from_json_file`].

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Window sizes and pixel positions fit comfortably in f32
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

mod app;
mod headless;
mod scene;
pub mod viewport;

pub use neuroscope_core::{
    hex_color, AxonConfig, CameraConfig, CatmullRomCurve, ConstantRandom, DendriteConfig,
    DirectionalLightConfig, FogConfig, LightingConfig, MaterialConfig, MeshGeometry,
    NeuronConfig, NeuronError, Options, ParticleConfig, PulseConfig, RandomSource, Result,
    SomaConfig, StdRandom, ViewerOptions, ViewportConfig,
};
pub use neuroscope_core::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use neuroscope_render::{Camera, RenderEngine, RenderError, ScreenshotError};
pub use neuroscope_structures::{NeuronModel, ParticleField, SomaMesh, TubeMesh};

pub use app::App;
pub use headless::{render_to_file, render_to_image};
pub use scene::upload_model;
pub use viewport::{FrameState, InputState, ViewportController};

/// Generates a neuron with a fresh, entropy-seeded random source.
pub fn generate_neuron(options: &Options) -> Result<NeuronModel> {
    generate_neuron_with(options, &mut StdRandom::from_entropy())
}

/// Generates a neuron drawing every random value from `rng`.
///
/// A seeded [`StdRandom`] gives the same model every run.
pub fn generate_neuron_with(options: &Options, rng: &mut dyn RandomSource) -> Result<NeuronModel> {
    options.validate()?;
    NeuronModel::generate(&options.neuron, rng)
}

/// Opens the viewer window and blocks until it is closed.
///
/// Fails fast if no window or graphics device can be created. All GPU
/// resources of the scene are released when the window closes.
pub fn show(model: NeuronModel, options: &Options) -> Result<()> {
    let _ = env_logger::try_init();
    options.viewer.validate()?;
    log::info!("neuroscope viewer starting");
    app::run_app(model, options.viewer.clone())
}
