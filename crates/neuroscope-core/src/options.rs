//! Configuration options for neuroscope.
//!
//! Defaults reproduce the reference scene: a 3-unit soma, six dendrites with
//! two levels of branching, one long axon and fifty drifting particles, seen
//! through a 75° camera in a blue fog.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::path::Path;

use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{NeuronError, Result};

/// Converts a `0xRRGGBB` color into sRGB components in `[0, 1]`.
#[must_use]
pub fn hex_color(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Top-level configuration: what to generate and how to show it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Geometry generation parameters.
    pub neuron: NeuronConfig,
    /// Viewer and scene appearance.
    pub viewer: ViewerOptions,
}

impl Options {
    /// Loads options from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let options = Self::from_json_str(&text)?;
        log::info!("loaded options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Parses options from a JSON string and validates them.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Serializes the options as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every parameter range.
    pub fn validate(&self) -> Result<()> {
        self.neuron.validate()?;
        self.viewer.validate()
    }
}

/// Parameters of the procedural neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeuronConfig {
    /// Cell body.
    pub soma: SomaConfig,
    /// Main dendrites and their branching.
    pub dendrites: DendriteConfig,
    /// The single axon.
    pub axon: AxonConfig,
    /// Decorative particles.
    pub particles: ParticleConfig,
    /// Distance from the soma center at which limbs start.
    pub attach_offset: f32,
    /// Radius shrink along a tube: `r(f) = thickness * (1 - taper * f)`.
    pub taper: f32,
}

impl Default for NeuronConfig {
    fn default() -> Self {
        Self {
            soma: SomaConfig::default(),
            dendrites: DendriteConfig::default(),
            axon: AxonConfig::default(),
            particles: ParticleConfig::default(),
            attach_offset: 3.2,
            taper: 0.7,
        }
    }
}

impl NeuronConfig {
    /// Checks every parameter range.
    pub fn validate(&self) -> Result<()> {
        self.soma.validate()?;
        self.dendrites.validate()?;
        self.axon.validate()?;
        self.particles.validate()?;
        ensure(self.attach_offset >= 0.0, "attach_offset", "must be non-negative")?;
        ensure(
            (0.0..1.0).contains(&self.taper),
            "taper",
            "must lie in [0, 1)",
        )
    }
}

/// Cell body parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SomaConfig {
    /// Nominal radius.
    pub radius: f32,
    /// Longitudinal segments of the base sphere.
    pub width_segments: u32,
    /// Latitudinal segments of the base sphere.
    pub height_segments: u32,
    /// Full width of the multiplicative radial noise (0.1 means ±5%).
    pub noise_amplitude: f32,
}

impl Default for SomaConfig {
    fn default() -> Self {
        Self {
            radius: 3.0,
            width_segments: 32,
            height_segments: 32,
            noise_amplitude: 0.1,
        }
    }
}

impl SomaConfig {
    fn validate(&self) -> Result<()> {
        ensure(finite_positive(self.radius), "soma.radius", "must be positive")?;
        ensure(self.width_segments >= 3, "soma.width_segments", "must be at least 3")?;
        ensure(self.height_segments >= 2, "soma.height_segments", "must be at least 2")?;
        ensure(
            (0.0..2.0).contains(&self.noise_amplitude),
            "soma.noise_amplitude",
            "must lie in [0, 2)",
        )
    }
}

/// Main dendrite placement and branching parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DendriteConfig {
    /// Number of main dendrites, spread evenly in angle around the soma.
    pub count: u32,
    /// Root length range `[min, max)`.
    pub length_range: [f32; 2],
    /// Root thickness range `[min, max)`.
    pub thickness_range: [f32; 2],
    /// Full width of the random elevation offset, in radians.
    pub elevation_spread: f32,
    /// Branch levels below each root.
    pub branch_depth: u32,
    /// Path samples per tube, minus one.
    pub segments: u32,
    /// Sides of the tube cross-section.
    pub radial_segments: u32,
    /// Limbs at or below this length do not branch.
    pub min_branch_length: f32,
    /// Arc fraction along the parent where children start.
    pub branch_fraction: f32,
    /// Child rotation away from the parent direction, in radians.
    pub branch_angle: f32,
    /// Axis the child directions are rotated about.
    pub branch_axis: Vec3,
    /// Child length relative to the parent.
    pub length_scale: f32,
    /// Child thickness relative to the parent.
    pub thickness_scale: f32,
}

impl Default for DendriteConfig {
    fn default() -> Self {
        Self {
            count: 6,
            length_range: [8.5, 14.5],
            thickness_range: [0.3, 0.5],
            elevation_spread: FRAC_PI_2,
            branch_depth: 2,
            segments: 20,
            radial_segments: 8,
            min_branch_length: 5.0,
            branch_fraction: 0.7,
            branch_angle: FRAC_PI_4,
            branch_axis: Vec3::Z,
            length_scale: 0.6,
            thickness_scale: 0.7,
        }
    }
}

impl DendriteConfig {
    fn validate(&self) -> Result<()> {
        ensure(
            valid_range(self.length_range),
            "dendrites.length_range",
            "must be a positive, non-empty range",
        )?;
        ensure(
            valid_range(self.thickness_range),
            "dendrites.thickness_range",
            "must be a positive, non-empty range",
        )?;
        ensure(self.segments >= 1, "dendrites.segments", "must be at least 1")?;
        ensure(self.radial_segments >= 3, "dendrites.radial_segments", "must be at least 3")?;
        ensure(
            self.min_branch_length.is_finite() && self.min_branch_length >= 0.0,
            "dendrites.min_branch_length",
            "must be non-negative",
        )?;
        ensure(
            self.branch_fraction > 0.0 && self.branch_fraction <= 1.0,
            "dendrites.branch_fraction",
            "must lie in (0, 1]",
        )?;
        ensure(
            self.branch_axis.length_squared() > 0.0,
            "dendrites.branch_axis",
            "must be non-zero",
        )?;
        ensure(
            self.length_scale > 0.0 && self.length_scale < 1.0,
            "dendrites.length_scale",
            "must lie in (0, 1)",
        )?;
        ensure(
            self.thickness_scale > 0.0 && self.thickness_scale < 1.0,
            "dendrites.thickness_scale",
            "must lie in (0, 1)",
        )?;
        ensure(
            self.branch_depth <= 12,
            "dendrites.branch_depth",
            "must be at most 12",
        )
    }
}

/// Axon parameters. The axon is not randomized and never branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxonConfig {
    /// Growth direction (normalized on use).
    pub direction: Vec3,
    /// Length along the direction.
    pub length: f32,
    /// Base thickness.
    pub thickness: f32,
    /// Path samples, minus one.
    pub segments: u32,
    /// Sides of the tube cross-section.
    pub radial_segments: u32,
}

impl Default for AxonConfig {
    fn default() -> Self {
        Self {
            direction: Vec3::new(1.0, -0.3, 0.2),
            length: 20.0,
            thickness: 0.2,
            segments: 30,
            radial_segments: 8,
        }
    }
}

impl AxonConfig {
    fn validate(&self) -> Result<()> {
        ensure(
            self.direction.is_finite() && self.direction.length_squared() > 0.0,
            "axon.direction",
            "must be non-zero",
        )?;
        ensure(finite_positive(self.length), "axon.length", "must be positive")?;
        ensure(finite_positive(self.thickness), "axon.thickness", "must be positive")?;
        ensure(self.segments >= 1, "axon.segments", "must be at least 1")?;
        ensure(self.radial_segments >= 3, "axon.radial_segments", "must be at least 3")
    }
}

/// Decorative particle parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of particles.
    pub count: u32,
    /// Edge length of the cube the particles are scattered in.
    pub extent: f32,
    /// Radius of each marker sphere.
    pub marker_radius: f32,
    /// Segments of each marker sphere.
    pub marker_segments: u32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 50,
            extent: 40.0,
            marker_radius: 0.05,
            marker_segments: 8,
        }
    }
}

impl ParticleConfig {
    fn validate(&self) -> Result<()> {
        ensure(
            self.extent.is_finite() && self.extent >= 0.0,
            "particles.extent",
            "must be non-negative",
        )?;
        ensure(
            finite_positive(self.marker_radius),
            "particles.marker_radius",
            "must be positive",
        )?;
        ensure(
            self.marker_segments >= 3,
            "particles.marker_segments",
            "must be at least 3",
        )
    }
}

/// Viewer appearance and interaction options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Window title.
    pub window_title: String,
    /// Initial window size in logical pixels.
    pub window_size: [u32; 2],
    /// Clear color (sRGB).
    pub background_color: Vec3,
    /// Linear distance fog.
    pub fog: FogConfig,
    /// Perspective camera.
    pub camera: CameraConfig,
    /// Pointer/scroll mapping.
    pub viewport: ViewportConfig,
    /// Emissive pulse.
    pub pulse: PulseConfig,
    /// Scene lights.
    pub lights: LightingConfig,
    /// Material shared by soma, dendrites and axon.
    pub neuron_material: MaterialConfig,
    /// Material of the particles.
    #[serde(deserialize_with = "particle_material")]
    pub particle_material: MaterialConfig,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            window_title: "neuroscope".to_string(),
            window_size: [1280, 720],
            background_color: hex_color(0x001a_3d5c),
            fog: FogConfig::default(),
            camera: CameraConfig::default(),
            viewport: ViewportConfig::default(),
            pulse: PulseConfig::default(),
            lights: LightingConfig::default(),
            neuron_material: MaterialConfig::neuron(),
            particle_material: MaterialConfig::particle(),
        }
    }
}

impl ViewerOptions {
    /// Checks every parameter range.
    pub fn validate(&self) -> Result<()> {
        ensure(
            self.window_size[0] > 0 && self.window_size[1] > 0,
            "viewer.window_size",
            "must be non-zero",
        )?;
        ensure(
            self.fog.near >= 0.0 && self.fog.far > self.fog.near,
            "viewer.fog",
            "far must exceed near",
        )?;
        ensure(
            self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0,
            "viewer.camera.fov_degrees",
            "must lie in (0, 180)",
        )?;
        ensure(
            self.camera.near > 0.0 && self.camera.far > self.camera.near,
            "viewer.camera",
            "need 0 < near < far",
        )?;
        ensure(
            self.viewport.zoom_range[0] > 0.0
                && self.viewport.zoom_range[0] <= self.viewport.zoom_range[1],
            "viewer.viewport.zoom_range",
            "need 0 < min <= max",
        )?;
        ensure(
            (0.0..=1.0).contains(&self.neuron_material.opacity)
                && (0.0..=1.0).contains(&self.particle_material.opacity),
            "viewer.material.opacity",
            "must lie in [0, 1]",
        )
    }
}

/// Linear distance fog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    /// Fog color (sRGB).
    pub color: Vec3,
    /// Distance where fog starts.
    pub near: f32,
    /// Distance where fog is opaque.
    pub far: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            color: hex_color(0x001a_3d5c),
            near: 10.0,
            far: 100.0,
        }
    }
}

/// Perspective camera parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Camera position before any input.
    pub initial_position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            initial_position: Vec3::new(0.0, 0.0, 15.0),
        }
    }
}

/// Maps pointer and wheel input to camera motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Camera X/Y offset at the viewport edges.
    pub orbit_extent: f32,
    /// Allowed camera distance `[min, max]`.
    pub zoom_range: [f32; 2],
    /// Distance change per pixel of wheel delta.
    pub zoom_sensitivity: f32,
    /// Pixels per wheel "line" for devices reporting line deltas.
    pub pixels_per_line: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            orbit_extent: 10.0,
            zoom_range: [5.0, 50.0],
            zoom_sensitivity: 0.01,
            pixels_per_line: 100.0,
        }
    }
}

/// Sinusoidal emissive pulse: `base + sin(time * frequency) * amplitude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Mean intensity.
    pub base: f32,
    /// Swing around the mean.
    pub amplitude: f32,
    /// Angular frequency in radians per second.
    pub frequency: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            base: 0.3,
            amplitude: 0.1,
            frequency: 2.0,
        }
    }
}

/// One ambient light plus two directional lights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Ambient light color (sRGB).
    pub ambient_color: Vec3,
    /// Ambient intensity.
    pub ambient_intensity: f32,
    /// Main light, shining from its position toward the origin.
    #[serde(deserialize_with = "key_light")]
    pub key: DirectionalLightConfig,
    /// Back light.
    #[serde(deserialize_with = "back_light")]
    pub back: DirectionalLightConfig,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: hex_color(0x004d_a6ff),
            ambient_intensity: 0.6,
            key: DirectionalLightConfig::key(),
            back: DirectionalLightConfig::back(),
        }
    }
}

/// A directional light aimed at the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLightConfig {
    /// Light color (sRGB).
    pub color: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Light position; the light travels from here toward the origin.
    pub position: Vec3,
}

impl DirectionalLightConfig {
    /// Sky-blue key light, up and to the front right.
    #[must_use]
    pub fn key() -> Self {
        Self {
            color: hex_color(0x0087_ceeb),
            intensity: 1.2,
            position: Vec3::new(10.0, 10.0, 10.0),
        }
    }

    /// Deep-sky-blue back light, below and behind.
    #[must_use]
    pub fn back() -> Self {
        Self {
            color: hex_color(0x0000_bfff),
            intensity: 0.8,
            position: Vec3::new(-10.0, -5.0, -10.0),
        }
    }
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self::key()
    }
}

/// Phong-style material parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    /// Base color (sRGB).
    pub color: Vec3,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Specular exponent.
    pub shininess: f32,
    /// Emissive color (sRGB).
    pub emissive: Vec3,
    /// Initial emissive intensity.
    pub emissive_intensity: f32,
    /// Whether back faces are shaded too.
    pub double_sided: bool,
    /// Whether the material reacts to lights.
    pub lit: bool,
}

impl MaterialConfig {
    /// Translucent blue material of the neuron.
    #[must_use]
    pub fn neuron() -> Self {
        Self {
            color: hex_color(0x004d_a6ff),
            opacity: 0.4,
            shininess: 100.0,
            emissive: hex_color(0x001a_4d7a),
            emissive_intensity: 0.3,
            double_sided: true,
            lit: true,
        }
    }

    /// Unlit sky-blue material of the particles.
    #[must_use]
    pub fn particle() -> Self {
        Self {
            color: hex_color(0x0087_ceeb),
            opacity: 0.6,
            shininess: 0.0,
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
            double_sided: false,
            lit: false,
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self::neuron()
    }
}

/// Deserializes a partial object on top of `base`: fields present in the
/// input win, the rest keep the values of `base`.
fn overlay<'de, D, T>(deserializer: D, base: T) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Serialize + DeserializeOwned,
{
    let patch = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(fields) = patch else {
        return Err(serde::de::Error::custom("expected an object"));
    };
    let mut merged = serde_json::to_value(base).map_err(serde::de::Error::custom)?;
    if let serde_json::Value::Object(target) = &mut merged {
        target.extend(fields);
    }
    serde_json::from_value(merged).map_err(serde::de::Error::custom)
}

fn key_light<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<DirectionalLightConfig, D::Error> {
    overlay(deserializer, DirectionalLightConfig::key())
}

fn back_light<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<DirectionalLightConfig, D::Error> {
    overlay(deserializer, DirectionalLightConfig::back())
}

fn particle_material<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<MaterialConfig, D::Error> {
    overlay(deserializer, MaterialConfig::particle())
}

fn ensure(condition: bool, name: &'static str, reason: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(NeuronError::invalid(name, reason))
    }
}

fn finite_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn valid_range(range: [f32; 2]) -> bool {
    finite_positive(range[0]) && range[1].is_finite() && range[0] <= range[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color(0x00ff_0000), Vec3::new(1.0, 0.0, 0.0));
        let c = hex_color(0x001a_3d5c);
        assert!((c.x - 26.0 / 255.0).abs() < 1e-6);
        assert!((c.y - 61.0 / 255.0).abs() < 1e-6);
        assert!((c.z - 92.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_defaults_are_valid() {
        Options::default().validate().expect("defaults should validate");
    }

    #[test]
    fn test_default_children_stay_above_branch_threshold() {
        let d = DendriteConfig::default();
        assert!(d.length_range[0] * d.length_scale > d.min_branch_length);
    }

    #[test]
    fn test_json_round_trip() {
        let mut options = Options::default();
        options.neuron.dendrites.count = 9;
        options.viewer.viewport.zoom_range = [2.0, 20.0];

        let json = options.to_json_string().unwrap();
        let parsed = Options::from_json_str(&json).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed = Options::from_json_str(r#"{ "neuron": { "soma": { "radius": 4.0 } } }"#)
            .unwrap();
        assert_eq!(parsed.neuron.soma.radius, 4.0);
        assert_eq!(parsed.neuron.soma.width_segments, 32);
        assert_eq!(parsed.neuron.dendrites, DendriteConfig::default());
        assert_eq!(parsed.viewer, ViewerOptions::default());
    }

    #[test]
    fn test_partial_light_uses_defaults() {
        let parsed = Options::from_json_str(
            r#"{ "viewer": { "lights": { "key": { "intensity": 2.0 }, "back": { "position": [0.0, -1.0, 0.0] } } } }"#,
        )
        .unwrap();
        let lights = &parsed.viewer.lights;
        assert_eq!(lights.key.intensity, 2.0);
        assert_eq!(lights.key.color, hex_color(0x0087_ceeb));
        assert_eq!(lights.key.position, Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(lights.back.position, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(lights.back.color, hex_color(0x0000_bfff));
        assert_eq!(lights.back.intensity, 0.8);
    }

    #[test]
    fn test_partial_particle_material_keeps_particle_defaults() {
        let parsed =
            Options::from_json_str(r#"{ "viewer": { "particle_material": { "opacity": 0.3 } } }"#)
                .unwrap();
        let material = &parsed.viewer.particle_material;
        assert_eq!(material.opacity, 0.3);
        assert!(!material.lit);
        assert_eq!(material.color, MaterialConfig::particle().color);
    }

    #[test]
    fn test_non_object_light_rejected() {
        assert!(Options::from_json_str(r#"{ "viewer": { "lights": { "key": 3 } } }"#).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Options::from_json_str(r#"{ "neuron": { "soma": { "radius": -1.0 } } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            NeuronError::InvalidParameter { name: "soma.radius", .. }
        ));

        let mut options = Options::default();
        options.viewer.viewport.zoom_range = [50.0, 5.0];
        assert!(options.validate().is_err());

        let mut options = Options::default();
        options.neuron.dendrites.length_scale = 1.0;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = Options::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, NeuronError::JsonError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Options::from_json_file("/nonexistent/neuroscope.json").unwrap_err();
        assert!(matches!(err, NeuronError::IoError(_)));
    }
}
