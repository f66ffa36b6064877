//! Pointer-driven orbit, wheel zoom and the emissive pulse.
//!
//! The controller owns all interaction state; input handlers write it and
//! [`ViewportController::tick`] reads it once per redraw.

use glam::{Vec2, Vec3};
use neuroscope_core::{PulseConfig, ViewerOptions, ViewportConfig};
use neuroscope_render::Camera;
use winit::event::MouseScrollDelta;

/// Interaction state written by input handlers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputState {
    /// Pointer position in normalized device coordinates, each axis in [-1, 1],
    /// +Y up.
    pub pointer: Vec2,
    /// Camera distance along +Z.
    pub distance: f32,
}

/// Per-frame values derived by [`ViewportController::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Camera position for this frame.
    pub camera_position: Vec3,
    /// Emissive intensity of the neuron material.
    pub emissive_intensity: f32,
}

/// Maps pointer and wheel input to camera placement.
#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    pulse: PulseConfig,
    state: InputState,
}

impl ViewportController {
    /// Creates a controller with the pointer centered and the camera at
    /// `initial_distance` (clamped to the zoom range).
    #[must_use]
    pub fn new(config: ViewportConfig, pulse: PulseConfig, initial_distance: f32) -> Self {
        let distance = initial_distance.max(config.zoom_range[0]).min(config.zoom_range[1]);
        Self {
            config,
            pulse,
            state: InputState {
                pointer: Vec2::ZERO,
                distance,
            },
        }
    }

    /// Creates a controller from viewer options.
    #[must_use]
    pub fn from_options(options: &ViewerOptions) -> Self {
        Self::new(
            options.viewport.clone(),
            options.pulse.clone(),
            options.camera.initial_position.z,
        )
    }

    /// Current interaction state.
    #[must_use]
    pub fn state(&self) -> InputState {
        self.state
    }

    /// Records a pointer position in window pixels (origin top-left).
    /// Ignored while the window has zero area.
    pub fn pointer_moved(&mut self, x: f64, y: f64, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let nx = x / f64::from(width) * 2.0 - 1.0;
        let ny = -(y / f64::from(height) * 2.0) + 1.0;
        self.state.pointer = Vec2::new(nx as f32, ny as f32);
    }

    /// Applies a wheel delta in pixels, positive meaning away from the scene
    /// (browser `deltaY` convention).
    pub fn scrolled(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        let [min, max] = self.config.zoom_range;
        let distance = self.state.distance + delta_y * self.config.zoom_sensitivity;
        self.state.distance = distance.max(min).min(max);
    }

    /// Applies a winit wheel event.
    pub fn scroll(&mut self, delta: MouseScrollDelta) {
        self.scrolled(wheel_delta_pixels(delta, self.config.pixels_per_line));
    }

    /// Matches the camera aspect ratio to a new window size.
    pub fn resized(&self, camera: &mut Camera, width: u32, height: u32) {
        if width > 0 && height > 0 {
            camera.set_aspect_ratio(width as f32 / height as f32);
        }
    }

    /// Places the camera for this frame and computes the emissive pulse.
    /// `time_secs` is wall-clock time in seconds.
    pub fn tick(&self, camera: &mut Camera, time_secs: f64) -> FrameState {
        let extent = self.config.orbit_extent;
        camera.position = Vec3::new(
            self.state.pointer.x * extent,
            self.state.pointer.y * extent,
            self.state.distance,
        );
        camera.look_at(Vec3::ZERO);

        FrameState {
            camera_position: camera.position,
            emissive_intensity: pulse_intensity(&self.pulse, time_secs),
        }
    }
}

/// Emissive intensity at `time_secs`: `base + sin(time * frequency) * amplitude`.
#[must_use]
pub fn pulse_intensity(pulse: &PulseConfig, time_secs: f64) -> f32 {
    // f64 keeps precision for epoch-sized timestamps
    let phase = time_secs * f64::from(pulse.frequency);
    pulse.base + (phase.sin() as f32) * pulse.amplitude
}

/// Converts a winit wheel delta to browser-style pixels.
///
/// winit reports scrolling toward the scene as positive, browsers as negative.
#[must_use]
pub fn wheel_delta_pixels(delta: MouseScrollDelta, pixels_per_line: f32) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * pixels_per_line,
        MouseScrollDelta::PixelDelta(position) => -(position.y as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use winit::dpi::PhysicalPosition;

    fn controller() -> ViewportController {
        ViewportController::from_options(&ViewerOptions::default())
    }

    #[test]
    fn test_initial_state() {
        let state = controller().state();
        assert_eq!(state.pointer, Vec2::ZERO);
        assert_eq!(state.distance, 15.0);
    }

    #[test]
    fn test_center_pointer_centers_camera() {
        let mut viewport = controller();
        viewport.pointer_moved(640.0, 360.0, 1280, 720);
        let mut camera = Camera::new(16.0 / 9.0);
        let frame = viewport.tick(&mut camera, 0.0);
        assert!(frame.camera_position.x.abs() < 1e-6);
        assert!(frame.camera_position.y.abs() < 1e-6);
        assert_eq!(frame.camera_position.z, 15.0);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_top_left_pointer() {
        let mut viewport = controller();
        viewport.pointer_moved(0.0, 0.0, 800, 600);
        let mut camera = Camera::new(1.0);
        let frame = viewport.tick(&mut camera, 0.0);
        assert_eq!(frame.camera_position, Vec3::new(-10.0, 10.0, 15.0));
    }

    #[test]
    fn test_zero_sized_window_ignored() {
        let mut viewport = controller();
        viewport.pointer_moved(10.0, 10.0, 0, 600);
        assert_eq!(viewport.state().pointer, Vec2::ZERO);
    }

    #[test]
    fn test_scroll_moves_camera() {
        let mut viewport = controller();
        viewport.scrolled(100.0);
        assert!((viewport.state().distance - 16.0).abs() < 1e-5);
        viewport.scrolled(-5000.0);
        assert_eq!(viewport.state().distance, 5.0);
        viewport.scrolled(f32::NAN);
        assert_eq!(viewport.state().distance, 5.0);
    }

    #[test]
    fn test_wheel_conversion() {
        // One notch toward the scene zooms in by one unit
        assert_eq!(wheel_delta_pixels(MouseScrollDelta::LineDelta(0.0, 1.0), 100.0), -100.0);
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -40.0));
        assert_eq!(wheel_delta_pixels(pixels, 100.0), 40.0);

        let mut viewport = controller();
        viewport.scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        assert!((viewport.state().distance - 14.0).abs() < 1e-5);
    }

    #[test]
    fn test_pulse() {
        let pulse = PulseConfig::default();
        assert!((pulse_intensity(&pulse, 0.0) - 0.3).abs() < 1e-6);
        assert!((pulse_intensity(&pulse, std::f64::consts::FRAC_PI_4) - 0.4).abs() < 1e-6);
        assert!((pulse_intensity(&pulse, 3.0 * std::f64::consts::FRAC_PI_4) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_resized_updates_aspect() {
        let viewport = controller();
        let mut camera = Camera::new(1.0);
        viewport.resized(&mut camera, 1920, 1080);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        viewport.resized(&mut camera, 0, 1080);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_zoom_stays_in_range(deltas in prop::collection::vec(-10_000.0f32..10_000.0, 0..50)) {
            let mut viewport = controller();
            for delta in deltas {
                viewport.scrolled(delta);
                let distance = viewport.state().distance;
                prop_assert!((5.0f32..=50.0).contains(&distance));
            }
        }

        #[test]
        fn prop_pointer_is_normalized(x in 0.0f64..=1280.0, y in 0.0f64..=720.0) {
            let mut viewport = controller();
            viewport.pointer_moved(x, y, 1280, 720);
            let pointer = viewport.state().pointer;
            prop_assert!(pointer.x.abs() <= 1.0 + 1e-6);
            prop_assert!(pointer.y.abs() <= 1.0 + 1e-6);
        }

        #[test]
        fn prop_pulse_bounded(t in 0.0f64..1.0e10) {
            let intensity = pulse_intensity(&PulseConfig::default(), t);
            prop_assert!((0.2f32 - 1e-6..=0.4f32 + 1e-6).contains(&intensity));
        }
    }
}
