//! Window event handling.

use std::sync::Arc;

use pollster::FutureExt;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use neuroscope_core::NeuronError;
use neuroscope_render::{RenderEngine, RenderError};

use super::{wall_clock_secs, App};
use crate::scene::upload_model;

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let [width, height] = self.options.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(self.options.window_title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, NeuronError::Display(format!("failed to create window: {e}")));
                return;
            }
        };

        let engine = RenderEngine::new_windowed(window.clone(), &self.options).block_on();
        let mut engine = match engine {
            Ok(engine) => engine,
            Err(e) => {
                self.fail(
                    event_loop,
                    NeuronError::RenderError(format!("failed to create render engine: {e}")),
                );
                return;
            }
        };

        upload_model(&mut engine, &self.model);
        let size = window.inner_size();
        self.viewport
            .resized(&mut engine.camera, size.width, size.height);

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                    self.viewport
                        .resized(&mut engine.camera, size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.viewport
                        .pointer_moved(position.x, position.y, size.width, size.height);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.viewport.scroll(delta);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut engine) = self.engine.take() {
            engine.release_scene();
        }
        self.window = None;
        log::info!("viewer closed");
    }
}

impl App {
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(engine) = &mut self.engine else {
            return;
        };

        let frame = self.viewport.tick(&mut engine.camera, wall_clock_secs());
        engine.set_emissive_intensity(frame.emissive_intensity);

        match engine.render_frame() {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => log::debug!("surface reconfigured, frame skipped"),
            Err(RenderError::OutOfMemory) => {
                self.fail(
                    event_loop,
                    NeuronError::RenderError(RenderError::OutOfMemory.to_string()),
                );
                return;
            }
            Err(e) => log::warn!("frame skipped: {e}"),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
