//! Application window and event loop management.

mod input;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use winit::event_loop::EventLoop;
use winit::window::Window;

use neuroscope_core::{NeuronError, Result, ViewerOptions};
use neuroscope_render::RenderEngine;
use neuroscope_structures::NeuronModel;

use crate::viewport::ViewportController;

/// The viewer application state.
pub struct App {
    model: NeuronModel,
    options: ViewerOptions,
    window: Option<Arc<Window>>,
    engine: Option<RenderEngine>,
    viewport: ViewportController,
    /// First fatal error; the loop exits as soon as one is recorded.
    error: Option<NeuronError>,
}

impl App {
    /// Creates the application for an already generated model.
    #[must_use]
    pub fn new(model: NeuronModel, options: ViewerOptions) -> Self {
        let viewport = ViewportController::from_options(&options);
        Self {
            model,
            options,
            window: None,
            engine: None,
            viewport,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &winit::event_loop::ActiveEventLoop, error: NeuronError) {
        log::error!("{error}");
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }
}

/// Seconds since the Unix epoch.
fn wall_clock_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// Runs the viewer until its window is closed.
pub fn run_app(model: NeuronModel, options: ViewerOptions) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|e| NeuronError::Display(format!("no event loop: {e}")))?;
    let mut app = App::new(model, options);

    event_loop
        .run_app(&mut app)
        .map_err(|e| NeuronError::Display(format!("event loop error: {e}")))?;

    app.error.take().map_or(Ok(()), Err)
}
