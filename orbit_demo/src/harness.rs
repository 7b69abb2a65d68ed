//! Headless collaborators and the shared demo runner

use std::cell::Cell;
use std::path::Path;

use orbit_engine::config::Config;
use orbit_engine::foundation::logging;
use orbit_engine::prelude::*;
use thiserror::Error;

/// Demo-level errors
#[derive(Error, Debug)]
pub enum DemoError {
    /// Engine error propagated to the demo
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Display whose size changes once after a number of frames
///
/// Stands in for a browser canvas being resized by its page.
#[derive(Debug)]
pub struct SimulatedDisplay {
    initial: (f32, f32),
    resized: (f32, f32),
    pixel_ratio: f32,
    switch_after: u32,
    queries: Cell<u32>,
    backing: (u32, u32),
}

impl SimulatedDisplay {
    /// Display that reports `initial` for `switch_after` frames, then `resized`
    pub fn new(initial: (f32, f32), resized: (f32, f32), pixel_ratio: f32, switch_after: u32) -> Self {
        Self {
            initial,
            resized,
            pixel_ratio,
            switch_after,
            queries: Cell::new(0),
            backing: (0, 0),
        }
    }

    /// Display sized from configuration that doubles its width halfway through
    pub fn from_config(config: &EngineConfig) -> Self {
        let viewport = &config.viewport;
        Self::new(
            (viewport.width, viewport.height),
            (viewport.width * 2.0, viewport.height),
            viewport.pixel_ratio,
            config.frame_budget / 2,
        )
    }

    /// Last backing size the engine asked for
    pub fn backing(&self) -> (u32, u32) {
        self.backing
    }
}

impl DisplaySurface for SimulatedDisplay {
    fn display_size(&self) -> (f32, f32) {
        let queries = self.queries.get();
        self.queries.set(queries + 1);
        if queries < self.switch_after {
            self.initial
        } else {
            self.resized
        }
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn resize_backing(&mut self, width: u32, height: u32) {
        log::info!("Backing surface resized to {}x{}", width, height);
        self.backing = (width, height);
    }
}

/// Renderer that logs what it would draw
#[derive(Debug, Default)]
pub struct LoggingRenderer {
    frames: u64,
    last_draw_count: usize,
    uploaded_bytes: usize,
    log_interval: u64,
}

impl LoggingRenderer {
    /// Log a frame summary every `log_interval` frames
    pub fn new(log_interval: u32) -> Self {
        Self {
            log_interval: u64::from(log_interval),
            ..Self::default()
        }
    }

    /// Frames received
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Items in the last frame
    pub fn last_draw_count(&self) -> usize {
        self.last_draw_count
    }

    /// Instance bytes prepared over all frames
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }
}

impl RenderSink for LoggingRenderer {
    fn render(&mut self, frame: &FramePacket<'_>) {
        self.frames += 1;
        self.last_draw_count = frame.items.len();
        self.uploaded_bytes += frame.instance_bytes().len();

        if self.log_interval > 0 && self.frames % self.log_interval == 0 {
            let names: Vec<&str> = frame.sorted_items().iter().map(|item| item.name).collect();
            log::debug!(
                "t={:.2}s {}x{}: drawing {:?}",
                frame.time,
                frame.viewport.backing_width(),
                frame.viewport.backing_height(),
                names
            );
        }
    }
}

/// Load the configuration named on the command line, or the defaults
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, DemoError> {
    match path {
        Some(path) => {
            let config = EngineConfig::load_from_file(path)?;
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Load configuration, initialise logging and run `app` for the frame budget
pub fn run_demo<A: Application>(
    name: &str,
    app: &mut A,
    content: A::Content,
    config_path: Option<&Path>,
) -> Result<RunSummary, DemoError> {
    let config = load_config(config_path)?;
    logging::init_from_config(&config);
    log::info!("Starting {} demo", name);

    let mut display = SimulatedDisplay::from_config(&config);
    let mut renderer = LoggingRenderer::new(config.stats_interval);
    let frames = config.frame_budget;
    let mut engine = Engine::new(config, content)?;

    let summary = run_frames(app, &mut engine, &mut display, &mut renderer, frames, 1000.0 / 60.0)?;

    log::info!(
        "{} finished: {} frame(s), {} resize(s), {} draw item(s), {} failure(s), {:.2}s simulated",
        name,
        summary.rendered,
        summary.resizes,
        summary.draw_items,
        summary.failures,
        summary.final_time
    );
    log::info!(
        "Backing surface {}x{}, {:.1} fps average, {} instance byte(s) prepared",
        display.backing().0,
        display.backing().1,
        engine.stats().fps(),
        renderer.uploaded_bytes()
    );
    Ok(summary)
}
