//! Application trait and frame loop

use crate::binding::OwnerKey;
use crate::core::error::EngineError;
use crate::engine::{Engine, FrameReport, FrameStatus};
use crate::render::{DisplaySurface, RenderSink};

/// Application lifecycle trait
///
/// Implement this trait to build a scene on top of the engine and drive it
/// with [`run_frames`].
pub trait Application {
    /// Host content stored beside the graph
    type Content: 'static;

    /// Owner key used by bindings
    type Owner: OwnerKey;

    /// Build the scene
    ///
    /// Called once before the first frame. Create nodes, register bindings and
    /// animations here.
    fn setup(&mut self, engine: &mut Engine<Self::Content, Self::Owner>) -> Result<(), EngineError>;

    /// Called before every frame; queue control-surface writes here
    fn before_frame(&mut self, _engine: &mut Engine<Self::Content, Self::Owner>, _frame: u32) {}

    /// Called after every frame with its outcome
    fn after_frame(
        &mut self,
        _engine: &mut Engine<Self::Content, Self::Owner>,
        _report: &FrameReport<Self::Owner>,
    ) {
    }

    /// Called once when the loop ends
    fn cleanup(&mut self, _engine: &mut Engine<Self::Content, Self::Owner>) {}
}

/// Totals over a [`run_frames`] loop
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Frames that ran
    pub rendered: u32,
    /// Frames skipped because the engine was stopped
    pub skipped: u32,
    /// Times the backing surface was resized
    pub resizes: u32,
    /// Items handed to the renderer over all frames
    pub draw_items: usize,
    /// Animation and write failures reported
    pub failures: usize,
    /// Simulation time of the last frame
    pub final_time: f32,
}

/// Set up `app` and run `frames` frames spaced `frame_ms` apart
///
/// The engine is started before the first frame. The loop ends early if the
/// application stops the engine from a hook.
pub fn run_frames<A: Application>(
    app: &mut A,
    engine: &mut Engine<A::Content, A::Owner>,
    display: &mut dyn DisplaySurface,
    renderer: &mut dyn RenderSink,
    frames: u32,
    frame_ms: f64,
) -> Result<RunSummary, EngineError> {
    app.setup(engine)?;
    log::info!(
        "Running {} frame(s) at {:.2} ms over {} node(s)",
        frames,
        frame_ms,
        engine.graph().len()
    );

    engine.start();
    let mut summary = RunSummary::default();

    for frame in 0..frames {
        app.before_frame(engine, frame);

        let report = engine.frame(f64::from(frame) * frame_ms, display, renderer);
        match report.status {
            FrameStatus::Rendered => summary.rendered += 1,
            FrameStatus::Stopped => summary.skipped += 1,
        }
        if report.resized {
            summary.resizes += 1;
        }
        summary.draw_items += report.draw_count;
        summary.failures += report.tick.failures.len() + report.write_failures.len();
        summary.final_time = report.time;

        app.after_frame(engine, &report);

        if report.status == FrameStatus::Stopped {
            log::info!("Engine stopped after {} frame(s)", frame + 1);
            break;
        }
    }

    app.cleanup(engine);
    engine.stop();
    Ok(summary)
}
