//! Logging render adapter
//!
//! The headless game has no window. Frames are counted and draw calls go to
//! the `trace` log so a run can still be inspected.

use breakout_engine::render::{DrawCall, RenderAdapter};

/// Render adapter writing draw calls to the log
#[derive(Debug, Clone, Default)]
pub struct LoggingRenderer {
    frames: u64,
    calls_this_frame: usize,
    total_calls: u64,
}

impl LoggingRenderer {
    /// Create a renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames completed
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw calls over all frames
    pub fn total_calls(&self) -> u64 {
        self.total_calls
    }
}

impl RenderAdapter for LoggingRenderer {
    fn begin_frame(&mut self, version: u64) {
        self.calls_this_frame = 0;
        log::trace!("Frame {version} begin");
    }

    fn draw(&mut self, call: &DrawCall) {
        self.calls_this_frame += 1;
        log::trace!(
            "  {:?}: {} / {} at ({:.1}, {:.1})",
            call.entity,
            call.model,
            call.material,
            call.transform[(0, 3)],
            call.transform[(1, 3)]
        );
    }

    fn end_frame(&mut self) {
        self.frames += 1;
        self.total_calls += self.calls_this_frame as u64;
    }
}
