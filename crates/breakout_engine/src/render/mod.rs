//! Render hand-off
//!
//! The core does not draw. [`render`] walks a [`WorldSnapshot`] and hands one
//! [`DrawCall`] per graphics binding to a [`RenderAdapter`], which owns the
//! actual backend.

use crate::ecs::entity::EntityId;
use crate::ecs::snapshot::WorldSnapshot;
use crate::foundation::math::Mat4;

/// One mesh/material pair to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Owning entity
    pub entity: EntityId,
    /// Material asset key
    pub material: String,
    /// Model asset key
    pub model: String,
    /// World matrix
    pub transform: Mat4,
}

/// Renderer backend
pub trait RenderAdapter {
    /// Start of a frame; `version` is the snapshot version
    fn begin_frame(&mut self, _version: u64) {}

    /// Draw one binding
    fn draw(&mut self, call: &DrawCall);

    /// End of a frame
    fn end_frame(&mut self) {}
}

/// Adapter that records draw calls, for headless hosts and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    /// Version of the last frame begun
    pub version: u64,
    /// Calls of the last frame
    pub calls: Vec<DrawCall>,
    /// Frames completed
    pub frames: u64,
}

impl RenderAdapter for RecordingRenderer {
    fn begin_frame(&mut self, version: u64) {
        self.version = version;
        self.calls.clear();
    }

    fn draw(&mut self, call: &DrawCall) {
        self.calls.push(call.clone());
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}

/// Issue draw calls for every graphics binding, in snapshot order
///
/// Returns the number of calls issued.
pub fn render<R: RenderAdapter + ?Sized>(snapshot: &WorldSnapshot, adapter: &mut R) -> usize {
    adapter.begin_frame(snapshot.version());
    let mut issued = 0;
    for entity in snapshot.entities() {
        if entity.graphics.is_empty() {
            continue;
        }
        let transform = entity.world_transform.to_matrix();
        for graphics in &entity.graphics {
            adapter.draw(&DrawCall {
                entity: entity.id,
                material: graphics.material.clone(),
                model: graphics.model.clone(),
                transform,
            });
            issued += 1;
        }
    }
    adapter.end_frame();
    log::trace!("Frame {}: {issued} draw calls", snapshot.version());
    issued
}
