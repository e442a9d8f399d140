//! Presentation Handle Pool
//!
//! Playback re-stages recorded transient entities through a pool of
//! reusable handles instead of allocating per frame: the pool grows on
//! demand and hides whatever a frame does not use. The renderer
//! collaborator draws the visible handles as-is.

use crate::game::effects::EntityKind;
use crate::game::fighter::Side;
use crate::replay::snapshot::EntitySnapshot;

/// One reusable presentation slot.
#[derive(Clone, Debug, Default)]
pub struct StageHandle {
    /// What the handle currently shows; `None` before first use.
    pub kind: Option<EntityKind>,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Presentation scale.
    pub scale: f64,
    /// Tint, when the entity carries one.
    pub color: Option<[u8; 3]>,
    /// Z-order.
    pub z: i32,
    /// Owning side, for props.
    pub side: Option<Side>,
    /// Whether the renderer should draw this handle.
    pub visible: bool,
}

/// Grow-on-demand pool of presentation handles.
#[derive(Clone, Debug, Default)]
pub struct PresentationPool {
    handles: Vec<StageHandle>,
}

impl PresentationPool {
    /// Empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage one frame's entities: reuse handles in order, grow when the
    /// frame needs more, hide the excess.
    pub fn apply(&mut self, entities: &[EntitySnapshot]) {
        if entities.len() > self.handles.len() {
            self.handles.resize_with(entities.len(), StageHandle::default);
        }

        for (handle, entity) in self.handles.iter_mut().zip(entities) {
            handle.kind = Some(entity.kind);
            handle.x = entity.x;
            handle.y = entity.y;
            handle.scale = entity.scale;
            handle.color = entity.color;
            handle.z = entity.z;
            handle.side = entity.side;
            handle.visible = true;
        }

        for handle in self.handles.iter_mut().skip(entities.len()) {
            handle.visible = false;
        }
    }

    /// Every handle, visible or not.
    pub fn handles(&self) -> &[StageHandle] {
        &self.handles
    }

    /// Handles currently staged.
    pub fn visible_count(&self) -> usize {
        self.handles.iter().filter(|h| h.visible).count()
    }
}
