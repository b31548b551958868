//! Pointer drag state.

use crate::float::Float;
use crate::vec::Vec3;

/// Identifier of a pointer (mouse, pen, or one touch contact).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u32);

/// Whether the card is being held, and where it was grabbed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragState<F: Float> {
    Idle,
    Dragging {
        /// Pointer captured for exclusive routing while the drag lasts.
        pointer: PointerId,
        /// Grab point minus card position at grab time (world space).
        offset: Vec3<F>,
    },
}

impl<F: Float> Default for DragState<F> {
    fn default() -> Self {
        DragState::Idle
    }
}

impl<F: Float> DragState<F> {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn offset(&self) -> Option<Vec3<F>> {
        match self {
            DragState::Dragging { offset, .. } => Some(*offset),
            DragState::Idle => None,
        }
    }

    pub fn captured_pointer(&self) -> Option<PointerId> {
        match self {
            DragState::Dragging { pointer, .. } => Some(*pointer),
            DragState::Idle => None,
        }
    }

    /// Start (or restart) a drag. A second grab while already dragging
    /// replaces the first.
    pub fn grab(&mut self, pointer: PointerId, hit_point: Vec3<F>, card_position: Vec3<F>) {
        *self = DragState::Dragging { pointer, offset: hit_point - card_position };
    }

    /// End the drag. Returns the pointer whose capture should be released.
    pub fn release(&mut self) -> Option<PointerId> {
        let pointer = self.captured_pointer();
        *self = DragState::Idle;
        pointer
    }

    /// Card position that keeps the grab point under `pointer_world`.
    pub fn target(&self, pointer_world: Vec3<F>) -> Option<Vec3<F>> {
        self.offset().map(|offset| pointer_world - offset)
    }
}
