//! Drag gesture tracking
//!
//! Pointer handlers report cumulative translation since the drag began; the
//! solver wants the displacement since the previous move. The tracker turns one
//! into the other and allows at most one active drag per rod.

use crate::consts::MOVE_THRESHOLD;

/// Identifier the platform assigns to a pointer (mouse = 1, one per touch)
pub type PointerId = i32;

/// Ephemeral state of one drag, owned by the interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub pointer: PointerId,
    pub rod: usize,
    pub bead: usize,
    /// Pointer coordinate along the rod when the drag began
    pub anchor: f32,
    /// Cumulative pointer translation since drag start
    pub translation: f32,
    /// Dragged bead's position when the drag began
    pub start_position: f32,
}

impl DragGesture {
    /// Whether the bead travelled far enough to count as a real move
    pub fn bead_moved(&self, final_position: f32) -> bool {
        (final_position - self.start_position).abs() > MOVE_THRESHOLD
    }
}

/// Active drags, at most one per rod
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    active: Vec<DragGesture>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag. Returns false if the rod is already being dragged or the
    /// pointer already owns a drag.
    pub fn begin(
        &mut self,
        pointer: PointerId,
        rod: usize,
        bead: usize,
        anchor: f32,
        start_position: f32,
    ) -> bool {
        if self
            .active
            .iter()
            .any(|g| g.rod == rod || g.pointer == pointer)
        {
            log::debug!("Rejected drag on rod {rod} from pointer {pointer}: rod busy");
            return false;
        }
        self.active.push(DragGesture {
            pointer,
            rod,
            bead,
            anchor,
            translation: 0.0,
            start_position,
        });
        true
    }

    /// Record the pointer's current coordinate along the rod
    pub fn track(&mut self, pointer: PointerId, coord: f32) -> Option<(DragGesture, f32)> {
        let anchor = self.active.iter().find(|g| g.pointer == pointer)?.anchor;
        self.update(pointer, coord - anchor)
    }

    /// Record a new cumulative translation. Returns the gesture and the
    /// incremental delta since the previous update.
    pub fn update(&mut self, pointer: PointerId, translation: f32) -> Option<(DragGesture, f32)> {
        let gesture = self.active.iter_mut().find(|g| g.pointer == pointer)?;
        let delta = translation - gesture.translation;
        gesture.translation = translation;
        Some((*gesture, delta))
    }

    /// Finish a drag, handing back its final state
    pub fn end(&mut self, pointer: PointerId) -> Option<DragGesture> {
        let idx = self.active.iter().position(|g| g.pointer == pointer)?;
        Some(self.active.swap_remove(idx))
    }

    pub fn cancel_all(&mut self) {
        self.active.clear();
    }

    pub fn is_dragging(&self, rod: usize) -> bool {
        self.active.iter().any(|g| g.rod == rod)
    }

    pub fn active(&self) -> &[DragGesture] {
        &self.active
    }
}
