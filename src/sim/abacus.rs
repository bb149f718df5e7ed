//! The abacus screen: a stack of horizontal rods
//!
//! Rods are laid out top to bottom starting at `origin`; beads slide along x.
//! Each rod is solved independently.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::gesture::{DragTracker, PointerId};
use super::rod::{LayoutError, Rod, RodLayout};
use crate::consts::BEAD_HEIGHT;
use crate::settings::BeadColor;

/// Something the surrounding screen may want to react to (sound, haptics)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbacusEvent {
    /// A drag finished with the bead noticeably displaced
    BeadMoved { rod: usize, bead: usize },
    /// A drag update was cut short by the track edge
    EdgeBump { rod: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Abacus {
    rods: Vec<Rod>,
    colors: Vec<BeadColor>,
    /// Top-left of the first rod's track
    pub origin: Vec2,
    /// Distance between rod centerlines
    pub rod_gap: f32,
    #[serde(skip)]
    drags: DragTracker,
}

impl Abacus {
    pub fn new(
        rod_count: usize,
        layout: RodLayout,
        origin: Vec2,
        rod_gap: f32,
    ) -> Result<Self, LayoutError> {
        let rods = (0..rod_count)
            .map(|_| Rod::new(layout))
            .collect::<Result<Vec<_>, _>>()?;
        let colors = (0..rod_count).map(BeadColor::for_rod).collect();
        Ok(Self {
            rods,
            colors,
            origin,
            rod_gap,
            drags: DragTracker::new(),
        })
    }

    pub fn rods(&self) -> &[Rod] {
        &self.rods
    }

    pub fn rod(&self, index: usize) -> Option<&Rod> {
        self.rods.get(index)
    }

    pub fn color(&self, rod: usize) -> BeadColor {
        self.colors.get(rod).copied().unwrap_or_default()
    }

    pub fn set_rod_color(&mut self, rod: usize, color: BeadColor) {
        if let Some(c) = self.colors.get_mut(rod) {
            *c = color;
        }
    }

    /// Vertical centre of a rod in layout space
    pub fn rod_y(&self, rod: usize) -> f32 {
        self.origin.y + rod as f32 * self.rod_gap
    }

    /// Find the bead under a layout-space point
    pub fn hit_test(&self, point: Vec2) -> Option<(usize, usize)> {
        let half_height = BEAD_HEIGHT / 2.0;
        self.rods.iter().enumerate().find_map(|(r, rod)| {
            if (point.y - self.rod_y(r)).abs() > half_height {
                return None;
            }
            rod.bead_at(point.x - self.origin.x).map(|b| (r, b))
        })
    }

    /// Start dragging whatever bead is under `point`. Returns true if a drag began.
    pub fn pointer_down(&mut self, pointer: PointerId, point: Vec2) -> bool {
        let Some((rod, bead)) = self.hit_test(point) else {
            return false;
        };
        let Some(start) = self.rods[rod].position(bead) else {
            return false;
        };
        self.drags.begin(pointer, rod, bead, point.x, start)
    }

    /// Feed a pointer move into the solver
    pub fn pointer_move(&mut self, pointer: PointerId, point: Vec2) -> Option<AbacusEvent> {
        let (gesture, delta) = self.drags.track(pointer, point.x)?;
        let rod = self.rods.get_mut(gesture.rod)?;
        let outcome = rod.apply_drag(gesture.bead, delta);
        // Only report the first bump, not every move spent pressing on the edge
        (outcome.hit_edge && outcome.moved > 0).then_some(AbacusEvent::EdgeBump { rod: gesture.rod })
    }

    /// Finish a drag; reports a move if the bead travelled past the threshold
    pub fn pointer_up(&mut self, pointer: PointerId) -> Option<AbacusEvent> {
        let gesture = self.drags.end(pointer)?;
        let final_position = self.rods.get(gesture.rod)?.position(gesture.bead)?;
        if gesture.bead_moved(final_position) {
            log::debug!(
                "Bead {} on rod {} moved {:.1} units",
                gesture.bead,
                gesture.rod,
                final_position - gesture.start_position
            );
            Some(AbacusEvent::BeadMoved {
                rod: gesture.rod,
                bead: gesture.bead,
            })
        } else {
            None
        }
    }

    /// Abandon one pointer's drag; beads stay where they are and nothing is reported
    pub fn pointer_cancel(&mut self, pointer: PointerId) {
        if let Some(gesture) = self.drags.end(pointer) {
            log::debug!("Drag on rod {} cancelled", gesture.rod);
        }
    }

    pub fn is_dragging(&self) -> bool {
        !self.drags.active().is_empty()
    }

    /// Drop every active drag without reporting moves
    pub fn cancel_drags(&mut self) {
        self.drags.cancel_all();
    }

    /// Return every bead to its resting position and drop active drags
    pub fn reset(&mut self) {
        self.cancel_drags();
        for rod in &mut self.rods {
            rod.reset();
        }
        log::info!("Abacus reset");
    }

    /// Counted beads on one rod
    pub fn counted(&self, rod: usize) -> usize {
        self.rods.get(rod).map(Rod::counted).unwrap_or(0)
    }

    /// Counted beads across all rods
    pub fn total(&self) -> usize {
        self.rods.iter().map(Rod::counted).sum()
    }
}
