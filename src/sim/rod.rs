//! Bead rods and the drag constraint solver
//!
//! A rod is a 1-D track holding an ordered run of equal-width beads. Dragging a
//! bead moves it along the track; neighbours in the drag direction are pushed
//! (or block it) so that beads never overlap and never leave the track.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How a dragged bead interacts with the neighbour it runs into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactMode {
    /// Neighbours are shoved along ahead of the dragged bead
    #[default]
    Push,
    /// The dragged bead stops on contact; neighbours never move
    Block,
}

/// Geometry of a single rod
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RodLayout {
    pub bead_count: usize,
    pub bead_width: f32,
    /// Minimum gap between adjacent bead edges
    pub spacing: f32,
    pub track_length: f32,
    #[serde(default)]
    pub contact: ContactMode,
}

impl Default for RodLayout {
    fn default() -> Self {
        Self {
            bead_count: BEADS_PER_ROD,
            bead_width: BEAD_WIDTH,
            spacing: BEAD_SPACING,
            track_length: TRACK_LENGTH,
            contact: ContactMode::Push,
        }
    }
}

impl RodLayout {
    /// Largest legal bead position
    #[inline]
    pub fn max_position(&self) -> f32 {
        self.track_length - self.bead_width
    }

    /// Where a bead rests when pressed against the far side of a bead at `p`
    #[inline]
    pub fn after(&self, p: f32) -> f32 {
        p + self.bead_width + self.spacing
    }

    /// Largest position whose `after` does not pass `p`
    ///
    /// `after` rounds, so plain subtraction can land a few ulps off in
    /// either direction; the result is nudged until it is exact.
    pub fn before(&self, p: f32) -> f32 {
        let mut c = p - self.bead_width - self.spacing;
        if !c.is_finite() {
            return c;
        }
        while self.after(c) > p {
            c = next_down(c);
        }
        while self.after(next_up(c)) <= p {
            c = next_up(c);
        }
        c
    }

    /// Resting position of bead `index` (all beads packed against the start)
    pub fn initial_position(&self, index: usize) -> f32 {
        (0..index).fold(0.0, |p, _| self.after(p))
    }

    /// Track length taken up by all beads packed together
    pub fn packed_length(&self) -> f32 {
        match self.bead_count {
            0 => 0.0,
            n => self.initial_position(n - 1) + self.bead_width,
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let fields = [self.bead_width, self.spacing, self.track_length];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(LayoutError::NonFinite);
        }
        if fields.iter().any(|v| *v < 0.0) {
            return Err(LayoutError::Negative);
        }
        if let Some(last) = self.bead_count.checked_sub(1)
            && self.initial_position(last) > self.max_position()
        {
            return Err(LayoutError::NoRoom {
                needed: self.packed_length(),
                track_length: self.track_length,
            });
        }
        Ok(())
    }
}

/// Rejected rod construction
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    NonFinite,
    Negative,
    /// Packed beads are longer than the track
    NoRoom { needed: f32, track_length: f32 },
    /// Supplied positions don't match the bead count
    CountMismatch { expected: usize, got: usize },
    /// Bead `index` sits outside the track
    OutOfBounds { index: usize },
    /// Bead `index` overlaps bead `index + 1`
    Overlap { index: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::NonFinite => write!(f, "rod layout contains a non-finite value"),
            LayoutError::Negative => write!(f, "rod layout contains a negative length"),
            LayoutError::NoRoom {
                needed,
                track_length,
            } => write!(
                f,
                "beads need {needed} units but the track is only {track_length}"
            ),
            LayoutError::CountMismatch { expected, got } => {
                write!(f, "expected {expected} bead positions, got {got}")
            }
            LayoutError::OutOfBounds { index } => write!(f, "bead {index} is off the track"),
            LayoutError::Overlap { index } => {
                write!(f, "bead {index} overlaps bead {}", index + 1)
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// A bead on a rod. The index is fixed for the bead's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bead {
    pub index: usize,
    /// Offset of the bead's leading edge from the track start
    pub position: f32,
}

/// What a single `apply_drag` call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragOutcome {
    /// Number of beads whose position changed
    pub moved: usize,
    /// The proposal was cut short by the track edge (or a chain packed against it)
    pub hit_edge: bool,
}

/// An ordered run of beads on a 1-D track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rod {
    layout: RodLayout,
    beads: Vec<Bead>,
}

impl Rod {
    /// Create a rod with every bead at its resting position
    pub fn new(layout: RodLayout) -> Result<Self, LayoutError> {
        layout.validate()?;
        let mut rod = Self {
            layout,
            beads: (0..layout.bead_count)
                .map(|index| Bead {
                    index,
                    position: 0.0,
                })
                .collect(),
        };
        rod.reset();
        Ok(rod)
    }

    /// Create a rod with explicit positions, checking bounds and spacing
    pub fn with_positions(layout: RodLayout, positions: &[f32]) -> Result<Self, LayoutError> {
        layout.validate()?;
        if positions.len() != layout.bead_count {
            return Err(LayoutError::CountMismatch {
                expected: layout.bead_count,
                got: positions.len(),
            });
        }
        for (index, &p) in positions.iter().enumerate() {
            if !p.is_finite() || p < 0.0 || p > layout.max_position() {
                return Err(LayoutError::OutOfBounds { index });
            }
        }
        for (index, pair) in positions.windows(2).enumerate() {
            if layout.after(pair[0]) > pair[1] {
                return Err(LayoutError::Overlap { index });
            }
        }
        let beads = positions
            .iter()
            .enumerate()
            .map(|(index, &position)| Bead { index, position })
            .collect();
        Ok(Self { layout, beads })
    }

    pub fn layout(&self) -> &RodLayout {
        &self.layout
    }

    pub fn beads(&self) -> &[Bead] {
        &self.beads
    }

    pub fn len(&self) -> usize {
        self.beads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beads.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<f32> {
        self.beads.get(index).map(|b| b.position)
    }

    pub fn positions(&self) -> impl Iterator<Item = f32> + '_ {
        self.beads.iter().map(|b| b.position)
    }

    /// Put every bead back at its resting position
    pub fn reset(&mut self) {
        let mut p = 0.0;
        for bead in &mut self.beads {
            bead.position = p;
            p = self.layout.after(p);
        }
    }

    /// Index of the bead covering `offset` along the track, if any
    pub fn bead_at(&self, offset: f32) -> Option<usize> {
        let width = self.layout.bead_width;
        self.beads
            .iter()
            .find(|b| offset >= b.position && offset <= b.position + width)
            .map(|b| b.index)
    }

    /// Beads whose centre is past the middle of the track
    pub fn counted(&self) -> usize {
        let mid = self.layout.track_length / 2.0;
        let half = self.layout.bead_width / 2.0;
        self.beads
            .iter()
            .filter(|b| b.position + half > mid)
            .count()
    }

    /// Move bead `index` by `delta` (displacement since the previous pointer
    /// move), resolving contact with the beads ahead of it.
    ///
    /// Only a contiguous run starting at `index` and extending in the drag
    /// direction changes. Zero or non-finite deltas and out-of-range indices
    /// leave the rod untouched.
    pub fn apply_drag(&mut self, index: usize, delta: f32) -> DragOutcome {
        if !delta.is_finite() || delta == 0.0 || index >= self.beads.len() {
            return DragOutcome::default();
        }
        match self.layout.contact {
            ContactMode::Push => self.push_drag(index, delta),
            ContactMode::Block => self.block_drag(index, delta),
        }
    }

    fn push_drag(&mut self, index: usize, delta: f32) -> DragOutcome {
        let layout = self.layout;
        let n = self.beads.len();
        let current = self.beads[index].position;
        let unclamped = current + delta;

        // Everything ahead of the dragged bead has to fit between it and the edge
        let (proposed, hit_edge) = if delta > 0.0 {
            let bound = (index + 1..n).fold(layout.max_position(), |p, _| layout.before(p));
            if unclamped > bound {
                (bound, true)
            } else {
                (unclamped, false)
            }
        } else {
            let bound = layout.initial_position(index);
            if unclamped < bound {
                (bound, true)
            } else {
                (unclamped, false)
            }
        };

        let mut moved = 0;
        if proposed != current {
            self.beads[index].position = proposed;
            moved += 1;
        }

        if delta > 0.0 {
            for i in index + 1..n {
                let contact = layout.after(self.beads[i - 1].position);
                if self.beads[i].position >= contact {
                    break;
                }
                self.beads[i].position = contact;
                moved += 1;
            }
        } else {
            for i in (0..index).rev() {
                let contact = layout.before(self.beads[i + 1].position);
                if self.beads[i].position <= contact {
                    break;
                }
                self.beads[i].position = contact;
                moved += 1;
            }
        }

        DragOutcome { moved, hit_edge }
    }

    fn block_drag(&mut self, index: usize, delta: f32) -> DragOutcome {
        let layout = self.layout;
        let current = self.beads[index].position;
        let unclamped = current + delta;
        let mut proposed = unclamped.clamp(0.0, layout.max_position());
        let hit_edge = proposed != unclamped;

        // Stop on contact, and never let the stop drag the bead backwards
        if delta > 0.0 {
            if let Some(next) = self.beads.get(index + 1) {
                proposed = proposed.min(layout.before(next.position));
            }
            proposed = proposed.max(current);
        } else {
            if let Some(prev) = index.checked_sub(1).map(|i| self.beads[i]) {
                proposed = proposed.max(layout.after(prev.position));
            }
            proposed = proposed.min(current);
        }

        if proposed == current {
            return DragOutcome { moved: 0, hit_edge };
        }
        self.beads[index].position = proposed;
        DragOutcome { moved: 1, hit_edge }
    }
}

/// Next representable value towards +inf
fn next_up(x: f32) -> f32 {
    if x.is_nan() || x == f32::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f32::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f32::from_bits(bits + 1)
    } else {
        f32::from_bits(bits - 1)
    }
}

/// Next representable value towards -inf
fn next_down(x: f32) -> f32 {
    -next_up(-x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn layout(count: usize, contact: ContactMode) -> RodLayout {
        RodLayout {
            bead_count: count,
            bead_width: 20.0,
            spacing: 2.0,
            track_length: 400.0,
            contact,
        }
    }

    fn assert_invariants(rod: &Rod) {
        let l = rod.layout();
        for (i, bead) in rod.beads().iter().enumerate() {
            assert_eq!(bead.index, i);
            assert!(bead.position >= 0.0, "bead {i} below 0: {}", bead.position);
            assert!(
                bead.position <= l.max_position(),
                "bead {i} past edge: {}",
                bead.position
            );
        }
        for pair in rod.beads().windows(2) {
            assert!(
                pair[0].position + l.bead_width + l.spacing <= pair[1].position,
                "beads {} and {} overlap: {} / {}",
                pair[0].index,
                pair[1].index,
                pair[0].position,
                pair[1].position
            );
        }
    }

    #[test]
    fn test_initial_positions() {
        let rod = Rod::new(layout(10, ContactMode::Push)).unwrap();
        let expected: Vec<f32> = (0..10).map(|i| i as f32 * 22.0).collect();
        assert_eq!(rod.positions().collect::<Vec<_>>(), expected);
        assert_eq!(rod.position(9), Some(198.0));
    }

    #[test]
    fn test_layout_rejects_overfull_track() {
        let mut l = layout(10, ContactMode::Push);
        l.track_length = 100.0;
        assert!(matches!(Rod::new(l), Err(LayoutError::NoRoom { .. })));

        l.track_length = f32::NAN;
        assert_eq!(Rod::new(l).unwrap_err(), LayoutError::NonFinite);
    }

    #[test]
    fn test_with_positions_validates() {
        let l = layout(3, ContactMode::Push);
        assert!(Rod::with_positions(l, &[0.0, 22.0, 100.0]).is_ok());
        assert_eq!(
            Rod::with_positions(l, &[0.0, 21.0, 100.0]).unwrap_err(),
            LayoutError::Overlap { index: 0 }
        );
        assert_eq!(
            Rod::with_positions(l, &[0.0, 22.0, 390.0]).unwrap_err(),
            LayoutError::OutOfBounds { index: 2 }
        );
        assert_eq!(
            Rod::with_positions(l, &[0.0]).unwrap_err(),
            LayoutError::CountMismatch {
                expected: 3,
                got: 1
            }
        );
    }

    #[test]
    fn test_zero_delta_is_noop() {
        for mode in [ContactMode::Push, ContactMode::Block] {
            let mut rod = Rod::with_positions(layout(3, mode), &[10.0, 100.0, 200.0]).unwrap();
            let before: Vec<f32> = rod.positions().collect();
            let outcome = rod.apply_drag(1, 0.0);
            assert_eq!(outcome, DragOutcome::default());
            assert_eq!(rod.positions().collect::<Vec<_>>(), before);
        }
    }

    #[test]
    fn test_non_finite_and_out_of_range_are_noops() {
        let mut rod = Rod::new(layout(3, ContactMode::Push)).unwrap();
        assert_eq!(rod.apply_drag(0, f32::NAN), DragOutcome::default());
        assert_eq!(rod.apply_drag(0, f32::INFINITY), DragOutcome::default());
        assert_eq!(rod.apply_drag(7, 10.0), DragOutcome::default());
        assert_eq!(rod.positions().collect::<Vec<_>>(), vec![0.0, 22.0, 44.0]);
    }

    #[test]
    fn test_push_moves_packed_chain_together() {
        let mut rod = Rod::new(layout(3, ContactMode::Push)).unwrap();
        let outcome = rod.apply_drag(0, 100.0);
        assert_eq!(outcome.moved, 3);
        assert!(!outcome.hit_edge);
        assert_eq!(rod.positions().collect::<Vec<_>>(), vec![100.0, 122.0, 144.0]);
        assert_invariants(&rod);
    }

    #[test]
    fn test_push_chain_stops_when_far_bead_hits_edge() {
        let mut rod = Rod::new(layout(3, ContactMode::Push)).unwrap();
        let outcome = rod.apply_drag(0, 1000.0);
        assert!(outcome.hit_edge);
        assert_eq!(rod.positions().collect::<Vec<_>>(), vec![336.0, 358.0, 380.0]);

        // Further pushing does nothing
        let outcome = rod.apply_drag(0, 50.0);
        assert_eq!(outcome.moved, 0);
        assert!(outcome.hit_edge);
        assert_eq!(rod.position(0), Some(336.0));
    }

    #[test]
    fn test_push_only_touches_beads_in_contact() {
        let mut rod = Rod::with_positions(layout(4, ContactMode::Push), &[0.0, 30.0, 200.0, 300.0])
            .unwrap();
        rod.apply_drag(0, 20.0);
        // Bead 0 at 20 pushes bead 1 to 42; bead 2 is far away
        assert_eq!(rod.positions().collect::<Vec<_>>(), vec![20.0, 42.0, 200.0, 300.0]);
        assert_invariants(&rod);
    }

    #[test]
    fn test_push_backward() {
        let mut rod = Rod::with_positions(layout(3, ContactMode::Push), &[100.0, 122.0, 144.0])
            .unwrap();
        let outcome = rod.apply_drag(2, -50.0);
        assert_eq!(outcome.moved, 3);
        assert_eq!(rod.positions().collect::<Vec<_>>(), vec![50.0, 72.0, 94.0]);

        let outcome = rod.apply_drag(2, -500.0);
        assert!(outcome.hit_edge);
        assert_eq!(rod.positions().collect::<Vec<_>>(), vec![0.0, 22.0, 44.0]);
    }

    #[test]
    fn test_last_bead_clamps_to_track_edge() {
        for mode in [ContactMode::Push, ContactMode::Block] {
            let mut rod = Rod::new(layout(10, mode)).unwrap();
            let outcome = rod.apply_drag(9, 10_000.0);
            assert!(outcome.hit_edge);
            assert_eq!(rod.position(9), Some(380.0));
            assert_invariants(&rod);
        }
    }

    #[test]
    fn test_first_bead_leftward_only_clamps() {
        for mode in [ContactMode::Push, ContactMode::Block] {
            let mut rod = Rod::with_positions(layout(3, mode), &[10.0, 100.0, 200.0]).unwrap();
            let outcome = rod.apply_drag(0, -50.0);
            assert!(outcome.hit_edge);
            assert_eq!(rod.positions().collect::<Vec<_>>(), vec![0.0, 100.0, 200.0]);
        }
    }

    #[test]
    fn test_block_packed_rod_resists_forward_drag() {
        // 10 beads, width 20, spacing 2, track 400: bead 1 sits exactly at the
        // contact distance, so bead 0 cannot move at all.
        let mut rod = Rod::new(layout(10, ContactMode::Block)).unwrap();
        let outcome = rod.apply_drag(0, 500.0);
        assert_eq!(outcome.moved, 0);
        assert_eq!(rod.position(0), Some(0.0));
        assert_eq!(rod.position(1), Some(22.0));
        assert_invariants(&rod);
    }

    #[test]
    fn test_block_stops_at_neighbour() {
        let mut rod = Rod::with_positions(layout(3, ContactMode::Block), &[0.0, 100.0, 200.0])
            .unwrap();
        let outcome = rod.apply_drag(0, 150.0);
        assert_eq!(outcome.moved, 1);
        assert_eq!(rod.positions().collect::<Vec<_>>(), vec![78.0, 100.0, 200.0]);

        rod.apply_drag(1, -500.0);
        assert_eq!(rod.position(1), Some(100.0));
    }

    #[test]
    fn test_single_and_empty_rods() {
        let mut rod = Rod::new(layout(1, ContactMode::Push)).unwrap();
        rod.apply_drag(0, 1000.0);
        assert_eq!(rod.position(0), Some(380.0));
        rod.apply_drag(0, -1000.0);
        assert_eq!(rod.position(0), Some(0.0));

        let mut empty = Rod::new(layout(0, ContactMode::Push)).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.apply_drag(0, 10.0), DragOutcome::default());
    }

    #[test]
    fn test_reset_restores_initial_positions() {
        let mut rod = Rod::new(layout(10, ContactMode::Push)).unwrap();
        rod.apply_drag(3, 120.0);
        rod.apply_drag(9, 40.0);
        rod.reset();
        for (i, p) in rod.positions().enumerate() {
            assert_eq!(p, i as f32 * 22.0);
        }
    }

    #[test]
    fn test_bead_at_and_counted() {
        let mut rod = Rod::new(layout(10, ContactMode::Push)).unwrap();
        assert_eq!(rod.bead_at(5.0), Some(0));
        assert_eq!(rod.bead_at(21.0), None);
        assert_eq!(rod.bead_at(23.0), Some(1));
        assert_eq!(rod.counted(), 0);

        rod.apply_drag(9, 1000.0);
        rod.apply_drag(8, 1000.0);
        assert_eq!(rod.counted(), 2);
    }

    #[test]
    fn test_before_is_exact_inverse_of_after() {
        let l = RodLayout {
            bead_width: 20.3,
            spacing: 1.7,
            ..layout(10, ContactMode::Push)
        };
        for p in [22.0f32, 37.1, 100.0, 257.77, 379.7] {
            let c = l.before(p);
            assert!(l.after(c) <= p);
            assert!(l.after(next_up(c)) > p);
        }
    }

    #[test]
    fn test_block_at_contact_does_not_creep_back() {
        let l = RodLayout {
            bead_width: 20.3,
            spacing: 1.7,
            ..layout(3, ContactMode::Block)
        };
        let mut rod = Rod::with_positions(l, &[0.0, 150.0, 300.0]).unwrap();
        rod.apply_drag(1, 500.0);
        let parked = rod.position(1).unwrap();
        for _ in 0..20 {
            rod.apply_drag(1, 3.3);
            assert_eq!(rod.position(1), Some(parked));
        }
        assert_invariants(&rod);
    }

    fn drags() -> impl Strategy<Value = Vec<(usize, f32)>> {
        prop::collection::vec((0usize..10, -300.0f32..300.0), 1..60)
    }

    proptest! {
        #[test]
        fn prop_push_keeps_invariants(steps in drags()) {
            let mut rod = Rod::new(layout(10, ContactMode::Push)).unwrap();
            for (index, delta) in steps {
                rod.apply_drag(index, delta);
                assert_invariants(&rod);
            }
        }

        #[test]
        fn prop_block_keeps_invariants(steps in drags()) {
            let mut rod = Rod::with_positions(
                layout(10, ContactMode::Block),
                &[0.0, 30.0, 60.0, 100.0, 140.0, 180.0, 220.0, 260.0, 300.0, 350.0],
            ).unwrap();
            for (index, delta) in steps {
                rod.apply_drag(index, delta);
                assert_invariants(&rod);
            }
        }

        #[test]
        fn prop_uneven_geometry_is_exact(
            steps in prop::collection::vec((0usize..10, -37.0f32..37.0), 1..200),
            block in any::<bool>(),
        ) {
            let contact = if block { ContactMode::Block } else { ContactMode::Push };
            let l = RodLayout {
                bead_width: 20.3,
                spacing: 1.7,
                ..layout(10, contact)
            };
            let mut rod = Rod::new(l).unwrap();
            assert_invariants(&rod);
            for (index, delta) in steps {
                let before = rod.position(index).unwrap();
                rod.apply_drag(index, delta);
                let after = rod.position(index).unwrap();
                // The dragged bead never moves against the drag
                if delta > 0.0 {
                    prop_assert!(after >= before);
                } else {
                    prop_assert!(after <= before);
                }
                assert_invariants(&rod);
            }
        }

        #[test]
        fn prop_only_run_in_drag_direction_changes(index in 0usize..10, delta in -300.0f32..300.0) {
            let mut rod = Rod::with_positions(
                layout(10, ContactMode::Push),
                &[0.0, 30.0, 60.0, 100.0, 140.0, 180.0, 220.0, 260.0, 300.0, 350.0],
            ).unwrap();
            let before: Vec<f32> = rod.positions().collect();
            rod.apply_drag(index, delta);
            let after: Vec<f32> = rod.positions().collect();
            for i in 0..10 {
                let behind = if delta > 0.0 { i < index } else { i > index };
                if behind {
                    prop_assert_eq!(before[i], after[i]);
                }
            }
        }
    }
}
