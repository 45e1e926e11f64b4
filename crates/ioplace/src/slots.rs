//! Slot ring generation.
//!
//! The ring is the ordered list of every position on the core boundary a pin
//! may occupy. It walks the bottom edge left to right, the right edge bottom
//! to top, the top edge right to left and the left edge top to bottom, so
//! ring neighbors are always geometric neighbors.

use crate::boundary::{CoreBoundary, Edge};
use crate::error::PlaceError;
use ioplace_common::{Coordinate, Dbu, Rect};
use ioplace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A candidate pin position on the boundary.
///
/// `blocked` is fixed at generation. `visited` and `current` are only
/// mutated on per-section copies during matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Position on the boundary.
    pub pos: Coordinate,
    /// Inside a blockage; never offered to a pin.
    pub blocked: bool,
    /// Removed from the candidate pool by a matching round.
    pub visited: bool,
    /// Part of the candidate pool of the next matching round.
    pub current: bool,
}

impl Slot {
    fn new(pos: Coordinate, blocked: bool) -> Self {
        Self {
            pos,
            blocked,
            visited: false,
            current: false,
        }
    }

    /// Returns `true` if the slot may still be offered to a pin.
    pub fn is_available(&self) -> bool {
        !self.blocked && !self.visited
    }
}

/// The ordered ring of boundary slots.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlotRing {
    slots: Vec<Slot>,
    pitch: Dbu,
}

impl SlotRing {
    /// Walks the boundary and marks slots covered by any of `blockages`.
    ///
    /// The bottom edge starts at `lower.x + init_tracks.x` and the right
    /// edge at `lower.y + init_tracks.y`; the top and left edges reuse those
    /// track positions in reverse. Each edge stops before the far corner, so
    /// every slot lies inside the core rectangle and no position repeats.
    pub fn generate(boundary: &CoreBoundary, blockages: &[Rect]) -> Self {
        let (lower, upper) = (boundary.lower(), boundary.upper());
        let spacing = boundary.min_spacing();
        let init = boundary.init_tracks();

        let xs: Vec<Dbu> = track_positions(lower.x + init.x, upper.x, spacing.x);
        let ys: Vec<Dbu> = track_positions(lower.y + init.y, upper.y, spacing.y);

        let mut positions = Vec::with_capacity(2 * (xs.len() + ys.len()));
        positions.extend(xs.iter().map(|&x| Coordinate::new(x, lower.y)));
        positions.extend(ys.iter().map(|&y| Coordinate::new(upper.x, y)));
        positions.extend(xs.iter().rev().map(|&x| Coordinate::new(x, upper.y)));
        let first = positions.first().copied();
        positions.extend(
            ys.iter()
                .rev()
                .map(|&y| Coordinate::new(lower.x, y))
                .filter(|&pos| Some(pos) != first),
        );

        let slots = positions
            .into_iter()
            .map(|pos| Slot::new(pos, blockages.iter().any(|b| b.contains(pos))))
            .collect();

        Self {
            slots,
            pitch: spacing.x.max(spacing.y),
        }
    }

    /// All slots in ring order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The slot at ring index `index`.
    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Number of slots on the ring.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the boundary produced no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The larger of the two pin spacings, used to scale section penalties.
    pub fn pitch(&self) -> Dbu {
        self.pitch
    }

    /// Number of non-blocked slots on the whole ring.
    pub fn usable_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.blocked).count()
    }

    /// Number of non-blocked slots in a ring index range.
    pub fn usable_in(&self, range: Range<usize>) -> usize {
        self.slots[range].iter().filter(|s| !s.blocked).count()
    }

    /// Ring indices of non-blocked slots, in ring order.
    pub fn usable_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.blocked)
            .map(|(i, _)| i)
    }
}

fn track_positions(start: Dbu, end: Dbu, step: Dbu) -> Vec<Dbu> {
    let mut out = Vec::new();
    let mut v = start;
    while v < end {
        out.push(v);
        v += step;
    }
    out
}

const BLOCKAGE_OFF_BOUNDARY: DiagnosticCode = DiagnosticCode::new(Category::Warning, 1);

/// Checks that every blockage sits on exactly one core edge.
///
/// Returns the blockages that take effect. A blockage touching no edge is
/// dropped with a `W001` warning; one reaching into two or more edges is a
/// configuration error.
pub fn validate_blockages(
    boundary: &CoreBoundary,
    blockages: &[Rect],
    sink: &DiagnosticSink,
) -> Result<Vec<Rect>, PlaceError> {
    let mut effective = Vec::with_capacity(blockages.len());
    for (index, rect) in blockages.iter().enumerate() {
        let edges: Vec<Edge> = boundary.edges_touched(rect);
        match edges.len() {
            0 => sink.emit(
                Diagnostic::warning(
                    BLOCKAGE_OFF_BOUNDARY,
                    format!("blockage #{index} does not touch the core boundary and is ignored"),
                )
                .with_subject(format!("{:?}-{:?}", rect.ll, rect.ur)),
            ),
            1 => effective.push(*rect),
            n => return Err(PlaceError::InvalidBlockage { index, edges: n }),
        }
    }
    Ok(effective)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(w: Dbu, h: Dbu, spacing: Dbu, init: Dbu) -> CoreBoundary {
        CoreBoundary::new(
            Coordinate::new(0, 0),
            Coordinate::new(w, h),
            Coordinate::new(spacing, spacing),
            Coordinate::new(init, init),
        )
        .unwrap()
    }

    #[test]
    fn small_square_ring() {
        let ring = SlotRing::generate(&boundary(400, 400, 100, 0), &[]);
        assert_eq!(ring.len(), 15);
        assert_eq!(ring.slots()[0].pos, Coordinate::new(0, 0));
        assert_eq!(ring.slots()[4].pos, Coordinate::new(400, 0));
        assert_eq!(ring.slots()[8].pos, Coordinate::new(300, 400));
        assert_eq!(ring.slots()[14].pos, Coordinate::new(0, 100));
    }

    #[test]
    fn ring_stays_inside_boundary() {
        let b = boundary(1030, 770, 90, 25);
        let ring = SlotRing::generate(&b, &[]);
        assert!(!ring.is_empty());
        for slot in ring.slots() {
            assert!(b.rect().contains(slot.pos), "{:?} outside core", slot.pos);
        }
    }

    #[test]
    fn ring_closes_on_first_corner() {
        let b = boundary(1000, 600, 100, 50);
        let ring = SlotRing::generate(&b, &[]);
        let first = ring.slots()[0].pos;
        let last = ring.slots()[ring.len() - 1].pos;
        // The last slot sits on the left edge one pitch above the start of the walk.
        assert_eq!(first, Coordinate::new(50, 0));
        assert_eq!(last, Coordinate::new(0, 50));
        // Consecutive slots are never more than one edge transition apart.
        for pair in ring.slots().windows(2) {
            assert!(pair[0].pos.manhattan(pair[1].pos) <= 200);
        }
    }

    #[test]
    fn positions_are_unique() {
        let ring = SlotRing::generate(&boundary(500, 500, 100, 0), &[]);
        let mut seen = std::collections::HashSet::new();
        for slot in ring.slots() {
            assert!(seen.insert(slot.pos), "duplicate slot {:?}", slot.pos);
        }
    }

    #[test]
    fn blockage_marks_slots() {
        let b = boundary(1000, 1000, 100, 0);
        let blockage = Rect::new(Coordinate::new(200, 0), Coordinate::new(400, 0));
        let ring = SlotRing::generate(&b, &[blockage]);
        let blocked: Vec<Coordinate> = ring
            .slots()
            .iter()
            .filter(|s| s.blocked)
            .map(|s| s.pos)
            .collect();
        assert_eq!(
            blocked,
            vec![Coordinate::new(200, 0), Coordinate::new(300, 0), Coordinate::new(400, 0)]
        );
        assert_eq!(ring.usable_count(), ring.len() - 3);
        assert_eq!(ring.usable_in(0..5), 2);
    }

    #[test]
    fn off_boundary_blockage_is_ignored_with_warning() {
        let b = boundary(1000, 1000, 100, 0);
        let sink = DiagnosticSink::new();
        let inside = Rect::new(Coordinate::new(200, 200), Coordinate::new(300, 300));
        let kept = validate_blockages(&b, &[inside], &sink).unwrap();
        assert!(kept.is_empty());
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code.to_string(), "W001");
    }

    #[test]
    fn blockage_on_two_edges_is_rejected() {
        let b = boundary(1000, 1000, 100, 0);
        let sink = DiagnosticSink::new();
        let corner = Rect::new(Coordinate::new(900, -10), Coordinate::new(1010, 100));
        let err = validate_blockages(&b, &[corner], &sink).unwrap_err();
        assert!(matches!(err, PlaceError::InvalidBlockage { index: 0, edges: 2 }));
    }
}
