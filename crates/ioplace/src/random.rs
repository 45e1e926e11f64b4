//! Random pin placement for designs whose cells are not placed yet.
//!
//! Sink positions carry no information in that case, so every pin, with or
//! without sinks, takes the next slot of a seeded shuffle of the usable ring.

use crate::error::PlaceError;
use crate::ids::PinId;
use crate::netlist::Netlist;
use crate::slots::SlotRing;
use ioplace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const RANDOM_MODE: DiagnosticCode = DiagnosticCode::new(Category::Warning, 2);

/// Assigns each pin a distinct shuffled usable slot.
///
/// The same seed always yields the same assignment.
pub(crate) fn random_placement(
    netlist: &Netlist,
    ring: &SlotRing,
    seed: u64,
    sink: &DiagnosticSink,
) -> Result<Vec<(PinId, usize)>, PlaceError> {
    let mut slots: Vec<usize> = ring.usable_indices().collect();
    if netlist.pin_count() > slots.len() {
        return Err(PlaceError::Infeasible {
            pins: netlist.pin_count(),
            slots: slots.len(),
        });
    }

    sink.emit(
        Diagnostic::warning(
            RANDOM_MODE,
            format!("random placement of {} pins ignores wirelength", netlist.pin_count()),
        )
        .with_note(format!("shuffle seed {seed}")),
    );

    let mut rng = StdRng::seed_from_u64(seed);
    slots.shuffle(&mut rng);
    Ok(netlist.pins().map(|(id, _)| id).zip(slots).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::CoreBoundary;
    use crate::netlist::{Direction, InstancePin, IoPin};
    use ioplace_common::{Coordinate, Rect};

    fn setup(pins: usize) -> (Netlist, SlotRing) {
        let b = CoreBoundary::new(
            Coordinate::new(0, 0),
            Coordinate::new(1000, 1000),
            Coordinate::new(100, 100),
            Coordinate::new(0, 0),
        )
        .unwrap();
        let blockage = Rect::new(Coordinate::new(0, 0), Coordinate::new(500, 0));
        let ring = SlotRing::generate(&b, &[blockage]);
        let mut nl = Netlist::new();
        for i in 0..pins {
            let sinks = if i % 2 == 0 {
                vec![InstancePin::new("u/A", Coordinate::new(10, 10))]
            } else {
                Vec::new()
            };
            nl.add_io_net(IoPin::new(format!("p{i}"), "n", Direction::Input), sinks);
        }
        (nl, ring)
    }

    #[test]
    fn every_pin_gets_a_distinct_usable_slot() {
        let (nl, ring) = setup(20);
        let sink = DiagnosticSink::new();
        let placed = random_placement(&nl, &ring, 42, &sink).unwrap();
        assert_eq!(placed.len(), 20);
        let mut slots: Vec<usize> = placed.iter().map(|&(_, s)| s).collect();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), 20);
        assert!(slots.iter().all(|&s| !ring.slots()[s].blocked));
        assert_eq!(sink.diagnostics()[0].code.to_string(), "W002");
    }

    #[test]
    fn same_seed_same_result() {
        let (nl, ring) = setup(10);
        let sink = DiagnosticSink::new();
        let a = random_placement(&nl, &ring, 7, &sink).unwrap();
        let b = random_placement(&nl, &ring, 7, &sink).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_many_pins() {
        let (nl, ring) = setup(40);
        let err = random_placement(&nl, &ring, 1, &DiagnosticSink::new()).unwrap_err();
        assert!(matches!(err, PlaceError::Infeasible { pins: 40, .. }));
    }
}
