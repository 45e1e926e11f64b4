//! Section partitioning of the slot ring.
//!
//! The ring is cut into contiguous chunks so each matching problem stays
//! small. Pins go to the section whose anchor is cheapest to reach, and a
//! penalty on over-subscribed sections pushes later passes towards their
//! neighbors until every section fits its budget.

use crate::error::PlaceError;
use crate::ids::{PinId, SectionId};
use crate::netlist::Netlist;
use crate::slots::SlotRing;
use ioplace_common::{Coordinate, Dbu};
use ioplace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use std::ops::Range;

/// Scale applied to a section's overflow when raising its penalty.
pub const PENALTY_MULTIPLIER: Dbu = 2;

/// Upper bound on assignment passes before partitioning gives up.
pub const MAX_PARTITION_ITERATIONS: usize = 1000;

const MAX_SECTIONS_RECOMMENDED: usize = 600;
const MAX_SLOTS_RECOMMENDED: usize = 600;

const TOO_MANY_SECTIONS: DiagnosticCode = DiagnosticCode::new(Category::Performance, 1);
const TOO_MANY_SLOTS: DiagnosticCode = DiagnosticCode::new(Category::Performance, 2);
const REBALANCED: DiagnosticCode = DiagnosticCode::new(Category::Performance, 3);

/// Knobs of the section partitioner.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionParams {
    /// Slots per section in the first pass.
    pub slots_per_section: f64,
    /// Relative growth of `slots_per_section` after a failed pass.
    pub slots_increase_factor: f64,
    /// Fraction of a section's usable slots that pins may take.
    pub usage_per_section: f64,
    /// Relative growth of `usage_per_section` after a failed pass.
    pub usage_increase_factor: f64,
    /// Penalize oversubscribed sections and rerun passes to spread pins out.
    /// Without it the first pass in which every pin finds room is final.
    pub force_pin_spread: bool,
}

impl Default for PartitionParams {
    fn default() -> Self {
        Self {
            slots_per_section: 200.0,
            slots_increase_factor: 0.01,
            usage_per_section: 0.8,
            usage_increase_factor: 0.01,
            force_pin_spread: true,
        }
    }
}

impl PartitionParams {
    /// Rejects values the partitioner cannot work with.
    pub fn validate(&self) -> Result<(), PlaceError> {
        if !(self.slots_per_section > 1.0) {
            return Err(PlaceError::InvalidParams(format!(
                "slots per section must be greater than 1, got {}",
                self.slots_per_section
            )));
        }
        if !(self.usage_per_section > 0.0) {
            return Err(PlaceError::InvalidParams(format!(
                "usage per section must be greater than 0, got {}",
                self.usage_per_section
            )));
        }
        if self.slots_increase_factor < 0.0 || self.usage_increase_factor < 0.0 {
            return Err(PlaceError::InvalidParams(
                "increase factors must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// A contiguous range of the slot ring and the pins routed to it.
#[derive(Clone, Debug)]
pub struct Section {
    /// Position of the section in ring order.
    pub id: SectionId,
    /// Ring indices covered by the section.
    pub range: Range<usize>,
    /// Position of the middle slot of the range.
    pub anchor: Coordinate,
    /// Non-blocked slots in the range.
    pub usable_slots: usize,
    /// Pin budget of the section.
    pub max_slots: usize,
    /// Accumulated rebalancing penalty.
    pub cost: Dbu,
    /// Pins assigned to the section, in netlist order.
    pub pins: Vec<PinId>,
}

impl Section {
    /// Number of pins currently assigned.
    pub fn cur_slots(&self) -> usize {
        self.pins.len()
    }

    /// Returns `true` while the section can take another pin.
    pub fn has_capacity(&self) -> bool {
        self.pins.len() < self.max_slots
    }

    /// Cost of routing pin `id` to this section.
    pub fn cost_for(&self, netlist: &Netlist, id: PinId) -> Dbu {
        netlist.compute_hpwl(id, self.anchor) + self.cost
    }
}

/// Converged section layout.
#[derive(Clone, Debug)]
pub struct Partition {
    /// Sections in ring order.
    pub sections: Vec<Section>,
    /// Assignment passes it took to fit every pin.
    pub iterations: usize,
    /// Section length used by the final pass.
    pub slots_per_section: usize,
    /// Usage fraction used by the final pass.
    pub usage_per_section: f64,
}

fn build_sections(ring: &SlotRing, len: usize, usage: f64, previous: &[Section]) -> Vec<Section> {
    let mut sections = Vec::with_capacity(ring.len().div_ceil(len));
    let mut start = 0;
    while start < ring.len() {
        let end = (start + len).min(ring.len());
        let mid = start + (end - start) / 2;
        let usable = ring.usable_in(start..end);
        let max_slots = ((usable as f64 * usage).floor() as usize).min(usable);
        // The penalty follows the slot the anchor sits on.
        let cost = previous
            .get(previous.partition_point(|s| s.range.end <= mid))
            .map_or(0, |s| s.cost);
        sections.push(Section {
            id: SectionId::from_raw(sections.len() as u32),
            range: start..end,
            anchor: ring.slots()[mid].pos,
            usable_slots: usable,
            max_slots,
            cost,
            pins: Vec::new(),
        });
        start = end;
    }
    sections
}

/// Routes every pin to its cheapest section that still has room.
///
/// Returns how many pins picked each section before capacity was checked,
/// and how many pins found no room at all.
fn assign_pass(
    netlist: &Netlist,
    placeable: &[PinId],
    sections: &mut [Section],
) -> (Vec<usize>, usize) {
    let candidates: Vec<usize> = sections
        .iter()
        .enumerate()
        .filter(|(_, s)| s.max_slots > 0)
        .map(|(i, _)| i)
        .collect();
    let mut demand = vec![0usize; sections.len()];
    let mut unassigned = 0usize;

    for &pin in placeable {
        let mut order: Vec<(Dbu, usize)> = candidates
            .iter()
            .map(|&i| (sections[i].cost_for(netlist, pin), i))
            .collect();
        order.sort_unstable();

        if let Some(&(_, cheapest)) = order.first() {
            demand[cheapest] += 1;
        }
        match order.iter().map(|&(_, i)| i).find(|&i| sections[i].has_capacity()) {
            Some(i) => sections[i].pins.push(pin),
            None => unassigned += 1,
        }
    }
    (demand, unassigned)
}

/// Splits the ring into sections and distributes every pin with sinks.
///
/// Pins without sinks are skipped; they are backfilled after matching.
/// Every pass puts each pin in its cheapest section with room left. When
/// capacity runs out the sections grow. With `force_pin_spread`, sections
/// that more pins wanted than they can hold are penalized and the pass is
/// rerun at the same section length, until no section is oversubscribed or
/// the oversubscription stops shrinking. The least oversubscribed pass wins.
pub fn partition(
    netlist: &Netlist,
    ring: &SlotRing,
    params: &PartitionParams,
    sink: &DiagnosticSink,
) -> Result<Partition, PlaceError> {
    params.validate()?;

    let placeable: Vec<PinId> = netlist
        .pins()
        .filter(|(id, _)| netlist.sink_count(*id) > 0)
        .map(|(id, _)| id)
        .collect();
    let usable = ring.usable_count();
    if placeable.len() > usable {
        return Err(PlaceError::Infeasible {
            pins: placeable.len(),
            slots: usable,
        });
    }

    let mut slots_per_section = params.slots_per_section;
    let mut usage = params.usage_per_section.min(1.0);
    let mut previous: Vec<Section> = Vec::new();
    // Least overflowing layout of the current section length.
    let mut best: Option<(usize, Vec<Section>)> = None;
    let mut warned_sections = false;
    let mut warned_slots = false;

    for iteration in 1..=MAX_PARTITION_ITERATIONS {
        let len = (slots_per_section.floor() as usize).max(1);
        let mut sections = build_sections(ring, len, usage, &previous);

        if !warned_sections && sections.len() > MAX_SECTIONS_RECOMMENDED {
            warned_sections = true;
            sink.emit(
                Diagnostic::warning(
                    TOO_MANY_SECTIONS,
                    format!("slot ring split into {} sections", sections.len()),
                )
                .with_help("increase slots_per_section to reduce partitioning work"),
            );
        }
        if !warned_slots && len > MAX_SLOTS_RECOMMENDED {
            warned_slots = true;
            sink.emit(
                Diagnostic::warning(TOO_MANY_SLOTS, format!("{len} slots per section"))
                    .with_help("large sections make each matching problem expensive"),
            );
        }

        let (demand, unassigned) = assign_pass(netlist, &placeable, &mut sections);
        let overflow: usize = sections
            .iter()
            .zip(&demand)
            .map(|(s, &wanted)| wanted.saturating_sub(s.max_slots))
            .sum();

        if unassigned == 0 {
            let fits = overflow == 0 || !params.force_pin_spread;
            // Penalties stopped pulling pins apart.
            let stalled = !fits && best.as_ref().is_some_and(|(least, _)| overflow >= *least);
            if fits || stalled {
                let sections = match best.take() {
                    Some((_, kept)) if stalled => kept,
                    _ => sections,
                };
                if iteration > 1 {
                    sink.emit(
                        Diagnostic::note(
                            REBALANCED,
                            format!("section partitioning converged after {iteration} passes"),
                        )
                        .with_note(format!(
                            "final sections hold {len} slots at {:.1}% usage",
                            usage * 100.0
                        )),
                    );
                }
                return Ok(Partition {
                    sections,
                    iterations: iteration,
                    slots_per_section: len,
                    usage_per_section: usage,
                });
            }
            best = Some((overflow, sections.clone()));
        } else {
            // Not enough room anywhere: grow the sections and start over.
            best = None;
            slots_per_section *= 1.0 + params.slots_increase_factor;
            usage = (usage * (1.0 + params.usage_increase_factor)).min(1.0);
        }

        for (section, &wanted) in sections.iter_mut().zip(&demand) {
            if wanted > section.max_slots {
                let overflow = (wanted - section.max_slots) as Dbu;
                section.cost += overflow * PENALTY_MULTIPLIER * ring.pitch();
            }
        }
        previous = sections;
    }

    Err(PlaceError::PartitionDiverged {
        iterations: MAX_PARTITION_ITERATIONS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::CoreBoundary;
    use crate::netlist::{Direction, InstancePin, IoPin};
    use ioplace_common::Rect;

    fn ring(size: Dbu, spacing: Dbu, blockages: &[Rect]) -> SlotRing {
        let b = CoreBoundary::new(
            Coordinate::new(0, 0),
            Coordinate::new(size, size),
            Coordinate::new(spacing, spacing),
            Coordinate::new(0, 0),
        )
        .unwrap();
        SlotRing::generate(&b, blockages)
    }

    fn netlist_with(sinks: &[(Dbu, Dbu)]) -> Netlist {
        let mut nl = Netlist::new();
        for (i, &(x, y)) in sinks.iter().enumerate() {
            nl.add_io_net(
                IoPin::new(format!("p{i}"), format!("n{i}"), Direction::Input),
                [InstancePin::new(format!("u{i}/A"), Coordinate::new(x, y))],
            );
        }
        nl
    }

    fn params(slots: f64, usage: f64) -> PartitionParams {
        PartitionParams {
            slots_per_section: slots,
            usage_per_section: usage,
            ..PartitionParams::default()
        }
    }

    #[test]
    fn sections_cover_the_ring() {
        let blockage = Rect::new(Coordinate::new(1000, 0), Coordinate::new(3000, 0));
        let r = ring(5000, 100, &[blockage]);
        let nl = netlist_with(&[(100, 100), (4900, 4900)]);
        let p = partition(&nl, &r, &params(30.0, 0.8), &DiagnosticSink::new()).unwrap();

        let mut next = 0;
        for s in &p.sections {
            assert_eq!(s.range.start, next);
            assert!(s.max_slots <= s.usable_slots);
            assert!(s.usable_slots <= s.range.len());
            next = s.range.end;
        }
        assert_eq!(next, r.len());
        let covered: usize = p.sections.iter().map(|s| s.range.len()).sum();
        assert_eq!(covered, r.len());
        let usable: usize = p.sections.iter().map(|s| s.usable_slots).sum();
        assert_eq!(usable, r.usable_count());
    }

    #[test]
    fn pins_go_to_nearest_section() {
        let r = ring(4000, 100, &[]);
        let nl = netlist_with(&[(2000, 50), (3950, 2000), (2000, 3950), (50, 2000)]);
        let p = partition(&nl, &r, &params(40.0, 0.8), &DiagnosticSink::new()).unwrap();
        assert_eq!(p.iterations, 1);
        assert_eq!(p.sections.len(), 4);
        for (i, s) in p.sections.iter().enumerate() {
            assert_eq!(s.pins, vec![PinId::from_raw(i as u32)]);
        }
    }

    #[test]
    fn zero_sink_pins_are_not_partitioned() {
        let r = ring(1000, 100, &[]);
        let mut nl = netlist_with(&[(500, 0)]);
        nl.add_io_net(IoPin::new("floating", "nf", Direction::Output), []);
        let p = partition(&nl, &r, &params(10.0, 0.8), &DiagnosticSink::new()).unwrap();
        let total: usize = p.sections.iter().map(Section::cur_slots).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn crowded_section_is_rebalanced() {
        let r = ring(10000, 50, &[]);
        assert!(r.len() >= 400);
        let sinks: Vec<(Dbu, Dbu)> = (0..120).map(|i| (4500 + 10 * i, 200)).collect();
        let nl = netlist_with(&sinks);
        let sink = DiagnosticSink::new();
        let p = partition(&nl, &r, &params(100.0, 0.5), &sink).unwrap();

        assert!(p.iterations >= 2);
        assert_eq!(p.slots_per_section, 100);
        assert_eq!(p.sections.len(), r.len().div_ceil(100));
        for s in &p.sections {
            assert!(s.cur_slots() <= s.max_slots, "section {} over budget", s.id);
        }
        let total: usize = p.sections.iter().map(Section::cur_slots).sum();
        assert_eq!(total, 120);
        assert!(sink.has_code("P003"));
        assert!(!sink.has_code("P002"));
    }

    #[test]
    fn shared_sink_bus_spreads_without_growing_sections() {
        let r = ring(10000, 20, &[]);
        let sinks = vec![(10, 10); 600];
        let nl = netlist_with(&sinks);
        let sink = DiagnosticSink::new();
        let p = partition(&nl, &r, &PartitionParams::default(), &sink).unwrap();

        assert!(p.iterations <= 3, "took {} passes", p.iterations);
        assert_eq!(p.slots_per_section, 200);
        assert_eq!(p.sections.len(), r.len().div_ceil(200));
        for s in &p.sections {
            assert!(s.cur_slots() <= s.max_slots, "section {} over budget", s.id);
        }
        let used = p.sections.iter().filter(|s| s.cur_slots() > 0).count();
        assert!(used >= 4);
        let total: usize = p.sections.iter().map(Section::cur_slots).sum();
        assert_eq!(total, 600);
        assert!(!sink.has_code("P002"));
    }

    #[test]
    fn unforced_spread_accepts_first_fitting_pass() {
        let r = ring(4000, 100, &[]);
        let sinks: Vec<(Dbu, Dbu)> = (0..40).map(|i| (2000 + i, 50)).collect();
        let nl = netlist_with(&sinks);
        let mut prm = params(40.0, 0.5);
        let forced = partition(&nl, &r, &prm, &DiagnosticSink::new()).unwrap();
        prm.force_pin_spread = false;
        let unforced = partition(&nl, &r, &prm, &DiagnosticSink::new()).unwrap();

        assert_eq!(unforced.iterations, 1);
        assert!(forced.iterations >= 2);
        assert_eq!(unforced.slots_per_section, forced.slots_per_section);
    }

    #[test]
    fn first_fit_when_spread_not_forced() {
        let r = ring(4000, 100, &[]);
        let sinks: Vec<(Dbu, Dbu)> = (0..40).map(|i| (2000 + i, 50)).collect();
        let nl = netlist_with(&sinks);
        let mut prm = params(40.0, 0.5);
        prm.force_pin_spread = false;
        let p = partition(&nl, &r, &prm, &DiagnosticSink::new()).unwrap();
        assert_eq!(p.iterations, 1);
        assert_eq!(p.sections[0].cur_slots(), 20);
        let total: usize = p.sections.iter().map(Section::cur_slots).sum();
        assert_eq!(total, 40);
    }

    #[test]
    fn invalid_params_are_fatal() {
        let r = ring(1000, 100, &[]);
        let nl = netlist_with(&[(0, 0)]);
        let sink = DiagnosticSink::new();
        assert!(matches!(
            partition(&nl, &r, &params(1.0, 0.8), &sink),
            Err(PlaceError::InvalidParams(_))
        ));
        assert!(matches!(
            partition(&nl, &r, &params(10.0, 0.0), &sink),
            Err(PlaceError::InvalidParams(_))
        ));
    }

    #[test]
    fn more_pins_than_slots_is_infeasible() {
        let r = ring(200, 100, &[]);
        let sinks: Vec<(Dbu, Dbu)> = (0..10).map(|i| (i, 0)).collect();
        let nl = netlist_with(&sinks);
        let err = partition(&nl, &r, &params(10.0, 0.8), &DiagnosticSink::new()).unwrap_err();
        assert!(matches!(err, PlaceError::Infeasible { pins: 10, slots: 7 }));
    }

    #[test]
    fn oversized_layout_warns_once() {
        let r = ring(10000, 10, &[]);
        let nl = netlist_with(&[(5000, 0)]);
        let sink = DiagnosticSink::new();
        partition(&nl, &r, &params(2.0, 1.0), &sink).unwrap();
        assert_eq!(sink.count_code("P001"), 1);
    }
}
