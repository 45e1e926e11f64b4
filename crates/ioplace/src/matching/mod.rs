//! Per-section pin-to-slot matching with neighborhood relaxation.
//!
//! A section's first solve only sees a sampled subset of its slots. After
//! each solve, slots no pin can reach at zero reduced cost are dropped for
//! good, and ring neighbors of the contested slots are opened for the next
//! round. The exploration radius halves every round. The cheapest solution
//! seen across all rounds wins, so relaxation never loses to the first solve.

pub mod hungarian;

use crate::error::PlaceError;
use crate::ids::PinId;
use crate::netlist::Netlist;
use crate::sections::Section;
use crate::slots::{Slot, SlotRing};
use hungarian::CostMatrix;
use ioplace_common::Dbu;

/// Number of solve rounds per section.
pub const RELAXATION_ROUNDS: usize = 4;

/// Result of matching one section.
#[derive(Clone, Debug)]
pub struct MatchOutcome {
    /// Pin and ring index pairs, sorted by ring index.
    pub assignments: Vec<(PinId, usize)>,
    /// Wirelength of the kept solution.
    pub total_cost: Dbu,
    /// Wirelength of the first-round solve.
    pub naive_cost: Dbu,
    /// Rounds actually solved.
    pub rounds: usize,
}

/// Matching state of one section: its pins and a private copy of its slots.
pub struct SectionMatcher<'a> {
    netlist: &'a Netlist,
    section: &'a Section,
    slots: Vec<Slot>,
    sample_step: usize,
    best: Option<(Vec<(PinId, usize)>, Dbu)>,
}

impl<'a> SectionMatcher<'a> {
    /// Copies the section's slots and seeds the first candidate pool.
    ///
    /// Every `k`-th usable slot starts as a candidate, `k = max(1, usable / pins)`.
    pub fn new(
        netlist: &'a Netlist,
        ring: &SlotRing,
        section: &'a Section,
    ) -> Result<Self, PlaceError> {
        let mut slots = ring.slots()[section.range.clone()].to_vec();
        let usable: Vec<usize> = (0..slots.len()).filter(|&i| !slots[i].blocked).collect();
        let pins = section.pins.len();
        if pins > usable.len() {
            return Err(PlaceError::SectionInfeasible {
                section: section.id.as_raw(),
                pins,
                slots: usable.len(),
            });
        }
        let sample_step = if pins == 0 { 1 } else { (usable.len() / pins).max(1) };
        for &i in usable.iter().step_by(sample_step) {
            slots[i].current = true;
        }
        Ok(Self {
            netlist,
            section,
            slots,
            sample_step,
            best: None,
        })
    }

    fn candidates(&self) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&i| self.slots[i].current && self.slots[i].is_available())
            .collect()
    }

    // Opens every still-available slot when the pool fell short.
    fn widen(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| s.is_available()) {
            slot.current = true;
        }
    }

    fn explore(&mut self, hot: &[usize], radius: usize) -> usize {
        let mut opened = 0;
        for &center in hot {
            let lo = center.saturating_sub(radius);
            let hi = (center + radius).min(self.slots.len() - 1);
            for slot in &mut self.slots[lo..=hi] {
                if slot.is_available() && !slot.current {
                    slot.current = true;
                    opened += 1;
                }
            }
        }
        opened
    }

    /// Runs up to [`RELAXATION_ROUNDS`] solves and keeps the cheapest.
    pub fn run(mut self) -> Result<MatchOutcome, PlaceError> {
        let section = self.section;
        let netlist = self.netlist;
        let pins = &section.pins;
        if pins.is_empty() {
            return Ok(MatchOutcome {
                assignments: Vec::new(),
                total_cost: 0,
                naive_cost: 0,
                rounds: 0,
            });
        }

        let mut naive_cost = 0;
        let mut rounds = 0;
        for round in 1..=RELAXATION_ROUNDS {
            let mut cols = self.candidates();
            if cols.len() < pins.len() {
                self.widen();
                cols = self.candidates();
                if cols.len() < pins.len() {
                    return Err(PlaceError::SectionInfeasible {
                        section: section.id.as_raw(),
                        pins: pins.len(),
                        slots: cols.len(),
                    });
                }
            }

            let matrix = CostMatrix::from_fn(pins.len(), cols.len(), |r, c| {
                netlist.compute_hpwl(pins[r], self.slots[cols[c]].pos)
            });
            let solution = hungarian::solve(&matrix)?;
            rounds = round;
            if round == 1 {
                naive_cost = solution.total_cost;
            }
            if self.best.as_ref().map_or(true, |(_, cost)| solution.total_cost < *cost) {
                let assignment = solution
                    .row_to_col
                    .iter()
                    .enumerate()
                    .map(|(r, &c)| (pins[r], section.range.start + cols[c]))
                    .collect();
                self.best = Some((assignment, solution.total_cost));
            }

            let tight = solution.tight_columns(&matrix);
            let mut removed = 0;
            let mut hot = Vec::new();
            for (c, &local) in cols.iter().enumerate() {
                if tight[c] {
                    hot.push(local);
                } else {
                    self.slots[local].visited = true;
                    self.slots[local].current = false;
                    removed += 1;
                }
            }

            if round == RELAXATION_ROUNDS {
                break;
            }
            let radius = (self.sample_step >> (round - 1)).max(1);
            let opened = self.explore(&hot, radius);
            if removed == 0 && opened == 0 {
                break;
            }
        }

        Ok(self.final_assignment(naive_cost, rounds))
    }

    fn final_assignment(self, naive_cost: Dbu, rounds: usize) -> MatchOutcome {
        let (mut assignments, total_cost) = self.best.unwrap_or_default();
        assignments.sort_by_key(|&(_, slot)| slot);
        MatchOutcome {
            assignments,
            total_cost,
            naive_cost,
            rounds,
        }
    }
}

/// Matches the pins of one section onto its slot range.
pub fn match_section(
    netlist: &Netlist,
    ring: &SlotRing,
    section: &Section,
) -> Result<MatchOutcome, PlaceError> {
    SectionMatcher::new(netlist, ring, section)?.run()
}
