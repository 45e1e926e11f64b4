//! The placement driver.
//!
//! [`IoPlacer`] owns the netlist and the boundary and sequences one run:
//! validate blockages, build the slot ring, partition it, match every
//! section on the rayon pool, backfill pins without sinks, then derive
//! orientation and pin shapes for the final assignment.

use crate::boundary::CoreBoundary;
use crate::error::PlaceError;
use crate::ids::PinId;
use crate::matching::{match_section, MatchOutcome};
use crate::netlist::{Direction, InstancePin, IoPin, Netlist};
use crate::orientation::{local_pin_shape, orientation_of, Orientation};
use crate::random::random_placement;
use crate::sections::{partition, PartitionParams};
use crate::slots::{validate_blockages, SlotRing};
use ioplace_common::{Coordinate, Dbu, InternalError, Rect};
use ioplace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const BACKFILL_SHORT: DiagnosticCode = DiagnosticCode::new(Category::Warning, 3);
const RUN_SUMMARY: DiagnosticCode = DiagnosticCode::new(Category::Note, 1);

/// Tuning knobs of a placement run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacerParams {
    /// Initial section length in slots.
    pub slots_per_section: f64,
    /// Growth of the section length after a failed partitioning pass.
    pub slots_increase_factor: f64,
    /// Share of a section's usable slots that pins may take.
    pub usage_per_section: f64,
    /// Growth of the usage share after a failed partitioning pass.
    pub usage_increase_factor: f64,
    /// Only route a pin to its best section during partitioning.
    pub force_pin_spread: bool,
    /// Skip matching and shuffle pins onto the ring.
    pub random_mode: bool,
    /// Seed of the random-mode shuffle.
    pub random_seed: u64,
}

impl Default for PlacerParams {
    fn default() -> Self {
        let p = PartitionParams::default();
        Self {
            slots_per_section: p.slots_per_section,
            slots_increase_factor: p.slots_increase_factor,
            usage_per_section: p.usage_per_section,
            usage_increase_factor: p.usage_increase_factor,
            force_pin_spread: p.force_pin_spread,
            random_mode: false,
            random_seed: 42,
        }
    }
}

impl PlacerParams {
    /// The subset of knobs the partitioner consumes.
    pub fn partition_params(&self) -> PartitionParams {
        PartitionParams {
            slots_per_section: self.slots_per_section,
            slots_increase_factor: self.slots_increase_factor,
            usage_per_section: self.usage_per_section,
            usage_increase_factor: self.usage_increase_factor,
            force_pin_spread: self.force_pin_spread,
        }
    }
}

/// Metal layer names attached to placed pins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinLayers {
    /// Layer of pins on the left and right edges.
    pub horizontal: Option<String>,
    /// Layer of pins on the bottom and top edges.
    pub vertical: Option<String>,
}

/// One entry of the final assignment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedPin {
    /// Pin in the placer's netlist.
    pub pin: PinId,
    /// Pin name.
    pub name: String,
    /// Net name.
    pub net: String,
    /// Signal direction.
    pub direction: Direction,
    /// Ring index of the chosen slot.
    pub slot: usize,
    /// Final position.
    pub pos: Coordinate,
    /// Edge-derived orientation.
    pub orientation: Orientation,
    /// Absolute terminal shape when the layer rules define one.
    pub shape: Option<Rect>,
    /// Metal layer, if configured for the pin's edge.
    pub layer: Option<String>,
    /// Wirelength of the pin's net at `pos`.
    pub hpwl: Dbu,
}

/// Outcome of [`IoPlacer::run`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlacementReport {
    /// Placed pins in ring order.
    pub assignments: Vec<PlacedPin>,
    /// Pins left without a slot.
    pub unplaced: Vec<PinId>,
    /// Summed wirelength of all placed pins.
    pub total_hpwl: Dbu,
    /// `total_hpwl` in microns.
    pub total_hpwl_microns: f64,
    /// Summed first-round wirelength over all sections.
    pub naive_hpwl: Dbu,
    /// Slots on the ring.
    pub slots: usize,
    /// Sections the ring was split into.
    pub sections: usize,
    /// Section length, in slots, of the final partition.
    pub slots_per_section: usize,
    /// Partitioning passes.
    pub partition_iterations: usize,
    /// Whether the run used random placement.
    pub random_mode: bool,
}

#[derive(Default)]
struct RunStats {
    naive_hpwl: Dbu,
    sections: usize,
    slots_per_section: usize,
    partition_iterations: usize,
}

/// An owned placement kernel: netlist, boundary, blockages and knobs.
pub struct IoPlacer {
    netlist: Netlist,
    boundary: CoreBoundary,
    blockages: Vec<Rect>,
    params: PlacerParams,
    layers: PinLayers,
}

impl IoPlacer {
    /// Creates a placer with an empty netlist.
    pub fn new(boundary: CoreBoundary, params: PlacerParams) -> Self {
        Self {
            netlist: Netlist::new(),
            boundary,
            blockages: Vec::new(),
            params,
            layers: PinLayers::default(),
        }
    }

    /// Sets the layer names attached to placed pins.
    pub fn with_layers(mut self, layers: PinLayers) -> Self {
        self.layers = layers;
        self
    }

    /// Adds a pin and its sinks.
    pub fn add_io_pin(
        &mut self,
        pin: IoPin,
        sinks: impl IntoIterator<Item = InstancePin>,
    ) -> PinId {
        self.netlist.add_io_net(pin, sinks)
    }

    /// Registers a blockage rectangle; it must lie on a single core edge.
    pub fn add_blockage(&mut self, rect: Rect) {
        self.blockages.push(rect);
    }

    /// The netlist, with positions filled in after a successful run.
    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    /// The core boundary.
    pub fn boundary(&self) -> &CoreBoundary {
        &self.boundary
    }

    /// The run knobs.
    pub fn params(&self) -> &PlacerParams {
        &self.params
    }

    /// Generates the slot ring the next run will use.
    pub fn slot_ring(&self, sink: &DiagnosticSink) -> Result<SlotRing, PlaceError> {
        let blockages = validate_blockages(&self.boundary, &self.blockages, sink)?;
        Ok(SlotRing::generate(&self.boundary, &blockages))
    }

    /// Places every pin and writes positions back into the netlist.
    pub fn run(&mut self, sink: &DiagnosticSink) -> Result<PlacementReport, PlaceError> {
        self.params.partition_params().validate()?;
        let ring = self.slot_ring(sink)?;

        let usable = ring.usable_count();
        if self.netlist.pin_count() > usable {
            return Err(PlaceError::Infeasible {
                pins: self.netlist.pin_count(),
                slots: usable,
            });
        }

        let (placed, unplaced, stats) = if self.params.random_mode {
            let placed = random_placement(&self.netlist, &ring, self.params.random_seed, sink)?;
            (placed, Vec::new(), RunStats::default())
        } else {
            self.match_all(&ring, sink)?
        };

        let report = self.finish(&ring, placed, unplaced, stats)?;
        sink.emit(
            Diagnostic::note(
                RUN_SUMMARY,
                format!(
                    "placed {} of {} pins, total wirelength {} ({:.3} um)",
                    report.assignments.len(),
                    self.netlist.pin_count(),
                    report.total_hpwl,
                    report.total_hpwl_microns
                ),
            )
            .with_note(format!(
                "{} slots, {} sections, {} partitioning passes",
                report.slots, report.sections, report.partition_iterations
            )),
        );
        Ok(report)
    }

    fn match_all(
        &self,
        ring: &SlotRing,
        sink: &DiagnosticSink,
    ) -> Result<(Vec<(PinId, usize)>, Vec<PinId>, RunStats), PlaceError> {
        let partition = partition(&self.netlist, ring, &self.params.partition_params(), sink)?;

        let outcomes: Vec<MatchOutcome> = partition
            .sections
            .par_iter()
            .map(|section| match_section(&self.netlist, ring, section))
            .collect::<Result<_, _>>()?;

        let mut occupied = vec![false; ring.len()];
        let mut placed = Vec::with_capacity(self.netlist.pin_count());
        let mut stats = RunStats {
            naive_hpwl: 0,
            sections: partition.sections.len(),
            slots_per_section: partition.slots_per_section,
            partition_iterations: partition.iterations,
        };
        for outcome in outcomes {
            stats.naive_hpwl += outcome.naive_cost;
            for &(_, slot) in &outcome.assignments {
                occupied[slot] = true;
            }
            placed.extend(outcome.assignments);
        }

        let mut free = ring.usable_indices().filter(|&i| !occupied[i]);
        let mut unplaced = Vec::new();
        for (id, _) in self.netlist.pins() {
            if self.netlist.sink_count(id) > 0 {
                continue;
            }
            match free.next() {
                Some(slot) => placed.push((id, slot)),
                None => unplaced.push(id),
            }
        }
        if !unplaced.is_empty() {
            sink.emit(Diagnostic::warning(
                BACKFILL_SHORT,
                format!("{} pins without sinks found no free slot", unplaced.len()),
            ));
        }

        Ok((placed, unplaced, stats))
    }

    fn finish(
        &mut self,
        ring: &SlotRing,
        mut placed: Vec<(PinId, usize)>,
        unplaced: Vec<PinId>,
        stats: RunStats,
    ) -> Result<PlacementReport, PlaceError> {
        placed.sort_by_key(|&(_, slot)| slot);

        let mut assignments = Vec::with_capacity(placed.len());
        let mut total_hpwl = 0;
        for (id, slot) in placed {
            let pos = ring
                .get(slot)
                .map(|s| s.pos)
                .ok_or_else(|| InternalError::new(format!("slot {slot} is not on the ring")))?;
            let orientation = orientation_of(pos, &self.boundary).ok_or_else(|| {
                InternalError::new(format!("slot {slot} at {pos:?} is off the core boundary"))
            })?;
            let local = self
                .boundary
                .layer_rules()
                .and_then(|rules| local_pin_shape(orientation, rules));
            let shape = local.map(|r| r.offset(pos));
            let layer = if orientation.is_vertical() {
                self.layers.vertical.clone()
            } else {
                self.layers.horizontal.clone()
            };
            let hpwl = self.netlist.compute_hpwl(id, pos);
            total_hpwl += hpwl;

            let pin = self.netlist.pin_mut(id);
            pin.pos = Some(pos);
            pin.orientation = Some(orientation);
            if let Some(local) = local {
                pin.bounds = local;
            }
            assignments.push(PlacedPin {
                pin: id,
                name: pin.name.clone(),
                net: pin.net_name.clone(),
                direction: pin.direction,
                slot,
                pos,
                orientation,
                shape,
                layer,
                hpwl,
            });
        }

        Ok(PlacementReport {
            assignments,
            unplaced,
            total_hpwl,
            total_hpwl_microns: self.boundary.to_microns(total_hpwl),
            naive_hpwl: stats.naive_hpwl,
            slots: ring.len(),
            sections: stats.sections,
            slots_per_section: stats.slots_per_section,
            partition_iterations: stats.partition_iterations,
            random_mode: self.params.random_mode,
        })
    }
}
