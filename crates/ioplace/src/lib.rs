//! Boundary I/O pin placement.
//!
//! Given a core rectangle, a set of I/O pins and the fixed cell terminals
//! each pin connects to, this crate chooses a boundary position for every
//! pin so the summed wirelength is small.
//!
//! # Pipeline
//!
//! 1. **Slot ring**: walk the core edges at pin pitch, marking blocked slots
//! 2. **Sections**: cut the ring into budgeted chunks and route pins to the
//!    nearest chunk, rebalancing with penalties until every chunk fits
//! 3. **Matching**: per section, Hungarian assignment with neighborhood
//!    relaxation, run in parallel
//! 4. **Backfill**: pins without sinks take leftover slots in ring order
//! 5. **Finish**: orientation and pin shapes from the chosen edge
//!
//! # Usage
//!
//! ```ignore
//! use ioplace::{CoreBoundary, IoPlacer, PlacerParams};
//!
//! let mut placer = IoPlacer::new(boundary, PlacerParams::default());
//! placer.add_io_pin(pin, sinks);
//! let report = placer.run(&sink)?;
//! assert!(placer.netlist().is_fully_placed());
//! ```

#![warn(missing_docs)]

pub mod boundary;
pub mod error;
pub mod ids;
pub mod kernel;
pub mod matching;
pub mod netlist;
pub mod orientation;
mod random;
pub mod sections;
pub mod slots;

pub use boundary::{CoreBoundary, Edge, LayerRules};
pub use error::PlaceError;
pub use ids::{PinId, SectionId};
pub use kernel::{IoPlacer, PinLayers, PlacedPin, PlacementReport, PlacerParams};
pub use matching::{match_section, MatchOutcome, SectionMatcher, RELAXATION_ROUNDS};
pub use netlist::{Direction, InstancePin, IoPin, Netlist, ParseDirectionError};
pub use orientation::{local_pin_shape, orientation_of, pin_shape, Orientation};
pub use sections::{partition, Partition, PartitionParams, Section};
pub use slots::{validate_blockages, Slot, SlotRing};

pub use ioplace_common::{Coordinate, Dbu, Rect};
