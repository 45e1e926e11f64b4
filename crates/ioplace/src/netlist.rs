//! I/O netlist: boundary pins and the internal cell terminals they drive.
//!
//! Sinks of all pins live in one flat vector. `net_pointer[i]..net_pointer[i + 1]`
//! is the sink range of pin `i`, so appending a pin is amortized O(1) and
//! iterating a pin's sinks is a slice walk.

use crate::ids::PinId;
use crate::orientation::Orientation;
use ioplace_common::{Coordinate, Dbu, Rect};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Signal direction of an I/O pin.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Input to the core.
    #[default]
    Input,
    /// Output from the core.
    Output,
    /// Bidirectional.
    Inout,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "INPUT"),
            Direction::Output => write!(f, "OUTPUT"),
            Direction::Inout => write!(f, "INOUT"),
        }
    }
}

/// Error returned when parsing an unknown direction keyword.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pin direction '{0}'")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INPUT" | "IN" => Ok(Direction::Input),
            "OUTPUT" | "OUT" => Ok(Direction::Output),
            "INOUT" => Ok(Direction::Inout),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// A terminal of an internal cell that an I/O net connects to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstancePin {
    /// Terminal name.
    pub name: String,
    /// Fixed terminal position.
    pub pos: Coordinate,
}

impl InstancePin {
    /// Creates an instance pin.
    pub fn new(name: impl Into<String>, pos: Coordinate) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }
}

/// A boundary pin of the design.
///
/// `pos` and `orientation` stay `None` until placement finalizes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoPin {
    /// Pin name.
    pub name: String,
    /// Name of the net the pin belongs to.
    pub net_name: String,
    /// Signal direction.
    pub direction: Direction,
    /// Terminal shape relative to the pin position.
    pub bounds: Rect,
    /// Placed position.
    pub pos: Option<Coordinate>,
    /// Orientation derived from the boundary edge the pin was placed on.
    pub orientation: Option<Orientation>,
}

impl IoPin {
    /// Creates an unplaced pin with an empty terminal shape.
    pub fn new(name: impl Into<String>, net_name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            net_name: net_name.into(),
            direction,
            bounds: Rect::default(),
            pos: None,
            orientation: None,
        }
    }

    /// Sets the terminal shape.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Returns whether the pin has been placed.
    pub fn is_placed(&self) -> bool {
        self.pos.is_some()
    }
}

/// Append-only collection of I/O pins and their sinks.
#[derive(Debug, Clone, Serialize)]
pub struct Netlist {
    io_pins: Vec<IoPin>,
    inst_pins: Vec<InstancePin>,
    net_pointer: Vec<usize>,
}

impl Netlist {
    /// Creates an empty netlist.
    pub fn new() -> Self {
        Self {
            io_pins: Vec::new(),
            inst_pins: Vec::new(),
            net_pointer: vec![0],
        }
    }

    /// Appends a pin with its sinks and returns its ID.
    pub fn add_io_net(
        &mut self,
        pin: IoPin,
        sinks: impl IntoIterator<Item = InstancePin>,
    ) -> PinId {
        let id = PinId::from_raw(self.io_pins.len() as u32);
        self.io_pins.push(pin);
        self.inst_pins.extend(sinks);
        self.net_pointer.push(self.inst_pins.len());
        id
    }

    /// Returns the pin with the given ID.
    pub fn pin(&self, id: PinId) -> &IoPin {
        &self.io_pins[id.index()]
    }

    /// Returns a mutable reference to the pin with the given ID.
    pub fn pin_mut(&mut self, id: PinId) -> &mut IoPin {
        &mut self.io_pins[id.index()]
    }

    /// Iterates over all pins in insertion order.
    pub fn pins(&self) -> impl Iterator<Item = (PinId, &IoPin)> + '_ {
        self.io_pins
            .iter()
            .enumerate()
            .map(|(i, pin)| (PinId::from_raw(i as u32), pin))
    }

    /// Returns the sinks of a pin.
    pub fn sinks_of(&self, id: PinId) -> &[InstancePin] {
        let i = id.index();
        &self.inst_pins[self.net_pointer[i]..self.net_pointer[i + 1]]
    }

    /// Returns the number of sinks of a pin.
    pub fn sink_count(&self, id: PinId) -> usize {
        let i = id.index();
        self.net_pointer[i + 1] - self.net_pointer[i]
    }

    /// Returns the number of pins.
    pub fn pin_count(&self) -> usize {
        self.io_pins.len()
    }

    /// Returns whether the netlist has no pins.
    pub fn is_empty(&self) -> bool {
        self.io_pins.is_empty()
    }

    /// Wirelength of a pin's net if the pin sat at `pos`.
    ///
    /// Sum of the Manhattan distances from `pos` to each sink; zero for a
    /// pin without sinks.
    pub fn compute_hpwl(&self, id: PinId, pos: Coordinate) -> Dbu {
        self.sinks_of(id).iter().map(|s| s.pos.manhattan(pos)).sum()
    }

    /// Total wirelength of every placed pin at its current position.
    pub fn placed_hpwl(&self) -> Dbu {
        self.pins()
            .filter_map(|(id, pin)| pin.pos.map(|pos| self.compute_hpwl(id, pos)))
            .sum()
    }

    /// Returns whether every pin has a position.
    pub fn is_fully_placed(&self) -> bool {
        self.io_pins.iter().all(IoPin::is_placed)
    }
}

impl Default for Netlist {
    fn default() -> Self {
        Self::new()
    }
}

// Sink ranges are checked on the way in so lookups never go out of bounds.
impl<'de> Deserialize<'de> for Netlist {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Parts {
            io_pins: Vec<IoPin>,
            inst_pins: Vec<InstancePin>,
            net_pointer: Vec<usize>,
        }

        let Parts {
            io_pins,
            inst_pins,
            net_pointer,
        } = Parts::deserialize(deserializer)?;
        let consistent = net_pointer.len() == io_pins.len() + 1
            && net_pointer.first() == Some(&0)
            && net_pointer.last() == Some(&inst_pins.len())
            && net_pointer.windows(2).all(|w| w[0] <= w[1]);
        if !consistent {
            return Err(de::Error::custom(format!(
                "sink ranges do not describe {} pins with {} sinks",
                io_pins.len(),
                inst_pins.len()
            )));
        }
        Ok(Self {
            io_pins,
            inst_pins,
            net_pointer,
        })
    }
}
