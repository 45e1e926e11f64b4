//! The core boundary the pins are placed on.

use crate::error::PlaceError;
use ioplace_common::{Coordinate, Dbu, Rect};
use serde::{Deserialize, Serialize};

/// Minimum-width and minimum-area rules of the pin layers.
///
/// The `x` component applies to pins on the bottom and top edges (drawn on
/// the vertical layer), the `y` component to pins on the left and right
/// edges (drawn on the horizontal layer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerRules {
    /// Minimum metal width per axis.
    pub min_width: Coordinate,
    /// Minimum metal area per axis, zero when the layer has no area rule.
    pub min_area: Coordinate,
}

/// One of the four edges of the core rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    /// `y == lower.y`, walked left to right.
    Bottom,
    /// `x == upper.x`, walked bottom to top.
    Right,
    /// `y == upper.y`, walked right to left.
    Top,
    /// `x == lower.x`, walked top to bottom.
    Left,
}

impl Edge {
    /// All edges in ring order.
    pub const ALL: [Edge; 4] = [Edge::Bottom, Edge::Right, Edge::Top, Edge::Left];
}

/// Axis-aligned core rectangle with the pin pitch and track offsets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreBoundary {
    rect: Rect,
    min_spacing: Coordinate,
    init_tracks: Coordinate,
    layer_rules: Option<LayerRules>,
    database_unit: Dbu,
}

impl CoreBoundary {
    /// Creates a boundary, rejecting degenerate rectangles and non-positive spacing.
    pub fn new(
        lower: Coordinate,
        upper: Coordinate,
        min_spacing: Coordinate,
        init_tracks: Coordinate,
    ) -> Result<Self, PlaceError> {
        if upper.x <= lower.x || upper.y <= lower.y {
            return Err(PlaceError::InvalidParams(format!(
                "core boundary {lower:?}-{upper:?} is degenerate"
            )));
        }
        if min_spacing.x <= 0 || min_spacing.y <= 0 {
            return Err(PlaceError::InvalidParams(format!(
                "minimum pin spacing {min_spacing:?} must be positive"
            )));
        }
        if init_tracks.x < 0 || init_tracks.y < 0 {
            return Err(PlaceError::InvalidParams(format!(
                "first track offset {init_tracks:?} must not be negative"
            )));
        }
        Ok(Self {
            rect: Rect { ll: lower, ur: upper },
            min_spacing,
            init_tracks,
            layer_rules: None,
            database_unit: 1000,
        })
    }

    /// Attaches pin layer rules used to derive pin shapes.
    pub fn with_layer_rules(mut self, rules: LayerRules) -> Self {
        self.layer_rules = Some(rules);
        self
    }

    /// Sets the number of database units per micron.
    pub fn with_database_unit(mut self, dbu: Dbu) -> Self {
        self.database_unit = dbu.max(1);
        self
    }

    /// The core rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Lower-left corner.
    pub fn lower(&self) -> Coordinate {
        self.rect.ll
    }

    /// Upper-right corner.
    pub fn upper(&self) -> Coordinate {
        self.rect.ur
    }

    /// Minimum distance between pins along each axis.
    pub fn min_spacing(&self) -> Coordinate {
        self.min_spacing
    }

    /// Offset of the first routing track along each axis.
    pub fn init_tracks(&self) -> Coordinate {
        self.init_tracks
    }

    /// Pin layer rules, if any.
    pub fn layer_rules(&self) -> Option<&LayerRules> {
        self.layer_rules.as_ref()
    }

    /// Database units per micron.
    pub fn database_unit(&self) -> Dbu {
        self.database_unit
    }

    /// Converts a length in database units to microns.
    pub fn to_microns(&self, value: Dbu) -> f64 {
        value as f64 / self.database_unit as f64
    }

    /// Perimeter of the core rectangle.
    pub fn perimeter(&self) -> Dbu {
        2 * (self.rect.width() + self.rect.height())
    }

    /// Upper estimate of the number of slots on the ring.
    pub fn estimated_slot_count(&self) -> usize {
        let horizontal = self.rect.width() * 2 / self.min_spacing.x;
        let vertical = self.rect.height() * 2 / self.min_spacing.y;
        (horizontal + vertical) as usize
    }

    /// Returns the edges whose open segment (corners excluded) intersects `r`.
    pub fn edges_touched(&self, r: &Rect) -> Vec<Edge> {
        let (lo, hi) = (self.rect.ll, self.rect.ur);
        let spans_x = r.ll.x < hi.x && r.ur.x > lo.x;
        let spans_y = r.ll.y < hi.y && r.ur.y > lo.y;
        Edge::ALL
            .into_iter()
            .filter(|edge| match edge {
                Edge::Bottom => spans_x && r.ll.y <= lo.y && lo.y <= r.ur.y,
                Edge::Top => spans_x && r.ll.y <= hi.y && hi.y <= r.ur.y,
                Edge::Left => spans_y && r.ll.x <= lo.x && lo.x <= r.ur.x,
                Edge::Right => spans_y && r.ll.x <= hi.x && hi.x <= r.ur.x,
            })
            .collect()
    }
}
