//! Configuration types deserialized from `ioplace.toml`.

use ioplace_common::{Coordinate, Dbu, Rect};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level placer configuration parsed from `ioplace.toml`.
#[derive(Debug, Deserialize)]
pub struct PlacerConfig {
    /// Core boundary geometry and layer rules.
    pub core: CoreConfig,
    /// Section partitioning and matching knobs.
    #[serde(default)]
    pub placer: PlacerSettings,
    /// Metal layer names attached to placed pins.
    #[serde(default)]
    pub layers: LayerConfig,
    /// Boundary regions where no pin may be placed.
    #[serde(default)]
    pub blockages: Vec<BlockageConfig>,
}

/// The core boundary: rectangle, pin pitch and first-track offsets.
#[derive(Debug, Deserialize)]
pub struct CoreConfig {
    /// Lower-left corner of the core.
    #[serde(deserialize_with = "deserialize_point")]
    pub lower_left: Coordinate,
    /// Upper-right corner of the core.
    #[serde(deserialize_with = "deserialize_point")]
    pub upper_right: Coordinate,
    /// Minimum distance between two pins along x and y.
    #[serde(deserialize_with = "deserialize_point")]
    pub min_spacing: Coordinate,
    /// Offset of the first routing track along x and y.
    #[serde(default, deserialize_with = "deserialize_point")]
    pub init_tracks: Coordinate,
    /// Minimum metal width of the vertical (x) and horizontal (y) pin layers.
    #[serde(default, deserialize_with = "deserialize_opt_point")]
    pub min_width: Option<Coordinate>,
    /// Minimum metal area of the vertical (x) and horizontal (y) pin layers.
    #[serde(default, deserialize_with = "deserialize_opt_point")]
    pub min_area: Option<Coordinate>,
    /// Database units per micron.
    #[serde(default = "default_database_unit")]
    pub database_unit: Dbu,
}

fn default_database_unit() -> Dbu {
    1000
}

/// Tuning knobs of the section partitioner and the matching engine.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlacerSettings {
    /// Number of ring slots per section.
    pub slots_per_section: u32,
    /// Relative growth of `slots_per_section` after a failed partition pass.
    pub slots_increase_factor: f64,
    /// Fraction of a section's usable slots that pins may occupy.
    pub usage_per_section: f64,
    /// Relative growth of `usage_per_section` after a failed partition pass.
    pub usage_increase_factor: f64,
    /// Restrict each pin to its best section instead of falling back to the next one.
    pub force_pin_spread: bool,
    /// Skip matching and shuffle pins onto slots.
    pub random_mode: bool,
    /// Seed for random mode.
    pub random_seed: u64,
}

impl Default for PlacerSettings {
    fn default() -> Self {
        Self {
            slots_per_section: 200,
            slots_increase_factor: 0.01,
            usage_per_section: 0.8,
            usage_increase_factor: 0.01,
            force_pin_spread: true,
            random_mode: false,
            random_seed: 42,
        }
    }
}

/// Metal layers the placed pin shapes are drawn on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayerConfig {
    /// Layer for pins on the left and right edges.
    pub horizontal: Option<String>,
    /// Layer for pins on the bottom and top edges.
    pub vertical: Option<String>,
}

/// A rectangular region of the boundary excluded from placement.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockageConfig {
    /// Lower-left corner of the blockage.
    #[serde(deserialize_with = "deserialize_point")]
    pub lower_left: Coordinate,
    /// Upper-right corner of the blockage.
    #[serde(deserialize_with = "deserialize_point")]
    pub upper_right: Coordinate,
}

impl BlockageConfig {
    /// Returns the blockage as a normalized rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.lower_left, self.upper_right)
    }
}

/// Deserializes a point written either as `[x, y]` or as `{ x = .., y = .. }`.
fn deserialize_point<'de, D>(deserializer: D) -> Result<Coordinate, D::Error>
where
    D: Deserializer<'de>,
{
    struct PointVisitor;

    impl<'de> Visitor<'de> for PointVisitor {
        type Value = Coordinate;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a point as [x, y] or { x, y }")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let x = seq
                .next_element::<Dbu>()?
                .ok_or_else(|| de::Error::invalid_length(0, &self))?;
            let y = seq
                .next_element::<Dbu>()?
                .ok_or_else(|| de::Error::invalid_length(1, &self))?;
            if seq.next_element::<Dbu>()?.is_some() {
                return Err(de::Error::invalid_length(3, &self));
            }
            Ok(Coordinate::new(x, y))
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut x = None;
            let mut y = None;
            while let Some(key) = map.next_key::<String>()? {
                match key.as_str() {
                    "x" => x = Some(map.next_value::<Dbu>()?),
                    "y" => y = Some(map.next_value::<Dbu>()?),
                    other => return Err(de::Error::unknown_field(other, &["x", "y"])),
                }
            }
            let x = x.ok_or_else(|| de::Error::missing_field("x"))?;
            let y = y.ok_or_else(|| de::Error::missing_field("y"))?;
            Ok(Coordinate::new(x, y))
        }
    }

    deserializer.deserialize_any(PointVisitor)
}

fn deserialize_opt_point<'de, D>(deserializer: D) -> Result<Option<Coordinate>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_point(deserializer).map(Some)
}
