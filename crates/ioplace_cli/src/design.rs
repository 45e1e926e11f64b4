//! Loading a design: configuration plus the JSON netlist.

use std::path::{Path, PathBuf};

use ioplace::{
    CoreBoundary, Direction, InstancePin, IoPin, IoPlacer, LayerRules, PinLayers, PlacerParams,
};
use ioplace_common::{Coordinate, Dbu, Rect};
use ioplace_config::PlacerConfig;
use serde::Deserialize;

use crate::GlobalArgs;

/// A pin entry of the JSON netlist.
#[derive(Debug, Deserialize)]
pub struct PinEntry {
    /// Pin name.
    pub name: String,
    /// Net name; defaults to the pin name.
    #[serde(default)]
    pub net: Option<String>,
    /// `INPUT`, `OUTPUT` or `INOUT`.
    #[serde(default = "default_direction")]
    pub direction: String,
    /// Terminal shape `[llx, lly, urx, ury]` relative to the pin position.
    #[serde(default)]
    pub bounds: Option<[Dbu; 4]>,
    /// Cell terminals on the pin's net.
    #[serde(default)]
    pub sinks: Vec<SinkEntry>,
}

fn default_direction() -> String {
    "INPUT".to_string()
}

/// A cell terminal of the JSON netlist.
#[derive(Debug, Deserialize)]
pub struct SinkEntry {
    /// Instance pin name, e.g. `u1/A`.
    pub name: String,
    /// Horizontal position.
    pub x: Dbu,
    /// Vertical position.
    pub y: Dbu,
}

/// Top-level JSON netlist.
#[derive(Debug, Deserialize)]
pub struct NetlistFile {
    /// All I/O pins of the design.
    pub pins: Vec<PinEntry>,
}

/// Parses a JSON netlist.
pub fn parse_netlist(content: &str) -> Result<NetlistFile, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(content)?)
}

/// Resolves and loads the configuration file.
///
/// Uses `--config` when given, otherwise `ioplace.toml` in the current directory.
pub fn load_config(global: &GlobalArgs) -> Result<PlacerConfig, Box<dyn std::error::Error>> {
    let path = match &global.config {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?.join(ioplace_config::CONFIG_FILE_NAME),
    };
    if !path.is_file() {
        return Err(format!("configuration file {} not found", path.display()).into());
    }
    Ok(ioplace_config::load_config_from_path(&path)?)
}

/// Builds the core boundary described by the configuration.
pub fn boundary_from_config(
    config: &PlacerConfig,
) -> Result<CoreBoundary, Box<dyn std::error::Error>> {
    let core = &config.core;
    let mut boundary = CoreBoundary::new(
        core.lower_left,
        core.upper_right,
        core.min_spacing,
        core.init_tracks,
    )?
    .with_database_unit(core.database_unit);
    if let Some(min_width) = core.min_width {
        boundary = boundary.with_layer_rules(LayerRules {
            min_width,
            min_area: core.min_area.unwrap_or_default(),
        });
    }
    Ok(boundary)
}

/// Translates configuration knobs into run parameters.
pub fn params_from_config(config: &PlacerConfig) -> PlacerParams {
    let s = &config.placer;
    PlacerParams {
        slots_per_section: f64::from(s.slots_per_section),
        slots_increase_factor: s.slots_increase_factor,
        usage_per_section: s.usage_per_section,
        usage_increase_factor: s.usage_increase_factor,
        force_pin_spread: s.force_pin_spread,
        random_mode: s.random_mode,
        random_seed: s.random_seed,
    }
}

/// Builds a ready-to-run placer from the configuration and netlist.
pub fn build_placer(
    config: &PlacerConfig,
    params: PlacerParams,
    netlist: NetlistFile,
) -> Result<IoPlacer, Box<dyn std::error::Error>> {
    let boundary = boundary_from_config(config)?;
    let mut placer = IoPlacer::new(boundary, params).with_layers(PinLayers {
        horizontal: config.layers.horizontal.clone(),
        vertical: config.layers.vertical.clone(),
    });
    for blockage in &config.blockages {
        placer.add_blockage(blockage.rect());
    }
    for entry in netlist.pins {
        let direction: Direction = entry
            .direction
            .parse()
            .map_err(|e| format!("pin '{}': {e}", entry.name))?;
        let net = entry.net.unwrap_or_else(|| entry.name.clone());
        let mut pin = IoPin::new(entry.name, net, direction);
        if let Some([llx, lly, urx, ury]) = entry.bounds {
            pin = pin.with_bounds(Rect::new(Coordinate::new(llx, lly), Coordinate::new(urx, ury)));
        }
        let sinks = entry
            .sinks
            .into_iter()
            .map(|s| InstancePin::new(s.name, Coordinate::new(s.x, s.y)));
        placer.add_io_pin(pin, sinks);
    }
    Ok(placer)
}

/// Reads a JSON netlist from disk.
pub fn read_netlist(path: &Path) -> Result<NetlistFile, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read netlist {}: {e}", path.display()))?;
    parse_netlist(&content)
}
