//! `ioplace slots`: inspect the slot ring a configuration produces.

use ioplace::{orientation_of, Orientation, SlotRing};
use ioplace_diagnostics::DiagnosticSink;

use crate::design::{boundary_from_config, load_config};
use crate::render::flush_diagnostics;
use crate::{GlobalArgs, SlotsArgs};

/// Per-orientation slot counts: (orientation, total, blocked).
pub fn edge_summary(
    ring: &SlotRing,
    boundary: &ioplace::CoreBoundary,
) -> Vec<(Orientation, usize, usize)> {
    let mut rows = vec![
        (Orientation::North, 0, 0),
        (Orientation::West, 0, 0),
        (Orientation::South, 0, 0),
        (Orientation::East, 0, 0),
    ];
    for slot in ring.slots() {
        let Some(orientation) = orientation_of(slot.pos, boundary) else {
            continue;
        };
        if let Some(row) = rows.iter_mut().find(|r| r.0 == orientation) {
            row.1 += 1;
            if slot.blocked {
                row.2 += 1;
            }
        }
    }
    rows
}

/// Runs the `ioplace slots` command.
pub fn run(args: &SlotsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let boundary = boundary_from_config(&config)?;
    let blockages: Vec<_> = config.blockages.iter().map(|b| b.rect()).collect();

    let sink = DiagnosticSink::new();
    let valid = ioplace::validate_blockages(&boundary, &blockages, &sink);
    flush_diagnostics(&sink, global);
    let ring = SlotRing::generate(&boundary, &valid?);

    if args.all {
        for (i, slot) in ring.slots().iter().enumerate() {
            let state = if slot.blocked { "blocked" } else { "free" };
            println!("{i:>6} {} {state}", slot.pos);
        }
    } else {
        println!("{:<8} {:>8} {:>8}", "edge", "slots", "blocked");
        for (orientation, total, blocked) in edge_summary(&ring, &boundary) {
            println!("{:<8} {total:>8} {blocked:>8}", format!("{orientation:?}"));
        }
    }
    println!(
        "{} slots, {} usable, pitch {}",
        ring.len(),
        ring.usable_count(),
        ring.pitch()
    );
    Ok(0)
}
