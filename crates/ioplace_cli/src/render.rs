//! Output helpers: diagnostics on stderr and the pin assignment.

use ioplace::PlacementReport;
use ioplace_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, TerminalRenderer};

use crate::GlobalArgs;

/// Returns whether a diagnostic is shown under the given flags.
///
/// `--quiet` keeps errors only; notes need `--verbose`.
pub fn is_visible(diag: &Diagnostic, global: &GlobalArgs) -> bool {
    diag.severity.is_shown(global.quiet, global.verbose)
}

/// Drains the sink and prints visible diagnostics to stderr.
pub fn flush_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.take_all() {
        if is_visible(&diag, global) {
            eprint!("{}", renderer.render(&diag));
        }
    }
}

/// Formats the assignment as a PINS-section style listing.
///
/// Layer shapes are written relative to the placed position.
pub fn format_text(report: &PlacementReport) -> String {
    let mut out = format!("PINS {} ;\n", report.assignments.len());
    for pin in &report.assignments {
        out.push_str(&format!(
            "- {} + NET {} + DIRECTION {} + USE SIGNAL\n",
            pin.name, pin.net, pin.direction
        ));
        if let Some(shape) = pin.shape {
            let layer = pin.layer.as_deref().unwrap_or("UNASSIGNED");
            out.push_str(&format!(
                "  + LAYER {layer} ( {} {} ) ( {} {} )\n",
                shape.ll.x - pin.pos.x,
                shape.ll.y - pin.pos.y,
                shape.ur.x - pin.pos.x,
                shape.ur.y - pin.pos.y
            ));
        }
        out.push_str(&format!("  + PLACED {} {} ;\n", pin.pos, pin.orientation));
    }
    out.push_str("END PINS\n");
    out
}

/// Formats the full report as pretty-printed JSON.
pub fn format_json(report: &PlacementReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ioplace::{Direction, Orientation, PinId, PlacedPin};
    use ioplace_common::{Coordinate, Rect};
    use ioplace_diagnostics::{Category, DiagnosticCode};

    fn global(quiet: bool, verbose: bool) -> GlobalArgs {
        GlobalArgs {
            quiet,
            verbose,
            color: false,
            config: None,
        }
    }

    fn report() -> PlacementReport {
        PlacementReport {
            assignments: vec![PlacedPin {
                pin: PinId::from_raw(0),
                name: "clk".to_string(),
                net: "clk".to_string(),
                direction: Direction::Input,
                slot: 5,
                pos: Coordinate::new(500, 0),
                orientation: Orientation::North,
                shape: Some(Rect::new(Coordinate::new(490, 0), Coordinate::new(510, 20))),
                layer: Some("M2".to_string()),
                hpwl: 20,
            }],
            unplaced: Vec::new(),
            total_hpwl: 20,
            total_hpwl_microns: 0.02,
            naive_hpwl: 500,
            slots: 39,
            sections: 1,
            slots_per_section: 200,
            partition_iterations: 1,
            random_mode: false,
        }
    }

    #[test]
    fn visibility_follows_flags() {
        let note = Diagnostic::note(DiagnosticCode::new(Category::Note, 1), "summary");
        let warn = Diagnostic::warning(DiagnosticCode::new(Category::Performance, 1), "slow");
        let err = Diagnostic::error(DiagnosticCode::new(Category::Error, 1), "bad");

        assert!(!is_visible(&note, &global(false, false)));
        assert!(is_visible(&note, &global(false, true)));
        assert!(is_visible(&warn, &global(false, false)));
        assert!(!is_visible(&warn, &global(true, true)));
        assert!(is_visible(&err, &global(true, false)));
    }

    #[test]
    fn text_listing() {
        let text = format_text(&report());
        assert!(text.starts_with("PINS 1 ;\n"));
        assert!(text.contains("- clk + NET clk + DIRECTION INPUT + USE SIGNAL"));
        assert!(text.contains("+ LAYER M2 ( -10 0 ) ( 10 20 )"));
        assert!(text.contains("+ PLACED ( 500 0 ) N ;"));
        assert!(text.ends_with("END PINS\n"));
    }

    #[test]
    fn json_report() {
        let json = format_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_hpwl"], 20);
        assert_eq!(value["assignments"][0]["orientation"], "North");
        assert_eq!(value["assignments"][0]["pos"]["x"], 500);
    }
}
