//! `ioplace place`: run the placer on a JSON netlist.
//!
//! 1. Load `ioplace.toml`
//! 2. Read the netlist and build the placer
//! 3. Run placement, rendering diagnostics as they are drained
//! 4. Print or write the assignment

use std::path::Path;

use ioplace_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Severity};

use crate::design::{build_placer, load_config, params_from_config, read_netlist};
use crate::render::{flush_diagnostics, format_json, format_text};
use crate::{GlobalArgs, PlaceArgs, ReportFormat};

/// Runs the `ioplace place` command.
///
/// Returns exit code 0 when every pin was placed, 1 otherwise.
pub fn run(args: &PlaceArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let mut params = params_from_config(&config);
    if args.random {
        params.random_mode = true;
    }
    if let Some(seed) = args.seed {
        params.random_seed = seed;
    }

    let netlist = read_netlist(Path::new(&args.netlist))?;
    let mut placer = build_placer(&config, params, netlist)?;

    if !global.quiet {
        eprintln!(
            "    Placing {} pins from {}",
            placer.netlist().pin_count(),
            args.netlist
        );
    }

    let sink = DiagnosticSink::new();
    let result = placer.run(&sink);
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            sink.emit(Diagnostic::error(DiagnosticCode::new(Category::Error, 1), e.to_string()));
            flush_diagnostics(&sink, global);
            return Ok(1);
        }
    };
    flush_diagnostics(&sink, global);

    let rendered = match args.format {
        ReportFormat::Text => format_text(&report),
        ReportFormat::Json => format_json(&report)?,
    };
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            if !global.quiet {
                eprintln!("     Written {path}");
            }
        }
        None => print!("{rendered}"),
    }

    if !global.quiet {
        eprintln!(
            "   Finished {} pins, wirelength {:.3} um",
            report.assignments.len(),
            report.total_hpwl_microns
        );
        eprintln!(
            "     Result: {} error(s), {} warning(s)",
            sink.count(Severity::Error),
            sink.count(Severity::Warning)
        );
    }

    Ok(if report.unplaced.is_empty() { 0 } else { 1 })
}
