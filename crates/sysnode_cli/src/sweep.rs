//! `sysnode sweep`: verify a node across the bit-width grid.
//!
//! Every grid point is an independent test instance with its own model and
//! seed, so the points run in parallel. Results are reported in grid order
//! with a PASS/FAIL line each and a summary.

use std::collections::BTreeSet;

use rayon::prelude::*;
use sysnode_config::{SweepPoint, Variant};
use sysnode_diagnostics::{DiagnosticSink, Severity};
use sysnode_sim::{build_model, ModelConfig, SimTime};
use sysnode_verify::{run_test, RunOptions, RunReport};

use crate::pipeline::{load_config, render_diagnostics, variant_impl};
use crate::{GlobalArgs, ReportFormat, SweepArgs};

/// Result of one grid point.
struct PointResult {
    /// Instance label, e.g. `processor_node_a[8.8->16.16]`.
    name: String,
    /// Report of a passing instance.
    report: Option<RunReport>,
    /// Why the instance failed.
    error: Option<String>,
}

impl PointResult {
    fn passed(&self) -> bool {
        self.report.is_some()
    }
}

/// Runs the `sysnode sweep` command.
///
/// Returns exit code 0 if every grid point passes, 1 otherwise.
pub fn run(args: &SweepArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let variant = args.variant.unwrap_or(config.node.variant);
    let events = args.events.unwrap_or(config.run.events);
    let base_seed = args.seed.or(config.run.seed);
    let clock_period = config.run.clock_period()?;
    let latency = config.node.latency;
    let points = config.sweep.points();

    if !global.quiet && global.format == ReportFormat::Text {
        eprintln!(
            "   Sweeping {} over {} configuration(s), {events} events each",
            variant.kind().toplevel(),
            points.len()
        );
    }

    let sink = DiagnosticSink::new();
    let results: Vec<PointResult> = points
        .par_iter()
        .enumerate()
        .map(|(index, point)| {
            let seed = base_seed.map(|s| s.wrapping_add(index as u64));
            run_point(variant, *point, latency, events, seed, clock_period, &sink)
        })
        .collect();

    let failed_names: BTreeSet<&str> = results
        .iter()
        .filter(|r| !r.passed())
        .map(|r| r.name.as_str())
        .collect();

    // Seeds are only worth showing for instances that need replaying.
    let mut diagnostics: Vec<_> = sink
        .take_all()
        .into_iter()
        .filter(|d| {
            d.severity != Severity::Note
                || d.instance
                    .as_deref()
                    .is_some_and(|name| failed_names.contains(name))
        })
        .collect();
    diagnostics.sort_by(|a, b| a.instance.cmp(&b.instance));
    render_diagnostics(&diagnostics, global);

    let passed = results.iter().filter(|r| r.passed()).count();
    let failed = results.len() - passed;

    match global.format {
        ReportFormat::Text => {
            if !global.quiet {
                for result in &results {
                    print_point_result(result);
                }
                eprintln!();
                eprintln!(
                    "   Result: {passed} passed, {failed} failed out of {} configuration(s)",
                    results.len()
                );
            }
        }
        ReportFormat::Json => {
            for result in &results {
                let line = serde_json::json!({
                    "instance": result.name,
                    "passed": result.passed(),
                    "seed": result.report.as_ref().and_then(|r| r.seed),
                    "error": result.error,
                });
                println!("{line}");
            }
        }
    }

    Ok(if failed > 0 { 1 } else { 0 })
}

/// Builds a model for one grid point and verifies it.
fn run_point(
    variant: Variant,
    point: SweepPoint,
    latency: usize,
    events: usize,
    seed: Option<u64>,
    clock_period: SimTime,
    sink: &DiagnosticSink,
) -> PointResult {
    let kind = variant.kind();
    let name = format!("{}[{}]", kind.toplevel(), point.label());

    let mut model_config = ModelConfig::new(kind, point.generics(kind));
    model_config.latency = latency;
    let mut dut = match build_model(&model_config) {
        Ok(dut) => dut,
        Err(e) => {
            return PointResult {
                name,
                report: None,
                error: Some(format!("model error: {e}")),
            }
        }
    };

    let options = RunOptions {
        seed,
        clock_period,
        instance: Some(name.clone()),
    };
    match run_test(&mut dut, variant_impl(variant), events, &options, sink) {
        Ok(report) => PointResult {
            name,
            report: Some(report),
            error: None,
        },
        Err(e) => PointResult {
            name,
            report: None,
            error: Some(e.to_string()),
        },
    }
}

/// Prints the result of a single grid point.
fn print_point_result(result: &PointResult) {
    match (&result.report, &result.error) {
        (Some(report), _) => eprintln!(
            "   PASS  {name} ({count} comparisons)",
            name = result.name,
            count = report.comparisons,
        ),
        (None, Some(err)) => eprintln!("   FAIL  {name}: {err}", name = result.name),
        (None, None) => eprintln!("   FAIL  {name}", name = result.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn global_with(config: PathBuf) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            color: false,
            config: Some(config),
            format: ReportFormat::Text,
        }
    }

    fn write_config(dir: &std::path::Path, content: &str) -> PathBuf {
        let path = dir.join("sysnode.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    const SMALL_GRID: &str = r#"
[sweep]
input_int = [4, 8]
input_frac = [4]
output_int_scale = [2, 3]
output_frac_scale = 2
"#;

    #[test]
    fn small_grid_passes() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), SMALL_GRID);
        let args = SweepArgs {
            variant: Some(Variant::B),
            events: Some(10),
            seed: Some(1),
        };
        assert_eq!(run(&args, &global_with(config)).unwrap(), 0);
    }

    #[test]
    fn wrong_latency_fails_every_point() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), &format!("[node]\nlatency = 2\n{SMALL_GRID}"));
        let args = SweepArgs {
            variant: Some(Variant::A),
            events: Some(10),
            seed: Some(1),
        };
        assert_eq!(run(&args, &global_with(config)).unwrap(), 1);
    }

    #[test]
    fn point_labels_name_the_formats() {
        let point = SweepPoint {
            input_int: 4,
            input_frac: 8,
            output_int: 8,
            output_frac: 24,
        };
        let sink = DiagnosticSink::new();
        let result = run_point(Variant::A, point, 3, 5, Some(9), SimTime::from_ns(10), &sink);
        assert!(result.passed());
        assert_eq!(result.name, "processor_node_a[4.8->8.24]");
        assert!(sink
            .diagnostics()
            .iter()
            .all(|d| d.instance.as_deref() == Some(result.name.as_str())));
    }
}
