//! `sysnode run`: verify one configuration against the behavioral model.
//!
//! Builds a node model from `sysnode.toml` (with command-line overrides), runs
//! a single randomized test instance and reports PASS or FAIL.

use sysnode_diagnostics::DiagnosticSink;
use sysnode_sim::{build_model, ModelConfig};
use sysnode_verify::{run_test, RunOptions, VerifyError};

use crate::pipeline::{load_config, render_diagnostics, variant_impl};
use crate::{GlobalArgs, ReportFormat, RunArgs};

/// Runs the `sysnode run` command.
///
/// Returns exit code 0 if the instance passes, 1 if it fails.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;

    let variant = args.variant.unwrap_or(config.node.variant);
    let kind = variant.kind();
    let events = args.events.unwrap_or(config.run.events);

    let mut model_config = ModelConfig::new(kind, config.run_generics(variant));
    model_config.latency = args.latency.unwrap_or(config.node.latency);
    model_config.waveform_path = args.waveform.clone().or_else(|| config.run.waveform.clone());
    let mut dut = build_model(&model_config)?;

    let options = RunOptions {
        seed: args.seed.or(config.run.seed),
        clock_period: config.run.clock_period()?,
        instance: None,
    };

    if !global.quiet && global.format == ReportFormat::Text {
        eprintln!("   Verifying {} ({events} events)", kind.toplevel());
    }

    let sink = DiagnosticSink::new();
    let result = run_test(&mut dut, variant_impl(variant), events, &options, &sink);
    render_diagnostics(&sink.take_all(), global);

    let passed = result.is_ok();
    match global.format {
        ReportFormat::Text => {
            if !global.quiet {
                print_run_result(kind.toplevel(), &result);
            }
        }
        ReportFormat::Json => {
            let summary = match &result {
                Ok(report) => {
                    let mut value = serde_json::to_value(report)?;
                    value["passed"] = serde_json::Value::Bool(true);
                    value
                }
                Err(e) => serde_json::json!({
                    "instance": kind.toplevel(),
                    "passed": false,
                    "error": e.to_string(),
                }),
            };
            println!("{summary}");
        }
    }

    Ok(if passed { 0 } else { 1 })
}

fn print_run_result(name: &str, result: &Result<sysnode_verify::RunReport, VerifyError>) {
    match result {
        Ok(report) => {
            let seed = report
                .seed
                .map_or_else(String::new, |s| format!(", seed {s}"));
            eprintln!(
                "   PASS  {name} ({} comparisons, {} precision warning(s){seed})",
                report.comparisons, report.precision_warnings,
            );
        }
        Err(e) => eprintln!("   FAIL  {name}: {e}"),
    }
}
