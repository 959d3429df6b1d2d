//! Shared helpers for the `run` and `sweep` commands: configuration loading,
//! variant selection and diagnostic rendering.

use std::path::Path;

use sysnode_config::{SysnodeConfig, Variant};
use sysnode_diagnostics::{
    Diagnostic, DiagnosticRenderer, JsonRenderer, Severity, TerminalRenderer,
};
use sysnode_verify::{NodeA, NodeB, NodeVariant};

use crate::{GlobalArgs, ReportFormat};

/// Loads the configuration named by `--config`, or `./sysnode.toml` if present.
pub fn load_config(global: &GlobalArgs) -> Result<SysnodeConfig, Box<dyn std::error::Error>> {
    let config = match &global.config {
        Some(path) => sysnode_config::load_config_file(path)?,
        None => sysnode_config::load_config(Path::new("."))?,
    };
    Ok(config)
}

/// The reference model for a variant.
pub fn variant_impl(variant: Variant) -> &'static dyn NodeVariant {
    match variant {
        Variant::A => &NodeA,
        Variant::B => &NodeB,
    }
}

/// Writes diagnostics in the selected format: text to stderr, JSON lines to stdout.
///
/// In quiet mode only errors are written.
pub fn render_diagnostics(diagnostics: &[Diagnostic], global: &GlobalArgs) -> usize {
    let minimum = if global.quiet {
        Severity::Error
    } else {
        Severity::Note
    };
    let shown = diagnostics.iter().filter(|d| d.severity.at_least(minimum));
    let mut count = 0;
    match global.format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in shown {
                eprint!("{}", renderer.render(diag));
                count += 1;
            }
        }
        ReportFormat::Json => {
            for diag in shown {
                println!("{}", JsonRenderer.render(diag));
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysnode_diagnostics::DiagnosticCode;

    fn global(quiet: bool, format: ReportFormat) -> GlobalArgs {
        GlobalArgs {
            quiet,
            color: false,
            config: None,
            format,
        }
    }

    #[test]
    fn variant_selection() {
        assert_eq!(variant_impl(Variant::A).name(), "processor_node_a");
        assert_eq!(variant_impl(Variant::B).output_ports().len(), 2);
    }

    #[test]
    fn quiet_shows_only_errors() {
        let diags = [
            Diagnostic::note(DiagnosticCode::RUN_INFO, "stimulus seed 1"),
            Diagnostic::warning(DiagnosticCode::PRECISION, "lossy"),
            Diagnostic::error(DiagnosticCode::MISMATCH, "mismatch"),
        ];
        assert_eq!(render_diagnostics(&diags, &global(true, ReportFormat::Text)), 1);
        assert_eq!(render_diagnostics(&diags, &global(false, ReportFormat::Json)), 3);
    }

    #[test]
    fn explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[run]\nevents = 3\n").unwrap();
        let mut g = global(false, ReportFormat::Text);
        g.config = Some(path);
        assert_eq!(load_config(&g).unwrap().run.events, 3);
    }

    #[test]
    fn missing_explicit_config_is_error() {
        let mut g = global(false, ReportFormat::Text);
        g.config = Some("/nonexistent/sysnode.toml".into());
        assert!(load_config(&g).is_err());
    }
}
