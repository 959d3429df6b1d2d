//! Diagnostic rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[E201]: output mismatch
///   --> node_a fixed(8, 8): cycle 12, channel data_out_n
///    = note: expected 0000000100000000 (1)
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let label = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return label;
        }
        format!("{}{label}\x1b[0m", diag.severity.ansi())
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!("{}: {}\n", self.header(diag), diag.message);

        let mut location = Vec::new();
        if let Some(cycle) = diag.cycle {
            location.push(format!("cycle {cycle}"));
        }
        if let Some(channel) = &diag.channel {
            location.push(format!("channel {channel}"));
        }
        match (&diag.instance, location.is_empty()) {
            (Some(instance), true) => out.push_str(&format!("  --> {instance}\n")),
            (Some(instance), false) => {
                out.push_str(&format!("  --> {instance}: {}\n", location.join(", ")))
            }
            (None, false) => out.push_str(&format!("  --> {}\n", location.join(", "))),
            (None, true) => {}
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }
}

/// Renders each diagnostic as a single-line JSON object.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        // Diagnostic contains only strings, integers and enums.
        serde_json::to_string(diag).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;

    #[test]
    fn render_error_with_location() {
        let diag = Diagnostic::error(DiagnosticCode::MISMATCH, "output mismatch")
            .with_instance("node_a")
            .with_cycle(12)
            .with_channel("data_out_n")
            .with_note("expected 0110 (1.5)");
        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.starts_with("error[E201]: output mismatch\n"));
        assert!(output.contains("  --> node_a: cycle 12, channel data_out_n\n"));
        assert!(output.contains("   = note: expected 0110 (1.5)\n"));
    }

    #[test]
    fn render_warning_without_cycle() {
        let diag = Diagnostic::warning(DiagnosticCode::PRECISION, "lossy cast")
            .with_channel("data_out_sw")
            .with_help("widen the output format");
        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.contains("warning[W101]: lossy cast"));
        assert!(output.contains("  --> channel data_out_sw\n"));
        assert!(output.contains("= help: widen the output format"));
    }

    #[test]
    fn render_without_context() {
        let diag = Diagnostic::note(DiagnosticCode::RUN_INFO, "seed 42");
        let output = TerminalRenderer::new(false).render(&diag);
        assert_eq!(output, "note[N301]: seed 42\n");
    }

    #[test]
    fn render_with_color() {
        let diag = Diagnostic::error(DiagnosticCode::CONFIGURATION, "bad width");
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.starts_with("\x1b[1;31merror[E101]\x1b[0m: bad width"));
    }

    #[test]
    fn render_json() {
        let diag = Diagnostic::error(DiagnosticCode::MISMATCH, "output mismatch").with_cycle(3);
        let line = JsonRenderer.render(&diag);
        let back: Diagnostic = serde_json::from_str(&line).unwrap();
        assert_eq!(back, diag);
        assert!(!line.contains('\n'));
    }
}
