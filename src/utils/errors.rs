//! User-Friendly Error Formatting
//!
//! Provides user-friendly error messages with troubleshooting hints
//! for common error scenarios.

use std::fmt::Write;

/// Format error for user consumption
///
/// Takes technical error and produces user-friendly message with
/// troubleshooting steps and context.
pub fn format_user_error(error: &anyhow::Error) -> String {
    let mut output = String::new();

    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "╔════════════════════════════════════════════════════════════╗"
    )
    .ok();
    writeln!(
        &mut output,
        "║                     ERROR                                  ║"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();
    writeln!(&mut output).ok();

    let error_msg = format!("{:#}", error);

    if error_msg.contains("breakpoints") || error_msg.contains("curve slope") {
        format_curve_error(&mut output);
    } else if error_msg.contains("config") {
        format_config_error(&mut output);
    } else if error_msg.contains("trace") || error_msg.contains("Trace") {
        format_trace_error(&mut output);
    } else {
        format_generic_error(&mut output);
    }

    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Technical Details:").ok();
    writeln!(&mut output).ok();
    writeln!(&mut output, "{:#}", error).ok();
    writeln!(&mut output).ok();

    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Need Help?").ok();
    writeln!(
        &mut output,
        "  - Run with --verbose for detailed logs: lamco-aim-assist -vv"
    )
    .ok();
    writeln!(
        &mut output,
        "  - Print the resolved configuration: lamco-aim-assist config"
    )
    .ok();

    output
}

fn format_curve_error(output: &mut String) {
    writeln!(output, "Easing Curve Error").ok();
    writeln!(output).ok();
    writeln!(output, "An easing curve could not be built.").ok();
    writeln!(output).ok();
    writeln!(output, "Check:").ok();
    writeln!(output, "  - Breakpoints satisfy 0 < a < b < s").ok();
    writeln!(output, "  - Slopes k1, k2, k3 are finite numbers").ok();
    writeln!(
        output,
        "  - Non-negative slopes keep the curve non-decreasing"
    )
    .ok();
}

fn format_config_error(output: &mut String) {
    writeln!(output, "Configuration Error").ok();
    writeln!(output).ok();
    writeln!(output, "The configuration file could not be loaded.").ok();
    writeln!(output).ok();
    writeln!(output, "Check:").ok();
    writeln!(output, "  - The file exists and is readable").ok();
    writeln!(output, "  - TOML syntax is valid").ok();
    writeln!(
        output,
        "  - Limits, radius and sigma are finite (sigma must be positive)"
    )
    .ok();
}

fn format_trace_error(output: &mut String) {
    writeln!(output, "Trace Error").ok();
    writeln!(output).ok();
    writeln!(output, "The input trace could not be replayed.").ok();
    writeln!(output).ok();
    writeln!(output, "Check:").ok();
    writeln!(
        output,
        "  - Each line is one JSON object with an \"event\" of reset, target or delta"
    )
    .ok();
    writeln!(output, "  - Timestamps \"t\" are seconds and never decrease").ok();
}

fn format_generic_error(output: &mut String) {
    writeln!(output, "Unexpected Error").ok();
    writeln!(output).ok();
    writeln!(output, "See the technical details below.").ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assist::AssistError;

    #[test]
    fn test_curve_error_hint() {
        let err = anyhow::Error::new(AssistError::InvalidBreakpoints {
            a: 2.0,
            b: 1.0,
            s: 3.0,
        })
        .context("Invalid assist configuration");
        let text = format_user_error(&err);
        assert!(text.contains("Easing Curve Error"));
        assert!(text.contains("0 < a < b < s"));
    }

    #[test]
    fn test_trace_error_hint() {
        let err = anyhow::anyhow!("Malformed trace event on line 3");
        let text = format_user_error(&err);
        assert!(text.contains("Trace Error"));
        assert!(text.contains("line 3"));
    }

    #[test]
    fn test_generic_error() {
        let err = anyhow::anyhow!("something else");
        assert!(format_user_error(&err).contains("Unexpected Error"));
    }
}
