//! Rendering of pipeline results for stdout.

use triage_core::PipelineResult;

use crate::args::OutputFormat;

pub fn render(result: &PipelineResult, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string(result)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(result)?,
        OutputFormat::Card => card(result),
    })
}

/// Vertical card: input, response, then ranked predictions.
fn card(result: &PipelineResult) -> String {
    let mut out = String::new();
    out.push_str("=== triage ===\n");
    out.push_str(&format!("  {:<26} {}\n", "input", result.input));
    out.push_str(&format!("  {:<26} {}\n", "response", result.response));
    out.push('\n');

    out.push_str("Predictions\n");
    if result.predictions.is_empty() {
        out.push_str("  (no confident intent)\n");
    }
    for p in &result.predictions {
        out.push_str(&format!("  {:<26} {:.3}\n", p.intent, p.probability));
    }
    out
}
