//! Summary file naming and rendering.

use docsum_config::OutputFormat;
use std::path::{Path, PathBuf};

/// `{dir}/{name.ext}.summary.md` (or `.summary.txt`) next to `original`.
pub fn summary_path(original: &Path, format: OutputFormat) -> PathBuf {
    let name = original
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    original.with_file_name(format!("{}.{}", name, format.summary_suffix()))
}

/// Render the summary body for `format`.
pub fn render_summary(summary: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Markdown => format_markdown(summary),
        OutputFormat::Text => summary.to_string(),
    }
}

/// One paragraph per non-blank line, separated by a blank line.
pub fn format_markdown(summary: &str) -> String {
    let paragraphs: Vec<&str> = summary
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect();

    let mut out = paragraphs.join("\n\n");
    out.push('\n');
    out
}
