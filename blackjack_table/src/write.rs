use crate::SessionSummary;
use std::io::Write;

fn format_summary(label: &str, summary: &SessionSummary) -> String {
    const WIDTH: usize = 60;
    let header = format!("{:-^WIDTH$}\n", format!(" {} ", label));
    format!("{}{}\n{}\n", header, summary, "-".repeat(WIDTH))
}

/// Writes `summary` under a `label` header to `writer`, e.g. stdout or a results file.
pub fn write_summary(
    label: &str,
    summary: &SessionSummary,
    mut writer: impl Write,
) -> std::io::Result<()> {
    writer.write_all(format_summary(label, summary).as_bytes())?;
    writer.flush()
}

/// Writes `summary` as a single line of JSON, for feeding the results to other tools.
pub fn write_summary_json(
    summary: &SessionSummary,
    mut writer: impl Write,
) -> Result<(), crate::SessionError> {
    serde_json::to_writer(&mut writer, summary)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
