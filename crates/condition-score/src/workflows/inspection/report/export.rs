use super::summary::InspectionReport;
use super::views::FindingRow;
use std::io::Write;

const HEADERS: [&str; 10] = [
    "scope",
    "category",
    "item",
    "severity",
    "description",
    "weight",
    "count",
    "points",
    "life_threatening",
    "note",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV export: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the report's findings listing as CSV, one row per recorded defect.
pub fn write_csv<W: Write>(report: &InspectionReport, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    if report.findings.is_empty() {
        csv_writer.write_record(HEADERS)?;
    }

    for line in &report.findings {
        csv_writer.serialize(FindingRow::from(line))?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn render_csv(report: &InspectionReport) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(report, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
