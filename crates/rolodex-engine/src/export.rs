//! CSV export fallback used when no external export handler is installed.

use csv::{QuoteStyle, WriterBuilder};

use rolodex_core::{CoreError, CoreResult, Record};

/// Fixed column set of the fallback export.
const COLUMNS: [&str; 7] = [
    "name",
    "email",
    "organisation",
    "headline",
    "last_contacted_at",
    "connected_at",
    "mutual_connections",
];

/// A synthesized export ready for the host to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested download filename.
    pub filename: String,
    /// Serialized CSV content, every cell quoted.
    pub content: String,
}

impl CsvExport {
    /// Number of lines, header included.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// Serializes the given records into a quoted CSV table.
///
/// Missing fields degrade to empty strings (timestamps, text) or zero
/// (mutual count); no cell ever renders a null-ish literal.
pub fn build_csv<R: Record>(records: &[&R], filename: &str) -> CoreResult<CsvExport> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(COLUMNS)
        .map_err(|e| CoreError::Serialization(e.to_string()))?;

    for record in records {
        writer
            .write_record([
                record.display_name(),
                record.email().unwrap_or_default().to_string(),
                record.organisation().unwrap_or_default().to_string(),
                record.headline().unwrap_or_default().to_string(),
                record
                    .last_contacted_at()
                    .map(|ts| ts.to_rfc3339())
                    .unwrap_or_default(),
                record
                    .connected_at()
                    .map(|ts| ts.to_rfc3339())
                    .unwrap_or_default(),
                record.mutual_connections().unwrap_or(0).to_string(),
            ])
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Serialization(e.to_string()))?;
    let content =
        String::from_utf8(bytes).map_err(|e| CoreError::Serialization(e.to_string()))?;

    Ok(CsvExport {
        filename: filename.to_string(),
        content,
    })
}
