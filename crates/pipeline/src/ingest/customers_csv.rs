use std::path::Path;

use crate::shared::error::PipelineError;

/// Customer row as read from the source file, before cleansing. A column
/// missing from the file (or an empty cell) becomes `None`; that is not an
/// error at this stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCustomerRow {
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub mobile_number: Option<String>,
    pub region: Option<String>,
}

/// Parse the customers CSV. Header names are matched case-insensitively
/// after trimming. A structurally malformed file (bad quoting, ragged
/// record) aborts the run with a parse error.
pub fn read_customers(path: &Path) -> Result<Vec<RawCustomerRow>, PipelineError> {
    let text = std::fs::read_to_string(path)?;
    // Strip UTF-8 BOM if present
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::Parse(format!("failed to read CSV headers: {}", e)))?
        .clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| PipelineError::Parse(format!("malformed CSV record: {}", e)))?;

        // Field by header name (case-insensitive); empty cells become None
        let get_field = |name: &str| -> Option<String> {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .and_then(|i| record.get(i))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        rows.push(RawCustomerRow {
            customer_id: get_field("customer_id"),
            customer_name: get_field("customer_name"),
            mobile_number: get_field("mobile_number"),
            region: get_field("region"),
        });
    }

    tracing::info!("Read {} customer rows from {}", rows.len(), path.display());
    Ok(rows)
}
