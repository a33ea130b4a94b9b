use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::shared::error::PipelineError;

/// Order row as read from one `<order>` element, before cleansing.
///
/// `order_id` and `mobile_number` stay `None` when the element is missing —
/// those rows are filtered (and counted) downstream, not here. The numeric
/// fields already carry their documented defaults: 0 for `sku_count`,
/// 0.0 for `total_amount`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOrderRow {
    pub order_id: Option<String>,
    pub mobile_number: Option<String>,
    pub order_date_time: Option<String>,
    pub sku_id: Option<String>,
    pub sku_count: i64,
    pub total_amount: f64,
}

#[derive(Default)]
struct PendingOrder {
    order_id: Option<String>,
    mobile_number: Option<String>,
    order_date_time: Option<String>,
    sku_id: Option<String>,
    sku_count: Option<String>,
    total_amount: Option<String>,
}

impl PendingOrder {
    fn set(&mut self, field: &str, value: String) {
        match field {
            "order_id" => self.order_id = Some(value),
            "mobile_number" => self.mobile_number = Some(value),
            "order_date_time" => self.order_date_time = Some(value),
            "sku_id" => self.sku_id = Some(value),
            "sku_count" => self.sku_count = Some(value),
            "total_amount" => self.total_amount = Some(value),
            _ => {}
        }
    }

    fn finalize(self) -> Result<RawOrderRow, PipelineError> {
        let sku_count = match self.sku_count.as_deref() {
            Some(text) if !text.is_empty() => text.parse::<i64>().map_err(|_| {
                PipelineError::Parse(format!("invalid sku_count '{}'", text))
            })?,
            _ => 0,
        };
        let total_amount = match self.total_amount.as_deref() {
            Some(text) if !text.is_empty() => text.parse::<f64>().map_err(|_| {
                PipelineError::Parse(format!("invalid total_amount '{}'", text))
            })?,
            _ => 0.0,
        };
        Ok(RawOrderRow {
            order_id: self.order_id,
            mobile_number: self.mobile_number,
            order_date_time: self.order_date_time,
            sku_id: self.sku_id,
            sku_count,
            total_amount,
        })
    }
}

/// Parse the orders XML: a root element containing repeated `<order>`
/// elements, each with text-node children. One output row per order
/// element. Malformed XML aborts the run with a parse error.
pub fn read_orders(path: &Path) -> Result<Vec<RawOrderRow>, PipelineError> {
    let text = std::fs::read_to_string(path)?;
    let mut reader = Reader::from_str(&text);

    let mut rows = Vec::new();
    let mut depth = 0usize;
    let mut current: Option<PendingOrder> = None;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(PipelineError::Parse(format!(
                    "malformed XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                depth += 1;
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if depth == 2 {
                    if name == "order" {
                        current = Some(PendingOrder::default());
                    }
                } else if depth == 3 && current.is_some() {
                    field = Some(name);
                }
            }
            Ok(Event::End(_)) => {
                if depth == 3 {
                    field = None;
                } else if depth == 2 {
                    if let Some(pending) = current.take() {
                        rows.push(pending.finalize()?);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(t)) => {
                if depth == 3 {
                    if let (Some(pending), Some(name)) = (current.as_mut(), field.as_deref()) {
                        let value = t
                            .unescape()
                            .map_err(|e| {
                                PipelineError::Parse(format!("bad XML text node: {}", e))
                            })?
                            .trim()
                            .to_string();
                        if !value.is_empty() {
                            pending.set(name, value);
                        }
                    }
                }
            }
            // Self-closing children (<sku_id/>) carry no text; the field
            // keeps its default
            Ok(_) => {}
        }
    }

    tracing::info!("Read {} order rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_one_row_per_order_element() {
        let file = write_fixture(
            r#"<?xml version="1.0"?>
            <orders>
                <order>
                    <order_id>O-1</order_id>
                    <mobile_number>+91 9876543210</mobile_number>
                    <order_date_time>2024-06-01 10:15:00</order_date_time>
                    <sku_id>SKU-9</sku_id>
                    <sku_count>2</sku_count>
                    <total_amount>149.50</total_amount>
                </order>
                <order>
                    <order_id>O-2</order_id>
                    <mobile_number>9123456780</mobile_number>
                    <order_date_time>2024-06-02 18:40:00</order_date_time>
                    <sku_id>SKU-4</sku_id>
                    <sku_count>1</sku_count>
                    <total_amount>80</total_amount>
                </order>
            </orders>"#,
        );
        let rows = read_orders(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].order_id.as_deref(), Some("O-1"));
        assert_eq!(rows[0].sku_count, 2);
        assert_eq!(rows[0].total_amount, 149.5);
        assert_eq!(rows[1].mobile_number.as_deref(), Some("9123456780"));
    }

    #[test]
    fn test_missing_numeric_fields_default_to_zero() {
        let file = write_fixture(
            r#"<orders>
                <order>
                    <order_id>O-3</order_id>
                    <mobile_number>9876543210</mobile_number>
                    <order_date_time>2024-06-03 09:00:00</order_date_time>
                    <sku_id>SKU-1</sku_id>
                </order>
            </orders>"#,
        );
        let rows = read_orders(file.path()).unwrap();
        assert_eq!(rows[0].sku_count, 0);
        assert_eq!(rows[0].total_amount, 0.0);
    }

    #[test]
    fn test_empty_elements_default_to_zero() {
        let file = write_fixture(
            r#"<orders>
                <order>
                    <order_id>O-4</order_id>
                    <mobile_number>9876543210</mobile_number>
                    <order_date_time>2024-06-03 09:00:00</order_date_time>
                    <sku_id/>
                    <sku_count></sku_count>
                    <total_amount></total_amount>
                </order>
            </orders>"#,
        );
        let rows = read_orders(file.path()).unwrap();
        assert_eq!(rows[0].sku_id, None);
        assert_eq!(rows[0].sku_count, 0);
        assert_eq!(rows[0].total_amount, 0.0);
    }

    #[test]
    fn test_missing_ids_are_preserved_as_none() {
        let file = write_fixture(
            r#"<orders>
                <order>
                    <order_date_time>2024-06-03 09:00:00</order_date_time>
                    <sku_id>SKU-1</sku_id>
                    <sku_count>1</sku_count>
                    <total_amount>10</total_amount>
                </order>
            </orders>"#,
        );
        let rows = read_orders(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_id, None);
        assert_eq!(rows[0].mobile_number, None);
    }

    #[test]
    fn test_non_numeric_count_is_a_parse_error() {
        let file = write_fixture(
            r#"<orders>
                <order>
                    <order_id>O-5</order_id>
                    <mobile_number>9876543210</mobile_number>
                    <order_date_time>2024-06-03 09:00:00</order_date_time>
                    <sku_id>SKU-1</sku_id>
                    <sku_count>two</sku_count>
                </order>
            </orders>"#,
        );
        assert!(matches!(
            read_orders(file.path()),
            Err(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn test_malformed_xml_is_a_parse_error() {
        let file = write_fixture("<orders><order><order_id>O-6</order></orders>");
        assert!(matches!(
            read_orders(file.path()),
            Err(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_elements_are_ignored() {
        let file = write_fixture(
            r#"<orders>
                <generated_at>2024-06-10</generated_at>
                <order>
                    <order_id>O-7</order_id>
                    <mobile_number>9876543210</mobile_number>
                    <order_date_time>2024-06-03 09:00:00</order_date_time>
                    <sku_id>SKU-1</sku_id>
                    <sku_count>1</sku_count>
                    <total_amount>25.0</total_amount>
                    <channel>web</channel>
                </order>
            </orders>"#,
        );
        let rows = read_orders(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].order_id.as_deref(), Some("O-7"));
    }
}
