use contracts::records::CustomerRecord;

use crate::ingest::customers_csv::RawCustomerRow;
use crate::shared::dedupe::dedupe_by_key;
use crate::shared::mobile::normalize_mobile;

/// Row drop accounting for one customer cleansing pass. Dropped rows are
/// not errors; the counts are logged so silent data loss stays visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomerCleanseStats {
    pub source_rows: usize,
    /// Rows whose mobile number had fewer than 10 digits (or none at all)
    pub rejected_mobile: usize,
    /// Rows collapsed by first-occurrence-wins dedup on mobile number
    pub duplicate_mobile: usize,
}

/// Cleanse raw customer rows: trim names, default the region, canonicalize
/// mobile numbers (dropping rejects), then keep one record per mobile
/// number, first occurrence winning.
pub fn clean_customers(rows: Vec<RawCustomerRow>) -> (Vec<CustomerRecord>, CustomerCleanseStats) {
    let mut stats = CustomerCleanseStats {
        source_rows: rows.len(),
        ..Default::default()
    };

    let mut cleansed = Vec::with_capacity(rows.len());
    for row in rows {
        let raw_mobile = row.mobile_number.unwrap_or_default();
        let Some(mobile_number) = normalize_mobile(&raw_mobile) else {
            stats.rejected_mobile += 1;
            continue;
        };
        cleansed.push(CustomerRecord {
            customer_id: row.customer_id,
            customer_name: row
                .customer_name
                .map(|name| name.trim().to_string())
                .unwrap_or_default(),
            mobile_number,
            region: row.region.unwrap_or_else(|| "Unknown".to_string()),
        });
    }

    let before = cleansed.len();
    let deduped = dedupe_by_key(cleansed, |c| c.mobile_number);
    stats.duplicate_mobile = before - deduped.len();

    tracing::info!(
        "Cleansed customers: {} source rows, {} kept, {} rejected mobile, {} duplicates",
        stats.source_rows,
        deduped.len(),
        stats.rejected_mobile,
        stats.duplicate_mobile
    );
    (deduped, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, mobile: &str, region: Option<&str>) -> RawCustomerRow {
        RawCustomerRow {
            customer_id: None,
            customer_name: Some(name.to_string()),
            mobile_number: Some(mobile.to_string()),
            region: region.map(str::to_string),
        }
    }

    #[test]
    fn test_region_defaults_to_unknown() {
        let (records, _) = clean_customers(vec![raw("Asha", "9876543210", None)]);
        assert_eq!(records[0].region, "Unknown");
    }

    #[test]
    fn test_name_is_trimmed() {
        let (records, _) = clean_customers(vec![raw("  Asha  ", "9876543210", Some("North"))]);
        assert_eq!(records[0].customer_name, "Asha");
    }

    #[test]
    fn test_short_mobile_rows_are_dropped_and_counted() {
        let rows = vec![
            raw("Asha", "9876543210", Some("North")),
            raw("Bad", "12345", Some("South")),
        ];
        let (records, stats) = clean_customers(rows);
        assert_eq!(records.len(), 1);
        assert_eq!(stats.rejected_mobile, 1);
        assert_eq!(stats.source_rows, 2);
    }

    #[test]
    fn test_missing_mobile_counts_as_rejected() {
        let rows = vec![RawCustomerRow {
            customer_name: Some("Asha".to_string()),
            ..Default::default()
        }];
        let (records, stats) = clean_customers(rows);
        assert!(records.is_empty());
        assert_eq!(stats.rejected_mobile, 1);
    }

    #[test]
    fn test_first_record_per_mobile_wins() {
        let rows = vec![
            raw("First", "+91 9876543210", Some("North")),
            raw("Second", "9876543210", Some("South")),
        ];
        let (records, stats) = clean_customers(rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].customer_name, "First");
        assert_eq!(records[0].region, "North");
        assert_eq!(stats.duplicate_mobile, 1);
    }
}
