use contracts::records::{OrderFact, OrderItemRecord};

use crate::ingest::orders_xml::RawOrderRow;
use crate::shared::dedupe::dedupe_by_key;
use crate::shared::error::PipelineError;
use crate::shared::mobile::normalize_mobile;
use crate::shared::tz::SourceTimezone;

/// Row drop accounting for one order cleansing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderCleanseStats {
    pub source_rows: usize,
    pub missing_order_id: usize,
    pub missing_timestamp: usize,
    /// Rows whose mobile number was absent or had fewer than 10 digits
    pub rejected_mobile: usize,
    /// Item rows beyond the first for their order id
    pub duplicate_orders: usize,
}

/// Cleanse raw order rows into item-level records plus the order-level
/// facts derived from them.
///
/// Rows without an order id, timestamp or valid mobile number are dropped
/// and counted. Timestamps are converted to UTC exactly once; a timestamp
/// that parses but cannot be converted fails the whole run. Order facts
/// keep the first item row seen per order id.
pub fn clean_orders(
    rows: Vec<RawOrderRow>,
    tz: &SourceTimezone,
) -> Result<(Vec<OrderItemRecord>, Vec<OrderFact>, OrderCleanseStats), PipelineError> {
    let mut stats = OrderCleanseStats {
        source_rows: rows.len(),
        ..Default::default()
    };

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(order_id) = row.order_id else {
            stats.missing_order_id += 1;
            continue;
        };
        let raw_mobile = row.mobile_number.unwrap_or_default();
        let Some(mobile_number) = normalize_mobile(&raw_mobile) else {
            stats.rejected_mobile += 1;
            continue;
        };
        let Some(timestamp_text) = row.order_date_time else {
            stats.missing_timestamp += 1;
            continue;
        };
        let (order_date_time, order_date_time_utc) = tz.to_utc(&timestamp_text)?;

        items.push(OrderItemRecord {
            order_id,
            mobile_number,
            order_date_time,
            order_date_time_utc,
            sku_id: row.sku_id,
            sku_count: row.sku_count,
            total_amount: row.total_amount,
        });
    }

    let fact_candidates: Vec<OrderFact> = items.iter().map(OrderFact::from).collect();
    let facts = dedupe_by_key(fact_candidates, |f| f.order_id.clone());
    stats.duplicate_orders = items.len() - facts.len();

    tracing::info!(
        "Cleansed orders: {} source rows, {} item rows, {} order facts, {} dropped ({} no order_id, {} no timestamp, {} rejected mobile)",
        stats.source_rows,
        items.len(),
        facts.len(),
        stats.missing_order_id + stats.missing_timestamp + stats.rejected_mobile,
        stats.missing_order_id,
        stats.missing_timestamp,
        stats.rejected_mobile
    );
    Ok((items, facts, stats))
}
