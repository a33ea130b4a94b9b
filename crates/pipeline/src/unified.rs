use std::collections::HashMap;

use contracts::records::{CustomerRecord, OrderFact, UnifiedRow};

/// Left outer join of order facts to customers on the canonical mobile
/// number. Every fact appears exactly once; orders without a matching
/// customer keep `None` customer fields.
pub fn build_unified(facts: &[OrderFact], customers: &[CustomerRecord]) -> Vec<UnifiedRow> {
    let by_mobile: HashMap<i64, &CustomerRecord> = customers
        .iter()
        .map(|customer| (customer.mobile_number, customer))
        .collect();

    facts
        .iter()
        .map(|fact| {
            let customer = by_mobile.get(&fact.mobile_number);
            UnifiedRow {
                order_id: fact.order_id.clone(),
                mobile_number: fact.mobile_number,
                order_date_time_utc: fact.order_date_time_utc,
                total_amount: fact.total_amount,
                customer_id: customer.and_then(|c| c.customer_id.clone()),
                customer_name: customer.map(|c| c.customer_name.clone()),
                region: customer.map(|c| c.region.clone()),
            }
        })
        .collect()
}
