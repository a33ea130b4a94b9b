use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use contracts::insights::{
    MonthlyTrendRow, RegionalRevenueRow, RepeatCustomerRow, TopCustomerRow,
};
use contracts::records::UnifiedRow;

/// Per-customer accumulator shared by the two customer rankings.
#[derive(Default)]
struct CustomerAcc {
    customer_id: Option<String>,
    customer_name: String,
    order_ids: HashSet<String>,
    total_spend: f64,
}

fn group_by_customer<'a, I>(rows: I) -> HashMap<i64, CustomerAcc>
where
    I: Iterator<Item = &'a UnifiedRow>,
{
    let mut groups: HashMap<i64, CustomerAcc> = HashMap::new();
    for row in rows.filter(|r| r.is_matched()) {
        let acc = groups.entry(row.mobile_number).or_default();
        if acc.order_ids.is_empty() {
            acc.customer_id = row.customer_id.clone();
            acc.customer_name = row.customer_name.clone().unwrap_or_default();
        }
        acc.order_ids.insert(row.order_id.clone());
        acc.total_spend += row.total_amount;
    }
    groups
}

/// Customers with more than one distinct order, ordered by order count
/// descending, mobile number ascending.
pub fn repeat_customers(view: &[UnifiedRow]) -> Vec<RepeatCustomerRow> {
    let mut rows: Vec<RepeatCustomerRow> = group_by_customer(view.iter())
        .into_iter()
        .filter(|(_, acc)| acc.order_ids.len() > 1)
        .map(|(mobile_number, acc)| RepeatCustomerRow {
            customer_id: acc.customer_id,
            customer_name: acc.customer_name,
            mobile_number,
            order_count: acc.order_ids.len() as i64,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.order_count
            .cmp(&a.order_count)
            .then(a.mobile_number.cmp(&b.mobile_number))
    });
    rows
}

/// Distinct orders and revenue per UTC calendar month, chronological.
/// Covers every order fact, matched to a customer or not.
pub fn monthly_trends(view: &[UnifiedRow]) -> Vec<MonthlyTrendRow> {
    let mut groups: HashMap<String, (HashSet<&str>, f64)> = HashMap::new();
    for row in view {
        let month = row.order_date_time_utc.format("%Y-%m").to_string();
        let entry = groups.entry(month).or_default();
        entry.0.insert(row.order_id.as_str());
        entry.1 += row.total_amount;
    }
    let mut rows: Vec<MonthlyTrendRow> = groups
        .into_iter()
        .map(|(order_month, (orders, revenue))| MonthlyTrendRow {
            order_month,
            total_orders: orders.len() as i64,
            total_revenue: revenue,
        })
        .collect();
    rows.sort_by(|a, b| a.order_month.cmp(&b.order_month));
    rows
}

/// Revenue per customer region, ordered by revenue descending, region
/// ascending.
pub fn regional_revenue(view: &[UnifiedRow]) -> Vec<RegionalRevenueRow> {
    let mut groups: HashMap<String, f64> = HashMap::new();
    for row in view.iter().filter(|r| r.is_matched()) {
        let region = row.region.clone().unwrap_or_default();
        *groups.entry(region).or_insert(0.0) += row.total_amount;
    }
    let mut rows: Vec<RegionalRevenueRow> = groups
        .into_iter()
        .map(|(region, regional_revenue)| RegionalRevenueRow {
            region,
            regional_revenue,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.regional_revenue
            .total_cmp(&a.regional_revenue)
            .then(a.region.cmp(&b.region))
    });
    rows
}

/// Top 10 spenders over the trailing 30 days from `now`, ordered by spend
/// descending, mobile number ascending.
pub fn top_customers_last_30_days(
    view: &[UnifiedRow],
    now: DateTime<Utc>,
) -> Vec<TopCustomerRow> {
    let cutoff = now - Duration::days(30);
    let recent = view.iter().filter(|r| r.order_date_time_utc >= cutoff);
    let mut rows: Vec<TopCustomerRow> = group_by_customer(recent)
        .into_iter()
        .map(|(mobile_number, acc)| TopCustomerRow {
            customer_id: acc.customer_id,
            customer_name: acc.customer_name,
            mobile_number,
            total_spend: acc.total_spend,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_spend
            .total_cmp(&a.total_spend)
            .then(a.mobile_number.cmp(&b.mobile_number))
    });
    rows.truncate(10);
    rows
}
