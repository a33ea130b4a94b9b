use serde::{Deserialize, Serialize};

/// Customer with more than one distinct order.
///
/// Ordered by `order_count` descending, mobile number ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatCustomerRow {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "mobileNumber")]
    pub mobile_number: i64,
    #[serde(rename = "orderCount")]
    pub order_count: i64,
}

/// Order and revenue totals for one UTC calendar month ("YYYY-MM").
///
/// Ordered chronologically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendRow {
    #[serde(rename = "orderMonth")]
    pub order_month: String,
    #[serde(rename = "totalOrders")]
    pub total_orders: i64,
    #[serde(rename = "totalRevenue")]
    pub total_revenue: f64,
}

/// Revenue total per customer region, ordered by revenue descending,
/// region ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalRevenueRow {
    pub region: String,
    #[serde(rename = "regionalRevenue")]
    pub regional_revenue: f64,
}

/// Top spender over the trailing 30 days. At most 10 rows, ordered by spend
/// descending, mobile number ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCustomerRow {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "mobileNumber")]
    pub mobile_number: i64,
    #[serde(rename = "totalSpend")]
    pub total_spend: f64,
}
