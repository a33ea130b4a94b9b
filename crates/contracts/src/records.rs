use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cleansed customer row. At most one record per mobile number survives
/// deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Opaque source key; may be absent in the source file
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    /// Canonical 10-digit mobile number (join key)
    #[serde(rename = "mobileNumber")]
    pub mobile_number: i64,
    /// Defaults to "Unknown" when the source left it blank
    pub region: String,
}

/// Item-level order row after cleansing. One row per `<order>` element in
/// the source; several rows may share an `order_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRecord {
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "mobileNumber")]
    pub mobile_number: i64,
    /// Wall-clock time in the configured source timezone, as parsed
    #[serde(rename = "orderDateTime")]
    pub order_date_time: NaiveDateTime,
    /// The same instant converted to UTC
    #[serde(rename = "orderDateTimeUtc")]
    pub order_date_time_utc: DateTime<Utc>,
    #[serde(rename = "skuId")]
    pub sku_id: Option<String>,
    /// Defaults to 0 when the source element is missing or empty
    #[serde(rename = "skuCount")]
    pub sku_count: i64,
    /// Defaults to 0.0 when the source element is missing or empty
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
}

/// Order-level fact: exactly one row per distinct `order_id`, carrying the
/// values of the first item row seen for that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFact {
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "mobileNumber")]
    pub mobile_number: i64,
    #[serde(rename = "orderDateTimeUtc")]
    pub order_date_time_utc: DateTime<Utc>,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
}

impl From<&OrderItemRecord> for OrderFact {
    fn from(item: &OrderItemRecord) -> Self {
        Self {
            order_id: item.order_id.clone(),
            mobile_number: item.mobile_number,
            order_date_time_utc: item.order_date_time_utc,
            total_amount: item.total_amount,
        }
    }
}

/// One row of the unified customer/order view: an order fact left-joined to
/// its customer on `mobile_number`. Customer fields stay `None` for orders
/// without a matching customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedRow {
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "mobileNumber")]
    pub mobile_number: i64,
    #[serde(rename = "orderDateTimeUtc")]
    pub order_date_time_utc: DateTime<Utc>,
    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,
    pub region: Option<String>,
}

impl UnifiedRow {
    /// Whether the order found its customer during the join
    pub fn is_matched(&self) -> bool {
        self.customer_name.is_some()
    }
}
