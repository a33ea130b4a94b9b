use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use contracts::insights::{
    MonthlyTrendRow, RegionalRevenueRow, RepeatCustomerRow, TopCustomerRow,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, FromQueryResult, Statement};

use crate::store::UTC_FORMAT;

/// Customers with more than one distinct order, from the persisted schema.
pub async fn repeat_customers(db: &DatabaseConnection) -> Result<Vec<RepeatCustomerRow>> {
    #[derive(Debug, FromQueryResult)]
    struct Row {
        customer_id: Option<String>,
        customer_name: String,
        mobile_number: i64,
        order_count: i64,
    }

    let sql = r#"
        SELECT c.customer_id, c.customer_name, c.mobile_number,
               COUNT(DISTINCT o.order_id) AS order_count
        FROM customers c
        JOIN orders_fact o ON c.mobile_number = o.mobile_number
        GROUP BY c.customer_id, c.customer_name, c.mobile_number
        HAVING COUNT(DISTINCT o.order_id) > 1
        ORDER BY order_count DESC, c.mobile_number ASC
    "#;

    let stmt = Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, []);
    let rows = Row::find_by_statement(stmt).all(db).await?;

    Ok(rows
        .into_iter()
        .map(|r| RepeatCustomerRow {
            customer_id: r.customer_id,
            customer_name: r.customer_name,
            mobile_number: r.mobile_number,
            order_count: r.order_count,
        })
        .collect())
}

/// Distinct orders and revenue per UTC calendar month, chronological.
pub async fn monthly_trends(db: &DatabaseConnection) -> Result<Vec<MonthlyTrendRow>> {
    #[derive(Debug, FromQueryResult)]
    struct Row {
        order_month: String,
        total_orders: i64,
        total_revenue: f64,
    }

    let sql = r#"
        SELECT strftime('%Y-%m', o.order_date_time_utc) AS order_month,
               COUNT(DISTINCT o.order_id) AS total_orders,
               SUM(o.total_amount) AS total_revenue
        FROM orders_fact o
        GROUP BY strftime('%Y-%m', o.order_date_time_utc)
        ORDER BY order_month ASC
    "#;

    let stmt = Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, []);
    let rows = Row::find_by_statement(stmt).all(db).await?;

    Ok(rows
        .into_iter()
        .map(|r| MonthlyTrendRow {
            order_month: r.order_month,
            total_orders: r.total_orders,
            total_revenue: r.total_revenue,
        })
        .collect())
}

/// Revenue per customer region, ordered by revenue descending.
pub async fn regional_revenue(db: &DatabaseConnection) -> Result<Vec<RegionalRevenueRow>> {
    #[derive(Debug, FromQueryResult)]
    struct Row {
        region: String,
        regional_revenue: f64,
    }

    let sql = r#"
        SELECT c.region, SUM(o.total_amount) AS regional_revenue
        FROM orders_fact o
        JOIN customers c ON o.mobile_number = c.mobile_number
        GROUP BY c.region
        ORDER BY regional_revenue DESC, c.region ASC
    "#;

    let stmt = Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, []);
    let rows = Row::find_by_statement(stmt).all(db).await?;

    Ok(rows
        .into_iter()
        .map(|r| RegionalRevenueRow {
            region: r.region,
            regional_revenue: r.regional_revenue,
        })
        .collect())
}

/// Top 10 spenders over the trailing 30 days from `now`.
///
/// The cutoff is passed in rather than taken from the database clock so
/// both backends evaluate the same window.
pub async fn top_customers_last_30_days(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<Vec<TopCustomerRow>> {
    #[derive(Debug, FromQueryResult)]
    struct Row {
        customer_id: Option<String>,
        customer_name: String,
        mobile_number: i64,
        total_spend: f64,
    }

    let cutoff = (now - Duration::days(30)).naive_utc().format(UTC_FORMAT).to_string();

    let sql = r#"
        SELECT c.customer_id, c.customer_name, c.mobile_number,
               SUM(o.total_amount) AS total_spend
        FROM orders_fact o
        JOIN customers c ON o.mobile_number = c.mobile_number
        WHERE o.order_date_time_utc >= ?
        GROUP BY c.customer_id, c.customer_name, c.mobile_number
        ORDER BY total_spend DESC, c.mobile_number ASC
        LIMIT 10
    "#;

    let stmt = Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, [cutoff.into()]);
    let rows = Row::find_by_statement(stmt).all(db).await?;

    Ok(rows
        .into_iter()
        .map(|r| TopCustomerRow {
            customer_id: r.customer_id,
            customer_name: r.customer_name,
            mobile_number: r.mobile_number,
            total_spend: r.total_spend,
        })
        .collect())
}
