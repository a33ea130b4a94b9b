pub mod cleanse;
pub mod ingest;
pub mod insights;
pub mod shared;
pub mod store;
pub mod unified;

use contracts::insights::{
    MonthlyTrendRow, RegionalRevenueRow, RepeatCustomerRow, TopCustomerRow,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::path::Path;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("pipeline.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                // Keep SQL driver chatter down, keep pipeline logs
                "info,sqlx=warn,sea_orm=warn".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    fn print_repeat(title: &str, rows: &[RepeatCustomerRow]) {
        println!("\n{}", title);
        for r in rows {
            println!(
                "  {:<10} {:<24} {:>12}  orders={}",
                r.customer_id.as_deref().unwrap_or("-"),
                r.customer_name,
                r.mobile_number,
                r.order_count
            );
        }
    }

    fn print_monthly(title: &str, rows: &[MonthlyTrendRow]) {
        println!("\n{}", title);
        for r in rows {
            println!(
                "  {}  orders={:<6} revenue={:.2}",
                r.order_month, r.total_orders, r.total_revenue
            );
        }
    }

    fn print_regional(title: &str, rows: &[RegionalRevenueRow]) {
        println!("\n{}", title);
        for r in rows {
            println!("  {:<16} revenue={:.2}", r.region, r.regional_revenue);
        }
    }

    fn print_top(title: &str, rows: &[TopCustomerRow]) {
        println!("\n{}", title);
        for r in rows {
            println!(
                "  {:<10} {:<24} {:>12}  spend={:.2}",
                r.customer_id.as_deref().unwrap_or("-"),
                r.customer_name,
                r.mobile_number,
                r.total_spend
            );
        }
    }

    let config = shared::config::load_config()?;
    let tz = shared::tz::SourceTimezone::new(&config.source.timezone)?;
    tracing::info!("Source timezone: {}", tz.name());

    // One cleansing pass feeds both execution paths
    let raw_customers =
        ingest::customers_csv::read_customers(Path::new(&config.source.customers_csv))?;
    let (customers, customer_stats) = cleanse::customers::clean_customers(raw_customers);

    let raw_orders = ingest::orders_xml::read_orders(Path::new(&config.source.orders_xml))?;
    let (items, facts, order_stats) = cleanse::orders::clean_orders(raw_orders, &tz)?;

    tracing::info!(
        "Dropped rows: customers {} (mobile), orders {} (mobile) + {} (order_id) + {} (timestamp)",
        customer_stats.rejected_mobile,
        order_stats.rejected_mobile,
        order_stats.missing_order_id,
        order_stats.missing_timestamp
    );

    let now = chrono::Utc::now();

    // ---- in-memory branch ----
    let view = unified::build_unified(&facts, &customers);
    println!(
        "In-memory unified view: {} orders, {} matched to customers",
        view.len(),
        view.iter().filter(|r| r.is_matched()).count()
    );

    print_repeat("Repeat customers (in-memory)", &insights::memory::repeat_customers(&view));
    print_monthly("Monthly trends (in-memory)", &insights::memory::monthly_trends(&view));
    print_regional("Regional revenue (in-memory)", &insights::memory::regional_revenue(&view));
    print_top(
        "Top customers, last 30 days (in-memory)",
        &insights::memory::top_customers_last_30_days(&view, now),
    );

    // ---- table-based branch ----
    let db_path = shared::config::get_database_path(&config)?;
    tracing::info!("Database path: {}", db_path.display());
    let db = shared::data::db::connect(&db_path.to_string_lossy()).await?;
    shared::data::db::create_tables(&db).await?;

    store::customers::upsert_customers(&db, &customers).await?;
    store::orders::upsert_orders(&db, &facts, &items).await?;

    print_repeat("Repeat customers (table-based)", &insights::sql::repeat_customers(&db).await?);
    print_monthly("Monthly trends (table-based)", &insights::sql::monthly_trends(&db).await?);
    print_regional("Regional revenue (table-based)", &insights::sql::regional_revenue(&db).await?);
    print_top(
        "Top customers, last 30 days (table-based)",
        &insights::sql::top_customers_last_30_days(&db, now).await?,
    );

    db.close().await?;
    println!("\nTable-based load completed.");

    Ok(())
}
