use anyhow::Result;
use contracts::records::{OrderFact, OrderItemRecord};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set, TransactionTrait};

use super::UTC_FORMAT;

/// Order-level facts, one row per order id.
pub mod fact {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "orders_fact")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub order_id: String,
        pub mobile_number: i64,
        /// UTC wall-clock text, `%Y-%m-%d %H:%M:%S`
        pub order_date_time_utc: String,
        pub total_amount: f64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Item-level rows, one per (order, sku) pair.
pub mod item {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "order_items")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub order_id: String,
        /// Empty string for items the source delivered without a sku;
        /// keeps the composite key total
        #[sea_orm(primary_key, auto_increment = false)]
        pub sku_id: String,
        pub sku_count: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Insert-or-update the order facts and the item rows, both sub-batches in
/// one transaction: a failed row aborts the whole load, nothing partial
/// commits. Returns (facts, items) written.
pub async fn upsert_orders(
    db: &DatabaseConnection,
    facts: &[OrderFact],
    items: &[OrderItemRecord],
) -> Result<(u64, u64)> {
    let txn = db.begin().await?;

    for f in facts {
        let active = fact::ActiveModel {
            order_id: Set(f.order_id.clone()),
            mobile_number: Set(f.mobile_number),
            order_date_time_utc: Set(f.order_date_time_utc.format(UTC_FORMAT).to_string()),
            total_amount: Set(f.total_amount),
        };
        fact::Entity::insert(active)
            .on_conflict(
                OnConflict::column(fact::Column::OrderId)
                    .update_columns([
                        fact::Column::MobileNumber,
                        fact::Column::OrderDateTimeUtc,
                        fact::Column::TotalAmount,
                    ])
                    .to_owned(),
            )
            .exec(&txn)
            .await?;
    }

    for i in items {
        let active = item::ActiveModel {
            order_id: Set(i.order_id.clone()),
            sku_id: Set(i.sku_id.clone().unwrap_or_default()),
            sku_count: Set(i.sku_count),
        };
        item::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([item::Column::OrderId, item::Column::SkuId])
                    .update_columns([item::Column::SkuCount])
                    .to_owned(),
            )
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    tracing::info!("Upserted {} order facts, {} order items", facts.len(), items.len());
    Ok((facts.len() as u64, items.len() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::{connect_in_memory, create_tables};
    use chrono::{TimeZone, Utc};

    fn order_fact(order_id: &str, mobile: i64, amount: f64) -> OrderFact {
        OrderFact {
            order_id: order_id.to_string(),
            mobile_number: mobile,
            order_date_time_utc: Utc.with_ymd_and_hms(2024, 6, 1, 6, 30, 0).unwrap(),
            total_amount: amount,
        }
    }

    fn order_item(order_id: &str, sku: Option<&str>, count: i64) -> OrderItemRecord {
        OrderItemRecord {
            order_id: order_id.to_string(),
            mobile_number: 9876543210,
            order_date_time: Utc
                .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
                .unwrap()
                .naive_utc(),
            order_date_time_utc: Utc.with_ymd_and_hms(2024, 6, 1, 6, 30, 0).unwrap(),
            sku_id: sku.map(str::to_string),
            sku_count: count,
            total_amount: 100.0,
        }
    }

    #[tokio::test]
    async fn test_double_load_is_idempotent() {
        let db = connect_in_memory().await.unwrap();
        create_tables(&db).await.unwrap();

        let facts = vec![order_fact("O-1", 9876543210, 100.0)];
        let items = vec![
            order_item("O-1", Some("S1"), 2),
            order_item("O-1", Some("S2"), 1),
        ];
        upsert_orders(&db, &facts, &items).await.unwrap();
        upsert_orders(&db, &facts, &items).await.unwrap();

        let stored_facts = fact::Entity::find().all(&db).await.unwrap();
        let stored_items = item::Entity::find().all(&db).await.unwrap();
        assert_eq!(stored_facts.len(), 1);
        assert_eq!(stored_items.len(), 2);
    }

    #[tokio::test]
    async fn test_fact_timestamp_is_stored_as_utc_text() {
        let db = connect_in_memory().await.unwrap();
        create_tables(&db).await.unwrap();

        upsert_orders(&db, &[order_fact("O-1", 9876543210, 100.0)], &[])
            .await
            .unwrap();

        let stored = fact::Entity::find().all(&db).await.unwrap();
        assert_eq!(stored[0].order_date_time_utc, "2024-06-01 06:30:00");
    }

    #[tokio::test]
    async fn test_missing_sku_maps_to_empty_key() {
        let db = connect_in_memory().await.unwrap();
        create_tables(&db).await.unwrap();

        let items = vec![order_item("O-1", None, 3), order_item("O-1", None, 5)];
        upsert_orders(&db, &[order_fact("O-1", 9876543210, 100.0)], &items)
            .await
            .unwrap();

        // both rows share the ("O-1", "") key, the second update wins
        let stored = item::Entity::find().all(&db).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].sku_count, 5);
    }
}
