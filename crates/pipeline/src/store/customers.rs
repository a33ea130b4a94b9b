use anyhow::Result;
use contracts::records::CustomerRecord;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Canonical 10-digit mobile number, the natural key
    #[sea_orm(primary_key, auto_increment = false)]
    pub mobile_number: i64,
    #[sea_orm(nullable)]
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub region: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Insert-or-update every cleansed customer, one transaction per call.
/// Conflicts on `mobile_number` update the row in place, so reloading the
/// same source file is a no-op.
pub async fn upsert_customers(
    db: &DatabaseConnection,
    records: &[CustomerRecord],
) -> Result<u64> {
    let txn = db.begin().await?;

    for record in records {
        let active = ActiveModel {
            mobile_number: Set(record.mobile_number),
            customer_id: Set(record.customer_id.clone()),
            customer_name: Set(record.customer_name.clone()),
            region: Set(record.region.clone()),
        };
        Entity::insert(active)
            .on_conflict(
                OnConflict::column(Column::MobileNumber)
                    .update_columns([
                        Column::CustomerId,
                        Column::CustomerName,
                        Column::Region,
                    ])
                    .to_owned(),
            )
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    tracing::info!("Upserted {} customers", records.len());
    Ok(records.len() as u64)
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>> {
    let items = Entity::find().all(db).await?;
    Ok(items)
}
