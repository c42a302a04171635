//! Delivery persistence service
//!
//! Saves are all-or-nothing: the full set of line-items is written in one
//! transaction, and an update replaces every entry of the delivery.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    DayBoundary, Delivery, DeliveryEntry, EntryPayload, RejectionRecord, SaveDeliveryInput,
    SaveDeliveryResponse, SizeKey, UpdateDeliveryInput,
};

/// Delivery service
#[derive(Clone)]
pub struct DeliveryService {
    db: PgPool,
}

/// Database row for a delivery
#[derive(Debug, sqlx::FromRow)]
struct DeliveryRow {
    id: Uuid,
    supplier_id: Uuid,
    entry_datetime: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Database row for a delivery line-item
#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    species_name: String,
    variety_name: String,
    quantity: i32,
    exportable: serde_json::Value,
    prices: serde_json::Value,
    total_price: Decimal,
    rejections: serde_json::Value,
}

impl From<EntryRow> for DeliveryEntry {
    fn from(row: EntryRow) -> Self {
        let exportable: BTreeMap<SizeKey, u32> =
            serde_json::from_value(row.exportable).unwrap_or_default();
        let prices: BTreeMap<SizeKey, Decimal> =
            serde_json::from_value(row.prices).unwrap_or_default();
        let rejections: Vec<RejectionRecord> =
            serde_json::from_value(row.rejections).unwrap_or_default();

        DeliveryEntry {
            id: row.id,
            species_name: row.species_name,
            variety_name: row.variety_name,
            quantity: row.quantity.max(0) as u32,
            exportable,
            prices,
            total_price: row.total_price,
            rejections,
        }
    }
}

/// Delivery list row for the day overview
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DeliverySummary {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub supplier_code: String,
    pub supplier_name: String,
    pub entry_datetime: DateTime<Utc>,
    pub total_entries: i64,
    pub total_stems: i64,
}

impl DeliveryService {
    /// Create a new DeliveryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Persist a new delivery with all of its line-items
    pub async fn create_delivery(
        &self,
        input: SaveDeliveryInput,
        day_boundary: DayBoundary,
    ) -> AppResult<SaveDeliveryResponse> {
        if input.entries.is_empty() {
            return Err(AppError::ValidationError(
                "A delivery needs at least one entry".to_string(),
            ));
        }

        let entry_datetime = input
            .delivery_date
            .and_time(input.delivery_time)
            .and_local_timezone(day_boundary.offset())
            .single()
            .ok_or_else(|| {
                AppError::ValidationError("Invalid delivery date/time".to_string())
            })?
            .with_timezone(&Utc);

        let warnings = reconciliation_warnings(&input.entries);

        let mut tx = self.db.begin().await?;

        let supplier_exists =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM suppliers WHERE id = $1")
                .bind(input.supplier_id)
                .fetch_optional(&mut *tx)
                .await?;
        if supplier_exists.is_none() {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        let delivery_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO deliveries (supplier_id, entry_datetime)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(input.supplier_id)
        .bind(entry_datetime)
        .fetch_one(&mut *tx)
        .await?;

        insert_entries(&mut tx, delivery_id, &input.entries).await?;
        tx.commit().await?;

        Ok(SaveDeliveryResponse {
            id: delivery_id,
            warnings,
        })
    }

    /// Replace the line-items of an existing delivery
    pub async fn update_delivery(
        &self,
        delivery_id: Uuid,
        input: UpdateDeliveryInput,
    ) -> AppResult<SaveDeliveryResponse> {
        if input.entries.is_empty() {
            return Err(AppError::ValidationError(
                "A delivery needs at least one entry".to_string(),
            ));
        }

        let warnings = reconciliation_warnings(&input.entries);

        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM deliveries WHERE id = $1")
            .bind(delivery_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound("Delivery".to_string()));
        }

        sqlx::query("DELETE FROM delivery_entries WHERE delivery_id = $1")
            .bind(delivery_id)
            .execute(&mut *tx)
            .await?;

        insert_entries(&mut tx, delivery_id, &input.entries).await?;

        sqlx::query("UPDATE deliveries SET updated_at = NOW() WHERE id = $1")
            .bind(delivery_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(SaveDeliveryResponse {
            id: delivery_id,
            warnings,
        })
    }

    /// Get a delivery with all of its line-items
    pub async fn get_delivery(&self, delivery_id: Uuid) -> AppResult<Delivery> {
        let row = sqlx::query_as::<_, DeliveryRow>(
            r#"
            SELECT id, supplier_id, entry_datetime, created_at, updated_at
            FROM deliveries
            WHERE id = $1
            "#,
        )
        .bind(delivery_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Delivery".to_string()))?;

        let entries = sqlx::query_as::<_, EntryRow>(
            r#"
            SELECT id, species_name, variety_name, quantity,
                   exportable, prices, total_price, rejections
            FROM delivery_entries
            WHERE delivery_id = $1
            ORDER BY position
            "#,
        )
        .bind(delivery_id)
        .fetch_all(&self.db)
        .await?;

        Ok(Delivery {
            id: row.id,
            supplier_id: row.supplier_id,
            entry_datetime: row.entry_datetime,
            entries: entries.into_iter().map(|e| e.into()).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// List deliveries inside one local calendar day
    pub async fn list_deliveries(
        &self,
        date: chrono::NaiveDate,
        day_boundary: DayBoundary,
    ) -> AppResult<Vec<DeliverySummary>> {
        let (start, end) = day_boundary.utc_window(date);

        let rows = sqlx::query_as::<_, DeliverySummary>(
            r#"
            SELECT d.id, d.supplier_id, s.code AS supplier_code, s.name AS supplier_name,
                   d.entry_datetime,
                   COUNT(e.id) AS total_entries,
                   COALESCE(SUM(e.quantity), 0) AS total_stems
            FROM deliveries d
            JOIN suppliers s ON s.id = d.supplier_id
            LEFT JOIN delivery_entries e ON e.delivery_id = d.id
            WHERE d.entry_datetime >= $1 AND d.entry_datetime < $2
            GROUP BY d.id, d.supplier_id, s.code, s.name, d.entry_datetime
            ORDER BY d.entry_datetime
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}

/// Insert all line-items of a delivery inside the save transaction
async fn insert_entries(
    tx: &mut Transaction<'_, Postgres>,
    delivery_id: Uuid,
    entries: &[EntryPayload],
) -> AppResult<()> {
    for (position, entry) in entries.iter().enumerate() {
        let exportable = serde_json::to_value(&entry.exportable)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let prices = serde_json::to_value(&entry.prices)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let rejections = serde_json::to_value(&entry.rejections)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO delivery_entries (
                delivery_id, position, species_name, variety_name, quantity,
                exportable, prices, total_price, rejections
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(delivery_id)
        .bind(position as i32)
        .bind(&entry.species_name)
        .bind(&entry.variety_name)
        .bind(entry.quantity as i32)
        .bind(&exportable)
        .bind(&prices)
        .bind(entry.total_price)
        .bind(&rejections)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Advisory over-classification warnings for a save. Never blocks the save;
/// the operator corrects later.
fn reconciliation_warnings(entries: &[EntryPayload]) -> Vec<String> {
    let mut warnings = Vec::new();
    for entry in entries {
        let remaining = entry.remaining();
        if remaining < 0 {
            let warning = format!(
                "{} {}: classified {} exceeds received {} by {}",
                entry.species_name,
                entry.variety_name,
                entry.classified_total(),
                entry.quantity,
                -remaining
            );
            tracing::warn!("Over-classified entry on save: {}", warning);
            warnings.push(warning);
        }
    }
    warnings
}
