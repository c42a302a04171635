//! Reporting service for daily intake summaries and CSV export

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{DayBoundary, RejectionRecord, SizeKey};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// One supplier's intake on a given day
#[derive(Debug, Clone, Serialize)]
pub struct DailyIntakeRow {
    pub supplier_id: Uuid,
    pub supplier_code: String,
    pub supplier_name: String,
    pub deliveries: i64,
    pub total_stems: i64,
    pub exportable_stems: i64,
    pub local_stems: i64,
    pub total_value: Decimal,
}

/// Raw entry row joined with its supplier
#[derive(Debug, sqlx::FromRow)]
struct IntakeEntryRow {
    supplier_id: Uuid,
    supplier_code: String,
    supplier_name: String,
    delivery_id: Uuid,
    quantity: i32,
    exportable: serde_json::Value,
    rejections: serde_json::Value,
    total_price: Decimal,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Per-supplier intake summary for one local calendar day.
    ///
    /// Bucket maps are stored as JSONB, so the exportable/local split is
    /// folded here rather than in SQL.
    pub async fn daily_intake(
        &self,
        date: NaiveDate,
        day_boundary: DayBoundary,
    ) -> AppResult<Vec<DailyIntakeRow>> {
        let (start, end) = day_boundary.utc_window(date);

        let rows = sqlx::query_as::<_, IntakeEntryRow>(
            r#"
            SELECT s.id AS supplier_id, s.code AS supplier_code, s.name AS supplier_name,
                   d.id AS delivery_id, e.quantity, e.exportable, e.rejections, e.total_price
            FROM delivery_entries e
            JOIN deliveries d ON d.id = e.delivery_id
            JOIN suppliers s ON s.id = d.supplier_id
            WHERE d.entry_datetime >= $1 AND d.entry_datetime < $2
            ORDER BY s.code
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        let mut by_supplier: BTreeMap<String, (DailyIntakeRow, Vec<Uuid>)> = BTreeMap::new();

        for row in rows {
            let exportable: BTreeMap<SizeKey, u32> =
                serde_json::from_value(row.exportable).unwrap_or_default();
            let rejections: Vec<RejectionRecord> =
                serde_json::from_value(row.rejections).unwrap_or_default();

            let exportable_stems: i64 = exportable.values().map(|q| i64::from(*q)).sum();
            let local_stems: i64 = rejections.iter().map(|r| i64::from(r.quantity)).sum();

            let (summary, seen_deliveries) = by_supplier
                .entry(row.supplier_code.clone())
                .or_insert_with(|| {
                    (
                        DailyIntakeRow {
                            supplier_id: row.supplier_id,
                            supplier_code: row.supplier_code.clone(),
                            supplier_name: row.supplier_name.clone(),
                            deliveries: 0,
                            total_stems: 0,
                            exportable_stems: 0,
                            local_stems: 0,
                            total_value: Decimal::ZERO,
                        },
                        Vec::new(),
                    )
                });

            if !seen_deliveries.contains(&row.delivery_id) {
                seen_deliveries.push(row.delivery_id);
                summary.deliveries += 1;
            }
            summary.total_stems += i64::from(row.quantity.max(0));
            summary.exportable_stems += exportable_stems;
            summary.local_stems += local_stems;
            summary.total_value += row.total_price;
        }

        Ok(by_supplier.into_values().map(|(summary, _)| summary).collect())
    }

    /// The daily intake summary rendered as CSV
    pub async fn daily_intake_csv(
        &self,
        date: NaiveDate,
        day_boundary: DayBoundary,
    ) -> AppResult<String> {
        let rows = self.daily_intake(date, day_boundary).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "supplier_code",
                "supplier_name",
                "deliveries",
                "total_stems",
                "exportable_stems",
                "local_stems",
                "total_value",
            ])
            .map_err(|e| AppError::Internal(e.to_string()))?;

        for row in &rows {
            writer
                .write_record([
                    row.supplier_code.as_str(),
                    row.supplier_name.as_str(),
                    &row.deliveries.to_string(),
                    &row.total_stems.to_string(),
                    &row.exportable_stems.to_string(),
                    &row.local_stems.to_string(),
                    &row.total_value.to_string(),
                ])
                .map_err(|e| AppError::Internal(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
    }
}
