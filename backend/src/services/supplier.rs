//! Supplier intake service: code lookup, duplicate-day probe, quick create

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    validate_quick_supplier, AddVarietyInput, DayBoundary, ExistingDelivery, QuickSupplierInput,
    QuickSupplierResponse, SearchSupplierResponse, Supplier, SupplierVariety,
};

/// Supplier service for the intake workflow
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Database row for a supplier
#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: Uuid,
    code: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    ruc: Option<String>,
    varieties: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        let varieties: Vec<SupplierVariety> =
            serde_json::from_value(row.varieties).unwrap_or_default();
        Supplier {
            id: row.id,
            code: row.code,
            name: row.name,
            email: row.email,
            phone: row.phone,
            ruc: row.ruc,
            varieties,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Same-day delivery summary row
#[derive(Debug, sqlx::FromRow)]
struct ExistingDeliveryRow {
    id: Uuid,
    entry_datetime: DateTime<Utc>,
    total_entries: i64,
    total_stems: i64,
}

const SUPPLIER_COLUMNS: &str =
    "id, code, name, email, phone, ruc, varieties, created_at, updated_at";

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Look up a supplier by intake code and probe for a delivery already
    /// logged on the current local calendar day.
    pub async fn search_by_code(
        &self,
        code: &str,
        day_boundary: DayBoundary,
        now: DateTime<Utc>,
    ) -> AppResult<SearchSupplierResponse> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::Validation {
                field: "code".to_string(),
                message: "Supplier code is required".to_string(),
                message_es: "Debe ingresar un código de proveedor".to_string(),
            });
        }

        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.db)
        .await?;

        let Some(row) = row else {
            return Ok(SearchSupplierResponse {
                found: false,
                supplier: None,
                existing_delivery: None,
                message: Some(format!("No supplier registered with code {}", code)),
            });
        };

        let supplier: Supplier = row.into();
        let existing_delivery = self
            .same_day_delivery(supplier.id, day_boundary, now)
            .await?;

        Ok(SearchSupplierResponse {
            found: true,
            supplier: Some(supplier),
            existing_delivery,
            message: None,
        })
    }

    /// Most recent delivery by this supplier on the local day containing
    /// `now`, if any
    async fn same_day_delivery(
        &self,
        supplier_id: Uuid,
        day_boundary: DayBoundary,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ExistingDelivery>> {
        let (start, end) = day_boundary.utc_window(day_boundary.local_date(now));

        let row = sqlx::query_as::<_, ExistingDeliveryRow>(
            r#"
            SELECT d.id, d.entry_datetime,
                   COUNT(e.id) AS total_entries,
                   COALESCE(SUM(e.quantity), 0) AS total_stems
            FROM deliveries d
            LEFT JOIN delivery_entries e ON e.delivery_id = d.id
            WHERE d.supplier_id = $1
              AND d.entry_datetime >= $2
              AND d.entry_datetime < $3
            GROUP BY d.id, d.entry_datetime
            ORDER BY d.entry_datetime DESC
            LIMIT 1
            "#,
        )
        .bind(supplier_id)
        .bind(start)
        .bind(end)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|r| ExistingDelivery {
            id: r.id,
            entry_datetime: r.entry_datetime,
            total_entries: r.total_entries,
            total_stems: r.total_stems,
        }))
    }

    /// Create a supplier from the intake screen. Field errors come back in
    /// the response body so the client merges them with its own checks.
    pub async fn quick_create(
        &self,
        input: QuickSupplierInput,
    ) -> AppResult<QuickSupplierResponse> {
        let mut errors = validate_quick_supplier(&input);

        let code = input.code.trim().to_string();
        if code.is_empty() {
            errors.insert(
                "code".to_string(),
                "Supplier code is required".to_string(),
            );
        } else {
            let taken = sqlx::query_scalar::<_, Uuid>("SELECT id FROM suppliers WHERE code = $1")
                .bind(&code)
                .fetch_optional(&self.db)
                .await?;
            if taken.is_some() {
                errors.insert(
                    "code".to_string(),
                    format!("Code {} is already registered", code),
                );
            }
        }

        if !errors.is_empty() {
            return Ok(QuickSupplierResponse {
                success: false,
                supplier: None,
                errors: Some(errors),
                message: Some("Supplier could not be created".to_string()),
            });
        }

        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            INSERT INTO suppliers (code, name, email, phone, ruc, varieties)
            VALUES ($1, $2, $3, $4, $5, '[]'::jsonb)
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(&code)
        .bind(input.name.trim())
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.ruc)
        .fetch_one(&self.db)
        .await?;

        Ok(QuickSupplierResponse {
            success: true,
            supplier: Some(row.into()),
            errors: None,
            message: None,
        })
    }

    /// Get supplier by ID
    pub async fn get_supplier(&self, supplier_id: Uuid) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1"
        ))
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(row.into())
    }

    /// List all suppliers
    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY code"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Add a (species, variety) pair to a supplier's catalog; adding an
    /// existing pair is a no-op
    pub async fn add_variety(
        &self,
        supplier_id: Uuid,
        input: AddVarietyInput,
    ) -> AppResult<Supplier> {
        let species = input.species.trim();
        let variety = input.variety.trim();
        if species.is_empty() || variety.is_empty() {
            return Err(AppError::Validation {
                field: "variety".to_string(),
                message: "Species and variety are required".to_string(),
                message_es: "Debe indicar especie y variedad".to_string(),
            });
        }

        let mut supplier = self.get_supplier(supplier_id).await?;
        let pair = SupplierVariety {
            species: species.to_string(),
            variety: variety.to_string(),
        };
        if !supplier.varieties.contains(&pair) {
            supplier.varieties.push(pair);
            let varieties = serde_json::to_value(&supplier.varieties)
                .map_err(|e| AppError::Internal(e.to_string()))?;

            let row = sqlx::query_as::<_, SupplierRow>(&format!(
                r#"
                UPDATE suppliers
                SET varieties = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING {SUPPLIER_COLUMNS}
                "#
            ))
            .bind(supplier_id)
            .bind(&varieties)
            .fetch_one(&self.db)
            .await?;

            return Ok(row.into());
        }

        Ok(supplier)
    }
}
