//! Reject category catalog service

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::{Category, Subcategory};

/// Category catalog service
#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    active: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct SubcategoryRow {
    id: Uuid,
    category_id: Uuid,
    name: String,
    active: bool,
}

impl CategoryService {
    /// Create a new CategoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List active reject categories with their subcategories, in catalog
    /// order
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let category_rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, active
            FROM categories
            WHERE active
            ORDER BY sort_order, name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let subcategory_rows = sqlx::query_as::<_, SubcategoryRow>(
            r#"
            SELECT sc.id, sc.category_id, sc.name, sc.active
            FROM subcategories sc
            JOIN categories c ON c.id = sc.category_id
            WHERE c.active
            ORDER BY sc.sort_order, sc.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut categories: Vec<Category> = category_rows
            .into_iter()
            .map(|row| Category {
                id: row.id,
                name: row.name,
                active: row.active,
                subcategories: Vec::new(),
            })
            .collect();

        for sub in subcategory_rows {
            if let Some(category) = categories.iter_mut().find(|c| c.id == sub.category_id) {
                category.subcategories.push(Subcategory {
                    id: sub.id,
                    name: sub.name,
                    active: sub.active,
                });
            }
        }

        Ok(categories)
    }
}
