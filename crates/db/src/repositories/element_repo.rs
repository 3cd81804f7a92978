//! Repository for the `layer_elements` table.
//!
//! Batch writes come in two flavors: a full replacement that swaps a
//! layer's element set atomically, and an upsert that merges by the
//! `(element_type, geometry)` identity pair.

use planview_core::types::DbId;
use sqlx::PgPool;

use crate::models::element::{ElementInput, LayerElement};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, layer_id, element_type, geometry, payload, state, created_at, updated_at";

/// Provides read and batch-write operations for layer elements.
pub struct ElementRepo;

impl ElementRepo {
    /// List a layer's live elements in insertion order.
    pub async fn list_by_layer(
        pool: &PgPool,
        layer_id: DbId,
    ) -> Result<Vec<LayerElement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM layer_elements
             WHERE layer_id = $1 AND deleted_at IS NULL
             ORDER BY id"
        );
        sqlx::query_as::<_, LayerElement>(&query)
            .bind(layer_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a layer's entire element set in one transaction: the existing
    /// elements are soft-deleted and the batch inserted. An empty batch
    /// clears the layer.
    pub async fn replace_all(
        pool: &PgPool,
        layer_id: DbId,
        elements: &[ElementInput],
    ) -> Result<Vec<LayerElement>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE layer_elements SET deleted_at = NOW()
             WHERE layer_id = $1 AND deleted_at IS NULL",
        )
        .bind(layer_id)
        .execute(&mut *tx)
        .await?;

        let insert = format!(
            "INSERT INTO layer_elements (layer_id, element_type, geometry, payload, state)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let mut rows = Vec::with_capacity(elements.len());
        for element in elements {
            let row = sqlx::query_as::<_, LayerElement>(&insert)
                .bind(layer_id)
                .bind(&element.element_type)
                .bind(&element.geometry)
                .bind(&element.payload)
                .bind(&element.state)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }

    /// Merge a batch into a layer's element set. An incoming element whose
    /// `(element_type, geometry)` pair matches a live row updates that row's
    /// payload and state; otherwise it is inserted. Unmatched existing rows
    /// are left alone.
    pub async fn bulk_upsert(
        pool: &PgPool,
        layer_id: DbId,
        elements: &[ElementInput],
    ) -> Result<Vec<LayerElement>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update = format!(
            "UPDATE layer_elements SET
                payload = $4,
                state = $5,
                updated_at = NOW()
             WHERE layer_id = $1 AND element_type = $2 AND geometry = $3
                 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let insert = format!(
            "INSERT INTO layer_elements (layer_id, element_type, geometry, payload, state)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );

        let mut rows = Vec::with_capacity(elements.len());
        for element in elements {
            let updated = sqlx::query_as::<_, LayerElement>(&update)
                .bind(layer_id)
                .bind(&element.element_type)
                .bind(&element.geometry)
                .bind(&element.payload)
                .bind(&element.state)
                .fetch_optional(&mut *tx)
                .await?;
            let row = match updated {
                Some(row) => row,
                None => {
                    sqlx::query_as::<_, LayerElement>(&insert)
                        .bind(layer_id)
                        .bind(&element.element_type)
                        .bind(&element.geometry)
                        .bind(&element.payload)
                        .bind(&element.state)
                        .fetch_one(&mut *tx)
                        .await?
                }
            };
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }
}
