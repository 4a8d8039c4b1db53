//! Drug database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Drug, DrugUpdate};

const DRUG_COLUMNS: &str = "d.id, d.clinic_id, d.quantity_type_id, d.name, d.ingredient, \
                            d.manufacturer, d.created_at, d.updated_at";

impl Database {
    /// Insert a new drug.
    pub fn insert_drug(&self, drug: &Drug) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO drugs (
                id, clinic_id, quantity_type_id, name, ingredient,
                manufacturer, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                drug.id,
                drug.clinic_id,
                drug.quantity_type_id,
                drug.name,
                drug.ingredient,
                drug.manufacturer,
                drug.created_at,
                drug.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a drug owned by `clinic_id`.
    pub fn get_drug(&self, clinic_id: &str, id: &str) -> DbResult<Option<Drug>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM drugs d WHERE d.id = ?1 AND d.clinic_id = ?2",
                    DRUG_COLUMNS
                ),
                params![id, clinic_id],
                drug_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Apply the present fields of `fields` to a drug.
    ///
    /// Returns false when no drug has this id.
    pub fn update_drug(&self, id: &str, fields: &DrugUpdate) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE drugs SET
                name = COALESCE(?2, name),
                ingredient = COALESCE(?3, ingredient),
                manufacturer = CASE WHEN ?4 THEN ?5 ELSE manufacturer END,
                quantity_type_id = COALESCE(?6, quantity_type_id),
                updated_at = ?7
            WHERE id = ?1
            "#,
            params![
                id,
                fields.name,
                fields.ingredient,
                fields.manufacturer.is_some(),
                fields.manufacturer.clone().flatten(),
                fields.quantity_type_id,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a drug. Its stock batches go with it.
    ///
    /// Fails with [`super::DbError::Constraint`] while any prescription line
    /// still references the drug.
    pub fn delete_drug(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM drugs WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// List a clinic's drugs by name.
    pub fn list_drugs(&self, clinic_id: &str) -> DbResult<Vec<Drug>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM drugs d WHERE d.clinic_id = ? ORDER BY d.name",
            DRUG_COLUMNS
        ))?;

        let rows = stmt.query_map([clinic_id], drug_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search a clinic's drugs by name or ingredient using FTS5 (BM25 ranking).
    pub fn search_drugs(&self, clinic_id: &str, query: &str, limit: usize) -> DbResult<Vec<Drug>> {
        let escaped_query = escape_fts_query(query);
        if escaped_query.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {}
            FROM drugs d
            JOIN drugs_fts ON d.rowid = drugs_fts.rowid
            WHERE drugs_fts MATCH ?1
            AND d.clinic_id = ?2
            ORDER BY bm25(drugs_fts)
            LIMIT ?3
            "#,
            DRUG_COLUMNS
        ))?;

        let rows = stmt.query_map(params![escaped_query, clinic_id, limit as i64], drug_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn drug_from_row(row: &Row<'_>) -> rusqlite::Result<Drug> {
    Ok(Drug {
        id: row.get(0)?,
        clinic_id: row.get(1)?,
        quantity_type_id: row.get(2)?,
        name: row.get(3)?,
        ingredient: row.get(4)?,
        manufacturer: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Turn each word into a quoted prefix match.
///
/// Quoting keeps words such as `AND`, `OR`, `NOT` and `NEAR` from being read as
/// FTS5 operators.
fn escape_fts_query(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(|word| format!("\"{}\"*", word))
        .collect::<Vec<_>>()
        .join(" ")
}
