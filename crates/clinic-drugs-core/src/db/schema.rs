//! SQLite schema definition.

/// Complete database schema for clinic-drugs.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Clinics and quantity types
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinics (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS quantity_types (
    id TEXT PRIMARY KEY,
    clinic_id TEXT NOT NULL REFERENCES clinics(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_quantity_types_clinic ON quantity_types(clinic_id);

-- ============================================================================
-- Drugs
-- ============================================================================

CREATE TABLE IF NOT EXISTS drugs (
    id TEXT PRIMARY KEY,
    clinic_id TEXT NOT NULL REFERENCES clinics(id),
    quantity_type_id TEXT NOT NULL REFERENCES quantity_types(id),
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    ingredient TEXT NOT NULL DEFAULT '',
    manufacturer TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_drugs_clinic ON drugs(clinic_id);
CREATE INDEX IF NOT EXISTS idx_drugs_name ON drugs(clinic_id, name);

-- FTS5 virtual table for the drug list search box
CREATE VIRTUAL TABLE IF NOT EXISTS drugs_fts USING fts5(
    name,
    ingredient,
    content='drugs',
    content_rowid='rowid'
);

-- Triggers to keep FTS5 in sync with main table
CREATE TRIGGER IF NOT EXISTS drugs_ai AFTER INSERT ON drugs BEGIN
    INSERT INTO drugs_fts(rowid, name, ingredient)
    VALUES (new.rowid, new.name, new.ingredient);
END;

CREATE TRIGGER IF NOT EXISTS drugs_ad AFTER DELETE ON drugs BEGIN
    INSERT INTO drugs_fts(drugs_fts, rowid, name, ingredient)
    VALUES ('delete', old.rowid, old.name, old.ingredient);
END;

CREATE TRIGGER IF NOT EXISTS drugs_au AFTER UPDATE ON drugs BEGIN
    INSERT INTO drugs_fts(drugs_fts, rowid, name, ingredient)
    VALUES ('delete', old.rowid, old.name, old.ingredient);
    INSERT INTO drugs_fts(rowid, name, ingredient)
    VALUES (new.rowid, new.name, new.ingredient);
END;

-- ============================================================================
-- Stock batches (removed together with their drug)
-- ============================================================================

CREATE TABLE IF NOT EXISTS stocks (
    id TEXT PRIMARY KEY,
    drug_id TEXT NOT NULL REFERENCES drugs(id) ON DELETE CASCADE,
    quantity INTEGER NOT NULL CHECK (quantity >= 0),
    manufactured_date TEXT NOT NULL,             -- YYYY-MM-DD
    received_date TEXT NOT NULL,                 -- YYYY-MM-DD
    expiry_date TEXT NOT NULL,                   -- YYYY-MM-DD
    remarks TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_stocks_drug ON stocks(drug_id);

-- ============================================================================
-- Prescription lines (block drug deletion)
-- ============================================================================

CREATE TABLE IF NOT EXISTS prescription_drugs (
    id TEXT PRIMARY KEY,
    prescription_id TEXT NOT NULL,
    drug_id TEXT NOT NULL REFERENCES drugs(id) ON DELETE RESTRICT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_prescription_drugs_drug ON prescription_drugs(drug_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO clinics (id, name) VALUES ('c1', 'Riverside');
            INSERT INTO quantity_types (id, clinic_id, name) VALUES ('q1', 'c1', 'Tablets');
            INSERT INTO drugs (id, clinic_id, quantity_type_id, name, ingredient)
            VALUES ('d1', 'c1', 'q1', 'Paracetamol', 'Acetaminophen');
            "#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_fts_trigger() {
        let conn = seeded();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM drugs_fts WHERE drugs_fts MATCH 'paracetamol'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        // Ingredient is indexed too
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM drugs_fts WHERE drugs_fts MATCH 'acetaminophen'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_negative_stock_rejected() {
        let conn = seeded();
        let result = conn.execute(
            r#"
            INSERT INTO stocks (id, drug_id, quantity, manufactured_date, received_date, expiry_date)
            VALUES ('s1', 'd1', -1, '2023-01-01', '2023-01-05', '2025-01-01')
            "#,
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_prescribed_drug_delete_restricted() {
        let conn = seeded();
        conn.execute(
            "INSERT INTO prescription_drugs (id, prescription_id, drug_id) VALUES ('p1', 'rx1', 'd1')",
            [],
        )
        .unwrap();

        let result = conn.execute("DELETE FROM drugs WHERE id = 'd1'", []);
        assert!(result.is_err());
    }

    #[test]
    fn test_stock_cascades_with_drug() {
        let conn = seeded();
        conn.execute(
            r#"
            INSERT INTO stocks (id, drug_id, quantity, manufactured_date, received_date, expiry_date)
            VALUES ('s1', 'd1', 10, '2023-01-01', '2023-01-05', '2025-01-01')
            "#,
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM drugs WHERE id = 'd1'", []).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM stocks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
