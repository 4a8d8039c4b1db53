//! Clinic and quantity type database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{Clinic, QuantityType};

impl Database {
    /// Insert a new clinic.
    pub fn insert_clinic(&self, clinic: &Clinic) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO clinics (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![clinic.id, clinic.name, clinic.created_at],
        )?;
        Ok(())
    }

    /// Get a clinic by ID.
    pub fn get_clinic(&self, id: &str) -> DbResult<Option<Clinic>> {
        self.conn
            .query_row(
                "SELECT id, name, created_at FROM clinics WHERE id = ?",
                [id],
                |row| {
                    Ok(Clinic {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a quantity type for a clinic.
    pub fn insert_quantity_type(&self, quantity_type: &QuantityType) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO quantity_types (id, clinic_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                quantity_type.id,
                quantity_type.clinic_id,
                quantity_type.name,
                quantity_type.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a quantity type owned by `clinic_id`.
    ///
    /// Quantity types of other clinics are reported as missing.
    pub fn get_quantity_type(&self, clinic_id: &str, id: &str) -> DbResult<Option<QuantityType>> {
        self.conn
            .query_row(
                r#"
                SELECT id, clinic_id, name, created_at
                FROM quantity_types
                WHERE id = ?1 AND clinic_id = ?2
                "#,
                params![id, clinic_id],
                |row| {
                    Ok(QuantityType {
                        id: row.get(0)?,
                        clinic_id: row.get(1)?,
                        name: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// List a clinic's quantity types by name.
    pub fn list_quantity_types(&self, clinic_id: &str) -> DbResult<Vec<QuantityType>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, clinic_id, name, created_at
            FROM quantity_types
            WHERE clinic_id = ?
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([clinic_id], |row| {
            Ok(QuantityType {
                id: row.get(0)?,
                clinic_id: row.get(1)?,
                name: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get_clinic() {
        let db = setup_db();
        let clinic = Clinic::new("Riverside".into());
        db.insert_clinic(&clinic).unwrap();

        let retrieved = db.get_clinic(&clinic.id).unwrap().unwrap();
        assert_eq!(retrieved, clinic);
        assert!(db.get_clinic("missing").unwrap().is_none());
    }

    #[test]
    fn test_quantity_type_scoped_by_clinic() {
        let db = setup_db();
        let riverside = Clinic::new("Riverside".into());
        let hillside = Clinic::new("Hillside".into());
        db.insert_clinic(&riverside).unwrap();
        db.insert_clinic(&hillside).unwrap();

        let tablets = QuantityType::new(riverside.id.clone(), "Tablets".into());
        db.insert_quantity_type(&tablets).unwrap();

        assert!(db.get_quantity_type(&riverside.id, &tablets.id).unwrap().is_some());
        assert!(db.get_quantity_type(&hillside.id, &tablets.id).unwrap().is_none());
    }

    #[test]
    fn test_quantity_type_requires_clinic() {
        let db = setup_db();
        let orphan = QuantityType::new("no-such-clinic".into(), "Tablets".into());
        assert!(db.insert_quantity_type(&orphan).is_err());
    }

    #[test]
    fn test_list_quantity_types() {
        let db = setup_db();
        let clinic = Clinic::new("Riverside".into());
        db.insert_clinic(&clinic).unwrap();

        for name in ["Vials", "Tablets", "Bottles"] {
            db.insert_quantity_type(&QuantityType::new(clinic.id.clone(), name.into()))
                .unwrap();
        }

        let names: Vec<String> = db
            .list_quantity_types(&clinic.id)
            .unwrap()
            .into_iter()
            .map(|q| q.name)
            .collect();
        assert_eq!(names, vec!["Bottles", "Tablets", "Vials"]);
    }
}
