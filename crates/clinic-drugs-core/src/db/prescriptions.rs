//! Prescription reference database operations.

use rusqlite::params;

use super::{Database, DbResult};
use crate::models::PrescriptionDrug;

impl Database {
    /// Record that a prescription dispenses a drug.
    pub fn insert_prescription_drug(&self, line: &PrescriptionDrug) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO prescription_drugs (id, prescription_id, drug_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![line.id, line.prescription_id, line.drug_id, line.created_at],
        )?;
        Ok(())
    }

    /// Number of prescription lines referencing a drug.
    pub fn count_prescription_drugs_by_drug(&self, drug_id: &str) -> DbResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM prescription_drugs WHERE drug_id = ?",
            [drug_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Clinic, Drug, QuantityType};

    fn setup_drug(db: &Database) -> Drug {
        let clinic = Clinic::new("Riverside".into());
        db.insert_clinic(&clinic).unwrap();
        let qt = QuantityType::new(clinic.id.clone(), "Tablets".into());
        db.insert_quantity_type(&qt).unwrap();
        let drug = Drug::new(clinic.id, qt.id, "Paracetamol".into(), "Acetaminophen".into());
        db.insert_drug(&drug).unwrap();
        drug
    }

    #[test]
    fn test_count_by_drug() {
        let db = Database::open_in_memory().unwrap();
        let drug = setup_drug(&db);
        assert_eq!(db.count_prescription_drugs_by_drug(&drug.id).unwrap(), 0);

        db.insert_prescription_drug(&PrescriptionDrug::new("rx-1".into(), drug.id.clone()))
            .unwrap();
        db.insert_prescription_drug(&PrescriptionDrug::new("rx-2".into(), drug.id.clone()))
            .unwrap();

        assert_eq!(db.count_prescription_drugs_by_drug(&drug.id).unwrap(), 2);
        assert_eq!(db.count_prescription_drugs_by_drug("other").unwrap(), 0);
    }

    #[test]
    fn test_reference_requires_drug() {
        let db = Database::open_in_memory().unwrap();
        let line = PrescriptionDrug::new("rx-1".into(), "no-such-drug".into());
        assert!(db.insert_prescription_drug(&line).is_err());
    }
}
