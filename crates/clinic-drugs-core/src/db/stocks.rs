//! Stock batch database operations.

use chrono::NaiveDate;
use rusqlite::params;

use super::{Database, DbError, DbResult, DATE_FORMAT};
use crate::models::Stock;

impl Database {
    /// Insert a stock batch.
    pub fn insert_stock(&self, stock: &Stock) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO stocks (
                id, drug_id, quantity, manufactured_date, received_date,
                expiry_date, remarks, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                stock.id,
                stock.drug_id,
                stock.quantity,
                stock.manufactured_date.format(DATE_FORMAT).to_string(),
                stock.received_date.format(DATE_FORMAT).to_string(),
                stock.expiry_date.format(DATE_FORMAT).to_string(),
                stock.remarks,
                stock.created_at,
            ],
        )?;
        Ok(())
    }

    /// List the stock batches of a drug, soonest expiry first.
    pub fn list_stocks_for_drug(&self, drug_id: &str) -> DbResult<Vec<Stock>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, drug_id, quantity, manufactured_date, received_date,
                   expiry_date, remarks, created_at
            FROM stocks
            WHERE drug_id = ?
            ORDER BY expiry_date, created_at
            "#,
        )?;

        let rows = stmt.query_map([drug_id], |row| {
            Ok(StockRow {
                id: row.get(0)?,
                drug_id: row.get(1)?,
                quantity: row.get(2)?,
                manufactured_date: row.get(3)?,
                received_date: row.get(4)?,
                expiry_date: row.get(5)?,
                remarks: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?;

        let mut stocks = Vec::new();
        for row in rows {
            stocks.push(row?.try_into()?);
        }
        Ok(stocks)
    }
}

/// Intermediate row struct for database mapping.
struct StockRow {
    id: String,
    drug_id: String,
    quantity: i64,
    manufactured_date: String,
    received_date: String,
    expiry_date: String,
    remarks: Option<String>,
    created_at: String,
}

impl TryFrom<StockRow> for Stock {
    type Error = DbError;

    fn try_from(row: StockRow) -> Result<Self, Self::Error> {
        Ok(Stock {
            id: row.id,
            drug_id: row.drug_id,
            quantity: row.quantity,
            manufactured_date: parse_date(&row.manufactured_date)?,
            received_date: parse_date(&row.received_date)?,
            expiry_date: parse_date(&row.expiry_date)?,
            remarks: row.remarks,
            created_at: row.created_at,
        })
    }
}

fn parse_date(value: &str) -> DbResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| DbError::InvalidData(format!("date {:?}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Clinic, Drug, InitialStock, QuantityType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (Database, Drug) {
        let db = Database::open_in_memory().unwrap();
        let clinic = Clinic::new("Riverside".into());
        db.insert_clinic(&clinic).unwrap();
        let qt = QuantityType::new(clinic.id.clone(), "Tablets".into());
        db.insert_quantity_type(&qt).unwrap();
        let drug = Drug::new(clinic.id, qt.id, "Paracetamol".into(), "Acetaminophen".into());
        db.insert_drug(&drug).unwrap();
        (db, drug)
    }

    fn batch(quantity: i64, expiry: NaiveDate) -> InitialStock {
        InitialStock {
            quantity,
            manufactured_date: date(2023, 1, 1),
            received_date: date(2023, 1, 5),
            expiry_date: expiry,
            remarks: None,
        }
    }

    #[test]
    fn test_insert_and_list() {
        let (db, drug) = setup();
        let stock = Stock::from_initial(drug.id.clone(), &batch(100, date(2025, 1, 1)));
        db.insert_stock(&stock).unwrap();

        let stocks = db.list_stocks_for_drug(&drug.id).unwrap();
        assert_eq!(stocks, vec![stock]);
    }

    #[test]
    fn test_list_orders_by_expiry() {
        let (db, drug) = setup();
        let late = Stock::from_initial(drug.id.clone(), &batch(5, date(2026, 1, 1)));
        let early = Stock::from_initial(drug.id.clone(), &batch(5, date(2024, 1, 1)));
        db.insert_stock(&late).unwrap();
        db.insert_stock(&early).unwrap();

        let ids: Vec<String> = db
            .list_stocks_for_drug(&drug.id)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![early.id, late.id]);
    }

    #[test]
    fn test_negative_quantity_is_constraint_error() {
        let (db, drug) = setup();
        let stock = Stock::from_initial(drug.id.clone(), &batch(-1, date(2025, 1, 1)));
        let err = db.insert_stock(&stock).unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn test_corrupt_date_reported() {
        let (db, drug) = setup();
        db.conn()
            .execute(
                r#"
                INSERT INTO stocks (id, drug_id, quantity, manufactured_date, received_date, expiry_date)
                VALUES ('s1', ?1, 1, '2023/01/01', '2023-01-05', '2025-01-01')
                "#,
                [&drug.id],
            )
            .unwrap();

        let err = db.list_stocks_for_drug(&drug.id).unwrap_err();
        assert!(matches!(err, DbError::InvalidData(_)));
    }
}
