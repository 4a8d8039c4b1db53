//! Storage seam consumed by the drug service.

use super::{Database, DbError, DbResult};
use crate::models::{Clinic, Drug, DrugUpdate, QuantityType, Stock};

/// Record access the drug service needs, scoped by clinic where it matters.
///
/// Lookups return `Ok(None)` for missing rows; callers decide which error that is.
pub trait InventoryStore {
    fn find_clinic(&self, id: &str) -> DbResult<Option<Clinic>>;

    /// Only quantity types owned by `clinic_id` are visible: a quantity type of
    /// another clinic is `Ok(None)`, never returned. Callers rely on this and do
    /// not re-check ownership.
    fn find_quantity_type(&self, clinic_id: &str, id: &str) -> DbResult<Option<QuantityType>>;

    fn insert_drug(&self, drug: &Drug) -> DbResult<()>;

    /// Only drugs owned by `clinic_id` are visible: a drug of another clinic is
    /// `Ok(None)`, never returned. Callers rely on this and do not re-check
    /// ownership.
    fn find_drug(&self, clinic_id: &str, id: &str) -> DbResult<Option<Drug>>;

    fn update_drug(&self, id: &str, fields: &DrugUpdate) -> DbResult<bool>;

    /// A storage-level reference violation surfaces as [`DbError::Constraint`].
    fn delete_drug(&self, id: &str) -> DbResult<bool>;

    fn insert_stock(&self, stock: &Stock) -> DbResult<()>;

    fn count_prescription_drugs_by_drug(&self, drug_id: &str) -> DbResult<u64>;

    /// Run `work` as one unit: every write it made is rolled back if it fails.
    fn run_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        Self: Sized,
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>;
}

impl InventoryStore for Database {
    fn find_clinic(&self, id: &str) -> DbResult<Option<Clinic>> {
        self.get_clinic(id)
    }

    fn find_quantity_type(&self, clinic_id: &str, id: &str) -> DbResult<Option<QuantityType>> {
        self.get_quantity_type(clinic_id, id)
    }

    fn insert_drug(&self, drug: &Drug) -> DbResult<()> {
        Database::insert_drug(self, drug)
    }

    fn find_drug(&self, clinic_id: &str, id: &str) -> DbResult<Option<Drug>> {
        self.get_drug(clinic_id, id)
    }

    fn update_drug(&self, id: &str, fields: &DrugUpdate) -> DbResult<bool> {
        Database::update_drug(self, id, fields)
    }

    fn delete_drug(&self, id: &str) -> DbResult<bool> {
        Database::delete_drug(self, id)
    }

    fn insert_stock(&self, stock: &Stock) -> DbResult<()> {
        Database::insert_stock(self, stock)
    }

    fn count_prescription_drugs_by_drug(&self, drug_id: &str) -> DbResult<u64> {
        Database::count_prescription_drugs_by_drug(self, drug_id)
    }

    fn run_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        Database::run_in_transaction(self, work)
    }
}
