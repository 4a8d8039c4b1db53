//! Clinic-Drugs Core Library
//!
//! Drug catalog management for a clinic inventory: listing and viewing drugs,
//! adding a drug with an optional first stock batch, editing, and deleting
//! drugs that no prescription uses.
//!
//! # Architecture
//!
//! ```text
//!   Drug screens (add / edit / delete forms)
//!                  │
//!        ┌─────────▼─────────┐
//!        │  ClinicDrugsCore  │  forms in, flash messages out
//!        └─────────┬─────────┘
//!                  │
//!        ┌─────────▼─────────┐
//!        │    DrugService    │  validation, ownership, deletion guard
//!        └─────────┬─────────┘
//!                  │ InventoryStore
//!        ┌─────────▼─────────┐
//!        │  SQLite Database  │  drugs, stocks, prescription_drugs, ...
//!        └───────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **A prescribed drug is never deleted.** The service counts prescription
//! lines before deleting, and the schema restricts the delete as well.
//!
//! # Modules
//!
//! - [`db`]: SQLite database layer with FTS5 drug search
//! - [`models`]: Domain types (Drug, Stock, QuantityType, etc.)
//! - [`service`]: Drug create/update/delete rules
//! - [`boundary`]: Form parsing and flash messages
//! - [`config`]: TOML configuration
//! - [`logging`]: Tracing subscriber setup

pub mod boundary;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use boundary::{DrugEditForm, DrugForm, FlashLevel, FlashMessage};
pub use config::CoreConfig;
pub use db::{Database, InventoryStore};
pub use models::{
    Clinic, Drug, DrugUpdate, InitialStock, NewDrug, PrescriptionDrug, QuantityType, Stock,
};
pub use service::{CreatedDrug, DrugError, DrugService, EntityKind};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicDrugsError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for ClinicDrugsError {
    fn from(e: db::DbError) -> Self {
        ClinicDrugsError::DatabaseError(e.to_string())
    }
}

impl From<DrugError> for ClinicDrugsError {
    fn from(e: DrugError) -> Self {
        match e {
            DrugError::NotFound { .. } => ClinicDrugsError::NotFound(e.to_string()),
            DrugError::Storage(inner) => inner.into(),
            other => ClinicDrugsError::InvalidInput(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ClinicDrugsError {
    fn from(e: serde_json::Error) -> Self {
        ClinicDrugsError::SerializationError(e.to_string())
    }
}

impl From<config::ConfigError> for ClinicDrugsError {
    fn from(e: config::ConfigError) -> Self {
        ClinicDrugsError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicDrugsError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicDrugsError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<ClinicDrugsCore>, ClinicDrugsError> {
    let db = Database::open(&path)?;
    Ok(ClinicDrugsCore::wrap(db))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<ClinicDrugsCore>, ClinicDrugsError> {
    let db = Database::open_in_memory()?;
    Ok(ClinicDrugsCore::wrap(db))
}

/// Load a TOML config file, install logging, and open the configured database.
#[uniffi::export]
pub fn open_with_config(config_path: String) -> Result<Arc<ClinicDrugsCore>, ClinicDrugsError> {
    let config = CoreConfig::from_file(&config_path)?;
    logging::init_logging(&config.logging);
    let db = config.open_database()?;
    tracing::info!(path = %config.database.path, "Clinic drug database opened");
    Ok(ClinicDrugsCore::wrap(db))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct ClinicDrugsCore {
    db: Arc<Mutex<Database>>,
}

impl ClinicDrugsCore {
    fn wrap(db: Database) -> Arc<Self> {
        Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }
}

#[uniffi::export]
impl ClinicDrugsCore {
    // =========================================================================
    // Clinic Operations
    // =========================================================================

    /// Register a clinic.
    pub fn create_clinic(&self, name: String) -> Result<FfiClinic, ClinicDrugsError> {
        if name.trim().is_empty() {
            return Err(ClinicDrugsError::InvalidInput("clinic name must not be empty".into()));
        }
        let db = self.db.lock()?;
        let clinic = Clinic::new(name);
        db.insert_clinic(&clinic)?;
        Ok(clinic.into())
    }

    /// Add a quantity type (drug type) to a clinic.
    pub fn create_quantity_type(
        &self,
        clinic_id: String,
        name: String,
    ) -> Result<FfiQuantityType, ClinicDrugsError> {
        if name.trim().is_empty() {
            return Err(ClinicDrugsError::InvalidInput(
                "quantity type name must not be empty".into(),
            ));
        }
        let db = self.db.lock()?;
        if db.get_clinic(&clinic_id)?.is_none() {
            return Err(DrugError::not_found(EntityKind::Clinic, clinic_id).into());
        }
        let quantity_type = QuantityType::new(clinic_id, name);
        db.insert_quantity_type(&quantity_type)?;
        Ok(quantity_type.into())
    }

    /// Quantity types of a clinic, for the drug form's type picker.
    pub fn list_quantity_types(
        &self,
        clinic_id: String,
    ) -> Result<Vec<FfiQuantityType>, ClinicDrugsError> {
        let db = self.db.lock()?;
        let types = db.list_quantity_types(&clinic_id)?;
        Ok(types.into_iter().map(|q| q.into()).collect())
    }

    // =========================================================================
    // Drug Views
    // =========================================================================

    /// All drugs of a clinic, by name.
    pub fn list_drugs(&self, clinic_id: String) -> Result<Vec<FfiDrug>, ClinicDrugsError> {
        let db = self.db.lock()?;
        let drugs = db.list_drugs(&clinic_id)?;
        Ok(drugs.into_iter().map(|d| d.into()).collect())
    }

    /// Search a clinic's drugs by name or ingredient.
    pub fn search_drugs(
        &self,
        clinic_id: String,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiDrug>, ClinicDrugsError> {
        let db = self.db.lock()?;
        let drugs = db.search_drugs(&clinic_id, &query, limit as usize)?;
        Ok(drugs.into_iter().map(|d| d.into()).collect())
    }

    /// A drug with its stock batches.
    pub fn get_drug(
        &self,
        clinic_id: String,
        drug_id: String,
    ) -> Result<Option<FfiDrugDetail>, ClinicDrugsError> {
        let db = self.db.lock()?;
        let Some(drug) = db.get_drug(&clinic_id, &drug_id)? else {
            return Ok(None);
        };
        let stocks = db.list_stocks_for_drug(&drug.id)?;
        Ok(Some(FfiDrugDetail {
            drug: drug.into(),
            stocks: stocks.into_iter().map(|s| s.into()).collect(),
        }))
    }

    /// Drug list as JSON.
    pub fn export_drugs_json(&self, clinic_id: String) -> Result<String, ClinicDrugsError> {
        let db = self.db.lock()?;
        let drugs = db.list_drugs(&clinic_id)?;
        Ok(serde_json::to_string_pretty(&drugs)?)
    }

    // =========================================================================
    // Drug Actions
    // =========================================================================

    /// Submit the add-drug form.
    pub fn add_drug(
        &self,
        clinic_id: String,
        form: FfiDrugForm,
    ) -> Result<FfiFlashMessage, ClinicDrugsError> {
        let db = self.db.lock()?;
        let result = NewDrug::try_from(DrugForm::from(form))
            .and_then(|input| DrugService::new(&*db).create(&clinic_id, input));
        Ok(FlashMessage::for_create(&result).into())
    }

    /// Submit the edit-drug form.
    pub fn edit_drug(
        &self,
        clinic_id: String,
        drug_id: String,
        form: FfiDrugEditForm,
    ) -> Result<FfiFlashMessage, ClinicDrugsError> {
        let db = self.db.lock()?;
        let update = DrugUpdate::from(DrugEditForm::from(form));
        let result = DrugService::new(&*db).update(&clinic_id, &drug_id, update);
        Ok(FlashMessage::for_update(&result).into())
    }

    /// Delete a drug; refused while prescriptions use it.
    pub fn delete_drug(
        &self,
        clinic_id: String,
        drug_id: String,
    ) -> Result<FfiFlashMessage, ClinicDrugsError> {
        let db = self.db.lock()?;
        let result = DrugService::new(&*db).delete(&clinic_id, &drug_id);
        Ok(FlashMessage::for_delete(&result).into())
    }

    // =========================================================================
    // Prescription Operations
    // =========================================================================

    /// Record that a prescription dispenses one of the clinic's drugs.
    pub fn record_prescription_drug(
        &self,
        clinic_id: String,
        prescription_id: String,
        drug_id: String,
    ) -> Result<(), ClinicDrugsError> {
        let db = self.db.lock()?;
        if db.get_drug(&clinic_id, &drug_id)?.is_none() {
            return Err(DrugError::not_found(EntityKind::Drug, drug_id).into());
        }
        db.insert_prescription_drug(&PrescriptionDrug::new(prescription_id, drug_id))?;
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe clinic.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinic {
    pub id: String,
    pub name: String,
}

impl From<Clinic> for FfiClinic {
    fn from(clinic: Clinic) -> Self {
        Self {
            id: clinic.id,
            name: clinic.name,
        }
    }
}

/// FFI-safe quantity type.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQuantityType {
    pub id: String,
    pub clinic_id: String,
    pub name: String,
}

impl From<QuantityType> for FfiQuantityType {
    fn from(quantity_type: QuantityType) -> Self {
        Self {
            id: quantity_type.id,
            clinic_id: quantity_type.clinic_id,
            name: quantity_type.name,
        }
    }
}

/// FFI-safe drug.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrug {
    pub id: String,
    pub clinic_id: String,
    pub quantity_type_id: String,
    pub name: String,
    pub ingredient: String,
    pub manufacturer: Option<String>,
}

impl From<Drug> for FfiDrug {
    fn from(drug: Drug) -> Self {
        Self {
            id: drug.id,
            clinic_id: drug.clinic_id,
            quantity_type_id: drug.quantity_type_id,
            name: drug.name,
            ingredient: drug.ingredient,
            manufacturer: drug.manufacturer,
        }
    }
}

/// FFI-safe stock batch. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStock {
    pub id: String,
    pub quantity: i64,
    pub manufactured_date: String,
    pub received_date: String,
    pub expiry_date: String,
    pub remarks: Option<String>,
    pub expired: bool,
}

impl From<Stock> for FfiStock {
    fn from(stock: Stock) -> Self {
        let expired = stock.is_expired(chrono::Local::now().date_naive());
        Self {
            id: stock.id,
            quantity: stock.quantity,
            manufactured_date: stock.manufactured_date.to_string(),
            received_date: stock.received_date.to_string(),
            expiry_date: stock.expiry_date.to_string(),
            remarks: stock.remarks,
            expired,
        }
    }
}

/// FFI-safe drug view.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugDetail {
    pub drug: FfiDrug,
    pub stocks: Vec<FfiStock>,
}

/// FFI-safe add-drug form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugForm {
    pub drug_name: String,
    pub ingredient: String,
    pub manufacturer: Option<String>,
    pub quantity_type: Option<String>,
    pub quantity: Option<i64>,
    pub manufactured_date: Option<String>,
    pub received_date: Option<String>,
    pub expiry_date: Option<String>,
    pub remarks: Option<String>,
}

impl From<FfiDrugForm> for DrugForm {
    fn from(form: FfiDrugForm) -> Self {
        DrugForm {
            drug_name: form.drug_name,
            ingredient: form.ingredient,
            manufacturer: form.manufacturer,
            quantity_type: form.quantity_type,
            quantity: form.quantity,
            manufactured_date: form.manufactured_date,
            received_date: form.received_date,
            expiry_date: form.expiry_date,
            remarks: form.remarks,
        }
    }
}

/// FFI-safe edit-drug form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugEditForm {
    pub drug_name: Option<String>,
    pub ingredient: Option<String>,
    pub manufacturer: Option<String>,
    pub quantity_type: Option<String>,
}

impl From<FfiDrugEditForm> for DrugEditForm {
    fn from(form: FfiDrugEditForm) -> Self {
        DrugEditForm {
            drug_name: form.drug_name,
            ingredient: form.ingredient,
            manufacturer: form.manufacturer,
            quantity_type: form.quantity_type,
        }
    }
}

/// FFI-safe flash level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiFlashLevel {
    Success,
    Error,
}

/// FFI-safe flash message.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct FfiFlashMessage {
    pub level: FfiFlashLevel,
    pub text: String,
}

impl From<FlashMessage> for FfiFlashMessage {
    fn from(message: FlashMessage) -> Self {
        Self {
            level: match message.level {
                FlashLevel::Success => FfiFlashLevel::Success,
                FlashLevel::Error => FfiFlashLevel::Error,
            },
            text: message.text,
        }
    }
}
