//! Drug catalog models.

use serde::{Deserialize, Serialize};

use super::InitialStock;

/// A medication catalog entry scoped to a clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drug {
    /// Local UUID, assigned on insert
    pub id: String,
    /// Owning clinic (fixed at creation)
    pub clinic_id: String,
    /// Unit of measure, owned by the same clinic
    pub quantity_type_id: String,
    /// Drug name shown in the drug list
    pub name: String,
    /// Active ingredient
    pub ingredient: String,
    /// Manufacturer, if known
    pub manufacturer: Option<String>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Drug {
    /// Create a new drug record with required fields.
    pub fn new(
        clinic_id: String,
        quantity_type_id: String,
        name: String,
        ingredient: String,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            clinic_id,
            quantity_type_id,
            name,
            ingredient,
            manufacturer: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Input for adding a drug to a clinic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewDrug {
    pub name: String,
    pub ingredient: String,
    pub manufacturer: Option<String>,
    /// Required; `None` models a form submitted without a drug type
    pub quantity_type_id: Option<String>,
    /// First stock batch, created together with the drug
    pub initial_stock: Option<InitialStock>,
}

impl NewDrug {
    pub fn new(
        name: impl Into<String>,
        ingredient: impl Into<String>,
        quantity_type_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ingredient: ingredient.into(),
            manufacturer: None,
            quantity_type_id: Some(quantity_type_id.into()),
            initial_stock: None,
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_initial_stock(mut self, stock: InitialStock) -> Self {
        self.initial_stock = Some(stock);
        self
    }
}

/// Partial update of a drug. `None` fields are left unchanged.
///
/// `manufacturer: Some(None)` clears the stored manufacturer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DrugUpdate {
    pub name: Option<String>,
    pub ingredient: Option<String>,
    pub manufacturer: Option<Option<String>>,
    pub quantity_type_id: Option<String>,
}

impl DrugUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.ingredient.is_none()
            && self.manufacturer.is_none()
            && self.quantity_type_id.is_none()
    }
}
