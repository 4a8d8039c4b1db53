//! Stock batch models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A batch (lot) of a drug held by the clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stock {
    pub id: String,
    pub drug_id: String,
    pub quantity: i64,
    pub manufactured_date: NaiveDate,
    pub received_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub remarks: Option<String>,
    pub created_at: String,
}

impl Stock {
    /// Build the stock row for a freshly created drug.
    pub fn from_initial(drug_id: String, initial: &InitialStock) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            drug_id,
            quantity: initial.quantity,
            manufactured_date: initial.manufactured_date,
            received_date: initial.received_date,
            expiry_date: initial.expiry_date,
            remarks: initial.remarks.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Check if the batch has expired as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }
}

/// Initial stock fields supplied alongside a new drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialStock {
    pub quantity: i64,
    pub manufactured_date: NaiveDate,
    pub received_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub remarks: Option<String>,
}

impl InitialStock {
    /// Expiry earlier than manufacture. Accepted, but worth a warning.
    pub fn has_inverted_dates(&self) -> bool {
        self.expiry_date < self.manufactured_date
    }
}
