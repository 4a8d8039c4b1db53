//! Prescription reference models.

use serde::{Deserialize, Serialize};

/// A line of a prescription that dispenses a drug. Any row pointing at a drug
/// blocks that drug's deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionDrug {
    pub id: String,
    pub prescription_id: String,
    pub drug_id: String,
    pub created_at: String,
}

impl PrescriptionDrug {
    pub fn new(prescription_id: String, drug_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            prescription_id,
            drug_id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
