//! Clinic and quantity type models.

use serde::{Deserialize, Serialize};

/// A clinic: the tenant boundary that owns drugs and quantity types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clinic {
    /// Local UUID
    pub id: String,
    /// Display name
    pub name: String,
    /// Creation timestamp
    pub created_at: String,
}

impl Clinic {
    /// Create a new clinic with a fresh id.
    pub fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Unit of measure a clinic dispenses a drug in (tablets, mL, vials...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuantityType {
    pub id: String,
    /// Owning clinic
    pub clinic_id: String,
    pub name: String,
    pub created_at: String,
}

impl QuantityType {
    pub fn new(clinic_id: String, name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            clinic_id,
            name,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clinic() {
        let clinic = Clinic::new("Riverside".into());
        assert_eq!(clinic.name, "Riverside");
        assert_eq!(clinic.id.len(), 36); // UUID format
    }

    #[test]
    fn test_new_quantity_type() {
        let qt = QuantityType::new("clinic-1".into(), "Tablets".into());
        assert_eq!(qt.clinic_id, "clinic-1");
        assert_eq!(qt.name, "Tablets");
    }
}
