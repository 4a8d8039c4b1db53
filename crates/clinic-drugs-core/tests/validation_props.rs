//! Property tests for drug input validation.

use proptest::prelude::*;

use chrono::NaiveDate;
use clinic_drugs_core::db::Database;
use clinic_drugs_core::models::{Clinic, InitialStock, NewDrug, QuantityType};
use clinic_drugs_core::service::{DrugError, DrugService};

fn setup() -> (Database, Clinic, QuantityType) {
    let db = Database::open_in_memory().unwrap();
    let clinic = Clinic::new("Riverside".to_string());
    db.insert_clinic(&clinic).unwrap();
    let tablets = QuantityType::new(clinic.id.clone(), "Tablets".to_string());
    db.insert_quantity_type(&tablets).unwrap();
    (db, clinic, tablets)
}

fn batch(quantity: i64) -> InitialStock {
    InitialStock {
        quantity,
        manufactured_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        received_date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
        expiry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        remarks: None,
    }
}

proptest! {
    #[test]
    fn prop_whitespace_names_rejected(name in "[ \t\n]{0,8}") {
        let (db, clinic, tablets) = setup();
        let service = DrugService::new(&db);

        let result = service.create(&clinic.id, NewDrug::new(name, "x", &tablets.id));
        prop_assert!(
            matches!(result, Err(DrugError::Validation { field: "name", .. })),
            "unexpected outcome: {:?}",
            result
        );
        prop_assert!(db.list_drugs(&clinic.id).unwrap().is_empty());
    }

    #[test]
    fn prop_stock_quantity_sign_decides(quantity in -1_000i64..1_000) {
        let (db, clinic, tablets) = setup();
        let service = DrugService::new(&db);

        let input = NewDrug::new("Paracetamol", "Acetaminophen", &tablets.id)
            .with_initial_stock(batch(quantity));
        let result = service.create(&clinic.id, input);

        let drugs = db.list_drugs(&clinic.id).unwrap();
        if quantity < 0 {
            prop_assert!(
                matches!(result, Err(DrugError::Validation { field: "quantity", .. })),
                "unexpected outcome: {:?}",
                result
            );
            prop_assert!(drugs.is_empty());
        } else {
            let created = result.unwrap();
            prop_assert_eq!(drugs.len(), 1);
            prop_assert_eq!(created.stock.map(|s| s.quantity), Some(quantity));
        }
    }
}
