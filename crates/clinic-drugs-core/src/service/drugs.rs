//! Create, update and delete drugs within a clinic.

use tracing::{debug, info, warn};

use super::{DrugError, DrugResult, EntityKind};
use crate::db::{DbError, InventoryStore};
use crate::models::{Drug, DrugUpdate, InitialStock, NewDrug, QuantityType, Stock};

/// A drug as created, with its first stock batch if one was supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedDrug {
    pub drug: Drug,
    pub stock: Option<Stock>,
}

/// Drug management rules.
///
/// Every call names the clinic it acts for; drugs and quantity types of other
/// clinics are treated as missing.
pub struct DrugService<'a, S: InventoryStore> {
    store: &'a S,
}

impl<'a, S: InventoryStore> DrugService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add a drug, together with its initial stock batch when one is given.
    ///
    /// The drug and stock inserts commit together or not at all.
    pub fn create(&self, clinic_id: &str, input: NewDrug) -> DrugResult<CreatedDrug> {
        let clinic = self
            .store
            .find_clinic(clinic_id)?
            .ok_or_else(|| DrugError::not_found(EntityKind::Clinic, clinic_id))?;

        let name = validate_name(&input.name)?;
        let quantity_type =
            self.owned_quantity_type(&clinic.id, input.quantity_type_id.as_deref())?;
        if let Some(initial) = &input.initial_stock {
            validate_initial_stock(initial)?;
        }

        let mut drug = Drug::new(clinic.id, quantity_type.id, name, input.ingredient);
        drug.manufacturer = input.manufacturer;
        let stock = input
            .initial_stock
            .as_ref()
            .map(|initial| Stock::from_initial(drug.id.clone(), initial));

        self.store.run_in_transaction(|store| -> DrugResult<()> {
            store.insert_drug(&drug)?;
            if let Some(stock) = &stock {
                store.insert_stock(stock)?;
            }
            Ok(())
        })?;

        info!(
            clinic_id = %drug.clinic_id,
            drug_id = %drug.id,
            with_stock = stock.is_some(),
            "Drug added"
        );
        Ok(CreatedDrug { drug, stock })
    }

    /// Change the supplied fields of a drug. Stock is never touched.
    pub fn update(&self, clinic_id: &str, drug_id: &str, input: DrugUpdate) -> DrugResult<Drug> {
        let drug = self.owned_drug(clinic_id, drug_id)?;

        let mut fields = DrugUpdate {
            ingredient: input.ingredient,
            manufacturer: input.manufacturer,
            ..Default::default()
        };
        if let Some(name) = &input.name {
            fields.name = Some(validate_name(name)?);
        }
        if let Some(quantity_type_id) = &input.quantity_type_id {
            let quantity_type = self.owned_quantity_type(clinic_id, Some(quantity_type_id))?;
            fields.quantity_type_id = Some(quantity_type.id);
        }

        if fields.is_empty() {
            debug!(drug_id = %drug.id, "Empty drug update");
            return Ok(drug);
        }

        if !self.store.update_drug(&drug.id, &fields)? {
            return Err(DrugError::not_found(EntityKind::Drug, drug_id));
        }

        let updated = self.owned_drug(clinic_id, drug_id)?;
        info!(clinic_id, drug_id, "Drug updated");
        Ok(updated)
    }

    /// Delete a drug unless a prescription still references it.
    ///
    /// A reference that appears between the check and the delete is caught by
    /// the storage constraint and reported the same way.
    pub fn delete(&self, clinic_id: &str, drug_id: &str) -> DrugResult<()> {
        let drug = self.owned_drug(clinic_id, drug_id)?;

        let references = self.store.count_prescription_drugs_by_drug(&drug.id)?;
        if references > 0 {
            warn!(drug_id, references, "Refusing to delete prescribed drug");
            return Err(DrugError::in_use(drug.id));
        }

        match self.store.delete_drug(&drug.id) {
            Ok(true) => {
                info!(clinic_id, drug_id, "Drug deleted");
                Ok(())
            }
            Ok(false) => Err(DrugError::not_found(EntityKind::Drug, drug_id)),
            Err(DbError::Constraint(reason)) => {
                warn!(drug_id, %reason, "Drug delete blocked by storage constraint");
                Err(DrugError::in_use(drug.id))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn owned_drug(&self, clinic_id: &str, drug_id: &str) -> DrugResult<Drug> {
        self.store
            .find_drug(clinic_id, drug_id)?
            .ok_or_else(|| DrugError::not_found(EntityKind::Drug, drug_id))
    }

    fn owned_quantity_type(
        &self,
        clinic_id: &str,
        quantity_type_id: Option<&str>,
    ) -> DrugResult<QuantityType> {
        let id = quantity_type_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DrugError::validation("quantity_type_id", "is required"))?;

        self.store
            .find_quantity_type(clinic_id, id)?
            .ok_or_else(|| {
                DrugError::validation("quantity_type_id", format!("unknown quantity type {}", id))
            })
    }
}

fn validate_name(name: &str) -> DrugResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DrugError::validation("name", "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_initial_stock(initial: &InitialStock) -> DrugResult<()> {
    if initial.quantity < 0 {
        return Err(DrugError::validation("quantity", "must not be negative"));
    }
    if initial.has_inverted_dates() {
        // Accepted as entered; existing batches carry such data.
        warn!(
            manufactured = %initial.manufactured_date,
            expiry = %initial.expiry_date,
            "Stock expires before it was manufactured"
        );
    }
    Ok(())
}
