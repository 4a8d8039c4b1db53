//! Form input and flash messages for the drug screens.
//!
//! Screens submit loosely typed forms; this module turns them into service
//! input and turns service outcomes into the one-line messages shown after
//! each action.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::models::{DrugUpdate, InitialStock, NewDrug};
use crate::service::{CreatedDrug, DrugError, DrugResult};

pub const DRUG_ADDED: &str = "Drug added successfully !";
pub const DRUG_UPDATED: &str = "Drug updated successfully !";
pub const DRUG_DELETED: &str = "The drug successfully deleted!";
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Date formats accepted from forms, tried in order.
const FORM_DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

/// Message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            text: text.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == FlashLevel::Success
    }

    pub fn for_create(result: &DrugResult<CreatedDrug>) -> Self {
        match result {
            Ok(_) => Self::success(DRUG_ADDED),
            Err(e) => Self::from(e),
        }
    }

    pub fn for_update<T>(result: &DrugResult<T>) -> Self {
        match result {
            Ok(_) => Self::success(DRUG_UPDATED),
            Err(e) => Self::from(e),
        }
    }

    pub fn for_delete(result: &DrugResult<()>) -> Self {
        match result {
            Ok(()) => Self::success(DRUG_DELETED),
            Err(e) => Self::from(e),
        }
    }
}

impl From<&DrugError> for FlashMessage {
    fn from(e: &DrugError) -> Self {
        match e {
            DrugError::Validation { .. } => Self::error(e.to_string()),
            DrugError::NotFound { entity, .. } => Self::error(format!("{} not found", entity)),
            DrugError::Conflict { message, .. } => Self::error(message.clone()),
            DrugError::Storage(inner) => {
                error!(error = %inner, "Drug operation failed in storage");
                Self::error(GENERIC_FAILURE)
            }
        }
    }
}

/// Add-drug form as submitted.
///
/// Supplying `quantity` asks for an initial stock batch; the three dates are
/// then required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugForm {
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

impl TryFrom<DrugForm> for NewDrug {
    type Error = DrugError;

    fn try_from(form: DrugForm) -> Result<Self, Self::Error> {
        let initial_stock = match form.quantity {
            Some(quantity) => Some(InitialStock {
                quantity,
                manufactured_date: required_date("manufactured_date", form.manufactured_date)?,
                received_date: required_date("received_date", form.received_date)?,
                expiry_date: required_date("expiry_date", form.expiry_date)?,
                remarks: non_blank(form.remarks),
            }),
            None => None,
        };

        Ok(NewDrug {
            name: form.drug_name,
            ingredient: form.ingredient,
            manufacturer: non_blank(form.manufacturer),
            quantity_type_id: form.quantity_type,
            initial_stock,
        })
    }
}

/// Edit-drug form. Absent fields keep their stored value; a blank
/// manufacturer clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugEditForm {
    pub drug_name: Option<String>,
    pub ingredient: Option<String>,
    pub manufacturer: Option<String>,
    pub quantity_type: Option<String>,
}

impl From<DrugEditForm> for DrugUpdate {
    fn from(form: DrugEditForm) -> Self {
        DrugUpdate {
            name: form.drug_name,
            ingredient: form.ingredient,
            manufacturer: form.manufacturer.map(|m| non_blank(Some(m))),
            quantity_type_id: form.quantity_type,
        }
    }
}

/// Parse a form date in `YYYY/MM/DD` or `YYYY-MM-DD`.
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    FORM_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn required_date(field: &'static str, value: Option<String>) -> DrugResult<NaiveDate> {
    let value = value.ok_or_else(|| DrugError::validation(field, "is required"))?;
    parse_form_date(&value)
        .ok_or_else(|| DrugError::validation(field, format!("{:?} is not a valid date", value)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
