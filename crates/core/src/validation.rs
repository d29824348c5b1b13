//! Form schema validation.
//!
//! Forms are held as raw text exactly as typed. Validation checks every field in one pass
//! and either produces the typed request or the full list of field errors, so the form can
//! show all problems at once. Inputs are trimmed before length checks.

use crate::delivery::DeliveryOption;
use crate::models::{IssueRequest, LoginRequest, Medicine};
use rx_types::{MinText, NonEmptyText};
use serde::{Deserialize, Serialize};

/// Form fields that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    PatientName,
    Dob,
    Address,
    Medication,
    Dosage,
    DeliveryType,
    Email,
    Password,
}

impl Field {
    /// Field name as used in the wire payload.
    pub fn name(self) -> &'static str {
        match self {
            Field::PatientName => "patientName",
            Field::Dob => "dob",
            Field::Address => "address",
            Field::Medication => "medication",
            Field::Dosage => "dosage",
            Field::DeliveryType => "deliveryType",
            Field::Email => "email",
            Field::Password => "password",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// All field errors from one validation pass, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: Field, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

pub const PATIENT_NAME_MESSAGE: &str = "Patient name must be at least 2 characters";
pub const DOB_MESSAGE: &str = "Date of birth is required";
pub const ADDRESS_MESSAGE: &str = "Address must be at least 10 characters";
pub const MEDICATION_MESSAGE: &str = "Select a medication";
pub const DOSAGE_MESSAGE: &str = "Dosage is required";
pub const DELIVERY_TYPE_MESSAGE: &str = "Select a delivery type";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PASSWORD_MESSAGE: &str = "Password must be at least 6 characters";

/// Raw issue-prescription form as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueForm {
    pub patient_name: String,
    pub dob: String,
    pub address: String,
    pub medication: String,
    pub dosage: String,
    pub delivery_type: String,
}

impl IssueForm {
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

/// Validate the issue form against its schema.
///
/// `medicines` is the list currently offered in the medication picker; the chosen
/// medication must match one of its display names.
pub fn validate_issue_form(
    form: &IssueForm,
    medicines: &[Medicine],
) -> Result<IssueRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let patient_name = MinText::<2>::new(&form.patient_name)
        .map_err(|_| errors.push(Field::PatientName, PATIENT_NAME_MESSAGE))
        .ok();

    let dob = NonEmptyText::new(&form.dob)
        .map_err(|_| errors.push(Field::Dob, DOB_MESSAGE))
        .ok();

    let address = MinText::<10>::new(&form.address)
        .map_err(|_| errors.push(Field::Address, ADDRESS_MESSAGE))
        .ok();

    let medication = NonEmptyText::new(&form.medication)
        .ok()
        .filter(|m| medicines.iter().any(|med| med.display_name == m.as_str()));
    if medication.is_none() {
        errors.push(Field::Medication, MEDICATION_MESSAGE);
    }

    let dosage = NonEmptyText::new(&form.dosage)
        .map_err(|_| errors.push(Field::Dosage, DOSAGE_MESSAGE))
        .ok();

    let delivery_type = form
        .delivery_type
        .trim()
        .parse::<DeliveryOption>()
        .map_err(|_| errors.push(Field::DeliveryType, DELIVERY_TYPE_MESSAGE))
        .ok();

    match (patient_name, dob, address, medication, dosage, delivery_type) {
        (
            Some(patient_name),
            Some(dob),
            Some(address),
            Some(medication),
            Some(dosage),
            Some(delivery_type),
        ) if errors.is_empty() => Ok(IssueRequest {
            patient_name,
            dob,
            address,
            medication,
            dosage,
            delivery_type,
        }),
        _ => Err(errors),
    }
}

/// Raw login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Validate the login form. The password is not trimmed.
pub fn validate_login(form: &LoginForm) -> Result<LoginRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let email = form.email.trim();
    if !looks_like_email(email) {
        errors.push(Field::Email, EMAIL_MESSAGE);
    }
    if form.password.chars().count() < 6 {
        errors.push(Field::Password, PASSWORD_MESSAGE);
    }

    if errors.is_empty() {
        Ok(LoginRequest {
            email: email.to_string(),
            password: form.password.clone(),
        })
    } else {
        Err(errors)
    }
}

// local@domain.tld, no whitespace, one '@'
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
