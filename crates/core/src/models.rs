//! Wire models exchanged with the prescription backend.
//!
//! Field names follow the backend's JSON exactly (snake_case for records, camelCase for
//! medicines and the issue request). Status and delivery codes stay as raw strings on
//! records so that unknown codes survive deserialisation and fall through the mapper's
//! default rules instead of failing the whole list.

use crate::delivery::DeliveryOption;
use rx_types::{MinText, NonEmptyText};
use serde::{Deserialize, Serialize};

/// Response envelope shared by every backend route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
        }
    }

    /// The payload, only when the backend reported success and sent one.
    pub fn into_success(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

/// A medicine the prescriber can pick.
///
/// Only `snomed_id` and `display_name` are interpreted; the remaining flags are carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub snomed_id: String,
    pub display_name: String,
    #[serde(default)]
    pub unlicensed: bool,
    #[serde(default)]
    pub endorsements: serde_json::Value,
    #[serde(default)]
    pub prescribe_by_brand_only: bool,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub bnf_exact_match: serde_json::Value,
    #[serde(default)]
    pub bnf_matches: serde_json::Value,
    #[serde(default)]
    pub appliance_types: Vec<serde_json::Value>,
}

impl Medicine {
    /// A virtual medicinal product entry with empty metadata.
    pub fn vmp(snomed_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            snomed_id: snomed_id.into(),
            display_name: display_name.into(),
            unlicensed: false,
            endorsements: serde_json::Value::Object(Default::default()),
            prescribe_by_brand_only: false,
            kind: "vmp".into(),
            bnf_exact_match: serde_json::Value::Null,
            bnf_matches: serde_json::Value::Null,
            appliance_types: Vec::new(),
        }
    }

    /// Static list offered when the medicine catalogue cannot be fetched.
    pub fn fallback_list() -> Vec<Medicine> {
        vec![
            Medicine::vmp("1", "Paracetamol 500mg"),
            Medicine::vmp("2", "Ibuprofen 400mg"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicinesPage {
    pub meds: Vec<Medicine>,
    #[serde(default)]
    pub total: u64,
}

/// Sample patient served by the backend for form prefill during testing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patient {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub birth_day: String,
    pub birth_month: String,
    pub birth_year: String,
    pub address_ln1: String,
    pub address_ln2: String,
    pub city: String,
    pub post_code: String,
    pub country: String,
    pub client_ref_id: String,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// `YYYY-MM-DD` if all birth parts are present.
    pub fn birth_date(&self) -> Option<String> {
        let (y, m, d) = (
            self.birth_year.trim(),
            self.birth_month.trim(),
            self.birth_day.trim(),
        );
        if y.is_empty() || m.is_empty() || d.is_empty() {
            return None;
        }
        Some(format!("{y:0>4}-{m:0>2}-{d:0>2}"))
    }

    /// Address lines, city, post code and country joined with commas, skipping blanks.
    pub fn single_line_address(&self) -> String {
        [
            &self.address_ln1,
            &self.address_ln2,
            &self.city,
            &self.post_code,
            &self.country,
        ]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A prescription record as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub prescription_id: String,
    #[serde(rename = "signatureRx_id", default)]
    pub signature_rx_id: String,
    pub patient_name: String,
    pub patient_dob: String,
    pub patient_address: String,
    pub medication: String,
    pub dosage: String,
    /// Raw backend code, `pickup` or `delivery`.
    pub delivery_type: String,
    /// Raw backend code, `Pending`, `Sent`, `Delivered` or `Failed`.
    pub status: String,
    #[serde(default)]
    pub prescription_url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Result of issuing a prescription or polling its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionReceipt {
    pub id: String,
    pub prescription_id: String,
    #[serde(
        rename = "signatureRx_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub signature_rx_id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub prescription_url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated payload for `POST prescriptions/issue`.
///
/// Built by [`crate::validate_issue_form`]; deserialising one re-applies the length rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub patient_name: MinText<2>,
    pub dob: NonEmptyText,
    pub address: MinText<10>,
    pub medication: NonEmptyText,
    pub dosage: NonEmptyText,
    pub delivery_type: DeliveryOption,
}

/// Query parameters for the prescription list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub skip: u32,
}

impl Pagination {
    pub fn new(limit: u32, skip: u32) -> Self {
        Self { limit, skip }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: crate::constants::DEFAULT_PAGE_LIMIT,
            skip: 0,
        }
    }
}

/// Profile of the signed-in user, shown in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
}

/// Payload for `POST auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: UserProfile,
}
