//! In-memory backend state.

use crate::auth::issue_token;
use rx_core::{
    DeliveryOption, IssueRequest, LoginData, LoginRequest, Medicine, MedicinesPage, Patient,
    Prescription, PrescriptionReceipt, UserProfile,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Stub backend settings.
#[derive(Debug, Clone)]
pub struct StubConfig {
    /// The one account that can sign in.
    pub email: String,
    pub password: String,
    pub user: UserProfile,
    pub token_ttl: chrono::Duration,
    /// Start with a few historical records instead of an empty list.
    pub seed_records: bool,
}

pub const DEFAULT_STUB_EMAIL: &str = "doctor@clinic.example";
pub const DEFAULT_STUB_PASSWORD: &str = "password123";

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            email: DEFAULT_STUB_EMAIL.into(),
            password: DEFAULT_STUB_PASSWORD.into(),
            user: UserProfile {
                id: 1,
                name: "Dr. Sarah Johnson".into(),
                email: DEFAULT_STUB_EMAIL.into(),
                role: "Prescriber".into(),
                department: "General Practice".into(),
            },
            token_ttl: chrono::Duration::hours(8),
            seed_records: false,
        }
    }
}

impl StubConfig {
    /// Override the account credentials; blank values keep the defaults.
    pub fn from_env_values(email: Option<String>, password: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(email) = email.filter(|v| !v.trim().is_empty()) {
            config.email = email.trim().to_string();
            config.user.email = config.email.clone();
        }
        if let Some(password) = password.filter(|v| !v.is_empty()) {
            config.password = password;
        }
        config
    }
}

#[derive(Debug, Default)]
struct Records {
    tokens: HashSet<String>,
    // oldest first
    prescriptions: Vec<Prescription>,
    issued: u32,
}

/// Shared handler state. Cloning shares the same records.
#[derive(Debug, Clone)]
pub struct StubState {
    config: Arc<StubConfig>,
    records: Arc<Mutex<Records>>,
}

impl StubState {
    pub fn new(config: StubConfig) -> Self {
        let mut records = Records::default();
        if config.seed_records {
            records.prescriptions = seed_prescriptions();
            records.issued = records.prescriptions.len() as u32;
        }
        Self {
            config: Arc::new(config),
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub fn config(&self) -> &StubConfig {
        &self.config
    }

    fn records(&self) -> MutexGuard<'_, Records> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Check credentials and mint a token.
    pub fn login(&self, request: &LoginRequest) -> Option<LoginData> {
        if !request.email.eq_ignore_ascii_case(&self.config.email)
            || request.password != self.config.password
        {
            return None;
        }
        let token = issue_token(&self.config.user, self.config.token_ttl);
        self.records().tokens.insert(token.clone());
        Some(LoginData {
            token,
            user: self.config.user.clone(),
        })
    }

    pub fn is_known_token(&self, token: &str) -> bool {
        self.records().tokens.contains(token)
    }

    /// Forget a token so later requests carrying it are refused.
    pub fn revoke(&self, token: &str) -> bool {
        self.records().tokens.remove(token)
    }

    pub fn medicines(&self) -> MedicinesPage {
        let meds = vec![
            Medicine::vmp("322236009", "Paracetamol 500mg"),
            Medicine::vmp("329652003", "Ibuprofen 400mg"),
            Medicine::vmp("323509004", "Amoxicillin 500mg"),
            Medicine::vmp("317335002", "Omeprazole 20mg"),
            Medicine::vmp("318135005", "Amlodipine 5mg"),
        ];
        MedicinesPage {
            total: meds.len() as u64,
            meds,
        }
    }

    pub fn mock_patient(&self) -> Patient {
        Patient {
            first_name: "John".into(),
            last_name: "Smith".into(),
            gender: "male".into(),
            email: "john.smith@example.com".into(),
            phone: "07700900123".into(),
            birth_day: "15".into(),
            birth_month: "6".into(),
            birth_year: "1980".into(),
            address_ln1: "221B Baker Street".into(),
            address_ln2: String::new(),
            city: "London".into(),
            post_code: "NW1 6XE".into(),
            country: "GB".into(),
            client_ref_id: "CLIENT-001".into(),
        }
    }

    /// Record a new prescription in `Pending` state.
    pub fn issue(&self, request: &IssueRequest) -> PrescriptionReceipt {
        let mut records = self.records();
        records.issued += 1;

        let now = chrono::Utc::now().to_rfc3339();
        let prescription_id = format!("RX{:06}", records.issued);
        let record = Prescription {
            id: uuid::Uuid::new_v4().simple().to_string(),
            prescription_url: format!("/files/{prescription_id}.pdf"),
            prescription_id,
            signature_rx_id: format!("SIG-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]),
            patient_name: request.patient_name.to_string(),
            patient_dob: request.dob.to_string(),
            patient_address: request.address.to_string(),
            medication: request.medication.to_string(),
            dosage: request.dosage.to_string(),
            delivery_type: delivery_code(request.delivery_type).into(),
            status: "Pending".into(),
            created_at: now.clone(),
            updated_at: now,
        };
        tracing::info!(
            "issued {} ({}) for {}",
            record.prescription_id,
            record.medication,
            record.patient_name
        );

        let receipt = receipt_for(&record);
        records.prescriptions.push(record);
        receipt
    }

    /// Look a record up by internal id or external prescription id.
    pub fn status(&self, id: &str) -> Option<PrescriptionReceipt> {
        self.records()
            .prescriptions
            .iter()
            .find(|p| p.id == id || p.prescription_id == id)
            .map(receipt_for)
    }

    /// Newest first.
    pub fn list(&self, limit: usize, skip: usize) -> Vec<Prescription> {
        self.records()
            .prescriptions
            .iter()
            .rev()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }
}

/// The backend keeps only two delivery codes.
fn delivery_code(option: DeliveryOption) -> &'static str {
    match option {
        DeliveryOption::PickupFromPharmacy => "pickup",
        DeliveryOption::HomeDelivery | DeliveryOption::ExpressDelivery => "delivery",
    }
}

fn receipt_for(record: &Prescription) -> PrescriptionReceipt {
    PrescriptionReceipt {
        id: record.id.clone(),
        prescription_id: record.prescription_id.clone(),
        signature_rx_id: Some(record.signature_rx_id.clone()),
        status: record.status.clone(),
        prescription_url: record.prescription_url.clone(),
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
    }
}

fn seed_prescriptions() -> Vec<Prescription> {
    let seed = |n: u32, patient: &str, medication: &str, delivery: &str, status: &str, at: &str| {
        Prescription {
            id: format!("seed{n:04}"),
            prescription_id: format!("RX{n:06}"),
            signature_rx_id: format!("SIG-SEED{n}"),
            patient_name: patient.into(),
            patient_dob: "1975-04-12".into(),
            patient_address: "14 Station Road, Leeds, LS1 4AP".into(),
            medication: medication.into(),
            dosage: "1 tablet twice daily".into(),
            delivery_type: delivery.into(),
            status: status.into(),
            prescription_url: format!("/files/RX{n:06}.pdf"),
            created_at: at.into(),
            updated_at: at.into(),
        }
    };
    vec![
        seed(1, "Margaret Hale", "Amlodipine 5mg", "pickup", "Delivered", "2024-01-05T10:30:00Z"),
        seed(2, "Thomas Thornton", "Omeprazole 20mg", "delivery", "Sent", "2024-01-08T14:05:00Z"),
        seed(3, "Bessy Higgins", "Amoxicillin 500mg", "courier", "Failed", "2024-01-09T09:15:00Z"),
    ]
}
