//! Issue-prescription form.
//!
//! Holds the draft as typed, the medicine picker and the field errors from the last
//! submission attempt. A submission validates the whole draft first; only a valid draft
//! reaches the backend, and only one submission may be in flight at a time.

use crate::{lock, AppShell, Notice};
use rx_api::{ApiError, ApiResult, PrescriptionApi};
use rx_core::{
    validate_issue_form, DeliveryOption, Field, IssueForm, Medicine, Patient,
    PrescriptionReceipt, ValidationErrors,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const LOADING_MEDICINES_LABEL: &str = "Loading medicines...";
pub const SELECT_MEDICATION_LABEL: &str = "Select medication";
pub const MEDICINES_FALLBACK_MESSAGE: &str = "Failed to load medicines. Using default list.";
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit prescription. Please try again.";
pub const SUBMIT_LABEL: &str = "Submit Prescription";
pub const SUBMITTING_LABEL: &str = "Submitting...";

pub fn submitted_message(prescription_id: &str) -> String {
    format!("Prescription {prescription_id} submitted successfully!")
}

/// Result of one [`PrescriptionForm::submit`] call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The draft failed validation; nothing was sent.
    Invalid(ValidationErrors),
    Submitted(PrescriptionReceipt),
    /// The backend answered with `success: false`.
    Rejected(String),
    Failed(ApiError),
    /// Another submission is still in flight; nothing was sent.
    Busy,
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}

pub struct PrescriptionForm<A: ?Sized> {
    api: Arc<A>,
    shell: AppShell,
    draft: Mutex<IssueForm>,
    errors: Mutex<ValidationErrors>,
    medicines: Mutex<Vec<Medicine>>,
    loading_medicines: AtomicBool,
    submitting: AtomicBool,
}

// clears the in-flight flag even if the submission future is dropped
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A: PrescriptionApi + ?Sized> PrescriptionForm<A> {
    /// A blank form. The picker reports loading until [`Self::load_medicines`] finishes.
    pub fn new(api: Arc<A>, shell: AppShell) -> Self {
        Self {
            api,
            shell,
            draft: Mutex::new(IssueForm::default()),
            errors: Mutex::new(ValidationErrors::default()),
            medicines: Mutex::new(Vec::new()),
            loading_medicines: AtomicBool::new(true),
            submitting: AtomicBool::new(false),
        }
    }

    /// Fetch the medicine catalogue for the picker.
    ///
    /// If the request fails, or the backend answers `success: false`, the fixed fallback
    /// list is used instead and the user is told so.
    pub async fn load_medicines(&self) {
        self.loading_medicines.store(true, Ordering::Release);

        let page = match self.shell.guard(self.api.get_medicines().await) {
            Ok(response) => {
                let message = response.message.clone();
                let page = response.into_success();
                if page.is_none() {
                    tracing::warn!("medicine catalogue unavailable: {}", message);
                }
                page
            }
            Err(e) => {
                tracing::warn!("failed to load medicines: {}", e);
                None
            }
        };

        match page {
            Some(page) => {
                tracing::debug!("loaded {} medicines", page.meds.len());
                *lock(&self.medicines) = page.meds;
            }
            None => {
                *lock(&self.medicines) = Medicine::fallback_list();
                self.shell.notify(Notice::error(MEDICINES_FALLBACK_MESSAGE));
            }
        }

        self.loading_medicines.store(false, Ordering::Release);
    }

    pub fn medicines(&self) -> Vec<Medicine> {
        lock(&self.medicines).clone()
    }

    pub fn is_medication_disabled(&self) -> bool {
        self.loading_medicines.load(Ordering::Acquire)
    }

    /// Placeholder entry of the medication picker.
    pub fn medication_placeholder(&self) -> &'static str {
        if self.is_medication_disabled() {
            LOADING_MEDICINES_LABEL
        } else {
            SELECT_MEDICATION_LABEL
        }
    }

    pub fn delivery_options(&self) -> [DeliveryOption; 3] {
        DeliveryOption::ALL
    }

    pub fn draft(&self) -> IssueForm {
        lock(&self.draft).clone()
    }

    pub fn set_draft(&self, draft: IssueForm) {
        *lock(&self.draft) = draft;
    }

    pub fn edit(&self, f: impl FnOnce(&mut IssueForm)) {
        f(&mut *lock(&self.draft));
    }

    /// Field errors from the last submission attempt.
    pub fn errors(&self) -> ValidationErrors {
        lock(&self.errors).clone()
    }

    pub fn error_for(&self, field: Field) -> Option<&'static str> {
        lock(&self.errors).get(field)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    /// Fill the patient fields from the backend's sample patient.
    pub async fn prefill_sample_patient(&self) -> ApiResult<Patient> {
        let response = self.shell.guard(self.api.get_mock_patient().await)?;
        let message = response.message.clone();
        let patient = response
            .into_success()
            .ok_or(ApiError::Rejected(message))?;

        self.edit(|draft| {
            draft.patient_name = patient.full_name();
            draft.dob = patient.birth_date().unwrap_or_default();
            draft.address = patient.single_line_address();
        });
        Ok(patient)
    }

    /// Validate the draft and, if valid, issue it.
    ///
    /// On success the draft is cleared; on any failure it is kept for another attempt.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("submission already in flight");
            return SubmitOutcome::Busy;
        }
        let _in_flight = InFlight(&self.submitting);

        let draft = self.draft();
        let medicines = self.medicines();
        let request = match validate_issue_form(&draft, &medicines) {
            Ok(request) => {
                *lock(&self.errors) = ValidationErrors::default();
                request
            }
            Err(errors) => {
                *lock(&self.errors) = errors.clone();
                return SubmitOutcome::Invalid(errors);
            }
        };

        match self.shell.guard(self.api.issue_prescription(&request).await) {
            Ok(response) => {
                let message = response.message.clone();
                match response.into_success() {
                    Some(receipt) => {
                        *lock(&self.draft) = IssueForm::default();
                        self.shell
                            .notify(Notice::success(submitted_message(&receipt.prescription_id)));
                        SubmitOutcome::Submitted(receipt)
                    }
                    None => {
                        tracing::warn!("prescription rejected: {}", message);
                        self.shell.notify(Notice::error(SUBMIT_FAILED_MESSAGE));
                        SubmitOutcome::Rejected(message)
                    }
                }
            }
            Err(e) => {
                tracing::warn!("failed to submit prescription: {}", e);
                self.shell.notify(Notice::error(SUBMIT_FAILED_MESSAGE));
                SubmitOutcome::Failed(e)
            }
        }
    }
}
