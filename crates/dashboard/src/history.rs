//! Prescription history table.

use crate::{lock, AppShell};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rx_api::PrescriptionApi;
use rx_core::constants::HISTORY_PAGE_LIMIT;
use rx_core::{
    map_backend_to_display_status, map_delivery_type_for_display, DisplayStatus, Pagination,
    Prescription, StatusBadge,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};

pub const FETCH_REJECTED_MESSAGE: &str = "Failed to fetch prescriptions";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch prescriptions. Please try again.";
pub const RETRY_LABEL: &str = "Try Again";
pub const EMPTY_MESSAGE: &str = "Prescriptions will appear here once they are created.";
pub const REFRESH_LABEL: &str = "Refresh";
pub const REFRESHING_LABEL: &str = "Refreshing...";

const CREATED_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

/// One prescription, mapped to display vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub id: String,
    pub prescription_id: String,
    pub patient_name: String,
    pub patient_dob: String,
    pub medication: String,
    pub dosage: String,
    pub delivery: String,
    pub status: DisplayStatus,
    pub created: String,
}

impl HistoryRow {
    pub fn badge(&self) -> StatusBadge {
        self.status.badge()
    }
}

impl From<&Prescription> for HistoryRow {
    fn from(record: &Prescription) -> Self {
        Self {
            id: record.id.clone(),
            prescription_id: record.prescription_id.clone(),
            patient_name: record.patient_name.clone(),
            patient_dob: format_dob(&record.patient_dob),
            medication: record.medication.clone(),
            dosage: record.dosage.clone(),
            delivery: map_delivery_type_for_display(&record.delivery_type).into_owned(),
            status: map_backend_to_display_status(&record.status),
            created: format_created(&record.created_at),
        }
    }
}

/// What the table area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    Loading,
    Failed {
        message: String,
        retry_label: &'static str,
    },
    Empty,
    Rows(Vec<HistoryRow>),
}

#[derive(Debug)]
struct HistoryState {
    records: Vec<Prescription>,
    /// Fetches started but not yet resolved.
    in_flight: usize,
    requested: bool,
    error: Option<String>,
    last_updated: Option<DateTime<Utc>>,
}

impl HistoryState {
    fn is_loading(&self) -> bool {
        !self.requested || self.in_flight > 0
    }
}

// settles one fetch even if the refresh future is dropped
struct Pending<'a>(&'a Mutex<HistoryState>);

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.0);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

pub struct PrescriptionHistory<A: ?Sized> {
    api: Arc<A>,
    shell: AppShell,
    state: Mutex<HistoryState>,
}

impl<A: PrescriptionApi + ?Sized> PrescriptionHistory<A> {
    /// An unfetched table; it reports loading until the first [`Self::refresh`].
    pub fn new(api: Arc<A>, shell: AppShell) -> Self {
        Self {
            api,
            shell,
            state: Mutex::new(HistoryState {
                records: Vec::new(),
                in_flight: 0,
                requested: false,
                error: None,
                last_updated: None,
            }),
        }
    }

    /// Fetch the first page of prescriptions.
    ///
    /// A successful response replaces the rows. A failure sets the error and leaves the
    /// previous rows in place. When calls overlap, whichever resolves last wins, and the
    /// table keeps loading until every call has resolved.
    pub async fn refresh(&self) {
        {
            let mut state = lock(&self.state);
            state.requested = true;
            state.in_flight += 1;
            state.error = None;
        }
        let _pending = Pending(&self.state);

        let result = self
            .shell
            .guard(
                self.api
                    .get_prescriptions(Pagination::new(HISTORY_PAGE_LIMIT, 0))
                    .await,
            );

        let mut state = lock(&self.state);
        match result {
            Ok(response) => match response.into_success() {
                Some(records) => {
                    tracing::debug!("fetched {} prescriptions", records.len());
                    state.records = records;
                    state.last_updated = Some(Utc::now());
                }
                None => state.error = Some(FETCH_REJECTED_MESSAGE.to_string()),
            },
            Err(e) => {
                tracing::warn!("failed to fetch prescriptions: {}", e);
                state.error = Some(FETCH_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// The "Try Again" action.
    pub async fn retry(&self) {
        self.refresh().await;
    }

    pub fn view(&self) -> HistoryView {
        let state = lock(&self.state);
        if let Some(message) = &state.error {
            return HistoryView::Failed {
                message: message.clone(),
                retry_label: RETRY_LABEL,
            };
        }
        if !state.records.is_empty() {
            return HistoryView::Rows(state.records.iter().map(HistoryRow::from).collect());
        }
        if state.is_loading() {
            HistoryView::Loading
        } else {
            HistoryView::Empty
        }
    }

    /// Rows from the last successful fetch, even while an error is shown.
    pub fn rows(&self) -> Vec<HistoryRow> {
        lock(&self.state)
            .records
            .iter()
            .map(HistoryRow::from)
            .collect()
    }

    pub fn records(&self) -> Vec<Prescription> {
        lock(&self.state).records.clone()
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        lock(&self.state).last_updated
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).is_loading()
    }

    pub fn refresh_label(&self) -> &'static str {
        if self.is_loading() {
            REFRESHING_LABEL
        } else {
            REFRESH_LABEL
        }
    }
}

/// `2024-01-05T10:30:00Z` → `Jan 5, 2024, 10:30 AM`, in the timestamp's own offset.
/// Timestamps that do not parse are returned unchanged.
pub fn format_created(raw: &str) -> String {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return at.format(CREATED_FORMAT).to_string();
    }
    if let Ok(at) = raw.parse::<NaiveDateTime>() {
        return at.format(CREATED_FORMAT).to_string();
    }
    raw.to_string()
}

/// `1990-01-31` → `1/31/1990`. Other shapes are returned unchanged.
pub fn format_dob(raw: &str) -> String {
    raw.get(..10)
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}
