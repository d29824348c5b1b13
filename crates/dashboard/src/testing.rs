//! Test doubles shared by the view tests.

use crate::lock;
use crate::{AppShell, Navigator, Notice, NoticeLevel, Notifier, Route};
use async_trait::async_trait;
use rx_api::{ApiError, ApiResult, PrescriptionApi};
use rx_core::{
    ApiResponse, IssueRequest, MedicinesPage, Pagination, Patient, Prescription,
    PrescriptionReceipt, SessionContext,
};
use rx_storage::Storage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Canned reply for one mock operation.
#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Ok(ApiResponse<T>),
    Unauthorized,
    Unavailable,
}

impl<T: Clone> Reply<T> {
    fn produce(&self) -> ApiResult<ApiResponse<T>> {
        match self {
            Reply::Ok(response) => Ok(response.clone()),
            Reply::Unauthorized => Err(ApiError::Unauthorized("Invalid or expired token".into())),
            Reply::Unavailable => Err(ApiError::Status {
                url: "http://backend.test/api/v1/".into(),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "down".into(),
            }),
        }
    }
}

pub(crate) struct MockApi {
    pub medicines: Mutex<Reply<MedicinesPage>>,
    pub issue: Mutex<Reply<PrescriptionReceipt>>,
    pub list: Mutex<Reply<Vec<Prescription>>>,
    pub patient: Mutex<Reply<Patient>>,
    pub issue_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub issued: Mutex<Vec<IssueRequest>>,
    pub last_page: Mutex<Option<Pagination>>,
    /// When set, the next list call waits for this before answering.
    pub list_gate: Mutex<Option<Arc<Notify>>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            medicines: Mutex::new(Reply::Ok(ApiResponse::ok(
                MedicinesPage {
                    meds: rx_core::Medicine::fallback_list(),
                    total: 2,
                },
                "",
            ))),
            issue: Mutex::new(Reply::Ok(ApiResponse::ok(receipt("RX123"), ""))),
            list: Mutex::new(Reply::Ok(ApiResponse::ok(Vec::new(), ""))),
            patient: Mutex::new(Reply::Ok(ApiResponse::ok(Patient::default(), ""))),
            issue_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            issued: Mutex::new(Vec::new()),
            last_page: Mutex::new(None),
            list_gate: Mutex::new(None),
        }
    }
}

#[async_trait]
impl PrescriptionApi for MockApi {
    async fn get_medicines(&self) -> ApiResult<ApiResponse<MedicinesPage>> {
        let reply = lock(&self.medicines).clone();
        reply.produce()
    }

    async fn get_mock_patient(&self) -> ApiResult<ApiResponse<Patient>> {
        let reply = lock(&self.patient).clone();
        reply.produce()
    }

    async fn issue_prescription(
        &self,
        request: &IssueRequest,
    ) -> ApiResult<ApiResponse<PrescriptionReceipt>> {
        self.issue_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.issued).push(request.clone());
        // lets a concurrent caller run while this one is in flight
        tokio::task::yield_now().await;
        let reply = lock(&self.issue).clone();
        reply.produce()
    }

    async fn get_prescription_status(
        &self,
        id: &str,
    ) -> ApiResult<ApiResponse<PrescriptionReceipt>> {
        Ok(ApiResponse::ok(receipt(id), ""))
    }

    async fn get_prescriptions(
        &self,
        page: Pagination,
    ) -> ApiResult<ApiResponse<Vec<Prescription>>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_page) = Some(page);
        let gate = lock(&self.list_gate).take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let reply = lock(&self.list).clone();
        reply.produce()
    }
}

pub(crate) fn receipt(prescription_id: &str) -> PrescriptionReceipt {
    PrescriptionReceipt {
        id: format!("id-{prescription_id}"),
        prescription_id: prescription_id.into(),
        signature_rx_id: None,
        status: "Pending".into(),
        prescription_url: String::new(),
        created_at: "2024-01-05T10:30:00Z".into(),
        updated_at: "2024-01-05T10:30:00Z".into(),
    }
}

pub(crate) fn record(prescription_id: &str, status: &str, delivery_type: &str) -> Prescription {
    Prescription {
        id: format!("id-{prescription_id}"),
        prescription_id: prescription_id.into(),
        signature_rx_id: String::new(),
        patient_name: "John Doe".into(),
        patient_dob: "1990-01-01".into(),
        patient_address: "123 Main Street".into(),
        medication: "Paracetamol 500mg".into(),
        dosage: "1 tablet daily".into(),
        delivery_type: delivery_type.into(),
        status: status.into(),
        prescription_url: String::new(),
        created_at: "2024-01-05T10:30:00Z".into(),
        updated_at: "2024-01-05T10:30:00Z".into(),
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    pub routes: Mutex<Vec<Route>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        lock(&self.routes).push(route);
    }
}

impl RecordingNavigator {
    pub fn taken(&self) -> Vec<Route> {
        lock(&self.routes).clone()
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        lock(&self.notices).push(notice);
    }
}

impl RecordingNotifier {
    pub fn messages(&self, level: NoticeLevel) -> Vec<String> {
        lock(&self.notices)
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }
}

pub(crate) struct Fixture {
    pub shell: AppShell,
    pub session: SessionContext,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

pub(crate) fn fixture() -> Fixture {
    let session = SessionContext::new(Arc::new(Storage::in_memory()));
    let navigator = Arc::new(RecordingNavigator::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let shell = AppShell::new(session.clone(), navigator.clone(), notifier.clone());
    Fixture {
        shell,
        session,
        navigator,
        notifier,
    }
}
