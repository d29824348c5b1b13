//! Prescription operations.
//!
//! [`PrescriptionApi`] is the seam the dashboard views depend on; [`PrescriptionService`]
//! implements it over HTTP. Three operations have no backend route yet and fail straight
//! away with [`ApiError::NotImplemented`] without touching the network.

use crate::{ApiClient, ApiError, ApiResult};
use async_trait::async_trait;
use rx_core::constants::routes;
use rx_core::{
    ApiResponse, IssueRequest, MedicinesPage, Pagination, Patient, Prescription,
    PrescriptionReceipt,
};

#[async_trait]
pub trait PrescriptionApi: Send + Sync {
    /// `GET prescriptions/medicines`
    async fn get_medicines(&self) -> ApiResult<ApiResponse<MedicinesPage>>;

    /// `GET prescriptions/patient/mock`
    async fn get_mock_patient(&self) -> ApiResult<ApiResponse<Patient>>;

    /// `POST prescriptions/issue`
    async fn issue_prescription(
        &self,
        request: &IssueRequest,
    ) -> ApiResult<ApiResponse<PrescriptionReceipt>>;

    /// Older name for [`PrescriptionApi::issue_prescription`].
    async fn create_prescription(
        &self,
        request: &IssueRequest,
    ) -> ApiResult<ApiResponse<PrescriptionReceipt>> {
        self.issue_prescription(request).await
    }

    /// `GET prescriptions/{id}/status`
    async fn get_prescription_status(
        &self,
        id: &str,
    ) -> ApiResult<ApiResponse<PrescriptionReceipt>>;

    /// `GET prescriptions?limit=&skip=`
    async fn get_prescriptions(
        &self,
        page: Pagination,
    ) -> ApiResult<ApiResponse<Vec<Prescription>>>;

    async fn get_prescription_by_id(
        &self,
        _id: &str,
    ) -> ApiResult<ApiResponse<PrescriptionReceipt>> {
        Err(ApiError::NotImplemented("Get prescription by ID"))
    }

    async fn update_prescription_status(
        &self,
        _id: &str,
        _status: &str,
    ) -> ApiResult<ApiResponse<PrescriptionReceipt>> {
        Err(ApiError::NotImplemented("Update prescription status"))
    }

    async fn delete_prescription(&self, _id: &str) -> ApiResult<ApiResponse<()>> {
        Err(ApiError::NotImplemented("Delete prescription"))
    }
}

/// HTTP implementation of [`PrescriptionApi`].
#[derive(Debug, Clone)]
pub struct PrescriptionService {
    client: ApiClient,
}

impl PrescriptionService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl PrescriptionApi for PrescriptionService {
    async fn get_medicines(&self) -> ApiResult<ApiResponse<MedicinesPage>> {
        let url = self.client.endpoint(routes::MEDICINES)?;
        self.client.get(url).await
    }

    async fn get_mock_patient(&self) -> ApiResult<ApiResponse<Patient>> {
        let url = self.client.endpoint(routes::MOCK_PATIENT)?;
        self.client.get(url).await
    }

    async fn issue_prescription(
        &self,
        request: &IssueRequest,
    ) -> ApiResult<ApiResponse<PrescriptionReceipt>> {
        let url = self.client.endpoint(routes::ISSUE)?;
        tracing::info!(
            "issuing prescription of {} for {}",
            request.medication,
            request.patient_name
        );
        self.client.post(url, request).await
    }

    async fn get_prescription_status(
        &self,
        id: &str,
    ) -> ApiResult<ApiResponse<PrescriptionReceipt>> {
        let url = self
            .client
            .endpoint_with_segments(routes::PRESCRIPTIONS, &[id, "status"])?;
        self.client.get(url).await
    }

    async fn get_prescriptions(
        &self,
        page: Pagination,
    ) -> ApiResult<ApiResponse<Vec<Prescription>>> {
        let url = self.client.endpoint(routes::PRESCRIPTIONS)?;
        self.client.get_with_query(url, &page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthService;
    use rx_core::constants::TOKEN_KEY;
    use rx_core::{ClientConfig, DeliveryOption, LoginForm, SessionContext};
    use rx_storage::{Scope, Storage};
    use rx_stub::{StubConfig, StubServer};
    use rx_types::{MinText, NonEmptyText};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    struct Harness {
        _server: StubServer,
        session: SessionContext,
        service: PrescriptionService,
        auth: AuthService,
    }

    async fn harness() -> Harness {
        let server = rx_stub::spawn(StubConfig::default()).await.unwrap();
        let config = ClientConfig::new(
            &server.base_uri(),
            PathBuf::from("unused"),
            Duration::from_secs(5),
        )
        .unwrap();
        let session = SessionContext::new(Arc::new(Storage::in_memory()));
        let client = ApiClient::new(Arc::new(config), session.clone()).unwrap();
        Harness {
            _server: server,
            session,
            service: PrescriptionService::new(client.clone()),
            auth: AuthService::new(client),
        }
    }

    async fn signed_in() -> Harness {
        let h = harness().await;
        let defaults = StubConfig::default();
        h.auth
            .login(&LoginForm {
                email: defaults.email,
                password: defaults.password,
            })
            .await
            .unwrap();
        h
    }

    fn request(delivery_type: DeliveryOption) -> IssueRequest {
        IssueRequest {
            patient_name: MinText::new("John Doe").unwrap(),
            dob: NonEmptyText::new("1990-01-01").unwrap(),
            address: MinText::new("123 Main Street").unwrap(),
            medication: NonEmptyText::new("Paracetamol 500mg").unwrap(),
            dosage: NonEmptyText::new("1 tablet daily").unwrap(),
            delivery_type,
        }
    }

    #[tokio::test]
    async fn requests_without_token_are_unauthorized() {
        let h = harness().await;
        let err = h.service.get_medicines().await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn stale_token_is_unauthorized() {
        let h = harness().await;
        h.session
            .storage()
            .set(Scope::Persistent, TOKEN_KEY, "revoked")
            .unwrap();
        let err = h
            .service
            .get_prescriptions(Pagination::default())
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn lists_medicines_and_patient() {
        let h = signed_in().await;

        let meds = h.service.get_medicines().await.unwrap().into_success().unwrap();
        assert!(!meds.meds.is_empty());
        assert_eq!(meds.total, meds.meds.len() as u64);
        let names: Vec<&str> = meds.meds.iter().map(|m| m.display_name.as_str()).collect();
        assert!(names.contains(&"Paracetamol 500mg"));

        let patient = h
            .service
            .get_mock_patient()
            .await
            .unwrap()
            .into_success()
            .unwrap();
        assert!(!patient.full_name().is_empty());
    }

    #[tokio::test]
    async fn issue_then_list_and_poll_status() {
        let h = signed_in().await;

        let receipt = h
            .service
            .issue_prescription(&request(DeliveryOption::PickupFromPharmacy))
            .await
            .unwrap()
            .into_success()
            .unwrap();
        assert_eq!(receipt.status, "Pending");
        assert!(!receipt.prescription_id.is_empty());

        let status = h
            .service
            .get_prescription_status(&receipt.id)
            .await
            .unwrap()
            .into_success()
            .unwrap();
        assert_eq!(status.prescription_id, receipt.prescription_id);

        let list = h
            .service
            .get_prescriptions(Pagination::default())
            .await
            .unwrap()
            .into_success()
            .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].delivery_type, "pickup");
        assert_eq!(list[0].patient_name, "John Doe");
    }

    #[tokio::test]
    async fn create_is_an_alias_of_issue() {
        let h = signed_in().await;
        let res = h
            .service
            .create_prescription(&request(DeliveryOption::HomeDelivery))
            .await
            .unwrap();
        assert!(res.success);

        let list = h
            .service
            .get_prescriptions(Pagination::default())
            .await
            .unwrap()
            .into_success()
            .unwrap();
        assert_eq!(list[0].delivery_type, "delivery");
    }

    #[tokio::test]
    async fn pagination_is_forwarded() {
        let h = signed_in().await;
        for _ in 0..3 {
            h.service
                .issue_prescription(&request(DeliveryOption::ExpressDelivery))
                .await
                .unwrap();
        }

        let page = h
            .service
            .get_prescriptions(Pagination::new(2, 0))
            .await
            .unwrap()
            .into_success()
            .unwrap();
        assert_eq!(page.len(), 2);

        let rest = h
            .service
            .get_prescriptions(Pagination::new(2, 2))
            .await
            .unwrap()
            .into_success()
            .unwrap();
        assert_eq!(rest.len(), 1);
    }

    #[tokio::test]
    async fn unknown_prescription_status_is_not_found() {
        let h = signed_in().await;
        match h.service.get_prescription_status("missing/../id").await {
            Err(ApiError::Status { status, .. }) => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND)
            }
            other => panic!("expected 404, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unimplemented_operations_fail_without_network() {
        // nothing listens here
        let config = ClientConfig::new(
            "http://127.0.0.1:9/",
            PathBuf::from("unused"),
            Duration::from_secs(1),
        )
        .unwrap();
        let session = SessionContext::new(Arc::new(Storage::in_memory()));
        let service =
            PrescriptionService::new(ApiClient::new(Arc::new(config), session).unwrap());

        let err = service.get_prescription_by_id("1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Get prescription by ID endpoint not implemented"
        );
        let err = service
            .update_prescription_status("1", "approved")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Update prescription status endpoint not implemented"
        );
        let err = service.delete_prescription("1").await.unwrap_err();
        assert_eq!(err.to_string(), "Delete prescription endpoint not implemented");
        assert!(!err.is_retryable());
    }
}
