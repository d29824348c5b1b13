//! # RX Core
//!
//! Core client-side logic for the prescription dashboard.
//!
//! This crate contains pure data and rules, with no HTTP or UI concerns:
//! - Wire models for prescriptions, medicines, patients and the response envelope
//! - Backend ↔ display vocabulary mapping for statuses and delivery types
//! - Schema validation for the issue-prescription and login forms
//! - The session context holding the credential and user profile
//! - Startup configuration
//!
//! **No transport concerns**: HTTP calls live in `rx-api`, view state in `rx-dashboard`.

pub mod config;
pub mod constants;
pub mod delivery;
pub mod error;
pub mod models;
pub mod session;
pub mod status;
pub mod validation;

pub use config::ClientConfig;
pub use delivery::{map_delivery_type_for_display, DeliveryOption};
pub use error::{CoreError, CoreResult};
pub use models::{
    ApiResponse, IssueRequest, LoginData, LoginRequest, Medicine, MedicinesPage, Pagination,
    Patient, Prescription, PrescriptionReceipt, UserProfile,
};
pub use session::{SessionContext, TokenClaims};
pub use status::{
    map_backend_to_display_status, map_display_to_backend_status, BackendStatus, BadgeColor,
    DisplayStatus, StatusBadge, StatusIcon,
};
pub use validation::{
    validate_issue_form, validate_login, Field, FieldError, IssueForm, LoginForm,
    ValidationErrors,
};
