//! # RX API
//!
//! HTTP access to the prescription backend.
//!
//! Handles:
//! - One shared [`ApiClient`] that attaches the session credential to every request
//! - Typed prescription operations behind the [`PrescriptionApi`] trait
//! - Login and logout through [`AuthService`]
//!
//! The client never navigates. An HTTP 401 comes back as [`ApiError::Unauthorized`] and
//! the application shell decides what to do with it.

#![warn(rust_2018_idioms)]

pub mod auth;
pub mod client;
pub mod error;
pub mod service;

pub use auth::AuthService;
pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use service::{PrescriptionApi, PrescriptionService};
