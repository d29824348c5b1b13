//! # RX Dashboard
//!
//! Headless view-models for the prescription dashboard.
//!
//! Each screen element is a struct whose state a front end renders:
//! - [`PrescriptionForm`]: medicine picker, draft, field errors and submission
//! - [`PrescriptionHistory`]: the prescription table with retry
//! - [`AppShell`]: header profile, logout, and the redirect to login on 401
//!
//! Views talk to the backend only through [`rx_api::PrescriptionApi`], and to the user
//! only through the [`Navigator`] and [`Notifier`] seams.

#![warn(rust_2018_idioms)]

pub mod form;
pub mod history;
pub mod navigation;
pub mod notify;
pub mod shell;

#[cfg(test)]
mod testing;

pub use form::{PrescriptionForm, SubmitOutcome};
pub use history::{HistoryRow, HistoryView, PrescriptionHistory};
pub use navigation::{Navigator, Route};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use shell::AppShell;

use std::sync::{Mutex, MutexGuard, PoisonError};

// view state stays usable after a panicking writer
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
