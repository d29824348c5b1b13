//! Prescription status vocabularies and the mapping between them.
//!
//! The backend tracks `Pending`, `Sent`, `Delivered` and `Failed`. The dashboard shows
//! `pending`, `approved`, `delivered` and `rejected`. The two tables are exact inverses,
//! and both mapping functions are total: anything they do not recognise (including the
//! empty string) lands on the pending state rather than erroring.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendStatus {
    Pending,
    Sent,
    Delivered,
    Failed,
}

/// Lifecycle state as shown to the prescriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Pending,
    Approved,
    Delivered,
    Rejected,
}

impl BackendStatus {
    pub const ALL: [BackendStatus; 4] = [
        BackendStatus::Pending,
        BackendStatus::Sent,
        BackendStatus::Delivered,
        BackendStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BackendStatus::Pending => "Pending",
            BackendStatus::Sent => "Sent",
            BackendStatus::Delivered => "Delivered",
            BackendStatus::Failed => "Failed",
        }
    }

    pub fn to_display(self) -> DisplayStatus {
        match self {
            BackendStatus::Pending => DisplayStatus::Pending,
            BackendStatus::Sent => DisplayStatus::Approved,
            BackendStatus::Delivered => DisplayStatus::Delivered,
            BackendStatus::Failed => DisplayStatus::Rejected,
        }
    }
}

impl DisplayStatus {
    pub const ALL: [DisplayStatus; 4] = [
        DisplayStatus::Pending,
        DisplayStatus::Approved,
        DisplayStatus::Delivered,
        DisplayStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayStatus::Pending => "pending",
            DisplayStatus::Approved => "approved",
            DisplayStatus::Delivered => "delivered",
            DisplayStatus::Rejected => "rejected",
        }
    }

    pub fn to_backend(self) -> BackendStatus {
        match self {
            DisplayStatus::Pending => BackendStatus::Pending,
            DisplayStatus::Approved => BackendStatus::Sent,
            DisplayStatus::Delivered => BackendStatus::Delivered,
            DisplayStatus::Rejected => BackendStatus::Failed,
        }
    }

    /// Capitalised label, e.g. `Approved`.
    pub fn label(self) -> &'static str {
        match self {
            DisplayStatus::Pending => "Pending",
            DisplayStatus::Approved => "Approved",
            DisplayStatus::Delivered => "Delivered",
            DisplayStatus::Rejected => "Rejected",
        }
    }

    /// Rendering descriptor for the status chip.
    pub fn badge(self) -> StatusBadge {
        match self {
            DisplayStatus::Pending => StatusBadge {
                icon: StatusIcon::Clock,
                color: BadgeColor::Yellow,
            },
            DisplayStatus::Approved => StatusBadge {
                icon: StatusIcon::CheckCircle,
                color: BadgeColor::Green,
            },
            DisplayStatus::Delivered => StatusBadge {
                icon: StatusIcon::CheckCircle,
                color: BadgeColor::Blue,
            },
            DisplayStatus::Rejected => StatusBadge {
                icon: StatusIcon::XCircle,
                color: BadgeColor::Red,
            },
        }
    }
}

impl std::fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse: only the four exact backend codes are accepted.
impl FromStr for BackendStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

/// Strict parse: only the four exact display codes are accepted.
impl FromStr for DisplayStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisplayStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

/// Map a raw backend status code to its display status. Unknown codes map to `pending`.
pub fn map_backend_to_display_status(code: &str) -> DisplayStatus {
    code.parse::<BackendStatus>()
        .map(BackendStatus::to_display)
        .unwrap_or(DisplayStatus::Pending)
}

/// Map a raw display status code back to the backend code. Unknown codes map to `Pending`.
pub fn map_display_to_backend_status(code: &str) -> BackendStatus {
    code.parse::<DisplayStatus>()
        .map(DisplayStatus::to_backend)
        .unwrap_or(BackendStatus::Pending)
}

/// Icon shown next to a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusIcon {
    Clock,
    CheckCircle,
    XCircle,
}

impl StatusIcon {
    /// Single-character stand-in for terminals.
    pub fn glyph(self) -> char {
        match self {
            StatusIcon::Clock => '◷',
            StatusIcon::CheckCircle => '✔',
            StatusIcon::XCircle => '✘',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeColor {
    Yellow,
    Green,
    Blue,
    Red,
}

impl BadgeColor {
    /// ANSI SGR foreground code.
    pub fn ansi_code(self) -> u8 {
        match self {
            BadgeColor::Yellow => 33,
            BadgeColor::Green => 32,
            BadgeColor::Blue => 34,
            BadgeColor::Red => 31,
        }
    }
}

/// Everything needed to render a status chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusBadge {
    pub icon: StatusIcon,
    pub color: BadgeColor,
}
