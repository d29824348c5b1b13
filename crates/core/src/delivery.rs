//! Delivery type vocabularies.
//!
//! The issue form offers three labelled options. The backend records only two codes,
//! `pickup` and `delivery`, which the history table maps back to labels. Codes outside
//! those two are shown exactly as received.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

/// Delivery options offered on the issue form. Serialises as the display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryOption {
    #[serde(rename = "Home Delivery")]
    HomeDelivery,
    #[serde(rename = "Pickup from Pharmacy")]
    PickupFromPharmacy,
    #[serde(rename = "Express Delivery")]
    ExpressDelivery,
}

impl DeliveryOption {
    pub const ALL: [DeliveryOption; 3] = [
        DeliveryOption::HomeDelivery,
        DeliveryOption::PickupFromPharmacy,
        DeliveryOption::ExpressDelivery,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DeliveryOption::HomeDelivery => "Home Delivery",
            DeliveryOption::PickupFromPharmacy => "Pickup from Pharmacy",
            DeliveryOption::ExpressDelivery => "Express Delivery",
        }
    }
}

impl std::fmt::Display for DeliveryOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Exact label match only.
impl FromStr for DeliveryOption {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeliveryOption::ALL
            .into_iter()
            .find(|option| option.label() == s)
            .ok_or_else(|| CoreError::UnknownDeliveryType(s.to_string()))
    }
}

/// Map a raw backend delivery code to a display label.
///
/// Unlike the status mapping there is no default: unrecognised codes are returned as-is.
pub fn map_delivery_type_for_display(code: &str) -> Cow<'_, str> {
    match code {
        "pickup" => Cow::Borrowed(DeliveryOption::PickupFromPharmacy.label()),
        "delivery" => Cow::Borrowed(DeliveryOption::HomeDelivery.label()),
        other => Cow::Borrowed(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_codes() {
        assert_eq!(map_delivery_type_for_display("pickup"), "Pickup from Pharmacy");
        assert_eq!(map_delivery_type_for_display("delivery"), "Home Delivery");
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(map_delivery_type_for_display("other"), "other");
        assert_eq!(map_delivery_type_for_display(""), "");
        assert_eq!(map_delivery_type_for_display("Pickup"), "Pickup");
    }

    #[test]
    fn labels_parse_exactly() {
        for option in DeliveryOption::ALL {
            assert_eq!(option.label().parse::<DeliveryOption>().unwrap(), option);
        }
        assert!("home delivery".parse::<DeliveryOption>().is_err());
        assert!("".parse::<DeliveryOption>().is_err());
    }

    #[test]
    fn serde_uses_labels() {
        assert_eq!(
            serde_json::to_string(&DeliveryOption::ExpressDelivery).unwrap(),
            "\"Express Delivery\""
        );
        let parsed: DeliveryOption = serde_json::from_str("\"Pickup from Pharmacy\"").unwrap();
        assert_eq!(parsed, DeliveryOption::PickupFromPharmacy);
    }
}
