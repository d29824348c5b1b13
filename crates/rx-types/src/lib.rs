//! Validated text primitives shared by the prescription client crates.
//!
//! Form input arrives as free text. These wrappers are the only way a value crosses from
//! "something the user typed" into a request payload, so anything holding one of them has
//! already passed its length rule.

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The trimmed input had fewer characters than required
    #[error("Text must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trimmed text with at least `MIN` characters.
///
/// Length is counted in Unicode scalar values, so "Zoë" is three characters.
/// `MIN` of zero or one behaves like [`NonEmptyText`]: empty input is always rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MinText<const MIN: usize>(String);

impl<const MIN: usize> MinText<MIN> {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        let actual = trimmed.chars().count();
        if actual < MIN {
            return Err(TextError::TooShort { min: MIN, actual });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The minimum character count enforced by this type.
    pub const fn min_len() -> usize {
        MIN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! text_impls {
    ($ty:ty $(, $len:tt)?) => {
        impl$(<const $len: usize>)? std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl$(<const $len: usize>)? AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl$(<const $len: usize>)? serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de $(, const $len: usize)?> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                <$ty>::new(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

text_impls!(NonEmptyText);
text_impls!(MinText<MIN>, MIN);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  1 tablet daily \n").unwrap();
        assert_eq!(text.as_str(), "1 tablet daily");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn min_text_boundary() {
        assert_eq!(
            MinText::<2>::new("J"),
            Err(TextError::TooShort { min: 2, actual: 1 })
        );
        assert_eq!(MinText::<2>::new("Jo").unwrap().as_str(), "Jo");
        assert_eq!(MinText::<10>::min_len(), 10);
    }

    #[test]
    fn min_text_counts_characters_not_bytes() {
        // four chars, six bytes
        assert!(MinText::<4>::new("Zoë!").is_ok());
        assert!(MinText::<5>::new("Zoë!").is_err());
    }

    #[test]
    fn deserialize_enforces_rule() {
        let ok: MinText<3> = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(ok.to_string(), "abc");
        assert!(serde_json::from_str::<MinText<3>>("\"ab\"").is_err());
        assert!(serde_json::from_str::<NonEmptyText>("\"  \"").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let text = NonEmptyText::new("Paracetamol 500mg").unwrap();
        assert_eq!(
            serde_json::to_string(&text).unwrap(),
            "\"Paracetamol 500mg\""
        );
    }
}
