//! Numeric surrogate identifiers for persisted records.
//!
//! Rows are keyed by positive `SERIAL` integers. Identifiers arriving from
//! path segments are parsed here so non-numeric input is rejected before any
//! query runs.

use std::fmt;
use std::str::FromStr;

/// Validation errors raised when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// Input was not an integer.
    #[error("{label} must be numeric, got '{value}'")]
    NotNumeric { label: &'static str, value: String },
    /// Input was zero or negative.
    #[error("{label} must be a positive integer, got {value}")]
    NotPositive { label: &'static str, value: i32 },
}

impl IdValidationError {
    /// Name of the identifier that failed validation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotNumeric { label, .. } | Self::NotPositive { label, .. } => label,
        }
    }
}

macro_rules! define_numeric_id {
    ($(#[$meta:meta])* $name:ident => $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(try_from = "i32", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Human-readable label used in validation messages.
            pub const LABEL: &'static str = $label;

            /// Validate and wrap a raw integer.
            pub fn new(value: i32) -> Result<Self, IdValidationError> {
                if value <= 0 {
                    return Err(IdValidationError::NotPositive { label: $label, value });
                }
                Ok(Self(value))
            }

            /// Parse an identifier from text such as a path segment.
            pub fn parse(raw: &str) -> Result<Self, IdValidationError> {
                let value = raw.trim().parse::<i32>().map_err(|_| {
                    IdValidationError::NotNumeric {
                        label: $label,
                        value: raw.to_owned(),
                    }
                })?;
                Self::new(value)
            }

            /// Raw integer value as stored in the database.
            pub fn get(self) -> i32 {
                self.0
            }
        }

        impl TryFrom<i32> for $name {
            type Error = IdValidationError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_numeric_id! {
    /// Identifier of a developer or consumer account within its own table.
    AccountId => "account id"
}

define_numeric_id! {
    /// Identifier of a property record.
    PropertyId => "property id"
}

define_numeric_id! {
    /// Identifier of a suggestion record.
    SuggestionId => "suggestion id"
}
