//! Validated string newtypes for natural keys and display names.
//!
//! Teams, users, and pull requests are keyed by caller-supplied strings. Each
//! key gets its own newtype so a `UserId` can never be passed where a
//! `TeamName` is expected.

use thiserror::Error;

/// Upper bound on the length of any identifier or name.
pub const IDENTIFIER_MAX: usize = 255;

/// Validation failures shared by every string newtype.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must not contain leading or trailing whitespace")]
    SurroundingWhitespace { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl IdentifierValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::SurroundingWhitespace { field }
            | Self::TooLong { field, .. } => field,
        }
    }

    /// Stable code for structured error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "empty",
            Self::SurroundingWhitespace { .. } => "surrounding_whitespace",
            Self::TooLong { .. } => "too_long",
        }
    }
}

pub(crate) fn validate(field: &'static str, raw: &str) -> Result<(), IdentifierValidationError> {
    if raw.trim().is_empty() {
        return Err(IdentifierValidationError::Empty { field });
    }
    if raw.trim() != raw {
        return Err(IdentifierValidationError::SurroundingWhitespace { field });
    }
    if raw.chars().count() > IDENTIFIER_MAX {
        return Err(IdentifierValidationError::TooLong {
            field,
            max: IDENTIFIER_MAX,
        });
    }
    Ok(())
}

/// Declare a validated string newtype with serde, `Display`, and `AsRef<str>`.
macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap the supplied value.
            pub fn new(
                value: impl Into<String>,
            ) -> Result<Self, $crate::domain::identifier::IdentifierValidationError> {
                let value = value.into();
                $crate::domain::identifier::validate($field, &value)?;
                Ok(Self(value))
            }

            /// Borrow the raw value.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::identifier::IdentifierValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

pub(crate) use string_newtype;
