//! Store identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`StoreId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreIdError {
    /// The input string is empty.
    #[error("store id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("store id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside the allowed set.
    #[error("store id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A storefront store identifier (the upstream `sid`).
///
/// Identifiers are opaque strings; in practice they are short decimal numbers
/// such as `"2661"`. They are used as the `sid` query parameter against the
/// storefront API and as the key into the store directory.
///
/// ## Constraints
///
/// - Length: 1-32 characters
/// - ASCII letters, digits, `-` and `_` only
///
/// ## Examples
///
/// ```
/// use foodomo_deals_core::StoreId;
///
/// assert!(StoreId::parse("2661").is_ok());
/// assert!(StoreId::parse("").is_err());
/// assert!(StoreId::parse("26 61").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct StoreId(String);

impl StoreId {
    /// Maximum length of a store identifier.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `StoreId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 32 characters, or
    /// contains anything other than ASCII alphanumerics, `-` or `_`.
    pub fn parse(s: &str) -> Result<Self, StoreIdError> {
        if s.is_empty() {
            return Err(StoreIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(StoreIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(StoreIdError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Parse a comma-separated list of identifiers, skipping blank entries.
    ///
    /// # Errors
    ///
    /// Returns the first entry that fails [`StoreId::parse`].
    pub fn parse_list(s: &str) -> Result<Vec<Self>, StoreIdError> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for StoreId {
    type Err = StoreIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StoreId {
    type Error = StoreIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StoreId> for String {
    fn from(id: StoreId) -> Self {
        id.0
    }
}

impl AsRef<str> for StoreId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
