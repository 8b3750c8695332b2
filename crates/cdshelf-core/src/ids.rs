use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A validated account identifier.
///
/// Account ids are positive decimal integers (`^\d+$`, value > 0). The
/// canonical form drops leading zeros, so `"042"` and `"42"` address the
/// same collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(u64);

impl AccountId {
    /// Creates an `AccountId` from a numeric value, rejecting zero.
    pub fn new(value: u64) -> Result<Self, ServiceError> {
        if value == 0 {
            return Err(ServiceError::InvalidArgument(
                "account id must be a positive integer, got 0".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Parses an account id from its decimal string form.
    ///
    /// Signs, whitespace, decimal points and values that do not fit in a
    /// `u64` are all rejected.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ServiceError::InvalidArgument(format!(
                "account id must be a positive integer: '{raw}'"
            )));
        }

        let value = raw.parse::<u64>().map_err(|_| {
            ServiceError::InvalidArgument(format!("account id is out of range: '{raw}'"))
        })?;

        Self::new(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for AccountId {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated identifier of a single upstream item.
///
/// Item ids are opaque, but they end up as a path segment of the detail
/// page URL, so they must be non-empty and free of path, query and
/// fragment delimiters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Parses an item id, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "item id is required".to_string(),
            ));
        }

        if trimmed
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace())
        {
            return Err(ServiceError::InvalidArgument(format!(
                "item id contains reserved characters: '{trimmed}'"
            )));
        }

        if trimmed == "." || trimmed == ".." {
            return Err(ServiceError::InvalidArgument(format!(
                "item id cannot be a dot segment: '{trimmed}'"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
