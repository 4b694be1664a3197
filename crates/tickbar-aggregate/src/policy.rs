//! Handling of ticks that land before the open bar's minute.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do with a tick whose minute precedes the open bar's start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackdatedPolicy {
    /// Seal the open bar and reopen at the earlier minute, exactly like a
    /// forward rollover. History may become non-monotonic.
    #[default]
    Accept,
    /// Drop the tick and leave state untouched.
    Reject,
    /// Fold the tick into the open bar without moving its start.
    Coalesce,
}

impl BackdatedPolicy {
    /// Returns the policy as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Coalesce => "coalesce",
        }
    }

    /// Returns all available policies.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Accept, Self::Reject, Self::Coalesce]
    }
}

impl std::fmt::Display for BackdatedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackdatedPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "reject" | "drop" => Ok(Self::Reject),
            "coalesce" | "merge" => Ok(Self::Coalesce),
            _ => Err(PolicyParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid policy string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyParseError(String);

impl std::fmt::Display for PolicyParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid backdated policy '{}', expected one of: accept, reject, coalesce",
            self.0
        )
    }
}

impl std::error::Error for PolicyParseError {}
