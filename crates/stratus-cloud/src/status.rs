//! Generic server status vocabulary
//!
//! Every backend normalizes its native status tokens into this shared
//! vocabulary so callers never branch on provider-specific strings.

use serde::{Deserialize, Serialize};

/// Provider-neutral server lifecycle status
///
/// The vocabulary is open-ended: native tokens without a generic
/// equivalent pass through lowercased as [`ServerStatus::Other`] instead
/// of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Building,
    Active,
    Resizing,
    Deleting,
    Deleted,
    Rebooting,
    Error,
    /// Native status with no generic equivalent, lowercased
    #[serde(untagged)]
    Other(String),
}

impl ServerStatus {
    /// Normalize a provider-native status token.
    ///
    /// Total over all inputs: known tokens map per the fixed table,
    /// anything else is lowercased and passed through unchanged.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "BUILD" => ServerStatus::Building,
            "RESIZE" => ServerStatus::Resizing,
            "DELETED" => ServerStatus::Deleting,
            "REBOOT" => ServerStatus::Rebooting,
            other => match other.to_ascii_lowercase().as_str() {
                "building" => ServerStatus::Building,
                "active" => ServerStatus::Active,
                "resizing" => ServerStatus::Resizing,
                "deleting" => ServerStatus::Deleting,
                "deleted" => ServerStatus::Deleted,
                "rebooting" => ServerStatus::Rebooting,
                "error" => ServerStatus::Error,
                lower => ServerStatus::Other(lower.to_string()),
            },
        }
    }

    /// The lowercase generic token
    pub fn as_str(&self) -> &str {
        match self {
            ServerStatus::Building => "building",
            ServerStatus::Active => "active",
            ServerStatus::Resizing => "resizing",
            ServerStatus::Deleting => "deleting",
            ServerStatus::Deleted => "deleted",
            ServerStatus::Rebooting => "rebooting",
            ServerStatus::Error => "error",
            ServerStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
