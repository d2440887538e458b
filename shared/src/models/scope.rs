//! Category scopes
//!
//! Each scope owns one independent display order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category bucket that carries its own display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Workflow statuses in the "active" bucket
    StatusActive,
    /// Workflow statuses in the "archive" bucket
    StatusArchive,
    /// Business verticals
    Vertical,
}

impl Scope {
    /// All scopes, in activation order
    pub const ALL: [Scope; 3] = [Scope::StatusActive, Scope::StatusArchive, Scope::Vertical];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Scope::StatusActive => "status_active",
            Scope::StatusArchive => "status_archive",
            Scope::Vertical => "vertical",
        }
    }

    /// Key used by the device-local backend
    pub fn storage_key(&self) -> String {
        format!("order:{}", self.as_str())
    }

    /// Key used by the account-scoped remote backend
    pub const fn remote_key(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown scope name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope: {0}")]
pub struct UnknownScope(pub String);

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status_active" | "active" => Ok(Scope::StatusActive),
            "status_archive" | "archive" => Ok(Scope::StatusArchive),
            "vertical" | "verticals" => Ok(Scope::Vertical),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys() {
        assert_eq!(Scope::StatusActive.storage_key(), "order:status_active");
        assert_eq!(Scope::StatusArchive.storage_key(), "order:status_archive");
        assert_eq!(Scope::Vertical.storage_key(), "order:vertical");
        assert_eq!(Scope::Vertical.remote_key(), "vertical");
    }

    #[test]
    fn test_serde_names_match_keys() {
        for scope in Scope::ALL {
            let json = serde_json::to_string(&scope).unwrap();
            assert_eq!(json, format!("\"{}\"", scope.as_str()));
            let back: Scope = serde_json::from_str(&json).unwrap();
            assert_eq!(back, scope);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("active".parse::<Scope>(), Ok(Scope::StatusActive));
        assert_eq!("status_archive".parse::<Scope>(), Ok(Scope::StatusArchive));
        assert_eq!("verticals".parse::<Scope>(), Ok(Scope::Vertical));
        assert_eq!(
            "Vertical".parse::<Scope>(),
            Err(UnknownScope("Vertical".to_string()))
        );
    }
}
