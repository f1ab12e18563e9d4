//! Council roles

use std::fmt;

use serde::{Deserialize, Serialize};

/// A council seat's role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Plans attack paths from the raw evidence
    Strategist,
    /// Verifies the plan and strikes unsupported claims
    Auditor,
    /// Writes the final report
    Judge,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Strategist, Role::Auditor, Role::Judge];

    /// Lowercase name used in configuration and prompt placeholders
    pub fn key(&self) -> &'static str {
        match self {
            Self::Strategist => "strategist",
            Self::Auditor => "auditor",
            Self::Judge => "judge",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.key() == key)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strategist => write!(f, "Strategist"),
            Self::Auditor => write!(f, "Auditor"),
            Self::Judge => write!(f, "Judge"),
        }
    }
}
