//! Prompt templates for council seats

use serde::Deserialize;
use std::path::Path;

use crate::{Error, Result};

use super::Role;

/// Seat prompt configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RolePrompt {
    pub prompt: String,
}

/// All seat prompts
#[derive(Debug, Clone, Deserialize)]
pub struct Prompts {
    pub strategist: RolePrompt,
    pub auditor: RolePrompt,
    pub judge: RolePrompt,
}

impl Prompts {
    /// Load prompts from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse prompts from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse prompts: {}", e)))
    }

    /// Load from default location (embedded)
    #[allow(clippy::expect_used)]
    pub fn default_prompts() -> Self {
        let content = include_str!("../../prompts.toml");
        Self::parse(content).expect("Embedded prompts.toml should be valid")
    }

    /// Get the template for a role
    pub fn get(&self, role: Role) -> &str {
        match role {
            Role::Strategist => &self.strategist.prompt,
            Role::Auditor => &self.auditor.prompt,
            Role::Judge => &self.judge.prompt,
        }
    }
}

impl Default for Prompts {
    fn default() -> Self {
        Self::default_prompts()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::template::placeholders;

    #[test]
    fn test_embedded_prompts_parse() {
        let prompts = Prompts::default_prompts();
        assert!(prompts.get(Role::Strategist).contains("Top 3 exploit paths"));
        assert!(prompts.get(Role::Auditor).contains("hallucinated"));
        assert!(prompts.get(Role::Judge).contains("Recommended Fixes"));
    }

    #[test]
    fn test_embedded_prompts_reference_prior_roles() {
        let prompts = Prompts::default_prompts();
        assert!(!placeholders(prompts.get(Role::Strategist)).contains(&"strategist"));

        let auditor = placeholders(prompts.get(Role::Auditor));
        assert!(auditor.contains(&"strategist"));
        assert!(auditor.contains(&"evidence"));

        let judge = placeholders(prompts.get(Role::Judge));
        assert!(judge.contains(&"strategist"));
        assert!(judge.contains(&"auditor"));
        assert!(judge.contains(&"evidence"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prompts.toml");
        std::fs::write(
            &path,
            "[strategist]\nprompt = \"plan {evidence}\"\n\
             [auditor]\nprompt = \"check {strategist}\"\n\
             [judge]\nprompt = \"write {auditor}\"\n",
        )
        .unwrap();

        let prompts = Prompts::from_file(&path).unwrap();
        assert_eq!(prompts.get(Role::Strategist), "plan {evidence}");
        assert_eq!(prompts.get(Role::Judge), "write {auditor}");
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let result = Prompts::from_file("/nonexistent/omega/prompts.toml");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_parse_rejects_missing_role() {
        let result = Prompts::parse("[strategist]\nprompt = \"x\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
