//! Configuration types for omega runs

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::Error;
use crate::council::Role;

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Also write the full council transcript as JSON next to the report
    #[serde(default)]
    pub save_transcript: bool,
}

fn default_report_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".omega")
        .join("reports")
}

fn default_file_prefix() -> String {
    "OMEGA_".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
            file_prefix: default_file_prefix(),
            save_transcript: false,
        }
    }
}

/// Reasoning runtime (Ollama) connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_max_tokens() -> u32 {
    4096
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

impl RuntimeConfig {
    /// Configured base URL, falling back to OLLAMA_API_BASE_URL
    pub fn resolved_base_url(&self) -> Option<String> {
        self.base_url
            .clone()
            .or_else(|| std::env::var("OLLAMA_API_BASE_URL").ok())
            .filter(|url| !url.is_empty())
    }
}

/// One council position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    pub role: Role,
    pub model: String,
    /// Prompt template override; the embedded prompt for the role is used when unset
    #[serde(default)]
    pub template: Option<String>,
}

impl SeatConfig {
    pub fn new(role: Role, model: impl Into<String>) -> Self {
        Self {
            role,
            model: model.into(),
            template: None,
        }
    }
}

/// Council seats in chain order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilConfig {
    #[serde(default = "default_seats")]
    pub seats: Vec<SeatConfig>,
    /// Prompts file replacing the embedded role templates
    #[serde(default)]
    pub prompts: Option<PathBuf>,
}

fn default_seats() -> Vec<SeatConfig> {
    vec![
        SeatConfig::new(Role::Strategist, "deepseek-r1:7b"),
        SeatConfig::new(Role::Auditor, "qwen2.5-coder:7b"),
        SeatConfig::new(Role::Judge, "llama3.1:8b"),
    ]
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            seats: default_seats(),
            prompts: None,
        }
    }
}

/// Evidence collection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceConfig {
    #[serde(default = "default_wordlist")]
    pub wordlist: PathBuf,
    #[serde(default = "default_subdomain_limit")]
    pub subdomain_limit: usize,
    #[serde(default = "default_fuzz_limit")]
    pub fuzz_limit: usize,
    #[serde(default = "default_severity")]
    pub severity: String,
    /// Per-command timeout; commands run unbounded when unset
    #[serde(default)]
    pub command_timeout_secs: Option<u64>,
}

fn default_wordlist() -> PathBuf {
    PathBuf::from("/usr/share/wordlists/dirb/common.txt")
}

fn default_subdomain_limit() -> usize {
    50
}

fn default_fuzz_limit() -> usize {
    20
}

fn default_severity() -> String {
    "critical,high".to_string()
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            wordlist: default_wordlist(),
            subdomain_limit: default_subdomain_limit(),
            fuzz_limit: default_fuzz_limit(),
            severity: default_severity(),
            command_timeout_secs: None,
        }
    }
}

/// Per-field character ceilings for the evidence context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextLimits {
    pub subdomains: usize,
    pub dns: usize,
    pub tech: usize,
    pub waf: usize,
    pub ports: usize,
    pub fuzzing: usize,
    pub vulns: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            subdomains: 500,
            dns: 500,
            tech: 500,
            waf: 300,
            ports: 2000,
            fuzzing: 1000,
            vulns: 1500,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OmegaConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub council: CouncilConfig,
    #[serde(default)]
    pub evidence: EvidenceConfig,
    #[serde(default)]
    pub context: ContextLimits,
}

impl OmegaConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load an explicit file, or fall back to the default cascade
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::load_default()?,
        };
        config.expand_env_vars();
        Ok(config)
    }

    /// Load configuration from default locations with cascade:
    /// 1. ./omega.toml (local override)
    /// 2. ~/.omega/config.toml (global defaults)
    /// 3. Built-in defaults
    ///
    /// A file that exists but does not parse is an error.
    pub fn load_default() -> crate::Result<Self> {
        let mut candidates = vec![PathBuf::from("omega.toml")];
        candidates.extend(Self::global_config_path());
        Self::load_first(&candidates)
    }

    /// First existing file among `candidates`, or built-in defaults
    pub fn load_first(candidates: &[PathBuf]) -> crate::Result<Self> {
        for path in candidates {
            match Self::from_file(path) {
                Ok(config) => return Ok(config),
                Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(Self::default())
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".omega").join("config.toml"))
    }

    /// Expand `${VAR}` references in the runtime base URL
    pub fn expand_env_vars(&mut self) {
        let var_name = self
            .runtime
            .base_url
            .as_deref()
            .and_then(|url| url.strip_prefix("${"))
            .and_then(|url| url.strip_suffix('}'))
            .map(str::to_string);
        if let Some(var_name) = var_name {
            self.runtime.base_url = std::env::var(&var_name).ok();
            if self.runtime.base_url.is_none() {
                warn!(
                    "runtime.base_url references ${{{}}}, which is not set; using the default runtime URL",
                    var_name
                );
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = OmegaConfig::parse("").unwrap();
        assert_eq!(config.output.file_prefix, "OMEGA_");
        assert!(!config.output.save_transcript);
        assert_eq!(config.runtime.max_tokens, 4096);
        assert_eq!(config.evidence.subdomain_limit, 50);
        assert_eq!(config.evidence.fuzz_limit, 20);
        assert_eq!(config.evidence.severity, "critical,high");
        assert_eq!(config.context, ContextLimits::default());

        let roles: Vec<Role> = config.council.seats.iter().map(|s| s.role).collect();
        assert_eq!(roles, vec![Role::Strategist, Role::Auditor, Role::Judge]);
        assert_eq!(config.council.seats[0].model, "deepseek-r1:7b");
        assert_eq!(config.council.seats[1].model, "qwen2.5-coder:7b");
        assert_eq!(config.council.seats[2].model, "llama3.1:8b");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[output]
report_dir = "/tmp/omega-reports"
file_prefix = "RECON_"
save_transcript = true

[runtime]
base_url = "http://gpu-box:11434"
max_tokens = 8192
temperature = 0.2

[[council.seats]]
role = "strategist"
model = "llama3.1:70b"

[[council.seats]]
role = "judge"
model = "llama3.1:8b"
template = "Write the report. {strategist}"

[evidence]
wordlist = "/opt/lists/small.txt"
subdomain_limit = 10
command_timeout_secs = 300

[context]
ports = 4000
"#;
        let config = OmegaConfig::parse(toml).unwrap();
        assert_eq!(config.output.report_dir, PathBuf::from("/tmp/omega-reports"));
        assert_eq!(config.output.file_prefix, "RECON_");
        assert!(config.output.save_transcript);
        assert_eq!(
            config.runtime.base_url.as_deref(),
            Some("http://gpu-box:11434")
        );
        assert_eq!(config.runtime.max_tokens, 8192);
        assert_eq!(config.runtime.temperature, Some(0.2));

        assert_eq!(config.council.seats.len(), 2);
        assert_eq!(config.council.seats[1].role, Role::Judge);
        assert_eq!(
            config.council.seats[1].template.as_deref(),
            Some("Write the report. {strategist}")
        );

        assert_eq!(config.evidence.wordlist, PathBuf::from("/opt/lists/small.txt"));
        assert_eq!(config.evidence.subdomain_limit, 10);
        assert_eq!(config.evidence.fuzz_limit, 20);
        assert_eq!(config.evidence.command_timeout_secs, Some(300));

        assert_eq!(config.context.ports, 4000);
        assert_eq!(config.context.subdomains, 500);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let toml = r#"
[[council.seats]]
role = "jester"
model = "llama3.1:8b"
"#;
        assert!(OmegaConfig::parse(toml).is_err());
    }

    #[test]
    fn test_env_var_expansion() {
        // SAFETY: the variable name is unique to this test
        unsafe { std::env::set_var("OMEGA_TEST_OLLAMA_URL", "http://10.0.0.5:11434") };
        let mut config = OmegaConfig::parse(
            r#"
[runtime]
base_url = "${OMEGA_TEST_OLLAMA_URL}"
"#,
        )
        .unwrap();
        config.expand_env_vars();
        assert_eq!(
            config.runtime.base_url.as_deref(),
            Some("http://10.0.0.5:11434")
        );
        // SAFETY: see above
        unsafe { std::env::remove_var("OMEGA_TEST_OLLAMA_URL") };
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("omega.toml");
        std::fs::write(&path, "[evidence]\nfuzz_limit = 5\n").unwrap();

        let config = OmegaConfig::load(Some(&path)).unwrap();
        assert_eq!(config.evidence.fuzz_limit, 5);
    }

    #[test]
    fn test_unset_env_var_falls_back() {
        let mut config = OmegaConfig::parse(
            r#"
[runtime]
base_url = "${OMEGA_TEST_UNSET_OLLAMA_URL}"
"#,
        )
        .unwrap();
        config.expand_env_vars();
        assert_eq!(config.runtime.base_url, None);
    }

    #[test]
    fn test_load_first_skips_missing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let global = dir.path().join("config.toml");
        std::fs::write(&global, "[output]\nfile_prefix = \"GLOBAL_\"\n").unwrap();

        let config =
            OmegaConfig::load_first(&[dir.path().join("omega.toml"), global]).unwrap();
        assert_eq!(config.output.file_prefix, "GLOBAL_");
    }

    #[test]
    fn test_load_first_defaults_when_nothing_exists() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = OmegaConfig::load_first(&[dir.path().join("omega.toml")]).unwrap();
        assert_eq!(config.output.file_prefix, "OMEGA_");
    }

    #[test]
    fn test_load_first_rejects_malformed_local_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let local = dir.path().join("omega.toml");
        let global = dir.path().join("config.toml");
        std::fs::write(&local, "[output]\nfile_prefix = 42\n").unwrap();
        std::fs::write(&global, "[output]\nfile_prefix = \"GLOBAL_\"\n").unwrap();

        let result = OmegaConfig::load_first(&[local, global]);
        assert!(matches!(result, Err(crate::Error::Toml(_))));
    }

    #[test]
    fn test_council_prompts_path() {
        let config =
            OmegaConfig::parse("[council]\nprompts = \"/etc/omega/prompts.toml\"\n").unwrap();
        assert_eq!(
            config.council.prompts,
            Some(PathBuf::from("/etc/omega/prompts.toml"))
        );
        assert_eq!(config.council.seats.len(), 3);
    }

    #[test]
    fn test_load_missing_explicit_file_errors() {
        let result = OmegaConfig::load(Some(Path::new("/nonexistent/omega.toml")));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }

    #[test]
    fn test_global_config_path() {
        let path = OmegaConfig::global_config_path().unwrap();
        assert!(path.ends_with(".omega/config.toml"));
    }
}
