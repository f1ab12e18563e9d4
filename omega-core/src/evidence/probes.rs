//! Probe declarations for both collection phases
//!
//! Each probe is a field name plus a command template. Templates may use
//! `{target}`, `{domain}`, `{wordlist}`, `{subdomain_limit}`, `{fuzz_limit}` and
//! `{severity}`; values are shell-quoted before substitution.

use std::borrow::Cow;
use std::path::PathBuf;

use crate::config::EvidenceConfig;
use crate::targets::Target;
use crate::template;
use crate::tools::quote;

/// Evidence field names referenced by the compositor and prompts
pub mod fields {
    pub const SUBDOMAINS: &str = "subdomains";
    pub const DNS: &str = "dns";
    pub const TECH: &str = "tech";
    pub const WAF: &str = "waf";
    pub const PORTS: &str = "ports";
    pub const FUZZING: &str = "fuzzing";
    pub const VULNS: &str = "vulns";
}

/// Placeholder stored when the fuzzing wordlist is absent
pub const WORDLIST_MISSING: &str = "Wordlist not found. Skipped.";

/// A resource that must exist before a probe runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerequisite {
    pub path: PathBuf,
    /// Stored as the field value when `path` is missing
    pub missing: String,
}

/// A named external-tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub field: String,
    pub command: String,
    pub prerequisite: Option<Prerequisite>,
}

impl Probe {
    pub fn new(field: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            command: command.into(),
            prerequisite: None,
        }
    }

    /// Only run when `path` exists, otherwise record `missing`
    pub fn requires(mut self, path: impl Into<PathBuf>, missing: impl Into<String>) -> Self {
        self.prerequisite = Some(Prerequisite {
            path: path.into(),
            missing: missing.into(),
        });
        self
    }

    /// Concrete command line for `target`
    pub fn command_for(&self, target: &Target, config: &EvidenceConfig) -> String {
        let vars = [
            ("target", quote(target.as_str()).into_owned()),
            ("domain", quote(target.domain()).into_owned()),
            (
                "wordlist",
                quote(&config.wordlist.to_string_lossy()).into_owned(),
            ),
            ("subdomain_limit", config.subdomain_limit.to_string()),
            ("fuzz_limit", config.fuzz_limit.to_string()),
            ("severity", quote(&config.severity).into_owned()),
        ];

        template::render(&self.command, |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| Cow::Borrowed(value.as_str()))
        })
    }
}

/// OSINT probes that only touch third-party sources or a single HTTP request
pub fn passive_probes(_config: &EvidenceConfig) -> Vec<Probe> {
    vec![
        Probe::new(
            fields::SUBDOMAINS,
            "subfinder -d {domain} -silent | head -n {subdomain_limit}",
        ),
        Probe::new(fields::DNS, "dig {domain} ANY +short"),
        Probe::new(
            fields::TECH,
            "echo {target} | httpx -title -tech-detect -status-code -silent",
        ),
        Probe::new(fields::WAF, "wafw00f {target} | grep 'is behind'"),
    ]
}

/// Intrusive probes that scan and fuzz the target directly
pub fn active_probes(config: &EvidenceConfig) -> Vec<Probe> {
    vec![
        Probe::new(fields::PORTS, "rustscan -a {domain} -- -sV -O --script banner"),
        Probe::new(
            fields::FUZZING,
            "ffuf -u {target}/FUZZ -w {wordlist} -mc 200,301,403 -s | head -n {fuzz_limit}",
        )
        .requires(&config.wordlist, WORDLIST_MISSING),
        Probe::new(fields::VULNS, "nuclei -u {target} -severity {severity} -silent"),
    ]
}
