use std::fmt;

use url::Url;

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// A single web target accepted for assessment
///
/// Holds the URL as entered (whitespace and trailing slashes removed) and the
/// bare host the network probes run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    raw: String,
    domain: String,
}

impl Target {
    pub fn parse(input: &str) -> Result<Self, TargetParseError> {
        let input = input.trim();

        if !SCHEMES.iter().any(|scheme| input.starts_with(scheme)) {
            return Err(TargetParseError::MissingScheme(input.to_string()));
        }

        let url = Url::parse(input).map_err(|e| TargetParseError::Invalid(format!("{input}: {e}")))?;
        let domain = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(TargetParseError::Invalid(format!("{input}: missing host"))),
        };

        Ok(Self {
            raw: input.trim_end_matches('/').to_string(),
            domain,
        })
    }

    /// The target URL
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Host component without scheme, port or path
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TargetParseError {
    #[error("{0} must start with http:// or https://")]
    MissingScheme(String),
    #[error("{0}")]
    Invalid(String),
}
