//! Bounded evidence context shared by every council seat

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ContextLimits;
use crate::targets::Target;

use super::batch::EvidenceBatch;
use super::probes::fields;

/// Appended to a field that was cut at its ceiling
pub const TRUNCATION_MARKER: &str = " ...[truncated]";

const PASSIVE_LINES: [(&str, &str); 4] = [
    ("Subdomains", fields::SUBDOMAINS),
    ("DNS", fields::DNS),
    ("Tech Stack", fields::TECH),
    ("WAF", fields::WAF),
];

const ACTIVE_LINES: [(&str, &str); 3] = [
    ("Open Ports", fields::PORTS),
    ("Hidden Files", fields::FUZZING),
    ("CRITICAL VULNERABILITIES", fields::VULNS),
];

/// Keep at most `max_chars` characters, marking the cut
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
            out.push_str(text.split_at(cut).0);
            out.push_str(TRUNCATION_MARKER);
            Cow::Owned(out)
        }
    }
}

/// The synthesized evidence block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceContext(String);

impl EvidenceContext {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EvidenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Merges both evidence batches under fixed labels
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    limits: ContextLimits,
}

impl Compositor {
    pub fn new(limits: ContextLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ContextLimits {
        &self.limits
    }

    /// Character ceiling for an evidence field
    pub fn ceiling(&self, field: &str) -> usize {
        let limits = &self.limits;
        match field {
            fields::SUBDOMAINS => limits.subdomains,
            fields::DNS => limits.dns,
            fields::TECH => limits.tech,
            fields::WAF => limits.waf,
            fields::PORTS => limits.ports,
            fields::FUZZING => limits.fuzzing,
            fields::VULNS => limits.vulns,
            _ => 0,
        }
    }

    pub fn compose(
        &self,
        target: &Target,
        passive: &EvidenceBatch,
        active: &EvidenceBatch,
    ) -> EvidenceContext {
        let mut out = format!("TARGET: {}\n", target);

        out.push_str("[PASSIVE INTELLIGENCE]\n");
        for (label, field) in PASSIVE_LINES {
            self.push_line(&mut out, label, field, passive);
        }

        out.push_str("\n[ACTIVE INTELLIGENCE]\n");
        for (label, field) in ACTIVE_LINES {
            self.push_line(&mut out, label, field, active);
        }

        EvidenceContext(out)
    }

    fn push_line(&self, out: &mut String, label: &str, field: &str, batch: &EvidenceBatch) {
        let value = batch.get(field).unwrap_or_default();
        out.push_str(label);
        out.push_str(": ");
        out.push_str(&truncate(value, self.ceiling(field)));
        out.push('\n');
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::events::Phase;

    fn target() -> Target {
        Target::parse("http://scanme.nmap.org").unwrap()
    }

    fn passive(value: &str) -> EvidenceBatch {
        EvidenceBatch::from_pairs(
            Phase::Passive,
            [
                (fields::SUBDOMAINS, value),
                (fields::DNS, value),
                (fields::TECH, value),
                (fields::WAF, value),
            ],
        )
    }

    fn active(value: &str) -> EvidenceBatch {
        EvidenceBatch::from_pairs(
            Phase::Active,
            [
                (fields::PORTS, value),
                (fields::FUZZING, value),
                (fields::VULNS, value),
            ],
        )
    }

    /// Text between `label: ` and the next section line
    fn section<'a>(context: &'a str, label: &str, next: &str) -> &'a str {
        let start = context.find(&format!("{label}: ")).unwrap() + label.len() + 2;
        let end = context[start..].find(next).unwrap() + start;
        context[start..end].trim_end_matches('\n')
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("80/tcp open", 100), "80/tcp open");
        assert_eq!(truncate("exact", 5), "exact");
    }

    #[test]
    fn test_truncate_adds_marker() {
        assert_eq!(truncate("abcdef", 3), format!("abc{TRUNCATION_MARKER}"));
        assert_eq!(truncate("abc", 0), TRUNCATION_MARKER);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("ééé", 2), format!("éé{TRUNCATION_MARKER}"));
    }

    #[test]
    fn test_layout() {
        let context = Compositor::default().compose(&target(), &passive("p"), &active("a"));
        assert_eq!(
            context.as_str(),
            "TARGET: http://scanme.nmap.org\n\
             [PASSIVE INTELLIGENCE]\n\
             Subdomains: p\n\
             DNS: p\n\
             Tech Stack: p\n\
             WAF: p\n\
             \n\
             [ACTIVE INTELLIGENCE]\n\
             Open Ports: a\n\
             Hidden Files: a\n\
             CRITICAL VULNERABILITIES: a\n"
        );
    }

    #[test]
    fn test_huge_port_scan_is_capped() {
        let huge = "9".repeat(100_000);
        let compositor = Compositor::default();
        let context = compositor.compose(&target(), &passive("ok"), &active(&huge));

        let ports = section(context.as_str(), "Open Ports", "Hidden Files:");
        let cap = compositor.ceiling(fields::PORTS) + TRUNCATION_MARKER.len();
        assert!(ports.chars().count() <= cap);
        assert!(ports.ends_with(TRUNCATION_MARKER));
        assert_eq!(section(context.as_str(), "DNS", "Tech Stack:"), "ok");
    }

    #[test]
    fn test_total_size_bounded_by_ceilings() {
        let huge = "x".repeat(50_000);
        let compositor = Compositor::default();
        let context = compositor.compose(&target(), &passive(&huge), &active(&huge));

        let empty = compositor.compose(&target(), &passive(""), &active(""));
        let limits = compositor.limits();
        let ceilings = limits.subdomains
            + limits.dns
            + limits.tech
            + limits.waf
            + limits.ports
            + limits.fuzzing
            + limits.vulns;
        assert!(context.len() <= empty.len() + ceilings + 7 * TRUNCATION_MARKER.len());
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let none = EvidenceBatch::new(Phase::Passive, Vec::new());
        let context = Compositor::default().compose(&target(), &none, &active("a"));
        assert!(context.as_str().contains("Subdomains: \n"));
        assert!(context.as_str().contains("Open Ports: a\n"));
    }

    #[test]
    fn test_custom_limits() {
        let limits = ContextLimits {
            vulns: 4,
            ..ContextLimits::default()
        };
        let context =
            Compositor::new(limits).compose(&target(), &passive(""), &active("CVE-2024-1234"));
        assert!(
            context
                .as_str()
                .contains(&format!("CRITICAL VULNERABILITIES: CVE-{TRUNCATION_MARKER}\n"))
        );
    }
}
