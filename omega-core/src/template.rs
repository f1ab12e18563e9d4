//! `{name}` placeholder rendering shared by probe commands and council prompts
//!
//! A placeholder is a `{` followed by one or more lowercase ASCII letters or
//! underscores and a closing `}`. Anything else (shell `awk '{print $1}'`, JSON
//! braces in a prompt) is copied through untouched. Substituted values are never
//! rescanned, so model output containing `{evidence}` stays literal.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([a-z_]+)\}").expect("Hardcoded regex pattern should be valid")
});

/// Placeholder names in order of appearance (duplicates included)
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|cap| cap.get(1))
        .map(|name| name.as_str())
        .collect()
}

/// Substitute every placeholder `lookup` knows; unknown ones are left verbatim
pub fn render<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<Cow<'a, str>>,
{
    PLACEHOLDER_RE
        .replace_all(template, |cap: &Captures<'_>| {
            let whole = cap.get(0).map_or("", |m| m.as_str());
            cap.get(1)
                .and_then(|name| lookup(name.as_str()))
                .map_or_else(|| whole.to_string(), Cow::into_owned)
        })
        .into_owned()
}
