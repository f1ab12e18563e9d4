//! Report persistence

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::OutputConfig;
use crate::targets::Target;
use crate::Result;

use super::transcript::Transcript;

/// Filesystem-safe name derived from a target
///
/// `://` collapses to one `_`; every other character outside `[A-Za-z0-9_-]`
/// becomes `_`. Trailing underscores are dropped.
pub fn artifact_stem(target: &Target) -> String {
    let stem: String = target
        .as_str()
        .replacen("://", "_", 1)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    stem.trim_end_matches('_').to_string()
}

/// Destination for finished reports
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Write the report verbatim, returning where it went
    async fn persist(&self, target: &Target, report: &str) -> Result<PathBuf>;

    /// Write the council transcript next to the report
    async fn persist_transcript(&self, target: &Target, transcript: &Transcript)
    -> Result<PathBuf>;
}

/// Writes Markdown reports into one directory
#[derive(Debug, Clone)]
pub struct FileReportSink {
    dir: PathBuf,
    prefix: String,
}

impl FileReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "OMEGA_".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.report_dir).with_prefix(&config.file_prefix)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Report location for `target`
    pub fn report_path(&self, target: &Target) -> PathBuf {
        self.dir
            .join(format!("{}{}.md", self.prefix, artifact_stem(target)))
    }

    /// Transcript location for `target`
    pub fn transcript_path(&self, target: &Target) -> PathBuf {
        self.dir.join(format!(
            "{}{}.transcript.json",
            self.prefix,
            artifact_stem(target)
        ))
    }
}

#[async_trait]
impl ReportSink for FileReportSink {
    async fn persist(&self, target: &Target, report: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.report_path(target);
        tokio::fs::write(&path, report).await?;
        Ok(path)
    }

    async fn persist_transcript(
        &self,
        target: &Target,
        transcript: &Transcript,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.transcript_path(target);
        let json = serde_json::to_string_pretty(transcript)?;
        tokio::fs::write(&path, json).await?;
        Ok(path)
    }
}
