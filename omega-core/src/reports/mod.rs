//! Report persistence

mod sink;
mod transcript;

pub use sink::{FileReportSink, ReportSink, artifact_stem};
pub use transcript::Transcript;
