//! omega-core: recon evidence pipeline and council adjudication engine

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod council;
pub mod error;
pub mod events;
pub mod evidence;
pub mod pipeline;
pub mod providers;
pub mod reports;
pub mod targets;
pub mod template;
pub mod tools;

pub use error::{Error, Result};
pub use pipeline::{Pipeline, PipelineBuilder, RunSummary};
