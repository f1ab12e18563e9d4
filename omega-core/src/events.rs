//! Pipeline progress events

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::council::Role;

/// Pipeline phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Passive,
    Active,
    Council,
    Report,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passive => write!(f, "PASSIVE"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Council => write!(f, "COUNCIL"),
            Self::Report => write!(f, "REPORT"),
        }
    }
}

/// Something observable that happened during a run
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A phase began
    PhaseStarted { phase: Phase, target: String },
    /// A probe command is about to run
    ProbeStarted { phase: Phase, field: String },
    /// A probe was not run because its prerequisite is missing
    ProbeSkipped {
        phase: Phase,
        field: String,
        reason: String,
    },
    /// A council seat is being invoked
    TurnStarted { role: Role, model: String },
    /// A council seat answered
    TurnCompleted {
        role: Role,
        model: String,
        output_chars: usize,
    },
    /// The final report was written
    ReportSaved { path: PathBuf },
}

/// Receives pipeline events
pub trait EventSender: Send + Sync {
    fn send(&self, event: PipelineEvent);
}

/// Writes events to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl EventSender for TracingEvents {
    fn send(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::PhaseStarted { phase, target } => match phase {
                Phase::Passive => info!(%phase, "Starting deep OSINT on {}", target),
                Phase::Active => info!(%phase, "Engaging {} with active scans", target),
                Phase::Council => info!(%phase, "Data acquisition complete, session started"),
                Phase::Report => info!(%phase, "Writing report for {}", target),
            },
            PipelineEvent::ProbeStarted { phase, field } => {
                info!(%phase, "Running {} probe", field);
            }
            PipelineEvent::ProbeSkipped {
                phase,
                field,
                reason,
            } => {
                warn!(%phase, "Skipping {} probe: {}", field, reason);
            }
            PipelineEvent::TurnStarted { role, model } => {
                info!(phase = %Phase::Council, "{} ({}) is deliberating", role, model);
            }
            PipelineEvent::TurnCompleted {
                role,
                model,
                output_chars,
            } => {
                debug!(
                    phase = %Phase::Council,
                    "{} ({}) answered with {} chars", role, model, output_chars
                );
            }
            PipelineEvent::ReportSaved { path } => {
                info!(phase = %Phase::Report, "Report saved to {}", path.display());
            }
        }
    }
}
