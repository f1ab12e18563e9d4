//! Council transcript saved alongside a report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::council::CouncilTurn;
use crate::providers::TokenUsage;

/// Everything the council saw and said during one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub run_id: Uuid,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub evidence: String,
    pub turns: Vec<CouncilTurn>,
    pub usage: TokenUsage,
}
