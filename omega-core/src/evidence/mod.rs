//! Evidence collection and context composition

pub mod batch;
pub mod collector;
pub mod compositor;
pub mod probes;

pub use batch::{EvidenceBatch, ProbeResult};
pub use collector::EvidenceCollector;
pub use compositor::{Compositor, EvidenceContext, TRUNCATION_MARKER, truncate};
pub use probes::{Probe, active_probes, fields, passive_probes};
