//! Multi-seat adjudication over collected evidence

pub mod engine;
pub mod prompts;
pub mod roles;

pub use engine::{Council, CouncilTurn, Deliberation, Seat};
pub use prompts::Prompts;
pub use roles::Role;
