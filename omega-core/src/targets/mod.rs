mod types;

pub use types::{Target, TargetParseError};
