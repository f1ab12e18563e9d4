//! External command plumbing used by evidence probes

pub mod prerequisite;
pub mod shell;

pub use prerequisite::{FsPrerequisites, PrerequisiteCheck};
pub use shell::{CommandRunner, ExecResult, ShellRunner, quote};
