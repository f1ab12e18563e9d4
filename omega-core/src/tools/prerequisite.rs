//! Existence checks for resources a probe depends on

use std::path::Path;

/// Answers whether a probe's prerequisite resource is available
pub trait PrerequisiteCheck: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// Checks the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPrerequisites;

impl PrerequisiteCheck for FsPrerequisites {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
