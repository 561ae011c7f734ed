//! Engine configuration

use gapless_core::limits::{MAX_ALLOCATION_ATTEMPTS, NUMBER_WIDTH};

/// Tunables for the numbering engine
///
/// The defaults mirror the platform contract (6-digit numbers, 3 attempts)
/// and are what every production deployment runs with; tests shrink the
/// retry budget to exercise exhaustion paths.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Rendered width of bare numbers
    ///
    /// Rendering reads the compile-time width; this field records the
    /// contract the deployment expects so a mismatch is caught at startup.
    pub number_width: usize,
    /// Attempts before allocation surfaces `AllocationFailed`
    pub max_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            number_width: NUMBER_WIDTH,
            max_attempts: MAX_ALLOCATION_ATTEMPTS,
        }
    }
}
