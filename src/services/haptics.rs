//! Tactile feedback contract

use tracing::debug;

/// Pulse strength, mirroring the platform haptic engine's presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticKind {
    Light,
    Medium,
    Heavy,
    Success,
}

/// Haptic feedback capability; implemented by the host platform
pub trait Haptics: Send + Sync {
    fn pulse(&self, kind: HapticKind);
}

/// Haptics stand-in for the CLI session driver
#[derive(Debug, Clone, Default)]
pub struct ConsoleHaptics;

impl Haptics for ConsoleHaptics {
    fn pulse(&self, kind: HapticKind) {
        debug!("Haptic pulse: {:?}", kind);
    }
}
