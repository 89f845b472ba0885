// src/common/timing.rs

use core::time::Duration;

use super::command::Command;
use super::types::ModuleKind;

// Processing times below are the module datasheet figures rounded up to a
// comfortable margin. Reading before they elapse yields a "pending" status.

/// Wait after configuration commands (`T`, `L`, `Sleep`) and between scan passes.
pub const SHORT_WAIT: Duration = Duration::from_millis(300);
/// Wait after temperature reads, uncompensated conductivity/oxygen reads and `I`.
pub const MEDIUM_WAIT: Duration = Duration::from_millis(600);
/// Wait after every other read, custom commands and address changes.
pub const LONG_WAIT: Duration = Duration::from_millis(900);
/// Extra time a module needs to reboot after moving to a new address.
pub const ADDRESS_SETTLE: Duration = SHORT_WAIT;

/// Post-command waits, overridable per driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingPolicy {
    pub short: Duration,
    pub medium: Duration,
    pub long: Duration,
    pub settle: Duration,
}

impl TimingPolicy {
    pub const fn new() -> Self {
        TimingPolicy {
            short: SHORT_WAIT,
            medium: MEDIUM_WAIT,
            long: LONG_WAIT,
            settle: ADDRESS_SETTLE,
        }
    }

    /// How long a module of `kind` needs after `command` before its reply is valid.
    pub fn required_wait(&self, kind: ModuleKind, command: &Command<'_>) -> Duration {
        match command {
            Command::Read => match kind {
                ModuleKind::Temperature
                | ModuleKind::Conductivity
                | ModuleKind::DissolvedOxygen => self.medium,
                ModuleKind::Ph | ModuleKind::RedoxPotential | ModuleKind::Unknown => self.long,
            },
            Command::ReadCompensated { .. } => self.long,
            Command::ChangeAddress { .. } => self.long + self.settle,
            Command::SetTemperature { .. }
            | Command::Led { .. }
            | Command::Wake
            | Command::Sleep => self.short,
            Command::Info => self.medium,
            Command::Custom(_) => self.long,
        }
    }
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self::new()
    }
}
