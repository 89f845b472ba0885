// src/driver/config.rs

use crate::common::{timing::TimingPolicy, types::Mode};

/// Lower bound of the accepted compensation temperature, in °C.
pub const DEFAULT_MIN_TEMPERATURE: f32 = 0.0;
/// Upper bound of the accepted compensation temperature, in °C.
pub const DEFAULT_MAX_TEMPERATURE: f32 = 100.0;
/// Used whenever a compensation temperature is missing or out of range.
pub const DEFAULT_TEMPERATURE: f32 = 25.0;

/// Driver behaviour that is fixed per instance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverConfig {
    /// Error policy for measurements.
    pub mode: Mode,
    /// Leave modules awake when the driver is released.
    pub keep_awake: bool,
    /// Inclusive range of usable compensation temperatures.
    pub min_temperature: f32,
    pub max_temperature: f32,
    /// Fallback compensation temperature.
    pub default_temperature: f32,
    pub timing: TimingPolicy,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverConfig {
    pub const fn new() -> Self {
        Self {
            mode: Mode::Operational,
            keep_awake: true,
            min_temperature: DEFAULT_MIN_TEMPERATURE,
            max_temperature: DEFAULT_MAX_TEMPERATURE,
            default_temperature: DEFAULT_TEMPERATURE,
            timing: TimingPolicy::new(),
        }
    }

    /// Every failure surfaces as an error; useful while wiring up a rig.
    pub const fn development() -> Self {
        Self::new().with_mode(Mode::Development)
    }

    /// Modules are put to sleep when the driver is released.
    pub const fn low_power() -> Self {
        Self::new().with_keep_awake(false)
    }

    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub const fn with_keep_awake(mut self, keep_awake: bool) -> Self {
        self.keep_awake = keep_awake;
        self
    }

    pub const fn with_temperature_range(mut self, min: f32, max: f32) -> Self {
        self.min_temperature = min;
        self.max_temperature = max;
        self
    }

    pub const fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = temperature;
        self
    }

    pub const fn with_timing(mut self, timing: TimingPolicy) -> Self {
        self.timing = timing;
        self
    }

    /// Returns `temperature` if it is usable for compensation, otherwise the default.
    pub fn normalize_temperature(&self, temperature: f32) -> f32 {
        if temperature >= self.min_temperature && temperature <= self.max_temperature {
            temperature
        } else {
            log::debug!(
                "compensation {} outside {}..={}, using {}",
                temperature, self.min_temperature, self.max_temperature, self.default_temperature
            );
            self.default_temperature
        }
    }
}
