// src/driver/mod.rs

use crate::common::{
    address::I2cAddr,
    hal_traits::{EzoBus, EzoDelay},
    types::{Mode, ModuleKind},
};

mod batch;
mod config;
mod discovery;
mod io_helpers;
mod peripheral;
mod registry;
mod transaction;

#[cfg(test)]
pub(crate) mod mock;

pub use batch::{Readings, MAX_BATCH};
pub use config::{DriverConfig, DEFAULT_MAX_TEMPERATURE, DEFAULT_MIN_TEMPERATURE, DEFAULT_TEMPERATURE};
pub use registry::{ModuleRecord, ModuleRegistry};

/// Drives every EZO module on one bus.
///
/// The driver owns its bus; every operation takes `&mut self` and runs to
/// completion, including the processing waits.
#[derive(Debug)]
pub struct EzoDriver<IF>
where
    IF: EzoBus + EzoDelay,
{
    interface: IF,
    registry: ModuleRegistry,
    config: DriverConfig,
}

impl<IF> EzoDriver<IF>
where
    IF: EzoBus + EzoDelay,
{
    /// Creates a driver and scans the bus for modules.
    pub fn new(interface: IF, config: DriverConfig) -> Self {
        let mut driver = Self::with_registry(interface, config, ModuleRegistry::new());
        driver.scan();
        driver
    }

    /// Creates a driver around a known topology without touching the bus.
    pub fn with_registry(interface: IF, config: DriverConfig, registry: ModuleRegistry) -> Self {
        EzoDriver { interface, registry, config }
    }

    // --- Mode ---

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        log::info!("mode set to {}", mode);
        self.config.mode = mode;
    }

    /// Flips between operational and development mode, returning the new mode.
    pub fn toggle_mode(&mut self) -> Mode {
        self.set_mode(self.config.mode.toggled());
        self.config.mode
    }

    // --- Accessors ---

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn addresses(&self) -> impl Iterator<Item = I2cAddr> + '_ {
        self.registry.addresses()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ModuleKind> + '_ {
        self.registry.kinds()
    }

    pub fn units(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.units()
    }

    pub fn versions(&self) -> impl Iterator<Item = f32> + '_ {
        self.registry.versions()
    }

    /// Gives back the bus. Modules are put to sleep first unless `keep_awake` is set.
    pub fn release(mut self) -> IF {
        if !self.config.keep_awake {
            // Failures are already logged by sleep_all.
            let _ = self.sleep_all();
        }
        self.interface
    }
}
