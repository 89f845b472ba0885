// src/driver/transaction.rs

use super::EzoDriver;
use crate::common::{
    address::I2cAddr,
    command::Command,
    error::EzoError,
    hal_traits::{EzoBus, EzoDelay},
    types::{Compensation, ModuleKind, Selector},
};

impl<IF> EzoDriver<IF>
where
    IF: EzoBus + EzoDelay,
{
    /// Takes one reading and applies the current mode.
    ///
    /// In operational mode a missing module, a module without a reading and a
    /// bus fault come back as -100.0, -200.0 and -1000.0. Use [`measure`](Self::measure)
    /// to always get the tagged result.
    pub fn read(&mut self, selector: impl Into<Selector>, compensation: Compensation) -> Result<f32, EzoError<IF::Error>> {
        let outcome = self.measure(selector, compensation);
        self.config.mode.apply(outcome)
    }

    /// Takes one reading. Failures are never mapped to sentinel values.
    pub fn measure(&mut self, selector: impl Into<Selector>, compensation: Compensation) -> Result<f32, EzoError<IF::Error>> {
        let selector = selector.into();
        let record = *self.registry.lookup(selector)?;
        let temperature = if record.kind.supports_compensation() {
            self.compensation_temperature(compensation)
        } else {
            None
        };
        self.query(record.address, record.kind, temperature)
    }

    pub fn read_temperature(&mut self) -> Result<f32, EzoError<IF::Error>> {
        self.read(ModuleKind::Temperature, Compensation::Stored)
    }

    pub fn read_ph(&mut self, compensation: Compensation) -> Result<f32, EzoError<IF::Error>> {
        self.read(ModuleKind::Ph, compensation)
    }

    pub fn read_conductivity(&mut self, compensation: Compensation) -> Result<f32, EzoError<IF::Error>> {
        self.read(ModuleKind::Conductivity, compensation)
    }

    pub fn read_dissolved_oxygen(&mut self, compensation: Compensation) -> Result<f32, EzoError<IF::Error>> {
        self.read(ModuleKind::DissolvedOxygen, compensation)
    }

    pub fn read_redox(&mut self) -> Result<f32, EzoError<IF::Error>> {
        self.read(ModuleKind::RedoxPotential, Compensation::Stored)
    }

    /// One read transaction against a resolved module.
    pub(super) fn query(&mut self, address: I2cAddr, kind: ModuleKind, temperature: Option<f32>) -> Result<f32, EzoError<IF::Error>> {
        // 1. Select and send the read command
        let command = Command::read_for(kind, temperature);
        self.transmit(address, &command)?;

        // 2. Give the module its processing time
        let wait = self.config.timing.required_wait(kind, &command);
        self.wait(wait);

        // 3. Select, read back and parse
        let value = self.read_measurement(address)?;
        log::debug!("{} at {} read {}", kind, address, value);
        Ok(value)
    }

    /// Turns a compensation request into the value to encode, if any.
    pub(super) fn compensation_temperature(&mut self, compensation: Compensation) -> Option<f32> {
        match compensation {
            Compensation::Stored => None,
            Compensation::Explicit(t) => Some(self.config.normalize_temperature(t)),
            Compensation::Live => {
                let live = self.live_temperature().and_then(|(_, reading)| reading.ok());
                Some(self.live_or_default(live))
            }
        }
    }

    /// Normalized live value, or the default when there was none.
    pub(super) fn live_or_default(&self, live: Option<f32>) -> f32 {
        match live {
            Some(t) => self.config.normalize_temperature(t),
            None => {
                log::debug!("no live temperature, using {}", self.config.default_temperature);
                self.config.default_temperature
            }
        }
    }

    /// Reads the registered temperature module. `None` if there is none.
    pub(super) fn live_temperature(&mut self) -> Option<(I2cAddr, Result<f32, EzoError<IF::Error>>)> {
        let address = self.registry.resolve(Selector::Kind(ModuleKind::Temperature)).ok()?;
        let reading = self.query(address, ModuleKind::Temperature, None);
        if let Err(e) = &reading {
            log::warn!("live temperature read failed: {}", e);
        }
        Some((address, reading))
    }
}
