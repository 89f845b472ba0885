// src/driver/peripheral.rs

use super::EzoDriver;
use crate::common::{
    address::I2cAddr,
    command::Command,
    error::EzoError,
    hal_traits::{EzoBus, EzoDelay},
    response::{parse_text, ResponseText, RESPONSE_LEN},
    types::{ModuleKind, Selector, KIND_COUNT},
};
use heapless::Vec;

impl<IF> EzoDriver<IF>
where
    IF: EzoBus + EzoDelay,
{
    pub fn led(&mut self, selector: impl Into<Selector>, on: bool) -> Result<(), EzoError<IF::Error>> {
        self.command_one(selector.into(), &Command::Led { on })
    }

    pub fn sleep(&mut self, selector: impl Into<Selector>) -> Result<(), EzoError<IF::Error>> {
        self.command_one(selector.into(), &Command::Sleep)
    }

    pub fn wake(&mut self, selector: impl Into<Selector>) -> Result<(), EzoError<IF::Error>> {
        self.command_one(selector.into(), &Command::Wake)
    }

    /// Sets the LED of every registered module. Returns the first failure, if any.
    pub fn led_all(&mut self, on: bool) -> Result<(), EzoError<IF::Error>> {
        self.command_all(&Command::Led { on }, |_| true)
    }

    /// Puts every registered module to sleep. Returns the first failure, if any.
    pub fn sleep_all(&mut self) -> Result<(), EzoError<IF::Error>> {
        self.command_all(&Command::Sleep, |_| true)
    }

    /// Wakes every registered module. Returns the first failure, if any.
    pub fn wake_all(&mut self) -> Result<(), EzoError<IF::Error>> {
        self.command_all(&Command::Wake, |_| true)
    }

    /// Stores a compensation temperature in every module that uses one.
    ///
    /// The value is normalized like an explicit per-read compensation.
    pub fn set_compensation_for_all(&mut self, temperature: f32) -> Result<(), EzoError<IF::Error>> {
        let temperature = self.config.normalize_temperature(temperature);
        self.command_all(&Command::SetTemperature { temperature }, ModuleKind::supports_compensation)
    }

    /// Sends raw command text and returns the module's reply text.
    ///
    /// The reply is read after the long processing wait. Calibration and other
    /// multi-step procedures are driven by the caller through this method.
    pub fn send_command(&mut self, selector: impl Into<Selector>, text: &str) -> Result<ResponseText, EzoError<IF::Error>> {
        let record = *self.registry.lookup(selector.into())?;
        let command = Command::Custom(text);
        self.transmit(record.address, &command)?;
        let wait = self.config.timing.required_wait(record.kind, &command);
        self.wait(wait);

        let block = self.read_block(record.address)?;
        let reply = parse_text(&block).map_err(EzoError::ModuleNotReady)?;
        let mut out = ResponseText::new();
        out.push_str(reply).map_err(|_| EzoError::BufferOverflow { needed: reply.len(), got: RESPONSE_LEN })?;
        Ok(out)
    }

    fn command_one(&mut self, selector: Selector, command: &Command<'_>) -> Result<(), EzoError<IF::Error>> {
        let record = *self.registry.lookup(selector)?;
        self.transmit(record.address, command)?;
        let wait = self.config.timing.required_wait(record.kind, command);
        self.wait(wait);
        Ok(())
    }

    /// Sends `command` to every registered module matching `filter`, then waits once.
    fn command_all(&mut self, command: &Command<'_>, filter: fn(ModuleKind) -> bool) -> Result<(), EzoError<IF::Error>> {
        let targets: Vec<(I2cAddr, ModuleKind), KIND_COUNT> = self
            .registry
            .all_records()
            .filter(|record| filter(record.kind))
            .map(|record| (record.address, record.kind))
            .collect();

        let mut first_error = None;
        let mut wait = core::time::Duration::ZERO;
        for &(address, kind) in targets.iter() {
            match self.transmit(address, command) {
                Ok(()) => wait = wait.max(self.config.timing.required_wait(kind, command)),
                Err(e) => {
                    log::warn!("{} at {} did not take {}: {}", kind, address, command, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        self.wait(wait);
        first_error.map_or(Ok(()), Err)
    }
}
