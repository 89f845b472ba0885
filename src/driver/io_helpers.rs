// src/driver/io_helpers.rs

use super::EzoDriver; // Access EzoDriver definition
use crate::common::{
    address::I2cAddr,
    command::Command,
    error::EzoError,
    hal_traits::{EzoBus, EzoDelay},
    response::{parse_measurement, RESPONSE_LEN},
};
use core::time::Duration;

// Implementation block for I/O related helpers
impl<IF> EzoDriver<IF>
where
    IF: EzoBus + EzoDelay,
{
    /// Encodes `command`, selects `address` and writes the command bytes.
    pub(super) fn transmit(&mut self, address: I2cAddr, command: &Command<'_>) -> Result<(), EzoError<IF::Error>> {
        let buffer = command.format_into().map_err(EzoError::CommandFormat)?;
        self.interface.select(address).map_err(EzoError::BusFault)?;
        self.interface.write(buffer.as_bytes()).map_err(EzoError::BusFault)?;
        log::debug!("sent {:?} to {}", buffer.as_str(), address);
        Ok(())
    }

    /// Selects `address` and reads one response block.
    pub(super) fn read_block(&mut self, address: I2cAddr) -> Result<[u8; RESPONSE_LEN], EzoError<IF::Error>> {
        let mut block = [0u8; RESPONSE_LEN];
        self.interface.select(address).map_err(EzoError::BusFault)?;
        self.interface.read(&mut block).map_err(EzoError::BusFault)?;
        log::trace!("read {:?} from {}", block, address);
        Ok(block)
    }

    /// Reads and parses a reading. Anything but a number is `ModuleNotReady`.
    pub(super) fn read_measurement(&mut self, address: I2cAddr) -> Result<f32, EzoError<IF::Error>> {
        let block = self.read_block(address)?;
        parse_measurement(&block).map_err(EzoError::ModuleNotReady)
    }

    /// Whether something acknowledges a one-byte read at `address`.
    pub(super) fn probe(&mut self, address: I2cAddr) -> bool {
        let mut byte = [0u8; 1];
        self.interface.select(address).is_ok() && self.interface.read(&mut byte).is_ok()
    }

    /// Blocks for `duration`. This is the only place the driver waits.
    pub(super) fn wait(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        log::debug!("waiting {} ms", duration.as_millis());
        let ms = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        self.interface.delay_ms(ms);
    }
}
