// src/common/hal_traits.rs

use super::address::I2cAddr;
use core::fmt::Debug;

/// Abstraction for the delays between a command and its reply.
///
/// Note: `HalBus` forwards this to `embedded_hal::delay::DelayNs` when the
/// `impl-native` feature is enabled.
pub trait EzoDelay {
    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for the addressed I2C transfers EZO modules use.
///
/// Selecting a target is separate from moving bytes, mirroring how Linux
/// `i2c-dev` (`ioctl(I2C_SLAVE)` then `read`/`write`) and most MCU HALs work.
pub trait EzoBus {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Directs subsequent `write`/`read` calls at `address`.
    fn select(&mut self, address: I2cAddr) -> Result<(), Self::Error>;

    /// Writes `bytes` to the selected module in one transfer.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Fills `buffer` from the selected module in one transfer.
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error>;
}

#[cfg(feature = "impl-native")]
pub use native::{HalBus, HalBusError};

/// Adapter from `embedded-hal` 1.0 I2C + delay traits.
#[cfg(feature = "impl-native")]
mod native {
    use super::{EzoBus, EzoDelay};
    use crate::common::address::I2cAddr;
    use embedded_hal::delay::DelayNs;
    use embedded_hal::i2c::I2c;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum HalBusError<E> {
        /// `write`/`read` called before any `select`.
        NoAddressSelected,
        I2c(E),
    }

    /// Wraps an `embedded_hal::i2c::I2c` bus and a `DelayNs` provider.
    #[derive(Debug)]
    pub struct HalBus<I2C, D> {
        i2c: I2C,
        delay: D,
        selected: Option<I2cAddr>,
    }

    impl<I2C, D> HalBus<I2C, D> {
        pub fn new(i2c: I2C, delay: D) -> Self {
            HalBus { i2c, delay, selected: None }
        }

        /// Gives back the wrapped bus and delay.
        pub fn release(self) -> (I2C, D) {
            (self.i2c, self.delay)
        }
    }

    impl<I2C: I2c, D> EzoBus for HalBus<I2C, D> {
        type Error = HalBusError<I2C::Error>;

        fn select(&mut self, address: I2cAddr) -> Result<(), Self::Error> {
            self.selected = Some(address);
            Ok(())
        }

        fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
            let address = self.selected.ok_or(HalBusError::NoAddressSelected)?;
            self.i2c.write(address.as_u8(), bytes).map_err(HalBusError::I2c)
        }

        fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
            let address = self.selected.ok_or(HalBusError::NoAddressSelected)?;
            self.i2c.read(address.as_u8(), buffer).map_err(HalBusError::I2c)
        }
    }

    impl<I2C, D: DelayNs> EzoDelay for HalBus<I2C, D> {
        fn delay_ms(&mut self, ms: u32) {
            self.delay.delay_ms(ms);
        }
    }

}
