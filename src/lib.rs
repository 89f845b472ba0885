// src/lib.rs

//! Driver for Atlas Scientific EZO chemistry modules (temperature, pH,
//! conductivity, dissolved oxygen, redox potential) on a shared I2C bus.
//!
//! Bring your own bus by implementing [`EzoBus`] and [`EzoDelay`], or enable
//! the `impl-native` feature and wrap `embedded-hal` 1.0 parts in
//! [`common::HalBus`].

#![cfg_attr(not(any(test, feature = "std")), no_std)] // Specify no_std at the crate root

pub mod common;
pub mod driver;

// Re-export key types for convenience
pub use common::{
    Compensation, EzoBus, EzoDelay, EzoError, I2cAddr, LookupError, Mode, ModuleKind, Schedule,
    Selector,
};
pub use driver::{DriverConfig, EzoDriver, ModuleRecord, ModuleRegistry, Readings};
