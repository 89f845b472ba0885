// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod error;
pub mod hal_traits;
pub mod response;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::I2cAddr;

// From command.rs
pub use command::{Command, CommandBuffer, CommandFormatError, MAX_COMMAND_LEN};

// From error.rs
pub use error::{
    is_sentinel, EzoError, LookupError, SENTINEL_BUS_FAULT, SENTINEL_NOT_PRESENT,
    SENTINEL_NOT_READY,
};

// From hal_traits.rs
pub use hal_traits::{EzoBus, EzoDelay};

// From response/mod.rs (and its sub-modules via its own `pub use`)
pub use response::{
    Identity, ResponseCode, ResponseParseError, ResponseText, RESPONSE_LEN,
    parse_identity, parse_measurement, parse_text,
};

// From timing.rs (constants - users can access via common::timing::*)
pub use timing::TimingPolicy;

// From types.rs
pub use types::{Compensation, Mode, ModuleKind, Schedule, Selector, KIND_COUNT};

// --- Feature-gated re-exports ---

// embedded-hal adapter (from hal_traits.rs)
#[cfg(feature = "impl-native")]
pub use hal_traits::{HalBus, HalBusError};
