// src/common/error.rs

use super::command::CommandFormatError;
use super::response::ResponseParseError;
use super::types::{ModuleKind, Selector};

/// Legacy value reported for a module that is not registered.
pub const SENTINEL_NOT_PRESENT: f32 = -100.0;
/// Legacy value reported when a module had no reading ready.
pub const SENTINEL_NOT_READY: f32 = -200.0;
/// Legacy value reported when the bus transaction itself failed.
pub const SENTINEL_BUS_FAULT: f32 = -1000.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EzoError<E = ()>
where
    E: core::fmt::Debug, // Needed for the BusFault message
{
    /// Underlying error from the I2C transport (NACK, arbitration loss, ...).
    #[error("Bus fault: {0:?}")]
    BusFault(E),

    /// Selector is neither a valid address nor a known module kind.
    #[error("Invalid module selector")]
    InvalidSelector,

    /// Selector is well-formed but nothing is registered for it.
    #[error("No module registered for {0}")]
    ModuleNotPresent(Selector),

    /// The module answered, but not with a usable reading.
    #[error("Module not ready: {0}")]
    ModuleNotReady(ResponseParseError),

    /// Requested address is taken or outside 1..=127.
    #[error("Address {0} is unavailable")]
    AddressConflict(u8),

    /// A second module of the same kind was offered to the registry.
    #[error("A {0} module is already registered")]
    DuplicateKind(ModuleKind),

    /// Mode text was not "op" or "dev".
    #[error("Invalid mode, expected \"op\" or \"dev\"")]
    InvalidMode,

    /// Buffer provided was too small.
    #[error("Buffer overflow: needed {needed}, got {got}")]
    BufferOverflow { needed: usize, got: usize },

    /// Command could not be encoded for the wire.
    #[error("Command formatting failed: {0}")]
    CommandFormat(CommandFormatError),
}

impl<E: core::fmt::Debug> EzoError<E> {
    /// The legacy numeric stand-in for this failure, if it has one.
    ///
    /// Only the three failure classes a measurement can end in map to a value;
    /// caller mistakes (bad selector, bad mode, ...) never become numbers.
    pub fn sentinel(&self) -> Option<f32> {
        match self {
            EzoError::ModuleNotPresent(_) => Some(SENTINEL_NOT_PRESENT),
            EzoError::ModuleNotReady(_) => Some(SENTINEL_NOT_READY),
            EzoError::BusFault(_) => Some(SENTINEL_BUS_FAULT),
            _ => None,
        }
    }

    /// Whether this error came from the transport rather than module state or caller input.
    pub fn is_bus_fault(&self) -> bool {
        matches!(self, EzoError::BusFault(_))
    }
}

/// Registry and selector failures. They never involve the bus, so they carry no
/// transport error type and convert into any `EzoError<E>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Invalid module selector")]
    InvalidSelector,
    #[error("No module registered for {0}")]
    ModuleNotPresent(Selector),
    #[error("Address {0} is unavailable")]
    AddressConflict(u8),
    #[error("A {0} module is already registered")]
    DuplicateKind(ModuleKind),
}

impl<E: core::fmt::Debug> From<LookupError> for EzoError<E> {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::InvalidSelector => EzoError::InvalidSelector,
            LookupError::ModuleNotPresent(selector) => EzoError::ModuleNotPresent(selector),
            LookupError::AddressConflict(raw) => EzoError::AddressConflict(raw),
            LookupError::DuplicateKind(kind) => EzoError::DuplicateKind(kind),
        }
    }
}

/// True if `value` is one of the legacy failure values.
///
/// Oxidation-reduction readings span roughly -1019.9..=1019.9 mV, so -100.0 and
/// -200.0 are also legitimate redox readings. Prefer the tagged `Result` when the
/// distinction matters.
pub fn is_sentinel(value: f32) -> bool {
    value == SENTINEL_NOT_PRESENT || value == SENTINEL_NOT_READY || value == SENTINEL_BUS_FAULT
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct MockBusError;

    #[test]
    fn test_sentinel_mapping() {
        let e: EzoError<MockBusError> = EzoError::BusFault(MockBusError);
        assert_eq!(e.sentinel(), Some(-1000.0));
        let e: EzoError<MockBusError> = EzoError::ModuleNotReady(ResponseParseError::Pending);
        assert_eq!(e.sentinel(), Some(-200.0));
        let e: EzoError<MockBusError> =
            EzoError::ModuleNotPresent(Selector::Kind(ModuleKind::Ph));
        assert_eq!(e.sentinel(), Some(-100.0));
    }

    #[test]
    fn test_caller_errors_have_no_sentinel() {
        let errors: [EzoError<MockBusError>; 4] = [
            EzoError::InvalidSelector,
            EzoError::InvalidMode,
            EzoError::AddressConflict(99),
            EzoError::BufferOverflow { needed: 20, got: 16 },
        ];
        for e in errors.iter() {
            assert_eq!(e.sentinel(), None, "{:?}", e);
        }
    }

    #[test]
    fn test_lookup_error_conversion() {
        let e: EzoError<MockBusError> = LookupError::AddressConflict(99).into();
        assert_eq!(e, EzoError::AddressConflict(99));
        let e: EzoError<MockBusError> = LookupError::InvalidSelector.into();
        assert_eq!(e, EzoError::InvalidSelector);
    }

    #[test]
    fn test_is_sentinel() {
        assert!(is_sentinel(-100.0));
        assert!(is_sentinel(-200.0));
        assert!(is_sentinel(-1000.0));
        assert!(!is_sentinel(7.0));
        assert!(!is_sentinel(-999.9));
    }

    #[test]
    fn test_display_messages() {
        let e: EzoError<MockBusError> = EzoError::ModuleNotPresent(Selector::Address(42));
        assert_eq!(std::format!("{}", e), "No module registered for address 42");
        let e: EzoError<MockBusError> = EzoError::BusFault(MockBusError);
        assert_eq!(std::format!("{}", e), "Bus fault: MockBusError");
    }
}
