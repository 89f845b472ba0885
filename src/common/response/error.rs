// src/common/response/error.rs

use core::fmt;

/// Why a raw response block did not yield a usable value.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResponseParseError {
    /// Response code 255, or a success code with no payload.
    NoData,
    /// Response code 254: the module is still processing the last command.
    Pending,
    /// Response code 2: the module rejected the command.
    SyntaxError,
    /// Response code outside the documented set.
    UnknownStatus(u8),
    /// Payload contains bytes outside ASCII.
    InvalidUtf8,
    /// Payload is not a finite decimal number.
    MalformedReading,
}

impl fmt::Display for ResponseParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<core::str::Utf8Error> for ResponseParseError {
    fn from(_: core::str::Utf8Error) -> Self {
        ResponseParseError::InvalidUtf8
    }
}

impl From<core::num::ParseFloatError> for ResponseParseError {
    fn from(_: core::num::ParseFloatError) -> Self {
        ResponseParseError::MalformedReading
    }
}
