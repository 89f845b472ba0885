// src/common/response/mod.rs

mod error;
pub mod parse; // Make parse functions public

pub use error::ResponseParseError;
pub use parse::{parse_identity, parse_measurement, parse_text, payload};

use crate::common::types::ModuleKind;

/// Size of the block read back from a module after every command.
pub const RESPONSE_LEN: usize = 32;

/// Reply text of a custom command, without status byte or padding.
pub type ResponseText = heapless::String<RESPONSE_LEN>;

/// First byte of every response block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum ResponseCode {
    Success = 1,
    SyntaxError = 2,
    Pending = 254,
    NoData = 255,
}

impl ResponseCode {
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(ResponseCode::Success),
            2 => Some(ResponseCode::SyntaxError),
            254 => Some(ResponseCode::Pending),
            255 => Some(ResponseCode::NoData),
            _ => None,
        }
    }
}

/// What a module reports about itself in answer to `I`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Identity {
    pub kind: ModuleKind,
    /// Firmware version, `-1.0` when unknown.
    pub version: f32,
    pub unit: &'static str,
}

impl Identity {
    pub const UNKNOWN: Identity = Identity {
        kind: ModuleKind::Unknown,
        version: -1.0,
        unit: "u",
    };

    pub const fn new(kind: ModuleKind, version: f32) -> Self {
        Identity { kind, version, unit: kind.unit() }
    }

    pub const fn is_known(&self) -> bool {
        !matches!(self.kind, ModuleKind::Unknown)
    }
}
