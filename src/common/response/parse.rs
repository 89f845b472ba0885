// src/common/response/parse.rs

use super::error::ResponseParseError;
use super::{Identity, ResponseCode};

use crate::common::types::ModuleKind;

use core::str;

// --- Internal Helpers ---
#[inline]
fn trim_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}

// --- Public Parsing Functions ---

/// Checks the status byte and returns the ASCII payload with padding removed.
///
/// The payload may be empty; callers that need a value treat that as `NoData`.
pub fn payload(block: &[u8]) -> Result<&str, ResponseParseError> {
    let (&code, rest) = block.split_first().ok_or(ResponseParseError::NoData)?;
    match ResponseCode::from_u8(code) {
        Some(ResponseCode::Success) => {}
        Some(ResponseCode::Pending) => return Err(ResponseParseError::Pending),
        Some(ResponseCode::NoData) => return Err(ResponseParseError::NoData),
        Some(ResponseCode::SyntaxError) => return Err(ResponseParseError::SyntaxError),
        None => return Err(ResponseParseError::UnknownStatus(code)),
    }
    let text = trim_padding(rest);
    if !text.is_ascii() {
        return Err(ResponseParseError::InvalidUtf8);
    }
    Ok(str::from_utf8(text)?)
}

/// Parses a reading. The whole payload must be one finite decimal number.
pub fn parse_measurement(block: &[u8]) -> Result<f32, ResponseParseError> {
    let text = payload(block)?;
    if text.is_empty() {
        return Err(ResponseParseError::NoData);
    }
    let value: f32 = text.parse()?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ResponseParseError::MalformedReading)
    }
}

/// Parses the answer to `I` (`?I,<NAME>,<VERSION>`).
///
/// Never fails: anything that is not a well-formed identity of a known kind
/// comes back as `Identity::UNKNOWN`.
pub fn parse_identity(block: &[u8]) -> Identity {
    payload(block).ok().and_then(identity_from_text).unwrap_or(Identity::UNKNOWN)
}

fn identity_from_text(text: &str) -> Option<Identity> {
    let mut fields = text.split(',');
    let tag = fields.next()?;
    let name = fields.next()?;
    let version = fields.next()?;
    if fields.next().is_some() || !tag.starts_with('?') {
        return None;
    }
    let kind = ModuleKind::from_name(name)?;
    let version: f32 = version.parse().ok()?;
    Some(Identity::new(kind, version))
}

/// Returns the reply text of a custom command. An empty reply is valid.
pub fn parse_text(block: &[u8]) -> Result<&str, ResponseParseError> {
    payload(block)
}
