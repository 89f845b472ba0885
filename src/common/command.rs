//! EZO command definitions.
//!
//! Commands are short ASCII strings written to the module's I2C address with no
//! terminator. Numeric arguments use a fixed, locale-free decimal format.

use core::fmt::{self, Write};

use arrayvec::ArrayString;

use super::{address::I2cAddr, types::ModuleKind};

/// Longest encoded command accepted by the modules.
pub const MAX_COMMAND_LEN: usize = 32;

/// Buffer holding one encoded command.
pub type CommandBuffer = ArrayString<MAX_COMMAND_LEN>;

/// Represents an EZO command.
///
/// The `Display` implementation produces the wire text; `format_into` adds the
/// length and character checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command<'a> {
    /// Single reading (`R`).
    Read,
    /// Single reading compensated for the given temperature (`RT,<t>`).
    ReadCompensated { temperature: f32 },
    /// Store a compensation temperature in the module (`T,<t>`).
    SetTemperature { temperature: f32 },
    /// LED on/off (`L,1` / `L,0`).
    Led { on: bool },
    /// Any byte wakes a sleeping module; the LED-on command doubles as wake.
    Wake,
    /// Low-power sleep (`Sleep`).
    Sleep,
    /// Move the module to a new bus address (`I2C,<n>`). The module reboots afterwards.
    ChangeAddress { new_address: I2cAddr },
    /// Device information (`I`), answered with `?I,<NAME>,<VERSION>`.
    Info,
    /// Raw command text, passed through verbatim.
    Custom(&'a str),
}

/// Reasons a command cannot be encoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CommandFormatError {
    /// Encoded text does not fit `MAX_COMMAND_LEN`.
    TooLong,
    /// Custom command text was empty.
    Empty,
    /// Custom command text contains a byte outside printable ASCII.
    NonPrintable,
}

impl fmt::Display for CommandFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandFormatError::TooLong => write!(f, "command longer than {} bytes", MAX_COMMAND_LEN),
            CommandFormatError::Empty => f.write_str("empty command"),
            CommandFormatError::NonPrintable => f.write_str("command contains non-printable characters"),
        }
    }
}

impl Command<'_> {
    /// Builds the read command for a module of `kind`.
    ///
    /// Temperature and redox modules never take compensation, so they always get `R`.
    pub fn read_for(kind: ModuleKind, temperature: Option<f32>) -> Command<'static> {
        match temperature {
            Some(temperature) if kind.supports_compensation() => {
                Command::ReadCompensated { temperature }
            }
            _ => Command::Read,
        }
    }

    /// True for `Read` and `ReadCompensated`.
    pub const fn is_read(&self) -> bool {
        matches!(self, Command::Read | Command::ReadCompensated { .. })
    }

    /// Encodes the command into a fixed-size buffer, validating custom text.
    pub fn format_into(&self) -> Result<CommandBuffer, CommandFormatError> {
        if let Command::Custom(text) = self {
            if text.is_empty() {
                return Err(CommandFormatError::Empty);
            }
            if !text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
                return Err(CommandFormatError::NonPrintable);
            }
        }
        let mut buffer = CommandBuffer::new();
        write!(buffer, "{}", self).map_err(|_| CommandFormatError::TooLong)?;
        Ok(buffer)
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Read => f.write_str("R"),
            Command::ReadCompensated { temperature } => {
                f.write_str("RT,")?;
                write_decimal(f, *temperature)
            }
            Command::SetTemperature { temperature } => {
                f.write_str("T,")?;
                write_decimal(f, *temperature)
            }
            Command::Led { on: true } | Command::Wake => f.write_str("L,1"),
            Command::Led { on: false } => f.write_str("L,0"),
            Command::Sleep => f.write_str("Sleep"),
            Command::ChangeAddress { new_address } => write!(f, "I2C,{}", new_address),
            Command::Info => f.write_str("I"),
            Command::Custom(text) => f.write_str(text),
        }
    }
}

/// Writes `value` with up to three decimals, trailing zeros trimmed but at least
/// one decimal kept (`25.0`, `23.456`, `82.4`).
fn write_decimal<W: Write>(out: &mut W, value: f32) -> fmt::Result {
    // Sign, 39 integer digits for f32::MAX, point and three decimals.
    let mut digits = ArrayString::<48>::new();
    write!(digits, "{:.3}", value)?;
    let trimmed = digits.trim_end_matches('0');
    let end = if trimmed.ends_with('.') { trimmed.len() + 1 } else { trimmed.len() };
    out.write_str(&digits[..end])
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn addr(raw: u8) -> I2cAddr {
        I2cAddr::new(raw).unwrap()
    }

    fn encoded(command: Command<'_>) -> CommandBuffer {
        command.format_into().unwrap()
    }

    #[test]
    fn test_command_formatting() {
        assert_eq!(encoded(Command::Read).as_str(), "R");
        assert_eq!(encoded(Command::ReadCompensated { temperature: 25.0 }).as_str(), "RT,25.0");
        assert_eq!(encoded(Command::SetTemperature { temperature: 19.5 }).as_str(), "T,19.5");
        assert_eq!(encoded(Command::Led { on: true }).as_str(), "L,1");
        assert_eq!(encoded(Command::Led { on: false }).as_str(), "L,0");
        assert_eq!(encoded(Command::Wake).as_str(), "L,1");
        assert_eq!(encoded(Command::Sleep).as_str(), "Sleep");
        assert_eq!(encoded(Command::ChangeAddress { new_address: addr(42) }).as_str(), "I2C,42");
        assert_eq!(encoded(Command::Info).as_str(), "I");
        assert_eq!(encoded(Command::Custom("Cal,?")).as_str(), "Cal,?");
    }

    #[test]
    fn test_decimal_format() {
        assert_eq!(Command::SetTemperature { temperature: 23.456 }.to_string(), "T,23.456");
        assert_eq!(Command::SetTemperature { temperature: 82.4 }.to_string(), "T,82.4");
        assert_eq!(Command::SetTemperature { temperature: 0.0 }.to_string(), "T,0.0");
        assert_eq!(Command::SetTemperature { temperature: 100.0 }.to_string(), "T,100.0");
        assert_eq!(Command::SetTemperature { temperature: 21.1004 }.to_string(), "T,21.1");
        assert_eq!(Command::SetTemperature { temperature: -5.25 }.to_string(), "T,-5.25");
    }

    #[test]
    fn test_read_for() {
        assert_eq!(Command::read_for(ModuleKind::Ph, Some(25.0)), Command::ReadCompensated { temperature: 25.0 });
        assert_eq!(Command::read_for(ModuleKind::Ph, None), Command::Read);
        assert_eq!(Command::read_for(ModuleKind::Temperature, Some(25.0)), Command::Read);
        assert_eq!(Command::read_for(ModuleKind::RedoxPotential, Some(25.0)), Command::Read);
        assert_eq!(
            Command::read_for(ModuleKind::DissolvedOxygen, Some(12.5)),
            Command::ReadCompensated { temperature: 12.5 }
        );
        assert!(Command::read_for(ModuleKind::Conductivity, None).is_read());
        assert!(!Command::Info.is_read());
    }

    #[test]
    fn test_custom_validation() {
        assert_eq!(Command::Custom("").format_into(), Err(CommandFormatError::Empty));
        assert_eq!(Command::Custom("Cal\r").format_into(), Err(CommandFormatError::NonPrintable));
        assert_eq!(Command::Custom("Nämé").format_into(), Err(CommandFormatError::NonPrintable));
        let long = "X".repeat(MAX_COMMAND_LEN + 1);
        assert_eq!(Command::Custom(&long).format_into(), Err(CommandFormatError::TooLong));
        let fits = "X".repeat(MAX_COMMAND_LEN);
        assert!(Command::Custom(&fits).format_into().is_ok());
    }

    #[test]
    fn test_huge_temperature_is_too_long() {
        let result = Command::ReadCompensated { temperature: f32::MAX }.format_into();
        assert_eq!(result, Err(CommandFormatError::TooLong));
    }

    proptest! {
        #[test]
        fn prop_compensated_read_round_trips_to_three_decimals(t in 0.0f32..=100.0) {
            let text = encoded(Command::ReadCompensated { temperature: t });
            let value = text.as_str().strip_prefix("RT,").unwrap();
            prop_assert!(value.contains('.'));
            prop_assert!(!value.ends_with('0') || value.ends_with(".0"));
            let parsed: f32 = value.parse().unwrap();
            prop_assert!((parsed - t).abs() <= 0.0005 + f32::EPSILON * 100.0);
        }
    }
}
