// src/common/types.rs

use super::address::I2cAddr;
use super::error::{EzoError, LookupError};
use core::fmt;
use core::str::FromStr;

/// Number of module kinds a registry can hold (every kind except `Unknown`).
pub const KIND_COUNT: usize = 5;

/// The chemistry a module measures, as reported by its `I` (info) command.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModuleKind {
    /// RTD temperature probe.
    Temperature,
    Ph,
    /// Electrical conductivity.
    Conductivity,
    DissolvedOxygen,
    /// Oxidation-reduction potential.
    RedoxPotential,
    Unknown,
}

impl ModuleKind {
    /// Registry order. Discovery results and `read_all` follow it.
    pub const CANONICAL: [ModuleKind; KIND_COUNT] = [
        ModuleKind::Temperature,
        ModuleKind::Ph,
        ModuleKind::Conductivity,
        ModuleKind::DissolvedOxygen,
        ModuleKind::RedoxPotential,
    ];

    /// Slot in `CANONICAL`, `None` for `Unknown`.
    pub const fn index(self) -> Option<usize> {
        match self {
            ModuleKind::Temperature => Some(0),
            ModuleKind::Ph => Some(1),
            ModuleKind::Conductivity => Some(2),
            ModuleKind::DissolvedOxygen => Some(3),
            ModuleKind::RedoxPotential => Some(4),
            ModuleKind::Unknown => None,
        }
    }

    /// Short lowercase name, also accepted as a text selector.
    pub const fn name(self) -> &'static str {
        match self {
            ModuleKind::Temperature => "rtd",
            ModuleKind::Ph => "ph",
            ModuleKind::Conductivity => "ec",
            ModuleKind::DissolvedOxygen => "do",
            ModuleKind::RedoxPotential => "orp",
            ModuleKind::Unknown => "unknown",
        }
    }

    /// Looks up a kind by its short name or firmware identity name (`RTD`, `pH`, ...).
    ///
    /// Matching is ASCII case-insensitive. `Unknown` is never returned.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::CANONICAL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Unit label of the readings this module produces.
    pub const fn unit(self) -> &'static str {
        match self {
            ModuleKind::Temperature => "°C",
            ModuleKind::Ph => "",
            ModuleKind::Conductivity => "uS/cm",
            ModuleKind::DissolvedOxygen => "mg/L",
            ModuleKind::RedoxPotential => "mV",
            ModuleKind::Unknown => "u",
        }
    }

    /// Address the module ships with.
    pub const fn factory_address(self) -> Option<I2cAddr> {
        match self {
            ModuleKind::Temperature => Some(I2cAddr::new_unchecked(102)),
            ModuleKind::Ph => Some(I2cAddr::new_unchecked(99)),
            ModuleKind::Conductivity => Some(I2cAddr::new_unchecked(100)),
            ModuleKind::DissolvedOxygen => Some(I2cAddr::new_unchecked(97)),
            ModuleKind::RedoxPotential => Some(I2cAddr::new_unchecked(98)),
            ModuleKind::Unknown => None,
        }
    }

    /// Whether readings accept a temperature value (`RT,<t>` / `T,<t>`).
    pub const fn supports_compensation(self) -> bool {
        matches!(
            self,
            ModuleKind::Ph | ModuleKind::Conductivity | ModuleKind::DissolvedOxygen
        )
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies a module either by bus address or by kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Raw address, validated against 1..=127 when resolved.
    Address(u8),
    Kind(ModuleKind),
}

impl From<ModuleKind> for Selector {
    fn from(kind: ModuleKind) -> Self {
        Selector::Kind(kind)
    }
}

impl From<u8> for Selector {
    fn from(raw: u8) -> Self {
        Selector::Address(raw)
    }
}

impl From<I2cAddr> for Selector {
    fn from(address: I2cAddr) -> Self {
        Selector::Address(address.as_u8())
    }
}

impl FromStr for Selector {
    type Err = LookupError;

    /// Accepts a decimal address (`"99"`) or a kind name (`"ph"`, `"EC"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(kind) = ModuleKind::from_name(s) {
            return Ok(Selector::Kind(kind));
        }
        s.parse::<u8>()
            .map(Selector::Address)
            .map_err(|_| LookupError::InvalidSelector)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Address(raw) => write!(f, "address {}", raw),
            Selector::Kind(kind) => write!(f, "{} module", kind),
        }
    }
}

/// Where the temperature used for a compensated reading comes from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Compensation {
    /// Plain read; the module uses whatever temperature it last stored.
    Stored,
    /// Use this value for this query only.
    Explicit(f32),
    /// Read the registered temperature module first and use its value.
    Live,
}

/// How measurement failures surface at the public API.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Failed measurements come back as legacy sentinel values.
    #[default]
    Operational,
    /// Every failure propagates as an error.
    Development,
}

impl Mode {
    pub const fn toggled(self) -> Self {
        match self {
            Mode::Operational => Mode::Development,
            Mode::Development => Mode::Operational,
        }
    }

    /// Applies this mode's policy to a measurement outcome.
    pub fn apply<E: fmt::Debug>(self, outcome: Result<f32, EzoError<E>>) -> Result<f32, EzoError<E>> {
        match (self, outcome) {
            (Mode::Operational, Err(error)) => match error.sentinel() {
                Some(value) => {
                    log::debug!("reporting {} as {}", error, value);
                    Ok(value)
                }
                None => Err(error),
            },
            (_, outcome) => outcome,
        }
    }
}

impl FromStr for Mode {
    type Err = EzoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("op") {
            Ok(Mode::Operational)
        } else if s.eq_ignore_ascii_case("dev") {
            Ok(Mode::Development)
        } else {
            Err(EzoError::InvalidMode)
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Operational => f.write_str("op"),
            Mode::Development => f.write_str("dev"),
        }
    }
}

/// Batch scheduling strategy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Schedule {
    /// Command, wait and read each module before moving to the next.
    #[default]
    Sequential,
    /// Command every module, wait once, then read them all.
    Overlapped,
}
