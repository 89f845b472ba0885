// src/driver/mock.rs

//! Simulated I2C bus populated with EZO modules, shared by the driver tests.

use crate::common::{
    address::I2cAddr,
    hal_traits::{EzoBus, EzoDelay},
    types::ModuleKind,
};
use std::collections::{BTreeMap, BTreeSet};
use std::string::{String, ToString};
use std::vec::Vec;

/// NACK or other transfer failure, tagged with the address involved (0 = none selected).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockBusError(pub u8);

/// One entry of the bus log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusOp {
    Write(u8, String),
    Read(u8),
    Delay(u32),
}

/// A module's behaviour: its identity, the value it reports and its processing times.
#[derive(Debug, Clone)]
pub struct SimModule {
    info: String,
    reading: String,
    read_ms: u64,
    compensated_read_ms: u64,
    replies: BTreeMap<String, String>,
    pending: Option<(String, u64)>,
    asleep: bool,
    led: bool,
    /// Last compensation temperature received via `RT,` or `T,`.
    pub temperature: Option<String>,
}

impl SimModule {
    /// A module of `kind` with datasheet-like processing times.
    pub fn new(kind: ModuleKind) -> Self {
        let (info, reading, read_ms, compensated_read_ms) = match kind {
            ModuleKind::Temperature => ("?I,RTD,2.01", "23.456", 600, 600),
            ModuleKind::Ph => ("?I,pH,2.10", "7.21", 900, 900),
            ModuleKind::Conductivity => ("?I,EC,2.10", "1413", 600, 900),
            ModuleKind::DissolvedOxygen => ("?I,DO,1.98", "8.34", 600, 900),
            ModuleKind::RedoxPotential => ("?I,ORP,2.01", "225.6", 900, 900),
            ModuleKind::Unknown => ("?I,CO2,1.0", "400", 900, 900),
        };
        SimModule {
            info: info.to_string(),
            reading: reading.to_string(),
            read_ms,
            compensated_read_ms,
            replies: BTreeMap::new(),
            pending: None,
            asleep: false,
            led: true,
            temperature: None,
        }
    }

    pub fn with_reading(mut self, reading: &str) -> Self {
        self.reading = reading.to_string();
        self
    }

    pub fn with_reply(mut self, command: &str, reply: &str) -> Self {
        self.replies.insert(command.to_string(), reply.to_string());
        self
    }

    pub fn put_to_sleep(&mut self) {
        self.asleep = true;
        self.pending = None;
    }

    pub fn is_asleep(&self) -> bool {
        self.asleep
    }

    pub fn led(&self) -> bool {
        self.led
    }

    /// Handles one command; returns the new address for `I2C,<n>`.
    fn accept(&mut self, text: &str, now: u64) -> Option<u8> {
        if self.asleep {
            // The first byte only wakes the module.
            self.asleep = false;
            self.pending = None;
            return None;
        }
        self.pending = None;
        if text == "R" {
            self.pending = Some((self.reading.clone(), now + self.read_ms));
        } else if let Some(t) = text.strip_prefix("RT,") {
            self.temperature = Some(t.to_string());
            self.pending = Some((self.reading.clone(), now + self.compensated_read_ms));
        } else if let Some(t) = text.strip_prefix("T,") {
            self.temperature = Some(t.to_string());
            self.pending = Some((String::new(), now + 300));
        } else if text == "L,1" || text == "L,0" {
            self.led = text == "L,1";
            self.pending = Some((String::new(), now + 300));
        } else if text == "Sleep" {
            self.asleep = true;
        } else if text == "I" {
            self.pending = Some((self.info.clone(), now + 300));
        } else if let Some(n) = text.strip_prefix("I2C,") {
            return n.parse().ok();
        } else {
            let reply = self.replies.get(text).cloned().unwrap_or_default();
            self.pending = Some((reply, now + 900));
        }
        None
    }

    /// Fills `buffer` with the status byte and reply, EZO style.
    fn respond(&mut self, buffer: &mut [u8], now: u64) {
        buffer.fill(0);
        if buffer.is_empty() {
            return;
        }
        match self.pending.take() {
            None => buffer[0] = 255,
            Some((reply, ready_at)) if now < ready_at => {
                buffer[0] = 254;
                self.pending = Some((reply, ready_at));
            }
            Some((reply, _)) => {
                buffer[0] = 1;
                let n = reply.len().min(buffer.len() - 1);
                buffer[1..1 + n].copy_from_slice(&reply.as_bytes()[..n]);
            }
        }
    }
}

/// The bus. Absent addresses NACK every transfer.
#[derive(Debug, Default)]
pub struct MockBus {
    modules: BTreeMap<u8, SimModule>,
    /// Devices that ACK but are not EZO modules.
    foreign: BTreeSet<u8>,
    selected: Option<u8>,
    now_ms: u64,
    pub log: Vec<BusOp>,
    fail_writes: BTreeSet<u8>,
    fail_reads: BTreeSet<u8>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, address: u8, module: SimModule) -> Self {
        self.modules.insert(address, module);
        self
    }

    /// Modules of the given kinds at their factory addresses.
    pub fn with_factory_modules(mut self, kinds: &[ModuleKind]) -> Self {
        for &kind in kinds {
            let address = kind.factory_address().map_or(0, |a| a.as_u8());
            self.modules.insert(address, SimModule::new(kind));
        }
        self
    }

    pub fn with_foreign_device(mut self, address: u8) -> Self {
        self.foreign.insert(address);
        self
    }

    pub fn fail_write_to(&mut self, address: u8) {
        self.fail_writes.insert(address);
    }

    pub fn fail_read_from(&mut self, address: u8) {
        self.fail_reads.insert(address);
    }

    pub fn module(&self, address: u8) -> Option<&SimModule> {
        self.modules.get(&address)
    }

    pub fn module_mut(&mut self, address: u8) -> Option<&mut SimModule> {
        self.modules.get_mut(&address)
    }

    pub fn module_addresses(&self) -> Vec<u8> {
        self.modules.keys().copied().collect()
    }

    pub fn advance_time(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }

    /// Commands written to `address`, in order.
    pub fn writes_to(&self, address: u8) -> Vec<String> {
        self.log
            .iter()
            .filter_map(|op| match op {
                BusOp::Write(a, text) if *a == address => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.log
            .iter()
            .filter_map(|op| match op {
                BusOp::Delay(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl EzoDelay for MockBus {
    fn delay_ms(&mut self, ms: u32) {
        self.log.push(BusOp::Delay(ms));
        self.advance_time(u64::from(ms));
    }
}

impl EzoBus for MockBus {
    type Error = MockBusError;

    fn select(&mut self, address: I2cAddr) -> Result<(), Self::Error> {
        self.selected = Some(address.as_u8());
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let address = self.selected.ok_or(MockBusError(0))?;
        let text = String::from_utf8_lossy(bytes).into_owned();
        self.log.push(BusOp::Write(address, text.clone()));
        if self.fail_writes.contains(&address) {
            return Err(MockBusError(address));
        }
        if self.foreign.contains(&address) {
            return Ok(());
        }
        let now = self.now_ms;
        let module = self.modules.get_mut(&address).ok_or(MockBusError(address))?;
        if let Some(new_address) = module.accept(&text, now) {
            if let Some(module) = self.modules.remove(&address) {
                self.modules.insert(new_address, module);
            }
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        let address = self.selected.ok_or(MockBusError(0))?;
        self.log.push(BusOp::Read(address));
        if self.fail_reads.contains(&address) {
            return Err(MockBusError(address));
        }
        if self.foreign.contains(&address) {
            buffer.fill(0xFF);
            return Ok(());
        }
        let now = self.now_ms;
        let module = self.modules.get_mut(&address).ok_or(MockBusError(address))?;
        module.respond(buffer, now);
        Ok(())
    }
}
