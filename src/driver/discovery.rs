// src/driver/discovery.rs

use super::{registry::ModuleRecord, EzoDriver};
use crate::common::{
    address::I2cAddr,
    command::Command,
    error::EzoError,
    hal_traits::{EzoBus, EzoDelay},
    response::parse_identity,
    types::{ModuleKind, Selector, KIND_COUNT},
};
use heapless::Vec;

/// Every address on the bus could answer a probe.
const ADDRESS_SPACE: usize = I2cAddr::MAX as usize;

impl<IF> EzoDriver<IF>
where
    IF: EzoBus + EzoDelay,
{
    /// Rebuilds the registry from what is on the bus. Returns the number of modules found.
    ///
    /// Devices that do not identify as a known EZO module are skipped.
    pub fn scan(&mut self) -> usize {
        self.registry.clear();
        let short = self.config.timing.short;
        self.wait(short);

        // Sleeping modules ignore their first byte, so wake everything. Most addresses NACK.
        for address in I2cAddr::all() {
            let _ = self.transmit(address, &Command::Wake);
        }
        self.wait(short);

        let mut present: Vec<I2cAddr, ADDRESS_SPACE> = Vec::new();
        for address in I2cAddr::all() {
            if self.probe(address) {
                let _ = present.push(address);
            }
        }
        self.wait(short);

        let mut asked: Vec<I2cAddr, ADDRESS_SPACE> = Vec::new();
        for &address in present.iter() {
            match self.transmit(address, &Command::Info) {
                Ok(()) => {
                    let _ = asked.push(address);
                }
                Err(e) => log::warn!("no info request to {}: {}", address, e),
            }
        }
        let info_wait = self.config.timing.required_wait(ModuleKind::Unknown, &Command::Info);
        self.wait(info_wait);

        for &address in asked.iter() {
            let identity = match self.read_block(address) {
                Ok(block) => parse_identity(&block),
                Err(e) => {
                    log::warn!("no info reply from {}: {}", address, e);
                    continue;
                }
            };
            if !identity.is_known() {
                log::warn!("skipping unidentified device at {}", address);
                continue;
            }
            match self.registry.insert(ModuleRecord::from_identity(identity, address)) {
                Ok(()) => log::info!("found {} v{} at {}", identity.kind, identity.version, address),
                Err(e) => log::warn!("skipping {} at {}: {}", identity.kind, address, e),
            }
        }

        // Let the modules finish answering before the first read.
        self.wait(short);
        log::info!("scan found {} module(s)", self.registry.len());
        self.registry.len()
    }

    /// Moves a module to `new_address`.
    ///
    /// The destination must be in 1..=127 and not used by another registered module.
    /// Blocks while the module reboots on its new address.
    pub fn change_address(&mut self, selector: impl Into<Selector>, new_address: u8) -> Result<(), EzoError<IF::Error>> {
        let record = *self.registry.lookup(selector.into())?;
        let target = self.registry.check_available(new_address)?;
        self.move_module(record, target)
    }

    /// Moves every registered module back to its factory address.
    ///
    /// Modules are first parked on free addresses so that two modules never
    /// share an address while they swap places.
    pub fn reset_addresses(&mut self) -> Result<(), EzoError<IF::Error>> {
        let records: Vec<ModuleRecord, KIND_COUNT> = self.registry.all_records().copied().collect();

        // 1. Park every module that is not already home
        for record in records.iter() {
            if Some(record.address) == record.kind.factory_address() {
                continue;
            }
            let parking = self.free_scratch_address().ok_or(EzoError::AddressConflict(record.address.as_u8()))?;
            self.move_module(*record, parking)?;
        }

        // 2. Send each parked module home
        let parked: Vec<ModuleRecord, KIND_COUNT> = self.registry.all_records().copied().collect();
        for record in parked.iter() {
            let Some(home) = record.kind.factory_address() else { continue };
            if record.address == home {
                continue;
            }
            if self.probe(home) {
                // Something outside the registry already answers there.
                return Err(EzoError::AddressConflict(home.as_u8()));
            }
            self.move_module(*record, home)?;
        }
        Ok(())
    }

    fn move_module(&mut self, record: ModuleRecord, target: I2cAddr) -> Result<(), EzoError<IF::Error>> {
        let command = Command::ChangeAddress { new_address: target };
        self.transmit(record.address, &command)?;
        self.registry.replace_address(record.address, target.as_u8())?;
        log::info!("{} moved from {} to {}", record.kind, record.address, target);
        let wait = self.config.timing.required_wait(record.kind, &command);
        self.wait(wait);
        Ok(())
    }

    /// Lowest address that is not a factory default, not registered and silent.
    fn free_scratch_address(&mut self) -> Option<I2cAddr> {
        for address in I2cAddr::all() {
            let reserved = ModuleKind::CANONICAL.iter().any(|kind| kind.factory_address() == Some(address));
            if reserved || self.registry.contains_address(address) {
                continue;
            }
            if !self.probe(address) {
                return Some(address);
            }
        }
        None
    }
}
