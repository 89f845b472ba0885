// src/driver/registry.rs

use crate::common::{
    address::I2cAddr,
    error::LookupError,
    response::Identity,
    types::{ModuleKind, Selector, KIND_COUNT},
};

/// One discovered module.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleRecord {
    pub kind: ModuleKind,
    pub address: I2cAddr,
    pub unit: &'static str,
    pub version: f32,
}

impl ModuleRecord {
    pub const fn new(kind: ModuleKind, address: I2cAddr, version: f32) -> Self {
        ModuleRecord { kind, address, unit: kind.unit(), version }
    }

    pub const fn from_identity(identity: Identity, address: I2cAddr) -> Self {
        ModuleRecord { kind: identity.kind, address, unit: identity.unit, version: identity.version }
    }
}

/// Which module lives where. One slot per known kind, kept in canonical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleRegistry {
    slots: [Option<ModuleRecord>; KIND_COUNT],
}

impl ModuleRegistry {
    pub const fn new() -> Self {
        ModuleRegistry { slots: [None; KIND_COUNT] }
    }

    /// Adds a record. Rejects `Unknown` kinds, a second module of the same
    /// kind and an address already in use.
    pub fn insert(&mut self, record: ModuleRecord) -> Result<(), LookupError> {
        let slot = record.kind.index().ok_or(LookupError::InvalidSelector)?;
        if self.slots[slot].is_some() {
            return Err(LookupError::DuplicateKind(record.kind));
        }
        if self.contains_address(record.address) {
            return Err(LookupError::AddressConflict(record.address.as_u8()));
        }
        self.slots[slot] = Some(record);
        Ok(())
    }

    /// Finds the record a selector refers to.
    pub fn lookup(&self, selector: Selector) -> Result<&ModuleRecord, LookupError> {
        match selector {
            Selector::Address(raw) => {
                let address = I2cAddr::new(raw)?;
                self.all_records()
                    .find(|record| record.address == address)
                    .ok_or(LookupError::ModuleNotPresent(selector))
            }
            Selector::Kind(kind) => {
                let slot = kind.index().ok_or(LookupError::InvalidSelector)?;
                self.slots[slot].as_ref().ok_or(LookupError::ModuleNotPresent(selector))
            }
        }
    }

    pub fn resolve(&self, selector: Selector) -> Result<I2cAddr, LookupError> {
        self.lookup(selector).map(|record| record.address)
    }

    pub fn record_for(&self, address: I2cAddr) -> Result<&ModuleRecord, LookupError> {
        self.lookup(Selector::from(address))
    }

    /// Validates `raw` as a destination for an address change.
    pub fn check_available(&self, raw: u8) -> Result<I2cAddr, LookupError> {
        let address = I2cAddr::new(raw).map_err(|_| LookupError::AddressConflict(raw))?;
        if self.contains_address(address) {
            return Err(LookupError::AddressConflict(raw));
        }
        Ok(address)
    }

    /// Moves the module at `old` to `new`. On failure the registry is unchanged.
    pub fn replace_address(&mut self, old: I2cAddr, new: u8) -> Result<&ModuleRecord, LookupError> {
        let new_address = self.check_available(new)?;
        let record = self
            .slots
            .iter_mut()
            .flatten()
            .find(|record| record.address == old)
            .ok_or(LookupError::ModuleNotPresent(Selector::from(old)))?;
        record.address = new_address;
        Ok(&*record)
    }

    /// Every record, in canonical kind order.
    pub fn all_records(&self) -> impl Iterator<Item = &ModuleRecord> + '_ {
        self.slots.iter().flatten()
    }

    pub fn addresses(&self) -> impl Iterator<Item = I2cAddr> + '_ {
        self.all_records().map(|record| record.address)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ModuleKind> + '_ {
        self.all_records().map(|record| record.kind)
    }

    pub fn units(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.all_records().map(|record| record.unit)
    }

    pub fn versions(&self) -> impl Iterator<Item = f32> + '_ {
        self.all_records().map(|record| record.version)
    }

    pub fn has(&self, kind: ModuleKind) -> bool {
        kind.index().map_or(false, |slot| self.slots[slot].is_some())
    }

    pub fn contains_address(&self, address: I2cAddr) -> bool {
        self.addresses().any(|a| a == address)
    }

    pub fn len(&self) -> usize {
        self.all_records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.slots = [None; KIND_COUNT];
    }
}
