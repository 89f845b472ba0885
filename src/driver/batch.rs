// src/driver/batch.rs

use super::EzoDriver;
use crate::common::{
    address::I2cAddr,
    command::Command,
    error::{EzoError, LookupError},
    hal_traits::{EzoBus, EzoDelay},
    response::ResponseParseError,
    types::{Compensation, ModuleKind, Schedule, Selector, KIND_COUNT},
};
use core::time::Duration;
use heapless::Vec;

/// Most selectors a single batch query accepts.
pub const MAX_BATCH: usize = 16;

/// One result per requested selector, in request order.
pub type Readings<E> = Vec<Result<f32, EzoError<E>>, MAX_BATCH>;

/// Progress of one batch member.
enum Slot<E: core::fmt::Debug> {
    Resolved { address: I2cAddr, kind: ModuleKind },
    Commanded { address: I2cAddr },
    /// Same module as the earlier slot `first`, which carries the command.
    Shared { address: I2cAddr, first: usize },
    Done(Result<f32, EzoError<E>>),
}

impl<E: core::fmt::Debug> Slot<E> {
    fn into_result(self) -> Result<f32, EzoError<E>> {
        match self {
            Slot::Done(result) => result,
            // Never read back.
            Slot::Resolved { .. } | Slot::Commanded { .. } | Slot::Shared { .. } => {
                Err(EzoError::ModuleNotReady(ResponseParseError::NoData))
            }
        }
    }
}

impl<IF> EzoDriver<IF>
where
    IF: EzoBus + EzoDelay,
{
    /// Reads several modules and applies the current mode to each result.
    ///
    /// Fails as a whole only for caller mistakes: more than `MAX_BATCH`
    /// selectors or any invalid selector. Both are detected before the bus is used.
    pub fn read_many(
        &mut self,
        selectors: &[Selector],
        schedule: Schedule,
        compensation: Compensation,
    ) -> Result<Readings<IF::Error>, EzoError<IF::Error>> {
        let mode = self.config.mode;
        let results = self.measure_many(selectors, schedule, compensation)?;
        Ok(results.into_iter().map(|result| mode.apply(result)).collect())
    }

    /// Reads every registered module, in canonical kind order.
    pub fn read_all(&mut self, schedule: Schedule, compensation: Compensation) -> Result<Readings<IF::Error>, EzoError<IF::Error>> {
        let selectors: Vec<Selector, KIND_COUNT> = self.registry.kinds().map(Selector::Kind).collect();
        self.read_many(&selectors, schedule, compensation)
    }

    /// Like [`read_many`](Self::read_many) but never maps failures to sentinel values.
    pub fn measure_many(
        &mut self,
        selectors: &[Selector],
        schedule: Schedule,
        compensation: Compensation,
    ) -> Result<Readings<IF::Error>, EzoError<IF::Error>> {
        if selectors.len() > MAX_BATCH {
            return Err(EzoError::BufferOverflow { needed: selectors.len(), got: MAX_BATCH });
        }

        // 1. Resolve everything up front; absent modules fail only their own slot
        let mut slots: Vec<Slot<IF::Error>, MAX_BATCH> = Vec::new();
        for &selector in selectors {
            let slot = match self.registry.lookup(selector) {
                Ok(record) => Slot::Resolved { address: record.address, kind: record.kind },
                Err(e @ LookupError::ModuleNotPresent(_)) => Slot::Done(Err(e.into())),
                Err(e) => return Err(e.into()),
            };
            let _ = slots.push(slot);
        }

        // 2. Settle the compensation value, sharing a live temperature read with the batch
        let needs_temperature = slots
            .iter()
            .any(|slot| matches!(slot, Slot::Resolved { kind, .. } if kind.supports_compensation()));
        let temperature = match compensation {
            Compensation::Stored => None,
            Compensation::Explicit(t) => Some(self.config.normalize_temperature(t)),
            Compensation::Live if !needs_temperature => None,
            Compensation::Live => {
                let live = self.live_temperature();
                let value = live.as_ref().and_then(|(_, reading)| reading.as_ref().ok().copied());
                let value = self.live_or_default(value);
                if let Some((live_address, reading)) = live {
                    // The first slot for the temperature module takes the reading already made.
                    if let Some(slot) = slots
                        .iter_mut()
                        .find(|slot| matches!(slot, Slot::Resolved { address, .. } if *address == live_address))
                    {
                        *slot = Slot::Done(reading);
                    }
                }
                Some(value)
            }
        };

        // 3. Run the schedule
        match schedule {
            Schedule::Sequential => self.run_sequential(&mut slots, temperature),
            Schedule::Overlapped => self.run_overlapped(&mut slots, temperature),
        }

        Ok(slots.into_iter().map(Slot::into_result).collect())
    }

    fn run_sequential(&mut self, slots: &mut [Slot<IF::Error>], temperature: Option<f32>) {
        for slot in slots.iter_mut() {
            if let Slot::Resolved { address, kind } = *slot {
                *slot = Slot::Done(self.query(address, kind, temperature));
            }
        }
    }

    fn run_overlapped(&mut self, slots: &mut [Slot<IF::Error>], temperature: Option<f32>) {
        // Command every module back to back, once per address
        let mut wait = Duration::ZERO;
        for i in 0..slots.len() {
            let Slot::Resolved { address, kind } = slots[i] else { continue };
            let earlier = slots[..i]
                .iter()
                .position(|slot| matches!(slot, Slot::Commanded { address: a } if *a == address));
            slots[i] = match earlier {
                Some(first) => Slot::Shared { address, first },
                None => {
                    let command = Command::read_for(kind, temperature);
                    match self.transmit(address, &command) {
                        Ok(()) => {
                            wait = wait.max(self.config.timing.required_wait(kind, &command));
                            Slot::Commanded { address }
                        }
                        Err(e) => {
                            log::warn!("{} at {} not commanded: {}", kind, address, e);
                            Slot::Done(Err(e))
                        }
                    }
                }
            };
        }

        // One wait covers the slowest member
        self.wait(wait);

        for i in 0..slots.len() {
            let result = match slots[i] {
                Slot::Commanded { address } => self.read_measurement(address),
                Slot::Shared { address, first } => match slots[first] {
                    Slot::Done(Ok(value)) => Ok(value),
                    // The first read-back failed, so this slot reads for itself.
                    _ => self.read_measurement(address),
                },
                _ => continue,
            };
            slots[i] = Slot::Done(result);
        }
    }
}
