//! Epoch and slot arithmetic for a running chain.
//!
//! Unlike a full consensus client, this tool connects to arbitrary networks whose
//! timing parameters are only known at runtime, so [`ChainTime`] carries them as
//! values instead of hard-coding them through a preset type parameter.

use core::{num::NonZeroU64, time::Duration};

use types::phase0::{
    consts::GENESIS_SLOT,
    primitives::{Epoch, Slot, UnixSeconds},
};

#[derive(Clone, Copy, Debug)]
pub struct ChainTime {
    genesis_time: UnixSeconds,
    slot_duration: Duration,
    slots_per_epoch: NonZeroU64,
}

impl ChainTime {
    #[must_use]
    pub const fn new(
        genesis_time: UnixSeconds,
        slot_duration: Duration,
        slots_per_epoch: NonZeroU64,
    ) -> Self {
        Self {
            genesis_time,
            slot_duration,
            slots_per_epoch,
        }
    }

    #[must_use]
    pub const fn genesis_time(self) -> UnixSeconds {
        self.genesis_time
    }

    #[must_use]
    pub const fn first_slot_of_epoch(self, epoch: Epoch) -> Slot {
        epoch.saturating_mul(self.slots_per_epoch.get())
    }

    #[must_use]
    pub const fn epoch_at_slot(self, slot: Slot) -> Epoch {
        slot / self.slots_per_epoch.get()
    }

    #[must_use]
    pub const fn slots_since_epoch_start(self, slot: Slot) -> u64 {
        slot - self.first_slot_of_epoch(self.epoch_at_slot(slot))
    }

    #[must_use]
    pub const fn is_epoch_start(self, slot: Slot) -> bool {
        self.slots_since_epoch_start(slot) == 0
    }

    /// Returns the time at which the given slot begins.
    ///
    /// Saturates instead of overflowing. The chain will have ended long before the
    /// saturation point is reachable.
    #[must_use]
    pub fn start_of_slot(self, slot: Slot) -> UnixSeconds {
        let since_genesis = (slot - GENESIS_SLOT).saturating_mul(self.slot_duration.as_secs());
        self.genesis_time.saturating_add(since_genesis)
    }

    /// Returns the slot in progress at the given time.
    /// Times before genesis are clamped to [`GENESIS_SLOT`].
    #[must_use]
    pub fn slot_at_time(self, time: UnixSeconds) -> Slot {
        let Some(since_genesis) = time.checked_sub(self.genesis_time) else {
            return GENESIS_SLOT;
        };

        GENESIS_SLOT + since_genesis / self.slot_duration.as_secs().max(1)
    }

    #[must_use]
    pub fn epoch_at_time(self, time: UnixSeconds) -> Epoch {
        self.epoch_at_slot(self.slot_at_time(time))
    }
}
