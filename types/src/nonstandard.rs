use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{AsRefStr, Display, EnumString};

use crate::phase0::{containers::BeaconBlockHeader, primitives::{Slot, H256}};

#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Sequence,
    AsRefStr,
    Display,
    EnumString,
    DeserializeFromStr,
    SerializeDisplay,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Phase {
    Phase0,
    Altair,
    Bellatrix,
    Capella,
    Deneb,
    Electra,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationOutcome {
    Match { root: H256 },
    Mismatch { expected: H256, actual: H256 },
}

impl AttestationOutcome {
    #[inline]
    #[must_use]
    pub fn compare(actual: H256, expected: H256) -> Self {
        if actual == expected {
            Self::Match { root: expected }
        } else {
            Self::Mismatch { expected, actual }
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Match { .. })
    }
}

/// A block header as reported by the standard `beacon/headers` endpoints,
/// together with its root and whether it is part of the canonical chain.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BlockHeaderWithRoot {
    pub root: H256,
    pub canonical: bool,
    pub header: BeaconBlockHeader,
}

impl BlockHeaderWithRoot {
    #[must_use]
    pub const fn slot(&self) -> Slot {
        self.header.slot
    }
}
