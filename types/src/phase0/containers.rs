use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::phase0::primitives::{
    AggregateSignatureBytes, CommitteeIndex, Epoch, Slot, ValidatorIndex, H256,
};

// Standard Beacon API endpoints represent numbers as JSON strings.
// `DisplayFromStr` matches that convention for every numeric field below.

#[serde_as]
#[derive(Clone, PartialEq, Eq, Default, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Attestation {
    #[serde(with = "impl_serde::serialize")]
    pub aggregation_bits: Vec<u8>,
    pub data: AttestationData,
    pub signature: AggregateSignatureBytes,
}

#[serde_as]
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug, Deserialize, Serialize,
)]
#[serde(deny_unknown_fields)]
pub struct AttestationData {
    #[serde_as(as = "DisplayFromStr")]
    pub slot: Slot,
    #[serde_as(as = "DisplayFromStr")]
    pub index: CommitteeIndex,
    pub beacon_block_root: H256,
    pub source: Checkpoint,
    pub target: Checkpoint,
}

#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BeaconBlockHeader {
    #[serde_as(as = "DisplayFromStr")]
    pub slot: Slot,
    #[serde_as(as = "DisplayFromStr")]
    pub proposer_index: ValidatorIndex,
    pub parent_root: H256,
    pub state_root: H256,
    pub body_root: H256,
}

#[serde_as]
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug, Deserialize, Serialize,
)]
#[serde(deny_unknown_fields)]
pub struct Checkpoint {
    #[serde_as(as = "DisplayFromStr")]
    pub epoch: Epoch,
    pub root: H256,
}
