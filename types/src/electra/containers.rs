use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::phase0::{
    containers::AttestationData,
    primitives::{CommitteeIndex, SignatureBytes, ValidatorIndex},
};

#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SingleAttestation {
    #[serde_as(as = "DisplayFromStr")]
    pub committee_index: CommitteeIndex,
    #[serde_as(as = "DisplayFromStr")]
    pub attester_index: ValidatorIndex,
    pub data: AttestationData,
    pub signature: SignatureBytes,
}
