use derive_more::From;
use thiserror::Error;

use crate::{
    electra::containers::SingleAttestation,
    nonstandard::Phase,
    phase0::containers::{Attestation as Phase0Attestation, AttestationData},
};

#[derive(Debug, Error)]
pub enum AttestationError {
    #[error("attestation is from an unrecognized phase: {phase}")]
    UnrecognizedPhase { phase: String },
}

/// An attestation as obtained from a node, tagged with the phase it was encoded in.
///
/// Nodes running forks newer than this crate knows about still serve attestations.
/// Those are preserved as [`Attestation::Unrecognized`] so that callers can decide
/// how to handle them instead of failing at deserialization time.
#[derive(Clone, PartialEq, Eq, Debug, From)]
pub enum Attestation {
    Phase0(Phase0Attestation),
    Electra(SingleAttestation),
    #[from(ignore)]
    Unrecognized { phase: String },
}

impl Attestation {
    pub fn data(&self) -> Result<AttestationData, AttestationError> {
        match self {
            Self::Phase0(attestation) => Ok(attestation.data),
            Self::Electra(attestation) => Ok(attestation.data),
            Self::Unrecognized { phase } => Err(AttestationError::UnrecognizedPhase {
                phase: phase.clone(),
            }),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Option<Phase> {
        match self {
            Self::Phase0(_) => Some(Phase::Phase0),
            Self::Electra(_) => Some(Phase::Electra),
            Self::Unrecognized { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::phase0::primitives::H256;

    use super::*;

    #[test]
    fn data_is_extracted_from_recognized_phases() {
        let data = AttestationData {
            slot: 777,
            beacon_block_root: H256::repeat_byte(1),
            ..AttestationData::default()
        };

        let phase0 = Attestation::from(Phase0Attestation {
            data,
            ..Phase0Attestation::default()
        });

        assert_eq!(phase0.phase(), Some(Phase::Phase0));
        assert_eq!(phase0.data().expect("phase0 attestations carry data"), data);
    }

    #[test]
    fn data_extraction_fails_for_unrecognized_phases() {
        let attestation = Attestation::Unrecognized {
            phase: "fulu".to_owned(),
        };

        assert_eq!(attestation.phase(), None);
        attestation
            .data()
            .expect_err("attestations from unrecognized phases have no usable data");
    }
}
