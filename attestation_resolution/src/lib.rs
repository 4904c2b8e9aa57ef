//! Resolution of attestation votes against the canonical chain.
//!
//! Given an attestation, these functions work out which block root the attester
//! should have voted for — both the head vote and the target checkpoint vote — and
//! compare it with the root the attestation actually carries.
//!
//! Lookup by slot alone is not enough: a slot may be empty, or its only known block
//! may have been orphaned. The correct vote is the root of the first canonical
//! header at or below the starting slot, so every resolution walks backward with
//! [`canonical_header_at_or_below`] until it finds one.

use anyhow::{Context as _, Result};
use chaintime::ChainTime;
use header_cache::HeaderSource;
use log::trace;
use thiserror::Error;
use types::{
    combined::Attestation,
    nonstandard::{AttestationOutcome, BlockHeaderWithRoot},
    phase0::{
        consts::GENESIS_SLOT,
        primitives::{Slot, H256},
    },
};

#[derive(Debug, Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum Error {
    #[error("no canonical header found between slot {start_slot} and genesis")]
    NoCanonicalHeader { start_slot: Slot },
}

/// Returns the first canonical header at or below `start_slot`.
///
/// Slots without a header and slots whose only known headers are non-canonical are
/// skipped. The scan never moves forward: the canonical predecessor of any point in
/// chain history lies at or before it. Source errors abort the scan immediately and
/// are passed through verbatim; retrying is the caller's decision.
pub async fn canonical_header_at_or_below(
    source: &impl HeaderSource,
    start_slot: Slot,
) -> Result<BlockHeaderWithRoot> {
    let mut slot = start_slot;

    loop {
        match source.header_at_slot(slot).await? {
            Some(header) if header.canonical => return Ok(header),
            Some(_) => trace!("header at slot {slot} is not canonical"),
            None => trace!("no block at slot {slot}"),
        }

        if slot == GENESIS_SLOT {
            return Err(Error::NoCanonicalHeader { start_slot }.into());
        }

        slot -= 1;
    }
}

/// Returns the head root the attestation should have voted for.
pub async fn attestation_head(
    source: &impl HeaderSource,
    attestation: &Attestation,
) -> Result<H256> {
    let data = attestation
        .data()
        .context("failed to obtain attestation data")?;

    let header = canonical_header_at_or_below(source, data.slot).await?;

    Ok(header.root)
}

/// Compares the attestation's head vote with the head it should have voted for.
pub async fn attestation_head_outcome(
    source: &impl HeaderSource,
    attestation: &Attestation,
) -> Result<AttestationOutcome> {
    let data = attestation
        .data()
        .context("failed to obtain attestation data")?;

    let header = canonical_header_at_or_below(source, data.slot).await?;

    Ok(AttestationOutcome::compare(
        data.beacon_block_root,
        header.root,
    ))
}

/// Returns true if the attestation had the correct head.
pub async fn attestation_head_correct(
    source: &impl HeaderSource,
    attestation: &Attestation,
) -> Result<bool> {
    attestation_head_outcome(source, attestation)
        .await
        .map(AttestationOutcome::is_match)
}

/// Returns the target root the attestation should have voted for.
pub async fn attestation_target(
    source: &impl HeaderSource,
    chain_time: ChainTime,
    attestation: &Attestation,
) -> Result<H256> {
    let data = attestation
        .data()
        .context("failed to obtain attestation data")?;

    // The target vote refers to the first slot of the target epoch,
    // not to the slot the attestation was made in.
    let start_slot = chain_time.first_slot_of_epoch(data.target.epoch);
    let header = canonical_header_at_or_below(source, start_slot).await?;

    Ok(header.root)
}

/// Compares the attestation's target vote with the target it should have voted for.
pub async fn attestation_target_outcome(
    source: &impl HeaderSource,
    chain_time: ChainTime,
    attestation: &Attestation,
) -> Result<AttestationOutcome> {
    let data = attestation
        .data()
        .context("failed to obtain attestation data")?;

    let start_slot = chain_time.first_slot_of_epoch(data.target.epoch);
    let header = canonical_header_at_or_below(source, start_slot).await?;

    Ok(AttestationOutcome::compare(data.target.root, header.root))
}

/// Returns true if the attestation had the correct target.
pub async fn attestation_target_correct(
    source: &impl HeaderSource,
    chain_time: ChainTime,
    attestation: &Attestation,
) -> Result<bool> {
    attestation_target_outcome(source, chain_time, attestation)
        .await
        .map(AttestationOutcome::is_match)
}
