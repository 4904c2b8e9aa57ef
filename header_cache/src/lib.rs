//! Memoizing storage for beacon block headers looked up by slot.
//!
//! Vote resolution scans headers slot by slot, often revisiting the same slots for
//! every attestation under analysis. [`BlockHeaderCache`] sits between the resolver
//! and the actual retrieval backend and guarantees that the backend is consulted at
//! most once per slot, including for slots that turn out to be empty.

use std::collections::HashMap;

use anyhow::{ensure, Result};
use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;
use types::{nonstandard::BlockHeaderWithRoot, phase0::primitives::Slot};

/// Answers "what header, if any, is known for slot S, and is it canonical?".
///
/// `Ok(None)` means no block is known for the slot; it is not an error. Headers of
/// orphaned blocks are returned with `canonical` set to `false`. Implementations
/// must be safe for concurrent invocation. Callers cancel an in-flight lookup by
/// dropping the returned future.
#[async_trait]
pub trait HeaderSource: Send + Sync {
    async fn header_at_slot(&self, slot: Slot) -> Result<Option<BlockHeaderWithRoot>>;
}

/// The underlying header retrieval, typically backed by a node's Beacon API or a
/// local store. Same contract as [`HeaderSource`], minus any memoization.
#[async_trait]
pub trait HeaderProvider: Send + Sync {
    async fn header_at_slot(&self, slot: Slot) -> Result<Option<BlockHeaderWithRoot>>;
}

pub struct BlockHeaderCache<P> {
    provider: P,
    // Memoizes absences too. An empty slot stays empty for a fixed point in chain
    // history, and resolution scans hit empty slots constantly.
    headers: RwLock<HashMap<Slot, Option<BlockHeaderWithRoot>>>,
}

impl<P> BlockHeaderCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            headers: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.headers.read().await.len()
    }

    /// Drops memoized entries below the given slot.
    /// Eviction policy is the caller's; finalized history is typically safe to drop
    /// once every attestation referring to it has been processed.
    pub async fn prune_below(&self, slot: Slot) {
        self.headers
            .write()
            .await
            .retain(|cached_slot, _| *cached_slot >= slot);
    }
}

#[async_trait]
impl<P: HeaderProvider> HeaderSource for BlockHeaderCache<P> {
    async fn header_at_slot(&self, slot: Slot) -> Result<Option<BlockHeaderWithRoot>> {
        if let Some(header) = self.headers.read().await.get(&slot) {
            return Ok(*header);
        }

        // The write lock is held across the provider call so that concurrent
        // lookups for a not yet memoized slot consult the provider only once.
        let mut headers = self.headers.write().await;

        if let Some(header) = headers.get(&slot) {
            return Ok(*header);
        }

        let header = self.provider.header_at_slot(slot).await?;

        if let Some(header) = header {
            ensure!(
                header.slot() == slot,
                "provider returned a header for slot {} when asked for slot {slot}",
                header.slot(),
            );
        } else {
            debug!("no header known for slot {slot}");
        }

        headers.insert(slot, header);

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::bail;
    use hex_literal::hex;
    use types::phase0::{containers::BeaconBlockHeader, primitives::H256};

    use super::*;

    struct TestProvider {
        headers: HashMap<Slot, BlockHeaderWithRoot>,
        misreport_slots: bool,
        fail_first_call: AtomicUsize,
        calls: AtomicUsize,
    }

    impl TestProvider {
        fn new(headers: impl IntoIterator<Item = BlockHeaderWithRoot>) -> Self {
            Self {
                headers: headers
                    .into_iter()
                    .map(|header| (header.slot(), header))
                    .collect(),
                misreport_slots: false,
                fail_first_call: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HeaderProvider for TestProvider {
        async fn header_at_slot(&self, slot: Slot) -> Result<Option<BlockHeaderWithRoot>> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.fail_first_call.swap(0, Ordering::SeqCst) > 0 {
                bail!("provider failure");
            }

            let mut header = self.headers.get(&slot).copied();

            if self.misreport_slots {
                if let Some(header) = header.as_mut() {
                    header.header.slot += 1;
                }
            }

            Ok(header)
        }
    }

    fn header_at(slot: Slot, canonical: bool) -> BlockHeaderWithRoot {
        BlockHeaderWithRoot {
            root: H256(hex!(
                "2222222222222222222222222222222222222222222222222222222222222222"
            )),
            canonical,
            header: BeaconBlockHeader {
                slot,
                ..BeaconBlockHeader::default()
            },
        }
    }

    #[tokio::test]
    async fn present_headers_are_memoized() -> Result<()> {
        let cache = BlockHeaderCache::new(TestProvider::new([header_at(5, true)]));

        let first = cache.header_at_slot(5).await?;
        let second = cache.header_at_slot(5).await?;

        assert_eq!(first, Some(header_at(5, true)));
        assert_eq!(second, first);
        assert_eq!(cache.provider.calls(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn absences_are_memoized() -> Result<()> {
        let cache = BlockHeaderCache::new(TestProvider::new([]));

        assert_eq!(cache.header_at_slot(5).await?, None);
        assert_eq!(cache.header_at_slot(5).await?, None);
        assert_eq!(cache.provider.calls(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn non_canonical_headers_are_returned_as_is() -> Result<()> {
        let cache = BlockHeaderCache::new(TestProvider::new([header_at(5, false)]));

        let header = cache
            .header_at_slot(5)
            .await?
            .expect("the provider has a header at slot 5");

        assert!(!header.canonical);

        Ok(())
    }

    #[tokio::test]
    async fn provider_errors_are_not_memoized() -> Result<()> {
        let provider = TestProvider {
            fail_first_call: AtomicUsize::new(1),
            ..TestProvider::new([header_at(5, true)])
        };

        let cache = BlockHeaderCache::new(provider);

        cache
            .header_at_slot(5)
            .await
            .expect_err("the first call fails");

        assert_eq!(cache.header_at_slot(5).await?, Some(header_at(5, true)));
        assert_eq!(cache.provider.calls(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn headers_for_the_wrong_slot_are_rejected() {
        let provider = TestProvider {
            misreport_slots: true,
            ..TestProvider::new([header_at(5, true)])
        };

        BlockHeaderCache::new(provider)
            .header_at_slot(5)
            .await
            .expect_err("a header whose slot does not match the query is invalid");
    }

    #[tokio::test]
    async fn pruning_drops_only_entries_below_the_given_slot() -> Result<()> {
        let cache = BlockHeaderCache::new(TestProvider::new([
            header_at(3, true),
            header_at(4, true),
            header_at(5, true),
        ]));

        for slot in 3..=5 {
            cache.header_at_slot(slot).await?;
        }

        assert_eq!(cache.len().await, 3);

        cache.prune_below(5).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.header_at_slot(5).await?, Some(header_at(5, true)));
        assert_eq!(cache.provider.calls(), 3);

        Ok(())
    }
}
