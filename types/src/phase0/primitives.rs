use fixed_hash::construct_fixed_hash;
use impl_serde::impl_fixed_hash_serde;

pub use ethereum_types::H256;

pub type CommitteeIndex = u64;
pub type Epoch = u64;
pub type Slot = u64;
pub type UnixSeconds = u64;
pub type ValidatorIndex = u64;

pub type SignatureBytes = H768;
pub type AggregateSignatureBytes = H768;

construct_fixed_hash! {
    pub struct H768(96);
}

impl_fixed_hash_serde!(H768, 96);
