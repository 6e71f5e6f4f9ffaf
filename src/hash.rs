//! Tweakable hashing over SHA-256 with a cached, public-seed-dependent midstate.
//!
//! Every tweakable hash `thash` absorbs `BlockPad(pub_seed)` first. That block
//! does not change between invocations, so [`HashContext`] compresses it once
//! and clones the resulting midstate for each call.
//! The context is passed explicitly to every operation that hashes.

pub mod sha256;

use crate::address::Address;
use crate::params::{SPX_N, SPX_SHA256_ADDR_BYTES, SPX_SHA256_BLOCK_BYTES};
use crate::hash::sha256::Sha256State;

/// Public seed plus its seeded SHA-256 midstate.
///
/// After construction the context is read-only and may be shared across
/// threads. Re-seeding takes `&mut self`, so it cannot race with readers.
#[derive(Clone, Debug)]
pub struct HashContext {
    pub_seed: [u8; SPX_N],
    state_seeded: Sha256State,
}

impl HashContext {
    /// Creates a context for `pub_seed`, computing the seeded midstate.
    pub fn new(pub_seed: &[u8; SPX_N]) -> Self {
        Self {
            pub_seed: *pub_seed,
            state_seeded: Self::seed_state(pub_seed),
        }
    }

    /// Replaces the public seed and recomputes the cached midstate.
    pub fn reseed(&mut self, pub_seed: &[u8; SPX_N]) {
        log::debug!("Re-seeding hash context midstate");
        self.pub_seed = *pub_seed;
        self.state_seeded = Self::seed_state(pub_seed);
    }

    /// Absorbs `pub_seed` padded to one full block.
    fn seed_state(pub_seed: &[u8; SPX_N]) -> Sha256State {
        let mut block = [0u8; SPX_SHA256_BLOCK_BYTES];
        block[..SPX_N].copy_from_slice(pub_seed);
        let mut state = Sha256State::inc_init();
        state.inc_blocks(&block);
        state
    }

    pub fn pub_seed(&self) -> &[u8; SPX_N] {
        &self.pub_seed
    }

    /// The cached midstate after `BlockPad(pub_seed)`.
    pub fn seeded_state(&self) -> &Sha256State {
        &self.state_seeded
    }

    /// Takes an array of `input.len() / SPX_N` concatenated `SPX_N`-byte blocks.
    ///
    /// T(PK.seed, ADRS, M) = SHA-256(BlockPad(PK.seed) || ADRSc || M)
    ///
    /// # Panics
    ///
    /// If `input` is not a whole number of `SPX_N`-byte blocks.
    pub fn thash(&self, output: &mut [u8; SPX_N], input: &[u8], adrs: &Address) {
        assert_eq!(
            input.len() % SPX_N,
            0,
            "thash input is not a whole number of blocks"
        );
        let mut buf = Vec::with_capacity(SPX_SHA256_ADDR_BYTES + input.len());
        buf.extend_from_slice(adrs.compressed());
        buf.extend_from_slice(input);

        let digest = self.state_seeded.clone().inc_finalize(&buf);
        output.copy_from_slice(&digest[..SPX_N]);
    }

    /// Applies [`HashContext::thash`] to a single block, in place.
    pub fn thash_inplace(&self, inout: &mut [u8; SPX_N], adrs: &Address) {
        let input = *inout;
        self.thash(inout, &input, adrs);
    }

    /// PRF(SK.seed, ADRS) = SHA-256(SK.seed || ADRSc)
    pub fn prf_addr(&self, output: &mut [u8; SPX_N], key: &[u8; SPX_N], adrs: &Address) {
        let mut buf = [0u8; SPX_N + SPX_SHA256_ADDR_BYTES];
        buf[..SPX_N].copy_from_slice(key);
        buf[SPX_N..].copy_from_slice(adrs.compressed());

        let digest = sha256::sha256(&buf);
        output.copy_from_slice(&digest[..SPX_N]);
    }
}
