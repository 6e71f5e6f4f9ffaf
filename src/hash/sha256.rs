//! Incremental SHA-256 with an exposed midstate.
//!
//! The state serializes to a 40-byte image: eight
//! chaining words followed by the number of bytes absorbed so far. Whole
//! blocks go through `sha2::compress256`; only padding is done here.

use crate::params::{SPX_SHA256_BLOCK_BYTES, SPX_SHA256_OUTPUT_BYTES};
use crate::utils::{u32_to_bytes, u64_to_bytes};
use sha2::digest::generic_array::GenericArray;
use sha2::{compress256, Digest, Sha256};

/// Byte size of a serialized [`Sha256State`].
pub const SPX_SHA256_STATE_BYTES: usize = 40;

/// SHA-256 initial hash value.
pub(crate) const IV_256: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// A SHA-256 midstate: chaining value plus absorbed byte count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sha256State {
    h: [u32; 8],
    bytes: u64,
}

impl Default for Sha256State {
    fn default() -> Self {
        Self::inc_init()
    }
}

impl Sha256State {
    /// Fresh state at the SHA-256 initial value.
    pub fn inc_init() -> Self {
        Self {
            h: IV_256,
            bytes: 0,
        }
    }

    /// Absorbs whole compression blocks.
    ///
    /// # Panics
    ///
    /// If `blocks` is not a multiple of [`SPX_SHA256_BLOCK_BYTES`] long.
    pub fn inc_blocks(&mut self, blocks: &[u8]) {
        assert_eq!(
            blocks.len() % SPX_SHA256_BLOCK_BYTES,
            0,
            "inc_blocks expects whole 64-byte blocks"
        );
        compress_blocks(&mut self.h, blocks);
        self.bytes += blocks.len() as u64;
    }

    /// Absorbs the final `tail` (any length), applies padding and returns the digest.
    pub fn inc_finalize(mut self, tail: &[u8]) -> [u8; SPX_SHA256_OUTPUT_BYTES] {
        let full = tail.len() - tail.len() % SPX_SHA256_BLOCK_BYTES;
        compress_blocks(&mut self.h, &tail[..full]);
        let total_bytes = self.bytes + tail.len() as u64;
        let rest = &tail[full..];

        // One block if the length still fits after the 0x80 marker, two otherwise.
        let mut padded = [0u8; 2 * SPX_SHA256_BLOCK_BYTES];
        padded[..rest.len()].copy_from_slice(rest);
        padded[rest.len()] = 0x80;
        let padded_len = if rest.len() < SPX_SHA256_BLOCK_BYTES - 8 {
            SPX_SHA256_BLOCK_BYTES
        } else {
            2 * SPX_SHA256_BLOCK_BYTES
        };
        padded[padded_len - 8..padded_len].copy_from_slice(&u64_to_bytes(total_bytes << 3));
        compress_blocks(&mut self.h, &padded[..padded_len]);

        state_to_digest(&self.h)
    }

    /// The chaining words, big-endian, followed by the byte counter, big-endian.
    pub fn to_bytes(&self) -> [u8; SPX_SHA256_STATE_BYTES] {
        let mut out = [0u8; SPX_SHA256_STATE_BYTES];
        out[..32].copy_from_slice(&state_to_digest(&self.h));
        out[32..].copy_from_slice(&u64_to_bytes(self.bytes));
        out
    }

    /// Number of bytes absorbed so far.
    pub fn absorbed_bytes(&self) -> u64 {
        self.bytes
    }
}

pub(crate) fn compress_blocks(h: &mut [u32; 8], blocks: &[u8]) {
    for block in blocks.chunks_exact(SPX_SHA256_BLOCK_BYTES) {
        compress256(h, core::slice::from_ref(GenericArray::from_slice(block)));
    }
}

pub(crate) fn state_to_digest(h: &[u32; 8]) -> [u8; SPX_SHA256_OUTPUT_BYTES] {
    let mut out = [0u8; SPX_SHA256_OUTPUT_BYTES];
    for (chunk, word) in out.chunks_exact_mut(4).zip(h.iter()) {
        chunk.copy_from_slice(&u32_to_bytes(*word));
    }
    out
}

/// One-shot SHA-256.
pub fn sha256(input: &[u8]) -> [u8; SPX_SHA256_OUTPUT_BYTES] {
    Sha256::digest(input).into()
}

/// MGF1 based on SHA-256: fills `out` with `SHA-256(input || counter)` for
/// counters 0, 1, 2, ... encoded as 32-bit big-endian, truncating the last digest.
pub fn mgf1(out: &mut [u8], input: &[u8]) {
    let mut hasher = Sha256::new();
    hasher.update(input);

    for (counter, chunk) in out.chunks_mut(SPX_SHA256_OUTPUT_BYTES).enumerate() {
        let mut block_hasher = hasher.clone();
        block_hasher.update(u32_to_bytes(counter as u32));
        let digest = block_hasher.finalize();
        chunk.copy_from_slice(&digest[..chunk.len()]);
    }
}
