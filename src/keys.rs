//! Fixed-size wrappers for seeds and signatures.
//!
//! Each wrapper zeroizes its bytes on drop and, with the `serialization`
//! feature, derives serde support.

use crate::error::Error;
use crate::hash::HashContext;
use crate::params::{SPX_FORS_BYTES, SPX_N, SPX_WOTS_BYTES};
use crate::utils::array_struct;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serialization")]
use serde_big_array::BigArray;

// The secret seed every WOTS+ chain start and FORS secret is derived from.
array_struct!(SecretSeed, SPX_N);

impl SecretSeed {
    /// Creates a new `SecretSeed` from the operating system's randomness.
    pub fn generate() -> Self {
        let mut seed = [0u8; SPX_N];
        OsRng.fill_bytes(&mut seed);
        Self(seed)
    }
}

// The public seed, mixed into every tweakable hash.
array_struct!(PublicSeed, SPX_N);

impl PublicSeed {
    /// Creates a new `PublicSeed` from the operating system's randomness.
    pub fn generate() -> Self {
        let mut seed = [0u8; SPX_N];
        OsRng.fill_bytes(&mut seed);
        Self(seed)
    }

    /// A hash context seeded with this public seed.
    pub fn hash_context(&self) -> HashContext {
        HashContext::new(&self.0)
    }
}

array_struct!(WotsSignature, SPX_WOTS_BYTES);
array_struct!(ForsSignature, SPX_FORS_BYTES);
