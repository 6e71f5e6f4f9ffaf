//! # spx-core
//!
//! The computational core of SPHINCS+-SHA256-128f-simple: the address
//! codec, SHA-256 with a public-seed midstate, parallel SHA-256 engines,
//! WOTS+, FORS and the treehash engine shared by the hypertree and FORS.
//!
//! All hashing goes through an explicit [`hash::HashContext`] holding the
//! public seed and its cached midstate; there is no global state. Key
//! generation, signing and verification of full SPHINCS+ signatures are
//! left to the caller, which assembles them from these parts.
//!
//! ```
//! use spx_core::address::Address;
//! use spx_core::hash::HashContext;
//! use spx_core::wots::{wots_gen_pk, wots_pk_from_sig, wots_sign};
//!
//! let ctx = HashContext::new(&[1u8; 16]);
//! let sk_seed = [2u8; 16];
//! let msg = [3u8; 16];
//! let addr = Address::default();
//!
//! let sig = wots_sign(&msg, &sk_seed, &ctx, &addr);
//! assert_eq!(
//!     wots_pk_from_sig(&sig, &msg, &ctx, &addr),
//!     wots_gen_pk(&sk_seed, &ctx, &addr)
//! );
//! ```

mod error;
mod utils;

pub mod address;
pub mod engine;
pub mod fors;
pub mod hash;
pub mod keys;
pub mod params;
pub mod treehash;
pub mod wots;

pub use crate::error::{Error, Result};
pub use crate::keys::{ForsSignature, PublicSeed, SecretSeed, WotsSignature};
pub use crate::utils::{bytes_to_u32, bytes_to_ull, u32_to_bytes, u64_to_bytes, ull_to_bytes};
