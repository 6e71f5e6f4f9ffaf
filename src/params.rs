//! Here are the parameters of the SPHINCS+ sha256_128f (simple) scheme.
//!
//! The parameter set is resolved at build time; every other module takes
//! these values as given. Derived sizes follow the SPHINCS+ round 3
//! reference definitions.

/// Hash output length in bytes.
pub const SPX_N: usize = 16;

/// Height of the hypertree.
pub const SPX_FULL_HEIGHT: usize = 66;
/// Number of subtree layer.
pub const SPX_D: usize = 22;

/// FORS tree dimensions.
pub const SPX_FORS_HEIGHT: usize = 6;
pub const SPX_FORS_TREES: usize = 33;

/// Winternitz parameter.
pub const SPX_WOTS_W: usize = 16;

/* For clarity */
pub const SPX_ADDR_BYTES: usize = 32;

/* WOTS parameters. */
pub const SPX_WOTS_LOGW: usize = 4;

pub const SPX_WOTS_LEN1: usize = 8 * SPX_N / SPX_WOTS_LOGW;

/* SPX_WOTS_LEN2 is floor(log(len_1 * (w - 1)) / log(w)) + 1; we precompute */
pub const SPX_WOTS_LEN2: usize = 3;

pub const SPX_WOTS_LEN: usize = SPX_WOTS_LEN1 + SPX_WOTS_LEN2;
pub const SPX_WOTS_BYTES: usize = SPX_WOTS_LEN * SPX_N;
pub const SPX_WOTS_PK_BYTES: usize = SPX_WOTS_BYTES;

/* Subtree size. */
pub const SPX_TREE_HEIGHT: usize = SPX_FULL_HEIGHT / SPX_D;

/* FORS parameters. */
pub const SPX_FORS_MSG_BYTES: usize = (SPX_FORS_HEIGHT * SPX_FORS_TREES + 7) / 8;
pub const SPX_FORS_BYTES: usize = (SPX_FORS_HEIGHT + 1) * SPX_FORS_TREES * SPX_N;
pub const SPX_FORS_PK_BYTES: usize = SPX_N;

/* Resulting SPX sizes. */
pub const SPX_BYTES: usize =
    SPX_N + SPX_FORS_BYTES + SPX_D * SPX_WOTS_BYTES + SPX_FULL_HEIGHT * SPX_N;
pub const SPX_PK_BYTES: usize = 2 * SPX_N;
pub const SPX_SK_BYTES: usize = 2 * SPX_N + SPX_PK_BYTES;

/// SHA-256 block byte size.
pub const SPX_SHA256_BLOCK_BYTES: usize = 64;

/// SHA-256 digest byte size. This does not necessarily equal `SPX_N`.
pub const SPX_SHA256_OUTPUT_BYTES: usize = 32;

/// Byte size of the compressed address mixed into every tweakable hash.
pub const SPX_SHA256_ADDR_BYTES: usize = 22;

/// The byte used to specify the Merkle tree layer.
pub const SPX_OFFSET_LAYER: usize = 0;

/// The start of the 8 byte field used to specify the tree.
pub const SPX_OFFSET_TREE: usize = 1;

/// The byte used to specify the hash type (reason).
pub const SPX_OFFSET_TYPE: usize = 9;

/// The high byte used to specify the key pair (which one-time signature).
pub const SPX_OFFSET_KP_ADDR2: usize = 12;

/// The low byte used to specify the key pair.
pub const SPX_OFFSET_KP_ADDR1: usize = 13;

/// The byte used to specify the chain address (which Winternitz chain).
pub const SPX_OFFSET_CHAIN_ADDR: usize = 17;

/// The byte used to specify the hash address (where in the Winternitz chain).
pub const SPX_OFFSET_HASH_ADDR: usize = 21;

/// The byte used to specify the height of this node in the FORS or Merkle tree.
pub const SPX_OFFSET_TREE_HGT: usize = 17;

/// The start of the 4 byte field used to specify the node in the FORS or Merkle tree.
pub const SPX_OFFSET_TREE_INDEX: usize = 18;

// Parameter-set invariants the encoding relies on.
const _: () = assert!(SPX_TREE_HEIGHT * SPX_D == SPX_FULL_HEIGHT);
const _: () = assert!(SPX_SHA256_OUTPUT_BYTES >= SPX_N);
const _: () = assert!(SPX_WOTS_W == 1 << SPX_WOTS_LOGW);
const _: () = assert!(SPX_FORS_HEIGHT <= 32);
