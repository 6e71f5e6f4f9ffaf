//! FORS, the few-time signature scheme signing the message digest.
//!
//! The digest selects one leaf in each of [`SPX_FORS_TREES`] trees of height
//! [`SPX_FORS_HEIGHT`]. A signature reveals the secret value of every
//! selected leaf with its authentication path; the public key compresses the
//! roots of all trees. Trees are built with [`treehash`] over [`ForsLeaf`].

use crate::address::{Address, AdrsType};
use crate::hash::HashContext;
use crate::params::{
    SPX_FORS_BYTES, SPX_FORS_HEIGHT, SPX_FORS_MSG_BYTES, SPX_FORS_PK_BYTES, SPX_FORS_TREES, SPX_N,
};
use crate::treehash::{compute_root, treehash, LeafGenerator, TreehashStrategy};
use rayon::prelude::*;
use zeroize::Zeroize;

/// Signature bytes per tree: the revealed secret followed by its path.
const SPX_FORS_TREE_BYTES: usize = (SPX_FORS_HEIGHT + 1) * SPX_N;

/// Derives the secret value of the leaf addressed by `fors_leaf_addr`.
pub fn fors_gen_sk(
    sk: &mut [u8; SPX_N],
    sk_seed: &[u8; SPX_N],
    ctx: &HashContext,
    fors_leaf_addr: &Address,
) {
    ctx.prf_addr(sk, sk_seed, fors_leaf_addr);
}

pub fn fors_sk_to_leaf(
    leaf: &mut [u8; SPX_N],
    sk: &[u8; SPX_N],
    ctx: &HashContext,
    fors_leaf_addr: &Address,
) {
    ctx.thash(leaf, sk, fors_leaf_addr);
}

/// Computes FORS leaf `addr_idx` of the key pair in `fors_tree_addr`.
pub fn fors_gen_leaf(
    leaf: &mut [u8; SPX_N],
    ctx: &HashContext,
    sk_seed: &[u8; SPX_N],
    addr_idx: u32,
    fors_tree_addr: &Address,
) {
    let mut fors_leaf_addr = Address::default();

    // Only copy the parts that must be kept in fors_leaf_addr.
    fors_leaf_addr.copy_keypair_addr(fors_tree_addr);
    fors_leaf_addr.set_type(AdrsType::ForsTree);
    fors_leaf_addr.set_tree_index(addr_idx);

    let mut sk = [0u8; SPX_N];
    fors_gen_sk(&mut sk, sk_seed, ctx, &fors_leaf_addr);
    fors_sk_to_leaf(leaf, &sk, ctx, &fors_leaf_addr);
    sk.zeroize();
}

/// FORS leaves: hashed secret values.
#[derive(Copy, Clone, Debug, Default)]
pub struct ForsLeaf;

impl LeafGenerator for ForsLeaf {
    fn gen_leaf(
        &self,
        leaf: &mut [u8; SPX_N],
        ctx: &HashContext,
        sk_seed: &[u8; SPX_N],
        addr_idx: u32,
        tree_addr: &Address,
    ) {
        fors_gen_leaf(leaf, ctx, sk_seed, addr_idx, tree_addr);
    }
}

/// Interprets `m` as `SPX_FORS_HEIGHT`-bit unsigned integers. Bits are read
/// least significant first within each byte.
pub fn message_to_indices(m: &[u8; SPX_FORS_MSG_BYTES]) -> [u32; SPX_FORS_TREES] {
    let mut indices = [0u32; SPX_FORS_TREES];
    let mut offset = 0;

    for index in indices.iter_mut() {
        for j in 0..SPX_FORS_HEIGHT {
            *index ^= u32::from((m[offset >> 3] >> (offset & 0x7)) & 0x1) << j;
            offset += 1;
        }
    }
    indices
}

/// The tree and public-key addresses of the FORS key pair in `fors_addr`.
fn key_pair_addresses(fors_addr: &Address) -> (Address, Address) {
    let mut fors_tree_addr = Address::default();
    let mut fors_pk_addr = Address::default();

    fors_tree_addr.copy_keypair_addr(fors_addr);
    fors_pk_addr.copy_keypair_addr(fors_addr);

    fors_tree_addr.set_type(AdrsType::ForsTree);
    fors_pk_addr.set_type(AdrsType::ForsPk);
    (fors_tree_addr, fors_pk_addr)
}

/// Signs tree `tree` at leaf `index`: writes secret and path to `sig`,
/// returns the root.
fn sign_tree(
    sig: &mut [u8],
    tree: usize,
    index: u32,
    sk_seed: &[u8; SPX_N],
    ctx: &HashContext,
    fors_tree_addr: &mut Address,
) -> [u8; SPX_N] {
    let idx_offset = (tree << SPX_FORS_HEIGHT) as u32;

    fors_tree_addr.set_tree_height(0);
    fors_tree_addr.set_tree_index(index + idx_offset);

    // Include the secret key part that produces the selected leaf.
    let mut sk = [0u8; SPX_N];
    fors_gen_sk(&mut sk, sk_seed, ctx, fors_tree_addr);
    sig[..SPX_N].copy_from_slice(&sk);
    sk.zeroize();

    // Compute the authentication path for this leaf node.
    treehash(
        ctx,
        sk_seed,
        index,
        idx_offset,
        SPX_FORS_HEIGHT as u32,
        &ForsLeaf,
        fors_tree_addr,
        TreehashStrategy::Stack,
        &mut sig[SPX_N..SPX_FORS_TREE_BYTES],
    )
}

/// Signs a message `m`. Returns the signature and the FORS public key.
pub fn fors_sign(
    m: &[u8; SPX_FORS_MSG_BYTES],
    sk_seed: &[u8; SPX_N],
    ctx: &HashContext,
    fors_addr: &Address,
) -> ([u8; SPX_FORS_BYTES], [u8; SPX_FORS_PK_BYTES]) {
    let indices = message_to_indices(m);
    let (mut fors_tree_addr, fors_pk_addr) = key_pair_addresses(fors_addr);

    let mut sig = [0u8; SPX_FORS_BYTES];
    let mut roots = [0u8; SPX_FORS_TREES * SPX_N];
    for (i, (sig_chunk, root)) in sig
        .chunks_exact_mut(SPX_FORS_TREE_BYTES)
        .zip(roots.chunks_exact_mut(SPX_N))
        .enumerate()
    {
        let tree_root = sign_tree(sig_chunk, i, indices[i], sk_seed, ctx, &mut fors_tree_addr);
        root.copy_from_slice(&tree_root);
    }

    // Hash horizontally across all tree roots to derive the public key.
    let mut pk = [0u8; SPX_FORS_PK_BYTES];
    ctx.thash(&mut pk, &roots, &fors_pk_addr);
    (sig, pk)
}

/// [`fors_sign`] with the trees built concurrently.
pub fn fors_sign_parallel(
    m: &[u8; SPX_FORS_MSG_BYTES],
    sk_seed: &[u8; SPX_N],
    ctx: &HashContext,
    fors_addr: &Address,
) -> ([u8; SPX_FORS_BYTES], [u8; SPX_FORS_PK_BYTES]) {
    let indices = message_to_indices(m);
    let (fors_tree_addr, fors_pk_addr) = key_pair_addresses(fors_addr);

    let mut sig = [0u8; SPX_FORS_BYTES];
    let mut roots = [0u8; SPX_FORS_TREES * SPX_N];
    sig.par_chunks_mut(SPX_FORS_TREE_BYTES)
        .zip(roots.par_chunks_mut(SPX_N))
        .enumerate()
        .for_each(|(i, (sig_chunk, root))| {
            let mut tree_addr = fors_tree_addr;
            let tree_root = sign_tree(sig_chunk, i, indices[i], sk_seed, ctx, &mut tree_addr);
            root.copy_from_slice(&tree_root);
        });

    let mut pk = [0u8; SPX_FORS_PK_BYTES];
    ctx.thash(&mut pk, &roots, &fors_pk_addr);
    (sig, pk)
}

/// Derives the FORS public key from a signature. Comparing it against the
/// expected key is up to the caller.
pub fn fors_pk_from_sig(
    sig: &[u8; SPX_FORS_BYTES],
    m: &[u8; SPX_FORS_MSG_BYTES],
    ctx: &HashContext,
    fors_addr: &Address,
) -> [u8; SPX_FORS_PK_BYTES] {
    let indices = message_to_indices(m);
    let (mut fors_tree_addr, fors_pk_addr) = key_pair_addresses(fors_addr);

    let mut roots = [0u8; SPX_FORS_TREES * SPX_N];
    let mut sk = [0u8; SPX_N];
    let mut leaf = [0u8; SPX_N];

    for (i, (sig_chunk, root)) in sig
        .chunks_exact(SPX_FORS_TREE_BYTES)
        .zip(roots.chunks_exact_mut(SPX_N))
        .enumerate()
    {
        let idx_offset = (i << SPX_FORS_HEIGHT) as u32;

        fors_tree_addr.set_tree_height(0);
        fors_tree_addr.set_tree_index(indices[i] + idx_offset);

        // Derive the leaf from the included secret key part.
        sk.copy_from_slice(&sig_chunk[..SPX_N]);
        fors_sk_to_leaf(&mut leaf, &sk, ctx, &fors_tree_addr);

        // Derive the corresponding root node of this tree.
        let tree_root = compute_root(
            ctx,
            &leaf,
            indices[i],
            idx_offset,
            &sig_chunk[SPX_N..],
            SPX_FORS_HEIGHT as u32,
            &mut fors_tree_addr,
        );
        root.copy_from_slice(&tree_root);
    }

    let mut pk = [0u8; SPX_FORS_PK_BYTES];
    ctx.thash(&mut pk, &roots, &fors_pk_addr);
    pk
}
