//! Merkle roots and authentication paths over a family of leaves.
//!
//! [`treehash`] computes the root of the tree over the leaves
//! `idx_offset..idx_offset + 2^tree_height` and, in the same pass, the
//! authentication path of one of them. Leaves come from a [`LeafGenerator`]:
//! WOTS+ public keys for the hypertree ([`crate::wots::WotsLeaf`]), hashed
//! secret values for FORS ([`crate::fors::ForsLeaf`]), or any closure.
//! [`compute_root`] climbs back from a leaf and its path to the root.
//!
//! Node `(h, i)` of the tree is hashed under the caller's tree address with
//! tree height `h` and tree index `i + (idx_offset >> h)`. The node fields of
//! the address belong to this module and are overwritten.

use crate::address::Address;
use crate::hash::HashContext;
use crate::params::SPX_N;
use rayon::prelude::*;

/// Produces the leaf with absolute index `addr_idx` of the tree named by
/// `tree_addr`.
///
/// Only the layer, tree and key pair fields of `tree_addr` carry meaning for a
/// generator; its node fields change while the tree is being built.
pub trait LeafGenerator: Sync {
    fn gen_leaf(
        &self,
        leaf: &mut [u8; SPX_N],
        ctx: &HashContext,
        sk_seed: &[u8; SPX_N],
        addr_idx: u32,
        tree_addr: &Address,
    );
}

impl<F> LeafGenerator for F
where
    F: Fn(&mut [u8; SPX_N], &HashContext, &[u8; SPX_N], u32, &Address) + Sync,
{
    fn gen_leaf(
        &self,
        leaf: &mut [u8; SPX_N],
        ctx: &HashContext,
        sk_seed: &[u8; SPX_N],
        addr_idx: u32,
        tree_addr: &Address,
    ) {
        self(leaf, ctx, sk_seed, addr_idx, tree_addr)
    }
}

/// How [`treehash`] schedules its work. Every strategy yields the same root
/// and authentication path.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TreehashStrategy {
    /// One leaf at a time, merged on a stack of at most `tree_height + 1` nodes.
    #[default]
    Stack,
    /// `batch` leaves generated in parallel, then merged on the stack in order.
    BatchedLeaves { batch: usize },
    /// All leaves in parallel, then every level of the tree in parallel.
    LevelParallel,
}

/// Computes the root of a tree of height `tree_height` and writes the
/// authentication path of leaf `leaf_idx` to `auth_path`, lowest level first.
///
/// `leaf_idx` is relative to `idx_offset`; the generator is called with the
/// absolute leaf index. The caller sets type, layer and tree of `tree_addr`.
///
/// # Panics
///
/// If `auth_path` is not `tree_height * SPX_N` bytes long or `leaf_idx` lies
/// outside the tree.
#[allow(clippy::too_many_arguments)]
pub fn treehash<G: LeafGenerator + ?Sized>(
    ctx: &HashContext,
    sk_seed: &[u8; SPX_N],
    leaf_idx: u32,
    idx_offset: u32,
    tree_height: u32,
    gen_leaf: &G,
    tree_addr: &mut Address,
    strategy: TreehashStrategy,
    auth_path: &mut [u8],
) -> [u8; SPX_N] {
    assert_eq!(
        auth_path.len(),
        tree_height as usize * SPX_N,
        "authentication path buffer does not match the tree height"
    );
    assert!(
        tree_height < 32 && u64::from(leaf_idx) < 1_u64 << tree_height,
        "leaf index {} outside a tree of height {}",
        leaf_idx,
        tree_height
    );
    log::trace!(
        "treehash: height {}, offset {}, {:?}",
        tree_height,
        idx_offset,
        strategy
    );

    let tree = Tree {
        ctx,
        sk_seed,
        leaf_idx,
        idx_offset,
        tree_height,
    };
    match strategy {
        TreehashStrategy::Stack => tree.stack(gen_leaf, tree_addr, auth_path, 1, false),
        TreehashStrategy::BatchedLeaves { batch } => {
            tree.stack(gen_leaf, tree_addr, auth_path, batch.max(1), true)
        }
        TreehashStrategy::LevelParallel => tree.levels(gen_leaf, tree_addr, auth_path),
    }
}

/// Reconstructs the root of a tree of height `tree_height` from a leaf, its
/// index and its authentication path.
///
/// # Panics
///
/// If `auth_path` is not `tree_height * SPX_N` bytes long.
pub fn compute_root(
    ctx: &HashContext,
    leaf: &[u8; SPX_N],
    leaf_idx: u32,
    idx_offset: u32,
    auth_path: &[u8],
    tree_height: u32,
    addr: &mut Address,
) -> [u8; SPX_N] {
    assert_eq!(
        auth_path.len(),
        tree_height as usize * SPX_N,
        "authentication path buffer does not match the tree height"
    );

    let mut node = *leaf;
    let mut buffer = [0u8; 2 * SPX_N];
    let mut leaf_idx = leaf_idx;
    let mut idx_offset = idx_offset;

    for (i, sibling) in auth_path.chunks_exact(SPX_N).enumerate() {
        let is_right = leaf_idx & 1 == 1;
        leaf_idx >>= 1;
        idx_offset >>= 1;
        addr.set_tree_height(i as u32 + 1);
        addr.set_tree_index(leaf_idx + idx_offset);

        // If the current node is a right child, the sibling goes first.
        if is_right {
            buffer[..SPX_N].copy_from_slice(sibling);
            buffer[SPX_N..].copy_from_slice(&node);
        } else {
            buffer[..SPX_N].copy_from_slice(&node);
            buffer[SPX_N..].copy_from_slice(sibling);
        }
        ctx.thash(&mut node, &buffer, addr);
    }
    node
}

struct Tree<'a> {
    ctx: &'a HashContext,
    sk_seed: &'a [u8; SPX_N],
    leaf_idx: u32,
    idx_offset: u32,
    tree_height: u32,
}

impl Tree<'_> {
    fn leaf_count(&self) -> u32 {
        1 << self.tree_height
    }

    /// Hashes `left || right` into the node at `height`, index `tree_idx`.
    fn hash_pair(
        &self,
        left: &[u8; SPX_N],
        right: &[u8; SPX_N],
        height: u32,
        tree_idx: u32,
        tree_addr: &mut Address,
    ) -> [u8; SPX_N] {
        let mut buffer = [0u8; 2 * SPX_N];
        buffer[..SPX_N].copy_from_slice(left);
        buffer[SPX_N..].copy_from_slice(right);

        tree_addr.set_tree_height(height);
        tree_addr.set_tree_index(tree_idx + (self.idx_offset >> height));
        let mut node = [0u8; SPX_N];
        self.ctx.thash(&mut node, &buffer, tree_addr);
        node
    }

    /// Stack-based treehash; leaves are produced `batch` at a time,
    /// concurrently when `parallel` is set.
    fn stack<G: LeafGenerator + ?Sized>(
        &self,
        gen_leaf: &G,
        tree_addr: &mut Address,
        auth_path: &mut [u8],
        batch: usize,
        parallel: bool,
    ) -> [u8; SPX_N] {
        let batch = batch.min(self.leaf_count() as usize);
        let mut stack: Vec<([u8; SPX_N], u32)> = Vec::with_capacity(self.tree_height as usize + 1);
        let mut leaves = vec![[0u8; SPX_N]; batch];

        let mut first = 0;
        while first < self.leaf_count() {
            let count = (self.leaf_count() - first).min(batch as u32);
            let leaves = &mut leaves[..count as usize];
            let snapshot = *tree_addr;
            let make_leaf = |(i, leaf): (usize, &mut [u8; SPX_N])| {
                gen_leaf.gen_leaf(
                    leaf,
                    self.ctx,
                    self.sk_seed,
                    first + i as u32 + self.idx_offset,
                    &snapshot,
                );
            };
            if parallel {
                leaves.par_iter_mut().enumerate().for_each(make_leaf);
            } else {
                leaves.iter_mut().enumerate().for_each(make_leaf);
            }

            for (i, leaf) in leaves.iter().enumerate() {
                let idx = first + i as u32;
                self.push_leaf(&mut stack, leaf, idx, tree_addr, auth_path);
            }
            first += count;
        }

        debug_assert_eq!(stack.len(), 1);
        stack[0].0
    }

    /// Pushes leaf `idx` and merges while the two top nodes share a height.
    fn push_leaf(
        &self,
        stack: &mut Vec<([u8; SPX_N], u32)>,
        leaf: &[u8; SPX_N],
        idx: u32,
        tree_addr: &mut Address,
        auth_path: &mut [u8],
    ) {
        stack.push((*leaf, 0));
        if (self.leaf_idx ^ 1) == idx {
            auth_path[..SPX_N].copy_from_slice(leaf);
        }

        while stack.len() >= 2 && stack[stack.len() - 1].1 == stack[stack.len() - 2].1 {
            let height = stack[stack.len() - 1].1 + 1;
            let tree_idx = idx >> height;

            let (right, _) = stack.pop().unwrap_or_default();
            let (left, _) = stack.pop().unwrap_or_default();
            let node = self.hash_pair(&left, &right, height, tree_idx, tree_addr);
            stack.push((node, height));

            // The sibling of the path node at this height.
            if ((self.leaf_idx >> height) ^ 1) == tree_idx {
                let start = height as usize * SPX_N;
                auth_path[start..start + SPX_N].copy_from_slice(&node);
            }
        }
    }

    /// The whole tree built level by level, each level in parallel.
    fn levels<G: LeafGenerator + ?Sized>(
        &self,
        gen_leaf: &G,
        tree_addr: &mut Address,
        auth_path: &mut [u8],
    ) -> [u8; SPX_N] {
        let snapshot = *tree_addr;
        let mut level: Vec<[u8; SPX_N]> = (0..self.leaf_count())
            .into_par_iter()
            .map(|i| {
                let mut leaf = [0u8; SPX_N];
                gen_leaf.gen_leaf(
                    &mut leaf,
                    self.ctx,
                    self.sk_seed,
                    i + self.idx_offset,
                    &snapshot,
                );
                leaf
            })
            .collect();

        for height in 1..=self.tree_height {
            let sibling = (self.leaf_idx >> (height - 1)) ^ 1;
            let start = (height as usize - 1) * SPX_N;
            auth_path[start..start + SPX_N].copy_from_slice(&level[sibling as usize]);

            level = level
                .par_chunks(2)
                .enumerate()
                .map(|(j, pair)| {
                    let mut adrs = snapshot;
                    self.hash_pair(&pair[0], &pair[1], height, j as u32, &mut adrs)
                })
                .collect();
        }

        if self.tree_height > 0 {
            tree_addr.set_tree_height(self.tree_height);
            tree_addr.set_tree_index(self.idx_offset >> self.tree_height);
        }
        level[0]
    }
}
