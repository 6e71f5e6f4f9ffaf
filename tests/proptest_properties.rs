//! Property-based tests using proptest.
//!
//! Hash chains and trees are comparatively slow, so the expensive properties
//! run with few cases.

use proptest::prelude::*;
use spx_core::address::{Address, AdrsType};
use spx_core::engine::batch::{dp_sha256, dp_sha256_messages};
use spx_core::engine::cooperative::warp_sha256;
use spx_core::engine::stream::msdp_sha256;
use spx_core::engine::LaunchConfig;
use spx_core::fors::{fors_gen_leaf, ForsLeaf};
use spx_core::hash::sha256::sha256;
use spx_core::hash::HashContext;
use spx_core::params::{SPX_FORS_HEIGHT, SPX_N, SPX_SHA256_OUTPUT_BYTES, SPX_WOTS_W};
use spx_core::treehash::{compute_root, treehash, TreehashStrategy};
use spx_core::wots::{gen_chain, wots_gen_pk, wots_pk_from_sig, wots_sign};

fn arb_n() -> impl Strategy<Value = [u8; SPX_N]> {
    prop::array::uniform16(any::<u8>())
}

fn arb_strategy() -> impl Strategy<Value = TreehashStrategy> {
    prop_oneof![
        Just(TreehashStrategy::Stack),
        (0usize..80).prop_map(|batch| TreehashStrategy::BatchedLeaves { batch }),
        Just(TreehashStrategy::LevelParallel),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Walking `k` then `m` steps equals walking `k + m` steps.
    #[test]
    fn chain_determinism(
        pub_seed in arb_n(),
        start in arb_n(),
        chain in 0u32..35,
        k in 0u32..16,
        m in 0u32..16,
    ) {
        let ctx = HashContext::new(&pub_seed);
        let mut adrs = Address::from(AdrsType::WotsHash);
        adrs.set_chain_addr(chain);

        let mut direct = [0u8; SPX_N];
        gen_chain(&mut direct, &start, 0, k + m, &ctx, &mut adrs);
        let mut again = [0u8; SPX_N];
        gen_chain(&mut again, &start, 0, k + m, &ctx, &mut adrs);
        prop_assert_eq!(direct, again);

        let mut partial = [0u8; SPX_N];
        let mut composed = [0u8; SPX_N];
        gen_chain(&mut partial, &start, 0, k, &ctx, &mut adrs);
        gen_chain(&mut composed, &partial, k, m, &ctx, &mut adrs);
        prop_assert_eq!(composed, direct);

        let mut top = [0u8; SPX_N];
        gen_chain(&mut top, &start, 0, SPX_WOTS_W as u32 - 1, &ctx, &mut adrs);
        let mut past_top = [0u8; SPX_N];
        gen_chain(&mut past_top, &top, SPX_WOTS_W as u32 - 1, k + 1, &ctx, &mut adrs);
        prop_assert_eq!(past_top, top);
    }

    /// Midstate caching is transparent.
    #[test]
    fn midstate_transparency(
        pub_seed in arb_n(),
        blocks in 1usize..40,
        fill in any::<u8>(),
        tree in any::<u64>(),
    ) {
        let ctx = HashContext::new(&pub_seed);
        let input = vec![fill; blocks * SPX_N];
        let mut adrs = Address::from(AdrsType::HashTree);
        adrs.set_tree_addr(tree);

        let mut cached = [0u8; SPX_N];
        ctx.thash(&mut cached, &input, &adrs);

        let mut full = pub_seed.to_vec();
        full.resize(64, 0);
        full.extend_from_slice(adrs.compressed());
        full.extend_from_slice(&input);
        prop_assert_eq!(&cached[..], &sha256(&full)[..SPX_N]);
    }

    /// Parallel engines reproduce the sequential digest.
    #[test]
    fn parallel_sequential_equivalence(
        messages in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..200), 1..12),
        msg_size in 0usize..150,
        grid_size in 1usize..6,
        block_size in 1usize..4,
        streams in 1usize..5,
    ) {
        let launch = LaunchConfig::new(grid_size, block_size);
        let total = messages.len();

        let mut out = vec![0u8; SPX_SHA256_OUTPUT_BYTES * total];
        dp_sha256_messages(&messages, &mut out, &launch).unwrap();
        for (msg, digest) in messages.iter().zip(out.chunks(SPX_SHA256_OUTPUT_BYTES)) {
            prop_assert_eq!(digest, &sha256(msg)[..]);
            prop_assert_eq!(digest, &warp_sha256(msg)[..]);
        }

        // The same count of equal-size messages, laid out contiguously.
        let input: Vec<u8> = messages
            .concat()
            .into_iter()
            .chain(std::iter::repeat(0xA5))
            .take(msg_size * total)
            .collect();
        let expected: Vec<u8> = (0..total)
            .flat_map(|i| sha256(&input[i * msg_size..(i + 1) * msg_size]))
            .collect();

        let mut dp_out = vec![0u8; SPX_SHA256_OUTPUT_BYTES * total];
        dp_sha256(&input, &mut dp_out, msg_size, total, &launch).unwrap();
        prop_assert_eq!(&dp_out, &expected);

        let mut ms_out = vec![0u8; SPX_SHA256_OUTPUT_BYTES * total];
        msdp_sha256(&input, &mut ms_out, msg_size, total, &launch, streams).unwrap();
        prop_assert_eq!(&ms_out, &expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    /// The public key recovered from a signature equals the generated one.
    #[test]
    fn wots_round_trip(
        sk_seed in arb_n(),
        pub_seed in arb_n(),
        msg in arb_n(),
        layer in 0u32..22,
        tree in any::<u64>(),
        keypair in 0u32..8,
    ) {
        let ctx = HashContext::new(&pub_seed);
        let mut addr = Address::from(AdrsType::WotsHash);
        addr.set_layer_addr(layer);
        addr.set_tree_addr(tree);
        addr.set_keypair_addr(keypair);

        let sig = wots_sign(&msg, &sk_seed, &ctx, &addr);
        let pk = wots_pk_from_sig(&sig, &msg, &ctx, &addr);
        prop_assert_eq!(&pk[..], &wots_gen_pk(&sk_seed, &ctx, &addr)[..]);
    }

    /// Treehash roots agree with roots rebuilt from the authentication path.
    #[test]
    fn treehash_compute_root_duality(
        sk_seed in arb_n(),
        pub_seed in arb_n(),
        tree_index in 0u32..33,
        leaf_idx in 0u32..(1 << SPX_FORS_HEIGHT),
        strategy in arb_strategy(),
    ) {
        let ctx = HashContext::new(&pub_seed);
        let tree_height = SPX_FORS_HEIGHT as u32;
        let idx_offset = tree_index << tree_height;
        let tree_addr = Address::from(AdrsType::ForsTree);

        let mut auth_path = vec![0u8; SPX_FORS_HEIGHT * SPX_N];
        let mut addr = tree_addr;
        let root = treehash(
            &ctx,
            &sk_seed,
            leaf_idx,
            idx_offset,
            tree_height,
            &ForsLeaf,
            &mut addr,
            strategy,
            &mut auth_path,
        );

        let mut leaf = [0u8; SPX_N];
        fors_gen_leaf(&mut leaf, &ctx, &sk_seed, leaf_idx + idx_offset, &tree_addr);
        let mut addr = tree_addr;
        let rebuilt = compute_root(
            &ctx,
            &leaf,
            leaf_idx,
            idx_offset,
            &auth_path,
            tree_height,
            &mut addr,
        );
        prop_assert_eq!(rebuilt, root);
    }
}
