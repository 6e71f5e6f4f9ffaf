//! # Winternitz One-Time Signature Scheme Plus (W-OTS+)
//!
//! Hash-chain one-time signatures over `SPX_N`-byte digests, as used for the
//! leaves of the SPHINCS+ hypertree. A digest is split into
//! [`SPX_WOTS_LEN1`] base-`w` digits followed by [`SPX_WOTS_LEN2`] checksum
//! digits; digit `i` decides how far chain `i` is walked when signing.
//!
//! Every chain step is a tweakable hash under an [`Address`] carrying the
//! chain index and the position within the chain, so all calls go through a
//! [`HashContext`]. Secret chain starts are derived on demand from the secret
//! seed and wiped once used.
//!
//! The `_parallel` variants walk the [`SPX_WOTS_LEN`] independent chains
//! concurrently and return the same bytes as their sequential counterparts.

use crate::address::{Address, AdrsType};
use crate::hash::HashContext;
use crate::params::{
    SPX_N, SPX_WOTS_BYTES, SPX_WOTS_LEN, SPX_WOTS_LEN1, SPX_WOTS_LEN2, SPX_WOTS_LOGW,
    SPX_WOTS_PK_BYTES, SPX_WOTS_W,
};
use crate::treehash::LeafGenerator;
use crate::utils::ull_to_bytes;
use rayon::prelude::*;
use zeroize::Zeroize;

/// Bytes needed to hold the shifted checksum.
const SPX_WOTS_CSUM_BYTES: usize = (SPX_WOTS_LEN2 * SPX_WOTS_LOGW + 7) / 8;

/// Converts an array of bytes into integers in base `w`, most significant
/// digit first. Fills all of `output`, consuming `output.len() * LOGW / 8`
/// bytes of `input`.
pub fn base_w(output: &mut [u32], input: &[u8]) {
    let mut bits = 0;
    let mut total: u8 = 0;
    let mut input_index = 0;

    for out in output.iter_mut() {
        if bits == 0 {
            total = input[input_index];
            input_index += 1;
            bits += 8;
        }

        bits -= SPX_WOTS_LOGW;
        *out = u32::from((total >> bits) & ((SPX_WOTS_W - 1) as u8));
    }
}

/// Computes the WOTS+ checksum over a message (in base_w).
pub fn wots_checksum(csum_base_w: &mut [u32], msg_base_w: &[u32]) {
    let mut csum: u32 = 0;

    for &digit in msg_base_w.iter().take(SPX_WOTS_LEN1) {
        csum += (SPX_WOTS_W as u32) - 1 - digit;
    }

    // Make sure expected empty zero bits are the least significant bits.
    csum <<= (8 - ((SPX_WOTS_LEN2 * SPX_WOTS_LOGW) % 8)) % 8;

    let mut csum_bytes = [0u8; SPX_WOTS_CSUM_BYTES];
    ull_to_bytes(&mut csum_bytes, u64::from(csum));
    base_w(&mut csum_base_w[..SPX_WOTS_LEN2], &csum_bytes);
}

/// Takes a message and derives the matching chain lengths.
pub fn chain_lengths(msg: &[u8; SPX_N]) -> [u32; SPX_WOTS_LEN] {
    let mut lengths = [0u32; SPX_WOTS_LEN];
    let (msg_digits, csum_digits) = lengths.split_at_mut(SPX_WOTS_LEN1);
    base_w(msg_digits, msg);
    wots_checksum(csum_digits, msg_digits);
    lengths
}

/// Computes the chaining function.
///
/// Interprets `input` as the `start`-th value of the chain and walks it
/// `steps` positions, never past position `w - 1`. `adrs` has to contain the
/// address of the chain; its hash address is overwritten.
pub fn gen_chain(
    output: &mut [u8; SPX_N],
    input: &[u8; SPX_N],
    start: u32,
    steps: u32,
    ctx: &HashContext,
    adrs: &mut Address,
) {
    *output = *input;

    let end = start.saturating_add(steps).min(SPX_WOTS_W as u32);
    for i in start..end {
        adrs.set_hash_addr(i);
        ctx.thash_inplace(output, adrs);
    }
}

/// Derives the secret chain start for the chain set in `wots_addr`.
/// The hash address is reset to zero first.
pub fn wots_gen_sk(
    sk: &mut [u8; SPX_N],
    sk_seed: &[u8; SPX_N],
    ctx: &HashContext,
    wots_addr: &mut Address,
) {
    wots_addr.set_hash_addr(0);
    ctx.prf_addr(sk, sk_seed, wots_addr);
}

/// Secret start plus `steps` chain positions for chain `chain` of the key
/// pair in `addr`.
fn chain_from_seed(
    output: &mut [u8; SPX_N],
    chain: usize,
    steps: u32,
    sk_seed: &[u8; SPX_N],
    ctx: &HashContext,
    addr: &Address,
) {
    let mut adrs = *addr;
    adrs.set_chain_addr(chain as u32);

    let mut sk = [0u8; SPX_N];
    wots_gen_sk(&mut sk, sk_seed, ctx, &mut adrs);
    gen_chain(output, &sk, 0, steps, ctx, &mut adrs);
    sk.zeroize();
}

/// WOTS+ key generation. Takes a secret seed and the address of a WOTS key
/// pair; returns the uncompressed public key, the `SPX_WOTS_LEN` chain tops.
pub fn wots_gen_pk(
    sk_seed: &[u8; SPX_N],
    ctx: &HashContext,
    addr: &Address,
) -> [u8; SPX_WOTS_PK_BYTES] {
    let mut pk = [0u8; SPX_WOTS_PK_BYTES];
    let mut top = [0u8; SPX_N];

    for (i, chunk) in pk.chunks_exact_mut(SPX_N).enumerate() {
        chain_from_seed(&mut top, i, SPX_WOTS_W as u32 - 1, sk_seed, ctx, addr);
        chunk.copy_from_slice(&top);
    }
    pk
}

/// Takes an n-byte message and the secret seed; returns the signature,
/// chain `i` walked `lengths[i]` steps from its secret start.
pub fn wots_sign(
    msg: &[u8; SPX_N],
    sk_seed: &[u8; SPX_N],
    ctx: &HashContext,
    addr: &Address,
) -> [u8; SPX_WOTS_BYTES] {
    let lengths = chain_lengths(msg);
    let mut sig = [0u8; SPX_WOTS_BYTES];
    let mut node = [0u8; SPX_N];

    for (i, chunk) in sig.chunks_exact_mut(SPX_N).enumerate() {
        chain_from_seed(&mut node, i, lengths[i], sk_seed, ctx, addr);
        chunk.copy_from_slice(&node);
    }
    sig
}

/// Takes a WOTS signature and an n-byte message, computes a WOTS public key
/// by finishing every chain. Comparing the result against a known public
/// key is up to the caller.
pub fn wots_pk_from_sig(
    sig: &[u8; SPX_WOTS_BYTES],
    msg: &[u8; SPX_N],
    ctx: &HashContext,
    addr: &Address,
) -> [u8; SPX_WOTS_PK_BYTES] {
    let lengths = chain_lengths(msg);
    let mut pk = [0u8; SPX_WOTS_PK_BYTES];
    let mut adrs = *addr;
    let mut start = [0u8; SPX_N];
    let mut top = [0u8; SPX_N];

    for (i, (pk_chunk, sig_chunk)) in pk
        .chunks_exact_mut(SPX_N)
        .zip(sig.chunks_exact(SPX_N))
        .enumerate()
    {
        adrs.set_chain_addr(i as u32);
        start.copy_from_slice(sig_chunk);
        gen_chain(
            &mut top,
            &start,
            lengths[i],
            SPX_WOTS_W as u32 - 1 - lengths[i],
            ctx,
            &mut adrs,
        );
        pk_chunk.copy_from_slice(&top);
    }
    pk
}

/// [`wots_gen_pk`] with the chains walked concurrently.
pub fn wots_gen_pk_parallel(
    sk_seed: &[u8; SPX_N],
    ctx: &HashContext,
    addr: &Address,
) -> [u8; SPX_WOTS_PK_BYTES] {
    let mut pk = [0u8; SPX_WOTS_PK_BYTES];
    pk.par_chunks_mut(SPX_N).enumerate().for_each(|(i, chunk)| {
        let mut top = [0u8; SPX_N];
        chain_from_seed(&mut top, i, SPX_WOTS_W as u32 - 1, sk_seed, ctx, addr);
        chunk.copy_from_slice(&top);
    });
    pk
}

/// [`wots_sign`] with the chains walked concurrently.
pub fn wots_sign_parallel(
    msg: &[u8; SPX_N],
    sk_seed: &[u8; SPX_N],
    ctx: &HashContext,
    addr: &Address,
) -> [u8; SPX_WOTS_BYTES] {
    let lengths = chain_lengths(msg);
    let mut sig = [0u8; SPX_WOTS_BYTES];
    sig.par_chunks_mut(SPX_N)
        .zip(lengths.par_iter())
        .enumerate()
        .for_each(|(i, (chunk, &steps))| {
            let mut node = [0u8; SPX_N];
            chain_from_seed(&mut node, i, steps, sk_seed, ctx, addr);
            chunk.copy_from_slice(&node);
        });
    sig
}

/// Computes the leaf at a given address. First generates the WOTS key pair,
/// then takes a hash of its public key.
pub fn wots_gen_leaf(
    leaf: &mut [u8; SPX_N],
    ctx: &HashContext,
    sk_seed: &[u8; SPX_N],
    addr_idx: u32,
    tree_addr: &Address,
) {
    let mut wots_addr = Address::from(AdrsType::WotsHash);
    let mut wots_pk_addr = Address::from(AdrsType::WotsPk);

    wots_addr.copy_subtree_addr(tree_addr);
    wots_addr.set_keypair_addr(addr_idx);
    let pk = wots_gen_pk(sk_seed, ctx, &wots_addr);

    wots_pk_addr.copy_keypair_addr(&wots_addr);
    ctx.thash(leaf, &pk, &wots_pk_addr);
}

/// Hypertree leaves: compressed WOTS+ public keys of the key pairs of one
/// subtree.
#[derive(Copy, Clone, Debug, Default)]
pub struct WotsLeaf;

impl LeafGenerator for WotsLeaf {
    fn gen_leaf(
        &self,
        leaf: &mut [u8; SPX_N],
        ctx: &HashContext,
        sk_seed: &[u8; SPX_N],
        addr_idx: u32,
        tree_addr: &Address,
    ) {
        wots_gen_leaf(leaf, ctx, sk_seed, addr_idx, tree_addr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    const SIG_HEX: &str = concat!(
        "d88a4c0779783e174e065c19727c6a70117b0857bf2beaadfa1d233a1765c6d3dbb54f3927a7970c",
        "7540f7391d935afeec336f84ce7106c66a7974428a83db54c532aa1faa0aefe95edbe51265114d61",
        "578990d7c086b3bffd4f98d669e0c4191a5ccc4a70d8a97b86277a6be5af329467e3dace6d1db34c",
        "d2d5ef30163f8060f5eea8a5fb026b31a8351df732310a7cc15df365af6e5cdcdb205b93c3cf3154",
        "a4aeadc896bf120a3223743763784f085ed532d9d33108c0aeda7329f9887e90fd8450761ecf14d3",
        "8a232e0e9fcc27aa6338d03ca5e2ee72f68f24ee37f80ccd2adebe912703e6e7e3eff1426d69f1dc",
        "7f636c46e912c35b026fdbe72bfe85b5b87dc2848e80cbb8b4dbf32b354ede563c068dc9ea53399e",
        "ee6ffb3a524b1def214029fb98efa77b7b0d53e5a4a56cc34be5c1b7a7699aff184947f25ab3a8ac",
        "ee9d8f9b9532bc20244c03a248f36dcd4f140bf632508ab4b4fe3472bdcc3f831fc4c154fd4c490f",
        "37254f20b7d347c65c9968f08ba4e01567cfa1ebd37df76c65aa55e3860def86d4ae4a1bf96a7db1",
        "d8ec0d70671846c1f754bd42fb421d3dae8871e822a6a123177a9f9b3f7e300259b13a34d63df002",
        "209d4724408961925186cfb7454d10f914af33722867e13c79e78d6ab4dad27d2ea0247866c11531",
        "4ddb94cca150a81d56ba2359ca3a3ecf8a98c414007c141f45f1e85b012511be0af2822db8bb05a2",
        "3aa78862bbce3c7d599841a7a45ab89673810c57e821db201a01a48f28535b7b8d6d873e89bc6902",
    );
    const PK_HEX: &str = concat!(
        "66281ffd64473d5e835e8b9ac68e25a41c91ddc55f1f83163cc66d6697ab680b5be52ff5fcf4965a",
        "eb39a4297f3b6e8ae8f025a2dd8d2ebfd659751cd85ec17a712424016fbcd7e07abff59b1a9039b3",
        "fc48b123cd3754194fd674a060c060dc57ea11c83549ff77261a8aaa5d03138b67463d71b1393362",
        "8ba3bfd35b1b5cc8678ce611794546103bf29dce7aa708b8b78b336d5a1053ea5392d5b6a63ae268",
        "ce3f680304b75e9e1f4c1f180268f71ecf20fb257aeb8d048bac76e154d9051c31e441e7b47d6b35",
        "5bd23f0efdd384e205773860df399b80cfbb06bc31000593509235335eadba10348c2aa73341ed03",
        "652cb8fd9615c57b5ddcf29c01070be586a5ccdb995d313caa131f796c853bdcc53beec51b6f6b0f",
        "6c9ff066b769f356bae9140486d3a9ef3e1a3296bac21133e3f89e96726a8f6d80d8810fd37ea7e8",
        "896d2eb7ea4eb254f53c971e45e0fe454a6ae1649f452ae1bdc35f25556f6a1e5e94fe3893b806d0",
        "b9872ddc7625045ed9e53ee9e16ce4a394ec04529892e8f11d92166ef4a83ed460121b3f86146921",
        "962c60a225f0aa3cab3b0b7e86167400ce9b02e9219d89c1f87ee541c639d2f4fa2159e8e59e99f7",
        "7a0a4b3790d2c4af4d3ed7e014b4b8a47f141bf47b77d93f4e069bcdcdda9a334cfe30ce53dbfcb8",
        "26e1d252eb878da59176a10b3e609ff08a98c414007c141f45f1e85b012511be03a7525c3c311011",
        "679311cc2e663f32ccec8630d1cf1fee8dd1fb693c952b3c397375b8a2a4709f189062c40e16c7b1",
    );

    fn counting() -> [u8; SPX_N] {
        let mut out = [0u8; SPX_N];
        for (i, b) in out.iter_mut().enumerate() {
            *b = i as u8;
        }
        out
    }

    fn random_n(rng: &mut impl RngCore) -> [u8; SPX_N] {
        let mut out = [0u8; SPX_N];
        rng.fill_bytes(&mut out);
        out
    }

    #[test]
    fn test_base_w() {
        let mut out = [0u32; 4];
        base_w(&mut out, &[0b1111_0000, 0b1010_1010]);
        assert_eq!(out, [0b1111, 0b0000, 0b1010, 0b1010]);
    }

    #[test]
    fn test_wots_checksum() {
        let mut msg_base_w = [0u32; SPX_WOTS_LEN1];
        base_w(&mut msg_base_w, &counting());

        let mut csum_base_w = [0u32; SPX_WOTS_LEN2];
        wots_checksum(&mut csum_base_w, &msg_base_w);
        assert_eq!(csum_base_w, [1, 6, 8]);

        let lengths = chain_lengths(&counting());
        assert_eq!(lengths[..SPX_WOTS_LEN1], msg_base_w);
        assert_eq!(lengths[SPX_WOTS_LEN1..], [1, 6, 8]);
    }

    #[test]
    fn test_checksum_extremes() {
        // All-zero digits give the largest checksum, 32 * 15 = 480 = 0x1e0.
        assert_eq!(chain_lengths(&[0u8; SPX_N])[SPX_WOTS_LEN1..], [1, 14, 0]);
        assert_eq!(chain_lengths(&[0xff; SPX_N])[SPX_WOTS_LEN1..], [0, 0, 0]);
    }

    #[test]
    fn test_wots_sign_known_answer() {
        let ctx = HashContext::new(&counting());
        let sig = wots_sign(&counting(), &counting(), &ctx, &Address::default());
        assert_eq!(hex::encode(sig), SIG_HEX);
    }

    #[test]
    fn test_wots_gen_pk_known_answer() {
        let ctx = HashContext::new(&counting());
        let pk = wots_gen_pk(&counting(), &ctx, &Address::default());
        assert_eq!(hex::encode(pk), PK_HEX);
    }

    #[test]
    fn test_self_check_scenario() {
        let seed = counting();
        let ctx = HashContext::new(&counting());
        let msg = counting();
        let addr = Address::default();

        let pk1 = wots_gen_pk(&seed, &ctx, &addr);
        let sig = wots_sign(&msg, &seed, &ctx, &addr);
        let pk2 = wots_pk_from_sig(&sig, &msg, &ctx, &addr);
        assert_eq!(pk1, pk2);
    }

    #[test]
    fn test_round_trip_random() {
        let mut rng = thread_rng();
        let ctx = HashContext::new(&random_n(&mut rng));
        let sk_seed = random_n(&mut rng);
        let msg = random_n(&mut rng);

        let mut addr = Address::from(AdrsType::WotsHash);
        addr.set_layer_addr(rng.gen_range(0..22));
        addr.set_tree_addr(rng.gen());
        addr.set_keypair_addr(rng.gen_range(0..8));

        let pk = wots_gen_pk(&sk_seed, &ctx, &addr);
        let sig = wots_sign(&msg, &sk_seed, &ctx, &addr);
        assert_eq!(wots_pk_from_sig(&sig, &msg, &ctx, &addr), pk);

        // A signature does not verify under a different message.
        let mut other = msg;
        other[0] ^= 0x10;
        assert_ne!(wots_pk_from_sig(&sig, &other, &ctx, &addr), pk);

        // Nor under a different key pair address.
        let mut other_addr = addr;
        other_addr.set_keypair_addr((addr.keypair_addr() + 1) % 8);
        assert_ne!(wots_pk_from_sig(&sig, &msg, &ctx, &other_addr), pk);
    }

    #[test]
    fn test_tampered_signature() {
        let ctx = HashContext::new(&counting());
        let addr = Address::default();
        let pk = wots_gen_pk(&counting(), &ctx, &addr);
        let mut sig = wots_sign(&counting(), &counting(), &ctx, &addr);
        sig[SPX_N * 5] ^= 1;
        assert_ne!(wots_pk_from_sig(&sig, &counting(), &ctx, &addr), pk);
    }

    #[test]
    fn test_chain_composition() {
        let mut rng = thread_rng();
        let ctx = HashContext::new(&random_n(&mut rng));
        let start = random_n(&mut rng);
        let mut adrs = Address::from(AdrsType::WotsHash);
        adrs.set_chain_addr(7);

        let mut direct = [0u8; SPX_N];
        gen_chain(&mut direct, &start, 0, 9, &ctx, &mut adrs);
        assert_eq!(adrs.hash_addr(), 8);

        let mut partial = [0u8; SPX_N];
        let mut rest = [0u8; SPX_N];
        gen_chain(&mut partial, &start, 0, 4, &ctx, &mut adrs);
        gen_chain(&mut rest, &partial, 4, 5, &ctx, &mut adrs);
        assert_eq!(rest, direct);

        // Zero steps and walks past the chain end.
        let mut same = [0u8; SPX_N];
        gen_chain(&mut same, &start, 3, 0, &ctx, &mut adrs);
        assert_eq!(same, start);

        let mut top = [0u8; SPX_N];
        let mut clamped = [0u8; SPX_N];
        gen_chain(&mut top, &start, 0, SPX_WOTS_W as u32 - 1, &ctx, &mut adrs);
        gen_chain(&mut clamped, &start, 0, 100, &ctx, &mut adrs);
        assert_eq!(top, clamped);
    }

    #[test]
    fn test_parallel_variants_match() {
        let mut rng = thread_rng();
        let ctx = HashContext::new(&random_n(&mut rng));
        let sk_seed = random_n(&mut rng);
        let msg = random_n(&mut rng);
        let mut addr = Address::from(AdrsType::WotsHash);
        addr.set_tree_addr(rng.gen());
        addr.set_keypair_addr(3);

        assert_eq!(
            wots_gen_pk_parallel(&sk_seed, &ctx, &addr),
            wots_gen_pk(&sk_seed, &ctx, &addr)
        );
        assert_eq!(
            wots_sign_parallel(&msg, &sk_seed, &ctx, &addr),
            wots_sign(&msg, &sk_seed, &ctx, &addr)
        );
    }

    #[test]
    fn test_wots_leaf() {
        let ctx = HashContext::new(&counting());
        let tree_addr = Address::from(AdrsType::HashTree);

        let mut leaf = [0u8; SPX_N];
        WotsLeaf.gen_leaf(&mut leaf, &ctx, &counting(), 0, &tree_addr);
        assert_eq!(hex::encode(leaf), "363d1f9afa1965e6e3acf4619c5c7a34");

        // The leaf is the compressed public key of key pair 0.
        let mut pk_addr = Address::from(AdrsType::WotsPk);
        pk_addr.set_keypair_addr(0);
        let pk = wots_gen_pk(&counting(), &ctx, &Address::default());
        let mut expected = [0u8; SPX_N];
        ctx.thash(&mut expected, &pk, &pk_addr);
        assert_eq!(leaf, expected);
    }
}
