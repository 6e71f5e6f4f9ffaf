//! Cooperative SHA-256: a warp of lanes jointly computes a single digest.
//!
//! Per compression block, the lanes load the sixteen message words in
//! parallel and extend the message schedule two words per step, meeting at a
//! barrier after every step. The 64 rounds are then run by every lane in
//! lock-step on a private copy of the working state, so no lane ever writes
//! state another lane reads.

use crate::hash::sha256::{state_to_digest, IV_256};
use crate::params::{SPX_SHA256_BLOCK_BYTES, SPX_SHA256_OUTPUT_BYTES};
use crate::utils::u64_to_bytes;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Barrier;
use std::thread;

/// Number of lanes that cooperate on one digest.
pub const WARP_LANES: usize = 8;

const SCHEDULE_WORDS: usize = 64;

/// Words of the schedule extended per barrier step. `W[t+1]` does not depend
/// on `W[t]`, so two words can be produced concurrently.
const SCHEDULE_STEP: usize = 2;

const K: [u32; SCHEDULE_WORDS] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

#[inline(always)]
fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

#[inline(always)]
fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

#[inline(always)]
fn big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline(always)]
fn big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline(always)]
fn small_sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
fn small_sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

/// Appends the 0x80 marker, zero fill and the 64-bit bit length.
fn pad_message(input: &[u8]) -> Vec<u8> {
    let padded_len = (input.len() + 9 + SPX_SHA256_BLOCK_BYTES - 1) / SPX_SHA256_BLOCK_BYTES
        * SPX_SHA256_BLOCK_BYTES;
    let mut padded = Vec::with_capacity(padded_len);
    padded.extend_from_slice(input);
    padded.push(0x80);
    padded.resize(padded_len - 8, 0);
    padded.extend_from_slice(&u64_to_bytes((input.len() as u64) << 3));
    padded
}

fn load_be32(block: &[u8], word: usize) -> u32 {
    u32::from_be_bytes([
        block[4 * word],
        block[4 * word + 1],
        block[4 * word + 2],
        block[4 * word + 3],
    ])
}

/// The 64 rounds over an already expanded schedule.
fn compress_rounds(h: &mut [u32; 8], w: &[u32; SCHEDULE_WORDS]) {
    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut hh] = *h;
    for t in 0..SCHEDULE_WORDS {
        let t1 = hh
            .wrapping_add(big_sigma1(e))
            .wrapping_add(ch(e, f, g))
            .wrapping_add(K[t])
            .wrapping_add(w[t]);
        let t2 = big_sigma0(a).wrapping_add(maj(a, b, c));
        hh = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }
    for (state, word) in h.iter_mut().zip([a, b, c, d, e, f, g, hh]) {
        *state = state.wrapping_add(word);
    }
}

/// The work of one lane over every block of `padded`.
///
/// Stores to the shared schedule are ordered by the barrier, so relaxed
/// atomics suffice.
fn lane_compress(
    lane: usize,
    padded: &[u8],
    schedule: &[AtomicU32],
    barrier: &Barrier,
) -> [u32; 8] {
    let mut h = IV_256;
    let mut w = [0u32; SCHEDULE_WORDS];

    for block in padded.chunks_exact(SPX_SHA256_BLOCK_BYTES) {
        for t in (lane..16).step_by(WARP_LANES) {
            schedule[t].store(load_be32(block, t), Ordering::Relaxed);
        }
        barrier.wait();

        for t in (16..SCHEDULE_WORDS).step_by(SCHEDULE_STEP) {
            if lane < SCHEDULE_STEP {
                let i = t + lane;
                let word = small_sigma1(schedule[i - 2].load(Ordering::Relaxed))
                    .wrapping_add(schedule[i - 7].load(Ordering::Relaxed))
                    .wrapping_add(small_sigma0(schedule[i - 15].load(Ordering::Relaxed)))
                    .wrapping_add(schedule[i - 16].load(Ordering::Relaxed));
                schedule[i].store(word, Ordering::Relaxed);
            }
            barrier.wait();
        }

        for (dst, src) in w.iter_mut().zip(schedule) {
            *dst = src.load(Ordering::Relaxed);
        }
        // The schedule is rewritten by the next block.
        barrier.wait();

        compress_rounds(&mut h, &w);
    }
    h
}

/// SHA-256 of `input`, computed by [`WARP_LANES`] cooperating lanes.
///
/// Each call spawns `WARP_LANES - 1` scoped threads, and every lane runs the
/// 64 rounds on its own copy of the state. The schedule is the only shared
/// work, so this is slower than [`crate::hash::sha256::sha256`] on a CPU.
pub fn warp_sha256(input: &[u8]) -> [u8; SPX_SHA256_OUTPUT_BYTES] {
    let padded = pad_message(input);
    let schedule: Vec<AtomicU32> = (0..SCHEDULE_WORDS).map(|_| AtomicU32::new(0)).collect();
    let barrier = Barrier::new(WARP_LANES);

    let h = thread::scope(|s| {
        for lane in 1..WARP_LANES {
            let (padded, schedule, barrier) = (&padded, &schedule, &barrier);
            s.spawn(move || lane_compress(lane, padded, schedule, barrier));
        }
        // Every lane ends with the same chaining value; lane 0 runs here.
        lane_compress(0, &padded, &schedule, &barrier)
    });

    state_to_digest(&h)
}
