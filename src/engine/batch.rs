//! Data-parallel SHA-256 over batches of independent messages.

use super::cooperative::warp_sha256;
use super::{validate_batch, LaunchConfig};
use crate::error::{Error, Result};
use crate::hash::sha256::sha256;
use crate::params::SPX_SHA256_OUTPUT_BYTES;
use rayon::prelude::*;

/// Hashes `total_msg_num` messages of `msg_size` bytes each, stored back to
/// back in `input`. The digest of message `i` is written to
/// `out[32 * i..32 * (i + 1)]`.
///
/// Each worker of `launch` hashes at least `ceil(total_msg_num / workers)`
/// messages.
pub fn dp_sha256(
    input: &[u8],
    out: &mut [u8],
    msg_size: usize,
    total_msg_num: usize,
    launch: &LaunchConfig,
) -> Result<()> {
    launch.validate()?;
    validate_batch(input, out, msg_size, total_msg_num)?;
    let per_worker = launch.messages_per_worker(total_msg_num);
    log::debug!(
        "Data-parallel SHA-256: {} messages of {} bytes on {} workers",
        total_msg_num,
        msg_size,
        launch.workers()
    );

    out.par_chunks_mut(SPX_SHA256_OUTPUT_BYTES)
        .enumerate()
        .with_min_len(per_worker)
        .for_each(|(i, slot)| {
            let msg = &input[i * msg_size..(i + 1) * msg_size];
            slot.copy_from_slice(&sha256(msg));
        });
    Ok(())
}

/// Like [`dp_sha256`], for messages of differing lengths.
pub fn dp_sha256_messages<M>(messages: &[M], out: &mut [u8], launch: &LaunchConfig) -> Result<()>
where
    M: AsRef<[u8]> + Sync,
{
    launch.validate()?;
    if messages.is_empty() {
        return Err(Error::EmptyBatch);
    }
    let expected_out = SPX_SHA256_OUTPUT_BYTES
        .checked_mul(messages.len())
        .ok_or(Error::BadLength(usize::MAX, out.len()))?;
    if out.len() != expected_out {
        return Err(Error::BadLength(expected_out, out.len()));
    }
    let per_worker = launch.messages_per_worker(messages.len());
    log::debug!(
        "Data-parallel SHA-256: {} variable-size messages on {} workers",
        messages.len(),
        launch.workers()
    );

    out.par_chunks_mut(SPX_SHA256_OUTPUT_BYTES)
        .zip(messages.par_iter())
        .with_min_len(per_worker)
        .for_each(|(slot, msg)| slot.copy_from_slice(&sha256(msg.as_ref())));
    Ok(())
}

/// Hashes a contiguous batch with one cooperative warp per message.
///
/// Every message costs [`warp_sha256`]'s lane threads on top of the rayon
/// task that hashes it; prefer [`dp_sha256`] for throughput.
pub fn dp_warp_sha256(
    input: &[u8],
    out: &mut [u8],
    msg_size: usize,
    total_msg_num: usize,
) -> Result<()> {
    validate_batch(input, out, msg_size, total_msg_num)?;
    log::debug!(
        "Cooperative SHA-256: {} messages of {} bytes",
        total_msg_num,
        msg_size
    );

    out.par_chunks_mut(SPX_SHA256_OUTPUT_BYTES)
        .enumerate()
        .for_each(|(i, slot)| {
            let msg = &input[i * msg_size..(i + 1) * msg_size];
            slot.copy_from_slice(&warp_sha256(msg));
        });
    Ok(())
}
