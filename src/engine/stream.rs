//! Multi-stream data-parallel SHA-256.
//!
//! The batch is cut into contiguous partitions, one per stream. Inside a
//! stream, a staging thread copies the next chunk of messages while the
//! current chunk is hashed, handing chunks over a channel of depth one.
//! Streams run independently; each writes only its own output slots.

use super::{div_ceil, validate_batch, LaunchConfig};
use crate::error::{Error, Result};
use crate::hash::sha256::sha256;
use crate::params::SPX_SHA256_OUTPUT_BYTES;
use rayon::prelude::*;
use std::sync::mpsc;
use std::thread;

/// Hashes `total_msg_num` messages of `msg_size` bytes over `streams`
/// overlapping streams. Output layout is the one of
/// [`super::batch::dp_sha256`]; a stream hashes up to one launch worth of
/// messages (`launch.workers()`) per chunk.
pub fn msdp_sha256(
    input: &[u8],
    out: &mut [u8],
    msg_size: usize,
    total_msg_num: usize,
    launch: &LaunchConfig,
    streams: usize,
) -> Result<()> {
    launch.validate()?;
    if streams == 0 {
        return Err(Error::InvalidStreamCount(streams));
    }
    validate_batch(input, out, msg_size, total_msg_num)?;

    let per_stream = div_ceil(total_msg_num, streams);
    let chunk_msgs = launch.workers().min(per_stream);
    log::debug!(
        "Multi-stream SHA-256: {} messages on {} streams, {} messages per chunk",
        total_msg_num,
        streams,
        chunk_msgs
    );
    if streams > total_msg_num {
        log::warn!(
            "{} streams requested for {} messages, {} streams stay idle",
            streams,
            total_msg_num,
            streams - total_msg_num
        );
    }

    thread::scope(|s| {
        for (stream, out_part) in out
            .chunks_mut(per_stream * SPX_SHA256_OUTPUT_BYTES)
            .enumerate()
        {
            let first = stream * per_stream;
            let count = out_part.len() / SPX_SHA256_OUTPUT_BYTES;
            let in_part = &input[first * msg_size..(first + count) * msg_size];
            s.spawn(move || run_stream(stream, in_part, out_part, msg_size, chunk_msgs));
        }
    });
    Ok(())
}

/// One stream: staging and hashing overlap chunk by chunk.
fn run_stream(stream: usize, input: &[u8], out: &mut [u8], msg_size: usize, chunk_msgs: usize) {
    let count = out.len() / SPX_SHA256_OUTPUT_BYTES;
    log::trace!(
        "Stream {}: {} messages in chunks of {}",
        stream,
        count,
        chunk_msgs
    );
    let (tx, rx) = mpsc::sync_channel::<Vec<u8>>(1);

    thread::scope(|s| {
        s.spawn(move || {
            for start in (0..count).step_by(chunk_msgs) {
                let end = (start + chunk_msgs).min(count);
                let staged = input[start * msg_size..end * msg_size].to_vec();
                if tx.send(staged).is_err() {
                    break;
                }
            }
        });

        for (out_chunk, staged) in out
            .chunks_mut(chunk_msgs * SPX_SHA256_OUTPUT_BYTES)
            .zip(rx.iter())
        {
            out_chunk
                .par_chunks_mut(SPX_SHA256_OUTPUT_BYTES)
                .enumerate()
                .for_each(|(i, slot)| {
                    slot.copy_from_slice(&sha256(&staged[i * msg_size..(i + 1) * msg_size]));
                });
        }
    });
}
