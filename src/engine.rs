//! Parallel SHA-256 engines.
//!
//! Three strategies over the same compression function:
//! * [`cooperative`]: a small group of lanes jointly computes one digest.
//! * [`batch`]: many independent messages, one per worker (data parallel).
//! * [`stream`]: the data-parallel batch split over several independent
//!   streams that overlap staging and hashing.
//!
//! Every engine produces output byte-identical to [`crate::hash::sha256::sha256`].
//! Batch descriptors are validated before any work is dispatched.

pub mod batch;
pub mod cooperative;
pub mod stream;

use crate::error::{Error, Result};
use crate::params::SPX_SHA256_OUTPUT_BYTES;

/// Launch granularity of a batch call. The number of workers is
/// `grid_size * block_size`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaunchConfig {
    pub grid_size: usize,
    pub block_size: usize,
}

impl Default for LaunchConfig {
    /// One block per available rayon thread.
    fn default() -> Self {
        Self {
            grid_size: rayon::current_num_threads(),
            block_size: 1,
        }
    }
}

impl LaunchConfig {
    pub fn new(grid_size: usize, block_size: usize) -> Self {
        Self {
            grid_size,
            block_size,
        }
    }

    pub fn workers(&self) -> usize {
        self.grid_size.saturating_mul(self.block_size)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 || self.block_size == 0 {
            return Err(Error::InvalidLaunch {
                grid_size: self.grid_size,
                block_size: self.block_size,
            });
        }
        Ok(())
    }

    /// Minimum number of messages handed to one worker.
    pub(crate) fn messages_per_worker(&self, total_msg_num: usize) -> usize {
        let workers = self.workers();
        if workers > total_msg_num {
            log::warn!(
                "Launch of {} workers is wider than the batch of {} messages",
                workers,
                total_msg_num
            );
        }
        div_ceil(total_msg_num, workers)
    }
}

/// `ceil(a / b)` without the overflow of `(a + b - 1) / b`.
pub(crate) fn div_ceil(a: usize, b: usize) -> usize {
    a / b + usize::from(a % b != 0)
}

/// Checks a contiguous equal-size batch descriptor against its buffers.
pub(crate) fn validate_batch(
    input: &[u8],
    out: &[u8],
    msg_size: usize,
    total_msg_num: usize,
) -> Result<()> {
    if total_msg_num == 0 {
        return Err(Error::EmptyBatch);
    }
    let expected_input = msg_size
        .checked_mul(total_msg_num)
        .ok_or(Error::BadLength(usize::MAX, input.len()))?;
    if input.len() != expected_input {
        return Err(Error::BadLength(expected_input, input.len()));
    }
    let expected_out = SPX_SHA256_OUTPUT_BYTES
        .checked_mul(total_msg_num)
        .ok_or(Error::BadLength(usize::MAX, out.len()))?;
    if out.len() != expected_out {
        return Err(Error::BadLength(expected_out, out.len()));
    }
    Ok(())
}
