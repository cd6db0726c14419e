//! Power-of-two sample storage with bitmask addressing

use tracing::{debug, warn};

use crate::error::SoundError;
use crate::sound::DEFAULT_BUFFER_LEN;

/// Returns `Ok(n)` if `n` is a nonzero power of two.
#[inline]
pub(crate) fn check_len(n: usize) -> Result<usize, SoundError> {
    if n.is_power_of_two() {
        Ok(n)
    } else {
        warn!(len = n, "rejected buffer length");
        Err(SoundError::InvalidBufferLength(n))
    }
}

/// One channel's worth of samples for one processing cycle.
///
/// The length is always a nonzero power of two, so any position (negative
/// or past the end) wraps into range with `pos & (len - 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBlock {
    data: Vec<f64>,
    mask: usize,
}

impl SampleBlock {
    /// Create a zeroed block of `len` samples
    pub fn new(len: usize) -> Result<Self, SoundError> {
        let len = check_len(len)?;
        Ok(Self {
            data: vec![0.0; len],
            mask: len - 1,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Never true for a constructed block
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reallocate to `len` zeroed samples.
    ///
    /// Previous contents are discarded, not resampled. On error the block is
    /// left untouched.
    pub fn resize(&mut self, len: usize) -> Result<(), SoundError> {
        let len = check_len(len)?;
        debug!(from = self.data.len(), to = len, "resizing sample block");
        self.data = vec![0.0; len];
        self.mask = len - 1;
        Ok(())
    }

    /// A zeroed block twice this one's length.
    pub(crate) fn doubled(&self) -> Self {
        let len = self.data.len() * 2;
        Self {
            data: vec![0.0; len],
            mask: len - 1,
        }
    }

    /// Sample at `pos`, wrapped into range.
    #[inline]
    pub fn get(&self, pos: isize) -> f64 {
        // two's complement cast keeps negative positions periodic
        self.data[(pos as usize) & self.mask]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl Default for SampleBlock {
    /// A zeroed block of [`DEFAULT_BUFFER_LEN`] samples
    fn default() -> Self {
        Self {
            data: vec![0.0; DEFAULT_BUFFER_LEN],
            mask: DEFAULT_BUFFER_LEN - 1,
        }
    }
}
