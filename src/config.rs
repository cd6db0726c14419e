//! Construction-time node configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::block::check_len;
use crate::error::SoundError;
use crate::sound::{DEFAULT_BUFFER_LEN, DEFAULT_SAMPLE_RATE};

/// Sample rate and buffer length a node is built with.
///
/// ```
/// use snd::{Mono, Sound, SoundConfig};
///
/// let config = SoundConfig::default()
///     .with_sample_rate(48_000.0)
///     .with_buffer_len(64);
///
/// let mono = Mono::with_config(None, &config)?;
/// assert_eq!(mono.buffer_len(), 64);
/// assert_eq!(mono.sample_rate(), 48_000.0);
/// # Ok::<(), snd::SoundError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoundConfig {
    /// Output rate in Hz
    pub sample_rate: f64,
    /// Samples per channel per cycle; must be a nonzero power of two
    pub buffer_len: usize,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_len: DEFAULT_BUFFER_LEN,
        }
    }
}

impl SoundConfig {
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_buffer_len(mut self, buffer_len: usize) -> Self {
        self.buffer_len = buffer_len;
        self
    }

    /// Check the buffer length without building anything
    pub fn validate(&self) -> Result<(), SoundError> {
        check_len(self.buffer_len).map(drop)
    }
}
