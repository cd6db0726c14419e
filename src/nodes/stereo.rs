//! Two-channel node built from a pair of [`Mono`] nodes

use delegate::delegate;
use itertools::interleave;

use crate::block::{check_len, SampleBlock};
use crate::config::SoundConfig;
use crate::error::SoundError;
use crate::nodes::Mono;
use crate::sound::{ChannelMut, NodeId, Sound, StereoSound};

/// A stereo node: left and right [`Mono`] channels plus an interleaved output.
///
/// The children have no inputs of their own. They hold per-channel gating
/// and sample storage; the stereo node's own block is `2 × buffer_len`
/// samples laid out as `L0 R0 L1 R1 ...`.
///
/// [`buffer_len`](Sound::buffer_len) is the per-channel length, half the
/// interleaved block. Only [`set_buffer_len`](Sound::set_buffer_len) on the
/// stereo node changes it, and it resizes both channels in step. Meanwhile
/// [`samples`](Sound::samples) and [`sample`](Sound::sample) address the
/// full interleaved block.
///
/// The node is off when either channel is off.
#[derive(Clone, Debug)]
pub struct Stereo {
    left: Mono,
    right: Mono,
    input: NodeId,
    out: SampleBlock,
    cycle: u64,
}

impl Stereo {
    /// Create a stereo node reading from `input`, with default rate and length
    pub fn new(input: NodeId) -> Self {
        Self {
            left: Mono::detached(),
            right: Mono::detached(),
            input,
            out: SampleBlock::default().doubled(),
            cycle: 0,
        }
    }

    pub fn with_config(input: NodeId, config: &SoundConfig) -> Result<Self, SoundError> {
        Ok(Self {
            left: Mono::with_config(None, config)?,
            right: Mono::with_config(None, config)?,
            input,
            out: SampleBlock::new(doubled(config.buffer_len)?)?,
            cycle: 0,
        })
    }

    #[inline]
    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Id of the last cycle this node was prepared for
    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Writable view of the interleaved block, for the node that owns this one.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [f64] {
        self.out.as_mut_slice()
    }

    /// Copy the channel blocks into the interleaved output block.
    pub fn interleave(&mut self) {
        let frames = interleave(self.left.samples(), self.right.samples());
        for (out, &s) in self.out.as_mut_slice().iter_mut().zip(frames) {
            *out = s;
        }
    }

    /// Left and right samples of frame `pos`, wrapped like [`Sound::sample`]
    #[inline]
    pub fn frame(&self, pos: isize) -> (f64, f64) {
        let i = pos.wrapping_mul(2);
        (self.out.get(i), self.out.get(i.wrapping_add(1)))
    }
}

/// Interleaved length for `n` samples per channel.
fn doubled(n: usize) -> Result<usize, SoundError> {
    check_len(n)?
        .checked_mul(2)
        .ok_or(SoundError::InvalidBufferLength(n))
}

impl Sound for Stereo {
    delegate! {
        to self.left {
            fn sample_rate(&self) -> f64;
        }
    }

    #[inline]
    fn buffer_len(&self) -> usize {
        self.out.len() / 2
    }

    #[inline]
    fn channels(&self) -> usize {
        2
    }

    fn set_buffer_len(&mut self, n: usize) -> Result<(), SoundError> {
        self.out.resize(doubled(n)?)?;
        self.left.set_buffer_len(n)?;
        self.right.set_buffer_len(n)
    }

    fn prepare(&mut self, cycle: u64) {
        self.cycle = cycle;
    }

    #[inline]
    fn samples(&self) -> &[f64] {
        self.out.as_slice()
    }

    #[inline]
    fn sample(&self, pos: isize) -> f64 {
        self.out.get(pos)
    }

    fn on(&mut self) {
        self.left.on();
        self.right.on();
    }

    fn off(&mut self) {
        self.left.off();
        self.right.off();
    }

    #[inline]
    fn is_off(&self) -> bool {
        self.left.is_off() || self.right.is_off()
    }

    fn inputs(&self) -> &[NodeId] {
        core::slice::from_ref(&self.input)
    }
}

impl StereoSound for Stereo {
    type Channel = Mono;

    fn left(&self) -> &Mono {
        &self.left
    }

    fn left_mut(&mut self) -> ChannelMut<'_, Mono> {
        ChannelMut::new(&mut self.left)
    }

    fn right(&self) -> &Mono {
        &self.right
    }

    fn right_mut(&mut self) -> ChannelMut<'_, Mono> {
        ChannelMut::new(&mut self.right)
    }
}
