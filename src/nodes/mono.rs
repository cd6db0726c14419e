//! Single-channel passthrough and gate

use crate::block::SampleBlock;
use crate::config::SoundConfig;
use crate::error::SoundError;
use crate::sound::{ChannelMut, NodeId, Sound, DEFAULT_SAMPLE_RATE};

/// The minimal [`Sound`]: one block, one optional input, one on/off flag.
///
/// Used on its own as an identity/gate node, and inside [`Stereo`] as
/// per-channel storage.
///
/// A new node is on. [`off`](Sound::off) and [`on`](Sound::on) are the only
/// transitions.
///
/// [`Stereo`]: crate::Stereo
#[derive(Clone, Debug)]
pub struct Mono {
    sample_rate: f64,
    input: Option<NodeId>,
    out: SampleBlock,
    cycle: u64,
    off: bool,
}

impl Mono {
    /// Create a mono node reading from `input`, with default rate and length
    pub fn new(input: NodeId) -> Self {
        Self::build(Some(input), DEFAULT_SAMPLE_RATE, SampleBlock::default())
    }

    /// Create a mono node with no input.
    pub fn detached() -> Self {
        Self::build(None, DEFAULT_SAMPLE_RATE, SampleBlock::default())
    }

    pub fn with_config(input: Option<NodeId>, config: &SoundConfig) -> Result<Self, SoundError> {
        let out = SampleBlock::new(config.buffer_len)?;
        Ok(Self::build(input, config.sample_rate, out))
    }

    fn build(input: Option<NodeId>, sample_rate: f64, out: SampleBlock) -> Self {
        Self {
            sample_rate,
            input,
            out,
            cycle: 0,
            off: false,
        }
    }

    #[inline]
    pub fn input(&self) -> Option<NodeId> {
        self.input
    }

    /// Id of the last cycle this node was prepared for
    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Writable view of the block, for the node that owns this one.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [f64] {
        self.out.as_mut_slice()
    }
}

impl ChannelMut<'_, Mono> {
    /// Writable view of the channel block.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [f64] {
        self.channel.samples_mut()
    }
}

impl Sound for Mono {
    #[inline]
    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[inline]
    fn channels(&self) -> usize {
        1
    }

    #[inline]
    fn buffer_len(&self) -> usize {
        self.out.len()
    }

    fn set_buffer_len(&mut self, n: usize) -> Result<(), SoundError> {
        self.out.resize(n)
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

    #[inline]
    fn on(&mut self) {
        self.off = false;
    }

    #[inline]
    fn off(&mut self) {
        self.off = true;
    }

    #[inline]
    fn is_off(&self) -> bool {
        self.off
    }

    fn inputs(&self) -> &[NodeId] {
        self.input.as_slice()
    }
}
