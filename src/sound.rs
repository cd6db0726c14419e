//! Core sound trait and shared types.

use core::ops::Deref;

use crate::error::SoundError;

/// Sample rate new nodes start with, in Hz.
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

/// Samples per channel new nodes start with.
pub const DEFAULT_BUFFER_LEN: usize = 256;

/// Identifier for a node in a [`SoundGraph`](crate::SoundGraph).
///
/// Nodes refer to their upstream inputs by id, never by ownership, so a
/// node observes its producers without controlling their lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

/// The core trait for nodes that produce a block of samples per cycle.
///
/// Every node in a graph implements this, from the structural [`Mono`] and
/// [`Stereo`] nodes to whatever oscillators and filters are built on top.
///
/// # Cycle contract
///
/// A dispatcher outside this crate walks [`inputs`](Sound::inputs) to find a
/// dependency order, then calls [`prepare`](Sound::prepare) on every node in
/// that order, once per cycle. By the time a node's `prepare` runs, all of
/// its inputs have been prepared for the same cycle, so a generator may read
/// their blocks and fill its own. Consumers then read the finished block with
/// [`sample`](Sound::sample) or [`samples`](Sound::samples).
///
/// Everything called per cycle must be total and allocation-free.
///
/// ```
/// use snd::{Mono, NodeId, Sound, SoundError};
///
/// /// Writes a ramp into its block every cycle.
/// struct Ramp {
///     out: Mono,
/// }
///
/// impl Sound for Ramp {
///     fn sample_rate(&self) -> f64 { self.out.sample_rate() }
///     fn channels(&self) -> usize { 1 }
///     fn buffer_len(&self) -> usize { self.out.buffer_len() }
///     fn set_buffer_len(&mut self, n: usize) -> Result<(), SoundError> {
///         self.out.set_buffer_len(n)
///     }
///
///     fn prepare(&mut self, cycle: u64) {
///         self.out.prepare(cycle);
///         let len = self.out.buffer_len() as f64;
///         for (i, s) in self.out.samples_mut().iter_mut().enumerate() {
///             *s = i as f64 / len;
///         }
///     }
///
///     fn samples(&self) -> &[f64] { self.out.samples() }
///     fn sample(&self, pos: isize) -> f64 { self.out.sample(pos) }
///
///     fn on(&mut self) { self.out.on() }
///     fn off(&mut self) { self.out.off() }
///     fn is_off(&self) -> bool { self.out.is_off() }
///
///     fn inputs(&self) -> &[NodeId] { &[] }
/// }
///
/// let mut ramp = Ramp { out: Mono::detached() };
/// ramp.set_buffer_len(4)?;
/// ramp.prepare(0);
/// assert_eq!(ramp.samples(), &[0.0, 0.25, 0.5, 0.75]);
/// assert_eq!(ramp.sample(-1), 0.75);
/// # Ok::<(), SoundError>(())
/// ```
///
/// [`Mono`]: crate::Mono
/// [`Stereo`]: crate::Stereo
pub trait Sound: Send + 'static {
    /// Output rate in Hz. Informational only.
    fn sample_rate(&self) -> f64;

    /// Number of output channels (1 for mono, 2 for stereo)
    fn channels(&self) -> usize;

    /// Number of samples per channel in one cycle.
    fn buffer_len(&self) -> usize;

    /// Resize the internal block(s) to `n` samples per channel.
    ///
    /// Fails with [`SoundError::InvalidBufferLength`] when `n` is zero or not
    /// a power of two, leaving the node unchanged. Lengths are never rounded:
    /// a silently adjusted length would desynchronize every node downstream.
    /// On success previous contents are discarded.
    fn set_buffer_len(&mut self, n: usize) -> Result<(), SoundError>;

    /// Prepare this cycle's block.
    ///
    /// Called after every node in [`inputs`](Sound::inputs) has been prepared
    /// for the same `cycle`.
    fn prepare(&mut self, cycle: u64);

    /// Block prepared for the most recent cycle.
    ///
    /// This borrows the node's own storage; no copy is made.
    fn samples(&self) -> &[f64];

    /// Sample at `pos`, wrapped into the block with a bitmask.
    ///
    /// Defined for every `pos`, negative or past the end.
    fn sample(&self, pos: isize) -> f64;

    /// Switch the node on. Afterwards `is_off()` is false.
    fn on(&mut self);

    /// Switch the node off. Afterwards `is_off()` is true.
    fn off(&mut self);

    /// Whether the node is switched off; new nodes start on.
    fn is_off(&self) -> bool;

    /// Upstream nodes this one reads from, for dispatch-order discovery
    fn inputs(&self) -> &[NodeId];
}

/// A two-channel [`Sound`] that exposes its per-channel nodes.
///
/// Channels are handed out mutably only through [`ChannelMut`], so the
/// parent stays the one place their length is changed.
pub trait StereoSound: Sound {
    type Channel: Sound;

    fn left(&self) -> &Self::Channel;
    fn left_mut(&mut self) -> ChannelMut<'_, Self::Channel>;
    fn right(&self) -> &Self::Channel;
    fn right_mut(&mut self) -> ChannelMut<'_, Self::Channel>;
}

/// Mutable handle to one channel of a [`StereoSound`].
///
/// Allows gating and, for [`Mono`](crate::Mono) channels, writing samples,
/// but not [`set_buffer_len`](Sound::set_buffer_len). Reads go through
/// `Deref`.
pub struct ChannelMut<'a, C: Sound> {
    pub(crate) channel: &'a mut C,
}

impl<'a, C: Sound> ChannelMut<'a, C> {
    pub fn new(channel: &'a mut C) -> Self {
        Self { channel }
    }

    #[inline]
    pub fn on(&mut self) {
        self.channel.on()
    }

    #[inline]
    pub fn off(&mut self) {
        self.channel.off()
    }
}

impl<C: Sound> Deref for ChannelMut<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.channel
    }
}
