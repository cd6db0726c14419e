//! Sample-buffer core for real-time synthesis graphs.
//!
//! Every node in a graph implements [`Sound`]: it owns a power-of-two sized
//! block of samples per channel, is prepared once per cycle after its
//! inputs, and hands its finished block to downstream nodes by reference.
//!
//! Two structural nodes are provided, [`Mono`] and [`Stereo`]. Oscillators,
//! filters and mixers are built on top of them. [`SoundGraph`] owns the
//! nodes and tells a dispatcher what order to prepare them in; deciding when
//! and on which thread to run a cycle is left to the caller.
//!
//! # Addressing
//!
//! Block lengths are always nonzero powers of two, checked on every resize.
//! [`Sound::sample`] wraps any position, negative or past the end, with
//! `pos & (len - 1)` instead of a modulo.

extern crate alloc;

mod block;
mod config;
mod error;
mod graph;
mod sound;
pub mod nodes;

pub use block::SampleBlock;
pub use config::SoundConfig;
pub use error::SoundError;
pub use graph::SoundGraph;
pub use nodes::{Mono, Stereo};
pub use sound::{
    ChannelMut, NodeId, Sound, StereoSound, DEFAULT_BUFFER_LEN, DEFAULT_SAMPLE_RATE,
};
