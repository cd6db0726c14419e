//! Structural nodes
//!
//! Every other node in a graph is built from, or wraps, one of these:
//! - [`Mono`] - one channel, one optional input, an on/off gate
//! - [`Stereo`] - two [`Mono`] channels and an interleaved output block
//!
//! Neither computes samples in `prepare`; they hold and gate samples written
//! by whatever node owns them.

mod mono;
mod stereo;

pub use mono::Mono;
pub use stereo::Stereo;
