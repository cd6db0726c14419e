//! Error types for node construction and graph setup

use thiserror::Error;

use crate::sound::NodeId;

/// Errors raised while building or reconfiguring a sound graph.
///
/// None of these can happen during a processing cycle: `prepare`, `sample`
/// and `samples` are total. Everything here is a setup-time bug and should
/// abort the setup phase that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SoundError {
    /// A buffer length was zero or not a power of two.
    #[error("buffer length {0} is not a power of 2")]
    InvalidBufferLength(usize),

    /// A node id does not name a node in the graph.
    #[error("no node with id {0:?} in the graph")]
    UnknownNode(NodeId),

    /// The inputs relation loops back on itself, so there is no prepare order.
    #[error("node {0:?} depends on itself through its inputs")]
    Cycle(NodeId),
}
