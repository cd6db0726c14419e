//! Node table - owns sounds and resolves their inputs

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;
use petgraph::algo::toposort;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use tracing::{debug, trace};

use crate::block::check_len;
use crate::error::SoundError;
use crate::sound::{NodeId, Sound};

struct Entry {
    id: NodeId,
    sound: Box<dyn Sound>,
}

type InnerGraph = StableGraph<Entry, ()>;

/// Owns every node of a graph and hands out [`NodeId`]s for them.
///
/// Nodes name their upstream producers by id through [`Sound::inputs`],
/// so the table is the only owner and feedback-shaped topologies never
/// turn into ownership cycles. An input may name a node added later.
///
/// The table does not run cycles itself. A dispatcher asks for a
/// [`prepare_order`](Self::prepare_order) and calls [`Sound::prepare`] on
/// each node in turn:
///
/// ```
/// use snd::{Mono, SoundGraph, Stereo};
///
/// let mut graph = SoundGraph::new();
/// let source = graph.add(Mono::detached());
/// let gate = graph.add(Mono::new(source));
/// let out = graph.add(Stereo::new(gate));
///
/// graph.set_buffer_len(64)?;
///
/// for cycle in 0..4 {
///     for id in graph.prepare_order()? {
///         if let Some(sound) = graph.get_mut(id) {
///             sound.prepare(cycle);
///         }
///     }
/// }
///
/// assert_eq!(graph.get(out).map(|s| s.samples().len()), Some(128));
/// # Ok::<(), snd::SoundError>(())
/// ```
#[derive(Default)]
pub struct SoundGraph {
    graph: InnerGraph,
    node_indices: HashMap<NodeId, NodeIndex>,
    next_node_id: u32,
}

impl SoundGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returns the id other nodes use to read from it
    pub fn add<S: Sound>(&mut self, sound: S) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;

        let idx = self.graph.add_node(Entry {
            id,
            sound: Box::new(sound),
        });
        self.node_indices.insert(id, idx);

        trace!(?id, channels = self.graph[idx].sound.channels(), "added node");
        id
    }

    /// Remove a node and hand it back.
    ///
    /// Nodes that still list `id` as an input make the next
    /// [`prepare_order`](Self::prepare_order) fail.
    pub fn remove(&mut self, id: NodeId) -> Option<Box<dyn Sound>> {
        let idx = self.node_indices.remove(&id)?;
        trace!(?id, "removed node");
        self.graph.remove_node(idx).map(|entry| entry.sound)
    }

    pub fn get(&self, id: NodeId) -> Option<&dyn Sound> {
        let idx = *self.node_indices.get(&id)?;
        Some(self.graph[idx].sound.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut dyn Sound> {
        let idx = *self.node_indices.get(&id)?;
        let sound: &mut dyn Sound = self.graph[idx].sound.as_mut();
        Some(sound)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node_indices.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.node_indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }

    /// Ids of every node in the table, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_indices.keys().copied()
    }

    /// Direct upstream dependencies of `id`
    pub fn inputs_of(&self, id: NodeId) -> Result<&[NodeId], SoundError> {
        self.get(id)
            .map(|sound| sound.inputs())
            .ok_or(SoundError::UnknownNode(id))
    }

    /// Order in which to prepare nodes so inputs come before dependents.
    ///
    /// Walks [`Sound::inputs`] on every node, so changes since the last
    /// call are picked up. Fails with [`SoundError::UnknownNode`] if an
    /// input names a node not in the table, and [`SoundError::Cycle`] if
    /// the inputs loop back on themselves.
    pub fn prepare_order(&mut self) -> Result<Vec<NodeId>, SoundError> {
        let mut edges = Vec::new();
        for idx in self.graph.node_indices() {
            for &input in self.graph[idx].sound.inputs() {
                let from = *self
                    .node_indices
                    .get(&input)
                    .ok_or(SoundError::UnknownNode(input))?;
                edges.push((from, idx));
            }
        }

        self.graph.retain_edges(|_, _| false);
        for (from, to) in edges {
            self.graph.add_edge(from, to, ());
        }

        let order: Vec<NodeId> = toposort(&self.graph, None)
            .map_err(|cycle| SoundError::Cycle(self.graph[cycle.node_id()].id))?
            .into_iter()
            .map(|idx| self.graph[idx].id)
            .collect();

        debug!(nodes = order.len(), "computed prepare order");
        Ok(order)
    }

    /// Resize every node to `n` samples per channel.
    ///
    /// `n` is checked once up front, so an invalid length leaves every node
    /// as it was. That guarantee covers invalid lengths only: if a node
    /// rejects a valid `n` itself, its error is returned and nodes visited
    /// before it keep the new length.
    pub fn set_buffer_len(&mut self, n: usize) -> Result<(), SoundError> {
        check_len(n)?;
        for &idx in self.node_indices.values() {
            self.graph[idx].sound.set_buffer_len(n)?;
        }
        debug!(len = n, nodes = self.len(), "resized graph");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Mono, Stereo};

    /// Reads from whatever ids it is given, including ones not added yet.
    struct Tap {
        out: Mono,
        inputs: Vec<NodeId>,
    }

    impl Tap {
        fn new(inputs: Vec<NodeId>) -> Self {
            Self {
                out: Mono::detached(),
                inputs,
            }
        }
    }

    impl Sound for Tap {
        fn sample_rate(&self) -> f64 {
            self.out.sample_rate()
        }
        fn channels(&self) -> usize {
            1
        }
        fn buffer_len(&self) -> usize {
            self.out.buffer_len()
        }
        fn set_buffer_len(&mut self, n: usize) -> Result<(), SoundError> {
            self.out.set_buffer_len(n)
        }
        fn prepare(&mut self, cycle: u64) {
            self.out.prepare(cycle)
        }
        fn samples(&self) -> &[f64] {
            self.out.samples()
        }
        fn sample(&self, pos: isize) -> f64 {
            self.out.sample(pos)
        }
        fn on(&mut self) {
            self.out.on()
        }
        fn off(&mut self) {
            self.out.off()
        }
        fn is_off(&self) -> bool {
            self.out.is_off()
        }
        fn inputs(&self) -> &[NodeId] {
            &self.inputs
        }
    }

    /// Only accepts the default length.
    struct Fixed(Mono);

    impl Sound for Fixed {
        fn sample_rate(&self) -> f64 {
            self.0.sample_rate()
        }
        fn channels(&self) -> usize {
            1
        }
        fn buffer_len(&self) -> usize {
            self.0.buffer_len()
        }
        fn set_buffer_len(&mut self, n: usize) -> Result<(), SoundError> {
            if n == self.0.buffer_len() {
                Ok(())
            } else {
                Err(SoundError::InvalidBufferLength(n))
            }
        }
        fn prepare(&mut self, cycle: u64) {
            self.0.prepare(cycle)
        }
        fn samples(&self) -> &[f64] {
            self.0.samples()
        }
        fn sample(&self, pos: isize) -> f64 {
            self.0.sample(pos)
        }
        fn on(&mut self) {
            self.0.on()
        }
        fn off(&mut self) {
            self.0.off()
        }
        fn is_off(&self) -> bool {
            self.0.is_off()
        }
        fn inputs(&self) -> &[NodeId] {
            &[]
        }
    }

    fn position(order: &[NodeId], id: NodeId) -> usize {
        order.iter().position(|&o| o == id).unwrap()
    }

    #[test]
    fn ids_are_sequential() {
        let mut graph = SoundGraph::new();
        let a = graph.add(Mono::detached());
        let b = graph.add(Mono::detached());
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert_eq!(graph.len(), 2);

        let mut ids: Vec<_> = graph.ids().collect();
        ids.sort();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn inputs_come_before_dependents() {
        let mut graph = SoundGraph::new();
        let stereo = graph.add(Stereo::new(NodeId(2)));
        let a = graph.add(Mono::detached());
        let b = graph.add(Mono::new(a));
        let mix = graph.add(Tap::new(vec![stereo, b]));

        let order = graph.prepare_order().unwrap();
        assert_eq!(order.len(), 4);
        assert!(position(&order, a) < position(&order, b));
        assert!(position(&order, b) < position(&order, stereo));
        assert!(position(&order, stereo) < position(&order, mix));
        assert!(position(&order, b) < position(&order, mix));
    }

    #[test]
    fn dangling_input_is_reported() {
        let mut graph = SoundGraph::new();
        graph.add(Mono::new(NodeId(9)));
        assert_eq!(graph.prepare_order(), Err(SoundError::UnknownNode(NodeId(9))));
    }

    #[test]
    fn feedback_loop_is_reported() {
        let mut graph = SoundGraph::new();
        let a = graph.add(Tap::new(vec![NodeId(1)]));
        let b = graph.add(Tap::new(vec![a]));

        match graph.prepare_order() {
            Err(SoundError::Cycle(id)) => assert!(id == a || id == b),
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn self_input_is_a_cycle() {
        let mut graph = SoundGraph::new();
        let a = graph.add(Tap::new(vec![NodeId(0)]));
        assert_eq!(graph.prepare_order(), Err(SoundError::Cycle(a)));
    }

    #[test]
    fn removed_input_breaks_the_order() {
        let mut graph = SoundGraph::new();
        let a = graph.add(Mono::detached());
        let b = graph.add(Mono::new(a));
        assert!(graph.prepare_order().is_ok());

        assert!(graph.remove(a).is_some());
        assert!(!graph.contains(a));
        assert_eq!(graph.prepare_order(), Err(SoundError::UnknownNode(a)));

        assert!(graph.remove(b).is_some());
        assert_eq!(graph.prepare_order(), Ok(vec![]));
    }

    #[test]
    fn inputs_of_unknown_node() {
        let graph = SoundGraph::new();
        assert_eq!(graph.inputs_of(NodeId(0)), Err(SoundError::UnknownNode(NodeId(0))));
    }

    #[test]
    fn set_buffer_len_applies_to_every_node() {
        let mut graph = SoundGraph::new();
        let a = graph.add(Mono::detached());
        let s = graph.add(Stereo::new(a));

        graph.set_buffer_len(32).unwrap();
        assert_eq!(graph.get(a).unwrap().samples().len(), 32);
        assert_eq!(graph.get(s).unwrap().buffer_len(), 32);
        assert_eq!(graph.get(s).unwrap().samples().len(), 64);
    }

    #[test]
    fn invalid_graph_buffer_len_touches_nothing() {
        let mut graph = SoundGraph::new();
        let a = graph.add(Mono::detached());
        let s = graph.add(Stereo::new(a));

        assert_eq!(graph.set_buffer_len(48), Err(SoundError::InvalidBufferLength(48)));
        assert_eq!(graph.get(a).unwrap().buffer_len(), 256);
        assert_eq!(graph.get(s).unwrap().buffer_len(), 256);
    }

    #[test]
    fn node_rejecting_a_valid_length_fails_the_resize() {
        let mut graph = SoundGraph::new();
        let a = graph.add(Mono::detached());
        let fixed = graph.add(Fixed(Mono::detached()));

        assert_eq!(graph.set_buffer_len(64), Err(SoundError::InvalidBufferLength(64)));
        assert_eq!(graph.get(fixed).unwrap().buffer_len(), 256);
        assert!(matches!(graph.get(a).unwrap().buffer_len(), 64 | 256));
    }

    #[test]
    fn gating_through_the_table() {
        let mut graph = SoundGraph::new();
        let s = graph.add(Stereo::new(NodeId(0)));

        graph.get_mut(s).unwrap().off();
        assert!(graph.get(s).unwrap().is_off());
        graph.get_mut(s).unwrap().on();
        assert!(!graph.get(s).unwrap().is_off());
    }
}
