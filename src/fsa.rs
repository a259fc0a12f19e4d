//! An in-memory reference automaton.
//!
//! Building a minimized, on-disk finite-state dictionary is its own
//! project; this module is the stand-in that lets the rest of the
//! crate be exercised without one. [`build`] produces an unminimized
//! byte-keyed trie, one arena node per state, with arcs kept sorted
//! by label so lookups and enumeration are deterministic.

use std::fmt;

/// Index of a node in a [`Fsa`]'s arena. Opaque outside this module;
/// never assume consecutive ids form a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// A labelled transition between two states. `is_final` marks that
/// the byte sequence read to reach this arc (inclusive) is a complete
/// accepted record, independent of whether further arcs continue out
/// of its target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsaArc {
    pub label: u8,
    pub is_final: bool,
    target: NodeId,
}

#[derive(Debug, Default)]
struct FsaNode {
    /// Kept sorted by `label` so both traversal and enumeration can
    /// binary-search or walk in a stable, increasing order.
    arcs: Vec<FsaArc>,
}

/// An automaton over byte strings, built once and read many times.
#[derive(Debug, Default)]
pub struct Fsa {
    nodes: Vec<FsaNode>,
}

impl Fsa {
    fn empty() -> Self {
        Fsa {
            nodes: vec![FsaNode::default()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The arc out of `node` labelled `label`, if any.
    pub fn arc_by_label(&self, node: NodeId, label: u8) -> Option<&FsaArc> {
        let arcs = &self.nodes[node.0 as usize].arcs;
        arcs.binary_search_by_key(&label, |a| a.label)
            .ok()
            .map(|i| &arcs[i])
    }

    pub fn destination(&self, arc: &FsaArc) -> NodeId {
        arc.target
    }

    fn node_mut(&mut self, id: NodeId) -> &mut FsaNode {
        &mut self.nodes[id.0 as usize]
    }

    fn push_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(FsaNode::default());
        id
    }

    /// Inserts `record` as an accepted byte string, creating arcs as
    /// needed and marking the arc for its final byte as `is_final`.
    /// Does nothing for an empty record; an automaton has no notion
    /// of an accepted zero-length string here.
    fn insert(&mut self, record: &[u8]) {
        let mut cur = self.root();
        let last = match record.len() {
            0 => return,
            n => n - 1,
        };
        for (i, &label) in record.iter().enumerate() {
            let existing = {
                let arcs = &self.node_mut(cur).arcs;
                arcs.binary_search_by_key(&label, |a| a.label)
            };
            let idx = match existing {
                Ok(idx) => idx,
                Err(insert_at) => {
                    let target = self.push_node();
                    let arc = FsaArc {
                        label,
                        is_final: false,
                        target,
                    };
                    self.node_mut(cur).arcs.insert(insert_at, arc);
                    insert_at
                }
            };
            let arc = &mut self.node_mut(cur).arcs[idx];
            if i == last {
                arc.is_final = true;
            }
            cur = arc.target;
        }
    }
}

/// Builds an automaton accepting exactly the byte strings in
/// `records`. Order and duplicates in the input do not matter; the
/// resulting automaton is unminimized, which is fine for the sizes
/// this crate is exercised with.
pub fn build<I, B>(records: I) -> Fsa
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let mut fsa = Fsa::empty();
    for record in records {
        fsa.insert(record.as_ref());
    }
    fsa
}

/// The outcome of walking an automaton against an input byte string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkResult {
    /// Every byte of the input was consumed and the arc consuming the
    /// last one is marked final: `input` is itself an accepted record.
    ExactMatch(NodeId),
    /// Every byte of the input was consumed, landing on a live node,
    /// but the last arc taken is not final: `input` is a strict
    /// prefix of one or more accepted records, none of them itself.
    PrematureEnd(NodeId),
    /// The input diverged from the automaton after `usize` bytes,
    /// at `node`.
    Mismatch(NodeId, usize),
    /// The input was empty; there is nothing meaningful to walk.
    NoMatch,
}

/// A read-only cursor over an [`Fsa`]. Thin and stateless; cheap to
/// recreate per lookup rather than retained across calls.
pub struct FsaWalker<'a> {
    fsa: &'a Fsa,
}

impl<'a> FsaWalker<'a> {
    pub fn new(fsa: &'a Fsa) -> Self {
        Self { fsa }
    }

    /// Walks `input` starting from `start`, byte by byte.
    pub fn walk_match(&self, input: &[u8], start: NodeId) -> WalkResult {
        if input.is_empty() {
            return WalkResult::NoMatch;
        }
        let mut cur = start;
        let mut last_final = false;
        for (idx, &b) in input.iter().enumerate() {
            match self.fsa.arc_by_label(cur, b) {
                Some(arc) => {
                    last_final = arc.is_final;
                    cur = self.fsa.destination(arc);
                }
                None => return WalkResult::Mismatch(cur, idx),
            }
        }
        if last_final {
            WalkResult::ExactMatch(cur)
        } else {
            WalkResult::PrematureEnd(cur)
        }
    }

    /// A lazy, non-restartable, depth-first enumeration of every
    /// accepted byte string reachable from `node`, in arc-sorted
    /// (hence stable) order.
    pub fn enumerate_accepted(&self, node: NodeId) -> AcceptedIter<'a> {
        AcceptedIter {
            fsa: self.fsa,
            stack: vec![(node, 0)],
            prefix: Vec::new(),
        }
    }
}

/// Iterator returned by [`FsaWalker::enumerate_accepted`].
pub struct AcceptedIter<'a> {
    fsa: &'a Fsa,
    stack: Vec<(NodeId, usize)>,
    prefix: Vec<u8>,
}

impl<'a> Iterator for AcceptedIter<'a> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        loop {
            let (node, idx) = *self.stack.last()?;
            let arcs = &self.fsa.nodes[node.0 as usize].arcs;
            if idx >= arcs.len() {
                self.stack.pop();
                self.prefix.pop();
                continue;
            }
            let arc = arcs[idx];
            self.stack.last_mut().unwrap().1 += 1;
            self.prefix.push(arc.label);
            self.stack.push((arc.target, 0));
            if arc.is_final {
                return Some(self.prefix.clone());
            }
        }
    }
}

impl fmt::Debug for AcceptedIter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceptedIter").finish_non_exhaustive()
    }
}
