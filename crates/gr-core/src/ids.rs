//! Strongly typed node identifier plus the forward/reverse edge key.
//!
//! Node ids must grow past the original node count (the Specializer and
//! Splicer both mint fresh ids via `max(existing ids) + 1`), so the inner
//! integer is `u64` rather than the `u32` the teacher crate uses for a
//! fixed-size road network.

use std::fmt;

/// Index of a graph node. `Copy + Ord + Hash` so it can be used as a map
/// key and a sorted collection element without ceremony.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u64);

impl NodeId {
    /// Sentinel meaning "no valid id".
    pub const INVALID: NodeId = NodeId(u64::MAX);

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for NodeId {
    /// Returns the `INVALID` sentinel so uninitialized ids are visibly invalid.
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Direction of a stored edge: `Forward` (`key = 0`) as built, `Reverse`
/// (`key = 1`) synthesized from it. See spec §3 "Key (edge key)".
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeKey {
    Forward = 0,
    Reverse = 1,
}

impl EdgeKey {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The edge key pointing the other way.
    pub fn flipped(self) -> EdgeKey {
        match self {
            EdgeKey::Forward => EdgeKey::Reverse,
            EdgeKey::Reverse => EdgeKey::Forward,
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// The `(u, v, key)` triple that indexes an edge, per spec §3.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeIndex {
    pub u: NodeId,
    pub v: NodeId,
    pub key: EdgeKey,
}

impl EdgeIndex {
    pub fn new(u: NodeId, v: NodeId, key: EdgeKey) -> Self {
        Self { u, v, key }
    }

    /// The paired edge: same endpoints, opposite key and direction.
    pub fn reversed(self) -> EdgeIndex {
        EdgeIndex { u: self.v, v: self.u, key: self.key.flipped() }
    }
}

impl fmt::Display for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.u, self.v, self.key)
    }
}
