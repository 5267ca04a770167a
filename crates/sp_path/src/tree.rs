use alloc::boxed::Box;
use alloc::vec::Vec;

use sp_utils::hash::{HashMap, new_map};

use crate::expr::{ParseError, Segment, parse};

// -----------------------------------------------------------------------------
// Destination

/// How the matches of one destination are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collect {
    /// The match is written as the destination's value.
    Single,
    /// Matches are gathered into an array. Paths through an index or a
    /// wildcard, such as `list[2]` or `items[*].id`.
    Array,
    /// Matches are gathered into an object under their own keys. Paths
    /// ending in `.*`.
    Object,
}

/// An output key plus the way matches are gathered under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    key: Box<str>,
    collect: Collect,
}

impl Destination {
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub const fn collect(&self) -> Collect {
        self.collect
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DestId(usize);

// -----------------------------------------------------------------------------
// PathTree

struct Node {
    keys: HashMap<Box<str>, NodeId>,
    any_key: Option<NodeId>,
    indices: HashMap<usize, NodeId>,
    any_index: Option<NodeId>,
    destination: Option<DestId>,
}

impl Node {
    #[inline]
    const fn new() -> Self {
        Self {
            keys: new_map(),
            any_key: None,
            indices: new_map(),
            any_index: None,
            destination: None,
        }
    }
}

/// Path expressions merged into one tree, each ending in a destination.
///
/// Built once with [`PathTree::builder`] and shared by any number of
/// [`PathMatcher`](crate::PathMatcher)s.
pub struct PathTree {
    nodes: Vec<Node>,
    destinations: Vec<Destination>,
}

impl PathTree {
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn builder() -> PathTreeBuilder {
        PathTreeBuilder {
            tree: PathTree {
                nodes: alloc::vec![Node::new()],
                destinations: Vec::new(),
            },
        }
    }

    /// Every distinct destination, in the order they were first added.
    #[inline]
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// The child of `node` for the member `name`, exact names first.
    #[inline]
    pub(crate) fn key_child(&self, node: NodeId, name: &str) -> Option<NodeId> {
        let node = &self.nodes[node.0];
        node.keys.get(name).copied().or(node.any_key)
    }

    /// The child of `node` for the element at `index`, exact indices first.
    #[inline]
    pub(crate) fn index_child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        let node = &self.nodes[node.0];
        node.indices.get(&index).copied().or(node.any_index)
    }

    #[inline]
    pub(crate) fn destination_of(&self, node: NodeId) -> Option<DestId> {
        self.nodes[node.0].destination
    }

    #[inline]
    pub(crate) fn destination(&self, id: DestId) -> &Destination {
        &self.destinations[id.0]
    }

    fn child_or_insert(&mut self, parent: NodeId, segment: &Segment<'_>) -> NodeId {
        let next = NodeId(self.nodes.len());
        let node = &mut self.nodes[parent.0];
        let slot = match segment {
            Segment::Key(name) => node.keys.entry(Box::from(&**name)).or_insert(next),
            Segment::Index(index) => node.indices.entry(*index).or_insert(next),
            Segment::AnyKey => node.any_key.get_or_insert(next),
            Segment::AnyIndex => node.any_index.get_or_insert(next),
        };
        let child = *slot;
        if child == next {
            self.nodes.push(Node::new());
        }
        child
    }

    fn intern(&mut self, key: &str, collect: Collect) -> DestId {
        let found = self
            .destinations
            .iter()
            .position(|dest| &*dest.key == key && dest.collect == collect);
        match found {
            Some(at) => DestId(at),
            None => {
                self.destinations.push(Destination {
                    key: Box::from(key),
                    collect,
                });
                DestId(self.destinations.len() - 1)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Builder

/// Collects path expressions into a [`PathTree`].
///
/// ```
/// use sp_path::{Collect, PathTree};
///
/// let tree = PathTree::builder()
///     .path("users[*].name", "names")?
///     .path("users[*].id", "ids")?
///     .path("meta.*", "meta")?
///     .build();
///
/// let collects: Vec<_> = tree.destinations().iter().map(|d| d.collect()).collect();
/// assert_eq!(collects, [Collect::Array, Collect::Array, Collect::Object]);
///
/// assert!(PathTree::builder().path("users[", "broken").is_err());
/// # Ok::<(), sp_path::ParseError<'static>>(())
/// ```
pub struct PathTreeBuilder {
    tree: PathTree,
}

impl PathTreeBuilder {
    /// Adds `expr`, sending its matches to `destination`.
    ///
    /// A path given twice keeps its last destination.
    pub fn path<'a>(mut self, expr: &'a str, destination: &str) -> Result<Self, ParseError<'a>> {
        let segments = parse(expr)?;
        let collect = if matches!(segments.last(), Some(Segment::AnyKey)) {
            Collect::Object
        } else if segments.iter().any(|segment| !matches!(segment, Segment::Key(_))) {
            Collect::Array
        } else {
            Collect::Single
        };

        let mut node = PathTree::ROOT;
        for segment in &segments {
            node = self.tree.child_or_insert(node, segment);
        }

        let dest = self.tree.intern(destination, collect);
        if let Some(previous) = self.tree.nodes[node.0].destination.replace(dest)
            && previous != dest
        {
            log::warn!(
                "`{expr}` was already sent to `{}`, now to `{destination}`",
                self.tree.destination(previous).key(),
            );
        }
        Ok(self)
    }

    #[inline]
    pub fn build(self) -> PathTree {
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{Collect, PathTree};

    #[test]
    fn exact_children_come_first() {
        let tree = PathTree::builder()
            .path("a.x", "exact")
            .and_then(|b| b.path("a.*", "any"))
            .and_then(|b| b.path("a.x", "exact"))
            .unwrap()
            .build();

        let a = tree.key_child(PathTree::ROOT, "a").unwrap();
        let x = tree.key_child(a, "x").unwrap();
        let y = tree.key_child(a, "y").unwrap();
        assert_ne!(x, y);
        assert_eq!(tree.destination(tree.destination_of(x).unwrap()).key(), "exact");
        assert_eq!(tree.destination(tree.destination_of(y).unwrap()).collect(), Collect::Object);
        assert_eq!(tree.destinations().len(), 2);
        assert!(tree.index_child(a, 0).is_none());
    }

    #[test]
    fn collect_mode_follows_the_whole_path() {
        let tree = PathTree::builder()
            .path("a.b", "plain")
            .and_then(|b| b.path("list[2]", "indexed"))
            .and_then(|b| b.path("items[*].id", "ids"))
            .and_then(|b| b.path("map.*.name", "names"))
            .and_then(|b| b.path("rows[*].*", "cells"))
            .unwrap()
            .build();

        let collects: Vec<_> = tree.destinations().iter().map(|d| (d.key(), d.collect())).collect();
        assert_eq!(
            collects,
            [
                ("plain", Collect::Single),
                ("indexed", Collect::Array),
                ("ids", Collect::Array),
                ("names", Collect::Array),
                ("cells", Collect::Object),
            ]
        );
    }

    #[test]
    fn shared_prefixes() {
        let tree = PathTree::builder()
            .path("list[1]", "second")
            .and_then(|b| b.path("list[*]", "all"))
            .unwrap()
            .build();

        let list = tree.key_child(PathTree::ROOT, "list").unwrap();
        let first = tree.index_child(list, 0).unwrap();
        let second = tree.index_child(list, 1).unwrap();
        assert_ne!(first, second);
        assert_eq!(tree.destination(tree.destination_of(second).unwrap()).key(), "second");
        assert_eq!(tree.destination(tree.destination_of(first).unwrap()).key(), "all");
    }
}
