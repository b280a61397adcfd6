//! Vertex registry and conflict lists
//!
//! Every input point owns one [`VertexNode`] in an arena. A node is linked
//! into at most one [`VertexList`] at a time through its `prev`/`next`
//! indices; the lists themselves only hold the head and tail indices.

use crate::mesh::FaceId;

/// Registry entry for one input point
#[derive(Debug, Clone, Default)]
pub(crate) struct VertexNode {
    /// Previous node of the list this vertex belongs to
    pub prev: Option<usize>,
    /// Next node of the list this vertex belongs to
    pub next: Option<usize>,
    /// Face that currently claims this vertex as an outside point
    pub face: Option<FaceId>,
}

/// Allocate one unlinked node per input point
pub(crate) fn new_registry(count: usize) -> Vec<VertexNode> {
    vec![VertexNode::default(); count]
}

/// Doubly-linked list of vertex nodes, addressed by point index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct VertexList {
    head: Option<usize>,
    tail: Option<usize>,
}

impl VertexList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(&self) -> Option<usize> {
        self.head
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Link `vertex` at the tail
    pub fn append(&mut self, nodes: &mut [VertexNode], vertex: usize) {
        nodes[vertex].prev = self.tail;
        nodes[vertex].next = None;
        match self.tail {
            Some(tail) => nodes[tail].next = Some(vertex),
            None => self.head = Some(vertex),
        }
        self.tail = Some(vertex);
    }

    /// Link `vertex` immediately before `anchor`, which must be in this list
    pub fn insert_before(&mut self, nodes: &mut [VertexNode], anchor: usize, vertex: usize) {
        let prev = nodes[anchor].prev;
        nodes[vertex].prev = prev;
        nodes[vertex].next = Some(anchor);
        match prev {
            Some(p) => nodes[p].next = Some(vertex),
            None => self.head = Some(vertex),
        }
        nodes[anchor].prev = Some(vertex);
    }

    /// Unlink `vertex`, which must be in this list
    pub fn remove(&mut self, nodes: &mut [VertexNode], vertex: usize) {
        self.remove_range(nodes, vertex, vertex);
    }

    /// Unlink the contiguous run `first..=last` in O(1)
    ///
    /// The run stays linked internally; only its outer links are cleared, so
    /// `first` can be handed to [`VertexList::append_chain`] afterwards.
    pub fn remove_range(&mut self, nodes: &mut [VertexNode], first: usize, last: usize) {
        let before = nodes[first].prev;
        let after = nodes[last].next;
        match before {
            Some(b) => nodes[b].next = after,
            None => self.head = after,
        }
        match after {
            Some(a) => nodes[a].prev = before,
            None => self.tail = before,
        }
        nodes[first].prev = None;
        nodes[last].next = None;
    }

    /// Splice an already-linked chain starting at `head` onto the tail
    ///
    /// The chain's face back-references are cleared on the way to its tail.
    pub fn append_chain(&mut self, nodes: &mut [VertexNode], head: usize) {
        match self.tail {
            Some(tail) => nodes[tail].next = Some(head),
            None => self.head = Some(head),
        }
        nodes[head].prev = self.tail;

        let mut vertex = head;
        nodes[vertex].face = None;
        while let Some(next) = nodes[vertex].next {
            vertex = next;
            nodes[vertex].face = None;
        }
        self.tail = Some(vertex);
    }

    /// Iterate over the point indices in list order
    pub fn iter<'a>(&self, nodes: &'a [VertexNode]) -> impl Iterator<Item = usize> + 'a {
        std::iter::successors(self.head, move |&v| nodes[v].next)
    }
}
