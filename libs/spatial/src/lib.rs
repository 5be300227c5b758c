//! A spatial index mapping bounding boxes to owned objects.
//!
//! [`SpatialIndex`] is an R*-tree (via [`rstar`]) with a maximum node fanout of
//! [`IndexParams::MAX_SIZE`] and a minimum fill of [`IndexParams::MIN_SIZE`].
//! Nodes that overflow are split or partially reinserted, which keeps the tree
//! height logarithmic in the number of entries.
//!
//! Every inserted object receives a stable integer id, assigned in insertion
//! order starting at zero. Ids are never reused.
//!
//! # Examples
//!
//! ```
//! use geometry::prelude::*;
//! use spatial::SpatialIndex;
//!
//! let mut index = SpatialIndex::new();
//! let a = index.insert("a", BBox::new(0, 0, 10, 10)).unwrap();
//! let b = index.insert("b", BBox::new(10, 0, 20, 10)).unwrap();
//!
//! let query = BBox::new(10, 2, 12, 4);
//! let mut hits: Vec<_> = index.intersect_iter(query).map(|(_, id)| id).collect();
//! hits.sort();
//! assert_eq!(hits, vec![a, b]);
//!
//! let overlaps: Vec<_> = index.overlap_iter(query).map(|(_, id)| id).collect();
//! assert_eq!(overlaps, vec![b]);
//! ```
#![warn(missing_docs)]

use std::collections::BTreeMap;

use geometry::bbox::BBox;
use rstar::{
    ParentNode, RStarInsertionStrategy, RTree, RTreeNode, RTreeObject, RTreeParams, AABB,
};


/// The [`SpatialError`] result type.
pub type SpatialResult<T> = Result<T, SpatialError>;

/// An error accessing a [`SpatialIndex`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpatialError {
    /// No entry with the given id is stored.
    #[error("no entry with id {0}")]
    NotFound(usize),
    /// An invalid box was supplied where a valid box is required.
    #[error("cannot index invalid box {0}")]
    InvalidBox(BBox),
}

/// Node sizing parameters of the R*-tree behind [`SpatialIndex`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexParams;

impl RTreeParams for IndexParams {
    const MIN_SIZE: usize = 16;
    const MAX_SIZE: usize = 32;
    const REINSERTION_COUNT: usize = 6;
    type DefaultInsertionStrategy = RStarInsertionStrategy;
}

/// A leaf of the tree: the id and box of one stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    id: usize,
    bbox: BBox,
}

impl RTreeObject for Entry {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        envelope(self.bbox)
    }
}

fn envelope(bbox: BBox) -> AABB<[i64; 2]> {
    AABB::from_corners([bbox.xl(), bbox.yl()], [bbox.xh(), bbox.yh()])
}

/// An R-tree of bounding boxes, each owning an object of type `T`.
#[derive(Debug, Clone)]
pub struct SpatialIndex<T> {
    tree: RTree<Entry, IndexParams>,
    objects: BTreeMap<usize, (BBox, T)>,
    next_id: usize,
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SpatialIndex<T> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            tree: RTree::new_with_params(),
            objects: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Builds a balanced index from `(object, box)` pairs in one pass.
    ///
    /// Ids are assigned in iteration order. Fails without building anything if
    /// any box is invalid.
    pub fn bulk_load(items: impl IntoIterator<Item = (T, BBox)>) -> SpatialResult<Self> {
        let mut objects = BTreeMap::new();
        let mut entries = Vec::new();
        for (id, (obj, bbox)) in items.into_iter().enumerate() {
            if !bbox.is_valid() {
                return Err(SpatialError::InvalidBox(bbox));
            }
            entries.push(Entry { id, bbox });
            objects.insert(id, (bbox, obj));
        }
        let next_id = entries.len();
        tracing::debug!(num_entries = next_id, "bulk loaded spatial index");
        Ok(Self {
            tree: RTree::bulk_load_with_params(entries),
            objects,
            next_id,
        })
    }

    /// The number of stored objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if no objects are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Stores `obj` with bounding box `bbox`, returning its id.
    ///
    /// Zero-area boxes are accepted as long as they are valid.
    pub fn insert(&mut self, obj: T, bbox: BBox) -> SpatialResult<usize> {
        if !bbox.is_valid() {
            return Err(SpatialError::InvalidBox(bbox));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.tree.insert(Entry { id, bbox });
        self.objects.insert(id, (bbox, obj));
        Ok(id)
    }

    /// Removes the object with the given id and returns it.
    pub fn pop(&mut self, id: usize) -> SpatialResult<T> {
        let (bbox, obj) = self.objects.remove(&id).ok_or(SpatialError::NotFound(id))?;
        let removed = self.tree.remove(&Entry { id, bbox });
        debug_assert!(removed.is_some(), "entry {id} missing from tree");
        Ok(obj)
    }

    /// Gets the object with the given id.
    pub fn get(&self, id: usize) -> SpatialResult<&T> {
        self.objects
            .get(&id)
            .map(|(_, obj)| obj)
            .ok_or(SpatialError::NotFound(id))
    }

    /// Gets a mutable reference to the object with the given id.
    ///
    /// The bounding box of a stored object cannot be changed in place.
    pub fn get_mut(&mut self, id: usize) -> SpatialResult<&mut T> {
        self.objects
            .get_mut(&id)
            .map(|(_, obj)| obj)
            .ok_or(SpatialError::NotFound(id))
    }

    /// Gets the bounding box of the object with the given id.
    pub fn get_bbox(&self, id: usize) -> SpatialResult<BBox> {
        self.objects
            .get(&id)
            .map(|(bbox, _)| *bbox)
            .ok_or(SpatialError::NotFound(id))
    }

    /// Iterates over the `(box, id)` pairs of every stored object, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (BBox, usize)> + '_ {
        self.objects.iter().map(|(id, (bbox, _))| (*bbox, *id))
    }

    /// Iterates over the `(box, id, object)` triples of every stored object, in id order.
    pub fn iter_objects(&self) -> impl Iterator<Item = (BBox, usize, &T)> + '_ {
        self.objects.iter().map(|(id, (bbox, obj))| (*bbox, *id, obj))
    }

    fn entries_intersecting(&self, query: BBox) -> impl Iterator<Item = &Entry> + '_ {
        query
            .is_valid()
            .then(|| self.tree.locate_in_envelope_intersecting(&envelope(query)))
            .into_iter()
            .flatten()
    }

    /// Iterates over the `(box, id)` pairs of every stored box that intersects `query`.
    ///
    /// Boxes that only touch `query` along an edge or at a corner are included.
    /// The iteration order is unspecified. An invalid `query` matches nothing.
    pub fn intersect_iter(&self, query: BBox) -> impl Iterator<Item = (BBox, usize)> + '_ {
        self.entries_intersecting(query).map(|e| (e.bbox, e.id))
    }

    /// Iterates over the `(box, id)` pairs of every stored box that overlaps `query`.
    ///
    /// Only intersections of positive area count; boxes that merely touch
    /// `query` and zero-area boxes are excluded.
    pub fn overlap_iter(&self, query: BBox) -> impl Iterator<Item = (BBox, usize)> + '_ {
        self.entries_intersecting(query)
            .filter(move |e| e.bbox.overlaps(&query))
            .map(|e| (e.bbox, e.id))
    }

    /// Iterates over the `(box, id)` pairs of every stored box lying entirely within `query`.
    pub fn contains_iter(&self, query: BBox) -> impl Iterator<Item = (BBox, usize)> + '_ {
        query
            .is_valid()
            .then(|| self.tree.locate_in_envelope(&envelope(query)))
            .into_iter()
            .flatten()
            .map(|e| (e.bbox, e.id))
    }

    /// The smallest box containing every stored box.
    ///
    /// Returns the invalid box if the index is empty.
    pub fn bound_box(&self) -> BBox {
        if self.is_empty() {
            return BBox::invalid();
        }
        let env = self.tree.root().envelope();
        let (lo, hi) = (env.lower(), env.upper());
        BBox::new(lo[0], lo[1], hi[0], hi[1])
    }

    /// The number of internal node levels between the root and the leaves.
    pub fn depth(&self) -> usize {
        fn depth_of(node: &ParentNode<Entry>) -> usize {
            1 + node
                .children()
                .iter()
                .map(|child| match child {
                    RTreeNode::Leaf(_) => 0,
                    RTreeNode::Parent(parent) => depth_of(parent),
                })
                .max()
                .unwrap_or(0)
        }
        depth_of(self.tree.root())
    }

    /// The largest number of children held by any node of the tree.
    pub fn max_fanout(&self) -> usize {
        fn fanout_of(node: &ParentNode<Entry>) -> usize {
            node.children()
                .iter()
                .filter_map(|child| match child {
                    RTreeNode::Leaf(_) => None,
                    RTreeNode::Parent(parent) => Some(fanout_of(parent)),
                })
                .fold(node.children().len(), usize::max)
        }
        fanout_of(self.tree.root())
    }
}

impl<T> std::ops::Index<usize> for SpatialIndex<T> {
    type Output = T;

    /// Gets the object with the given id.
    ///
    /// # Panics
    ///
    /// Panics if no object with the given id is stored.
    /// Use [`SpatialIndex::get`] for a fallible lookup.
    fn index(&self, id: usize) -> &Self::Output {
        match self.get(id) {
            Ok(obj) => obj,
            Err(err) => panic!("{err}"),
        }
    }
}
