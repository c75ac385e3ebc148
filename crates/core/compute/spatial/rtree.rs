//! Packed R-tree with Sort-Tile-Recursive bulk loading.
//!
//! The tree is built once from a complete set of entries and is read-only
//! afterwards, which is exactly how an aggregation run uses it.
//!
//! ## Layout
//!
//! Entries are stored in a flat vector in packed order. Nodes are stored
//! level by level: `levels[0]` holds leaf nodes whose child ranges point into
//! the entry vector, `levels[k]` holds nodes whose child ranges point into
//! `levels[k - 1]`, and the last level holds the single root. Because a
//! node's children are contiguous, a node is just a merged bounding box and
//! a `start..start + len` range.
//!
//! ## Sort-Tile-Recursive packing
//!
//! For `n` boxes and node capacity `M`, `P = ceil(n / M)` nodes are needed.
//! The boxes are sorted by center x and cut into `S = ceil(sqrt(P))` vertical
//! slices of `S * M` boxes; each slice is sorted by center y and chunked into
//! runs of `M`. The same packing is applied to each level's nodes to form
//! the level above, until one node remains. Nodes are therefore full except
//! for the last one in each slice, and sibling boxes overlap little, which
//! keeps a range query close to `O(log_M n + k)`.
//!
//! ## Queries
//!
//! A range query descends from the root and only enters nodes whose merged
//! box intersects the query box (closed intervals). A merged box covers
//! every entry below it, so the descent never misses an entry that
//! intersects the query: the pre-filter is conservative.

use crate::error::{PolycountError, Result};
use polycount_types::bbox::BoundingBox2D;
use smallvec::SmallVec;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
struct Node {
    bbox: BoundingBox2D,
    start: usize,
    len: usize,
}

/// Read-only packed R-tree over bounding boxes with a payload per entry.
#[derive(Debug, Clone)]
pub struct PackedRTree<T> {
    entries: Vec<(BoundingBox2D, T)>,
    levels: Vec<Vec<Node>>,
    node_capacity: usize,
}

fn center_cmp(axis: usize) -> impl Fn(&BoundingBox2D, &BoundingBox2D) -> Ordering {
    move |a, b| {
        let (ca, cb) = (a.center(), b.center());
        if axis == 0 {
            ca.x().total_cmp(&cb.x())
        } else {
            ca.y().total_cmp(&cb.y())
        }
    }
}

/// Reorders `items` into STR tile order for nodes of `capacity`.
fn str_sort<E>(items: &mut [E], capacity: usize, bbox: impl Fn(&E) -> &BoundingBox2D) {
    let n = items.len();
    if n <= capacity {
        return;
    }

    let node_count = n.div_ceil(capacity);
    let slice_count = (node_count as f64).sqrt().ceil() as usize;
    let slice_len = capacity * node_count.div_ceil(slice_count);

    let by_x = center_cmp(0);
    let by_y = center_cmp(1);

    items.sort_by(|a, b| by_x(bbox(a), bbox(b)));
    for slice in items.chunks_mut(slice_len) {
        slice.sort_by(|a, b| by_y(bbox(a), bbox(b)));
    }
}

/// Groups consecutive boxes into parent nodes of up to `capacity` children.
fn pack_level<E>(
    items: &[E],
    capacity: usize,
    bbox: impl Fn(&E) -> &BoundingBox2D,
) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    nodes
        .try_reserve_exact(items.len().div_ceil(capacity))
        .map_err(|e| PolycountError::IndexBuildFailure(format!("node level: {}", e)))?;

    for (chunk_idx, chunk) in items.chunks(capacity).enumerate() {
        let mut merged = *bbox(&chunk[0]);
        for item in &chunk[1..] {
            merged = merged.union(bbox(item));
        }
        nodes.push(Node {
            bbox: merged,
            start: chunk_idx * capacity,
            len: chunk.len(),
        });
    }

    Ok(nodes)
}

impl<T> PackedRTree<T> {
    /// Bulk-loads a tree from `(bbox, payload)` pairs.
    ///
    /// # Errors
    ///
    /// - [`PolycountError::InvalidConfig`] if `node_capacity < 2`
    /// - [`PolycountError::IndexBuildFailure`] if storage for the entries or
    ///   nodes cannot be allocated
    ///
    /// # Examples
    ///
    /// ```
    /// use polycount::compute::spatial::PackedRTree;
    /// use polycount::BoundingBox2D;
    ///
    /// let entries = (0..100)
    ///     .map(|i| {
    ///         let x = i as f64;
    ///         (BoundingBox2D::new(x, x, x, x), i)
    ///     })
    ///     .collect::<Vec<_>>();
    /// let tree = PackedRTree::bulk_load(entries, 4)?;
    ///
    /// let mut hits: Vec<usize> = tree
    ///     .query(&BoundingBox2D::new(10.0, 10.0, 12.0, 12.0))
    ///     .into_iter()
    ///     .copied()
    ///     .collect();
    /// hits.sort();
    /// assert_eq!(hits, vec![10, 11, 12]);
    /// # Ok::<(), polycount::PolycountError>(())
    /// ```
    pub fn bulk_load<I>(entries: I, node_capacity: usize) -> Result<Self>
    where
        I: IntoIterator<Item = (BoundingBox2D, T)>,
    {
        if node_capacity < 2 {
            return Err(PolycountError::InvalidConfig(format!(
                "Node capacity must be at least 2, got {}",
                node_capacity
            )));
        }

        let iter = entries.into_iter();
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(iter.size_hint().0)
            .map_err(|e| PolycountError::IndexBuildFailure(format!("entries: {}", e)))?;
        for entry in iter {
            if entries.len() == entries.capacity() {
                entries
                    .try_reserve(1)
                    .map_err(|e| PolycountError::IndexBuildFailure(format!("entries: {}", e)))?;
            }
            entries.push(entry);
        }

        let mut levels = Vec::new();
        if entries.is_empty() {
            return Ok(Self {
                entries,
                levels,
                node_capacity,
            });
        }

        str_sort(&mut entries, node_capacity, |(b, _)| b);
        let mut current = pack_level(&entries, node_capacity, |(b, _)| b)?;

        while current.len() > 1 {
            str_sort(&mut current, node_capacity, |n| &n.bbox);
            let parents = pack_level(&current, node_capacity, |n| &n.bbox)?;
            levels.push(current);
            current = parents;
        }
        levels.push(current);

        Ok(Self {
            entries,
            levels,
            node_capacity,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of node levels, leaves included; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn node_capacity(&self) -> usize {
        self.node_capacity
    }

    /// Bounding box of every entry, `None` when empty.
    pub fn bounds(&self) -> Option<BoundingBox2D> {
        self.levels.last().and_then(|root| root.first()).map(|n| n.bbox)
    }

    /// Calls `visit` for every entry whose box intersects `query`.
    ///
    /// Visiting order depends on the packing, not on insertion order.
    pub fn query_with<'a, F>(&'a self, query: &BoundingBox2D, mut visit: F)
    where
        F: FnMut(&'a BoundingBox2D, &'a T),
    {
        let Some(top) = self.levels.len().checked_sub(1) else {
            return;
        };

        let mut stack: SmallVec<[(usize, usize); 64]> = SmallVec::new();
        stack.extend((0..self.levels[top].len()).map(|i| (top, i)));

        while let Some((level, idx)) = stack.pop() {
            let node = &self.levels[level][idx];
            if !node.bbox.intersects(query) {
                continue;
            }

            let children = node.start..node.start + node.len;
            if level == 0 {
                for (bbox, item) in &self.entries[children] {
                    if bbox.intersects(query) {
                        visit(bbox, item);
                    }
                }
            } else {
                stack.extend(children.map(|i| (level - 1, i)));
            }
        }
    }

    /// Payloads of every entry whose box intersects `query`.
    pub fn query(&self, query: &BoundingBox2D) -> Vec<&T> {
        let mut out = Vec::new();
        self.query_with(query, |_, item| out.push(item));
        out
    }

    /// All entries in packed order.
    pub fn iter(&self) -> impl Iterator<Item = &(BoundingBox2D, T)> {
        self.entries.iter()
    }
}
