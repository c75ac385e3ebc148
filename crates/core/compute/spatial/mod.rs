//! Spatial algorithms and indexing.

pub mod algorithms;
pub use algorithms::{
    RingLocation, locate_in_ring, merge_bboxes, point_in_multi_polygon, point_in_polygon,
    polygon_bbox,
};

pub mod rtree;
pub use rtree::PackedRTree;
