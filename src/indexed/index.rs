use log::debug;

use crate::algorithm::contains::PointInPolygon;
use crate::algorithm::primitives::{raycast_fast, vertex_segment_distance, Raycast};
use crate::geometry::{ExtentXY, VertexArray, VertexXY};

/// Fan-out of every index node. Leaf boxes cover this many consecutive vertices.
pub const NODE_SIZE: u32 = 32;

/// Maximum number of levels; `NODE_SIZE^MAX_DEPTH` exceeds any `u32` vertex count.
pub const MAX_DEPTH: usize = 8;

/// Slack added to the pruning bound so that rounding never discards the true nearest box.
const PRUNE_EPSILON: f64 = 1e-6;

/// A static hierarchy of bounding boxes over the segments of one vertex array.
///
/// Level 0 holds a single box covering everything. The last level holds one box per run of
/// [`NODE_SIZE`] vertices, each run overlapping the next by one vertex so the segment that
/// crosses a run boundary is covered by both boxes.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedIndex {
    levels: Vec<Vec<ExtentXY>>,
    items_count: u32,
}

impl PreparedIndex {
    /// Build an index over `vertices`, or `None` when there is nothing to index.
    pub fn build(vertices: &VertexArray) -> Option<Self> {
        let vertex_count = vertices.len() as u32;
        if vertex_count == 0 {
            return None;
        }

        let leaf_count = vertex_count.div_ceil(NODE_SIZE);
        let mut bounds = Vec::with_capacity(MAX_DEPTH);
        let mut width = 1u64;
        loop {
            let bound = (leaf_count as u64).div_ceil(width) as usize;
            bounds.push(bound);
            if bound <= 1 {
                break;
            }
            width *= NODE_SIZE as u64;
        }
        bounds.reverse();
        debug_assert!(bounds.len() <= MAX_DEPTH);

        let mut levels: Vec<Vec<ExtentXY>> = bounds
            .iter()
            .map(|bound| vec![ExtentXY::smallest(); *bound])
            .collect();

        let leaves = levels.last_mut()?;
        for (i, leaf) in leaves.iter_mut().enumerate() {
            let beg = i as u32 * NODE_SIZE;
            let end = (beg + NODE_SIZE + 1).min(vertex_count);
            for j in beg..end {
                leaf.update(&vertices.xy(j as usize));
            }
        }

        for level in (0..levels.len() - 1).rev() {
            let (upper, lower) = levels.split_at_mut(level + 1);
            let children = &lower[0];
            for (j, entry) in upper[level].iter_mut().enumerate() {
                let beg = j * NODE_SIZE as usize;
                let end = (beg + NODE_SIZE as usize).min(children.len());
                for child in &children[beg..end] {
                    entry.merge(child);
                }
            }
        }

        debug!(
            "built prepared index over {} vertices with {} levels",
            vertex_count,
            levels.len()
        );

        Some(Self {
            levels,
            items_count: vertex_count,
        })
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of indexed vertices.
    pub fn items_count(&self) -> u32 {
        self.items_count
    }

    /// The boxes of one level, root first.
    pub fn level(&self, level: usize) -> &[ExtentXY] {
        &self.levels[level]
    }

    /// The box covering the entire indexed array.
    pub fn extent(&self) -> ExtentXY {
        self.levels[0][0]
    }

    pub(crate) fn is_leaf_level(&self, level: usize) -> bool {
        level + 1 == self.levels.len()
    }

    pub(crate) fn entry(&self, level: usize, entry: u32) -> &ExtentXY {
        &self.levels[level][entry as usize]
    }

    /// Vertex index range `[beg, end)` covered by a leaf entry, including the overlap vertex.
    pub(crate) fn leaf_range(&self, entry: u32) -> (u32, u32) {
        let beg = entry * NODE_SIZE;
        let end = (beg + NODE_SIZE + 1).min(self.items_count);
        (beg, end)
    }

    /// Entry range `[beg, end)` of the children of `entry` on `level + 1`.
    pub(crate) fn child_range(&self, level: usize, entry: u32) -> (u32, u32) {
        let beg = entry * NODE_SIZE;
        let end = (beg + NODE_SIZE).min(self.levels[level + 1].len() as u32);
        (beg, end)
    }

    /// Ray-cast point-in-ring test over `vertices`, skipping every run whose box does not
    /// overlap the vertex's y.
    pub fn contains(&self, vertices: &VertexArray, vertex: &VertexXY) -> PointInPolygon {
        let mut stack = [0u32; MAX_DEPTH];
        let mut depth = 0usize;
        let mut crossings = 0u32;

        loop {
            let entry = stack[depth];
            let extent = self.entry(depth, entry);
            debug_assert!(extent.min.y <= extent.max.y);

            if extent.min.y <= vertex.y && extent.max.y >= vertex.y {
                if !self.is_leaf_level(depth) {
                    depth += 1;
                    stack[depth] = entry * NODE_SIZE;
                    continue;
                }

                let (beg, end) = self.leaf_range(entry);
                let mut prev = vertices.xy(beg as usize);
                for i in beg + 1..end {
                    let next = vertices.xy(i as usize);
                    match raycast_fast(&prev, &next, vertex) {
                        Raycast::None => {}
                        Raycast::Cross => crossings += 1,
                        Raycast::Boundary => return PointInPolygon::Boundary,
                    }
                    prev = next;
                }
            }

            // Move sideways within the parent, or climb once the parent is exhausted.
            loop {
                if depth == 0 {
                    return if crossings % 2 == 0 {
                        PointInPolygon::Exterior
                    } else {
                        PointInPolygon::Interior
                    };
                }

                let node_end = (stack[depth - 1] + 1) * NODE_SIZE - 1;
                let level_end = self.levels[depth].len() as u32 - 1;

                if stack[depth] != node_end.min(level_end) {
                    stack[depth] += 1;
                    break;
                }

                depth -= 1;
            }
        }
    }

    /// Distance from `vertex` to the nearest segment of `vertices`.
    ///
    /// Branch-and-bound: within every group of siblings, the smallest "minimum of maximum
    /// distance" is an upper bound for the nearest segment, and any sibling whose box lies
    /// farther away than that bound cannot contain it.
    pub fn distance_to_vertex(&self, vertices: &VertexArray, vertex: &VertexXY) -> Option<f64> {
        let mut distance = f64::INFINITY;
        if self.distance_recursive(vertices, 0, 0, vertex, &mut distance) {
            Some(distance)
        } else {
            None
        }
    }

    fn distance_recursive(
        &self,
        vertices: &VertexArray,
        level: usize,
        entry: u32,
        vertex: &VertexXY,
        distance: &mut f64,
    ) -> bool {
        if self.is_leaf_level(level) {
            let (beg, end) = self.leaf_range(entry);
            if beg >= end {
                return false;
            }
            if end - beg == 1 {
                *distance = distance.min((vertices.xy(beg as usize) - *vertex).norm());
                return true;
            }
            let mut prev = vertices.xy(beg as usize);
            for i in beg + 1..end {
                let next = vertices.xy(i as usize);
                *distance = distance.min(vertex_segment_distance(vertex, &prev, &next));
                prev = next;
            }
            return true;
        }

        let (beg, end) = self.child_range(level, entry);
        if beg >= end {
            return false;
        }

        let children = &self.levels[level + 1][beg as usize..end as usize];
        let min_max_distance = children
            .iter()
            .map(|child| child.min_max_distance_sq(vertex))
            .fold(f64::INFINITY, f64::min);

        let mut found_any = false;
        for (i, child) in children.iter().enumerate() {
            if child.distance_to_sq(vertex) > min_max_distance + PRUNE_EPSILON {
                continue;
            }
            found_any |= self.distance_recursive(vertices, level + 1, beg + i as u32, vertex, distance);
        }
        found_any
    }
}
