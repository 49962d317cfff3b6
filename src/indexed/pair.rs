//! Best-first nearest-pair search between two prepared indexes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::algorithm::primitives::{segment_extent, segment_segment_distance_sq};
use crate::geometry::{ExtentXY, VertexArray, VertexXY};
use crate::indexed::PreparedIndex;

/// A pending pair of index entries, ordered so that [`BinaryHeap`] pops the closest first.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    distance_sq: f64,
    lhs_level: usize,
    lhs_entry: u32,
    rhs_level: usize,
    rhs_entry: u32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other.distance_sq.total_cmp(&self.distance_sq)
    }
}

/// One side of the search: an index together with the vertices it was built over.
#[derive(Clone, Copy)]
struct Side<'i, 'a> {
    index: &'i PreparedIndex,
    vertices: VertexArray<'a>,
}

impl Side<'_, '_> {
    fn is_leaf(&self, level: usize) -> bool {
        self.index.is_leaf_level(level)
    }

    fn entry(&self, level: usize, entry: u32) -> ExtentXY {
        *self.index.entry(level, entry)
    }
}

impl PreparedIndex {
    /// Minimum distance between the segments indexed by `self` (over `vertices`) and those
    /// indexed by `other` (over `other_vertices`).
    ///
    /// Entry pairs are expanded in order of increasing box distance. The search ends as soon as
    /// the closest pending pair cannot improve on the best segment distance found so far, or
    /// once the two lines are found to touch.
    pub fn distance_to_index(
        &self,
        vertices: &VertexArray,
        other: &PreparedIndex,
        other_vertices: &VertexArray,
    ) -> Option<f64> {
        if vertices.is_empty() || other_vertices.is_empty() {
            return None;
        }

        let lhs = Side {
            index: self,
            vertices: *vertices,
        };
        let rhs = Side {
            index: other,
            vertices: *other_vertices,
        };

        let mut queue = BinaryHeap::new();
        queue.push(Candidate {
            distance_sq: 0.0,
            lhs_level: 0,
            lhs_entry: 0,
            rhs_level: 0,
            rhs_entry: 0,
        });

        let mut min_dist = f64::INFINITY;
        let mut found_any = false;

        while min_dist > 0.0 {
            let Some(pair) = queue.pop() else {
                break;
            };

            if pair.distance_sq >= min_dist && found_any {
                break;
            }

            match (lhs.is_leaf(pair.lhs_level), rhs.is_leaf(pair.rhs_level)) {
                (true, true) => {
                    if let Some(dist) = leaf_pair_distance_sq(&lhs, &rhs, &pair, min_dist) {
                        min_dist = dist;
                        found_any = true;
                    }
                }
                (true, false) => {
                    let lhs_box = lhs.entry(pair.lhs_level, pair.lhs_entry);
                    expand_rhs(&mut queue, &rhs, &pair, &lhs_box, min_dist);
                }
                (false, true) => {
                    let rhs_box = rhs.entry(pair.rhs_level, pair.rhs_entry);
                    expand_lhs(&mut queue, &lhs, &pair, &rhs_box, min_dist);
                }
                (false, false) => {
                    let lhs_box = lhs.entry(pair.lhs_level, pair.lhs_entry);
                    let rhs_box = rhs.entry(pair.rhs_level, pair.rhs_entry);

                    // Descend into the larger box to shrink the pair distance fastest.
                    if lhs_box.area() > rhs_box.area() {
                        expand_lhs(&mut queue, &lhs, &pair, &rhs_box, min_dist);
                    } else {
                        expand_rhs(&mut queue, &rhs, &pair, &lhs_box, min_dist);
                    }
                }
            }
        }

        found_any.then(|| min_dist.sqrt())
    }
}

fn expand_lhs(
    queue: &mut BinaryHeap<Candidate>,
    lhs: &Side,
    pair: &Candidate,
    rhs_box: &ExtentXY,
    min_dist: f64,
) {
    let (beg, end) = lhs.index.child_range(pair.lhs_level, pair.lhs_entry);
    for i in beg..end {
        let distance_sq = lhs.entry(pair.lhs_level + 1, i).extent_distance_sq(rhs_box);
        if distance_sq < min_dist {
            queue.push(Candidate {
                distance_sq,
                lhs_level: pair.lhs_level + 1,
                lhs_entry: i,
                ..*pair
            });
        }
    }
}

fn expand_rhs(
    queue: &mut BinaryHeap<Candidate>,
    rhs: &Side,
    pair: &Candidate,
    lhs_box: &ExtentXY,
    min_dist: f64,
) {
    let (beg, end) = rhs.index.child_range(pair.rhs_level, pair.rhs_entry);
    for i in beg..end {
        let distance_sq = rhs.entry(pair.rhs_level + 1, i).extent_distance_sq(lhs_box);
        if distance_sq < min_dist {
            queue.push(Candidate {
                distance_sq,
                rhs_level: pair.rhs_level + 1,
                rhs_entry: i,
                ..*pair
            });
        }
    }
}

/// The segments covered by a leaf entry. A run holding a single vertex yields it as one
/// zero-length segment, so single-vertex and collapsed lines still have something to measure.
fn leaf_segments<'a>(
    side: &Side<'_, 'a>,
    entry: u32,
) -> impl Iterator<Item = (VertexXY, VertexXY)> + 'a {
    let (beg, end) = side.index.leaf_range(entry);
    let (beg, end) = (beg as usize, end as usize);
    let vertices = side.vertices;
    let last = end.saturating_sub(1).max(beg + 1).min(end);
    (beg..last).map(move |i| (vertices.xy(i), vertices.xy((i + 1).min(end - 1))))
}

/// Closest squared segment distance between two leaf entries, if it beats `min_dist`.
fn leaf_pair_distance_sq(lhs: &Side, rhs: &Side, pair: &Candidate, min_dist: f64) -> Option<f64> {
    let rhs_box = rhs.entry(pair.rhs_level, pair.rhs_entry);
    let mut best = min_dist;
    let mut improved = false;

    for (lhs_prev, lhs_next) in leaf_segments(lhs, pair.lhs_entry) {
        let lhs_seg = segment_extent(&lhs_prev, &lhs_next);
        if lhs_seg.extent_distance_sq(&rhs_box) > best {
            continue;
        }

        for (rhs_prev, rhs_next) in leaf_segments(rhs, pair.rhs_entry) {
            if segment_extent(&rhs_prev, &rhs_next).extent_distance_sq(&lhs_seg) > best {
                continue;
            }

            let dist = segment_segment_distance_sq(&lhs_prev, &lhs_next, &rhs_prev, &rhs_next);
            if dist < best {
                best = dist;
                improved = true;
            }
        }
    }

    improved.then_some(best)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::primitives::segment_segment_distance_sq;
    use crate::alloc::VertexBuffer;
    use approx::assert_relative_eq;
    use bumpalo::Bump;

    fn line<'a>(bump: &'a Bump, vertices: impl Iterator<Item = (f64, f64)>) -> VertexArray<'a> {
        let mut buffer = VertexBuffer::new(bump, 16);
        for (x, y) in vertices {
            buffer.push(&[x, y, 0.0, 0.0]);
        }
        let (data, len) = buffer.finish();
        VertexArray::new(data, len, 16)
    }

    fn brute_force(lhs: &VertexArray, rhs: &VertexArray) -> f64 {
        let mut best = f64::INFINITY;
        for (a, b) in lhs.segments_xy() {
            for (c, d) in rhs.segments_xy() {
                best = best.min(segment_segment_distance_sq(&a, &b, &c, &d));
            }
        }
        best.sqrt()
    }

    #[test]
    fn candidates_pop_closest_first() {
        let mut queue = BinaryHeap::new();
        for distance_sq in [4.0, 1.0, 9.0, 0.5] {
            queue.push(Candidate {
                distance_sq,
                lhs_level: 0,
                lhs_entry: 0,
                rhs_level: 0,
                rhs_entry: 0,
            });
        }
        let order: Vec<f64> = std::iter::from_fn(|| queue.pop().map(|c| c.distance_sq)).collect();
        assert_eq!(order, vec![0.5, 1.0, 4.0, 9.0]);
    }

    #[test]
    fn parallel_sine_waves() {
        let bump = Bump::new();
        let lhs = line(&bump, (0..1500).map(|i| (i as f64 * 0.1, (i as f64 * 0.1).sin())));
        let rhs = line(
            &bump,
            (0..900).map(|i| (i as f64 * 0.17 + 3.0, (i as f64 * 0.17).cos() + 2.5)),
        );

        let lhs_index = PreparedIndex::build(&lhs).unwrap();
        let rhs_index = PreparedIndex::build(&rhs).unwrap();

        let expected = brute_force(&lhs, &rhs);
        let actual = lhs_index.distance_to_index(&lhs, &rhs_index, &rhs).unwrap();
        assert_relative_eq!(actual, expected, epsilon = 1e-9);

        let reversed = rhs_index.distance_to_index(&rhs, &lhs_index, &lhs).unwrap();
        assert_relative_eq!(reversed, expected, epsilon = 1e-9);
    }

    #[test]
    fn crossing_lines_touch() {
        let bump = Bump::new();
        let lhs = line(&bump, (0..100).map(|i| (i as f64, 0.0)));
        let rhs = line(&bump, (0..100).map(|i| (50.5, i as f64 - 50.0)));
        let lhs_index = PreparedIndex::build(&lhs).unwrap();
        let rhs_index = PreparedIndex::build(&rhs).unwrap();
        assert_eq!(lhs_index.distance_to_index(&lhs, &rhs_index, &rhs), Some(0.0));
    }

    #[test]
    fn collapsed_lines() {
        let bump = Bump::new();
        let single = line(&bump, [(1.0, 1.0)].into_iter());
        let other_single = line(&bump, [(1.0, 3.0)].into_iter());
        let repeated = line(&bump, [(0.0, 0.0), (0.0, 0.0)].into_iter());
        let other_repeated = line(&bump, [(3.0, 0.0), (3.0, 0.0)].into_iter());
        let upright = line(&bump, [(3.0, -1.0), (3.0, 1.0)].into_iter());

        let distance = |lhs: &VertexArray, rhs: &VertexArray| {
            let lhs_index = PreparedIndex::build(lhs).unwrap();
            let rhs_index = PreparedIndex::build(rhs).unwrap();
            lhs_index.distance_to_index(lhs, &rhs_index, rhs)
        };

        assert_eq!(distance(&single, &other_single), Some(2.0));
        assert_eq!(distance(&repeated, &other_repeated), Some(3.0));
        assert_eq!(distance(&repeated, &upright), Some(3.0));
        assert_eq!(distance(&upright, &single), Some(2.0));
    }
}
