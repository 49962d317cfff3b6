//! Iterative tree walks.
//!
//! Nothing here recurses: the walks climb back up through parent links, so stack usage stays
//! constant no matter how deeply collections are nested.

use crate::geometry::{GeomId, GeometryArena, GeometryRef, GeometryType};

/// What a [`Walk`] does with a node it reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Yield the node and do not look at its children.
    Yield,
    /// Visit the node's children instead of yielding it.
    Descend,
    /// Ignore the node and everything below it.
    Skip,
}

/// Depth-first, in-order walk over a subtree, driven by a per-type [`Step`] decision.
///
/// The root itself is subject to the same decision as every other node.
pub struct Walk<'g, 'a, F> {
    arena: &'g GeometryArena<'a>,
    stop: Option<GeomId>,
    cursor: Option<GeomId>,
    select: F,
}

impl<'g, 'a, F> Walk<'g, 'a, F>
where
    F: FnMut(GeometryType) -> Step,
{
    pub(crate) fn new(arena: &'g GeometryArena<'a>, root: GeomId, select: F) -> Self {
        Self {
            arena,
            stop: arena.parent(root),
            cursor: Some(root),
            select,
        }
    }
}

impl<'g, 'a, F> Walk<'g, 'a, F> {
    /// Find the node after `part` in walk order, climbing out of exhausted containers.
    fn advance(&self, mut part: GeomId) -> Option<GeomId> {
        loop {
            let parent = self.arena.parent(part);
            if parent == self.stop {
                return None;
            }
            let parent = parent?;
            if self.arena.last_part(parent) != Some(part) {
                return self.arena.next(part);
            }
            part = parent;
        }
    }
}

impl<'g, 'a, F> Iterator for Walk<'g, 'a, F>
where
    F: FnMut(GeometryType) -> Step,
{
    type Item = GeometryRef<'g, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let part = self.cursor?;
            match (self.select)(self.arena.geometry_type(part)) {
                Step::Descend if !self.arena.is_empty_geometry(part) => {
                    self.cursor = self.arena.first_part(part);
                }
                Step::Yield => {
                    self.cursor = self.advance(part);
                    return Some(self.arena.get(part));
                }
                _ => {
                    self.cursor = self.advance(part);
                }
            }
        }
    }
}

/// Walk decision for polygon leaves.
pub fn polygons(kind: GeometryType) -> Step {
    match kind {
        GeometryType::Polygon => Step::Yield,
        GeometryType::MultiPolygon | GeometryType::GeometryCollection => Step::Descend,
        _ => Step::Skip,
    }
}

/// Walk decision for line leaves.
pub fn lines(kind: GeometryType) -> Step {
    match kind {
        GeometryType::LineString => Step::Yield,
        GeometryType::MultiLineString | GeometryType::GeometryCollection => Step::Descend,
        _ => Step::Skip,
    }
}

/// Walk decision for point leaves.
pub fn points(kind: GeometryType) -> Step {
    match kind {
        GeometryType::Point => Step::Yield,
        GeometryType::MultiPoint | GeometryType::GeometryCollection => Step::Descend,
        _ => Step::Skip,
    }
}

/// Walk decision for every node that owns a vertex array, polygon rings included.
pub fn vertex_arrays(kind: GeometryType) -> Step {
    match kind {
        GeometryType::Point | GeometryType::LineString => Step::Yield,
        GeometryType::Polygon
        | GeometryType::MultiPoint
        | GeometryType::MultiLineString
        | GeometryType::MultiPolygon
        | GeometryType::GeometryCollection => Step::Descend,
        GeometryType::Invalid => Step::Skip,
    }
}

/// Walk decision for point, line and polygon leaves.
pub fn leaf_geometries(kind: GeometryType) -> Step {
    match kind {
        GeometryType::Point | GeometryType::LineString | GeometryType::Polygon => Step::Yield,
        GeometryType::MultiPoint
        | GeometryType::MultiLineString
        | GeometryType::MultiPolygon
        | GeometryType::GeometryCollection => Step::Descend,
        GeometryType::Invalid => Step::Skip,
    }
}

/// Collect the ids of the vertex-array nodes below `root`, in walk order.
///
/// Used by the operations that replace vertex arrays in place and therefore cannot hold a
/// borrow of the arena while mutating it.
pub(crate) fn vertex_array_ids(arena: &GeometryArena, root: GeomId) -> Vec<GeomId> {
    arena.walk(root, vertex_arrays).map(|part| part.id()).collect()
}

/// Visit every node below and including `root`, calling `on_enter` before a node's children
/// and `on_leave` after them.
pub(crate) fn visit_all_parts_mut<'a, E, L>(
    arena: &mut GeometryArena<'a>,
    root: GeomId,
    mut on_enter: E,
    mut on_leave: L,
) where
    E: FnMut(&mut GeometryArena<'a>, GeomId),
    L: FnMut(&mut GeometryArena<'a>, GeomId),
{
    let stop = arena.parent(root);
    let mut part = root;

    loop {
        on_enter(arena, part);

        if arena.geometry_type(part).is_multi_part() {
            if let Some(first) = arena.first_part(part) {
                part = first;
                continue;
            }
        }

        // Leaf or empty container: leave it, then climb until a sibling is found.
        loop {
            on_leave(arena, part);
            let parent = arena.parent(part);
            if parent == stop {
                return;
            }
            let Some(parent) = parent else {
                return;
            };
            if arena.last_part(parent) != Some(part) {
                match arena.next(part) {
                    Some(next) => {
                        part = next;
                        break;
                    }
                    None => return,
                }
            }
            part = parent;
        }
    }
}
