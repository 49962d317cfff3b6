//! Arena storage for geometry trees.
//!
//! Every node of every tree lives in one [`GeometryArena`] and is addressed by a [`GeomId`].
//! Containers link their children through a circular singly-linked list: the container stores
//! the id of its *last* child, and the last child's `next` is the first child. This keeps both
//! append and access to either end O(1) without a separate head field.

use std::fmt;

use crate::alloc::{Allocator, VertexBuffer};
use crate::geometry::traversal::{Step, Walk};
use crate::geometry::{GeometryType, VertexArray, VertexType, VertexXY, VertexXYZM};
use crate::indexed::PreparedIndex;

const FLAG_Z: u8 = 0x01;
const FLAG_M: u8 = 0x02;
const FLAG_PREPARED: u8 = 0x04;

/// Stable handle to a node in a [`GeometryArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeomId(u32);

impl GeomId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GeomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug)]
enum Payload<'a> {
    None,
    Vertices(&'a [u8]),
    Parts { last: GeomId },
}

#[derive(Clone, Debug)]
struct Node<'a> {
    kind: GeometryType,
    flags: u8,
    size: u32,
    parent: Option<GeomId>,
    next: Option<GeomId>,
    payload: Payload<'a>,
    index: Option<u32>,
}

impl<'a> Node<'a> {
    fn new(kind: GeometryType, has_z: bool, has_m: bool) -> Self {
        let mut flags = 0;
        if has_z {
            flags |= FLAG_Z;
        }
        if has_m {
            flags |= FLAG_M;
        }
        Self {
            kind,
            flags,
            size: 0,
            parent: None,
            next: None,
            payload: Payload::None,
            index: None,
        }
    }

    fn has_z(&self) -> bool {
        self.flags & FLAG_Z != 0
    }

    fn has_m(&self) -> bool {
        self.flags & FLAG_M != 0
    }

    fn set_flag(&mut self, flag: u8, value: bool) {
        if value {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }

    fn vertex_width(&self) -> usize {
        VertexType::new(self.has_z(), self.has_m()).width()
    }
}

/// Owner of every geometry node and prepared index built against one allocator.
///
/// Nodes are never freed individually. Dropping the arena (and then the allocator) releases
/// everything at once.
pub struct GeometryArena<'a> {
    alloc: &'a dyn Allocator,
    nodes: Vec<Node<'a>>,
    indexes: Vec<PreparedIndex>,
}

impl<'a> GeometryArena<'a> {
    pub fn new(alloc: &'a dyn Allocator) -> Self {
        Self {
            alloc,
            nodes: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// The allocator that vertex arrays created by operations on this arena come from.
    pub fn allocator(&self) -> &'a dyn Allocator {
        self.alloc
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new, unlinked node.
    pub fn push(&mut self, kind: GeometryType, has_z: bool, has_m: bool) -> GeomId {
        let id = GeomId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind, has_z, has_m));
        id
    }

    /// Allocate a new node holding `count` vertices from `data`.
    pub fn push_with_vertices(
        &mut self,
        kind: GeometryType,
        has_z: bool,
        has_m: bool,
        data: &'a [u8],
        count: u32,
    ) -> GeomId {
        let id = self.push(kind, has_z, has_m);
        self.set_vertex_array(id, data, count);
        id
    }

    /// Allocate an XY POLYGON whose shell is the closed, clockwise box ring
    /// `(min_x min_y, min_x max_y, max_x max_y, max_x min_y, min_x min_y)`.
    pub fn push_bbox_polygon(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> GeomId {
        let corners = [
            [min_x, min_y, 0.0, 0.0],
            [min_x, max_y, 0.0, 0.0],
            [max_x, max_y, 0.0, 0.0],
            [max_x, min_y, 0.0, 0.0],
            [min_x, min_y, 0.0, 0.0],
        ];
        let mut buffer = VertexBuffer::with_capacity(self.alloc, VertexType::XY.width(), corners.len());
        for corner in &corners {
            buffer.push(corner);
        }
        let (data, count) = buffer.finish();

        let polygon = self.push(GeometryType::Polygon, false, false);
        let shell = self.push_with_vertices(GeometryType::LineString, false, false, data, count);
        self.append_part(polygon, shell);
        polygon
    }

    /// Allocate a copy of `id`'s header and vertex array reference. Children are not copied.
    pub(crate) fn push_shallow_copy(&mut self, id: GeomId) -> GeomId {
        let node = self.node(id);
        let (kind, flags, payload, size) = (node.kind, node.flags, node.payload, node.size);
        let copy = self.push(kind, false, false);
        let copy_node = self.node_mut(copy);
        copy_node.flags = flags & (FLAG_Z | FLAG_M);
        if let Payload::Vertices(data) = payload {
            copy_node.payload = Payload::Vertices(data);
            copy_node.size = size;
        }
        copy
    }

    /// A read handle for `id`.
    pub fn get(&self, id: GeomId) -> GeometryRef<'_, 'a> {
        GeometryRef { arena: self, id }
    }

    fn node(&self, id: GeomId) -> &Node<'a> {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: GeomId) -> &mut Node<'a> {
        &mut self.nodes[id.index()]
    }

    pub fn geometry_type(&self, id: GeomId) -> GeometryType {
        self.node(id).kind
    }

    pub fn set_type(&mut self, id: GeomId, kind: GeometryType) {
        self.node_mut(id).kind = kind;
    }

    pub fn has_z(&self, id: GeomId) -> bool {
        self.node(id).has_z()
    }

    pub fn has_m(&self, id: GeomId) -> bool {
        self.node(id).has_m()
    }

    pub fn set_z(&mut self, id: GeomId, value: bool) {
        self.node_mut(id).set_flag(FLAG_Z, value);
    }

    pub fn set_m(&mut self, id: GeomId, value: bool) {
        self.node_mut(id).set_flag(FLAG_M, value);
    }

    pub fn is_prepared(&self, id: GeomId) -> bool {
        self.node(id).flags & FLAG_PREPARED != 0
    }

    pub fn is_empty_geometry(&self, id: GeomId) -> bool {
        self.node(id).size == 0
    }

    pub fn vertex_type(&self, id: GeomId) -> VertexType {
        let node = self.node(id);
        VertexType::new(node.has_z(), node.has_m())
    }

    pub fn vertex_width(&self, id: GeomId) -> usize {
        self.node(id).vertex_width()
    }

    /// Return the node to its freshly constructed state. Former children are left untouched.
    pub fn reset(&mut self, id: GeomId) {
        *self.node_mut(id) = Node::new(GeometryType::Invalid, false, false);
    }

    pub fn parent(&self, id: GeomId) -> Option<GeomId> {
        self.node(id).parent
    }

    pub fn next(&self, id: GeomId) -> Option<GeomId> {
        self.node(id).next
    }

    pub fn last_part(&self, id: GeomId) -> Option<GeomId> {
        match self.node(id).payload {
            Payload::Parts { last } => Some(last),
            _ => None,
        }
    }

    pub fn first_part(&self, id: GeomId) -> Option<GeomId> {
        self.last_part(id).and_then(|last| self.node(last).next)
    }

    pub fn part_count(&self, id: GeomId) -> u32 {
        self.node(id).size
    }

    /// Append `part` to the end of `id`'s child list in O(1).
    ///
    /// `id` must be a container kind or still untyped, and `part` must not be linked anywhere.
    pub fn append_part(&mut self, id: GeomId, part: GeomId) {
        debug_assert!(
            self.geometry_type(id).is_multi_part() || self.geometry_type(id) == GeometryType::Invalid
        );
        debug_assert!(self.parent(part).is_none() && id != part);

        let head = match self.node(id).payload {
            Payload::Parts { last } => {
                let head = self.node(last).next;
                self.node_mut(last).next = Some(part);
                head
            }
            _ => {
                debug_assert!(self.node(id).size == 0);
                Some(part)
            }
        };

        let node = self.node_mut(part);
        node.next = head;
        node.parent = Some(id);

        let node = self.node_mut(id);
        node.payload = Payload::Parts { last: part };
        node.size += 1;
    }

    /// Unlink every child of `id` for which `select` returns true and pass each removed,
    /// parentless child to `handle`, in list order.
    ///
    /// The remaining children stay linked in their original order, and the stored tail is
    /// updated when the removed child was last.
    pub fn filter_parts<S, H>(&mut self, id: GeomId, mut select: S, mut handle: H)
    where
        S: FnMut(&GeometryArena<'a>, GeomId) -> bool,
        H: FnMut(&mut GeometryArena<'a>, GeomId),
    {
        let Some(mut tail) = self.last_part(id) else {
            return;
        };

        let mut prev = tail;
        let mut shrank = true;

        while self.node(id).size > 0 && (prev != tail || shrank) {
            shrank = false;
            let curr = self.node(prev).next.unwrap_or(prev);
            let next = self.node(curr).next.unwrap_or(curr);

            if select(self, curr) {
                self.node_mut(prev).next = Some(next);
                self.node_mut(id).size -= 1;
                shrank = true;

                if curr == tail {
                    tail = prev;
                    self.node_mut(id).payload = Payload::Parts { last: tail };
                }

                let node = self.node_mut(curr);
                node.parent = None;
                node.next = None;

                handle(self, curr);
            } else {
                prev = curr;
            }
        }

        if self.node(id).size == 0 {
            self.node_mut(id).payload = Payload::None;
        }
    }

    pub fn vertex_count(&self, id: GeomId) -> u32 {
        debug_assert!(!self.geometry_type(id).is_multi_part());
        match self.node(id).payload {
            Payload::Parts { .. } => 0,
            _ => self.node(id).size,
        }
    }

    /// View the vertex array of a leaf node. Container nodes yield an empty array.
    pub fn vertex_array(&self, id: GeomId) -> VertexArray<'a> {
        let node = self.node(id);
        debug_assert!(!node.kind.is_multi_part() || node.kind == GeometryType::Invalid);
        match node.payload {
            Payload::Vertices(data) => VertexArray::new(data, node.size, node.vertex_width()),
            _ => VertexArray::empty(node.vertex_width()),
        }
    }

    /// Point a leaf node at `count` vertices stored in `data`.
    ///
    /// Any prepared index on the node no longer matches the new vertices and is detached.
    pub fn set_vertex_array(&mut self, id: GeomId, data: &'a [u8], count: u32) {
        let node = self.node_mut(id);
        debug_assert!(!node.kind.is_multi_part() || node.kind == GeometryType::Invalid);
        debug_assert!(data.len() >= count as usize * node.vertex_width());
        node.payload = Payload::Vertices(data);
        node.size = count;
        node.index = None;
        node.set_flag(FLAG_PREPARED, false);
    }

    pub fn vertex_xy(&self, id: GeomId, index: u32) -> VertexXY {
        self.vertex_array(id).xy(index as usize)
    }

    pub fn vertex_xyzm(&self, id: GeomId, index: u32) -> VertexXYZM {
        self.vertex_array(id).xyzm(index as usize)
    }

    pub(crate) fn attach_index(&mut self, id: GeomId, index: PreparedIndex) {
        let slot = self.indexes.len() as u32;
        self.indexes.push(index);
        let node = self.node_mut(id);
        node.index = Some(slot);
        node.set_flag(FLAG_PREPARED, true);
    }

    /// The prepared index of `id`, if it has been built.
    pub fn prepared_index(&self, id: GeomId) -> Option<&PreparedIndex> {
        self.node(id).index.map(|slot| &self.indexes[slot as usize])
    }

    /// Iterate the direct children of `id` in order.
    pub fn parts(&self, id: GeomId) -> Parts<'_, 'a> {
        Parts {
            arena: self,
            next: self.first_part(id),
            remaining: match self.node(id).payload {
                Payload::Parts { .. } => self.node(id).size,
                _ => 0,
            },
        }
    }

    /// Iterate the nodes below `id` that `select` yields, descending where it asks to.
    pub fn walk<F>(&self, id: GeomId, select: F) -> Walk<'_, 'a, F>
    where
        F: FnMut(GeometryType) -> Step,
    {
        Walk::new(self, id, select)
    }
}

impl fmt::Debug for GeometryArena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryArena")
            .field("nodes", &self.nodes.len())
            .field("indexes", &self.indexes.len())
            .finish()
    }
}

/// Iterator over the direct children of a container.
#[derive(Clone)]
pub struct Parts<'g, 'a> {
    arena: &'g GeometryArena<'a>,
    next: Option<GeomId>,
    remaining: u32,
}

impl<'g, 'a> Iterator for Parts<'g, 'a> {
    type Item = GeometryRef<'g, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.next?;
        self.remaining -= 1;
        self.next = self.arena.next(id);
        Some(self.arena.get(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for Parts<'_, '_> {}

/// A cheap read handle pairing an arena with one of its nodes.
#[derive(Clone, Copy)]
pub struct GeometryRef<'g, 'a> {
    arena: &'g GeometryArena<'a>,
    id: GeomId,
}

impl<'g, 'a> GeometryRef<'g, 'a> {
    pub fn id(&self) -> GeomId {
        self.id
    }

    pub fn arena(&self) -> &'g GeometryArena<'a> {
        self.arena
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.arena.geometry_type(self.id)
    }

    pub fn has_z(&self) -> bool {
        self.arena.has_z(self.id)
    }

    pub fn has_m(&self) -> bool {
        self.arena.has_m(self.id)
    }

    pub fn is_prepared(&self) -> bool {
        self.arena.is_prepared(self.id)
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty_geometry(self.id)
    }

    pub fn is_multi_part(&self) -> bool {
        self.geometry_type().is_multi_part()
    }

    pub fn is_multi_geom(&self) -> bool {
        self.geometry_type().is_multi_geom()
    }

    pub fn vertex_type(&self) -> VertexType {
        self.arena.vertex_type(self.id)
    }

    pub fn vertex_width(&self) -> usize {
        self.arena.vertex_width(self.id)
    }

    pub fn vertex_count(&self) -> u32 {
        self.arena.vertex_count(self.id)
    }

    pub fn vertices(&self) -> VertexArray<'a> {
        self.arena.vertex_array(self.id)
    }

    pub fn vertex_xy(&self, index: u32) -> VertexXY {
        self.arena.vertex_xy(self.id, index)
    }

    pub fn vertex_xyzm(&self, index: u32) -> VertexXYZM {
        self.arena.vertex_xyzm(self.id, index)
    }

    pub fn part_count(&self) -> u32 {
        self.arena.part_count(self.id)
    }

    pub fn parent(&self) -> Option<GeometryRef<'g, 'a>> {
        self.arena.parent(self.id).map(|id| self.arena.get(id))
    }

    pub fn first_part(&self) -> Option<GeometryRef<'g, 'a>> {
        self.arena.first_part(self.id).map(|id| self.arena.get(id))
    }

    pub fn last_part(&self) -> Option<GeometryRef<'g, 'a>> {
        self.arena.last_part(self.id).map(|id| self.arena.get(id))
    }

    pub fn parts(&self) -> Parts<'g, 'a> {
        self.arena.parts(self.id)
    }

    pub fn prepared_index(&self) -> Option<&'g PreparedIndex> {
        self.arena.prepared_index(self.id)
    }

    pub fn walk<F>(&self, select: F) -> Walk<'g, 'a, F>
    where
        F: FnMut(GeometryType) -> Step,
    {
        Walk::new(self.arena, self.id, select)
    }
}

impl fmt::Debug for GeometryRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeometryRef")
            .field("id", &self.id)
            .field("type", &self.geometry_type())
            .field("has_z", &self.has_z())
            .field("has_m", &self.has_m())
            .field("size", &self.arena.node(self.id).size)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::alloc::VertexBuffer;
    use bumpalo::Bump;

    fn point<'a>(arena: &mut GeometryArena<'a>, x: f64, y: f64) -> GeomId {
        let mut buffer = VertexBuffer::new(arena.allocator(), 16);
        buffer.push(&[x, y, 0.0, 0.0]);
        let (data, count) = buffer.finish();
        arena.push_with_vertices(GeometryType::Point, false, false, data, count)
    }

    fn xs(arena: &GeometryArena, id: GeomId) -> Vec<f64> {
        arena.parts(id).map(|part| part.vertex_xy(0).x).collect()
    }

    #[test]
    fn append_keeps_order() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let multi = arena.push(GeometryType::MultiPoint, false, false);
        assert!(arena.is_empty_geometry(multi));
        assert!(arena.first_part(multi).is_none());

        for i in 0..4 {
            let p = point(&mut arena, i as f64, 0.0);
            arena.append_part(multi, p);
        }

        assert_eq!(arena.part_count(multi), 4);
        assert_eq!(xs(&arena, multi), vec![0.0, 1.0, 2.0, 3.0]);

        let first = arena.first_part(multi).unwrap();
        let last = arena.last_part(multi).unwrap();
        assert_eq!(arena.vertex_xy(first, 0).x, 0.0);
        assert_eq!(arena.vertex_xy(last, 0).x, 3.0);
        assert_eq!(arena.next(last), Some(first));
        assert_eq!(arena.parent(first), Some(multi));
    }

    #[test]
    fn filter_parts_relinks_remainder() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let multi = arena.push(GeometryType::MultiPoint, false, false);
        for i in 0..6 {
            let p = point(&mut arena, i as f64, 0.0);
            arena.append_part(multi, p);
        }

        let mut removed = Vec::new();
        arena.filter_parts(
            multi,
            |arena, part| arena.vertex_xy(part, 0).x as i32 % 2 == 1,
            |arena, part| {
                assert!(arena.parent(part).is_none());
                removed.push(arena.vertex_xy(part, 0).x);
            },
        );

        assert_eq!(removed, vec![1.0, 3.0, 5.0]);
        assert_eq!(arena.part_count(multi), 3);
        assert_eq!(xs(&arena, multi), vec![0.0, 2.0, 4.0]);

        // The tail was removed, so the stored tail must now be the last survivor.
        let last = arena.last_part(multi).unwrap();
        assert_eq!(arena.vertex_xy(last, 0).x, 4.0);

        let p = point(&mut arena, 9.0, 0.0);
        arena.append_part(multi, p);
        assert_eq!(xs(&arena, multi), vec![0.0, 2.0, 4.0, 9.0]);
    }

    #[test]
    fn filter_parts_can_empty_container() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let multi = arena.push(GeometryType::MultiPoint, false, false);
        for i in 0..3 {
            let p = point(&mut arena, i as f64, 0.0);
            arena.append_part(multi, p);
        }
        let mut count = 0;
        arena.filter_parts(multi, |_, _| true, |_, _| count += 1);
        assert_eq!(count, 3);
        assert!(arena.is_empty_geometry(multi));
        assert!(arena.last_part(multi).is_none());
        assert_eq!(arena.parts(multi).count(), 0);
    }

    #[test]
    fn vertex_width_follows_flags() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let id = arena.push(GeometryType::LineString, true, false);
        assert_eq!(arena.vertex_width(id), 24);
        arena.set_m(id, true);
        assert_eq!(arena.vertex_type(id), VertexType::XYZM);
        assert_eq!(arena.vertex_width(id), 32);
        arena.reset(id);
        assert_eq!(arena.geometry_type(id), GeometryType::Invalid);
        assert_eq!(arena.vertex_width(id), 16);
    }
}
