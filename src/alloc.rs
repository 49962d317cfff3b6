//! The memory interface every reader and transform allocates vertex storage through.
//!
//! Blocks handed out by an [`Allocator`] live exactly as long as the allocator itself. There is no
//! per-block ownership; [`Allocator::dealloc`] is a hint that an arena is free to ignore, and
//! dropping the allocator releases everything at once.

use bumpalo::Bump;

/// Byte-block allocator used for vertex arrays.
///
/// The returned slices borrow from the allocator, so every block is guaranteed to outlive any
/// geometry that references it as long as the geometry is tied to the allocator's lifetime.
pub trait Allocator {
    /// Allocate a zero-filled block of `size` bytes.
    fn alloc(&self, size: usize) -> &mut [u8];

    /// Grow or shrink `old` to `new_size` bytes, preserving the common prefix.
    ///
    /// The default implementation allocates a fresh block and copies.
    fn realloc<'s>(&'s self, old: &[u8], new_size: usize) -> &'s mut [u8] {
        let block = self.alloc(new_size);
        let keep = old.len().min(new_size);
        block[..keep].copy_from_slice(&old[..keep]);
        block
    }

    /// Return a block to the allocator.
    fn dealloc(&self, _block: &[u8]) {}
}

impl Allocator for Bump {
    fn alloc(&self, size: usize) -> &mut [u8] {
        self.alloc_slice_fill_copy(size, 0u8)
    }
}

/// A growable vertex buffer backed by an [`Allocator`].
///
/// Used by the readers and linear referencing operations that do not know the final vertex count
/// up front. Doubling growth keeps appends amortized O(1).
pub(crate) struct VertexBuffer<'a> {
    alloc: &'a dyn Allocator,
    data: &'a mut [u8],
    len: usize,
    width: usize,
}

impl<'a> VertexBuffer<'a> {
    pub(crate) fn new(alloc: &'a dyn Allocator, width: usize) -> Self {
        Self {
            alloc,
            data: Default::default(),
            len: 0,
            width,
        }
    }

    pub(crate) fn with_capacity(alloc: &'a dyn Allocator, width: usize, capacity: usize) -> Self {
        Self {
            alloc,
            data: alloc.alloc(capacity * width),
            len: 0,
            width,
        }
    }

    /// Number of vertices pushed so far.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Append one vertex. Only the first `width / 8` values of `values` are stored.
    pub(crate) fn push(&mut self, values: &[f64; 4]) {
        let needed = (self.len + 1) * self.width;
        if needed > self.data.len() {
            let capacity = (self.data.len() * 2).max(needed).max(8 * self.width);
            let old = std::mem::take(&mut self.data);
            let grown = self.alloc.realloc(old, capacity);
            self.alloc.dealloc(old);
            self.data = grown;
        }
        let offset = self.len * self.width;
        write_vertex(&mut self.data[offset..offset + self.width], values);
        self.len += 1;
    }

    /// Freeze the buffer, returning the filled prefix.
    pub(crate) fn finish(self) -> (&'a [u8], u32) {
        let used = self.len * self.width;
        let data: &'a [u8] = self.data;
        (&data[..used], self.len as u32)
    }
}

/// Encode up to four values as little-endian doubles into `slot`.
pub(crate) fn write_vertex(slot: &mut [u8], values: &[f64; 4]) {
    use byteorder::{ByteOrder, LittleEndian};
    for (chunk, value) in slot.chunks_exact_mut(8).zip(values) {
        LittleEndian::write_f64(chunk, *value);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use byteorder::{ByteOrder, LittleEndian};

    #[test]
    fn bump_alloc_is_zeroed() {
        let bump = Bump::new();
        let block = Allocator::alloc(&bump, 24);
        assert_eq!(block.len(), 24);
        assert!(block.iter().all(|b| *b == 0));
    }

    #[test]
    fn realloc_keeps_prefix() {
        let bump = Bump::new();
        let block = Allocator::alloc(&bump, 4);
        block.copy_from_slice(&[1, 2, 3, 4]);
        let grown = Allocator::realloc(&bump, block, 8);
        assert_eq!(&grown[..4], &[1, 2, 3, 4]);
        assert_eq!(&grown[4..], &[0, 0, 0, 0]);

        let shrunk = Allocator::realloc(&bump, grown, 2);
        assert_eq!(&shrunk[..], &[1u8, 2]);
    }

    #[test]
    fn vertex_buffer_grows() {
        let bump = Bump::new();
        let mut buffer = VertexBuffer::new(&bump, 16);
        for i in 0..100 {
            buffer.push(&[i as f64, -(i as f64), 0.0, 0.0]);
        }
        assert_eq!(buffer.len(), 100);
        let (data, count) = buffer.finish();
        assert_eq!(count, 100);
        assert_eq!(data.len(), 1600);
        assert_eq!(LittleEndian::read_f64(&data[16 * 42..]), 42.0);
        assert_eq!(LittleEndian::read_f64(&data[16 * 42 + 8..]), -42.0);
    }
}
