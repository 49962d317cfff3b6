use std::io::Cursor;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace};

use crate::geometry::{ExtentXY, GeomId, GeometryArena, GeometryType, VertexXY};
use crate::io::wkb::common::{
    read_f64_at, read_header, read_u32, take_bytes, vertex_bytes, Endianness, WkbHeader,
};
use crate::io::wkb::WkbError;

/// Deepest nesting of multi geometries and collections the reader accepts.
pub const MAX_STACK_DEPTH: usize = 32;

/// Options controlling how [`WkbReader`] materializes geometries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WkbReaderOptions {
    /// Always copy vertex data into the arena's allocator, even when the input could be
    /// referenced in place.
    pub copy_vertices: bool,
    /// Accept trees whose nodes disagree on Z/M presence.
    pub allow_mixed_zm: bool,
    /// Treat a point whose ordinates are all NaN as an empty point.
    pub nan_as_empty: bool,
}

/// Summary of a WKB geometry computed without building a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WkbStats {
    pub vertex_count: u32,
    pub extent: ExtentXY,
}

/// Reusable WKB parser.
///
/// Little-endian vertex data is referenced directly from the input buffer unless
/// [`set_copy_vertices`](Self::set_copy_vertices) is enabled, so parsed geometries borrow from
/// the input for as long as the arena lives.
#[derive(Debug, Default)]
pub struct WkbReader {
    options: WkbReaderOptions,
    parsed_mixed_zm: bool,
    parsed_any_z: bool,
    parsed_any_m: bool,
}

impl WkbReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WkbReaderOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> WkbReaderOptions {
        self.options
    }

    pub fn set_copy_vertices(&mut self, value: bool) -> &mut Self {
        self.options.copy_vertices = value;
        self
    }

    pub fn set_allow_mixed_zm(&mut self, value: bool) -> &mut Self {
        self.options.allow_mixed_zm = value;
        self
    }

    pub fn set_nan_as_empty(&mut self, value: bool) -> &mut Self {
        self.options.nan_as_empty = value;
        self
    }

    /// Whether the last successful parse contained nodes disagreeing with the root on Z/M.
    pub fn parsed_mixed_zm(&self) -> bool {
        self.parsed_mixed_zm
    }

    /// Whether any node of the last successful parse had Z values.
    pub fn parsed_any_z(&self) -> bool {
        self.parsed_any_z
    }

    /// Whether any node of the last successful parse had M values.
    pub fn parsed_any_m(&self) -> bool {
        self.parsed_any_m
    }

    /// Parse one geometry from `buf` into `arena`, returning the root node.
    ///
    /// Nested containers are walked with an explicit stack bounded by [`MAX_STACK_DEPTH`].
    /// On error, nodes already pushed into the arena stay there but are not linked to anything
    /// the caller holds.
    pub fn try_parse<'a>(
        &mut self,
        arena: &mut GeometryArena<'a>,
        buf: &'a [u8],
    ) -> Result<GeomId, WkbError> {
        trace!("parsing {} bytes of WKB", buf.len());

        self.parsed_mixed_zm = false;
        self.parsed_any_z = false;
        self.parsed_any_m = false;

        let result = self.parse_tree(arena, buf);
        if let Err(err) = &result {
            debug!("rejected WKB input: {err}");
        } else if self.parsed_mixed_zm {
            debug!("accepted WKB input with mixed Z/M values");
        }
        result
    }

    fn parse_tree<'a>(
        &mut self,
        arena: &mut GeometryArena<'a>,
        buf: &'a [u8],
    ) -> Result<GeomId, WkbError> {
        let mut reader = Cursor::new(buf);
        let root = arena.push(GeometryType::Invalid, false, false);
        let mut geom = root;

        // Open containers with the number of children still to read.
        let mut stack: Vec<(GeomId, u32)> = Vec::new();

        loop {
            let header = read_header(&mut reader)?;
            arena.set_z(geom, header.has_z);
            arena.set_m(geom, header.has_m);

            // The root's flags were just set from this same header.
            if header.has_z != arena.has_z(root) || header.has_m != arena.has_m(root) {
                if !self.options.allow_mixed_zm {
                    return Err(WkbError::MixedZM);
                }
                self.parsed_mixed_zm = true;
            }
            self.parsed_any_z |= header.has_z;
            self.parsed_any_m |= header.has_m;

            let kind = header.geometry_type()?;
            arena.set_type(geom, kind);

            let descend = match kind {
                GeometryType::Point => {
                    self.read_point(arena, &mut reader, geom, &header)?;
                    false
                }
                GeometryType::LineString => {
                    self.read_vertices(arena, &mut reader, geom, &header)?;
                    false
                }
                GeometryType::Polygon => {
                    let rings = read_u32(&mut reader, header.order)?;
                    for _ in 0..rings {
                        let ring = arena.push(GeometryType::LineString, header.has_z, header.has_m);
                        self.read_vertices(arena, &mut reader, ring, &header)?;
                        arena.append_part(geom, ring);
                    }
                    false
                }
                _ => {
                    if stack.len() >= MAX_STACK_DEPTH {
                        return Err(WkbError::recursion_limit());
                    }
                    let count = read_u32(&mut reader, header.order)?;
                    if count > 0 {
                        stack.push((geom, count));
                        let child = arena.push(GeometryType::Invalid, false, false);
                        arena.append_part(geom, child);
                        geom = child;
                        true
                    } else {
                        false
                    }
                }
            };

            if descend {
                continue;
            }

            // Climb until a container still expects children.
            loop {
                let Some((parent, remaining)) = stack.last_mut() else {
                    return Ok(root);
                };
                let parent = *parent;

                let parent_kind = arena.geometry_type(parent);
                let child_kind = arena.geometry_type(geom);
                let valid = match parent_kind {
                    GeometryType::MultiPoint => child_kind == GeometryType::Point,
                    GeometryType::MultiLineString => child_kind == GeometryType::LineString,
                    GeometryType::MultiPolygon => child_kind == GeometryType::Polygon,
                    _ => true,
                };
                if !valid {
                    return Err(WkbError::InvalidChildType {
                        parent: parent_kind,
                        child: child_kind,
                    });
                }

                *remaining -= 1;
                if *remaining > 0 {
                    let sibling = arena.push(GeometryType::Invalid, false, false);
                    arena.append_part(parent, sibling);
                    geom = sibling;
                    break;
                }

                stack.pop();
                geom = parent;
            }
        }
    }

    fn read_point<'a>(
        &self,
        arena: &mut GeometryArena<'a>,
        reader: &mut Cursor<&'a [u8]>,
        geom: GeomId,
        header: &WkbHeader,
    ) -> Result<(), WkbError> {
        let dims = header.dims();
        let bytes = take_bytes(reader, dims * 8)?;

        if self.options.nan_as_empty && (0..dims).all(|i| read_f64_at(bytes, i, header.order).is_nan())
        {
            return Ok(());
        }

        let data = self.vertex_data(arena, bytes, header.order);
        arena.set_vertex_array(geom, data, 1);
        Ok(())
    }

    fn read_vertices<'a>(
        &self,
        arena: &mut GeometryArena<'a>,
        reader: &mut Cursor<&'a [u8]>,
        geom: GeomId,
        header: &WkbHeader,
    ) -> Result<(), WkbError> {
        let count = read_u32(reader, header.order)?;
        let bytes = take_bytes(reader, vertex_bytes(count, header.dims())?)?;
        if count > 0 {
            let data = self.vertex_data(arena, bytes, header.order);
            arena.set_vertex_array(geom, data, count);
        }
        Ok(())
    }

    /// Reference little-endian input in place, otherwise copy it into the arena as little-endian.
    fn vertex_data<'a>(
        &self,
        arena: &GeometryArena<'a>,
        bytes: &'a [u8],
        order: Endianness,
    ) -> &'a [u8] {
        if order == Endianness::LittleEndian && !self.options.copy_vertices {
            return bytes;
        }

        let data = arena.allocator().alloc(bytes.len());
        for (i, chunk) in data.chunks_exact_mut(8).enumerate() {
            LittleEndian::write_f64(chunk, read_f64_at(bytes, i, order));
        }
        data
    }

    /// Count vertices and accumulate the XY extent of `buf` without building a tree.
    ///
    /// The result matches what [`VertexCount`] and [`TotalExtent`] report for the tree that
    /// [`try_parse`](Self::try_parse) would build from the same input. Z/M consistency and
    /// child types are not checked.
    ///
    /// [`VertexCount`]: crate::algorithm::VertexCount
    /// [`TotalExtent`]: crate::algorithm::TotalExtent
    pub fn try_parse_stats(&self, buf: &[u8]) -> Result<WkbStats, WkbError> {
        trace!("scanning {} bytes of WKB for statistics", buf.len());

        let mut reader = Cursor::new(buf);
        let mut stats = WkbStats {
            vertex_count: 0,
            extent: ExtentXY::smallest(),
        };
        let mut remaining: Vec<u32> = Vec::new();

        loop {
            let header = read_header(&mut reader)?;
            let dims = header.dims();

            match header.geometry_type()? {
                GeometryType::Point => {
                    let bytes = take_bytes(&mut reader, dims * 8)?;
                    let empty = self.options.nan_as_empty
                        && (0..dims).all(|i| read_f64_at(bytes, i, header.order).is_nan());
                    if !empty {
                        accumulate(&mut stats, bytes, 1, dims, header.order);
                    }
                }
                GeometryType::LineString => {
                    scan_vertices(&mut reader, &mut stats, &header)?;
                }
                GeometryType::Polygon => {
                    let rings = read_u32(&mut reader, header.order)?;
                    for _ in 0..rings {
                        scan_vertices(&mut reader, &mut stats, &header)?;
                    }
                }
                _ => {
                    if remaining.len() >= MAX_STACK_DEPTH {
                        return Err(WkbError::recursion_limit());
                    }
                    let count = read_u32(&mut reader, header.order)?;
                    if count > 0 {
                        remaining.push(count);
                        continue;
                    }
                }
            }

            // A geometry finished; pop containers that have no children left.
            loop {
                let Some(count) = remaining.last_mut() else {
                    return Ok(stats);
                };
                *count -= 1;
                if *count > 0 {
                    break;
                }
                remaining.pop();
            }
        }
    }
}

fn scan_vertices(
    reader: &mut Cursor<&[u8]>,
    stats: &mut WkbStats,
    header: &WkbHeader,
) -> Result<(), WkbError> {
    let count = read_u32(reader, header.order)?;
    let dims = header.dims();
    let bytes = take_bytes(reader, vertex_bytes(count, dims)?)?;
    accumulate(stats, bytes, count, dims, header.order);
    Ok(())
}

fn accumulate(stats: &mut WkbStats, bytes: &[u8], count: u32, dims: usize, order: Endianness) {
    for i in 0..count as usize {
        let x = read_f64_at(bytes, i * dims, order);
        let y = read_f64_at(bytes, i * dims + 1, order);
        stats.extent.update(&VertexXY::new(x, y));
    }
    stats.vertex_count += count;
}
