use log::{debug, trace};
use thiserror::Error;

use crate::alloc::VertexBuffer;
use crate::geometry::{GeomId, GeometryArena, GeometryType};

/// Bytes of input shown before the cursor in error messages.
const CONTEXT_LEN: usize = 32;

/// What the WKT reader expected but did not find.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WktErrorReason {
    #[error("Expected character: '{0}'")]
    ExpectedChar(char),

    #[error("Expected number")]
    ExpectedNumber,

    #[error("Expected geometry type")]
    ExpectedGeometryType,

    #[error("Mixed Z and M values are not supported")]
    MixedZM,
}

/// A WKT syntax error with the byte offset it was detected at.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason} at position '{position}' near: '{context}'|<---")]
pub struct WktError {
    pub reason: WktErrorReason,
    /// Byte offset of the cursor when parsing stopped.
    pub position: usize,
    /// Up to 32 bytes before the cursor and the byte under it, prefixed with `...` when cut.
    pub context: String,
}

/// Geometry type keywords, matched case-insensitively and in this order.
const KEYWORDS: [(&str, GeometryType); 7] = [
    ("POINT", GeometryType::Point),
    ("LINESTRING", GeometryType::LineString),
    ("POLYGON", GeometryType::Polygon),
    ("MULTIPOINT", GeometryType::MultiPoint),
    ("MULTILINESTRING", GeometryType::MultiLineString),
    ("MULTIPOLYGON", GeometryType::MultiPolygon),
    ("GEOMETRYCOLLECTION", GeometryType::GeometryCollection),
];

/// Cursor over WKT text.
///
/// The grammar is `[SRID=<n>;] <TYPE> [Z] [M] (<body> | EMPTY)`. A leading SRID is skipped and
/// anything after the geometry is ignored. Members of a MULTIPOINT may omit their parentheses.
#[derive(Debug, Clone)]
pub struct WktReader<'s> {
    buf: &'s [u8],
    pos: usize,
}

impl<'s> WktReader<'s> {
    pub fn new(text: &'s str) -> Self {
        Self {
            buf: text.as_bytes(),
            pos: 0,
        }
    }

    /// Byte offset where the last parse stopped.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Parse the text into `arena`, returning the root node.
    ///
    /// Collections are parsed without recursion: the cursor descends into a new child on `(`
    /// and climbs back out on `)`.
    pub fn try_parse(&mut self, arena: &mut GeometryArena<'_>) -> Result<GeomId, WktError> {
        trace!("parsing {} bytes of WKT", self.buf.len());
        self.pos = 0;

        let result = self.parse(arena);
        if let Err(err) = &result {
            debug!("rejected WKT input: {err}");
        }
        result
    }

    fn parse(&mut self, arena: &mut GeometryArena<'_>) -> Result<GeomId, WktError> {
        self.skip_ws();

        if self.match_str("SRID") {
            while self.pos < self.buf.len() && self.buf[self.pos] != b';' {
                self.pos += 1;
            }
            self.expect_char(b';')?;
        }

        let root = arena.push(GeometryType::Invalid, false, false);
        let mut geom = root;

        loop {
            let kind = self.geometry_type()?;
            arena.set_type(geom, kind);

            if self.match_char(b'z') {
                arena.set_z(geom, true);
            }
            if self.match_char(b'm') {
                arena.set_m(geom, true);
            }
            if arena.has_z(geom) != arena.has_z(root) || arena.has_m(geom) != arena.has_m(root) {
                return Err(self.error(WktErrorReason::MixedZM));
            }

            if !self.match_str("EMPTY") {
                match kind {
                    GeometryType::Point => {
                        self.expect_char(b'(')?;
                        self.point(arena, geom)?;
                        self.expect_char(b')')?;
                    }
                    GeometryType::LineString => self.line(arena, geom)?,
                    GeometryType::Polygon => self.rings(arena, geom)?,
                    GeometryType::MultiPoint => {
                        self.expect_char(b'(')?;
                        loop {
                            let paren = self.match_char(b'(');
                            let point = self.push_part(arena, geom, GeometryType::Point);
                            if !self.match_str("EMPTY") {
                                self.point(arena, point)?;
                            }
                            if paren {
                                self.expect_char(b')')?;
                            }
                            if !self.match_char(b',') {
                                break;
                            }
                        }
                        self.expect_char(b')')?;
                    }
                    GeometryType::MultiLineString => {
                        self.expect_char(b'(')?;
                        loop {
                            let line = self.push_part(arena, geom, GeometryType::LineString);
                            if !self.match_str("EMPTY") {
                                self.line(arena, line)?;
                            }
                            if !self.match_char(b',') {
                                break;
                            }
                        }
                        self.expect_char(b')')?;
                    }
                    GeometryType::MultiPolygon => {
                        self.expect_char(b'(')?;
                        loop {
                            let polygon = self.push_part(arena, geom, GeometryType::Polygon);
                            if !self.match_str("EMPTY") {
                                self.rings(arena, polygon)?;
                            }
                            if !self.match_char(b',') {
                                break;
                            }
                        }
                        self.expect_char(b')')?;
                    }
                    _ => {
                        self.expect_char(b'(')?;
                        let child = arena.push(GeometryType::Invalid, false, false);
                        arena.append_part(geom, child);
                        geom = child;
                        continue;
                    }
                }
            }

            // Close finished collections until one takes another member.
            loop {
                let Some(parent) = arena.parent(geom) else {
                    return Ok(root);
                };
                if self.match_char(b',') {
                    let sibling = arena.push(GeometryType::Invalid, false, false);
                    arena.append_part(parent, sibling);
                    geom = sibling;
                    break;
                }
                self.expect_char(b')')?;
                geom = parent;
            }
        }
    }

    fn geometry_type(&mut self) -> Result<GeometryType, WktError> {
        for (keyword, kind) in KEYWORDS {
            if self.match_str(keyword) {
                return Ok(kind);
            }
        }
        Err(self.error(WktErrorReason::ExpectedGeometryType))
    }

    /// Allocate a part with the container's dimensions and link it.
    fn push_part(&self, arena: &mut GeometryArena<'_>, geom: GeomId, kind: GeometryType) -> GeomId {
        let part = arena.push(kind, arena.has_z(geom), arena.has_m(geom));
        arena.append_part(geom, part);
        part
    }

    /// A single vertex, without parentheses.
    fn point(&mut self, arena: &mut GeometryArena<'_>, point: GeomId) -> Result<(), WktError> {
        let width = arena.vertex_width(point);
        let mut buffer = VertexBuffer::with_capacity(arena.allocator(), width, 1);
        buffer.push(&self.vertex(width / 8)?);
        let (data, count) = buffer.finish();
        arena.set_vertex_array(point, data, count);
        Ok(())
    }

    /// A parenthesized, comma separated vertex list.
    fn line(&mut self, arena: &mut GeometryArena<'_>, line: GeomId) -> Result<(), WktError> {
        self.expect_char(b'(')?;
        let width = arena.vertex_width(line);
        let mut buffer = VertexBuffer::new(arena.allocator(), width);
        loop {
            buffer.push(&self.vertex(width / 8)?);
            if !self.match_char(b',') {
                break;
            }
        }
        let (data, count) = buffer.finish();
        arena.set_vertex_array(line, data, count);
        self.expect_char(b')')
    }

    /// A parenthesized list of rings, each a vertex list or `EMPTY`.
    fn rings(&mut self, arena: &mut GeometryArena<'_>, polygon: GeomId) -> Result<(), WktError> {
        self.expect_char(b'(')?;
        loop {
            let ring = self.push_part(arena, polygon, GeometryType::LineString);
            if !self.match_str("EMPTY") {
                self.line(arena, ring)?;
            }
            if !self.match_char(b',') {
                break;
            }
        }
        self.expect_char(b')')
    }

    fn vertex(&mut self, dims: usize) -> Result<[f64; 4], WktError> {
        let mut values = [0.0; 4];
        for value in values.iter_mut().take(dims) {
            *value = self
                .match_number()
                .ok_or_else(|| self.error(WktErrorReason::ExpectedNumber))?;
        }
        Ok(values)
    }

    fn skip_ws(&mut self) {
        while self.pos < self.buf.len() && self.buf[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Case-insensitive keyword match, consuming trailing whitespace.
    fn match_str(&mut self, keyword: &str) -> bool {
        let rest = &self.buf[self.pos..];
        if rest.len() < keyword.len() || !rest[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
        {
            return false;
        }
        self.pos += keyword.len();
        self.skip_ws();
        true
    }

    fn match_char(&mut self, c: u8) -> bool {
        if self.pos < self.buf.len() && self.buf[self.pos].eq_ignore_ascii_case(&c) {
            self.pos += 1;
            self.skip_ws();
            return true;
        }
        false
    }

    fn expect_char(&mut self, c: u8) -> Result<(), WktError> {
        if self.match_char(c) {
            Ok(())
        } else {
            Err(self.error(WktErrorReason::ExpectedChar(c as char)))
        }
    }

    /// Scan sign, digits, fraction and exponent within bounds, then convert the scanned slice.
    fn match_number(&mut self) -> Option<f64> {
        let buf = self.buf;
        let digits = |mut ptr: usize| {
            while ptr < buf.len() && buf[ptr].is_ascii_digit() {
                ptr += 1;
            }
            ptr
        };

        let mut ptr = self.pos;
        if ptr < buf.len() && (buf[ptr] == b'+' || buf[ptr] == b'-') {
            ptr += 1;
        }
        ptr = digits(ptr);
        if ptr < buf.len() && buf[ptr] == b'.' {
            ptr = digits(ptr + 1);
        }
        if ptr < buf.len() && (buf[ptr] == b'e' || buf[ptr] == b'E') {
            ptr += 1;
            if ptr < buf.len() && (buf[ptr] == b'+' || buf[ptr] == b'-') {
                ptr += 1;
            }
            ptr = digits(ptr);
        }
        if ptr == self.pos {
            return None;
        }

        let value = lexical_core::parse::<f64>(&buf[self.pos..ptr]).ok()?;
        self.pos = ptr;
        self.skip_ws();
        Some(value)
    }

    fn error(&self, reason: WktErrorReason) -> WktError {
        let begin = self.pos.saturating_sub(CONTEXT_LEN);
        let end = (self.pos + 1).min(self.buf.len());
        let mut context = String::from_utf8_lossy(&self.buf[begin..end]).into_owned();
        if begin > 0 {
            context.insert_str(0, "...");
        }
        WktError {
            reason,
            position: self.pos,
            context,
        }
    }
}
