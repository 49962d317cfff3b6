use std::io::{Error, ErrorKind, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::geometry::{GeometryRef, GeometryType, Parts};
use crate::io::wkb::common::{iso_type_code, Endianness};

/// The byte length of `geom` encoded as ISO WKB.
pub fn geometry_wkb_size(geom: GeometryRef) -> usize {
    let header = 1 + 4;
    let mut size = 0;
    let mut stack: Vec<GeometryRef> = vec![geom];

    while let Some(geom) = stack.pop() {
        size += header;
        match geom.geometry_type() {
            GeometryType::Point => size += geom.vertex_width(),
            GeometryType::LineString => size += 4 + geom.vertices().as_bytes().len(),
            GeometryType::Polygon => {
                size += 4;
                for ring in geom.parts() {
                    size += 4 + ring.vertices().as_bytes().len();
                }
            }
            _ => {
                size += 4;
                stack.extend(geom.parts());
            }
        }
    }

    size
}

/// Write a geometry to a Writer encoded as little-endian ISO WKB.
///
/// Dimensions are encoded in the type code (`+1000` for Z, `+2000` for M). An empty point is
/// written with NaN ordinates. Nested collections are written without recursion.
pub fn write_geometry_as_wkb<W: Write>(mut writer: W, geom: GeometryRef) -> std::io::Result<()> {
    let mut stack: Vec<Parts> = Vec::new();
    let mut current = Some(geom);

    loop {
        if let Some(geom) = current.take() {
            let kind = geom.geometry_type();
            if kind == GeometryType::Invalid {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    "cannot encode an untyped geometry as WKB",
                ));
            }

            writer.write_u8(Endianness::LittleEndian.into())?;
            writer.write_u32::<LittleEndian>(iso_type_code(kind, geom.has_z(), geom.has_m()))?;

            match kind {
                GeometryType::Point => {
                    if geom.is_empty() {
                        for _ in 0..geom.vertex_width() / 8 {
                            writer.write_f64::<LittleEndian>(f64::NAN)?;
                        }
                    } else {
                        writer.write_all(geom.vertices().as_bytes())?;
                    }
                }
                GeometryType::LineString => write_vertices(&mut writer, geom)?,
                GeometryType::Polygon => {
                    writer.write_u32::<LittleEndian>(geom.part_count())?;
                    for ring in geom.parts() {
                        write_vertices(&mut writer, ring)?;
                    }
                }
                _ => {
                    writer.write_u32::<LittleEndian>(geom.part_count())?;
                    stack.push(geom.parts());
                }
            }
        }

        match stack.last_mut() {
            Some(parts) => match parts.next() {
                Some(part) => current = Some(part),
                None => {
                    stack.pop();
                }
            },
            None => return Ok(()),
        }
    }
}

fn write_vertices<W: Write>(writer: &mut W, geom: GeometryRef) -> std::io::Result<()> {
    let vertices = geom.vertices();
    writer.write_u32::<LittleEndian>(vertices.len() as u32)?;
    writer.write_all(vertices.as_bytes())
}
