use std::fmt::{self, Write};

use crate::geometry::{GeometryRef, GeometryType, Parts, VertexArray};

/// Write `geom` as WKT.
///
/// Output is canonical: `TYPE[ Z| M| ZM] (...)` or `TYPE[ Z| M| ZM] EMPTY`, no space after
/// commas, MULTIPOINT members without parentheses, and ordinates in their shortest form that
/// parses back to the same double.
pub fn write_wkt<W: Write>(writer: &mut W, geom: GeometryRef) -> fmt::Result {
    // Open collections, and whether their next member is the first.
    let mut stack: Vec<(Parts, bool)> = Vec::new();
    let mut current = Some(geom);

    loop {
        if let Some(geom) = current.take() {
            write_tag(writer, geom)?;
            if geom.is_empty() {
                writer.write_str(" EMPTY")?;
            } else {
                writer.write_str(" (")?;
                match geom.geometry_type() {
                    GeometryType::GeometryCollection | GeometryType::Invalid => {
                        stack.push((geom.parts(), true));
                    }
                    _ => {
                        write_body(writer, geom)?;
                        writer.write_char(')')?;
                    }
                }
            }
        }

        let Some((parts, first)) = stack.last_mut() else {
            return Ok(());
        };
        match parts.next() {
            Some(part) => {
                if !*first {
                    writer.write_char(',')?;
                }
                *first = false;
                current = Some(part);
            }
            None => {
                writer.write_char(')')?;
                stack.pop();
            }
        }
    }
}

/// Render `geom` as a WKT string.
pub fn to_wkt(geom: GeometryRef) -> String {
    geom.to_string()
}

impl fmt::Display for GeometryRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_wkt(f, *self)
    }
}

fn write_tag<W: Write>(writer: &mut W, geom: GeometryRef) -> fmt::Result {
    writer.write_str(geom.geometry_type().name())?;
    match (geom.has_z(), geom.has_m()) {
        (true, true) => writer.write_str(" ZM"),
        (true, false) => writer.write_str(" Z"),
        (false, true) => writer.write_str(" M"),
        (false, false) => Ok(()),
    }
}

/// Everything between the outer parentheses of a non-empty, non-collection geometry.
fn write_body<W: Write>(writer: &mut W, geom: GeometryRef) -> fmt::Result {
    match geom.geometry_type() {
        GeometryType::Polygon => write_rings(writer, geom),
        GeometryType::MultiPoint => {
            for (i, point) in geom.parts().enumerate() {
                if i > 0 {
                    writer.write_char(',')?;
                }
                if point.is_empty() {
                    writer.write_str("EMPTY")?;
                } else {
                    write_vertices(writer, point.vertices())?;
                }
            }
            Ok(())
        }
        GeometryType::MultiLineString => {
            for (i, line) in geom.parts().enumerate() {
                if i > 0 {
                    writer.write_char(',')?;
                }
                write_line_text(writer, line)?;
            }
            Ok(())
        }
        GeometryType::MultiPolygon => {
            for (i, polygon) in geom.parts().enumerate() {
                if i > 0 {
                    writer.write_char(',')?;
                }
                if polygon.is_empty() {
                    writer.write_str("EMPTY")?;
                } else {
                    writer.write_char('(')?;
                    write_rings(writer, polygon)?;
                    writer.write_char(')')?;
                }
            }
            Ok(())
        }
        _ => write_vertices(writer, geom.vertices()),
    }
}

fn write_rings<W: Write>(writer: &mut W, polygon: GeometryRef) -> fmt::Result {
    for (i, ring) in polygon.parts().enumerate() {
        if i > 0 {
            writer.write_char(',')?;
        }
        write_line_text(writer, ring)?;
    }
    Ok(())
}

fn write_line_text<W: Write>(writer: &mut W, line: GeometryRef) -> fmt::Result {
    if line.is_empty() {
        return writer.write_str("EMPTY");
    }
    writer.write_char('(')?;
    write_vertices(writer, line.vertices())?;
    writer.write_char(')')
}

fn write_vertices<W: Write>(writer: &mut W, vertices: VertexArray) -> fmt::Result {
    let dims = vertices.width() / 8;
    for i in 0..vertices.len() {
        if i > 0 {
            writer.write_char(',')?;
        }
        for k in 0..dims {
            if k > 0 {
                writer.write_char(' ')?;
            }
            write!(writer, "{}", vertices.ordinate(i, k))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::GeometryArena;
    use crate::io::wkt::from_wkt;
    use bumpalo::Bump;

    fn roundtrip(wkt: &str) -> String {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let geom = from_wkt(&mut arena, wkt).unwrap();
        to_wkt(arena.get(geom))
    }

    #[test]
    fn canonical_form() {
        assert_eq!(roundtrip("point(1 2)"), "POINT (1 2)");
        assert_eq!(roundtrip("POINT Z EMPTY"), "POINT Z EMPTY");
        assert_eq!(roundtrip("LINESTRING(0.5 -1, 1e3 2.25)"), "LINESTRING (0.5 -1,1000 2.25)");
        assert_eq!(
            roundtrip("POLYGON ((0 1, 0 3, 2 3, 2 1, 0 1), EMPTY)"),
            "POLYGON ((0 1,0 3,2 3,2 1,0 1),EMPTY)"
        );
        assert_eq!(
            roundtrip("MULTIPOINT ZM ((1 2 3 4), EMPTY)"),
            "MULTIPOINT ZM (1 2 3 4,EMPTY)"
        );
        assert_eq!(
            roundtrip("MULTIPOLYGON (((0 0, 0 1, 1 1, 0 0)), EMPTY)"),
            "MULTIPOLYGON (((0 0,0 1,1 1,0 0)),EMPTY)"
        );
        assert_eq!(
            roundtrip("MULTILINESTRING M ((0 0 1, 1 1 2), EMPTY)"),
            "MULTILINESTRING M ((0 0 1,1 1 2),EMPTY)"
        );
    }

    #[test]
    fn collections() {
        let wkt = "GEOMETRYCOLLECTION (POINT (1 2),GEOMETRYCOLLECTION (GEOMETRYCOLLECTION EMPTY,\
                   LINESTRING (0 0,1 1)),MULTIPOINT (3 4))";
        assert_eq!(roundtrip(wkt), wkt);
        assert_eq!(roundtrip("GEOMETRYCOLLECTION M EMPTY"), "GEOMETRYCOLLECTION M EMPTY");
    }

    #[test]
    fn shortest_float_text_reparses_exactly() {
        let wkt = roundtrip("POINT (0.1 0.30000000000000004)");
        assert_eq!(wkt, "POINT (0.1 0.30000000000000004)");
        assert_eq!(roundtrip(&wkt), wkt);
    }

    #[test]
    fn display() {
        let bump = Bump::new();
        let mut arena = GeometryArena::new(&bump);
        let geom = from_wkt(&mut arena, "LINESTRING EMPTY").unwrap();
        assert_eq!(format!("{}", arena.get(geom)), "LINESTRING EMPTY");
    }
}
