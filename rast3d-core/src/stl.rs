//! STL file parser for binary and ASCII formats.
//!
//! Produces the indexed [`Mesh`] consumed by the pipeline. STL facets do not
//! share vertices, so each facet contributes three vertices carrying the
//! facet normal plus one face.

use nalgebra::Vector3;
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::error::MeshError;
use crate::mesh::{Mesh, Vertex};

/// Parse a binary STL file.
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, MeshError> {
    if data.len() < 84 {
        return Err(MeshError::Parse(
            "file too small to be a valid STL".to_string(),
        ));
    }

    // Skip 80-byte header
    let data = &data[80..];

    // Read triangle count (4 bytes, little-endian)
    let triangle_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

    let mut mesh = Mesh::with_capacity(triangle_count * 3, triangle_count);
    let mut offset = 4;

    for _ in 0..triangle_count {
        if offset + 50 > data.len() {
            return Err(MeshError::Parse("unexpected end of file".to_string()));
        }

        let normal = Vector3::new(
            read_f32_le(data, offset),
            read_f32_le(data, offset + 4),
            read_f32_le(data, offset + 8),
        );
        offset += 12;

        let base = mesh.vertex_count() as u32;
        for _ in 0..3 {
            let x = read_f32_le(data, offset);
            let y = read_f32_le(data, offset + 4);
            let z = read_f32_le(data, offset + 8);
            mesh.add_vertex(Vertex::new(x, y, z).with_normal(normal));
            offset += 12;
        }

        // Skip attribute byte count (2 bytes)
        offset += 2;

        mesh.add_face([base, base + 1, base + 2]);
    }

    Ok(mesh)
}

fn read_f32_le(data: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Parse an ASCII STL file.
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, MeshError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(MeshError::Parse(format!("invalid ASCII STL: {e:?}"))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = preceded(multispace0, take(0usize))(input)?; // Optional name
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    let mut mesh = Mesh::with_capacity(facets.len() * 3, facets.len());
    for (normal, corners) in facets {
        let base = mesh.vertex_count() as u32;
        for (x, y, z) in corners {
            mesh.add_vertex(Vertex::new(x, y, z).with_normal(normal));
        }
        mesh.add_face([base, base + 1, base + 2]);
    }

    Ok((input, mesh))
}

type RawFacet = (Vector3<f32>, [(f32, f32, f32); 3]);

fn parse_facet(input: &str) -> IResult<&str, RawFacet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, (nx, ny, nz)) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_ascii_vertex(input)?;
    let (input, v2) = parse_ascii_vertex(input)?;
    let (input, v3) = parse_ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, (Vector3::new(nx, ny, nz), [v1, v2, v3])))
}

fn parse_ascii_vertex(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Detect and parse STL data (binary or ASCII).
pub fn parse_stl(data: &[u8]) -> Result<Mesh, MeshError> {
    // Files starting with "solid" are usually ASCII, but some binary
    // exporters use it in their header, so fall through on parse failure.
    if data.len() > 5 && &data[0..5] == b"solid" {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        // Set triangle count to 0
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.face_count(), 0);
    }

    #[test]
    fn test_parse_binary_truncated() {
        let mut data = vec![0u8; 84];
        data[80..84].copy_from_slice(&2u32.to_le_bytes());
        // Two triangles promised, none present.
        assert!(matches!(
            parse_binary_stl(&data),
            Err(MeshError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_binary_single_facet() {
        let mut data = vec![0u8; 84 + 50];
        data[80..84].copy_from_slice(&1u32.to_le_bytes());
        let mut offset = 84;
        for value in [
            0.0f32, 0.0, 1.0, // normal
            0.0, 0.0, 0.0, // v0
            1.0, 0.0, 0.0, // v1
            0.0, 1.0, 0.0, // v2
        ] {
            data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
            offset += 4;
        }

        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
        assert_eq!(
            mesh.vertices[0].normal,
            Some(Vector3::new(0.0, 0.0, 1.0))
        );
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_parse_ascii_solid() {
        let input = "\
solid wedge
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 1 0 0
      vertex 1 1 0
      vertex 0 1 0
    endloop
  endfacet
endsolid wedge
";
        let mesh = parse_ascii_stl(input).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.vertices[1].position.x, 1.0);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_detects_format() {
        let ascii = "solid s\nendsolid s\n";
        let mesh = parse_stl(ascii.as_bytes()).unwrap();
        assert!(mesh.is_empty());
    }
}
