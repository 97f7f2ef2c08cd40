//! Triangle soup input for navigation mesh construction

use crate::{Aabb, Error, Result};
use glam::Vec3;

#[cfg(feature = "std")]
use std::fs::File;
#[cfg(feature = "std")]
use std::io::{BufRead, BufReader};
#[cfg(feature = "std")]
use std::path::Path;

/// A triangle mesh as delivered by an asset loader
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    /// The vertices of the mesh as a flat array of [x, y, z] coordinates
    pub vertices: Vec<f32>,
    /// The indices of the mesh, 3 per triangle
    pub indices: Vec<i32>,
    /// The number of vertices in the mesh
    pub vert_count: usize,
    /// The number of triangles in the mesh
    pub tri_count: usize,
}

impl TriMesh {
    /// Creates a new empty triangle mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh from a position buffer and an optional index buffer
    ///
    /// Without indices every three consecutive positions form one triangle.
    pub fn from_buffers(vertices: Vec<f32>, indices: Option<Vec<i32>>) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(Error::InvalidMesh(
                "Vertex array length must be a multiple of 3".to_string(),
            ));
        }
        let vert_count = vertices.len() / 3;

        let indices = match indices {
            Some(indices) => indices,
            None => (0..vert_count as i32).collect(),
        };
        if indices.len() % 3 != 0 {
            return Err(Error::InvalidMesh(
                "Index array length must be a multiple of 3".to_string(),
            ));
        }
        if let Some(bad) = indices
            .iter()
            .find(|&&i| i < 0 || i as usize >= vert_count)
        {
            return Err(Error::InvalidMesh(format!(
                "Triangle index out of bounds: {} (vertex count: {})",
                bad, vert_count
            )));
        }

        let tri_count = indices.len() / 3;
        Ok(Self {
            vertices,
            indices,
            vert_count,
            tri_count,
        })
    }

    /// Loads a mesh from an OBJ file
    ///
    /// This method is only available when the `std` feature is enabled.
    #[cfg(feature = "std")]
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut mesh = Self::new();
        for line in reader.lines() {
            mesh.parse_obj_line(&line?)?;
        }
        mesh.validate_indices()?;

        Ok(mesh)
    }

    /// Parses OBJ content from a string
    ///
    /// Only `v` and `f` records are read; faces with more than three corners are
    /// fan-triangulated.
    ///
    /// # Example
    ///
    /// ```
    /// use nav_common::TriMesh;
    ///
    /// let obj_content = r#"
    /// v 0.0 0.0 0.0
    /// v 0.0 0.0 1.0
    /// v 1.0 0.0 1.0
    /// f 1 2 3
    /// "#;
    ///
    /// let mesh = TriMesh::from_obj_str(obj_content).unwrap();
    /// assert_eq!(mesh.vert_count, 3);
    /// assert_eq!(mesh.tri_count, 1);
    /// ```
    pub fn from_obj_str(content: &str) -> Result<Self> {
        let mut mesh = Self::new();
        for line in content.lines() {
            mesh.parse_obj_line(line)?;
        }
        mesh.validate_indices()?;

        Ok(mesh)
    }

    fn parse_obj_line(&mut self, line: &str) -> Result<()> {
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                for axis in ["x", "y", "z"] {
                    let value = tokens
                        .next()
                        .ok_or_else(|| {
                            Error::InvalidMesh(format!("Invalid vertex: missing {axis} coordinate"))
                        })?
                        .parse::<f32>()
                        .map_err(|_| {
                            Error::InvalidMesh(format!(
                                "Invalid vertex: {axis} coordinate is not a number"
                            ))
                        })?;
                    self.vertices.push(value);
                }
                self.vert_count += 1;
            }
            Some("f") => {
                let corners = tokens
                    .map(|token| {
                        // v, v/vt, v//vn and v/vt/vn all start with the position index
                        let index = token.split('/').next().unwrap_or(token);
                        index.parse::<i32>().map(|i| i - 1).map_err(|_| {
                            Error::InvalidMesh(format!(
                                "Invalid face: vertex index '{token}' is not a number"
                            ))
                        })
                    })
                    .collect::<Result<Vec<i32>>>()?;

                if corners.len() < 3 {
                    return Err(Error::InvalidMesh(
                        "Invalid face: less than 3 vertices".to_string(),
                    ));
                }

                for i in 1..corners.len() - 1 {
                    self.indices
                        .extend_from_slice(&[corners[0], corners[i], corners[i + 1]]);
                    self.tri_count += 1;
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn validate_indices(&self) -> Result<()> {
        match self
            .indices
            .iter()
            .find(|&&i| i < 0 || i as usize >= self.vert_count)
        {
            Some(bad) => Err(Error::InvalidMesh(format!(
                "Face references vertex {} but only {} vertices were declared",
                bad + 1,
                self.vert_count
            ))),
            None => Ok(()),
        }
    }

    /// Position of vertex `i`
    pub fn vertex(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.vertices[i * 3],
            self.vertices[i * 3 + 1],
            self.vertices[i * 3 + 2],
        )
    }

    /// Iterates the triangles as corner positions
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.vertex(tri[0] as usize),
                self.vertex(tri[1] as usize),
                self.vertex(tri[2] as usize),
            ]
        })
    }

    /// Calculates the axis-aligned bounding box of the mesh
    pub fn calculate_bounds(&self) -> Aabb {
        if self.vert_count == 0 {
            return Aabb::new(Vec3::ZERO, Vec3::ZERO);
        }

        let mut bounds = Aabb::empty();
        for i in 0..self.vert_count {
            bounds.expand_by_point(&self.vertex(i));
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_obj_str_quad_triangulation() {
        let obj = r#"
v 0.0 0.0 0.0
v 0.0 0.0 1.0
v 1.0 0.0 1.0
v 1.0 0.0 0.0
f 1 2 3 4
"#;
        let mesh = TriMesh::from_obj_str(obj).unwrap();
        assert_eq!(mesh.vert_count, 4);
        assert_eq!(mesh.tri_count, 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);

        let triangles: Vec<[Vec3; 3]> = mesh.triangles().collect();
        assert_eq!(triangles[1][2], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_from_obj_str_with_texture_coords_and_normals() {
        let obj = r#"
# exported by some tool
v 0.0 0.0 0.0
v 0.0 0.0 1.0
v 1.0 0.0 1.0
vt 0.0 0.0
vn 0.0 1.0 0.0
f 1/1/1 2//1 3/1
"#;
        let mesh = TriMesh::from_obj_str(obj).unwrap();
        assert_eq!(mesh.vert_count, 3);
        assert_eq!(mesh.tri_count, 1);
    }

    #[test]
    fn test_from_obj_str_errors() {
        assert!(TriMesh::from_obj_str("v 0.0 0.0").is_err());
        assert!(TriMesh::from_obj_str("v 0 0 0\nv 1 0 0\nf 1 2").is_err());
        assert!(TriMesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 1 0 1\nf 1 2 9").is_err());
    }

    #[test]
    fn test_from_buffers_without_indices() {
        let mesh = TriMesh::from_buffers(
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0],
            None,
        )
        .unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.tri_count, 1);

        let bounds = mesh.calculate_bounds();
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_from_buffers_rejects_bad_input() {
        assert!(TriMesh::from_buffers(vec![0.0, 1.0], None).is_err());
        assert!(TriMesh::from_buffers(vec![0.0; 9], Some(vec![0, 1, 3])).is_err());
        assert!(TriMesh::from_buffers(vec![0.0; 9], Some(vec![0, 1])).is_err());
    }
}
