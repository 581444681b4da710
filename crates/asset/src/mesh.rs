//! CPU-side mesh representation produced by the parser.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    /// The source text yielded zero triangles. Signals the caller to fall
    /// back to a placeholder model instead of failing the whole view.
    #[error("mesh contained no usable geometry")]
    EmptyMesh,
}

/// Triangulated mesh as flat attribute arrays.
///
/// `positions` is always present and holds 9 floats per triangle
/// (3 corners x xyz). `normals` and `uvs` are present only when the source
/// supplied them; a missing `normals` is derived by
/// [`crate::normalize::normalize`] before display.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<f32>,
    pub normals: Option<Vec<f32>>,
    pub uvs: Option<Vec<f32>>,
}

impl MeshData {
    pub fn new(positions: Vec<f32>, normals: Option<Vec<f32>>, uvs: Option<Vec<f32>>) -> Self {
        Self {
            positions,
            normals,
            uvs,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 9
    }

    /// Returns `true` if the arrays describe whole triangles and the
    /// optional attributes line up with the positions.
    pub fn is_valid(&self) -> bool {
        if self.positions.is_empty() || self.positions.len() % 9 != 0 {
            return false;
        }
        if let Some(n) = &self.normals {
            if n.len() != self.positions.len() {
                return false;
            }
        }
        if let Some(uv) = &self.uvs {
            if uv.len() != self.vertex_count() * 2 {
                return false;
            }
        }
        true
    }

    /// Axis-aligned bounds over all positions, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        if self.positions.is_empty() {
            return None;
        }
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for corner in self.positions.chunks_exact(3) {
            for axis in 0..3 {
                min[axis] = min[axis].min(corner[axis]);
                max[axis] = max[axis].max(corner[axis]);
            }
        }
        Some((min, max))
    }
}
