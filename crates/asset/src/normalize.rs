//! Geometry normalization: flat-normal derivation and bounding-box
//! centering/rescale so every model displays at the same apparent size.

use crate::mesh::MeshData;

/// Longest bounding-box axis of a normalized mesh, in scene units.
pub const REFERENCE_SIZE: f32 = 2.0;

/// Prepare a parsed mesh for display: derive normals when the source had
/// none, then center the bounding box on the origin and uniformly scale
/// the longest axis to [`REFERENCE_SIZE`].
pub fn normalize(mesh: &mut MeshData) {
    if mesh.normals.is_none() {
        mesh.normals = Some(face_normals(&mesh.positions));
    }

    let Some((min, max)) = mesh.bounds() else {
        return;
    };

    let center = [
        (min[0] + max[0]) * 0.5,
        (min[1] + max[1]) * 0.5,
        (min[2] + max[2]) * 0.5,
    ];
    let longest = (max[0] - min[0])
        .max(max[1] - min[1])
        .max(max[2] - min[2]);
    // A degenerate mesh (single point, zero extent) is centered but kept
    // at unit scale to avoid dividing by zero.
    let factor = if longest > 0.0 {
        REFERENCE_SIZE / longest
    } else {
        1.0
    };

    for corner in mesh.positions.chunks_exact_mut(3) {
        for axis in 0..3 {
            corner[axis] = (corner[axis] - center[axis]) * factor;
        }
    }
}

/// Per-triangle face normals (cross of the two edges, un-normalized),
/// copied to all three corners: the flat-shaded approximation used when
/// the source supplies no `vn` data.
pub fn face_normals(positions: &[f32]) -> Vec<f32> {
    let mut normals = Vec::with_capacity(positions.len());
    for tri in positions.chunks_exact(9) {
        let e1 = [tri[3] - tri[0], tri[4] - tri[1], tri[5] - tri[2]];
        let e2 = [tri[6] - tri[0], tri[7] - tri[1], tri[8] - tri[2]];
        let n = [
            e1[1] * e2[2] - e1[2] * e2[1],
            e1[2] * e2[0] - e1[0] * e2[2],
            e1[0] * e2[1] - e1[1] * e2[0],
        ];
        for _ in 0..3 {
            normals.extend_from_slice(&n);
        }
    }
    normals
}
