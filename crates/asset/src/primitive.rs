//! Fallback primitive shown when a model cannot be loaded.

use crate::mesh::MeshData;
use crate::normalize::REFERENCE_SIZE;

/// Axis-aligned cube with edge [`REFERENCE_SIZE`], centered at the origin,
/// with per-face normals. Installed whenever a load fails so the viewport
/// is never empty.
pub fn fallback_cube() -> MeshData {
    const H: f32 = REFERENCE_SIZE / 2.0;

    // (face normal, quad corners CCW as seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, 1.0],
            [[-H, -H, H], [H, -H, H], [H, H, H], [-H, H, H]],
        ),
        (
            [0.0, 0.0, -1.0],
            [[-H, -H, -H], [-H, H, -H], [H, H, -H], [H, -H, -H]],
        ),
        (
            [0.0, 1.0, 0.0],
            [[-H, H, -H], [-H, H, H], [H, H, H], [H, H, -H]],
        ),
        (
            [0.0, -1.0, 0.0],
            [[-H, -H, -H], [H, -H, -H], [H, -H, H], [-H, -H, H]],
        ),
        (
            [1.0, 0.0, 0.0],
            [[H, -H, -H], [H, H, -H], [H, H, H], [H, -H, H]],
        ),
        (
            [-1.0, 0.0, 0.0],
            [[-H, -H, -H], [-H, -H, H], [-H, H, H], [-H, H, -H]],
        ),
    ];

    let mut positions = Vec::with_capacity(36 * 3);
    let mut normals = Vec::with_capacity(36 * 3);
    for (normal, quad) in &faces {
        for corner in [0, 1, 2, 0, 2, 3] {
            positions.extend_from_slice(&quad[corner]);
            normals.extend_from_slice(normal);
        }
    }

    MeshData::new(positions, Some(normals), None)
}
