//! Tolerant OBJ-style text parser.
//!
//! Accepts CRLF or LF endings and backslash-newline continuations.
//! Malformed geometry lines and faces with unresolvable indices are
//! skipped; only a parse that yields zero triangles is an error.

use crate::mesh::{MeshData, MeshError};

/// One corner of a face after index resolution.
#[derive(Clone, Copy, Debug)]
struct FaceRef {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

/// Parse OBJ text into flat, fan-triangulated attribute arrays.
pub fn parse_str(text: &str) -> Result<MeshData, MeshError> {
    // Fold CRLF endings and backslash-newline continuations before
    // tokenizing, so a continued statement reads as one line.
    let text = text.replace("\r\n", "\n").replace("\\\n", "");

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();

    let mut out_positions: Vec<f32> = Vec::new();
    let mut out_normals: Vec<f32> = Vec::new();
    let mut out_uvs: Vec<f32> = Vec::new();
    let mut normals_referenced = false;
    let mut uvs_referenced = false;

    let mut skipped_lines = 0usize;
    let mut dropped_faces = 0usize;

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else {
            continue;
        };
        let fields: Vec<&str> = tokens.collect();

        match tag {
            "v" => match parse_float3(&fields) {
                Some(v) => positions.push(v),
                None => skipped_lines += 1,
            },
            "vn" => match parse_float3(&fields) {
                Some(n) => normals.push(n),
                None => skipped_lines += 1,
            },
            "vt" => match parse_float2(&fields) {
                Some(uv) => uvs.push(uv),
                None => skipped_lines += 1,
            },
            "f" => {
                // Indices resolve against the counts accumulated so far,
                // which is what makes negative (backward) refs work.
                match parse_face(&fields, positions.len(), uvs.len(), normals.len()) {
                    Some(refs) => {
                        emit_fan(
                            &refs,
                            &positions,
                            &normals,
                            &uvs,
                            &mut out_positions,
                            &mut out_normals,
                            &mut out_uvs,
                            &mut normals_referenced,
                            &mut uvs_referenced,
                        );
                    }
                    None => dropped_faces += 1,
                }
            }
            "g" | "o" => {
                // Sub-object boundary. Output stays a single mesh, but the
                // marker must not be read as geometry.
                log::debug!("sub-object boundary: {}", fields.join(" "));
            }
            _ => {
                // s/usemtl/mtllib and anything else: ignored.
            }
        }
    }

    if skipped_lines > 0 || dropped_faces > 0 {
        log::warn!(
            "parser skipped {} malformed lines and dropped {} faces",
            skipped_lines,
            dropped_faces
        );
    }

    if out_positions.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    log::debug!(
        "parsed {} triangles (normals: {}, uvs: {})",
        out_positions.len() / 9,
        normals_referenced,
        uvs_referenced
    );

    Ok(MeshData::new(
        out_positions,
        normals_referenced.then_some(out_normals),
        uvs_referenced.then_some(out_uvs),
    ))
}

fn parse_float3(fields: &[&str]) -> Option<[f32; 3]> {
    if fields.len() < 3 {
        return None;
    }
    Some([
        fields[0].parse().ok()?,
        fields[1].parse().ok()?,
        fields[2].parse().ok()?,
    ])
}

fn parse_float2(fields: &[&str]) -> Option<[f32; 2]> {
    // A third (w) component is legal in `vt`; only u/v are kept.
    if fields.len() < 2 {
        return None;
    }
    Some([fields[0].parse().ok()?, fields[1].parse().ok()?])
}

/// Resolve every corner of a face. `None` drops the whole face: fewer than
/// three corners, a malformed ref, or an index outside `[0, count)`.
fn parse_face(
    fields: &[&str],
    position_count: usize,
    uv_count: usize,
    normal_count: usize,
) -> Option<Vec<FaceRef>> {
    if fields.len() < 3 {
        return None;
    }
    let mut refs = Vec::with_capacity(fields.len());
    for token in fields {
        let mut parts = token.split('/');
        let position = resolve_index(parts.next()?, position_count)?;
        let uv = match parts.next() {
            Some(value) if !value.is_empty() => Some(resolve_index(value, uv_count)?),
            _ => None,
        };
        let normal = match parts.next() {
            Some(value) if !value.is_empty() => Some(resolve_index(value, normal_count)?),
            _ => None,
        };
        refs.push(FaceRef {
            position,
            uv,
            normal,
        });
    }
    Some(refs)
}

/// OBJ indices are 1-based; negative values count back from the elements
/// accumulated so far. Returns `None` when the index lands out of range
/// (a literal 0 always does).
fn resolve_index(token: &str, count: usize) -> Option<usize> {
    let raw: i64 = token.parse().ok()?;
    let idx = if raw > 0 {
        raw - 1
    } else {
        count as i64 + raw
    };
    if idx < 0 || idx >= count as i64 {
        return None;
    }
    Some(idx as usize)
}

/// Fan-triangulate from corner 0 and append flat attributes, preserving
/// the source winding.
#[allow(clippy::too_many_arguments)]
fn emit_fan(
    refs: &[FaceRef],
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    uvs: &[[f32; 2]],
    out_positions: &mut Vec<f32>,
    out_normals: &mut Vec<f32>,
    out_uvs: &mut Vec<f32>,
    normals_referenced: &mut bool,
    uvs_referenced: &mut bool,
) {
    for tri in 1..refs.len() - 1 {
        for corner in [refs[0], refs[tri], refs[tri + 1]] {
            out_positions.extend_from_slice(&positions[corner.position]);
            match corner.normal {
                Some(i) => {
                    out_normals.extend_from_slice(&normals[i]);
                    *normals_referenced = true;
                }
                None => out_normals.extend_from_slice(&[0.0, 0.0, 0.0]),
            }
            match corner.uv {
                Some(i) => {
                    out_uvs.extend_from_slice(&uvs[i]);
                    *uvs_referenced = true;
                }
                None => out_uvs.extend_from_slice(&[0.0, 0.0]),
            }
        }
    }
}
