// src/bench/batching/combine.rs

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};

use crate::bench::core::INDEX_CAPACITY;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CombineError {
    #[error("source mesh has no position attribute")]
    MissingPositions,
    #[error("source mesh positions are not Float32x3")]
    UnsupportedPositionFormat,
    #[error("{vertices} combined vertices do not fit 16-bit indices (max {capacity})")]
    ExceedsIndexCapacity { vertices: usize, capacity: usize },
}

/// Bake `instances` copies of `src` into one mesh with 16-bit indices.
/// Positions, normals and UVs are kept; other attributes are dropped.
pub fn combine_instances(src: &Mesh, instances: &[Transform]) -> Result<Mesh, CombineError> {
    let positions: &Vec<[f32; 3]> = match src.attribute(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(v)) => v,
        Some(_) => return Err(CombineError::UnsupportedPositionFormat),
        None => return Err(CombineError::MissingPositions),
    };

    let src_vtx = positions.len();
    let total = src_vtx * instances.len();
    if total > INDEX_CAPACITY {
        return Err(CombineError::ExceedsIndexCapacity { vertices: total, capacity: INDEX_CAPACITY });
    }

    let normals: Option<&Vec<[f32; 3]>> = match src.attribute(Mesh::ATTRIBUTE_NORMAL) {
        Some(VertexAttributeValues::Float32x3(v)) => Some(v),
        _ => None,
    };
    let uvs: Option<&Vec<[f32; 2]>> = match src.attribute(Mesh::ATTRIBUTE_UV_0) {
        Some(VertexAttributeValues::Float32x2(v)) => Some(v),
        _ => None,
    };

    // Non-indexed sources get a trivial 0..n list so every batch is indexed.
    let src_indices: Vec<u16> = match src.indices() {
        Some(Indices::U16(v)) => v.clone(),
        Some(Indices::U32(v)) => v.iter().map(|&i| i as u16).collect(),
        None => (0..src_vtx as u16).collect(),
    };

    let mut out_positions = Vec::with_capacity(total);
    let mut out_normals = normals.map(|_| Vec::with_capacity(total));
    let mut out_uvs = uvs.map(|_| Vec::with_capacity(total));
    let mut out_indices: Vec<u16> = Vec::with_capacity(src_indices.len() * instances.len());

    for (inst_id, t) in instances.iter().enumerate() {
        let trs = t.compute_matrix();

        out_positions.extend(positions.iter().map(|p| trs.transform_point3(Vec3::from(*p)).to_array()));

        if let (Some(src_n), Some(dst_n)) = (normals, out_normals.as_mut()) {
            // Uniform scale: rotating the normal is enough.
            dst_n.extend(src_n.iter().map(|n| (t.rotation * Vec3::from(*n)).normalize_or_zero().to_array()));
        }
        if let (Some(src_uv), Some(dst_uv)) = (uvs, out_uvs.as_mut()) {
            dst_uv.extend_from_slice(src_uv);
        }

        let base = (inst_id * src_vtx) as u16;
        out_indices.extend(src_indices.iter().map(|&i| i + base));
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, Default::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, out_positions);
    if let Some(n) = out_normals { mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, n); }
    if let Some(uv) = out_uvs { mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uv); }
    mesh.insert_indices(Indices::U16(out_indices));
    Ok(mesh)
}
