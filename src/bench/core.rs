// src/bench/core.rs
//! Core types for grid generation and bounded mesh batching.
//! Keep this file dependency-light; the planner and grid code build on it without touching the ECS.

use bevy::prelude::*; // Vec3, Transform, Handle, Mesh

/// Largest vertex count a 16-bit index buffer can address.
pub const INDEX_CAPACITY: usize = u16::MAX as usize;

// ---------- Grid ----------

/// 3D count/spacing description of a generation request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub count_x: u32,
    pub count_y: u32,
    pub count_z: u32,
    /// Distance between neighbouring cells (world units).
    pub spacing: f32,
}

impl GridSpec {
    /// Validated constructor: every count must be >= 1 and spacing finite and positive.
    pub fn new(count: UVec3, spacing: f32) -> Result<Self, GenerationError> {
        if count.min_element() == 0 {
            return Err(GenerationError::InvalidGrid {
                reason: format!("counts must be at least 1, got {count}"),
            });
        }
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(GenerationError::InvalidGrid {
                reason: format!("spacing must be positive, got {spacing}"),
            });
        }
        Ok(Self { count_x: count.x, count_y: count.y, count_z: count.z, spacing })
    }

    /// Total number of cells (instances) in the grid.
    pub fn cell_count(&self) -> usize {
        self.count_x as usize * self.count_y as usize * self.count_z as usize
    }
}

// ---------- Shapes & batches ----------

/// A base mesh plus the facts the batcher needs about it.
#[derive(Clone, Debug)]
pub struct MeshShape {
    /// Display name; batch names derive from it.
    pub name: String,
    pub vertex_count: usize,
    pub mesh: Handle<Mesh>,
}

impl MeshShape {
    pub fn new(name: impl Into<String>, vertex_count: usize, mesh: Handle<Mesh>) -> Self {
        Self { name: name.into(), vertex_count, mesh }
    }

    /// Shape metadata read from a loaded mesh asset.
    pub fn from_mesh(name: impl Into<String>, handle: Handle<Mesh>, mesh: &Mesh) -> Self {
        Self::new(name, mesh.count_vertices(), handle)
    }
}

/// How a batch is realized as a render object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchKind {
    /// Many instances merged into one mesh; bounded by [`INDEX_CAPACITY`].
    Combined,
    /// A single instance drawing the shape directly.
    Single,
}

/// One render object's worth of instances.
#[derive(Clone, Debug)]
pub struct CombinedBatch {
    pub name: String,
    pub kind: BatchKind,
    pub shape: MeshShape,
    /// Instance transforms in grid order.
    pub instances: Vec<Transform>,
}

impl CombinedBatch {
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.instances.len() * self.shape.vertex_count
    }
}

/// Every batch produced by one generation request.
#[derive(Clone, Debug, Default)]
pub struct BatchSet {
    pub batches: Vec<CombinedBatch>,
}

impl BatchSet {
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(CombinedBatch::instance_count).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(CombinedBatch::vertex_count).sum()
    }
}

/// Instance transform for one grid cell: translate then uniform scale, no rotation.
#[inline]
pub fn instance_transform(position: Vec3, scale: f32) -> Transform {
    Transform {
        translation: position,
        rotation: Quat::IDENTITY,
        scale: Vec3::splat(scale),
    }
}

// ---------- Errors ----------

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Invalid grid: {reason}")]
    InvalidGrid { reason: String },
    #[error("Shape '{name}' has {vertex_count} vertices; a combined batch holds at most {capacity}")]
    ShapeExceedsCapacity { name: String, vertex_count: usize, capacity: usize },
}
