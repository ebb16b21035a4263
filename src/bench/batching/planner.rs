// src/bench/batching/planner.rs
//! Greedy, order-preserving partition of grid instances into capacity-bounded batches.

use bevy::prelude::*;

use crate::bench::core::{
    instance_transform, BatchKind, BatchSet, CombinedBatch, GenerationError, MeshShape,
    INDEX_CAPACITY,
};

/// Pack `positions` into the fewest batches whose vertex sum stays under [`INDEX_CAPACITY`].
///
/// With `combine == false` every position becomes its own [`BatchKind::Single`] batch and
/// the capacity does not apply.
pub fn plan_batches(
    shape: &MeshShape,
    scale: f32,
    positions: impl IntoIterator<Item = Vec3>,
    combine: bool,
) -> Result<BatchSet, GenerationError> {
    if !combine {
        let batches = positions
            .into_iter()
            .map(|p| CombinedBatch {
                name: shape.name.clone(),
                kind: BatchKind::Single,
                shape: shape.clone(),
                instances: vec![instance_transform(p, scale)],
            })
            .collect();
        return Ok(BatchSet { batches });
    }

    if shape.vertex_count > INDEX_CAPACITY {
        return Err(GenerationError::ShapeExceedsCapacity {
            name: shape.name.clone(),
            vertex_count: shape.vertex_count,
            capacity: INDEX_CAPACITY,
        });
    }

    let mut set = BatchSet::default();
    let mut current: Vec<Transform> = Vec::new();
    let mut running = 0usize;

    for p in positions {
        if INDEX_CAPACITY - running < shape.vertex_count {
            let full = std::mem::take(&mut current);
            seal(&mut set, shape, full);
            running = 0;
        }
        current.push(instance_transform(p, scale));
        running += shape.vertex_count;
    }

    // The trailing batch is sealed even when nothing was added since the last seal.
    seal(&mut set, shape, current);
    Ok(set)
}

fn seal(set: &mut BatchSet, shape: &MeshShape, instances: Vec<Transform>) {
    let name = combined_name(&shape.name, set.batches.len());
    set.batches.push(CombinedBatch {
        name,
        kind: BatchKind::Combined,
        shape: shape.clone(),
        instances,
    });
}

/// `Combined_<shape>` for the first batch, `Combined_<shape>_<n>` after that.
pub fn combined_name(shape: &str, index: usize) -> String {
    if index == 0 {
        format!("Combined_{shape}")
    } else {
        format!("Combined_{shape}_{index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::core::GridSpec;

    fn shape(vertex_count: usize) -> MeshShape {
        MeshShape::new("Cube", vertex_count, Handle::default())
    }

    fn grid(x: u32, y: u32, z: u32) -> GridSpec {
        GridSpec::new(UVec3::new(x, y, z), 2.0).unwrap()
    }

    fn line(n: usize) -> impl Iterator<Item = Vec3> {
        (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0))
    }

    #[test]
    fn totals_are_preserved_when_combining() {
        let g = grid(10, 3, 10);
        let s = shape(24);
        let set = plan_batches(&s, 1.0, g.positions(), true).unwrap();
        assert_eq!(set.instance_count(), g.cell_count());
        assert_eq!(set.vertex_count(), g.cell_count() * 24);
    }

    #[test]
    fn no_combined_batch_exceeds_capacity() {
        for v in [1, 24, 515, 4000, 30000, 65535] {
            let set = plan_batches(&shape(v), 1.0, line(57), true).unwrap();
            assert!(set.batches.iter().all(|b| b.vertex_count() <= INDEX_CAPACITY), "v = {v}");
        }
    }

    #[test]
    fn batch_count_is_minimal_for_uniform_shapes() {
        for (v, n) in [(24usize, 10_000usize), (515, 300), (4000, 33), (65535, 4), (1, 70_000)] {
            let set = plan_batches(&shape(v), 1.0, line(n), true).unwrap();
            let per_batch = INDEX_CAPACITY / v;
            assert_eq!(set.batch_count(), n.div_ceil(per_batch), "v = {v}, n = {n}");
        }
    }

    #[test]
    fn forty_thousand_vertex_shape_gets_one_instance_per_batch() {
        // 40000 fits once; a second copy would need 80000 > 65535.
        let set = plan_batches(&shape(40_000), 1.0, line(3), true).unwrap();
        assert_eq!(set.batch_count(), 3);
        assert!(set.batches.iter().all(|b| b.instance_count() == 1));
        assert_eq!(set.vertex_count(), 120_000);
    }

    #[test]
    fn batches_fill_greedily_in_grid_order() {
        // 30000 per shape: two fit (60000), the third spills over.
        let set = plan_batches(&shape(30_000), 1.0, line(5), true).unwrap();
        let sizes: Vec<usize> = set.batches.iter().map(|b| b.instance_count()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        let xs: Vec<f32> = set
            .batches
            .iter()
            .flat_map(|b| b.instances.iter().map(|t| t.translation.x))
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn batch_names_are_unique_and_derived_from_shape() {
        let set = plan_batches(&shape(30_000), 1.0, line(5), true).unwrap();
        let names: Vec<&str> = set.batches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Combined_Cube", "Combined_Cube_1", "Combined_Cube_2"]);
    }

    #[test]
    fn oversized_shape_is_rejected_when_combining() {
        let err = plan_batches(&shape(70_000), 1.0, line(2), true).unwrap_err();
        assert_eq!(
            err,
            GenerationError::ShapeExceedsCapacity {
                name: "Cube".into(),
                vertex_count: 70_000,
                capacity: INDEX_CAPACITY,
            }
        );
    }

    #[test]
    fn oversized_shape_is_allowed_unbatched() {
        let set = plan_batches(&shape(70_000), 1.0, line(2), false).unwrap();
        assert_eq!(set.batch_count(), 2);
        assert!(set.batches.iter().all(|b| b.kind == BatchKind::Single));
    }

    #[test]
    fn unbatched_emits_one_single_per_position() {
        let g = grid(2, 1, 2);
        let set = plan_batches(&shape(24), 1.5, g.positions(), false).unwrap();
        assert_eq!(set.batch_count(), 4);
        assert!(set.batches.iter().all(|b| b.kind == BatchKind::Single));
        let first = &set.batches[0];
        assert_eq!(first.name, "Cube");
        assert_eq!(first.instances[0].translation, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(first.instances[0].scale, Vec3::splat(1.5));
    }

    #[test]
    fn toggling_combine_keeps_total_vertices() {
        let g = grid(20, 2, 20);
        let s = shape(515);
        let loose = plan_batches(&s, 1.0, g.positions(), false).unwrap();
        let packed = plan_batches(&s, 1.0, g.positions(), true).unwrap();
        assert_eq!(loose.vertex_count(), packed.vertex_count());
        assert_eq!(loose.batch_count(), g.cell_count());
        assert!(packed.batch_count() < loose.batch_count());
    }

    #[test]
    fn unbatched_generation_is_repeatable() {
        let g = grid(3, 2, 4);
        let s = shape(24);
        let a = plan_batches(&s, 2.0, g.positions(), false).unwrap();
        let b = plan_batches(&s, 2.0, g.positions(), false).unwrap();
        let ta: Vec<Transform> = a.batches.iter().flat_map(|b| b.instances.clone()).collect();
        let tb: Vec<Transform> = b.batches.iter().flat_map(|b| b.instances.clone()).collect();
        assert_eq!(ta, tb);
    }

    #[test]
    fn empty_position_stream_still_seals_one_batch() {
        let set = plan_batches(&shape(24), 1.0, std::iter::empty(), true).unwrap();
        assert_eq!(set.batch_count(), 1);
        assert_eq!(set.instance_count(), 0);
    }
}
