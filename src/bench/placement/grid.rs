// src/bench/placement/grid.rs
//! Centered grid positions (deterministic, no randomness).

use bevy::prelude::*;

use crate::bench::core::GridSpec;

/// Lazy walk over every cell of a [`GridSpec`]: X outer, Y middle, Z inner.
#[derive(Clone, Debug)]
pub struct GridPositions {
    spec: GridSpec,
    /// Half the X extent; subtracted so the grid straddles X = 0.
    offset_x: f32,
    next: usize,
    total: usize,
}

impl GridPositions {
    pub fn new(spec: GridSpec) -> Self {
        let offset_x = spec.count_x.saturating_sub(1) as f32 * spec.spacing * 0.5;
        Self { spec, offset_x, next: 0, total: spec.cell_count() }
    }

    #[inline]
    fn position_at(&self, index: usize) -> Vec3 {
        let per_x = self.spec.count_y as usize * self.spec.count_z as usize;
        let x = index / per_x;
        let y = (index % per_x) / self.spec.count_z as usize;
        let z = index % self.spec.count_z as usize;

        Vec3::new(
            x as f32 * self.spec.spacing - self.offset_x,
            y as f32 * self.spec.spacing,
            z as f32 * self.spec.spacing,
        )
    }
}

impl Iterator for GridPositions {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        if self.next >= self.total {
            return None;
        }
        let p = self.position_at(self.next);
        self.next += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for GridPositions {}

impl GridSpec {
    /// Fresh position sequence; every call restarts at the first cell.
    pub fn positions(&self) -> GridPositions {
        GridPositions::new(*self)
    }
}

impl IntoIterator for &GridSpec {
    type Item = Vec3;
    type IntoIter = GridPositions;

    fn into_iter(self) -> GridPositions {
        self.positions()
    }
}
