//! Rotation transforms applied to base tiles.
//!
//! A rotation of a tile by one "step" of the tiling moves every edge one
//! direction index forward, so the per-direction type list is shifted
//! cyclically by `index_offset`.

use serde::{Deserialize, Serialize};

/// One rotation of a base tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileTransformation {
    /// Rotation around the up axis, for the renderer.
    pub degrees_rotation: f32,
    /// Cyclic shift applied to the direction-type sequence.
    pub index_offset: usize,
}

impl TileTransformation {
    pub const fn new(degrees_rotation: f32, index_offset: usize) -> Self {
        Self {
            degrees_rotation,
            index_offset,
        }
    }

    /// No rotation at all.
    pub fn identity() -> Vec<Self> {
        vec![Self::new(0.0, 0)]
    }

    /// 0, 90, 180, 270 degrees.
    pub fn square_grid() -> Vec<Self> {
        vec![
            Self::new(0.0, 0),
            Self::new(90.0, 1),
            Self::new(180.0, 2),
            Self::new(270.0, 3),
        ]
    }

    /// 0, 120, 240 degrees.
    pub fn triangle_grid() -> Vec<Self> {
        vec![
            Self::new(0.0, 0),
            Self::new(120.0, 1),
            Self::new(240.0, 2),
        ]
    }

    /// Six 60 degree steps.
    pub fn hexagon_grid() -> Vec<Self> {
        (0..6).map(|i| Self::new(60.0 * i as f32, i)).collect()
    }

    pub fn is_identity(&self) -> bool {
        self.index_offset == 0
    }

    /// Rotate a per-direction sequence: the value at direction `i` moves to
    /// direction `(i + index_offset) % len`.
    pub fn apply<T: Copy>(&self, per_direction: &[T]) -> Vec<T> {
        if self.is_identity() || per_direction.is_empty() {
            return per_direction.to_vec();
        }
        let len = per_direction.len();
        let mut rotated = per_direction.to_vec();
        for (i, &value) in per_direction.iter().enumerate() {
            rotated[(i + self.index_offset) % len] = value;
        }
        rotated
    }
}
