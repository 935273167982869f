//! Grid coordinates for the wave graph.
//!
//! Coordinates are integer-valued and hashable, so they can key the graph's
//! node index directly. World positions are only ever produced from them
//! (`to_physical`) or quantized back into them (`from_physical`); a raw float
//! never reaches a hash map.
//!
//! Two topologies are supported:
//! - `Square`: `(x, y)`, four neighbors (N, E, S, W)
//! - `Hexagon`: cube/axial `(q, r, s)` with `q + r + s == 0`, six neighbors,
//!   flat-top layout in world space

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

const SQRT_3: f32 = 1.732_050_8;

/// Tiling family a coordinate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topology {
    Square,
    Hexagon,
}

impl Topology {
    /// Neighbor offsets in direction order. Opposite directions sit
    /// `len / 2` apart.
    pub fn neighbor_offsets(self) -> Vec<CellCoordinates> {
        match self {
            Topology::Square => vec![
                CellCoordinates::square(0, 1),
                CellCoordinates::square(1, 0),
                CellCoordinates::square(0, -1),
                CellCoordinates::square(-1, 0),
            ],
            Topology::Hexagon => vec![
                CellCoordinates::hexagon(1, 0),
                CellCoordinates::hexagon(1, -1),
                CellCoordinates::hexagon(0, -1),
                CellCoordinates::hexagon(-1, 0),
                CellCoordinates::hexagon(-1, 1),
                CellCoordinates::hexagon(0, 1),
            ],
        }
    }

    /// Coordinates of the origin cell.
    pub fn origin(self) -> CellCoordinates {
        match self {
            Topology::Square => CellCoordinates::square(0, 0),
            Topology::Hexagon => CellCoordinates::hexagon(0, 0),
        }
    }
}

/// Error raised for coordinates or offsets that cannot form one grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    /// Coordinates of different topologies combined
    TopologyMismatch { expected: Topology, found: Topology },
    /// Neighbor offset count differs from the tileset's direction count
    OffsetCountMismatch { offsets: usize, directions: usize },
    /// The offset of `opposite(direction)` is not the negated offset
    OppositeMismatch { direction: usize },
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateError::TopologyMismatch { expected, found } => write!(
                f,
                "cannot combine {:?} coordinates with {:?} coordinates",
                expected, found
            ),
            CoordinateError::OffsetCountMismatch {
                offsets,
                directions,
            } => write!(
                f,
                "{} neighbor offsets given for {} directions",
                offsets, directions
            ),
            CoordinateError::OppositeMismatch { direction } => write!(
                f,
                "offset of the opposite of direction {} is not its inverse",
                direction
            ),
        }
    }
}

impl std::error::Error for CoordinateError {}

/// Position of one cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellCoordinates {
    Square { x: i32, y: i32 },
    Hexagon { q: i32, r: i32, s: i32 },
}

impl CellCoordinates {
    pub fn square(x: i32, y: i32) -> Self {
        CellCoordinates::Square { x, y }
    }

    /// Axial constructor; `s` is derived so the cube constraint holds.
    pub fn hexagon(q: i32, r: i32) -> Self {
        CellCoordinates::Hexagon { q, r, s: -q - r }
    }

    pub fn topology(&self) -> Topology {
        match self {
            CellCoordinates::Square { .. } => Topology::Square,
            CellCoordinates::Hexagon { .. } => Topology::Hexagon,
        }
    }

    /// Component-wise sum. Both operands must share a topology.
    pub fn checked_add(self, offset: CellCoordinates) -> Result<Self, CoordinateError> {
        match (self, offset) {
            (CellCoordinates::Square { x, y }, CellCoordinates::Square { x: dx, y: dy }) => {
                Ok(CellCoordinates::square(x + dx, y + dy))
            }
            (
                CellCoordinates::Hexagon { q, r, .. },
                CellCoordinates::Hexagon { q: dq, r: dr, .. },
            ) => Ok(CellCoordinates::hexagon(q + dq, r + dr)),
            (a, b) => Err(CoordinateError::TopologyMismatch {
                expected: a.topology(),
                found: b.topology(),
            }),
        }
    }

    pub fn negated(self) -> Self {
        match self {
            CellCoordinates::Square { x, y } => CellCoordinates::square(-x, -y),
            CellCoordinates::Hexagon { q, r, .. } => CellCoordinates::hexagon(-q, -r),
        }
    }

    /// Center of the cell in world space (unit spacing, Y up).
    pub fn to_physical(&self) -> Vec3 {
        match *self {
            CellCoordinates::Square { x, y } => Vec3::new(x as f32, 0.0, y as f32),
            CellCoordinates::Hexagon { q, r, .. } => {
                let q = q as f32;
                let r = r as f32;
                Vec3::new(1.5 * q, 0.0, SQRT_3 * (r + q / 2.0))
            }
        }
    }

    /// Cell containing a world position. Inverse of `to_physical` for cell
    /// centers; any other point rounds to the nearest cell.
    pub fn from_physical(topology: Topology, position: Vec3) -> Self {
        match topology {
            Topology::Square => {
                CellCoordinates::square(position.x.round() as i32, position.z.round() as i32)
            }
            Topology::Hexagon => {
                let q = position.x * 2.0 / 3.0;
                let r = -position.x / 3.0 + position.z * SQRT_3 / 3.0;
                let (q, r) = cube_round(q, r);
                CellCoordinates::hexagon(q, r)
            }
        }
    }
}

/// Round fractional axial coordinates to the nearest hexagon.
fn cube_round(q: f32, r: f32) -> (i32, i32) {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    (rq as i32, rr as i32)
}

impl fmt::Display for CellCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellCoordinates::Square { x, y } => write!(f, "cc({}, {})", x, y),
            CellCoordinates::Hexagon { q, r, s } => write!(f, "hex({}, {}, {})", q, r, s),
        }
    }
}
