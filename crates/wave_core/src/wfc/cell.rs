//! Superposition of one grid cell.
//!
//! A cell is the set of variant indices still possible at its node, stored as
//! a bit set of fixed length `variant_count`:
//! - `len() == variant_count`: total superposition, nothing known yet
//! - `len() == 1`: determined
//! - `len() == 0`: failed; never used as a source of constraints

use crate::bits::intersect_assign;
use bitvec::vec::BitVec;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    candidates: BitVec,
}

impl Cell {
    /// Every variant possible.
    pub fn total(variant_count: usize) -> Self {
        Self {
            candidates: BitVec::repeat(true, variant_count),
        }
    }

    /// Exactly the given variants. Indices at or past `variant_count` are
    /// ignored.
    pub fn from_candidates(
        variant_count: usize,
        candidates: impl IntoIterator<Item = usize>,
    ) -> Self {
        let mut bits = BitVec::repeat(false, variant_count);
        for variant in candidates {
            if variant < variant_count {
                bits.set(variant, true);
            }
        }
        Self { candidates: bits }
    }

    /// Number of remaining candidates (the cell's entropy).
    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.count_ones()
    }

    /// Number of variants in the tileset this cell was built for.
    #[inline]
    pub fn variant_count(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.candidates.not_any()
    }

    /// Same as `is_failed`; the usual partner of `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_failed()
    }

    #[inline]
    pub fn is_determined(&self) -> bool {
        self.len() == 1
    }

    #[inline]
    pub fn is_total_superposition(&self) -> bool {
        self.candidates.all()
    }

    /// Narrowed but not failed: the only state that constrains neighbors
    /// during growth and re-derivation.
    pub fn is_constraining(&self) -> bool {
        !self.is_failed() && !self.is_total_superposition()
    }

    pub fn contains(&self, variant: usize) -> bool {
        self.candidates
            .get(variant)
            .map(|bit| *bit)
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.candidates.iter_ones()
    }

    /// The variant of a determined cell.
    pub fn single(&self) -> Option<usize> {
        let mut ones = self.candidates.iter_ones();
        match (ones.next(), ones.next()) {
            (Some(variant), None) => Some(variant),
            _ => None,
        }
    }

    pub fn bits(&self) -> &BitVec {
        &self.candidates
    }

    /// Keep only candidates present in `allowed`. Returns whether the cell
    /// changed.
    pub fn intersect_with(&mut self, allowed: &BitVec) -> bool {
        intersect_assign(&mut self.candidates, allowed)
    }

    /// Replace the contents with a single variant.
    pub fn collapse_to(&mut self, variant: usize) {
        self.candidates.fill(false);
        self.candidates.set(variant, true);
    }

    /// Back to total superposition.
    pub fn reset(&mut self) {
        self.candidates.fill(true);
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tiles: Vec<String> = self.iter().map(|v| v.to_string()).collect();
        write!(f, "Cell of tiles {{ {} }}", tiles.join(","))
    }
}
