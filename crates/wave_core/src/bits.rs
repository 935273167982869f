//! Word-wise set operations on equally sized `BitVec`s.
//!
//! Every candidate set in the crate is a `BitVec` of length `variant_count`,
//! so two sets always share the same storage layout.

use bitvec::vec::BitVec;

/// `dst |= src`
pub(crate) fn union_assign(dst: &mut BitVec, src: &BitVec) {
    debug_assert_eq!(dst.len(), src.len());
    for (word, other) in dst.as_raw_mut_slice().iter_mut().zip(src.as_raw_slice()) {
        *word |= *other;
    }
}

/// `dst &= src`. Returns whether any bit of `dst` was cleared.
///
/// Intersection only ever clears bits, so a change shows up as a drop in the
/// population count. The count skips the unused tail of the last word,
/// which may differ between sets built by `repeat` and by `fill`.
pub(crate) fn intersect_assign(dst: &mut BitVec, src: &BitVec) -> bool {
    debug_assert_eq!(dst.len(), src.len());
    let before = dst.count_ones();
    for (word, other) in dst.as_raw_mut_slice().iter_mut().zip(src.as_raw_slice()) {
        *word &= *other;
    }
    dst.count_ones() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_and_intersection() {
        let mut a = BitVec::repeat(false, 70);
        let mut b = BitVec::repeat(false, 70);
        a.set(1, true);
        a.set(65, true);
        b.set(65, true);
        b.set(69, true);

        let mut union = a.clone();
        union_assign(&mut union, &b);
        assert_eq!(union.iter_ones().collect::<Vec<_>>(), vec![1, 65, 69]);

        assert!(intersect_assign(&mut a, &b));
        assert_eq!(a.iter_ones().collect::<Vec<_>>(), vec![65]);
    }

    #[test]
    fn test_intersection_reports_change() {
        let mut a = BitVec::repeat(false, 130);
        a.set(3, true);
        a.set(128, true);
        let superset = BitVec::repeat(true, 130);

        assert!(!intersect_assign(&mut a, &superset));
        assert_eq!(a.iter_ones().collect::<Vec<_>>(), vec![3, 128]);

        // unused tail bits of the last word do not count as a change
        let mut filled = BitVec::repeat(false, 130);
        filled.fill(true);
        let mut total = BitVec::repeat(true, 130);
        assert!(!intersect_assign(&mut total, &filled));
        assert_eq!(total.count_ones(), 130);

        let mut head_only = BitVec::repeat(false, 130);
        head_only.set(3, true);
        assert!(intersect_assign(&mut a, &head_only));
        assert_eq!(a.iter_ones().collect::<Vec<_>>(), vec![3]);
        assert!(!intersect_assign(&mut a, &head_only));
    }
}
