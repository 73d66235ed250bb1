//! Permutations shared by every ordered sequence of the board.
//!
//! The canonical params, the item models, the canvas paint order and the
//! sidebar rows are all reordered by applying the same `Reorder`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Reorder {
    Swap { a: usize, b: usize },
    /// Move to the end (top of the z-order).
    ToFront { index: usize },
    /// Move to the start (bottom of the z-order).
    ToBack { index: usize },
}

impl Reorder {
    /// Validate host-supplied indices against a sequence length.
    pub fn swap_checked(a: i64, b: i64, len: usize) -> Option<Self> {
        let a = checked_index(a, len)?;
        let b = checked_index(b, len)?;
        Some(Reorder::Swap { a, b })
    }

    /// Whether the permutation is valid for a sequence of `len`.
    pub fn fits(&self, len: usize) -> bool {
        match *self {
            Reorder::Swap { a, b } => a < len && b < len,
            Reorder::ToFront { index } | Reorder::ToBack { index } => index < len,
        }
    }

    /// Apply to `items`. Out-of-range permutations leave it untouched.
    pub fn apply<T>(&self, items: &mut Vec<T>) {
        if !self.fits(items.len()) {
            return;
        }
        match *self {
            Reorder::Swap { a, b } => items.swap(a, b),
            Reorder::ToFront { index } => {
                let item = items.remove(index);
                items.push(item);
            }
            Reorder::ToBack { index } => {
                let item = items.remove(index);
                items.insert(0, item);
            }
        }
    }
}

/// `Some(index)` when `index` lies in `[0, len - 1]`.
pub fn checked_index(index: i64, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|i| *i < len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn to_front_and_back() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        Reorder::ToFront { index: 1 }.apply(&mut v);
        assert_eq!(v, vec!['a', 'c', 'd', 'b']);
        Reorder::ToBack { index: 2 }.apply(&mut v);
        assert_eq!(v, vec!['d', 'a', 'c', 'b']);
    }

    #[test]
    fn checked_swap_rejects_out_of_range() {
        assert_eq!(Reorder::swap_checked(-1, 0, 3), None);
        assert_eq!(Reorder::swap_checked(0, 3, 3), None);
        assert_eq!(Reorder::swap_checked(2, 0, 3), Some(Reorder::Swap { a: 2, b: 0 }));
    }

    #[test]
    fn out_of_range_apply_is_noop() {
        let mut v = vec![1, 2];
        Reorder::ToFront { index: 5 }.apply(&mut v);
        assert_eq!(v, vec![1, 2]);
    }
}
