//! Drag-and-drop moves
//!
//! A drag happens inside the visible (filtered) list but must be written
//! back to the full canonical order without disturbing hidden rows.

use crate::domain::ForwardId;

/// Move the element at `from` to index `to`, shifting the rest
pub fn array_move<T: Copy>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    if from >= moved.len() || to >= moved.len() {
        return moved;
    }
    let item = moved.remove(from);
    moved.insert(to, item);
    moved
}

/// Apply a single `from -> to` drag made in `visible` to the full `canonical` order.
///
/// Returns `None` when the drag is a no-op: same id, an id missing from the
/// visible list, or an id missing from the canonical order (the list was
/// refreshed mid-drag). Otherwise only `from` changes position: it lands right
/// before `to` when dragged upwards and right after it when dragged downwards,
/// which is exactly where `array_move` puts it in the visible list.
pub fn apply_move(
    canonical: &[ForwardId],
    visible: &[ForwardId],
    from: ForwardId,
    to: ForwardId,
) -> Option<Vec<ForwardId>> {
    if from == to {
        return None;
    }
    let old_index = visible.iter().position(|id| *id == from)?;
    let new_index = visible.iter().position(|id| *id == to)?;
    if !canonical.contains(&to) {
        return None;
    }
    let from_pos = canonical.iter().position(|id| *id == from)?;

    let mut updated = canonical.to_vec();
    updated.remove(from_pos);
    let to_pos = updated.iter().position(|id| *id == to)?;
    let insert_at = if old_index > new_index { to_pos } else { to_pos + 1 };
    updated.insert(insert_at, from);
    Some(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<ForwardId> {
        raw.iter().map(|id| ForwardId(*id)).collect()
    }

    fn restrict(order: &[ForwardId], visible: &[ForwardId]) -> Vec<ForwardId> {
        order.iter().copied().filter(|id| visible.contains(id)).collect()
    }

    #[test]
    fn test_array_move() {
        assert_eq!(array_move(&[1, 3, 5], 2, 0), vec![5, 1, 3]);
        assert_eq!(array_move(&[1, 3, 5], 0, 2), vec![3, 5, 1]);
        assert_eq!(array_move(&[1, 3, 5], 0, 9), vec![1, 3, 5]);
    }

    #[test]
    fn test_filtered_drag_preserves_hidden_rows() {
        let canonical = ids(&[1, 2, 3, 4, 5]);
        let visible = ids(&[1, 3, 5]);

        let updated = apply_move(&canonical, &visible, ForwardId(5), ForwardId(1)).unwrap();
        assert_eq!(updated, ids(&[5, 1, 2, 3, 4]));
        assert_eq!(restrict(&updated, &visible), array_move(&visible, 2, 0));
    }

    #[test]
    fn test_filtered_drag_downwards() {
        let canonical = ids(&[1, 2, 3, 4, 5]);
        let visible = ids(&[1, 3, 5]);

        let updated = apply_move(&canonical, &visible, ForwardId(1), ForwardId(3)).unwrap();
        assert_eq!(updated, ids(&[2, 3, 1, 4, 5]));
        assert_eq!(restrict(&updated, &visible), array_move(&visible, 0, 1));
        assert_eq!(restrict(&updated, &ids(&[2, 4])), ids(&[2, 4]));
    }

    #[test]
    fn test_unfiltered_drag_matches_array_move() {
        let canonical = ids(&[1, 2, 3, 4]);
        for from in 0..4 {
            for to in 0..4 {
                if from == to {
                    continue;
                }
                let updated = apply_move(&canonical, &canonical, canonical[from], canonical[to]).unwrap();
                assert_eq!(updated, array_move(&canonical, from, to));
            }
        }
    }

    #[test]
    fn test_invalid_drags_are_noops() {
        let canonical = ids(&[1, 2, 3]);
        let visible = ids(&[1, 3]);

        assert_eq!(apply_move(&canonical, &visible, ForwardId(1), ForwardId(1)), None);
        assert_eq!(apply_move(&canonical, &visible, ForwardId(2), ForwardId(1)), None);
        assert_eq!(apply_move(&canonical, &visible, ForwardId(1), ForwardId(9)), None);
        assert_eq!(apply_move(&ids(&[1]), &ids(&[1]), ForwardId(1), ForwardId(1)), None);
    }

    #[test]
    fn test_visible_id_missing_from_canonical_is_noop() {
        // Refresh removed 3 while the drag was in flight
        let canonical = ids(&[1, 2]);
        let visible = ids(&[1, 3]);
        assert_eq!(apply_move(&canonical, &visible, ForwardId(3), ForwardId(1)), None);
        assert_eq!(apply_move(&canonical, &visible, ForwardId(1), ForwardId(3)), None);
    }
}
