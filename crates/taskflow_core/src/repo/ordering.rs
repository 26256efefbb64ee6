//! Sequence helpers for the drag-reorder collaborator.
//!
//! Both helpers produce the full desired sequence that `reorder_tasks` /
//! `reorder_habits` expect.

use std::collections::HashMap;
use std::hash::Hash;

/// Moves the element at `from` to index `to` (remove, then insert).
///
/// Returns `false` and leaves `items` untouched when either index is out of
/// bounds.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Builds the full sequence following `ids`.
///
/// Unknown and repeated ids are ignored; items not mentioned in `ids` are
/// appended in their current order, so no element is ever lost.
pub fn arrange_by_ids<T, K, F>(items: Vec<T>, ids: &[K], id_of: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let rank = ids
        .iter()
        .enumerate()
        .rev()
        .map(|(index, id)| (id, index))
        .collect::<HashMap<_, _>>();

    let mut ranked = items
        .into_iter()
        .enumerate()
        .map(|(current, item)| {
            let key = rank.get(&id_of(&item)).copied().unwrap_or(usize::MAX);
            (key, current, item)
        })
        .collect::<Vec<_>>();
    ranked.sort_by_key(|(key, current, _)| (*key, *current));
    ranked.into_iter().map(|(_, _, item)| item).collect()
}
