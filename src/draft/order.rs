use std::cmp::Ordering;

use crate::parser::Player;

use super::rng::SeededRng;

/// Compares two players for draft order: higher score first. Equal scores
/// draw once from `rng` and order by the sign of `next() - 0.5`. A draw of
/// exactly one half keeps the left player first.
fn draft_ordering(a: &Player, b: &Player, rng: &mut SeededRng) -> Ordering {
    match b.engagement_score.cmp(&a.engagement_score) {
        Ordering::Equal => {
            if rng.next() - 0.5 <= 0.0 {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        decided => decided,
    }
}

/// Sorts players into draft order, breaking score ties with `rng`.
///
/// The tie-break comparator is not a total order, so this uses a merge sort
/// that only ever asks "does the right element go first" and cannot be
/// tripped up by inconsistent answers. Each tied comparison consumes exactly
/// one draw.
pub fn sort_for_draft(players: &mut Vec<Player>, rng: &mut SeededRng) {
    if players.len() < 2 {
        return;
    }
    let items = std::mem::take(players);
    *players = merge_sort(items, rng);
}

fn merge_sort(mut items: Vec<Player>, rng: &mut SeededRng) -> Vec<Player> {
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, rng);
    let right = merge_sort(right, rng);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        if draft_ordering(l, r, rng) == Ordering::Greater {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged.extend(left);
    merged.extend(right);
    merged
}
