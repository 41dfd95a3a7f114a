use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::collision::distance_manhattan;

/// A* over a 4-connected grid.
///
/// Returns the full path from `start` to `goal` inclusive, or None when no
/// path exists within `max_iterations` expansions. `start == goal` yields
/// the single-cell path.
///
/// The goal cell is exempt from the passability check — it is usually an
/// entity's cell, which the caller wants to walk up to. Neighbors expand
/// in a fixed up/down/left/right order and the heap is keyed (f, x, y),
/// so ties resolve the same way on every run.
pub fn astar(
    start: (i32, i32),
    goal: (i32, i32),
    is_passable: impl Fn(i32, i32) -> bool,
    max_iterations: usize,
) -> Option<Vec<(i32, i32)>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut open: BinaryHeap<Reverse<(i32, i32, i32)>> = BinaryHeap::new();
    let mut came_from: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
    let mut g_score: HashMap<(i32, i32), i32> = HashMap::new();

    g_score.insert(start, 0);
    let h = distance_manhattan(start.0, start.1, goal.0, goal.1);
    open.push(Reverse((h, start.0, start.1)));

    let mut iterations = 0;
    while let Some(Reverse((_, cx, cy))) = open.pop() {
        iterations += 1;
        if iterations > max_iterations {
            return None;
        }

        let current = (cx, cy);
        if current == goal {
            return Some(reconstruct(&came_from, start, goal));
        }

        let current_g = g_score[&current];
        for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            let next = (cx + dx, cy + dy);
            if next != goal && !is_passable(next.0, next.1) {
                continue;
            }

            let new_g = current_g + 1;
            if new_g < g_score.get(&next).copied().unwrap_or(i32::MAX) {
                g_score.insert(next, new_g);
                came_from.insert(next, current);
                let f = new_g + distance_manhattan(next.0, next.1, goal.0, goal.1);
                open.push(Reverse((f, next.0, next.1)));
            }
        }
    }

    None
}

fn reconstruct(
    came_from: &HashMap<(i32, i32), (i32, i32)>,
    start: (i32, i32),
    goal: (i32, i32),
) -> Vec<(i32, i32)> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = came_from[&current];
        path.push(current);
    }
    path.reverse();
    path
}
