// A* pathfinding over the colony grid.
//
// Standard A* with 4-directional moves, unit edge cost and the Manhattan
// heuristic (admissible and consistent for this move set, so the first time
// the goal is popped the path is shortest). The open set is a `BinaryHeap`
// turned into a min-heap by reversing `Ord`. Ties on f-score are broken by
// insertion order via a monotonic sequence number, which keeps the chosen
// path identical across runs. Scores and came-from links live in `Vec`s
// indexed by cell.
//
// Passability is a caller-supplied predicate; the canonical one is
// `Walkability::is_walkable` (see `world.rs`). The start cell is never
// tested, so a pawn standing on a cell that just became blocked can still
// walk off it. Callers approaching a structure wrap the predicate so the
// goal cell is always allowed.
//
// See also: `pawn_sim.rs` which steps pawns one cell at a time along the
// returned path.
//
// **Critical constraint: determinism.** A pure function of its inputs; no
// hashing, no randomness.

use crate::types::GridCoord;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Entry in the A* open set.
struct OpenEntry {
    cell: usize,
    f_score: u32,
    sequence: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score && self.sequence == other.sequence
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: lowest f, then earliest insertion, is "greatest".
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Find a shortest 4-connected path from `start` to `goal` on a
/// `width` x `height` grid. Returns the cells from start to goal inclusive,
/// or `None` if the goal is off the map or unreachable.
pub fn find_path(
    (width, height): (u32, u32),
    start: GridCoord,
    goal: GridCoord,
    passable: impl Fn(GridCoord) -> bool,
) -> Option<Vec<GridCoord>> {
    if start == goal {
        return Some(vec![start]);
    }
    let in_bounds =
        |c: GridCoord| c.x >= 0 && c.y >= 0 && (c.x as u32) < width && (c.y as u32) < height;
    if !in_bounds(start) || !in_bounds(goal) {
        return None;
    }

    let w = width as usize;
    let n = w * height as usize;
    let index = |c: GridCoord| c.x as usize + c.y as usize * w;
    let coord = |i: usize| GridCoord::new((i % w) as i32, (i / w) as i32);

    let mut g_score = vec![u32::MAX; n];
    let mut came_from: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];
    let mut sequence = 0u64;

    let start_i = index(start);
    let goal_i = index(goal);
    g_score[start_i] = 0;

    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        cell: start_i,
        f_score: start.manhattan_distance(goal),
        sequence,
    });

    while let Some(current) = open.pop() {
        let ci = current.cell;
        if ci == goal_i {
            return Some(reconstruct_path(&came_from, ci, coord));
        }
        if closed[ci] {
            continue;
        }
        closed[ci] = true;

        let tentative_g = g_score[ci] + 1;
        for neighbor in coord(ci).neighbors4() {
            if !in_bounds(neighbor) || !passable(neighbor) {
                continue;
            }
            let ni = index(neighbor);
            if closed[ni] || tentative_g >= g_score[ni] {
                continue;
            }
            g_score[ni] = tentative_g;
            came_from[ni] = Some(ci);
            sequence += 1;
            open.push(OpenEntry {
                cell: ni,
                f_score: tentative_g + neighbor.manhattan_distance(goal),
                sequence,
            });
        }
    }

    None
}

fn reconstruct_path(
    came_from: &[Option<usize>],
    goal: usize,
    coord: impl Fn(usize) -> GridCoord,
) -> Vec<GridCoord> {
    let mut path = vec![coord(goal)];
    let mut current = goal;
    while let Some(prev) = came_from[current] {
        path.push(coord(prev));
        current = prev;
    }
    path.reverse();
    path
}
