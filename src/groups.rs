use std::collections::VecDeque;

use crate::grid::Grid;
use crate::types::Cell;

/// Breadth-first flood fill from `start` over orthogonally adjacent balloons.
///
/// `visited` is indexed like the grid and is marked for every cell added to the
/// group, so a full-board scan can share one mask across calls. An empty or
/// already visited start cell yields an empty group.
pub fn find_group(grid: &Grid, start: Cell, visited: &mut [bool]) -> Vec<Cell> {
    let mut group = Vec::new();
    if !grid.has_balloon(start) || visited[grid.index(start)] {
        return group;
    }

    let mut queue = VecDeque::new();
    visited[grid.index(start)] = true;
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        group.push(cell);
        for next in grid.neighbors(cell) {
            let index = grid.index(next);
            if visited[index] || !grid.has_balloon(next) {
                continue;
            }
            visited[index] = true;
            queue.push_back(next);
        }
    }

    group
}

/// The first cell (row-major) of every group on the board, paired with the group size.
pub fn group_representatives(grid: &Grid) -> Vec<(Cell, usize)> {
    let mut visited = grid.blank_mask();
    let mut out = Vec::new();
    for cell in grid.coords() {
        if visited[grid.index(cell)] || !grid.has_balloon(cell) {
            continue;
        }
        let group = find_group(grid, cell, &mut visited);
        out.push((cell, group.len()));
    }
    out
}

/// Sizes of every balloon group on a board, ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupCatalog {
    sizes: Vec<usize>,
}

impl GroupCatalog {
    pub fn scan(grid: &Grid) -> Self {
        let mut sizes: Vec<usize> = group_representatives(grid)
            .into_iter()
            .map(|(_, size)| size)
            .collect();
        sizes.sort_unstable();
        Self { sizes }
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// `None` once the board has no balloons left.
    pub fn max_group_size(&self) -> Option<usize> {
        self.sizes.last().copied()
    }

    pub fn group_count(&self) -> usize {
        self.sizes.len()
    }

    pub fn total_balloons(&self) -> usize {
        self.sizes.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
