use crate::config::GameConfig;
use crate::rng::Rng;
use crate::types::Cell;

/// Row-major balloon board. `true` means a balloon sits in the cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<bool>,
}

impl Grid {
    pub fn empty(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![false; rows * columns],
        }
    }

    /// Builds a grid from nested rows. Ragged or empty input yields `None`.
    pub fn from_rows(rows: &[Vec<bool>]) -> Option<Self> {
        let columns = rows.first()?.len();
        if columns == 0 || rows.iter().any(|row| row.len() != columns) {
            return None;
        }
        Some(Self {
            rows: rows.len(),
            columns,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    /// Parses whitespace separated rows of `o` (balloon) and `.` (empty).
    pub fn parse(art: &str) -> Option<Self> {
        let mut rows = Vec::new();
        for line in art.split_whitespace() {
            let mut row = Vec::new();
            for c in line.chars() {
                match c {
                    'o' => row.push(true),
                    '.' => row.push(false),
                    _ => return None,
                }
            }
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn index(&self, cell: Cell) -> usize {
        cell.row * self.columns + cell.col
    }

    /// Bounds check for raw coordinates coming from outside the engine.
    pub fn cell_at(&self, row: i64, col: i64) -> Option<Cell> {
        if row < 0 || col < 0 || row as u64 >= self.rows as u64 || col as u64 >= self.columns as u64
        {
            return None;
        }
        Some(Cell::new(row as usize, col as usize))
    }

    pub fn has_balloon(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.columns && self.cells[self.index(cell)]
    }

    pub fn clear_cells(&mut self, cells: &[Cell]) {
        for &cell in cells {
            let index = self.index(cell);
            self.cells[index] = false;
        }
    }

    pub fn balloon_count(&self) -> usize {
        self.cells.iter().filter(|balloon| **balloon).count()
    }

    pub fn is_cleared(&self) -> bool {
        !self.cells.iter().any(|balloon| *balloon)
    }

    pub fn blank_mask(&self) -> Vec<bool> {
        vec![false; self.cells.len()]
    }

    /// Every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |col| Cell::new(row, col)))
    }

    /// Up, down, left and right neighbours that lie inside the grid.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let Cell { row, col } = cell;
        [
            row.checked_sub(1).map(|r| Cell::new(r, col)),
            Some(Cell::new(row + 1, col)),
            col.checked_sub(1).map(|c| Cell::new(row, c)),
            Some(Cell::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
        .filter(move |next| next.row < self.rows && next.col < self.columns)
    }

    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells
            .chunks(self.columns.max(1))
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Fresh board for `config`. At least one cell always holds a balloon.
pub fn generate_grid(config: &GameConfig, rng: &mut Rng) -> Grid {
    let mut grid = Grid::empty(config.rows(), config.columns());
    let probability = config.probability();
    let fill_all = config.fills_every_cell();
    for balloon in grid.cells.iter_mut() {
        *balloon = fill_all || rng.chance(probability);
    }

    if grid.is_cleared() {
        let index = rng.pick_index(grid.cells.len());
        grid.cells[index] = true;
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(rows: i64, columns: i64, probability: i64) -> GameConfig {
        GameConfig::new(rows, columns, probability).expect("valid config")
    }

    #[test]
    fn parse_reads_balloon_art() {
        let grid = Grid::parse("oo. .o.").expect("art should parse");
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.columns(), 3);
        assert!(grid.has_balloon(Cell::new(0, 0)));
        assert!(grid.has_balloon(Cell::new(0, 1)));
        assert!(!grid.has_balloon(Cell::new(0, 2)));
        assert!(grid.has_balloon(Cell::new(1, 1)));
        assert_eq!(grid.balloon_count(), 3);
    }

    #[test]
    fn parse_rejects_ragged_or_unknown_input() {
        assert!(Grid::parse("oo .").is_none());
        assert!(Grid::parse("ox").is_none());
        assert!(Grid::parse("").is_none());
    }

    #[test]
    fn cell_at_rejects_out_of_bounds() {
        let grid = Grid::empty(2, 3);
        assert_eq!(grid.cell_at(1, 2), Some(Cell::new(1, 2)));
        assert_eq!(grid.cell_at(2, 0), None);
        assert_eq!(grid.cell_at(0, 3), None);
        assert_eq!(grid.cell_at(-1, 0), None);
        assert_eq!(grid.cell_at(0, i64::MIN), None);
        assert_eq!(grid.cell_at(i64::MAX, 0), None);
    }

    #[test]
    fn neighbors_are_orthogonal_and_in_bounds() {
        let grid = Grid::empty(3, 3);
        let corner: Vec<Cell> = grid.neighbors(Cell::new(0, 0)).collect();
        assert_eq!(corner, vec![Cell::new(1, 0), Cell::new(0, 1)]);

        let mut center: Vec<Cell> = grid.neighbors(Cell::new(1, 1)).collect();
        center.sort();
        assert_eq!(
            center,
            vec![
                Cell::new(0, 1),
                Cell::new(1, 0),
                Cell::new(1, 2),
                Cell::new(2, 1)
            ]
        );
    }

    #[test]
    fn to_rows_round_trips_through_from_rows() {
        let grid = Grid::parse("o.o .o. o..").expect("art should parse");
        assert_eq!(Grid::from_rows(&grid.to_rows()), Some(grid));
    }

    #[test]
    fn generated_grid_always_has_a_balloon() {
        for probability in [1, 5, 30, 50, 99] {
            for seed in 0..300u32 {
                let mut rng = Rng::new(seed);
                let grid = generate_grid(&config(3, 3, probability), &mut rng);
                assert_eq!(grid.rows(), 3);
                assert_eq!(grid.columns(), 3);
                assert!(!grid.is_cleared(), "seed={seed} probability={probability}");
            }
        }
    }

    #[test]
    fn zero_probability_places_exactly_one_balloon() {
        for seed in 0..100u32 {
            let mut rng = Rng::new(seed);
            let grid = generate_grid(&config(4, 5, 0), &mut rng);
            assert_eq!(grid.balloon_count(), 1);
        }
    }

    #[test]
    fn full_probability_fills_every_cell() {
        let mut rng = Rng::new(3);
        let grid = generate_grid(&config(5, 7, 100), &mut rng);
        assert_eq!(grid.balloon_count(), 35);
    }

    #[test]
    fn same_seed_generates_same_grid() {
        let a = generate_grid(&config(8, 8, 40), &mut Rng::new(1234));
        let b = generate_grid(&config(8, 8, 40), &mut Rng::new(1234));
        assert_eq!(a, b);
    }
}
