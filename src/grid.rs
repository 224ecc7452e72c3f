//! Static grid map of walkable and blocked cells
//!
//! The grid is loaded once and read-only for the tracker's lifetime.
//! Coordinates put (0,0) at the bottom-left corner, x to the right and
//! y upward. Cell indices are laid out column-major (`y * width + x`) so
//! they coincide with the linear layout of a width-by-height
//! `nalgebra::DMatrix` indexed `(x, y)`.

use smallvec::SmallVec;

use crate::errors::TrackerError;

/// Manhattan distance between two cells.
#[inline]
pub fn manhattan(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Immutable map of walkable vs. blocked cells
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    blocked: Vec<bool>,
    open_cells: usize,
}

impl Grid {
    /// Create a grid from an explicit blocked mask (`y * width + x` layout).
    pub fn new(width: usize, height: usize, blocked: Vec<bool>) -> Result<Self, TrackerError> {
        if width == 0 || height == 0 {
            return Err(TrackerError::Configuration {
                description: format!("grid dimensions must be positive, got {}x{}", width, height),
            });
        }
        if blocked.len() != width * height {
            return Err(TrackerError::InvalidInput {
                expected: width * height,
                actual: blocked.len(),
                context: "blocked mask length".to_string(),
            });
        }
        let open_cells = blocked.iter().filter(|&&b| !b).count();
        if open_cells == 0 {
            return Err(TrackerError::Configuration {
                description: "grid has no walkable cells".to_string(),
            });
        }
        Ok(Self {
            width,
            height,
            blocked,
            open_cells,
        })
    }

    /// Create a fully open grid with no blocked cells.
    pub fn open(width: usize, height: usize) -> Result<Self, TrackerError> {
        Self::new(width, height, vec![false; width * height])
    }

    /// Create a grid from ASCII rows, top row first. `'#'` marks a blocked
    /// cell, anything else is walkable. Rows must all have the same length.
    pub fn from_rows(rows: &[&str]) -> Result<Self, TrackerError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if height == 0 || width == 0 {
            return Err(TrackerError::Configuration {
                description: "grid rows must be non-empty".to_string(),
            });
        }
        let mut blocked = vec![false; width * height];
        for (row_idx, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(TrackerError::InvalidInput {
                    expected: width,
                    actual: row.chars().count(),
                    context: format!("row {} length", row_idx),
                });
            }
            // Top row of the text is the highest y.
            let y = height - 1 - row_idx;
            for (x, ch) in row.chars().enumerate() {
                blocked[y * width + x] = ch == '#';
            }
        }
        Self::new(width, height, blocked)
    }

    /// Grid width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of walkable cells.
    #[inline]
    pub fn open_cell_count(&self) -> usize {
        self.open_cells
    }

    /// Whether the cell at (x, y) is blocked.
    #[inline]
    pub fn blocked(&self, x: usize, y: usize) -> bool {
        self.blocked[y * self.width + x]
    }

    /// Linear index of (x, y), matching column-major `DMatrix` layout.
    #[inline]
    pub fn cell_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Inverse of [`cell_index`](Self::cell_index).
    #[inline]
    pub fn cell_at(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Unblocked cardinal neighbors of (x, y).
    pub fn neighbors(&self, x: usize, y: usize) -> SmallVec<[(usize, usize); 4]> {
        let mut out = SmallVec::new();
        if y + 1 < self.height && !self.blocked(x, y + 1) {
            out.push((x, y + 1));
        }
        if y > 0 && !self.blocked(x, y - 1) {
            out.push((x, y - 1));
        }
        if x + 1 < self.width && !self.blocked(x + 1, y) {
            out.push((x + 1, y));
        }
        if x > 0 && !self.blocked(x - 1, y) {
            out.push((x - 1, y));
        }
        out
    }

    /// Iterator over all walkable cells.
    pub fn open_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.blocked.len())
            .filter(|&i| !self.blocked[i])
            .map(|i| self.cell_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_grid() {
        let grid = Grid::open(3, 4).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.open_cell_count(), 12);
        assert!(!grid.blocked(2, 3));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(Grid::open(0, 5).is_err());
        assert!(Grid::open(5, 0).is_err());
    }

    #[test]
    fn test_from_rows_orientation() {
        // Top text row is the highest y; (0,0) is bottom-left.
        let grid = Grid::from_rows(&["#..", "..#"]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert!(grid.blocked(0, 1));
        assert!(grid.blocked(2, 0));
        assert!(!grid.blocked(0, 0));
        assert_eq!(grid.open_cell_count(), 4);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(Grid::from_rows(&["...", ".."]).is_err());
    }

    #[test]
    fn test_neighbors_clip_walls_and_edges() {
        let grid = Grid::from_rows(&["...", ".#.", "..."]).unwrap();
        // Corner cell has two neighbors.
        assert_eq!(grid.neighbors(0, 0).len(), 2);
        // Cell left of the center wall loses its east neighbor.
        let n = grid.neighbors(0, 1);
        assert_eq!(n.len(), 2);
        assert!(!n.contains(&(1, 1)));
    }

    #[test]
    fn test_cell_index_roundtrip() {
        let grid = Grid::open(5, 3).unwrap();
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(grid.cell_at(grid.cell_index(x, y)), (x, y));
            }
        }
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan((0, 0), (3, 4)), 7);
        assert_eq!(manhattan((2, 5), (2, 5)), 0);
        assert_eq!(manhattan((4, 1), (1, 3)), 5);
    }
}
