use super::*;

use crate::error::EngineError;
use crate::groups::find_group;
use crate::types::{ClickOutcome, IgnoredReason};

impl GameEngine {
    /// Applies a raw click. Coordinates are checked here; callers are not trusted.
    ///
    /// A click is legal when the clicked balloon's group is as large as the largest group
    /// on the board. Legal clicks pop the whole group, illegal ones end the session as
    /// failed and leave the board untouched.
    pub fn click(&mut self, row: i64, col: i64) -> Result<ClickOutcome, EngineError> {
        let Some(cell) = self.grid.cell_at(row, col) else {
            return Err(EngineError::OutOfBounds {
                row,
                col,
                rows: self.grid.rows(),
                columns: self.grid.columns(),
            });
        };
        if self.status != SessionStatus::Playing {
            return Ok(ClickOutcome::Ignored {
                reason: IgnoredReason::NotPlaying,
            });
        }
        if !self.grid.has_balloon(cell) {
            return Ok(ClickOutcome::Ignored {
                reason: IgnoredReason::EmptyCell,
            });
        }

        let mut visited = self.grid.blank_mask();
        let group = find_group(&self.grid, cell, &mut visited);
        let max_group_size = self.catalog.max_group_size().unwrap_or(0);
        if group.len() == max_group_size {
            Ok(self.pop_group(cell, &group))
        } else {
            Ok(self.reject_click(cell, group.len(), max_group_size))
        }
    }

    fn pop_group(&mut self, clicked: Cell, group: &[Cell]) -> ClickOutcome {
        self.grid.clear_cells(group);
        self.catalog = GroupCatalog::scan(&self.grid);
        self.pops += 1;
        self.popped += group.len();
        self.push_event(RuntimeEvent::GroupPopped {
            row: clicked.row,
            col: clicked.col,
            size: group.len(),
        });

        if self.catalog.is_empty() {
            self.status = SessionStatus::Cleared;
            self.push_event(RuntimeEvent::BoardCleared { pops: self.pops });
            return ClickOutcome::Cleared { size: group.len() };
        }
        ClickOutcome::Popped {
            size: group.len(),
            remaining: self.catalog.total_balloons(),
        }
    }

    fn reject_click(&mut self, clicked: Cell, size: usize, max_group_size: usize) -> ClickOutcome {
        self.status = SessionStatus::Failed;
        self.push_event(RuntimeEvent::ClickRejected {
            row: clicked.row,
            col: clicked.col,
            size,
            max_group_size,
        });
        ClickOutcome::Failed {
            size,
            max_group_size,
        }
    }
}
