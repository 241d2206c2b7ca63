use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address of one grid cell.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub room: usize,
    pub slot: usize,
}

impl Cell {
    pub fn new(room: usize, slot: usize) -> Self {
        Self { room, slot }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("cell (room {room}, slot {slot}) is outside a {rooms}x{slots} grid")]
    OutOfBounds {
        room: usize,
        slot: usize,
        rooms: usize,
        slots: usize,
    },
    #[error("cell (room {room}, slot {slot}) already holds course {course}")]
    Occupied {
        room: usize,
        slot: usize,
        course: usize,
    },
}

/// Room-by-timeslot occupancy grid.
///
/// Stored row-major in one flat buffer (`room * slots + slot`); `None` is the
/// empty sentinel. Clones are deep, so annealing candidates never alias.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Schedule {
    rooms: usize,
    slots: usize,
    cells: Vec<Option<usize>>,
}

impl Schedule {
    pub fn empty(rooms: usize, slots: usize) -> Self {
        Self {
            rooms,
            slots,
            cells: vec![None; rooms * slots],
        }
    }

    pub fn rooms(&self) -> usize {
        self.rooms
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn index(&self, cell: Cell) -> Result<usize, ScheduleError> {
        if cell.room < self.rooms && cell.slot < self.slots {
            Ok(cell.room * self.slots + cell.slot)
        } else {
            Err(ScheduleError::OutOfBounds {
                room: cell.room,
                slot: cell.slot,
                rooms: self.rooms,
                slots: self.slots,
            })
        }
    }

    fn cell_at(&self, index: usize) -> Cell {
        Cell {
            room: index / self.slots,
            slot: index % self.slots,
        }
    }

    pub fn get(&self, cell: Cell) -> Result<Option<usize>, ScheduleError> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// Course at `cell`, or `None` when the cell is empty or out of range.
    pub fn occupant(&self, cell: Cell) -> Option<usize> {
        self.get(cell).ok().flatten()
    }

    /// True only for an in-range cell holding the empty sentinel.
    pub fn is_vacant(&self, cell: Cell) -> bool {
        matches!(self.get(cell), Ok(None))
    }

    /// Writes `course` into an empty cell. Never overwrites.
    pub fn place(&mut self, cell: Cell, course: usize) -> Result<(), ScheduleError> {
        let i = self.index(cell)?;
        if let Some(existing) = self.cells[i] {
            return Err(ScheduleError::Occupied {
                room: cell.room,
                slot: cell.slot,
                course: existing,
            });
        }
        self.cells[i] = Some(course);
        Ok(())
    }

    /// Like [`Schedule::place`] but reports failure as `false`.
    pub fn try_place(&mut self, cell: Cell, course: usize) -> bool {
        self.place(cell, course).is_ok()
    }

    /// Empties `cell` and returns what it held.
    pub fn clear(&mut self, cell: Cell) -> Result<Option<usize>, ScheduleError> {
        let i = self.index(cell)?;
        Ok(self.cells[i].take())
    }

    pub fn swap(&mut self, a: Cell, b: Cell) -> Result<(), ScheduleError> {
        let ia = self.index(a)?;
        let ib = self.index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Option<usize>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (self.cell_at(i), *c))
    }

    /// Occupied cells in row-major order.
    pub fn placements(&self) -> impl Iterator<Item = (Cell, usize)> + '_ {
        self.iter().filter_map(|(cell, c)| c.map(|course| (cell, course)))
    }

    pub fn placed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// First cell holding `course`, if any.
    pub fn locate(&self, course: usize) -> Option<Cell> {
        self.placements()
            .find(|&(_, c)| c == course)
            .map(|(cell, _)| cell)
    }

    /// Sorted cell contents. Equal for two grids iff one is a permutation of the other.
    pub fn occupants(&self) -> Vec<Option<usize>> {
        let mut v = self.cells.clone();
        v.sort_unstable();
        v
    }
}
