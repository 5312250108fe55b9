//! Board module - manages the game grid
//!
//! The board is a `width x (buffer + height)` grid where each cell is either
//! empty or holds the kind of the piece that locked there.
//! Uses a flat row-major vector for cache locality.
//!
//! Coordinates: (x, y) where x grows left to right and y grows downward.
//! Rows `0..buffer` are the hidden spawn buffer; the visible field is
//! `buffer..buffer + height`.

use std::fmt::Write as _;

use crate::error::EngineError;
use crate::types::{Cell, PieceKind, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_BUFFER_ROWS};

/// Widest supported board
pub const MAX_BOARD_WIDTH: u8 = 40;

/// Tallest supported visible field
pub const MAX_BOARD_HEIGHT: u8 = 100;

/// Upper bound on buffer + height so every row index fits in an `i8`
pub const MAX_TOTAL_ROWS: u16 = 120;

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    buffer: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board. Dimensions are trusted here; `GameConfig::validate`
    /// is the gate for user-supplied sizes.
    pub fn new(width: u8, height: u8, buffer: u8) -> Self {
        let rows = height as usize + buffer as usize;
        Self {
            width,
            height,
            buffer,
            cells: vec![None; width as usize * rows],
        }
    }

    /// Standard 10x20 board with a 4-row buffer
    pub fn standard() -> Self {
        Self::new(DEFAULT_BOARD_WIDTH, DEFAULT_BOARD_HEIGHT, DEFAULT_BUFFER_ROWS)
    }

    /// Rebuild a board from a row-major cell dump (e.g. a render snapshot).
    /// Returns None when the cell count does not match the dimensions.
    pub fn from_cells(width: u8, height: u8, buffer: u8, cells: Vec<Cell>) -> Option<Self> {
        let rows = height as usize + buffer as usize;
        if cells.len() != width as usize * rows {
            return None;
        }
        Some(Self {
            width,
            height,
            buffer,
            cells,
        })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    /// Visible rows
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Hidden rows above the visible field
    pub fn buffer(&self) -> u8 {
        self.buffer
    }

    /// Buffer plus visible rows
    pub fn total_rows(&self) -> u8 {
        self.height + self.buffer
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid (within bounds and empty)
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        x < 0 || x >= self.width as i8 || y < 0 || y >= self.total_rows() as i8
    }

    fn row(&self, y: usize) -> &[Cell] {
        let width = self.width as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.total_rows() as usize {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Check if a row has no locked cells
    pub fn is_row_empty(&self, y: usize) -> bool {
        if y >= self.total_rows() as usize {
            return true;
        }
        self.row(y).iter().all(|cell| cell.is_none())
    }

    /// Write a piece's cells onto the board.
    ///
    /// All cells are checked before any is written, so a failed call leaves the
    /// board untouched. Failure means the resolver let an illegal position
    /// through; callers treat it as fatal.
    pub fn place(&mut self, cells: &[(i8, i8)], kind: PieceKind) -> Result<(), EngineError> {
        if !cells.iter().all(|&(x, y)| self.is_valid(x, y)) {
            return Err(EngineError::InvalidPlacement {
                kind: kind.glyph(),
                cells: cells.to_vec(),
                board: self.dump(),
            });
        }

        for &(x, y) in cells {
            self.set(x, y, Some(kind));
        }

        Ok(())
    }

    /// Remove every full row at once and compact the grid.
    ///
    /// Rows are classified in a single pass before anything moves; rows above a
    /// cleared row fall by the number of cleared rows beneath them, keeping
    /// their relative order. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width as usize;
        let rows = self.total_rows() as usize;
        let mut write_y = rows;
        let mut cleared = 0;

        // Scan from bottom to top
        for read_y in (0..rows).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        // Clear the remaining rows at the top
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared
    }

    /// Row index of the highest locked cell, if any
    pub fn highest_occupied_row(&self) -> Option<usize> {
        (0..self.total_rows() as usize).find(|&y| !self.is_row_empty(y))
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Fill a row, leaving the listed columns empty. Handy for building
    /// scenarios in tests and benchmarks.
    pub fn fill_row_except(&mut self, y: i8, gaps: &[i8], kind: PieceKind) {
        for x in 0..self.width as i8 {
            let cell = if gaps.contains(&x) { None } else { Some(kind) };
            self.set(x, y, cell);
        }
    }

    /// ASCII rendering used in diagnostics; `.` is empty, a dashed line marks
    /// where the visible field begins.
    pub fn dump(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.total_rows() as usize * 2);
        for y in 0..self.total_rows() as usize {
            if y == self.buffer as usize {
                let _ = writeln!(out, "{}", "-".repeat(self.width as usize));
            }
            for cell in self.row(y) {
                out.push(cell.map_or('.', |k| k.glyph()));
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
