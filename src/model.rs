//! Core data models for the maze game.
//! The grid arrives from the generation service and is immutable for the run; the
//! `Maze` wraps it together with everything derived per load (player, goal, trail,
//! solution overlay).

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use crate::util::cerror;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Passage,
    Wall,
}

impl Cell {
    /// Wire encoding: 0 is a passage, every other code blocks.
    pub fn from_code(code: u8) -> Self {
        if code == 0 { Cell::Passage } else { Cell::Wall }
    }

    pub fn code(self) -> u8 {
        match self {
            Cell::Passage => 0,
            Cell::Wall => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("maze data is empty")]
    Empty,
    #[error("maze row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    size: GridSize,
    /// Row-major cells; length = width * height.
    cells: Vec<Cell>,
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, codes) in rows.iter().enumerate() {
            if codes.len() != width {
                return Err(GridError::Ragged { row, expected: width, found: codes.len() });
            }
            cells.extend(codes.iter().copied().map(Cell::from_code));
        }
        Ok(Self {
            size: GridSize { width: width as u32, height: rows.len() as u32 },
            cells,
        })
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.to_codes()
    }
}

impl Grid {
    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cols(&self) -> u32 {
        self.size.width
    }

    pub fn rows(&self) -> u32 {
        self.size.height
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.size.width as i64 && y < self.size.height as i64
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        if pos.x >= self.size.width || pos.y >= self.size.height {
            return None;
        }
        self.cells.get((pos.y * self.size.width + pos.x) as usize).copied()
    }

    pub fn is_passage(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Passage)
    }

    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size.width as usize)
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }

    /// First passage in row-major order.
    pub fn start_position(&self) -> Position {
        for y in 0..self.size.height {
            for x in 0..self.size.width {
                let p = Position::new(x, y);
                if self.is_passage(p) {
                    return p;
                }
            }
        }
        cerror("no start position (passage) found in maze data");
        Position::new(1, 1)
    }

    /// First passage scanning backwards: last row first, last column first within a row.
    pub fn goal_position(&self) -> Position {
        for y in (0..self.size.height).rev() {
            for x in (0..self.size.width).rev() {
                let p = Position::new(x, y);
                if self.is_passage(p) {
                    return p;
                }
            }
        }
        cerror("no goal position (passage) found in maze data");
        Position::new(
            self.size.width.saturating_sub(2).max(1),
            self.size.height.saturating_sub(2).max(1),
        )
    }
}

/// Recent player positions, newest first, capped at `capacity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trail {
    entries: VecDeque<Position>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity + 1), capacity }
    }

    pub fn push(&mut self, pos: Position) {
        self.entries.push_front(pos);
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.entries.iter()
    }
}

/// The grid of the current run plus the per-load derived state.
#[derive(Clone, Debug, PartialEq)]
pub struct Maze {
    grid: Grid,
    pub(crate) player: Position,
    goal: Position,
    pub(crate) trail: Trail,
    solution: Vec<Position>,
}

impl Maze {
    pub fn load(grid: Grid, trail_capacity: usize) -> Self {
        let player = grid.start_position();
        let goal = grid.goal_position();
        Self { grid, player, goal, trail: Trail::new(trail_capacity), solution: Vec::new() }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn at_goal(&self) -> bool {
        self.player == self.goal
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn solution(&self) -> &[Position] {
        &self.solution
    }

    pub fn set_solution(&mut self, path: Vec<Position>) {
        self.solution = path;
    }

    pub fn clear_solution(&mut self) {
        self.solution.clear();
    }
}
