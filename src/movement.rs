use crate::model::{Maze, Position};
use crate::timer::RunTimer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { timer_started: bool, reached_goal: bool },
    Blocked,
}

/// Target cell of a step, if it is inside the grid and open.
pub fn step_target(maze: &Maze, direction: Direction) -> Option<Position> {
    let (dx, dy) = direction.delta();
    let from = maze.player();
    let nx = from.x as i64 + dx;
    let ny = from.y as i64 + dy;
    if !maze.grid().in_bounds(nx, ny) {
        return None;
    }
    let to = Position::new(nx as u32, ny as u32);
    maze.grid().is_passage(to).then_some(to)
}

/// Applies one step. A blocked step leaves maze, trail and timer untouched.
pub fn apply_move(maze: &mut Maze, timer: &mut RunTimer, now_ms: f64, direction: Direction) -> MoveOutcome {
    let Some(to) = step_target(maze, direction) else {
        return MoveOutcome::Blocked;
    };
    let from = maze.player;
    maze.trail.push(from);
    let timer_started = timer.start(now_ms);
    maze.player = to;
    MoveOutcome::Moved { timer_started, reached_goal: maze.at_goal() }
}
