//! The game session: a single reducer that turns browser and network events into
//! state changes plus a list of commands for the driver to execute.
//!
//! Async results carry the load generation they were issued under; anything tagged
//! with an older generation belongs to a run that no longer exists and is dropped.

use crate::achievements::{Achievement, AchievementEngine, RunEvent};
use crate::config::{GameConfig, MAX_TRAIL_LENGTH, sanitize_dimension};
use crate::error::{ApiError, SubmitError};
use crate::input::KeyAction;
use crate::leaderboard::RankData;
use crate::model::{Grid, Maze, Position};
use crate::movement::{Direction, MoveOutcome, apply_move};
use crate::popup::{Popup, PopupContent};
use crate::timer::{Clock, RunTimer};
use crate::util::{cdebug, cerror, cinfo, cwarn};

pub const STATUS_LOADING: &str = "Loading Maze...";
pub const STATUS_SOLVING: &str = "Solving...";
pub const STATUS_SOLVED: &str = "✅ Solution Path Shown!";
pub const STATUS_NO_SOLUTION: &str = "❌ No solution found by solver.";
pub const STATUS_WON: &str = "🎉 You reached the exit! Well done! 🎉";
pub const STATUS_SAVING: &str = "Saving score…";
pub const STATUS_SAVED: &str = "Score saved!";
pub const STATUS_SAVE_FAILED: &str = "Error saving score.";
pub const STATUS_PROMPT_SAVE_FAILED: &str = "Error saving score post-prompt.";
pub const STATUS_NOT_SAVED: &str = "Score not saved (no name provided).";

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Idle,
    Loading,
    LoadFailed(String),
    Playing,
    /// Won and waiting for the automatic score submission to come back.
    Won,
    PopupOpen,
    PromptPending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOrigin {
    AutoSubmit,
    Prompted,
}

/// A finished run awaiting submission. `name` is `None` until one is known.
#[derive(Clone, Debug, PartialEq)]
pub struct RunInfo {
    pub time: f64,
    pub dimension: u32,
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    RequestLoad(u32),
    MazeFetched { generation: u64, result: Result<Grid, ApiError> },
    /// Every keydown; `None` for keys without a game action.
    Key(Option<KeyAction>),
    SolveFetched { generation: u64, result: Result<Vec<Position>, ApiError> },
    ScoreSubmitted { generation: u64, origin: SubmitOrigin, result: Result<RankData, SubmitError> },
    PopupDismissTimeout,
    PopupCloseRequested,
    PopupTransitionEnd,
    PopupCloseFallback,
    NameEntered(Option<String>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    FetchMaze { generation: u64, dimension: u32 },
    Solve { generation: u64, grid: Grid, start: Position, goal: Position },
    SubmitScore { generation: u64, origin: SubmitOrigin, name: String, time: f64, dimension: u32 },
    StartTimerRefresh,
    StopTimerRefresh,
    Redraw,
    ArmPopupDismiss(u32),
    CancelPopupDismiss,
    ArmCloseFallback(u32),
    CancelCloseFallback,
    PromptName { time: f64 },
    PersistName(String),
    NotifyAchievements(Vec<&'static Achievement>),
    PauseMusic,
    PlayWinSound,
    TryStartMusic,
}

pub struct Session {
    config: GameConfig,
    clock: Box<dyn Clock>,
    generation: u64,
    phase: Phase,
    status: String,
    dimension: u32,
    maze: Option<Maze>,
    timer: RunTimer,
    won: bool,
    run: Option<RunInfo>,
    /// A name prompt is outstanding for `run`. Survives a new load.
    awaiting_name: bool,
    popup: Popup,
    achievements: AchievementEngine,
    player_name: Option<String>,
}

impl Session {
    pub fn new(config: GameConfig, clock: Box<dyn Clock>, saved_name: Option<String>) -> Self {
        Self {
            config,
            clock,
            generation: 0,
            phase: Phase::Idle,
            status: String::new(),
            dimension: crate::config::DEFAULT_DIMENSION,
            maze: None,
            timer: RunTimer::default(),
            won: false,
            run: None,
            awaiting_name: false,
            popup: Popup::Closed,
            achievements: AchievementEngine::default(),
            player_name: saved_name.filter(|n| !n.trim().is_empty()),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn run_info(&self) -> Option<&RunInfo> {
        self.run.as_ref()
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn achievements(&self) -> &AchievementEngine {
        &self.achievements
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    /// Seconds for the live display.
    pub fn elapsed(&self) -> f64 {
        self.timer.elapsed(self.clock.now_ms())
    }

    pub fn handle(&mut self, event: SessionEvent) -> Vec<Command> {
        let mut out = Vec::new();
        match event {
            SessionEvent::RequestLoad(dimension) => self.request_load(dimension, &mut out),
            SessionEvent::MazeFetched { generation, result } => {
                if self.is_current(generation, "maze") {
                    self.maze_fetched(result, &mut out);
                }
            }
            SessionEvent::Key(action) => self.key(action, &mut out),
            SessionEvent::SolveFetched { generation, result } => {
                if self.is_current(generation, "solve") {
                    self.solve_fetched(result, &mut out);
                }
            }
            SessionEvent::ScoreSubmitted { generation, origin, result } => {
                if self.is_current(generation, "score") {
                    self.score_submitted(origin, result, &mut out);
                }
            }
            SessionEvent::PopupDismissTimeout | SessionEvent::PopupCloseRequested => {
                if self.popup.request_close() {
                    cdebug("popup closing");
                    out.push(Command::CancelPopupDismiss);
                    out.push(Command::ArmCloseFallback(self.config.close_fallback_ms));
                }
            }
            SessionEvent::PopupTransitionEnd | SessionEvent::PopupCloseFallback => {
                if let Some(content) = self.popup.complete_close() {
                    out.push(Command::CancelCloseFallback);
                    self.after_popup_closed(content, &mut out);
                }
            }
            SessionEvent::NameEntered(name) => self.name_entered(name, &mut out),
        }
        out
    }

    /// Commands that release every timer the driver may still hold.
    pub fn teardown(&mut self) -> Vec<Command> {
        self.popup.force_close();
        self.awaiting_name = false;
        vec![Command::StopTimerRefresh, Command::CancelPopupDismiss, Command::CancelCloseFallback]
    }

    fn is_current(&self, generation: u64, what: &str) -> bool {
        if generation != self.generation {
            cdebug(&format!("ignoring stale {what} result (gen {generation}, now {})", self.generation));
            return false;
        }
        true
    }

    fn request_load(&mut self, dimension: u32, out: &mut Vec<Command>) {
        let dimension = sanitize_dimension(dimension);
        if let Some(content) = self.popup.close_now() {
            cinfo("new maze requested while popup is visible, closing it");
            out.push(Command::CancelPopupDismiss);
            out.push(Command::CancelCloseFallback);
            self.after_popup_closed(content, out);
        }
        if !self.awaiting_name
            && let Some(run) = self.run.take()
        {
            cwarn(&format!("new maze requested, dropping unresolved run of {:.3}s", run.time));
        }
        self.generation += 1;
        self.dimension = dimension;
        self.maze = None;
        self.timer.reset();
        self.won = false;
        self.phase = Phase::Loading;
        self.status = STATUS_LOADING.to_string();
        cinfo(&format!("loading maze {dimension}x{dimension} (gen {})", self.generation));
        out.extend([
            Command::StopTimerRefresh,
            Command::TryStartMusic,
            Command::Redraw,
            Command::FetchMaze { generation: self.generation, dimension },
        ]);
    }

    fn maze_fetched(&mut self, result: Result<Grid, ApiError>, out: &mut Vec<Command>) {
        match result {
            Ok(grid) => {
                let maze = Maze::load(grid, MAX_TRAIL_LENGTH);
                let (start, goal) = (maze.player(), maze.goal());
                cinfo(&format!("maze loaded. start ({},{}), goal ({},{})", start.x, start.y, goal.x, goal.y));
                let instant_win = maze.at_goal();
                self.maze = Some(maze);
                self.phase = Phase::Playing;
                self.status.clear();
                out.push(Command::Redraw);
                if instant_win {
                    self.win(out);
                }
            }
            Err(e) => {
                cerror(&format!("load maze error: {e}"));
                self.maze = None;
                self.phase = Phase::LoadFailed(e.to_string());
                self.status = format!("Error loading maze: {e}");
                out.push(Command::Redraw);
            }
        }
    }

    fn key(&mut self, action: Option<KeyAction>, out: &mut Vec<Command>) {
        if self.timer.is_idle() && !self.won {
            out.push(Command::TryStartMusic);
        }
        let Some(action) = action else {
            return;
        };
        if self.phase != Phase::Playing || self.won {
            return;
        }
        match action {
            KeyAction::Move(direction) => self.move_player(direction, out),
            KeyAction::Solve => self.solve(out),
        }
    }

    fn move_player(&mut self, direction: Direction, out: &mut Vec<Command>) {
        let now = self.clock.now_ms();
        let Some(maze) = self.maze.as_mut() else {
            return;
        };
        match apply_move(maze, &mut self.timer, now, direction) {
            MoveOutcome::Blocked => {}
            MoveOutcome::Moved { timer_started, reached_goal } => {
                out.push(Command::Redraw);
                if timer_started {
                    out.push(Command::StartTimerRefresh);
                }
                if reached_goal {
                    cinfo("goal reached");
                    self.win(out);
                }
            }
        }
    }

    fn solve(&mut self, out: &mut Vec<Command>) {
        let Some(maze) = self.maze.as_mut() else {
            return;
        };
        maze.clear_solution();
        self.status = STATUS_SOLVING.to_string();
        out.push(Command::Redraw);
        out.push(Command::Solve {
            generation: self.generation,
            grid: maze.grid().clone(),
            start: maze.player(),
            goal: maze.goal(),
        });
    }

    fn solve_fetched(&mut self, result: Result<Vec<Position>, ApiError>, out: &mut Vec<Command>) {
        let Some(maze) = self.maze.as_mut() else {
            return;
        };
        match result {
            Ok(path) if !path.is_empty() => {
                maze.set_solution(path);
                self.status = STATUS_SOLVED.to_string();
            }
            Ok(_) => {
                maze.clear_solution();
                self.status = STATUS_NO_SOLUTION.to_string();
            }
            Err(e) => {
                cerror(&format!("solve maze error: {e}"));
                maze.clear_solution();
                self.status = format!("Error solving: {e}");
            }
        }
        out.push(Command::Redraw);
    }

    fn win(&mut self, out: &mut Vec<Command>) {
        let time = self.timer.stop(self.clock.now_ms());
        let dimension = self.dimension;
        self.won = true;
        self.awaiting_name = false;
        self.status = STATUS_WON.to_string();
        out.push(Command::StopTimerRefresh);
        cinfo(&format!("run finished in {time:.3}s on {dimension}x{dimension}"));

        let newly = self.achievements.record_completion(RunEvent { dimension, time });
        if !newly.is_empty() {
            out.push(Command::NotifyAchievements(newly));
        }
        out.push(Command::PauseMusic);
        out.push(Command::PlayWinSound);

        match self.player_name.clone() {
            Some(name) => {
                cinfo(&format!("submitting score for saved name '{name}'"));
                self.run = Some(RunInfo { time, dimension, name: Some(name.clone()) });
                self.phase = Phase::Won;
                out.push(Command::SubmitScore {
                    generation: self.generation,
                    origin: SubmitOrigin::AutoSubmit,
                    name,
                    time,
                    dimension,
                });
            }
            None => {
                self.run = Some(RunInfo { time, dimension, name: None });
                self.open_popup(PopupContent { time, dimension, rank: None, prompt_after: true }, out);
            }
        }
    }

    fn open_popup(&mut self, content: PopupContent, out: &mut Vec<Command>) {
        self.popup.open(content);
        self.phase = Phase::PopupOpen;
        out.push(Command::ArmPopupDismiss(self.config.popup_dismiss_ms));
    }

    fn score_submitted(&mut self, origin: SubmitOrigin, result: Result<RankData, SubmitError>, out: &mut Vec<Command>) {
        match origin {
            SubmitOrigin::AutoSubmit => {
                if self.phase != Phase::Won {
                    return;
                }
                let Some(run) = self.run.clone() else {
                    return;
                };
                let rank = match result {
                    Ok(rank) => {
                        self.status = STATUS_SAVED.to_string();
                        Some(rank)
                    }
                    Err(e) => {
                        cerror(&format!("error submitting score: {e}"));
                        self.status = STATUS_SAVE_FAILED.to_string();
                        None
                    }
                };
                self.open_popup(
                    PopupContent { time: run.time, dimension: run.dimension, rank, prompt_after: false },
                    out,
                );
            }
            SubmitOrigin::Prompted => match result {
                Ok(rank) => {
                    let name = self.player_name.as_deref().unwrap_or_default();
                    self.status = format!("Score saved as {name}! Rank: {} (size), {} (overall)", rank.size, rank.overall);
                }
                Err(e) => {
                    cerror(&format!("error submitting score after prompt: {e}"));
                    self.status = STATUS_PROMPT_SAVE_FAILED.to_string();
                }
            },
        }
    }

    fn after_popup_closed(&mut self, content: PopupContent, out: &mut Vec<Command>) {
        let pending = self.run.as_ref().is_some_and(|r| r.name.is_none());
        if content.prompt_after && pending {
            cdebug("popup closed, prompting for name");
            self.phase = Phase::PromptPending;
            self.awaiting_name = true;
            out.push(Command::PromptName { time: content.time });
        } else {
            self.run = None;
            self.phase = Phase::Idle;
        }
    }

    fn name_entered(&mut self, name: Option<String>, out: &mut Vec<Command>) {
        if !self.awaiting_name {
            return;
        }
        self.awaiting_name = false;
        if self.phase == Phase::PromptPending {
            self.phase = Phase::Idle;
        }
        let Some(run) = self.run.take() else {
            return;
        };
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        match name {
            Some(name) => {
                cinfo(&format!("name '{name}' entered, submitting score"));
                self.player_name = Some(name.clone());
                self.status = STATUS_SAVING.to_string();
                out.push(Command::PersistName(name.clone()));
                out.push(Command::SubmitScore {
                    generation: self.generation,
                    origin: SubmitOrigin::Prompted,
                    name,
                    time: run.time,
                    dimension: run.dimension,
                });
            }
            None => {
                cinfo("name prompt cancelled or empty");
                self.status = STATUS_NOT_SAVED.to_string();
            }
        }
    }
}
