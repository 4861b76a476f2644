//! Achievement table and the engine that unlocks entries on each completed run.

use std::collections::HashSet;
use thiserror::Error;

use crate::util::{cerror, cinfo};

/// Facts about the run that just finished.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunEvent {
    pub dimension: u32,
    pub time: f64,
}

/// Counters carried across runs of one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AchievementState {
    pub completions: u32,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("run time {0} is not a finite number")]
    NonFiniteTime(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rule {
    CompletionsAtLeast(u32),
    DimensionIs(u32),
    DimensionAtLeast(u32),
    /// Maze of exactly `dimension` finished in under `seconds`.
    FastOn { dimension: u32, seconds: f64 },
}

impl Rule {
    pub fn check(&self, event: &RunEvent, state: &AchievementState) -> Result<bool, RuleError> {
        Ok(match *self {
            Rule::CompletionsAtLeast(n) => state.completions >= n,
            Rule::DimensionIs(d) => event.dimension == d,
            Rule::DimensionAtLeast(d) => event.dimension >= d,
            Rule::FastOn { dimension, seconds } => {
                if !event.time.is_finite() {
                    return Err(RuleError::NonFiniteTime(event.time));
                }
                event.dimension == dimension && event.time < seconds
            }
        })
    }
}

#[derive(Debug, PartialEq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rule: Rule,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first_steps",
        name: "First Steps",
        description: "Complete your first maze.",
        rule: Rule::CompletionsAtLeast(1),
    },
    Achievement {
        id: "medium_well_done",
        name: "Medium Well Done",
        description: "Complete a Medium (5x5) maze.",
        rule: Rule::DimensionIs(5),
    },
    Achievement {
        id: "maze_master",
        name: "Maze Master",
        description: "Complete a 7x7 or larger maze.",
        rule: Rule::DimensionAtLeast(7),
    },
    Achievement {
        id: "speed_demon",
        name: "Speed Demon",
        description: "Complete a 5x5 maze in under 15 seconds.",
        rule: Rule::FastOn { dimension: 5, seconds: 15.0 },
    },
    Achievement {
        id: "persistent_explorer",
        name: "Persistent Explorer",
        description: "Complete 10 mazes.",
        rule: Rule::CompletionsAtLeast(10),
    },
    Achievement {
        id: "quick_learner",
        name: "Quick Learner",
        description: "Complete a Small (3x3) maze in under 5 seconds.",
        rule: Rule::FastOn { dimension: 3, seconds: 5.0 },
    },
    Achievement {
        id: "labyrinth_conqueror",
        name: "Labyrinth Conqueror",
        description: "Complete an Extra Large (10x10) maze.",
        rule: Rule::DimensionIs(10),
    },
    Achievement {
        id: "legendary_mapper",
        name: "Legendary Mapper",
        description: "Complete the HUGE (100x100) maze!",
        rule: Rule::DimensionIs(100),
    },
];

pub struct AchievementEngine {
    table: &'static [Achievement],
    state: AchievementState,
    unlocked: HashSet<&'static str>,
}

impl Default for AchievementEngine {
    fn default() -> Self {
        Self::new(ACHIEVEMENTS)
    }
}

impl AchievementEngine {
    pub fn new(table: &'static [Achievement]) -> Self {
        Self { table, state: AchievementState::default(), unlocked: HashSet::new() }
    }

    pub fn state(&self) -> AchievementState {
        self.state
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Every achievement in table order with its unlocked flag, for display.
    pub fn entries(&self) -> impl Iterator<Item = (&'static Achievement, bool)> + '_ {
        self.table.iter().map(|a| (a, self.unlocked.contains(a.id)))
    }

    /// Counts the completion, then returns the achievements this run unlocked.
    pub fn record_completion(&mut self, event: RunEvent) -> Vec<&'static Achievement> {
        self.state.completions = self.state.completions.saturating_add(1);
        cinfo(&format!("completions now {}", self.state.completions));
        let mut newly = Vec::new();
        for achievement in self.table {
            if self.unlocked.contains(achievement.id) {
                continue;
            }
            match achievement.rule.check(&event, &self.state) {
                Ok(true) => {
                    cinfo(&format!("unlocked: {} - {}", achievement.id, achievement.name));
                    self.unlocked.insert(achievement.id);
                    newly.push(achievement);
                }
                Ok(false) => {}
                Err(e) => cerror(&format!("error checking achievement {}: {e}", achievement.id)),
            }
        }
        newly
    }
}
