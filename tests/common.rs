//! Common test utilities for the gridq test suite.
//!
//! `Scripted` is an environment whose states spell out everything the agent
//! can ask about, so each test controls legal actions, food, capsules, and
//! entities directly.

#![allow(dead_code)]

use std::collections::HashSet;

use gridq::{Direction, Position, ports::Environment};

/// A fully described snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub position: Position,
    pub actions: Vec<Direction>,
    pub win: bool,
    pub lose: bool,
    pub food: Vec<Position>,
    pub capsules: Vec<Position>,
    pub entities: Vec<Position>,
}

impl Snapshot {
    /// Agent at `(x, y)` with the given legal actions and nothing else.
    pub fn at(x: i32, y: i32, actions: &[Direction]) -> Self {
        Self {
            position: Position::new(x, y),
            actions: actions.to_vec(),
            win: false,
            lose: false,
            food: Vec::new(),
            capsules: Vec::new(),
            entities: Vec::new(),
        }
    }

    pub fn with_food_here(mut self) -> Self {
        self.food.push(self.position);
        self
    }

    pub fn with_capsule_here(mut self) -> Self {
        self.capsules.push(self.position);
        self
    }

    pub fn with_entity_here(mut self) -> Self {
        self.entities.push(self.position);
        self
    }

    pub fn won(mut self) -> Self {
        self.win = true;
        self
    }

    pub fn lost(mut self) -> Self {
        self.lose = true;
        self
    }
}

/// Environment that reads every answer straight off the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scripted;

impl Environment for Scripted {
    type State = Snapshot;

    fn legal_actions(&self, state: &Snapshot) -> Vec<Direction> {
        state.actions.clone()
    }

    fn is_win(&self, state: &Snapshot) -> bool {
        state.win
    }

    fn is_lose(&self, state: &Snapshot) -> bool {
        state.lose
    }

    fn agent_position(&self, state: &Snapshot) -> Position {
        state.position
    }

    fn has_food_at(&self, state: &Snapshot, position: Position) -> bool {
        state.food.contains(&position)
    }

    fn capsule_positions(&self, state: &Snapshot) -> HashSet<Position> {
        state.capsules.iter().copied().collect()
    }

    fn other_entity_positions(&self, state: &Snapshot) -> Vec<Position> {
        state.entities.clone()
    }
}

pub const ALL_MOVES: [Direction; 5] = Direction::ALL;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
