//! Grid world rules: the agent eats food and capsules while ghosts wander.
//!
//! Scoring per move: -1 time penalty, +10 food, +200 scared ghost,
//! +500 for clearing the last food, -500 for meeting an active ghost.

use std::collections::{BTreeSet, HashSet};

use rand::{Rng, seq::IndexedRandom};

use crate::{
    Error, Result,
    gridworld::layout::Layout,
    ports::{Environment, GridTopology, Simulator},
    types::{Direction, Position},
};

const TIME_PENALTY: f64 = 1.0;
const FOOD_SCORE: f64 = 10.0;
const GHOST_SCORE: f64 = 200.0;
const WIN_SCORE: f64 = 500.0;
const LOSE_PENALTY: f64 = 500.0;

/// Moves a capsule keeps ghosts scared.
pub const DEFAULT_SCARED_TIME: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win,
    Lose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ghost {
    pub position: Position,
    pub start: Position,
    /// Remaining scared moves; 0 means dangerous.
    pub scared_timer: u32,
}

impl Ghost {
    pub fn is_scared(&self) -> bool {
        self.scared_timer > 0
    }
}

/// Snapshot of a game in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    agent: Position,
    food: BTreeSet<Position>,
    capsules: BTreeSet<Position>,
    ghosts: Vec<Ghost>,
    score: f64,
    outcome: Option<Outcome>,
}

impl GridState {
    pub fn agent(&self) -> Position {
        self.agent
    }

    pub fn food(&self) -> &BTreeSet<Position> {
        &self.food
    }

    pub fn capsules(&self) -> &BTreeSet<Position> {
        &self.capsules
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// A playable grid world built from a [`Layout`].
#[derive(Debug, Clone)]
pub struct GridWorld {
    layout: Layout,
    scared_time: u32,
}

impl GridWorld {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            scared_time: DEFAULT_SCARED_TIME,
        }
    }

    pub fn with_scared_time(mut self, moves: u32) -> Self {
        self.scared_time = moves;
        self
    }

    /// Resolve every ghost sharing the agent's square.
    fn resolve_collisions(state: &mut GridState) {
        for ghost in &mut state.ghosts {
            if ghost.position != state.agent {
                continue;
            }
            if ghost.is_scared() {
                state.score += GHOST_SCORE;
                ghost.position = ghost.start;
                ghost.scared_timer = 0;
            } else if state.outcome.is_none() {
                state.score -= LOSE_PENALTY;
                state.outcome = Some(Outcome::Lose);
            }
        }
    }

    fn move_ghosts<R: Rng + ?Sized>(&self, state: &mut GridState, rng: &mut R) {
        for ghost in &mut state.ghosts {
            let options = self.legal_neighbors(ghost.position);
            if let Some(next) = options.choose(rng) {
                ghost.position = *next;
            }
            ghost.scared_timer = ghost.scared_timer.saturating_sub(1);
        }
    }
}

impl Environment for GridWorld {
    type State = GridState;

    fn legal_actions(&self, state: &GridState) -> Vec<Direction> {
        if state.outcome.is_some() {
            return Vec::new();
        }
        Direction::ALL
            .into_iter()
            .filter(|direction| !self.layout.is_wall(state.agent.step(*direction)))
            .collect()
    }

    fn is_win(&self, state: &GridState) -> bool {
        state.outcome == Some(Outcome::Win)
    }

    fn is_lose(&self, state: &GridState) -> bool {
        state.outcome == Some(Outcome::Lose)
    }

    fn agent_position(&self, state: &GridState) -> Position {
        state.agent
    }

    fn has_food_at(&self, state: &GridState, position: Position) -> bool {
        state.food.contains(&position)
    }

    fn capsule_positions(&self, state: &GridState) -> HashSet<Position> {
        state.capsules.iter().copied().collect()
    }

    fn other_entity_positions(&self, state: &GridState) -> Vec<Position> {
        state.ghosts.iter().map(|ghost| ghost.position).collect()
    }
}

impl GridTopology for GridWorld {
    fn width(&self) -> i32 {
        self.layout.width()
    }

    fn height(&self) -> i32 {
        self.layout.height()
    }

    fn is_wall(&self, position: Position) -> bool {
        self.layout.is_wall(position)
    }
}

impl Simulator for GridWorld {
    fn initial_state(&self) -> GridState {
        GridState {
            agent: self.layout.agent_start(),
            food: self.layout.food().clone(),
            capsules: self.layout.capsules().clone(),
            ghosts: self
                .layout
                .ghost_starts()
                .iter()
                .map(|&start| Ghost {
                    position: start,
                    start,
                    scared_timer: 0,
                })
                .collect(),
            score: 0.0,
            outcome: None,
        }
    }

    fn apply<R: Rng + ?Sized>(
        &self,
        state: &GridState,
        action: Direction,
        rng: &mut R,
    ) -> Result<GridState> {
        if state.outcome.is_some() {
            return Err(Error::GameOver);
        }
        if !self.legal_actions(state).contains(&action) {
            return Err(Error::IllegalAction {
                action,
                position: state.agent,
            });
        }

        let mut next = state.clone();
        next.agent = self.successor_position(state.agent, action);
        next.score -= TIME_PENALTY;

        if next.food.remove(&next.agent) {
            next.score += FOOD_SCORE;
            if next.food.is_empty() {
                next.score += WIN_SCORE;
                next.outcome = Some(Outcome::Win);
                return Ok(next);
            }
        }

        if next.capsules.remove(&next.agent) {
            for ghost in &mut next.ghosts {
                ghost.scared_timer = self.scared_time;
            }
        }

        Self::resolve_collisions(&mut next);
        if next.outcome.is_none() {
            self.move_ghosts(&mut next, rng);
            Self::resolve_collisions(&mut next);
        }

        Ok(next)
    }

    fn score(&self, state: &GridState) -> f64 {
        state.score
    }
}
