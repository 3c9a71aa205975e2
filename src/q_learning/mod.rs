//! Q-learning with tabular and linear value representations
//!
//! ## Representations
//!
//! - **Tabular** ([`QTable`]): exact values keyed by (position, next position)
//! - **Linear** ([`LinearEstimator`]): Q(s,a) = w · f(s,a) over named features
//!
//! Both implement [`ValueSource`](crate::ports::ValueSource) and are wrapped
//! in [`Estimator`], which [`QLearningAgent`] drives.
//!
//! ## Usage Example
//!
//! ```no_run
//! use gridq::{
//!     gridworld::GridWorld,
//!     q_learning::{Bootstrap, Estimator, QLearningAgent, QTable, RewardSchedule},
//! };
//!
//! let table = QTable::new(0.2, Bootstrap::Current, RewardSchedule::default());
//! let agent: QLearningAgent<GridWorld> = QLearningAgent::new(
//!     Estimator::Tabular(table),
//!     0.05, // epsilon
//!     100,  // num_training
//! )
//! .with_seed(7);
//! ```

pub mod agent;
pub mod estimator;
pub mod linear;
pub mod policy;
pub mod q_table;
pub mod reward;

// Public re-exports
pub use agent::QLearningAgent;
pub use estimator::Estimator;
pub use linear::{LinearEstimator, WeightVector};
pub use policy::{choose_action, choose_action_with_draw};
pub use q_table::{Bootstrap, QTable};
pub use reward::RewardSchedule;
