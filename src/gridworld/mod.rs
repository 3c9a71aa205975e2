//! Reference grid world used to exercise the agent.
//!
//! Implements [`Environment`](crate::ports::Environment),
//! [`Simulator`](crate::ports::Simulator), and
//! [`GridTopology`](crate::ports::GridTopology) over text layouts.

pub mod game;
pub mod layout;

pub use game::{DEFAULT_SCARED_TIME, Ghost, GridState, GridWorld};
pub use layout::{BUILTIN_LAYOUTS, Layout};
