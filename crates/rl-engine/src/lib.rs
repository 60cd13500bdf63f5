//! Reinforcement learning over historical fuel prices — incremental
//! epsilon-greedy estimator, reward series preparation, and the simulation
//! driver that sweeps several exploration rates over the same rewards.

pub mod epsilon_greedy;
pub mod error;
pub mod rewards;
pub mod simulation;

pub use epsilon_greedy::{EpsilonGreedy, Observation};
pub use error::BanditError;
pub use petrodash_core::RewardMode;
pub use rewards::RewardSeries;
pub use simulation::{run, sweep, BanditRun, SimulationSettings};
