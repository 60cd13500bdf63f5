//! Simulation driver: a fixed number of select/observe/update steps per
//! exploration rate, each run independent of the others.

use crate::epsilon_greedy::EpsilonGreedy;
use crate::error::BanditError;
use chrono::{DateTime, Utc};
use petrodash_core::RewardMode;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub steps: usize,
    pub reward_mode: RewardMode,
    /// Base seed; run `i` of a sweep uses `seed + i`. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            steps: 1000,
            reward_mode: RewardMode::StepIndexed,
            seed: None,
        }
    }
}

/// Final estimator state of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanditRun {
    pub run_id: Uuid,
    pub algorithm: String,
    pub epsilon: f64,
    pub steps: usize,
    pub reward_mode: RewardMode,
    /// Times each arm was selected.
    pub counts: Vec<u64>,
    /// Value estimate of each arm.
    pub values: Vec<f64>,
    /// `counts[i] * values[i]`.
    pub weighted: Vec<f64>,
    pub cumulative_reward: f64,
    pub cumulative_regret: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BanditRun {
    pub fn total_pulls(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Run one estimator for `steps` steps.
///
/// In [`RewardMode::StepIndexed`] step `i` observes record `i` whatever arm
/// was selected, so `rewards` must hold at least `steps` records.
pub fn run<R: Rng>(
    rewards: &[f64],
    epsilon: f64,
    steps: usize,
    mode: RewardMode,
    rng: R,
) -> Result<BanditRun, BanditError> {
    let started_at = Utc::now();
    let mut estimator = EpsilonGreedy::new(rewards, epsilon, rng)?;
    let mut cumulative_reward = 0.0;
    let mut cumulative_regret = 0.0;

    for step in 0..steps {
        let arm = estimator.select_action();
        let obs = match mode {
            RewardMode::StepIndexed => estimator.observe(step)?,
            RewardMode::ArmIndexed => estimator.observe(arm)?,
        };
        estimator.update(arm, obs.reward)?;
        cumulative_reward += obs.reward;
        cumulative_regret += obs.regret;
    }

    let (counts, values) = estimator.into_parts();
    let weighted = counts
        .iter()
        .zip(values.iter())
        .map(|(n, q)| *n as f64 * q)
        .collect();

    debug!(epsilon, steps, cumulative_regret, "Bandit run finished");

    Ok(BanditRun {
        run_id: Uuid::new_v4(),
        algorithm: EpsilonGreedy::<R>::name().to_string(),
        epsilon,
        steps,
        reward_mode: mode,
        counts,
        values,
        weighted,
        cumulative_reward,
        cumulative_regret,
        started_at,
        finished_at: Utc::now(),
    })
}

/// One independent run per epsilon over the same reward sequence.
pub fn sweep(
    rewards: &[f64],
    epsilons: &[f64],
    settings: &SimulationSettings,
) -> Result<Vec<BanditRun>, BanditError> {
    let runs = epsilons
        .iter()
        .enumerate()
        .map(|(i, &epsilon)| {
            let rng = match settings.seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64)),
                None => ChaCha8Rng::from_entropy(),
            };
            run(rewards, epsilon, settings.steps, settings.reward_mode, rng)
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        runs = runs.len(),
        arms = rewards.len(),
        steps = settings.steps,
        mode = ?settings.reward_mode,
        "Epsilon-greedy sweep complete"
    );
    Ok(runs)
}
