//! Epsilon-greedy estimator with incremental sample-average updates
//! (Sutton & Barto, section 2.4).
//!
//! One arm per reward record. Each step either explores (uniform arm) with
//! probability `epsilon` or exploits the arm with the highest running
//! value estimate.

use crate::error::BanditError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Reward and regret observed at one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub step: usize,
    pub reward: f64,
    /// `max(rewards) - reward`.
    pub regret: f64,
}

pub struct EpsilonGreedy<'a, R: Rng> {
    rewards: &'a [f64],
    epsilon: f64,
    best_reward: f64,
    values: Vec<f64>,
    counts: Vec<u64>,
    rng: R,
}

impl<'a, R: Rng> EpsilonGreedy<'a, R> {
    /// Create an estimator with one arm per reward. `epsilon` is not
    /// validated: above 1 never exploits, below 0 never explores.
    pub fn new(rewards: &'a [f64], epsilon: f64, rng: R) -> Result<Self, BanditError> {
        if rewards.is_empty() {
            return Err(BanditError::EmptyRewards);
        }
        // f64::max skips NaN, so missing prices never become the best reward.
        let best_reward = rewards.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            rewards,
            epsilon,
            best_reward,
            values: vec![0.0; rewards.len()],
            counts: vec![0; rewards.len()],
            rng,
        })
    }

    /// Replace the zero initial value estimates.
    pub fn with_initial_values(mut self, values: &[f64]) -> Result<Self, BanditError> {
        if values.len() != self.values.len() {
            return Err(BanditError::ArmCountMismatch {
                expected: self.values.len(),
                actual: values.len(),
            });
        }
        self.values.copy_from_slice(values);
        Ok(self)
    }

    pub fn name() -> &'static str {
        "epsilon-greedy"
    }

    pub fn arm_count(&self) -> usize {
        self.values.len()
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn select_action(&mut self) -> usize {
        if self.rng.gen::<f64>() < self.epsilon {
            self.rng.gen_range(0..self.arm_count())
        } else {
            argmax(&self.values)
        }
    }

    pub fn observe(&self, step: usize) -> Result<Observation, BanditError> {
        let reward = *self
            .rewards
            .get(step)
            .ok_or(BanditError::StepOutOfRange {
                step,
                len: self.rewards.len(),
            })?;

        Ok(Observation {
            step,
            reward,
            regret: self.best_reward - reward,
        })
    }

    pub fn update(&mut self, arm: usize, reward: f64) -> Result<(), BanditError> {
        let len = self.arm_count();
        let (count, value) = match (self.counts.get_mut(arm), self.values.get_mut(arm)) {
            (Some(c), Some(v)) => (c, v),
            _ => return Err(BanditError::ArmOutOfRange { arm, len }),
        };
        *count += 1;
        *value += (reward - *value) / *count as f64;
        Ok(())
    }

    pub fn into_parts(self) -> (Vec<u64>, Vec<f64>) {
        (self.counts, self.values)
    }
}

/// Index of the largest value, lowest index on ties. A NaN estimate wins
/// immediately, matching the reference dashboard's numpy `argmax`.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if v.is_nan() {
            return i;
        }
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_empty_rewards_rejected() {
        assert_eq!(
            EpsilonGreedy::new(&[], 0.1, rng(0)).err(),
            Some(BanditError::EmptyRewards)
        );
    }

    #[test]
    fn test_incremental_update_is_exact_mean() {
        let rewards = [0.0; 4];
        let mut eg = EpsilonGreedy::new(&rewards, 0.1, rng(0)).unwrap();
        let fed = [1.5, 2.5, 4.0, 1.0, 3.25];
        for r in fed {
            eg.update(2, r).unwrap();
        }
        let mean = fed.iter().sum::<f64>() / fed.len() as f64;
        assert!((eg.values()[2] - mean).abs() < 1e-12);
        assert_eq!(eg.counts()[2], 5);
        assert_eq!(eg.counts()[0], 0);
        assert_eq!(eg.values()[0], 0.0);
    }

    #[test]
    fn test_update_unknown_arm() {
        let rewards = [1.0, 2.0];
        let mut eg = EpsilonGreedy::new(&rewards, 0.1, rng(0)).unwrap();
        assert_eq!(
            eg.update(2, 1.0),
            Err(BanditError::ArmOutOfRange { arm: 2, len: 2 })
        );
    }

    #[test]
    fn test_zero_epsilon_exploits_lowest_index_on_ties() {
        let rewards = [1.0, 2.0, 3.0];
        let mut eg = EpsilonGreedy::new(&rewards, 0.0, rng(3)).unwrap();
        for _ in 0..50 {
            assert_eq!(eg.select_action(), 0);
        }

        let mut eg = eg.with_initial_values(&[0.5, 2.0, 2.0]).unwrap();
        for _ in 0..50 {
            assert_eq!(eg.select_action(), 1);
        }
    }

    #[test]
    fn test_negative_epsilon_never_explores() {
        let rewards = [1.0, 2.0, 3.0];
        let mut eg = EpsilonGreedy::new(&rewards, -0.5, rng(9))
            .unwrap()
            .with_initial_values(&[0.0, 0.0, 7.0])
            .unwrap();
        assert!((0..100).all(|_| eg.select_action() == 2));
    }

    #[test]
    fn test_full_epsilon_ignores_values() {
        let rewards: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let preset: Vec<f64> = (0..25).map(|i| ((i * 37) % 11) as f64 - 5.0).collect();

        let mut plain = EpsilonGreedy::new(&rewards, 1.0, rng(42)).unwrap();
        let mut biased = EpsilonGreedy::new(&rewards, 1.0, rng(42))
            .unwrap()
            .with_initial_values(&preset)
            .unwrap();

        let a: Vec<usize> = (0..500).map(|_| plain.select_action()).collect();
        let b: Vec<usize> = (0..500).map(|_| biased.select_action()).collect();
        assert_eq!(a, b);
        // Uniform exploration should touch more than one arm.
        assert!(a.iter().any(|&arm| arm != a[0]));
    }

    #[test]
    fn test_epsilon_above_one_always_explores() {
        let rewards = [0.0; 8];
        let mut eg = EpsilonGreedy::new(&rewards, 3.0, rng(5))
            .unwrap()
            .with_initial_values(&[9.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
            .unwrap();
        let picks: Vec<usize> = (0..200).map(|_| eg.select_action()).collect();
        assert!(picks.iter().any(|&arm| arm != 0));
    }

    #[test]
    fn test_observe_regret_non_negative() {
        let rewards = [1.859, 1.899, 1.839, 1.999, 1.819];
        let eg = EpsilonGreedy::new(&rewards, 0.5, rng(0)).unwrap();
        for step in 0..rewards.len() {
            let obs = eg.observe(step).unwrap();
            assert_eq!(obs.reward, rewards[step]);
            assert!(obs.regret >= 0.0);
        }
        assert!(eg.observe(3).unwrap().regret.abs() < 1e-12);
    }

    #[test]
    fn test_observe_past_end() {
        let rewards = [1.0, 2.0];
        let eg = EpsilonGreedy::new(&rewards, 0.5, rng(0)).unwrap();
        assert_eq!(
            eg.observe(2),
            Err(BanditError::StepOutOfRange { step: 2, len: 2 })
        );
    }

    #[test]
    fn test_missing_reward_ignored_for_best_but_propagates_into_mean() {
        let rewards = [1.0, f64::NAN, 3.0];
        let mut eg = EpsilonGreedy::new(&rewards, 0.0, rng(0)).unwrap();
        assert_eq!(eg.observe(0).unwrap().regret, 2.0);

        let obs = eg.observe(1).unwrap();
        eg.update(1, obs.reward).unwrap();
        assert!(eg.values()[1].is_nan());
        assert_eq!(eg.select_action(), 1);
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), 1);
        assert_eq!(argmax(&[-2.0, -1.0]), 1);
        assert_eq!(argmax(&[1.0, f64::NAN, 5.0]), 1);
    }
}
