use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BanditError {
    #[error("reward sequence is empty")]
    EmptyRewards,

    #[error("step {step} is past the end of the reward sequence (len {len})")]
    StepOutOfRange { step: usize, len: usize },

    #[error("arm {arm} does not exist (arm count {len})")]
    ArmOutOfRange { arm: usize, len: usize },

    #[error("expected {expected} initial values, got {actual}")]
    ArmCountMismatch { expected: usize, actual: usize },
}
