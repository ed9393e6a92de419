//! Error types for synth-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("voice index {0} out of range (0..{1})")]
    VoiceIndexOutOfRange(usize, usize),

    #[error("ADSR step index {0} out of range (0..=7)")]
    AdsrStepOutOfRange(usize),
}

pub type CoreResult<T> = Result<T, CoreError>;
