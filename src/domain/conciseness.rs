use std::fmt;

use super::PromptStyle;

const CONCISE_WORDING_THRESHOLD: f64 = 0.7;
const SINGLE_PASS_THRESHOLD: f64 = 0.8;

/// User dial between 0.0 (most detailed) and 1.0 (most concise).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Conciseness(f64);

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConcisenessError {
    #[error("conciseness must be a finite number, got {0}")]
    NotFinite(f64),
}

impl Conciseness {
    pub const DEFAULT: Self = Self(0.5);

    /// Clamps finite values into `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, ConcisenessError> {
        if !value.is_finite() {
            return Err(ConcisenessError::NotFinite(value));
        }
        Ok(Self(value.clamp(0.0, 1.0)))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn prompt_style(&self) -> PromptStyle {
        if self.0 > CONCISE_WORDING_THRESHOLD {
            PromptStyle::Concise
        } else {
            PromptStyle::Detailed
        }
    }

    pub fn forces_single_pass(&self) -> bool {
        self.0 > SINGLE_PASS_THRESHOLD
    }
}

impl Default for Conciseness {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Conciseness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
