use serde::Serialize;

use super::Conciseness;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStrategy {
    /// Every chunk goes into a single combine call.
    Stuff,
    /// Each chunk is summarized on its own, then the partial summaries are combined.
    MapReduce,
}

impl SummaryStrategy {
    /// Short inputs, or a conciseness above the single-pass threshold, are
    /// summarized in one call regardless of the other factor.
    pub fn select(total_chars: usize, conciseness: Conciseness, stuff_threshold: usize) -> Self {
        if total_chars < stuff_threshold || conciseness.forces_single_pass() {
            Self::Stuff
        } else {
            Self::MapReduce
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stuff => "stuff",
            Self::MapReduce => "map_reduce",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    Concise,
    Detailed,
}

impl PromptStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concise => "concise",
            Self::Detailed => "detailed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub text: String,
    pub strategy: SummaryStrategy,
    pub style: PromptStyle,
    pub chunk_count: usize,
}
