use serde::{Deserialize, Serialize};

use crate::error::LineupError;
use crate::types::Split;

const DEFAULT_FIELD_SIZE: usize = 7;
const DEFAULT_MAJORITY_COUNT: usize = 4;

/// How the split evolves from the starting ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioPattern {
    /// A, A, B, B, A, A, ...
    #[default]
    Pairs,
    /// A, B, B, A, A, ...
    Abba,
}

impl RatioPattern {
    /// Counter to start a game with.
    pub fn start_counter(self) -> u8 {
        match self {
            Self::Pairs => 0,
            Self::Abba => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub field_size: usize,
    /// Players fielded from the majority partition.
    pub majority_count: usize,
    pub pattern: RatioPattern,
    pub reset_clears_team_names: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            field_size: DEFAULT_FIELD_SIZE,
            majority_count: DEFAULT_MAJORITY_COUNT,
            pattern: RatioPattern::default(),
            reset_clears_team_names: false,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), LineupError> {
        let minority = self.field_size.checked_sub(self.majority_count);
        match minority {
            Some(minority) if self.field_size > 0 && minority <= self.majority_count => Ok(()),
            _ => Err(LineupError::InvalidConfig {
                field_size: self.field_size,
                majority_count: self.majority_count,
            }),
        }
    }

    /// Returns `(count_a, count_b)` for the given split.
    pub fn counts(&self, split: Split) -> (usize, usize) {
        let minority = self.field_size.saturating_sub(self.majority_count);
        match split {
            Split::MajorityA => (self.majority_count, minority),
            Split::MajorityB => (minority, self.majority_count),
        }
    }
}
