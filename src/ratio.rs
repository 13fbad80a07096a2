use serde::{Deserialize, Serialize};

use crate::types::Split;

/// Points a split is held before it flips.
const POINTS_PER_SPLIT: u8 = 2;

/// Majority split plus the number of points played since it last changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioState {
    pub current_split: Split,
    pub points_since_split_change: u8,
}

impl RatioState {
    /// Counters outside `0..POINTS_PER_SPLIT` are clamped to the last valid value.
    pub fn new(current_split: Split, points_since_split_change: u8) -> Self {
        Self {
            current_split,
            points_since_split_change: points_since_split_change.min(POINTS_PER_SPLIT - 1),
        }
    }

    pub fn advance(self) -> Self {
        if self.points_since_split_change >= POINTS_PER_SPLIT - 1 {
            Self::new(self.current_split.flipped(), 0)
        } else {
            Self::new(self.current_split, self.points_since_split_change + 1)
        }
    }

    /// Exact inverse of [`RatioState::advance`].
    pub fn retreat(self) -> Self {
        if self.points_since_split_change >= 1 {
            Self::new(self.current_split, self.points_since_split_change - 1)
        } else {
            Self::new(self.current_split.flipped(), POINTS_PER_SPLIT - 1)
        }
    }
}
