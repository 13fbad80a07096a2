use serde::{Deserialize, Serialize};

/// Returns the circular run of `count` items starting at `start_index`.
///
/// Contract:
/// - Empty `seq` or zero `count` yields an empty vector.
/// - `count >= seq.len()` yields every item exactly once, still starting at
///   the cursor. The sequence is never wrapped twice.
pub fn window<T: Clone>(seq: &[T], start_index: usize, count: usize) -> Vec<T> {
    let len = seq.len();
    if len == 0 || count == 0 {
        return Vec::new();
    }

    let start = start_index % len;
    if count >= len {
        return seq[start..].iter().chain(&seq[..start]).cloned().collect();
    }

    let end = (start + count) % len;
    if start < end {
        seq[start..end].to_vec()
    } else {
        seq[start..].iter().chain(&seq[..end]).cloned().collect()
    }
}

/// Offset into one partition where the next field window begins.
///
/// Kept in `0..len` whenever the partition is non-empty, so that stepping
/// forward and back by the same count is an exact inverse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationCursor {
    pub index: usize,
}

impl RotationCursor {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    pub fn normalized(self, len: usize) -> Self {
        if len == 0 {
            Self::default()
        } else {
            Self::new(self.index % len)
        }
    }

    pub fn advanced(self, len: usize, count: usize) -> Self {
        if len == 0 {
            return Self::default();
        }
        Self::new((self.index % len + count % len) % len)
    }

    pub fn retreated(self, len: usize, count: usize) -> Self {
        if len == 0 {
            return Self::default();
        }
        Self::new((self.index % len + len - count % len) % len)
    }

    pub fn shifted(self, len: usize, forward: bool) -> Self {
        if forward {
            self.advanced(len, 1)
        } else {
            self.retreated(len, 1)
        }
    }

    /// Re-indexes after the player at `removed` left a partition that now
    /// holds `new_len` players. The player who was next up stays next up.
    pub fn after_removal(self, removed: usize, new_len: usize) -> Self {
        let mut index = self.index;
        if removed < index {
            index -= 1;
        }
        Self::new(index).normalized(new_len)
    }
}
