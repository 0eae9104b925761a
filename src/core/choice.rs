//! Alternation between the two alert sounds and the two music tracks.

use serde::{Deserialize, Serialize};

/// Which of the two configured sounds (or tracks) an interval uses.
///
/// Intervals 1, 3, 5, ... (even 0-based index) use `A`; intervals
/// 2, 4, 6, ... use `B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundChoice {
    /// First sound, used on even interval indices.
    A,
    /// Second sound, used on odd interval indices.
    B,
}

impl SoundChoice {
    /// The choice for a 0-based interval index.
    #[must_use]
    pub const fn for_interval(index: u32) -> Self {
        if index % 2 == 0 {
            Self::A
        } else {
            Self::B
        }
    }

    /// Pick between two values by this choice.
    #[must_use]
    pub fn pick<'a, T: ?Sized>(self, a: &'a T, b: &'a T) -> &'a T {
        match self {
            Self::A => a,
            Self::B => b,
        }
    }
}

impl std::fmt::Display for SoundChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternates_by_parity() {
        for index in 0..10 {
            let expected = if index % 2 == 0 {
                SoundChoice::A
            } else {
                SoundChoice::B
            };
            assert_eq!(SoundChoice::for_interval(index), expected);
        }
    }

    #[test]
    fn test_pick() {
        assert_eq!(SoundChoice::A.pick("chime", "gong"), "chime");
        assert_eq!(SoundChoice::B.pick("chime", "gong"), "gong");
    }
}
