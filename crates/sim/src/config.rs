use crate::SimError;
use minislot_core::REEL_COUNT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopOrder {
    LeftToRight,
    RightToLeft,
    /// Each spin stops its reels in a seeded random order.
    Shuffled,
}

impl StopOrder {
    pub fn parse(raw: &str) -> Result<Self, SimError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ltr" | "left" | "left_to_right" => Ok(Self::LeftToRight),
            "rtl" | "right" | "right_to_left" => Ok(Self::RightToLeft),
            "shuffle" | "shuffled" | "random" => Ok(Self::Shuffled),
            other => Err(SimError::StopOrder(other.to_string())),
        }
    }

    pub fn fixed_sequence(self) -> Option<[usize; REEL_COUNT]> {
        match self {
            Self::LeftToRight => Some([0, 1, 2]),
            Self::RightToLeft => Some([2, 1, 0]),
            Self::Shuffled => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub seed: u64,
    pub spins: u32,
    pub stop_order: StopOrder,
    /// Frames to let the reels run before the first stop and between stops.
    pub frames_between_stops: u32,
    /// Raise the starting score so every requested spin can be paid for.
    pub fund_spins: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            spins: 1_000,
            stop_order: StopOrder::LeftToRight,
            frames_between_stops: 12,
            fund_spins: true,
        }
    }
}
