use crate::{
    ConfigError, MachineConfig, Reel, RngState, ScheduleState, SpinEvaluation, SpinKind, SpinPlan,
    SymbolId, SymbolTable, REEL_COUNT,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod lifecycle;
mod spin;

/// Number of consolation lines a front-end should provide for `Status::NoWin`.
pub const NO_WIN_HINTS: usize = 5;

/// Frame limit for `settle`; a stopped reel needs well under a hundred.
pub const MAX_SETTLE_FRAMES: u32 = 10_000;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a spin is already in progress")]
    SpinInProgress,
    #[error("no spin in progress")]
    NotSpinning,
    #[error("invalid reel index {0}")]
    InvalidReel(usize),
    #[error("score {score} cannot cover spin cost {cost}")]
    InsufficientScore { score: i64, cost: i64 },
    #[error("reels did not settle within {0} frames")]
    Stalled(u32),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Status {
    Ready,
    Spinning,
    Win {
        lines: usize,
        symbol: SymbolId,
        payout: i64,
    },
    NoWin { hint: usize },
    OutOfScore,
}

/// Which controls a front-end should offer right now.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Controls {
    pub spin: bool,
    pub stop: [bool; REEL_COUNT],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinOutcome {
    pub spin: u32,
    pub kind: SpinKind,
    pub plan: SpinPlan,
    pub evaluation: SpinEvaluation,
    pub score: i64,
}

/// One slot machine: scheduler, reels and score.
#[derive(Debug)]
pub struct SlotSession {
    pub config: MachineConfig,
    pub table: SymbolTable,
    pub rng: RngState,
    pub schedule: ScheduleState,
    reels: [Reel; REEL_COUNT],
    plan: Option<SpinPlan>,
    score: i64,
    spin_count: u32,
    status: Status,
    last_outcome: Option<SpinOutcome>,
}
