use crate::{PaylineId, SymbolId};
use serde::{Deserialize, Serialize};

pub const REEL_COUNT: usize = 3;
pub const ROW_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Row {
    Top,
    Center,
    Bottom,
}

impl Row {
    pub const ALL: [Row; ROW_COUNT] = [Row::Top, Row::Center, Row::Bottom];

    pub fn index(self) -> usize {
        match self {
            Row::Top => 0,
            Row::Center => 1,
            Row::Bottom => 2,
        }
    }
}

/// The three symbols one reel shows once it has stopped.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReelFaces {
    pub top: SymbolId,
    pub center: SymbolId,
    pub bottom: SymbolId,
}

impl ReelFaces {
    pub fn new(top: SymbolId, center: SymbolId, bottom: SymbolId) -> Self {
        Self {
            top,
            center,
            bottom,
        }
    }

    pub fn get(&self, row: Row) -> SymbolId {
        match row {
            Row::Top => self.top,
            Row::Center => self.center,
            Row::Bottom => self.bottom,
        }
    }

    pub fn set(&mut self, row: Row, symbol: SymbolId) {
        match row {
            Row::Top => self.top = symbol,
            Row::Center => self.center = symbol,
            Row::Bottom => self.bottom = symbol,
        }
    }

    pub fn is_vertical_triple(&self) -> bool {
        self.top == self.center && self.center == self.bottom
    }

    pub fn as_array(&self) -> [SymbolId; ROW_COUNT] {
        [self.top, self.center, self.bottom]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpinKind {
    Random,
    SmallWin,
    Jackpot,
    BonusTrigger,
    Bonus { remaining: u32 },
}

impl SpinKind {
    pub fn is_forced(self) -> bool {
        !matches!(self, SpinKind::Random)
    }
}

/// A forced win written into the plan before the reels start.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForcedWin {
    pub line: PaylineId,
    pub symbol: SymbolId,
}

/// Everything the next spin will show, decided up front.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinPlan {
    pub reels: [ReelFaces; REEL_COUNT],
    pub kind: SpinKind,
    pub forced: Option<ForcedWin>,
}

impl SpinPlan {
    pub fn from_reels(reels: [ReelFaces; REEL_COUNT]) -> Self {
        Self {
            reels,
            kind: SpinKind::Random,
            forced: None,
        }
    }

    pub fn cell(&self, reel: usize, row: Row) -> SymbolId {
        self.reels[reel].get(row)
    }

    pub fn set_cell(&mut self, reel: usize, row: Row, symbol: SymbolId) {
        self.reels[reel].set(row, symbol);
    }

    pub fn cells(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.reels.iter().flat_map(|faces| faces.as_array())
    }
}
