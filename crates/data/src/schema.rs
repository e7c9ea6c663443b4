use serde::{Deserialize, Serialize};

pub use minislot_core::{
    BonusRule, GapRange, JackpotRule, MachineConfig, PaylineSet, SmallWinRule, SymbolDef,
};

/// `machine.json`: everything except the symbol table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub paylines: PaylineSet,
    #[serde(default)]
    pub spin_cost: i64,
    #[serde(default)]
    pub starting_score: i64,
    pub small_win: SmallWinRule,
    pub jackpot: JackpotRule,
    #[serde(default)]
    pub bonus: Option<BonusRule>,
    #[serde(default = "default_true")]
    pub reset_pity_on_win: bool,
}

fn default_true() -> bool {
    true
}

impl MachineFile {
    pub fn into_config(self, symbols: Vec<SymbolDef>) -> MachineConfig {
        MachineConfig {
            symbols,
            paylines: self.paylines,
            spin_cost: self.spin_cost,
            starting_score: self.starting_score,
            small_win: self.small_win,
            jackpot: self.jackpot,
            bonus: self.bonus,
            reset_pity_on_win: self.reset_pity_on_win,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Classic,
    Deluxe,
}

impl Preset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" | "eight" | "8" => Some(Self::Classic),
            "deluxe" | "five" | "5" => Some(Self::Deluxe),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Deluxe => "deluxe",
        }
    }

    pub fn config(self) -> MachineConfig {
        match self {
            Self::Classic => MachineConfig::classic(),
            Self::Deluxe => MachineConfig::deluxe(),
        }
    }
}
