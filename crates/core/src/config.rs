use crate::{PaylineSet, SymbolDef, SymbolId, SymbolTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("symbol table is empty")]
    NoSymbols,
    #[error("symbol at position {index} has id {id}")]
    SymbolIdMismatch { index: usize, id: SymbolId },
    #[error("all normal draw weights are zero")]
    ZeroWeights,
    #[error("{field} references unknown symbol {id}")]
    UnknownSymbol { field: &'static str, id: SymbolId },
    #[error("{field} is empty")]
    EmptySymbolSet { field: &'static str },
    #[error("{field} range {min}..={max} is reversed or zero")]
    BadRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GapRange {
    pub min: u32,
    pub max: u32,
}

impl GapRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: u32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min == 0 || self.min > self.max {
            return Err(ConfigError::BadRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmallWinRule {
    pub gap: GapRange,
    /// Empty means the forced symbol comes from the normal weighted draw.
    #[serde(default)]
    pub symbols: Vec<SymbolId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JackpotRule {
    pub every: u32,
    pub symbols: Vec<SymbolId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BonusRule {
    pub gap: GapRange,
    pub spins: u32,
    pub trigger_symbol: SymbolId,
    pub symbols: Vec<SymbolId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineConfig {
    pub symbols: Vec<SymbolDef>,
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

impl MachineConfig {
    /// The 8-line machine: columns pay, no bonus rounds, free spins.
    pub fn classic() -> Self {
        Self {
            symbols: builtin_symbols(),
            paylines: PaylineSet::WithVerticals,
            spin_cost: 0,
            starting_score: 0,
            small_win: SmallWinRule {
                gap: GapRange::new(2, 5),
                symbols: Vec::new(),
            },
            jackpot: JackpotRule {
                every: 30,
                symbols: vec![6, 7],
            },
            bonus: None,
            reset_pity_on_win: true,
        }
    }

    /// The 5-line machine with a spin cost, payouts and bonus rounds.
    pub fn deluxe() -> Self {
        Self {
            symbols: builtin_symbols(),
            paylines: PaylineSet::Standard,
            spin_cost: 10,
            starting_score: 500,
            small_win: SmallWinRule {
                gap: GapRange::new(2, 5),
                symbols: vec![0, 1],
            },
            jackpot: JackpotRule {
                every: 30,
                symbols: vec![6, 7],
            },
            bonus: Some(BonusRule {
                gap: GapRange::new(40, 60),
                spins: 20,
                trigger_symbol: 5,
                symbols: vec![3, 4, 5],
            }),
            reset_pity_on_win: true,
        }
    }

    pub fn symbol_table(&self) -> SymbolTable {
        SymbolTable::new(self.symbols.clone())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        for (index, symbol) in self.symbols.iter().enumerate() {
            if symbol.id != index {
                return Err(ConfigError::SymbolIdMismatch {
                    index,
                    id: symbol.id,
                });
            }
        }
        if self.symbols.iter().all(|s| s.weight == 0) {
            return Err(ConfigError::ZeroWeights);
        }
        self.small_win.gap.check("small_win.gap")?;
        self.check_ids("small_win.symbols", &self.small_win.symbols)?;
        if self.jackpot.every == 0 {
            return Err(ConfigError::ZeroCount {
                field: "jackpot.every",
            });
        }
        self.check_non_empty("jackpot.symbols", &self.jackpot.symbols)?;
        if let Some(bonus) = &self.bonus {
            bonus.gap.check("bonus.gap")?;
            if bonus.spins == 0 {
                return Err(ConfigError::ZeroCount {
                    field: "bonus.spins",
                });
            }
            self.check_ids("bonus.trigger_symbol", &[bonus.trigger_symbol])?;
            self.check_non_empty("bonus.symbols", &bonus.symbols)?;
        }
        Ok(())
    }

    fn check_non_empty(&self, field: &'static str, ids: &[SymbolId]) -> Result<(), ConfigError> {
        if ids.is_empty() {
            return Err(ConfigError::EmptySymbolSet { field });
        }
        self.check_ids(field, ids)
    }

    fn check_ids(&self, field: &'static str, ids: &[SymbolId]) -> Result<(), ConfigError> {
        match ids.iter().find(|id| **id >= self.symbols.len()) {
            Some(id) => Err(ConfigError::UnknownSymbol { field, id: *id }),
            None => Ok(()),
        }
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::deluxe()
    }
}

fn builtin_symbols() -> Vec<SymbolDef> {
    vec![
        SymbolDef::new(0, "blue_ball", "Blue Ball", 10, 50)
            .with_bonus_weight(20)
            .with_name("zh_CN", "蓝球"),
        SymbolDef::new(1, "bell", "Bell", 20, 35)
            .with_bonus_weight(20)
            .with_name("zh_CN", "铃铛"),
        SymbolDef::new(2, "cherry", "Cherry", 30, 25)
            .with_bonus_weight(20)
            .with_name("zh_CN", "樱桃"),
        SymbolDef::new(3, "watermelon", "Watermelon", 50, 15)
            .with_bonus_weight(18)
            .with_name("zh_CN", "西瓜"),
        SymbolDef::new(4, "block", "Block", 80, 10)
            .with_bonus_weight(14)
            .with_name("zh_CN", "方块"),
        SymbolDef::new(5, "star", "Star", 150, 5)
            .with_bonus_weight(10)
            .with_name("zh_CN", "星星"),
        SymbolDef::new(6, "red_seven", "Red Seven", 300, 3)
            .with_bonus_weight(6)
            .with_name("zh_CN", "红七"),
        SymbolDef::new(7, "blue_seven", "Blue Seven", 500, 1)
            .with_bonus_weight(3)
            .with_name("zh_CN", "蓝七"),
    ]
}
