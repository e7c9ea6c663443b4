use crate::{SimError, StopOrder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KindCounts {
    pub random: u32,
    pub small_win: u32,
    pub jackpot: u32,
    pub bonus_trigger: u32,
    pub bonus: u32,
}

impl KindCounts {
    pub fn total(&self) -> u32 {
        self.random + self.small_win + self.jackpot + self.bonus_trigger + self.bonus
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolWinRecord {
    pub symbol: usize,
    pub key: String,
    pub name: String,
    pub line_wins: u32,
    pub payout: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimReport {
    pub seed: u64,
    pub stop_order: StopOrder,
    pub requested_spins: u32,
    pub spins: u32,
    pub winning_spins: u32,
    pub line_wins: u32,
    pub hit_rate: f64,
    pub total_cost: i64,
    pub total_payout: i64,
    pub return_ratio: f64,
    pub starting_score: i64,
    pub final_score: i64,
    pub kinds: KindCounts,
    pub symbols: Vec<SymbolWinRecord>,
    pub bonus_rounds: u32,
    pub max_drought: u32,
    #[serde(default)]
    pub ended_early: Option<String>,
}

impl SimReport {
    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!(
                "seed/种子: {} order/停轮顺序: {}",
                self.seed,
                stop_order_label(self.stop_order)
            ),
            format!(
                "spins/转动: {}/{} wins/中奖: {} lines/连线: {} hit_rate/命中率: {:.2}%",
                self.spins,
                self.requested_spins,
                self.winning_spins,
                self.line_wins,
                self.hit_rate * 100.0
            ),
            format!(
                "cost/花费: {} payout/派彩: {} return/回报率: {:.2}%",
                self.total_cost,
                self.total_payout,
                self.return_ratio * 100.0
            ),
            format!(
                "score/分数: {} -> {}",
                self.starting_score, self.final_score
            ),
            format!(
                "bonus_rounds/奖励回合: {} max_drought/最长未中: {}",
                self.bonus_rounds, self.max_drought
            ),
            String::new(),
            "kinds/类型:".to_string(),
            format!("  random/随机       {:>8}", self.kinds.random),
            format!("  small_win/保底    {:>8}", self.kinds.small_win),
            format!("  jackpot/大奖      {:>8}", self.kinds.jackpot),
            format!("  trigger/触发      {:>8}", self.kinds.bonus_trigger),
            format!("  bonus/奖励        {:>8}", self.kinds.bonus),
            String::new(),
            "symbols/符号:".to_string(),
        ];
        let mut any = false;
        for record in self.symbols.iter().filter(|record| record.line_wins > 0) {
            any = true;
            lines.push(format!(
                "  {:<12} lines/连线={:>6} payout/派彩={:>8}",
                record.name, record.line_wins, record.payout
            ));
        }
        if !any {
            lines.push("  (none/无)".to_string());
        }
        if let Some(reason) = self.ended_early.as_ref() {
            lines.push(String::new());
            lines.push(format!("ended early/提前结束: {reason}"));
        }
        lines.join("\n")
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn stop_order_label(order: StopOrder) -> &'static str {
    match order {
        StopOrder::LeftToRight => "left-to-right/从左到右",
        StopOrder::RightToLeft => "right-to-left/从右到左",
        StopOrder::Shuffled => "shuffled/随机",
    }
}

pub fn write_json(path: &Path, report: &SimReport) -> Result<(), SimError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, report.to_json()?)?;
    Ok(())
}

pub fn write_text(path: &Path, report: &SimReport) -> Result<(), SimError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, report.to_text_report())?;
    Ok(())
}
