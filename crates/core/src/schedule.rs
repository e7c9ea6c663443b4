use crate::{
    DrawMode, ForcedWin, MachineConfig, PaylineId, ReelFaces, RngState, Row, SpinKind, SpinPlan,
    SymbolId, SymbolTable, REEL_COUNT,
};
use serde::{Deserialize, Serialize};

/// Upper bound on redraws when breaking up an accidental column match.
pub const MAX_REDRAWS: u32 = 32;

/// Hidden counters that bias upcoming spins. One per machine instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleState {
    pub spins_since_small_win: u32,
    pub small_win_target: u32,
    pub global_spins: u32,
    pub spins_since_bonus_check: u32,
    pub bonus_target: u32,
    pub bonus_active: bool,
    pub bonus_remaining: u32,
    pub bonus_pending: bool,
}

impl ScheduleState {
    pub fn new(config: &MachineConfig, rng: &mut RngState) -> Self {
        let small_win_target =
            rng.range_inclusive(config.small_win.gap.min, config.small_win.gap.max);
        let bonus_target = config
            .bonus
            .as_ref()
            .map(|bonus| rng.range_inclusive(bonus.gap.min, bonus.gap.max))
            .unwrap_or(0);
        Self {
            spins_since_small_win: 0,
            small_win_target,
            global_spins: 0,
            spins_since_bonus_check: 0,
            bonus_target,
            bonus_active: false,
            bonus_remaining: 0,
            bonus_pending: false,
        }
    }

    pub fn draw_mode(&self) -> DrawMode {
        if self.bonus_active {
            DrawMode::Bonus
        } else {
            DrawMode::Normal
        }
    }

    pub fn spins_until_small_win(&self) -> u32 {
        self.small_win_target.saturating_sub(self.spins_since_small_win)
    }

    /// Called when a resolved spin paid out on at least one line.
    pub fn record_win(&mut self, config: &MachineConfig, rng: &mut RngState) {
        if !config.reset_pity_on_win {
            return;
        }
        self.reset_small_win(config, rng);
    }

    pub fn prepare_spin(
        &mut self,
        config: &MachineConfig,
        table: &SymbolTable,
        rng: &mut RngState,
    ) -> SpinPlan {
        self.global_spins = self.global_spins.saturating_add(1);
        if self.bonus_pending {
            self.bonus_pending = false;
            if let Some(bonus) = &config.bonus {
                self.enter_bonus(bonus.spins);
            }
        }

        let mode = self.draw_mode();
        let (kind, forced_symbol) = self.next_kind(config, table, rng);
        let mut plan = match forced_symbol {
            Some(symbol) => forced_plan(config, table, mode, symbol, rng),
            None => random_plan(table, mode, rng),
        };
        plan.kind = kind;
        if !config.paylines.has_verticals() {
            break_vertical_triples(&mut plan, table, mode, rng);
        }
        log::debug!(
            "spin {}: {:?}, next small win in {}",
            self.global_spins,
            plan.kind,
            self.spins_until_small_win()
        );
        plan
    }

    fn next_kind(
        &mut self,
        config: &MachineConfig,
        table: &SymbolTable,
        rng: &mut RngState,
    ) -> (SpinKind, Option<SymbolId>) {
        if self.bonus_active {
            self.bonus_remaining = self.bonus_remaining.saturating_sub(1);
            let remaining = self.bonus_remaining;
            let symbol = config
                .bonus
                .as_ref()
                .and_then(|bonus| rng.pick(&bonus.symbols))
                .unwrap_or(0);
            if remaining == 0 {
                self.exit_bonus(config, rng);
            }
            return (SpinKind::Bonus { remaining }, Some(symbol));
        }

        if let Some(bonus) = &config.bonus {
            self.spins_since_bonus_check = self.spins_since_bonus_check.saturating_add(1);
            if self.spins_since_bonus_check >= self.bonus_target {
                self.bonus_pending = true;
                log::info!("bonus triggered on spin {}", self.global_spins);
                return (SpinKind::BonusTrigger, Some(bonus.trigger_symbol));
            }
        }

        if self.global_spins >= config.jackpot.every {
            let symbol = rng.pick(&config.jackpot.symbols).unwrap_or(0);
            self.global_spins = 0;
            self.reset_small_win(config, rng);
            if let Some(bonus) = &config.bonus {
                self.bonus_target = rng.range_inclusive(bonus.gap.min, bonus.gap.max);
            }
            return (SpinKind::Jackpot, Some(symbol));
        }

        if self.spins_since_small_win >= self.small_win_target {
            let symbol = rng
                .pick(&config.small_win.symbols)
                .unwrap_or_else(|| table.draw(DrawMode::Normal, rng));
            self.reset_small_win(config, rng);
            return (SpinKind::SmallWin, Some(symbol));
        }

        self.spins_since_small_win = self.spins_since_small_win.saturating_add(1);
        (SpinKind::Random, None)
    }

    pub fn enter_bonus(&mut self, spins: u32) {
        self.bonus_active = true;
        self.bonus_remaining = spins;
        log::info!("bonus mode entered: {spins} spins");
    }

    fn exit_bonus(&mut self, config: &MachineConfig, rng: &mut RngState) {
        self.bonus_active = false;
        self.bonus_remaining = 0;
        self.spins_since_bonus_check = 0;
        if let Some(bonus) = &config.bonus {
            self.bonus_target = rng.range_inclusive(bonus.gap.min, bonus.gap.max);
        }
        log::info!("bonus mode ended, next check in {}", self.bonus_target);
    }

    fn reset_small_win(&mut self, config: &MachineConfig, rng: &mut RngState) {
        self.spins_since_small_win = 0;
        self.small_win_target =
            rng.range_inclusive(config.small_win.gap.min, config.small_win.gap.max);
    }
}

fn random_faces(table: &SymbolTable, mode: DrawMode, rng: &mut RngState) -> ReelFaces {
    let top = table.draw(mode, rng);
    let center = table.draw(mode, rng);
    let bottom = table.draw(mode, rng);
    ReelFaces::new(top, center, bottom)
}

fn random_plan(table: &SymbolTable, mode: DrawMode, rng: &mut RngState) -> SpinPlan {
    let mut reels = [ReelFaces::default(); REEL_COUNT];
    for faces in &mut reels {
        *faces = random_faces(table, mode, rng);
    }
    SpinPlan::from_reels(reels)
}

fn forced_plan(
    config: &MachineConfig,
    table: &SymbolTable,
    mode: DrawMode,
    symbol: SymbolId,
    rng: &mut RngState,
) -> SpinPlan {
    let line = rng
        .pick(config.paylines.lines())
        .unwrap_or(PaylineId::CenterRow);
    let mut plan = random_plan(table, mode, rng);
    for (reel, row) in line.path() {
        plan.set_cell(reel, row, symbol);
    }
    plan.forced = Some(ForcedWin { line, symbol });
    plan
}

/// Makes sure no reel shows one symbol in all three rows. Cells on the forced
/// line are never touched.
fn break_vertical_triples(
    plan: &mut SpinPlan,
    table: &SymbolTable,
    mode: DrawMode,
    rng: &mut RngState,
) {
    let forced_line = plan.forced.map(|forced| forced.line);
    for reel in 0..REEL_COUNT {
        let faces = plan.reels[reel];
        if !faces.is_vertical_triple() {
            continue;
        }
        let Some(row) = redraw_row(reel, forced_line) else {
            continue;
        };
        let repeated = faces.center;
        let mut replacement = None;
        for _ in 0..MAX_REDRAWS {
            let candidate = table.draw(mode, rng);
            if candidate != repeated {
                replacement = Some(candidate);
                break;
            }
        }
        let symbol = replacement.unwrap_or_else(|| {
            log::warn!("reel {reel}: redraw limit hit, stepping symbol {repeated}");
            (repeated + 1) % table.len().max(1)
        });
        plan.set_cell(reel, row, symbol);
    }
}

fn redraw_row(reel: usize, forced_line: Option<PaylineId>) -> Option<Row> {
    let on_line = |row: Row| forced_line.is_some_and(|line| line.contains(reel, row));
    if !on_line(Row::Center) {
        return Some(Row::Center);
    }
    Row::ALL.into_iter().find(|row| !on_line(*row))
}
