use crate::{KindCounts, SimConfig, SimError, SimReport, StopOrder, SymbolWinRecord};
use minislot_core::{
    Event, EventBus, MachineConfig, RngState, SlotSession, SpinKind, SpinOutcome, REEL_COUNT,
};

const ORDER_SEED_SALT: u64 = 0x5EED_0F_0DE5;

#[derive(Debug)]
pub struct Simulator {
    pub session: SlotSession,
    pub events: EventBus,
    order_rng: RngState,
}

impl Simulator {
    pub fn new(machine: MachineConfig, seed: u64) -> Result<Self, SimError> {
        Ok(Self {
            session: SlotSession::new(machine, seed)?,
            events: EventBus::default(),
            order_rng: RngState::from_seed(seed ^ ORDER_SEED_SALT),
        })
    }

    /// One full spin: start, let the reels run, stop them in `order`, settle.
    pub fn play_spin(&mut self, order: StopOrder, frames: u32) -> Result<SpinOutcome, SimError> {
        self.session.start_spin(&mut self.events)?;
        for index in self.stop_sequence(order) {
            for _ in 0..frames {
                if let Some(outcome) = self.session.tick(&mut self.events) {
                    return Ok(outcome);
                }
            }
            self.session.stop_reel(index, &mut self.events)?;
        }
        Ok(self.session.settle(&mut self.events)?)
    }

    fn stop_sequence(&mut self, order: StopOrder) -> [usize; REEL_COUNT] {
        if let Some(sequence) = order.fixed_sequence() {
            return sequence;
        }
        let mut sequence = [0, 1, 2];
        for idx in (1..REEL_COUNT).rev() {
            let swap = self.order_rng.index(idx + 1);
            sequence.swap(idx, swap);
        }
        sequence
    }
}

pub fn simulate(config: &SimConfig, mut machine: MachineConfig) -> Result<SimReport, SimError> {
    let cost = machine.spin_cost.max(0);
    if config.fund_spins {
        let needed = cost.saturating_mul(i64::from(config.spins));
        machine.starting_score = machine.starting_score.max(needed);
    }
    let starting_score = machine.starting_score;
    let mut sim = Simulator::new(machine, config.seed)?;

    let mut symbols: Vec<SymbolWinRecord> = sim
        .session
        .table
        .iter()
        .map(|symbol| SymbolWinRecord {
            symbol: symbol.id,
            key: symbol.key.clone(),
            name: symbol.display_name.clone(),
            line_wins: 0,
            payout: 0,
        })
        .collect();
    let mut kinds = KindCounts::default();
    let mut spins = 0u32;
    let mut winning_spins = 0u32;
    let mut line_wins = 0u32;
    let mut total_payout = 0i64;
    let mut bonus_rounds = 0u32;
    let mut drought = 0u32;
    let mut max_drought = 0u32;
    let mut ended_early = None;

    for _ in 0..config.spins {
        if !sim.session.can_afford_spin() {
            log::info!(
                "simulation out of score after {spins} spins (score {})",
                sim.session.score()
            );
            ended_early = Some(format!(
                "out of score after {spins} spins (score {}, cost {cost})",
                sim.session.score()
            ));
            break;
        }
        let outcome = sim.play_spin(config.stop_order, config.frames_between_stops)?;
        spins += 1;
        match outcome.kind {
            SpinKind::Random => kinds.random += 1,
            SpinKind::SmallWin => kinds.small_win += 1,
            SpinKind::Jackpot => kinds.jackpot += 1,
            SpinKind::BonusTrigger => kinds.bonus_trigger += 1,
            SpinKind::Bonus { .. } => kinds.bonus += 1,
        }
        if outcome.evaluation.is_win() {
            winning_spins += 1;
            drought = 0;
        } else {
            drought += 1;
            max_drought = max_drought.max(drought);
        }
        for win in &outcome.evaluation.wins {
            line_wins += 1;
            if let Some(record) = symbols.get_mut(win.symbol) {
                record.line_wins += 1;
                record.payout += win.payout;
            }
        }
        total_payout += outcome.evaluation.total;
        bonus_rounds += sim
            .events
            .drain()
            .filter(|event| matches!(event, Event::BonusEntered { .. }))
            .count() as u32;
    }

    let total_cost = cost * i64::from(spins);
    let hit_rate = if spins == 0 {
        0.0
    } else {
        f64::from(winning_spins) / f64::from(spins)
    };
    let return_ratio = if total_cost == 0 {
        0.0
    } else {
        total_payout as f64 / total_cost as f64
    };
    log::info!(
        "simulated {spins} spins: hit rate {:.3}, return {:.3}",
        hit_rate,
        return_ratio
    );
    Ok(SimReport {
        seed: config.seed,
        stop_order: config.stop_order,
        requested_spins: config.spins,
        spins,
        winning_spins,
        line_wins,
        hit_rate,
        total_cost,
        total_payout,
        return_ratio,
        starting_score,
        final_score: sim.session.score(),
        kinds,
        symbols,
        bonus_rounds,
        max_drought,
        ended_early,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffled_order_is_a_permutation() {
        let mut sim = Simulator::new(MachineConfig::classic(), 4).expect("sim");
        for _ in 0..50 {
            let mut sequence = sim.stop_sequence(StopOrder::Shuffled);
            sequence.sort_unstable();
            assert_eq!(sequence, [0, 1, 2]);
        }
    }

    #[test]
    fn play_spin_stops_in_requested_order() {
        let mut sim = Simulator::new(MachineConfig::classic(), 9).expect("sim");
        sim.play_spin(StopOrder::RightToLeft, 3).expect("spin");
        let order: Vec<usize> = sim
            .events
            .drain()
            .filter_map(|event| match event {
                Event::ReelStopping { reel } => Some(reel),
                _ => None,
            })
            .collect();
        assert_eq!(order, vec![2, 1, 0]);
        assert!(!sim.session.is_spinning());
    }
}
