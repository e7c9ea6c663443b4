use super::*;
use crate::{Event, EventBus, ReelFaces};

impl SlotSession {
    pub fn new(config: MachineConfig, seed: u64) -> Result<Self, SessionError> {
        config.validate()?;
        let table = config.symbol_table();
        let mut rng = RngState::from_seed(seed);
        let schedule = ScheduleState::new(&config, &mut rng);
        let reels = std::array::from_fn(|_| Reel::new(&table, &mut rng));
        let score = config.starting_score;
        Ok(Self {
            config,
            table,
            rng,
            schedule,
            reels,
            plan: None,
            score,
            spin_count: 0,
            status: Status::Ready,
            last_outcome: None,
        })
    }

    /// Fresh counters and score. Reels keep their tiles but come to rest.
    pub fn reset(&mut self, events: &mut EventBus) {
        self.schedule = ScheduleState::new(&self.config, &mut self.rng);
        self.reels = std::array::from_fn(|_| Reel::new(&self.table, &mut self.rng));
        self.plan = None;
        self.score = self.config.starting_score;
        self.spin_count = 0;
        self.status = Status::Ready;
        self.last_outcome = None;
        log::info!("session reset, score {}", self.score);
        events.push(Event::SessionReset { score: self.score });
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn spin_count(&self) -> u32 {
        self.spin_count
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn reels(&self) -> &[Reel; REEL_COUNT] {
        &self.reels
    }

    pub fn visible_faces(&self) -> [ReelFaces; REEL_COUNT] {
        std::array::from_fn(|idx| self.reels[idx].visible())
    }

    pub fn is_spinning(&self) -> bool {
        self.plan.is_some()
    }

    pub fn can_afford_spin(&self) -> bool {
        self.config.spin_cost <= 0 || self.score >= self.config.spin_cost
    }

    pub fn bonus_active(&self) -> bool {
        self.schedule.bonus_active
    }

    pub fn bonus_remaining(&self) -> u32 {
        self.schedule.bonus_remaining
    }

    pub fn controls(&self) -> Controls {
        if self.is_spinning() {
            return Controls {
                spin: false,
                stop: std::array::from_fn(|idx| self.reels[idx].is_spinning()),
            };
        }
        let spin = self.can_afford_spin();
        Controls {
            spin,
            stop: [spin; REEL_COUNT],
        }
    }
}
