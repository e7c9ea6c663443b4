use super::*;
use crate::{evaluate, Event, EventBus};

impl SlotSession {
    pub fn start_spin(&mut self, events: &mut EventBus) -> Result<SpinKind, SessionError> {
        if self.is_spinning() {
            return Err(SessionError::SpinInProgress);
        }
        if !self.can_afford_spin() {
            self.status = Status::OutOfScore;
            return Err(SessionError::InsufficientScore {
                score: self.score,
                cost: self.config.spin_cost,
            });
        }
        let cost = self.config.spin_cost.max(0);
        self.score -= cost;
        self.spin_count = self.spin_count.saturating_add(1);

        let entering_bonus = self.schedule.bonus_pending;
        let plan = self
            .schedule
            .prepare_spin(&self.config, &self.table, &mut self.rng);
        let kind = plan.kind;
        if entering_bonus && self.schedule.bonus_active {
            if let Some(bonus) = &self.config.bonus {
                events.push(Event::BonusEntered { spins: bonus.spins });
            }
        }
        self.plan = Some(plan);
        for reel in &mut self.reels {
            reel.start(&mut self.rng);
        }
        self.status = Status::Spinning;
        events.push(Event::SpinStarted {
            spin: self.spin_count,
            kind,
            cost,
            score: self.score,
        });
        Ok(kind)
    }

    /// Stops one reel. Returns `Ok(false)` when the reel is already stopping
    /// or at rest.
    pub fn stop_reel(&mut self, index: usize, events: &mut EventBus) -> Result<bool, SessionError> {
        if index >= REEL_COUNT {
            return Err(SessionError::InvalidReel(index));
        }
        let Some(plan) = self.plan.as_ref() else {
            return Err(SessionError::NotSpinning);
        };
        let faces = plan.reels[index];
        if !self.reels[index].request_stop(faces) {
            return Ok(false);
        }
        events.push(Event::ReelStopping { reel: index });
        Ok(true)
    }

    /// Stops the leftmost reel that is still spinning.
    pub fn stop_next(&mut self, events: &mut EventBus) -> Result<Option<usize>, SessionError> {
        if !self.is_spinning() {
            return Err(SessionError::NotSpinning);
        }
        let Some(index) = self.reels.iter().position(|reel| reel.is_spinning()) else {
            return Ok(None);
        };
        self.stop_reel(index, events)?;
        Ok(Some(index))
    }

    pub fn stop_all(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        for index in 0..REEL_COUNT {
            self.stop_reel(index, events)?;
        }
        Ok(())
    }

    /// A reel button: starts a spin when idle, stops that reel otherwise.
    pub fn press(&mut self, index: usize, events: &mut EventBus) -> Result<(), SessionError> {
        if index >= REEL_COUNT {
            return Err(SessionError::InvalidReel(index));
        }
        if self.is_spinning() {
            self.stop_reel(index, events)?;
        } else {
            self.start_spin(events)?;
        }
        Ok(())
    }

    /// Space/Enter: starts a spin when idle, stops the next reel otherwise.
    pub fn activate(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        if self.is_spinning() {
            self.stop_next(events)?;
        } else {
            self.start_spin(events)?;
        }
        Ok(())
    }

    /// Advances every reel by one frame. Returns the outcome on the frame the
    /// last reel comes to rest.
    pub fn tick(&mut self, events: &mut EventBus) -> Option<SpinOutcome> {
        if !self.is_spinning() {
            return None;
        }
        let mode = self.schedule.draw_mode();
        for (index, reel) in self.reels.iter_mut().enumerate() {
            if reel.tick(&self.table, mode, &mut self.rng) {
                events.push(Event::ReelStopped {
                    reel: index,
                    faces: reel.result(),
                });
            }
        }
        if self.reels.iter().all(|reel| reel.is_idle()) {
            return self.resolve(events);
        }
        None
    }

    /// Stops whatever is still spinning and ticks until the spin resolves.
    pub fn settle(&mut self, events: &mut EventBus) -> Result<SpinOutcome, SessionError> {
        if !self.is_spinning() {
            return Err(SessionError::NotSpinning);
        }
        self.stop_all(events)?;
        for _ in 0..MAX_SETTLE_FRAMES {
            if let Some(outcome) = self.tick(events) {
                return Ok(outcome);
            }
        }
        Err(SessionError::Stalled(MAX_SETTLE_FRAMES))
    }

    fn resolve(&mut self, events: &mut EventBus) -> Option<SpinOutcome> {
        let plan = self.plan.take()?;
        let evaluation = evaluate(&plan, self.config.paylines.lines(), &self.table);
        self.score += evaluation.total;
        if evaluation.is_win() {
            self.schedule.record_win(&self.config, &mut self.rng);
            self.status = Status::Win {
                lines: evaluation.wins.len(),
                symbol: evaluation.first_symbol().unwrap_or(0),
                payout: evaluation.total,
            };
        } else {
            self.status = Status::NoWin {
                hint: self.rng.index(NO_WIN_HINTS),
            };
        }
        events.push(Event::SpinResolved {
            spin: self.spin_count,
            wins: evaluation.wins.clone(),
            payout: evaluation.total,
            score: self.score,
        });
        match plan.kind {
            SpinKind::BonusTrigger => events.push(Event::BonusTriggered {
                spin: self.spin_count,
            }),
            SpinKind::Bonus { remaining: 0 } => events.push(Event::BonusEnded),
            _ => {}
        }
        let outcome = SpinOutcome {
            spin: self.spin_count,
            kind: plan.kind,
            plan,
            evaluation,
            score: self.score,
        };
        self.last_outcome = Some(outcome.clone());
        Some(outcome)
    }
}
