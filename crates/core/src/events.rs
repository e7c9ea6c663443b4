use crate::{LineWin, ReelFaces, SpinKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    SpinStarted {
        spin: u32,
        kind: SpinKind,
        cost: i64,
        score: i64,
    },
    ReelStopping { reel: usize },
    ReelStopped { reel: usize, faces: ReelFaces },
    SpinResolved {
        spin: u32,
        wins: Vec<LineWin>,
        payout: i64,
        score: i64,
    },
    BonusTriggered { spin: u32 },
    BonusEntered { spins: u32 },
    BonusEnded,
    SessionReset { score: i64 },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
