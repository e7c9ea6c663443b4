use crate::{DrawMode, ReelFaces, RngState, SymbolId, SymbolTable};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

pub const REEL_SEGMENTS: usize = 12;
pub const REEL_RADIUS: f64 = 16.0;
pub const ANGLE_PER_SEGMENT: f64 = TAU / REEL_SEGMENTS as f64;

const STOP_DISTANCE: f64 = PI;
const SNAP_EPSILON: f64 = 0.005;
const EASE_FACTOR: f64 = 0.25;
const MIN_STOP_STEP: f64 = 0.02;
const BACKFACE_DEPTH: f64 = -5.0;
const BASE_SPEED: f64 = 0.3;
const SPEED_JITTER: f64 = 0.1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ReelPhase {
    Idle,
    Spinning,
    Stopping { target: f64 },
}

/// One 12-tile strip. Rotation is in radians and only ever grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reel {
    tiles: [SymbolId; REEL_SEGMENTS],
    rotation: f64,
    speed: f64,
    phase: ReelPhase,
    result: ReelFaces,
}

impl Reel {
    pub fn new(table: &SymbolTable, rng: &mut RngState) -> Self {
        let mut tiles = [0; REEL_SEGMENTS];
        for tile in &mut tiles {
            *tile = rng.index(table.len());
        }
        Self {
            tiles,
            rotation: 0.0,
            speed: 0.0,
            phase: ReelPhase::Idle,
            result: ReelFaces::default(),
        }
    }

    pub fn phase(&self) -> ReelPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == ReelPhase::Idle
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == ReelPhase::Spinning
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn tiles(&self) -> &[SymbolId; REEL_SEGMENTS] {
        &self.tiles
    }

    /// Faces committed by the last stop request.
    pub fn result(&self) -> ReelFaces {
        self.result
    }

    pub fn start(&mut self, rng: &mut RngState) {
        self.speed = BASE_SPEED + rng.next_f64() * SPEED_JITTER;
        self.phase = ReelPhase::Spinning;
    }

    /// Commits `faces` to the tiles that will rest in the window and starts
    /// easing toward the snap angle. Ignored unless the reel is spinning.
    pub fn request_stop(&mut self, faces: ReelFaces) -> bool {
        if self.phase != ReelPhase::Spinning {
            return false;
        }
        let target = stop_target(self.rotation);
        let center = center_tile(target);
        self.tiles[wrap(center as isize - 1)] = faces.top;
        self.tiles[center] = faces.center;
        self.tiles[wrap(center as isize + 1)] = faces.bottom;
        self.result = faces;
        self.phase = ReelPhase::Stopping { target };
        true
    }

    /// Advances one frame. Returns true on the frame the reel comes to rest.
    pub fn tick(&mut self, table: &SymbolTable, mode: DrawMode, rng: &mut RngState) -> bool {
        match self.phase {
            ReelPhase::Idle => false,
            ReelPhase::Spinning => {
                self.reroll_hidden_tiles(table, mode, rng);
                self.rotation += self.speed;
                false
            }
            ReelPhase::Stopping { target } => {
                let delta = target - self.rotation;
                if delta < SNAP_EPSILON {
                    self.rotation = target;
                    self.speed = 0.0;
                    self.phase = ReelPhase::Idle;
                    true
                } else {
                    self.rotation += (delta * EASE_FACTOR).max(MIN_STOP_STEP);
                    false
                }
            }
        }
    }

    /// What the window shows at the current rotation.
    pub fn visible(&self) -> ReelFaces {
        let center = center_tile(self.rotation);
        ReelFaces::new(
            self.tiles[wrap(center as isize - 1)],
            self.tiles[center],
            self.tiles[wrap(center as isize + 1)],
        )
    }

    fn reroll_hidden_tiles(&mut self, table: &SymbolTable, mode: DrawMode, rng: &mut RngState) {
        for (idx, tile) in self.tiles.iter_mut().enumerate() {
            if tile_depth(idx, self.rotation) < BACKFACE_DEPTH {
                *tile = table.draw(mode, rng);
            }
        }
    }
}

/// Next segment boundary at least half a turn past `rotation`.
pub fn stop_target(rotation: f64) -> f64 {
    ((rotation + STOP_DISTANCE) / ANGLE_PER_SEGMENT).ceil() * ANGLE_PER_SEGMENT
}

/// Index of the tile facing the viewer at `rotation`.
pub fn center_tile(rotation: f64) -> usize {
    let raw = ((FRAC_PI_2 - rotation) / ANGLE_PER_SEGMENT).round() as isize;
    wrap(raw)
}

fn tile_depth(index: usize, rotation: f64) -> f64 {
    REEL_RADIUS * (index as f64 * ANGLE_PER_SEGMENT + rotation).sin()
}

fn wrap(index: isize) -> usize {
    index.rem_euclid(REEL_SEGMENTS as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MachineConfig;

    fn spin_until_idle(reel: &mut Reel, table: &SymbolTable, rng: &mut RngState) -> u32 {
        let mut frames = 0;
        while !reel.tick(table, DrawMode::Normal, rng) {
            frames += 1;
            assert!(frames < 1_000, "reel never settled");
        }
        frames
    }

    #[test]
    fn stop_target_lands_on_segment_boundary_half_a_turn_ahead() {
        for rotation in [0.0, 0.1, 1.7, 12.34] {
            let target = stop_target(rotation);
            assert!(target >= rotation + PI - 1e-9);
            assert!(target < rotation + PI + ANGLE_PER_SEGMENT + 1e-9);
            let segments = target / ANGLE_PER_SEGMENT;
            assert!((segments - segments.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn center_tile_at_rest_is_quarter_turn() {
        assert_eq!(center_tile(0.0), 3);
        assert_eq!(center_tile(ANGLE_PER_SEGMENT), 2);
        assert_eq!(center_tile(4.0 * ANGLE_PER_SEGMENT), 11);
    }

    #[test]
    fn stop_request_only_accepted_while_spinning() {
        let table = MachineConfig::classic().symbol_table();
        let mut rng = RngState::from_seed(9);
        let mut reel = Reel::new(&table, &mut rng);
        assert!(!reel.request_stop(ReelFaces::new(1, 2, 3)));
        reel.start(&mut rng);
        assert!(reel.request_stop(ReelFaces::new(1, 2, 3)));
        assert!(!reel.request_stop(ReelFaces::new(4, 4, 4)));
        assert_eq!(reel.result(), ReelFaces::new(1, 2, 3));
    }

    #[test]
    fn settled_reel_shows_committed_faces() {
        let table = MachineConfig::classic().symbol_table();
        let mut rng = RngState::from_seed(21);
        let mut reel = Reel::new(&table, &mut rng);
        reel.start(&mut rng);
        for _ in 0..37 {
            reel.tick(&table, DrawMode::Normal, &mut rng);
        }
        let faces = ReelFaces::new(7, 0, 5);
        assert!(reel.request_stop(faces));
        spin_until_idle(&mut reel, &table, &mut rng);
        assert!(reel.is_idle());
        assert_eq!(reel.visible(), faces);
        assert!(!reel.tick(&table, DrawMode::Normal, &mut rng));
    }
}
