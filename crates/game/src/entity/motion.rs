use glam::{IVec2, Vec2};

use super::config::WorldConfig;
use super::direction::Direction;
use super::walk::WalkCycle;

/// Receipt time of the last applied snapshot. Every entity interpolates
/// against this one value, so all of them move in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldClock {
    last_snapshot_ms: f64,
}

impl WorldClock {
    pub fn new(now_ms: f64) -> Self {
        Self {
            last_snapshot_ms: now_ms,
        }
    }

    pub fn reset(&mut self, now_ms: f64) {
        self.last_snapshot_ms = now_ms;
    }

    pub fn last_snapshot_ms(&self) -> f64 {
        self.last_snapshot_ms
    }
}

pub fn interpolation_fraction(clock: WorldClock, now_ms: f64, interval_ms: f64) -> f32 {
    if interval_ms <= 0.0 {
        return 1.0;
    }
    ((now_ms - clock.last_snapshot_ms) / interval_ms).clamp(0.0, 1.0) as f32
}

pub fn tile_to_pixels(tile: IVec2, tile_size: f32) -> Vec2 {
    tile.as_vec2() * tile_size
}

pub fn screen_position(
    tile: IVec2,
    pending: Option<Direction>,
    clock: WorldClock,
    now_ms: f64,
    config: &WorldConfig,
) -> Vec2 {
    let origin = tile_to_pixels(tile, config.tile_size);
    let Some(direction) = pending else {
        return origin;
    };

    let target = tile_to_pixels(tile + direction.offset(), config.tile_size);
    let fraction = interpolation_fraction(clock, now_ms, config.snapshot_interval_ms);
    origin + (target - origin) * fraction
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Motion {
    pub tile: IVec2,
    pub pending: Option<Direction>,
    pub facing: Direction,
    pub walk: WalkCycle,
}

impl Motion {
    pub fn new(tile: IVec2, pending: Option<Direction>, facing: Direction) -> Self {
        Self {
            tile,
            pending,
            facing,
            walk: WalkCycle::new(facing),
        }
    }

    pub fn target_tile(&self) -> IVec2 {
        match self.pending {
            Some(direction) => self.tile + direction.offset(),
            None => self.tile,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.pending.is_some()
    }
}

pub trait Interpolated {
    fn motion(&self) -> &Motion;
    fn motion_mut(&mut self) -> &mut Motion;

    fn screen_position(&self, clock: WorldClock, now_ms: f64, config: &WorldConfig) -> Vec2 {
        let motion = self.motion();
        screen_position(motion.tile, motion.pending, clock, now_ms, config)
    }

    fn advance_walk(&mut self, threshold: u32) {
        let motion = self.motion_mut();
        let moving = motion.pending.is_some();
        let facing = motion.pending.unwrap_or(motion.facing);
        motion.walk.tick(moving, facing, threshold);
    }
}
