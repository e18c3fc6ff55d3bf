use glam::{IVec2, Vec2};

use super::motion::Motion;

/// Sprites are two tiles tall and two wide, anchored at the lower-left tile,
/// so clicks on the tile above, to the right, or diagonally up-right also
/// land on the entity. A walking entity also claims its destination.
pub fn occupies(motion: &Motion, tile: IVec2) -> bool {
    const FOOTPRINT: [IVec2; 4] = [
        IVec2::new(0, 0),
        IVec2::new(0, -1),
        IVec2::new(1, 0),
        IVec2::new(1, -1),
    ];

    if FOOTPRINT.iter().any(|offset| motion.tile + *offset == tile) {
        return true;
    }
    motion.pending.is_some() && motion.target_tile() == tile
}

pub fn screen_to_tile(screen: Vec2, camera_offset: Vec2, tile_size: f32) -> IVec2 {
    ((screen - camera_offset) / tile_size).floor().as_ivec2()
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub offset: Vec2,
}

impl Camera {
    pub fn follow(target: Vec2, viewport: Vec2, bias_x: f32) -> Self {
        let offset = viewport / 2.0 - target - Vec2::new(bias_x, 0.0);
        Self { offset }
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world + self.offset
    }

    pub fn tile_at(&self, screen: Vec2, tile_size: f32) -> IVec2 {
        screen_to_tile(screen, self.offset, tile_size)
    }
}
