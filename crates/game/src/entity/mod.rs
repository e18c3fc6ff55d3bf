mod config;
mod creature;
mod direction;
mod kind;
mod motion;
mod picking;
mod walk;

pub use config::WorldConfig;
pub use creature::{Creature, InventorySlot, MAX_MOVES};
pub use direction::Direction;
pub use kind::{AssetState, Entity, EntityId, Npc, Player};
pub use motion::{
    interpolation_fraction, screen_position, tile_to_pixels, Interpolated, Motion, WorldClock,
};
pub use picking::{occupies, screen_to_tile, Camera};
pub use walk::{SpriteFrame, Stance, WalkCycle};
