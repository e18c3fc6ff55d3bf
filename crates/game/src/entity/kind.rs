use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};

use super::creature::{Creature, InventorySlot};
use super::motion::{Interpolated, Motion};
use crate::net::{NpcState, PlayerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssetState {
    Scheduled { at_ms: f64 },
    Requested,
    Ready,
    Unavailable,
}

impl AssetState {
    pub fn is_drawable(&self) -> bool {
        matches!(self, AssetState::Ready)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub name: String,
    pub motion: Motion,
    pub current_chunk: u32,
    pub party: Vec<Creature>,
    pub inventory: Vec<InventorySlot>,
    pub story_progress: u32,
    pub assets: AssetState,
}

impl Player {
    pub fn from_state(state: &PlayerState, assets: AssetState) -> Self {
        let mut player = Self {
            id: state.id,
            name: String::new(),
            motion: Motion::new(state.tile(), state.pending, state.facing),
            current_chunk: 0,
            party: Vec::new(),
            inventory: Vec::new(),
            story_progress: 0,
            assets,
        };
        player.apply(state);
        player
    }

    /// Copies every authoritative attribute, leaving local animation and
    /// asset state in place.
    pub fn apply(&mut self, state: &PlayerState) {
        self.name.clone_from(&state.name);
        self.motion.tile = state.tile();
        self.motion.pending = state.pending;
        self.motion.facing = state.facing;
        self.current_chunk = state.current_chunk;
        self.party.clone_from(&state.party);
        self.inventory.clone_from(&state.inventory);
        self.story_progress = state.story_progress;
    }

    pub fn lead_creature(&self) -> Option<&Creature> {
        self.party.iter().find(|c| !c.is_fainted())
    }
}

#[derive(Debug, Clone)]
pub struct Npc {
    pub id: EntityId,
    pub npc_index: u32,
    pub name: String,
    pub motion: Motion,
    pub current_chunk: u32,
    pub party: Vec<Creature>,
    pub assets: AssetState,
}

impl Npc {
    pub fn from_state(state: &NpcState, assets: AssetState) -> Self {
        let mut npc = Self {
            id: state.id,
            npc_index: state.npc_index,
            name: String::new(),
            motion: Motion::new(state.tile(), state.pending, state.facing),
            current_chunk: 0,
            party: Vec::new(),
            assets,
        };
        npc.apply(state);
        npc
    }

    pub fn apply(&mut self, state: &NpcState) {
        self.npc_index = state.npc_index;
        self.name.clone_from(&state.name);
        self.motion.tile = state.tile();
        self.motion.pending = state.pending;
        self.motion.facing = state.facing;
        self.current_chunk = state.current_chunk;
        self.party.clone_from(&state.party);
    }
}

impl Interpolated for Player {
    fn motion(&self) -> &Motion {
        &self.motion
    }

    fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }
}

impl Interpolated for Npc {
    fn motion(&self) -> &Motion {
        &self.motion
    }

    fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }
}

#[derive(Debug, Clone)]
pub enum Entity {
    Controllable(Player),
    NonControllable(Npc),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Controllable(player) => player.id,
            Entity::NonControllable(npc) => npc.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Controllable(player) => &player.name,
            Entity::NonControllable(npc) => &npc.name,
        }
    }

    pub fn party(&self) -> &[Creature] {
        match self {
            Entity::Controllable(player) => &player.party,
            Entity::NonControllable(npc) => &npc.party,
        }
    }

    pub fn current_chunk(&self) -> u32 {
        match self {
            Entity::Controllable(player) => player.current_chunk,
            Entity::NonControllable(npc) => npc.current_chunk,
        }
    }

    pub fn assets(&self) -> AssetState {
        match self {
            Entity::Controllable(player) => player.assets,
            Entity::NonControllable(npc) => npc.assets,
        }
    }

    pub fn set_assets(&mut self, state: AssetState) {
        match self {
            Entity::Controllable(player) => player.assets = state,
            Entity::NonControllable(npc) => npc.assets = state,
        }
    }

    pub fn is_controllable(&self) -> bool {
        matches!(self, Entity::Controllable(_))
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Entity::Controllable(player) => Some(player),
            Entity::NonControllable(_) => None,
        }
    }

    pub fn as_npc(&self) -> Option<&Npc> {
        match self {
            Entity::NonControllable(npc) => Some(npc),
            Entity::Controllable(_) => None,
        }
    }
}

impl Interpolated for Entity {
    fn motion(&self) -> &Motion {
        match self {
            Entity::Controllable(player) => player.motion(),
            Entity::NonControllable(npc) => npc.motion(),
        }
    }

    fn motion_mut(&mut self) -> &mut Motion {
        match self {
            Entity::Controllable(player) => player.motion_mut(),
            Entity::NonControllable(npc) => npc.motion_mut(),
        }
    }
}
