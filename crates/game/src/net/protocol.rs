use glam::IVec2;
use rkyv::{Archive, Deserialize, Serialize};

use crate::battle::BattleTurnEvent;
use crate::entity::{Creature, Direction, EntityId, InventorySlot};

pub const DEFAULT_PORT: u16 = 27015;

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct PlayerState {
    pub id: EntityId,
    pub name: String,
    pub tile: [i32; 2],
    pub pending: Option<Direction>,
    pub facing: Direction,
    pub current_chunk: u32,
    pub party: Vec<Creature>,
    pub inventory: Vec<InventorySlot>,
    pub story_progress: u32,
}

impl PlayerState {
    pub fn tile(&self) -> IVec2 {
        IVec2::from_array(self.tile)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct NpcState {
    pub id: EntityId,
    pub npc_index: u32,
    pub name: String,
    pub tile: [i32; 2],
    pub pending: Option<Direction>,
    pub facing: Direction,
    pub current_chunk: u32,
    pub party: Vec<Creature>,
}

impl NpcState {
    pub fn tile(&self) -> IVec2 {
        IVec2::from_array(self.tile)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct TalkEvent {
    pub talker_id: EntityId,
    pub target_id: EntityId,
    pub npc_index: u32,
    pub dialogue_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct SoundEvent {
    pub target_id: EntityId,
    pub sound_name: String,
    pub is_sfx: bool,
    pub interrupt: bool,
}

/// A trainer battle between two controllable entities started this tick.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct ChallengeEvent {
    pub first: EntityId,
    pub second: EntityId,
}

impl ChallengeEvent {
    pub fn involves(&self, id: EntityId) -> bool {
        self.first == id || self.second == id
    }

    pub fn opponent_of(&self, id: EntityId) -> Option<EntityId> {
        if self.first == id {
            Some(self.second)
        } else if self.second == id {
            Some(self.first)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct EncounterEvent {
    pub target_id: EntityId,
    pub creature: Creature,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct ChatMessage {
    pub sender_id: EntityId,
    pub sender_name: String,
    pub message: String,
    pub sent_at_ms: u64,
    pub global: bool,
    pub challenger: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct GroundItem {
    pub unique_id: u64,
    pub item_id: u32,
    pub amount: u32,
    pub tile: [i32; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct WorldSnapshot {
    pub viewpoint_id: Option<EntityId>,
    pub players: Vec<PlayerState>,
    pub npcs: Vec<NpcState>,
    pub connected_ids: Vec<EntityId>,
    pub talk_events: Vec<TalkEvent>,
    pub sound_events: Vec<SoundEvent>,
    pub challenge_events: Vec<ChallengeEvent>,
    pub encounter_events: Vec<EncounterEvent>,
    pub turn_events: Vec<BattleTurnEvent>,
    pub chat_messages: Vec<ChatMessage>,
    pub ground_items: Vec<GroundItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum ServerMessage {
    Snapshot(WorldSnapshot),
    Pong { timestamp_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum BattleAction {
    Attack { move_id: u32 },
    Item { inventory_index: u32 },
    Swap { party_index: u32 },
    Flee,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum ClientIntent {
    Move { tile: [i32; 2] },
    MoveAndTalk { tile: [i32; 2], target: EntityId },
    TakeItem { unique_id: u64 },
    ChallengePlayer { target: EntityId },
    AcceptChallenge { challenger: EntityId },
    ForceNpcBattle { npc: EntityId },
    HealParty { npc_index: u32 },
    BattleAction(BattleAction),
    Chat { message: String, global: bool },
    UpdateStoryProgress { progress: u32 },
    Ping { timestamp_ms: u64 },
    LogOut,
}

impl ClientIntent {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientIntent::Move { .. } => "move",
            ClientIntent::MoveAndTalk { .. } => "move_and_talk",
            ClientIntent::TakeItem { .. } => "take_item",
            ClientIntent::ChallengePlayer { .. } => "challenge_player",
            ClientIntent::AcceptChallenge { .. } => "accept_challenge",
            ClientIntent::ForceNpcBattle { .. } => "force_npc_battle",
            ClientIntent::HealParty { .. } => "heal_party",
            ClientIntent::BattleAction(_) => "battle_action",
            ClientIntent::Chat { .. } => "chat",
            ClientIntent::UpdateStoryProgress { .. } => "update_story_progress",
            ClientIntent::Ping { .. } => "ping",
            ClientIntent::LogOut => "log_out",
        }
    }
}
