use bitflags::bitflags;
use rkyv::{Archive, Deserialize, Serialize};

use crate::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Debug))]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum TurnAction {
    Attack { move_id: u32 },
    Item { item_id: u32 },
    Swap { party_index: u32 },
    Flee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub enum Effect {
    #[default]
    Neutral,
    Super,
    NotVery,
}

impl Effect {
    pub fn message(self) -> Option<&'static str> {
        match self {
            Effect::Neutral => None,
            Effect::Super => Some("It's super effective!"),
            Effect::NotVery => Some("It's not very effective..."),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TurnFlags: u8 {
        const BATTLE_OVER = 1 << 0;
        const ALL_FAINTED = 1 << 1;
        const PLAYER_WON = 1 << 2;
        const FLED = 1 << 3;
        const CAPTURED = 1 << 4;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct BattleTurnEvent {
    pub player_id: EntityId,
    pub mover: Side,
    pub action: TurnAction,
    pub player_vitality: u32,
    pub opponent_vitality: u32,
    pub effect: Effect,
    pub flags: u8,
}

impl BattleTurnEvent {
    pub fn new(
        player_id: EntityId,
        mover: Side,
        action: TurnAction,
        player_vitality: u32,
        opponent_vitality: u32,
    ) -> Self {
        Self {
            player_id,
            mover,
            action,
            player_vitality,
            opponent_vitality,
            effect: Effect::Neutral,
            flags: 0,
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = effect;
        self
    }

    pub fn with_flags(mut self, flags: TurnFlags) -> Self {
        self.flags = flags.bits();
        self
    }

    pub fn flags(&self) -> TurnFlags {
        TurnFlags::from_bits_truncate(self.flags)
    }

    pub fn vitality(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_vitality,
            Side::Opponent => self.opponent_vitality,
        }
    }
}
