use rkyv::{Archive, Deserialize, Serialize};

pub const MAX_MOVES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Default, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct Creature {
    pub species_id: u32,
    pub experience: u32,
    pub vitality: u32,
    pub max_vitality: u32,
    pub moves: Vec<u32>,
}

impl Creature {
    pub fn is_fainted(&self) -> bool {
        self.vitality == 0
    }

    pub fn move_at(&self, slot: usize) -> Option<u32> {
        if slot >= MAX_MOVES {
            return None;
        }
        self.moves.get(slot).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug))]
pub struct InventorySlot {
    pub item_id: u32,
    pub amount: u32,
}
