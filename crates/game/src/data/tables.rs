use std::collections::HashMap;

use glam::IVec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub id: u32,
    pub name: String,
    pub sprite: String,
    pub kind: String,
    #[serde(default)]
    pub secondary_kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInfo {
    pub id: u32,
    pub name: String,
    pub kind: String,
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
    pub pp: u32,
}

impl MoveInfo {
    pub fn deals_damage(&self) -> bool {
        self.power.is_some_and(|p| p > 0)
    }

    /// Moves are voiced by a sound file named after them.
    pub fn sound_name(&self) -> String {
        let mut name: String = self.name.split_whitespace().collect();
        name.make_ascii_lowercase();
        name.push_str(".ogg");
        name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInfo {
    pub id: u32,
    pub name: String,
    pub examine: String,
    pub stackable: bool,
    pub sprite: String,
    #[serde(default)]
    pub captures: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcInfo {
    pub index: u32,
    pub name: String,
    pub sprite: String,
    pub talkable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicArea {
    pub name: String,
    pub music: String,
    pub top_left: [i32; 2],
    pub bottom_right: [i32; 2],
}

impl MusicArea {
    pub fn contains(&self, tile: IVec2) -> bool {
        tile.x >= self.top_left[0]
            && tile.x <= self.bottom_right[0]
            && tile.y >= self.top_left[1]
            && tile.y <= self.bottom_right[1]
    }
}

/// Static lookups. Misses are `None`, never an error.
pub trait GameData {
    fn species(&self, id: u32) -> Option<&Species>;
    fn move_info(&self, id: u32) -> Option<&MoveInfo>;
    fn item(&self, id: u32) -> Option<&ItemInfo>;
    fn npc(&self, index: u32) -> Option<&NpcInfo>;
    fn music_at(&self, tile: IVec2) -> Option<&str>;
}

pub trait AudioCatalog {
    fn duration_ms(&self, name: &str) -> Option<f64>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundLengths(pub HashMap<String, f64>);

impl SoundLengths {
    pub fn with(mut self, name: &str, duration_ms: f64) -> Self {
        self.0.insert(name.to_string(), duration_ms);
        self
    }
}

impl AudioCatalog for SoundLengths {
    fn duration_ms(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableFile {
    #[serde(default)]
    species: Vec<Species>,
    #[serde(default)]
    moves: Vec<MoveInfo>,
    #[serde(default)]
    items: Vec<ItemInfo>,
    #[serde(default)]
    npcs: Vec<NpcInfo>,
    #[serde(default)]
    music_areas: Vec<MusicArea>,
}

#[derive(Debug, Clone, Default)]
pub struct StaticTables {
    species: HashMap<u32, Species>,
    moves: HashMap<u32, MoveInfo>,
    items: HashMap<u32, ItemInfo>,
    npcs: HashMap<u32, NpcInfo>,
    music_areas: Vec<MusicArea>,
}

impl StaticTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let file: TableFile = serde_json::from_str(json)?;
        let mut tables = Self::new();
        for species in file.species {
            tables.add_species(species);
        }
        for info in file.moves {
            tables.add_move(info);
        }
        for item in file.items {
            tables.add_item(item);
        }
        for npc in file.npcs {
            tables.add_npc(npc);
        }
        tables.music_areas = file.music_areas;
        Ok(tables)
    }

    pub fn add_species(&mut self, species: Species) -> &mut Self {
        self.species.insert(species.id, species);
        self
    }

    pub fn add_move(&mut self, info: MoveInfo) -> &mut Self {
        self.moves.insert(info.id, info);
        self
    }

    pub fn add_item(&mut self, item: ItemInfo) -> &mut Self {
        self.items.insert(item.id, item);
        self
    }

    pub fn add_npc(&mut self, npc: NpcInfo) -> &mut Self {
        self.npcs.insert(npc.index, npc);
        self
    }

    pub fn add_music_area(&mut self, area: MusicArea) -> &mut Self {
        self.music_areas.push(area);
        self
    }
}

impl GameData for StaticTables {
    fn species(&self, id: u32) -> Option<&Species> {
        self.species.get(&id)
    }

    fn move_info(&self, id: u32) -> Option<&MoveInfo> {
        self.moves.get(&id)
    }

    fn item(&self, id: u32) -> Option<&ItemInfo> {
        self.items.get(&id)
    }

    fn npc(&self, index: u32) -> Option<&NpcInfo> {
        self.npcs.get(&index)
    }

    fn music_at(&self, tile: IVec2) -> Option<&str> {
        self.music_areas
            .iter()
            .find(|area| area.contains(tile))
            .map(|area| area.music.as_str())
    }
}
