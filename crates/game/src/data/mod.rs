mod experience;
mod tables;

pub use experience::{experience_for_level, experience_to_next_level, level_for_experience, level_progress};
pub use tables::{
    AudioCatalog, GameData, ItemInfo, MoveInfo, MusicArea, NpcInfo, SoundLengths, Species,
    StaticTables,
};
