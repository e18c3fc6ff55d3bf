mod codec;
mod protocol;
mod stats;

pub use codec::{frame_length, CodecError, FRAME_HEADER_LEN, MAX_FRAME_SIZE};
pub use protocol::{
    BattleAction, ChallengeEvent, ChatMessage, ClientIntent, EncounterEvent, GroundItem,
    NpcState, PlayerState, ServerMessage, SoundEvent, TalkEvent, WorldSnapshot, DEFAULT_PORT,
};
pub use stats::{LatencyTracker, NetworkStats, PING_INTERVAL_MS};
