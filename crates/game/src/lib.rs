pub mod battle;
pub mod data;
pub mod dialogue;
pub mod entity;
pub mod net;
pub mod session;
pub mod simulation;
pub mod snapshot;

pub use battle::{BattleChoice, BattlePhase, BattleProcessor, BattleTiming, BattleTurnEvent};
pub use data::{AudioCatalog, GameData, SoundLengths, StaticTables};
pub use dialogue::{BuiltinDialogues, Conversation, DialogueCatalog, DialogueInput, Tutorial};
pub use entity::{Camera, Direction, Entity, EntityId, WorldConfig};
pub use net::{ClientIntent, CodecError, ServerMessage, WorldSnapshot, DEFAULT_PORT};
pub use session::{AudioCue, FrameView, Scene, Session, SessionConfig, SessionError, WorldMode};
pub use simulation::{FixedTimestep, FrameReport, Scheduler, SchedulerConfig, Simulation};
pub use snapshot::{ReconcileReport, World};
