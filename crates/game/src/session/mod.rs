mod frame;
mod outbox;
mod state;

pub use frame::{DialogueView, FrameView, Scene, SpriteView};
pub use outbox::{AssetRequest, AudioCue, Outbox};
pub use state::{Session, SessionConfig, SessionError, WorldMode, PLAYER_SPRITE};
