use crate::entity::EntityId;
use crate::net::ClientIntent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCue {
    Sfx { name: String, interrupt: bool },
    Music(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub id: EntityId,
    pub sprite_base: String,
}

/// Everything the session wants the outside world to do, collected during
/// a tick and drained by the host.
#[derive(Debug, Default)]
pub struct Outbox {
    intents: Vec<ClientIntent>,
    audio: Vec<AudioCue>,
    assets: Vec<AssetRequest>,
}

impl Outbox {
    pub fn send(&mut self, intent: ClientIntent) {
        self.intents.push(intent);
    }

    pub fn play(&mut self, cue: AudioCue) {
        self.audio.push(cue);
    }

    pub fn request_assets(&mut self, request: AssetRequest) {
        self.assets.push(request);
    }

    pub fn intents(&self) -> &[ClientIntent] {
        &self.intents
    }

    pub fn drain_intents(&mut self) -> Vec<ClientIntent> {
        std::mem::take(&mut self.intents)
    }

    pub fn drain_audio(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.audio)
    }

    pub fn drain_asset_requests(&mut self) -> Vec<AssetRequest> {
        std::mem::take(&mut self.assets)
    }
}
