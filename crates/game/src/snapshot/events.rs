use crate::battle::BattleTurnEvent;
use crate::entity::EntityId;
use crate::net::{ChallengeEvent, ChatMessage, EncounterEvent, SoundEvent, TalkEvent, WorldSnapshot};

/// Transient lists carried by one snapshot, already narrowed to what the
/// local viewpoint should react to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    pub talk: Vec<TalkEvent>,
    pub sound: Vec<SoundEvent>,
    pub challenges: Vec<ChallengeEvent>,
    pub encounters: Vec<EncounterEvent>,
    pub turns: Vec<BattleTurnEvent>,
    pub chat: Vec<ChatMessage>,
}

impl TickEvents {
    pub fn for_viewpoint(snapshot: &WorldSnapshot, local: Option<EntityId>, login_at_ms: u64) -> Self {
        let is_local = |id: EntityId| local == Some(id);

        Self {
            talk: snapshot
                .talk_events
                .iter()
                .filter(|e| is_local(e.talker_id))
                .cloned()
                .collect(),
            sound: snapshot
                .sound_events
                .iter()
                .filter(|e| is_local(e.target_id))
                .cloned()
                .collect(),
            challenges: snapshot
                .challenge_events
                .iter()
                .filter(|e| local.is_some_and(|id| e.involves(id)))
                .cloned()
                .collect(),
            encounters: snapshot
                .encounter_events
                .iter()
                .filter(|e| is_local(e.target_id))
                .cloned()
                .collect(),
            turns: snapshot
                .turn_events
                .iter()
                .filter(|e| is_local(e.player_id))
                .cloned()
                .collect(),
            chat: snapshot
                .chat_messages
                .iter()
                .filter(|m| m.sent_at_ms > login_at_ms && (m.global || is_local(m.sender_id)))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.talk.is_empty()
            && self.sound.is_empty()
            && self.challenges.is_empty()
            && self.encounters.is_empty()
            && self.turns.is_empty()
            && self.chat.is_empty()
    }
}
