use std::collections::VecDeque;

use glam::IVec2;
use log::{debug, info, warn};

use super::frame::{DialogueView, FrameView, Scene, SpriteView};
use super::outbox::{AssetRequest, AudioCue, Outbox};
use crate::battle::{BattleChoice, BattleCue, BattleKind, BattleProcessor, BattleTiming, ChoiceError};
use crate::data::{AudioCatalog, GameData};
use crate::dialogue::{
    Conversation, DialogueAction, DialogueCatalog, DialogueContext, DialogueError, DialogueInput, Tutorial,
    TUTORIAL_MUSIC, TUTORIAL_STORY_PROGRESS, UNWILLING_TO_TALK,
};
use crate::entity::{Camera, Creature, Entity, EntityId, Interpolated, WorldConfig};
use crate::net::{ChatMessage, ClientIntent, LatencyTracker, ServerMessage, WorldSnapshot, PING_INTERVAL_MS};
use crate::simulation::Simulation;
use crate::snapshot::{ReconcileReport, TickEvents, World};

pub const PLAYER_SPRITE: &str = "player";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub world: WorldConfig,
    pub battle: BattleTiming,
    pub ping_interval_ms: f64,
    pub chat_history: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            battle: BattleTiming::default(),
            ping_interval_ms: PING_INTERVAL_MS,
            chat_history: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("not connected")]
    Disconnected,
    #[error("cannot {0} right now")]
    Busy(&'static str),
    #[error("no battle in progress")]
    NotInBattle,
    #[error("no conversation open")]
    NoConversation,
    #[error("battle: {0}")]
    Battle(#[from] ChoiceError),
    #[error("dialogue: {0}")]
    Dialogue(#[from] DialogueError),
}

pub enum WorldMode {
    Exploring,
    InTutorial(Tutorial),
    InBattle(Box<BattleProcessor>),
}

impl WorldMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorldMode::Exploring => "exploring",
            WorldMode::InTutorial(_) => "tutorial",
            WorldMode::InBattle(_) => "battle",
        }
    }
}

/// Client-side game state. Messages are queued by the host with their
/// arrival time and applied at the start of the next tick, so the world is
/// always reconciled before anything reads it.
pub struct Session {
    config: SessionConfig,
    world: World,
    mode: WorldMode,
    conversation: Option<Conversation>,
    inbox: VecDeque<(f64, ServerMessage)>,
    outbox: Outbox,
    latency: LatencyTracker,
    chat: Vec<String>,
    battle_log: VecDeque<String>,
    autoplay: bool,
    current_music: Option<String>,
    connected: bool,
    frame: Option<FrameView>,
    data: Box<dyn GameData>,
    audio: Box<dyn AudioCatalog>,
    dialogues: Box<dyn DialogueCatalog>,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        data: Box<dyn GameData>,
        audio: Box<dyn AudioCatalog>,
        dialogues: Box<dyn DialogueCatalog>,
    ) -> Self {
        Self {
            world: World::new(config.world.clone()),
            latency: LatencyTracker::new(config.ping_interval_ms),
            config,
            mode: WorldMode::Exploring,
            conversation: None,
            inbox: VecDeque::new(),
            outbox: Outbox::default(),
            chat: Vec::new(),
            battle_log: VecDeque::new(),
            autoplay: true,
            current_music: None,
            connected: false,
            frame: None,
            data,
            audio,
            dialogues,
        }
    }

    pub fn connect(&mut self, login_epoch_ms: u64) {
        info!("session connected");
        self.world.set_login_time(login_epoch_ms);
        self.latency.reset();
        self.connected = true;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn mode(&self) -> &WorldMode {
        &self.mode
    }

    pub fn battle(&self) -> Option<&BattleProcessor> {
        match &self.mode {
            WorldMode::InBattle(battle) => Some(battle.as_ref()),
            _ => None,
        }
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    /// Server chat as of the last snapshot, followed by local battle messages.
    pub fn chat_log(&self) -> impl Iterator<Item = &str> {
        self.chat.iter().chain(self.battle_log.iter()).map(String::as_str)
    }

    pub fn current_music(&self) -> Option<&str> {
        self.current_music.as_deref()
    }

    pub fn last_frame(&self) -> Option<&FrameView> {
        self.frame.as_ref()
    }

    pub fn outbox(&mut self) -> &mut Outbox {
        &mut self.outbox
    }

    pub fn receive(&mut self, received_at_ms: f64, message: ServerMessage) {
        if !self.connected {
            debug!("dropping message while disconnected");
            return;
        }
        self.inbox.push_back((received_at_ms, message));
    }

    pub fn resolve_assets(&mut self, id: EntityId, available: bool) {
        self.world.resolve_assets(id, available);
    }

    fn drain_inbox(&mut self) {
        while let Some((received_at_ms, message)) = self.inbox.pop_front() {
            match message {
                ServerMessage::Snapshot(snapshot) => self.apply_snapshot(&snapshot, received_at_ms),
                ServerMessage::Pong { timestamp_ms } => self.latency.on_pong(timestamp_ms, received_at_ms),
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: &WorldSnapshot, received_at_ms: f64) {
        let report = self.world.apply_snapshot(snapshot, received_at_ms);
        let events = self.world.take_events();
        self.react(&report, events);

        if let WorldMode::InBattle(battle) = &mut self.mode
            && let Some(player) = self.world.local_player()
        {
            battle.sync_player(player);
        }
    }

    fn react(&mut self, report: &ReconcileReport, events: TickEvents) {
        if report.viewpoint_assigned
            && matches!(self.mode, WorldMode::Exploring)
            && self.world.local_player().is_some_and(|p| p.story_progress == 0)
        {
            self.begin_tutorial();
        }

        for sound in events.sound {
            self.outbox.play(if sound.is_sfx {
                AudioCue::Sfx {
                    name: sound.sound_name,
                    interrupt: sound.interrupt,
                }
            } else {
                AudioCue::Music(sound.sound_name)
            });
        }

        self.replace_chat(events.chat);

        for talk in events.talk {
            self.open_conversation(talk.target_id, talk.npc_index, talk.dialogue_number);
        }

        for encounter in events.encounters {
            if !matches!(self.mode, WorldMode::Exploring) {
                debug!("encounter ignored while {}", self.mode.as_str());
                continue;
            }
            self.begin_battle(BattleKind::Wild, encounter.creature);
        }

        for challenge in events.challenges {
            if !matches!(self.mode, WorldMode::Exploring) {
                continue;
            }
            let Some(opponent_id) = self.world.local_id().and_then(|id| challenge.opponent_of(id)) else {
                continue;
            };
            let Some(opponent) = self.world.get(opponent_id) else {
                warn!("challenge from unknown entity {opponent_id}");
                continue;
            };
            let Some(creature) = opponent.party().iter().find(|c| !c.is_fainted()).cloned() else {
                warn!("challenger {opponent_id} has no healthy creature");
                continue;
            };
            let kind = BattleKind::Trainer {
                opponent_id,
                opponent_name: opponent.name().to_string(),
            };
            self.begin_battle(kind, creature);
        }

        match &mut self.mode {
            WorldMode::InBattle(battle) => {
                for turn in events.turns {
                    battle.enqueue(turn);
                }
            }
            _ if !events.turns.is_empty() => {
                warn!("dropping {} turn events outside a battle", events.turns.len());
            }
            _ => {}
        }
    }

    fn begin_tutorial(&mut self) {
        info!("starting tutorial");
        self.mode = WorldMode::InTutorial(Tutorial::new());
        self.autoplay = false;
        self.set_music(TUTORIAL_MUSIC);
    }

    fn begin_battle(&mut self, kind: BattleKind, opponent: Creature) {
        let Some(player) = self.world.local_player() else {
            warn!("battle started before the viewpoint was known");
            return;
        };
        let mut battle = BattleProcessor::new(kind, player, opponent, self.config.battle.clone());
        self.conversation = None;
        self.autoplay = false;
        battle.start(self.data.as_ref(), self.audio.as_ref());
        self.mode = WorldMode::InBattle(Box::new(battle));
        self.forward_battle_cues();
    }

    fn open_conversation(&mut self, target: EntityId, npc_index: u32, dialogue_number: u32) {
        let Some(player) = self.world.local_player() else {
            return;
        };
        let ctx = DialogueContext {
            player_name: &player.name,
            story_progress: player.story_progress,
            npc_index,
            dialogue_number,
        };
        match self.dialogues.script(&ctx) {
            Some(script) => {
                debug!("conversation with npc {npc_index} ({})", script.speaker);
                let mut conversation = Conversation::new(&script.speaker, target, script.lines);
                self.flush_dialogue_actions(&mut conversation);
                self.conversation = (!conversation.is_finished()).then_some(conversation);
            }
            None => self.outbox.send(ClientIntent::Chat {
                message: UNWILLING_TO_TALK.to_string(),
                global: false,
            }),
        }
    }

    fn flush_dialogue_actions(&mut self, conversation: &mut Conversation) {
        for action in conversation.drain_actions() {
            let intent = match action {
                DialogueAction::HealParty { npc_index } => ClientIntent::HealParty { npc_index },
                DialogueAction::UpdateStoryProgress(progress) => ClientIntent::UpdateStoryProgress { progress },
                DialogueAction::StartBattle => ClientIntent::ForceNpcBattle {
                    npc: conversation.target(),
                },
            };
            self.outbox.send(intent);
        }
    }

    fn forward_battle_cues(&mut self) {
        let WorldMode::InBattle(battle) = &mut self.mode else {
            return;
        };
        for cue in battle.drain_cues() {
            match cue {
                BattleCue::Sfx(name) => self.outbox.play(AudioCue::Sfx { name, interrupt: false }),
                BattleCue::Music(name) => {
                    self.current_music = Some(name.clone());
                    self.outbox.play(AudioCue::Music(name));
                }
                BattleCue::Message(message) => {
                    info!("battle: {message}");
                    self.battle_log.push_back(message);
                }
            }
        }
        while self.battle_log.len() > self.config.chat_history {
            self.battle_log.pop_front();
        }
    }

    // the server resends its whole chat history with every snapshot
    fn replace_chat(&mut self, mut messages: Vec<ChatMessage>) {
        messages.sort_by_key(|m| m.sent_at_ms);
        let skip = messages.len().saturating_sub(self.config.chat_history);
        self.chat = messages.iter().skip(skip).map(chat_line).collect();
    }

    fn set_music(&mut self, name: &str) {
        if self.current_music.as_deref() == Some(name) {
            return;
        }
        self.current_music = Some(name.to_string());
        self.outbox.play(AudioCue::Music(name.to_string()));
    }

    fn update_area_music(&mut self) {
        if !self.autoplay || !matches!(self.mode, WorldMode::Exploring) {
            return;
        }
        let Some(tile) = self.world.local_player().map(|p| p.motion.tile) else {
            return;
        };
        if let Some(music) = self.data.music_at(tile).map(str::to_string) {
            self.set_music(&music);
        }
    }

    fn request_due_assets(&mut self, now_ms: f64) {
        for id in self.world.due_asset_requests(now_ms) {
            let base = self.world.get(id).and_then(|entity| self.sprite_base(entity));
            match base {
                Some(sprite_base) => self.outbox.request_assets(AssetRequest { id, sprite_base }),
                None => {
                    warn!("no sprite for entity {id}");
                    self.world.resolve_assets(id, false);
                }
            }
        }
    }

    fn sprite_base(&self, entity: &Entity) -> Option<String> {
        match entity {
            Entity::Controllable(_) => Some(PLAYER_SPRITE.to_string()),
            Entity::NonControllable(npc) => self.data.npc(npc.npc_index).map(|info| info.sprite.clone()),
        }
    }

    fn ensure_exploring(&self, what: &'static str) -> Result<(), SessionError> {
        if !self.connected {
            return Err(SessionError::Disconnected);
        }
        if self.conversation.is_some() || !matches!(self.mode, WorldMode::Exploring) {
            return Err(SessionError::Busy(what));
        }
        Ok(())
    }

    /// Clicking a tile walks there, or walks up to and talks with the npc
    /// standing on it.
    pub fn click_tile(&mut self, tile: IVec2) -> Result<(), SessionError> {
        self.ensure_exploring("move")?;
        let intent = match self.world.entity_at(tile) {
            Some(Entity::NonControllable(npc)) => ClientIntent::MoveAndTalk {
                tile: tile.to_array(),
                target: npc.id,
            },
            _ => ClientIntent::Move { tile: tile.to_array() },
        };
        self.outbox.send(intent);
        Ok(())
    }

    pub fn take_item(&mut self, unique_id: u64) -> Result<(), SessionError> {
        self.ensure_exploring("take items")?;
        if !self.world.ground_items().iter().any(|item| item.unique_id == unique_id) {
            debug!("item {unique_id} is not on the ground");
        }
        self.outbox.send(ClientIntent::TakeItem { unique_id });
        Ok(())
    }

    pub fn challenge(&mut self, target: EntityId) -> Result<(), SessionError> {
        self.ensure_exploring("challenge")?;
        self.outbox.send(ClientIntent::ChallengePlayer { target });
        Ok(())
    }

    pub fn accept_challenge(&mut self, challenger: EntityId) -> Result<(), SessionError> {
        self.ensure_exploring("accept a challenge")?;
        self.outbox.send(ClientIntent::AcceptChallenge { challenger });
        Ok(())
    }

    pub fn chat(&mut self, message: &str, global: bool) -> Result<(), SessionError> {
        if !self.connected {
            return Err(SessionError::Disconnected);
        }
        let message = message.trim();
        if message.is_empty() {
            return Ok(());
        }
        self.outbox.send(ClientIntent::Chat {
            message: message.to_string(),
            global,
        });
        Ok(())
    }

    pub fn choose_battle(&mut self, choice: BattleChoice) -> Result<(), SessionError> {
        let WorldMode::InBattle(battle) = &mut self.mode else {
            return Err(SessionError::NotInBattle);
        };
        let intent = battle.choose(choice)?;
        self.outbox.send(intent);
        Ok(())
    }

    pub fn dialogue_input(&mut self, input: DialogueInput) -> Result<(), SessionError> {
        let mut conversation = self.conversation.take().ok_or(SessionError::NoConversation)?;
        let result = conversation.input(input);
        self.flush_dialogue_actions(&mut conversation);
        if !conversation.is_finished() {
            self.conversation = Some(conversation);
        }
        result?;
        Ok(())
    }

    /// The generic "continue" click: closes a finished battle, turns a
    /// tutorial page, or advances the open conversation.
    pub fn dismiss(&mut self) -> Result<(), SessionError> {
        match &mut self.mode {
            WorldMode::InBattle(battle) => {
                if !battle.dismiss() {
                    return Err(SessionError::Busy("leave the battle"));
                }
                info!("battle closed");
                self.mode = WorldMode::Exploring;
                self.autoplay = true;
                self.current_music = None;
                Ok(())
            }
            WorldMode::InTutorial(tutorial) => {
                if tutorial.dismiss() {
                    info!("tutorial finished");
                    self.mode = WorldMode::Exploring;
                    self.autoplay = true;
                    self.current_music = None;
                    self.outbox.send(ClientIntent::UpdateStoryProgress {
                        progress: TUTORIAL_STORY_PROGRESS,
                    });
                }
                Ok(())
            }
            WorldMode::Exploring => self.dialogue_input(DialogueInput::Dismiss),
        }
    }

    pub fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        info!("session disconnected after {} snapshots", self.world.snapshots_applied());
        self.outbox.send(ClientIntent::LogOut);
        self.mode = WorldMode::Exploring;
        self.conversation = None;
        self.inbox.clear();
        self.world.clear();
        self.latency.reset();
        self.chat.clear();
        self.battle_log.clear();
        self.current_music = None;
        self.autoplay = true;
        self.connected = false;
    }

    fn build_frame(&self, now_ms: f64) -> FrameView {
        let scene = match &self.mode {
            WorldMode::InBattle(battle) => Scene::Battle(battle.view(self.data.as_ref())),
            WorldMode::InTutorial(tutorial) => match tutorial.text() {
                Some((row1, row2)) => Scene::Tutorial {
                    page: tutorial.page(),
                    row1: row1.to_string(),
                    row2: row2.to_string(),
                },
                None => Scene::Loading,
            },
            WorldMode::Exploring => self.world_scene(now_ms),
        };

        let dialogue = self
            .conversation
            .as_ref()
            .and_then(Conversation::prompt)
            .map(|prompt| DialogueView {
                title: prompt.title.to_string(),
                text: prompt.text.map(str::to_string),
                options: prompt.options.to_vec(),
            });

        FrameView {
            now_ms,
            scene,
            dialogue,
            chat: self.chat_log().map(str::to_string).collect(),
            latency_ms: self.latency.latency_ms(),
            entity_count: self.world.entity_count(),
        }
    }

    fn world_scene(&self, now_ms: f64) -> Scene {
        let Some(local_id) = self.world.local_id() else {
            return Scene::Loading;
        };
        let Some(focus) = self.world.screen_position(local_id, now_ms) else {
            return Scene::Loading;
        };
        let config = self.world.config();
        let camera = Camera::follow(focus, config.viewport, config.camera_bias_x);

        let sprites = self
            .world
            .draw_order()
            .into_iter()
            .filter(|entity| entity.assets().is_drawable())
            .filter_map(|entity| {
                let base = self.sprite_base(entity)?;
                let position = self.world.screen_position(entity.id(), now_ms)?;
                Some(SpriteView {
                    id: entity.id(),
                    name: entity.name().to_string(),
                    sprite: entity.motion().walk.frame().sprite_name(&base),
                    tile: entity.motion().tile,
                    screen: camera.to_screen(position),
                    local: entity.id() == local_id,
                })
            })
            .collect();

        Scene::World { camera, sprites }
    }
}

fn chat_line(chat: &ChatMessage) -> String {
    if chat.global {
        format!("[global] {}: {}", chat.sender_name, chat.message)
    } else {
        format!("{}: {}", chat.sender_name, chat.message)
    }
}

impl Simulation for Session {
    fn tick(&mut self, now_ms: f64, dt_ms: f64) {
        if !self.connected {
            return;
        }
        self.drain_inbox();
        self.world.tick_animations();
        self.request_due_assets(now_ms);

        if let WorldMode::InBattle(battle) = &mut self.mode {
            battle.update(dt_ms, self.data.as_ref(), self.audio.as_ref());
        }
        self.forward_battle_cues();

        if let Some(ping) = self.latency.poll(now_ms) {
            self.outbox.send(ping);
        }
        self.update_area_music();
    }

    fn render(&mut self, now_ms: f64) {
        self.frame = Some(self.build_frame(now_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{NpcInfo, SoundLengths, StaticTables};
    use crate::dialogue::BuiltinDialogues;
    use crate::entity::{AssetState, Direction};
    use crate::net::{NpcState, PlayerState, TalkEvent};

    fn tables() -> StaticTables {
        let mut tables = StaticTables::new();
        tables.add_npc(NpcInfo {
            index: 11,
            name: "Nurse".to_string(),
            sprite: "nurse".to_string(),
            talkable: true,
        });
        tables
    }

    fn session() -> Session {
        let mut session = Session::new(
            SessionConfig::default(),
            Box::new(tables()),
            Box::new(SoundLengths::default()),
            Box::new(BuiltinDialogues),
        );
        session.connect(0);
        session
    }

    fn player(id: u64, progress: u32) -> PlayerState {
        PlayerState {
            id: EntityId(id),
            name: "Gold".to_string(),
            tile: [3, 3],
            pending: None,
            facing: Direction::Down,
            current_chunk: 0,
            party: Vec::new(),
            inventory: Vec::new(),
            story_progress: progress,
        }
    }

    fn nurse() -> NpcState {
        NpcState {
            id: EntityId(100),
            npc_index: 11,
            name: "Nurse".to_string(),
            tile: [6, 3],
            pending: None,
            facing: Direction::Down,
            current_chunk: 0,
            party: Vec::new(),
        }
    }

    fn snapshot(progress: u32) -> WorldSnapshot {
        WorldSnapshot {
            viewpoint_id: Some(EntityId(1)),
            players: vec![player(1, progress)],
            npcs: vec![nurse()],
            connected_ids: vec![EntityId(1)],
            ..Default::default()
        }
    }

    #[test]
    fn test_new_player_gets_tutorial() {
        let mut s = session();
        s.receive(0.0, ServerMessage::Snapshot(snapshot(0)));
        s.tick(0.0, 15.625);
        assert!(matches!(s.mode(), WorldMode::InTutorial(_)));
        assert_eq!(s.current_music(), Some(TUTORIAL_MUSIC));

        for _ in 0..Tutorial::page_count() {
            s.dismiss().unwrap();
        }
        assert!(matches!(s.mode(), WorldMode::Exploring));
        assert!(s
            .outbox()
            .drain_intents()
            .contains(&ClientIntent::UpdateStoryProgress { progress: TUTORIAL_STORY_PROGRESS }));
    }

    #[test]
    fn test_returning_player_explores() {
        let mut s = session();
        s.receive(0.0, ServerMessage::Snapshot(snapshot(4)));
        s.tick(0.0, 15.625);
        assert!(matches!(s.mode(), WorldMode::Exploring));
        assert_eq!(s.world().entity_count(), 2);
    }

    #[test]
    fn test_click_npc_moves_and_talks() {
        let mut s = session();
        s.receive(0.0, ServerMessage::Snapshot(snapshot(4)));
        s.tick(0.0, 15.625);
        s.click_tile(IVec2::new(6, 3)).unwrap();
        s.click_tile(IVec2::new(9, 9)).unwrap();
        let intents = s.outbox().drain_intents();
        assert_eq!(
            intents,
            vec![
                ClientIntent::MoveAndTalk {
                    tile: [6, 3],
                    target: EntityId(100)
                },
                ClientIntent::Move { tile: [9, 9] },
            ]
        );
    }

    #[test]
    fn test_nurse_conversation_heals() {
        let mut s = session();
        let mut snap = snapshot(4);
        snap.talk_events.push(TalkEvent {
            talker_id: EntityId(1),
            target_id: EntityId(100),
            npc_index: 11,
            dialogue_number: 0,
        });
        s.receive(0.0, ServerMessage::Snapshot(snap));
        s.tick(0.0, 15.625);
        assert!(s.conversation().is_some());
        assert_eq!(s.click_tile(IVec2::new(1, 1)), Err(SessionError::Busy("move")));

        s.dismiss().unwrap();
        s.dismiss().unwrap();
        s.dialogue_input(DialogueInput::Choose(0)).unwrap();
        while s.conversation().is_some() {
            s.dismiss().unwrap();
        }
        assert!(s
            .outbox()
            .drain_intents()
            .contains(&ClientIntent::HealParty { npc_index: 11 }));
    }

    #[test]
    fn test_unknown_npc_is_unwilling() {
        let mut s = session();
        let mut snap = snapshot(4);
        snap.talk_events.push(TalkEvent {
            talker_id: EntityId(1),
            target_id: EntityId(100),
            npc_index: 999,
            dialogue_number: 0,
        });
        s.receive(0.0, ServerMessage::Snapshot(snap));
        s.tick(0.0, 15.625);
        assert!(s.conversation().is_none());
        assert_eq!(
            s.outbox().drain_intents(),
            vec![ClientIntent::Chat {
                message: UNWILLING_TO_TALK.to_string(),
                global: false
            }]
        );
    }

    #[test]
    fn test_assets_requested_after_delay() {
        let mut s = session();
        s.receive(0.0, ServerMessage::Snapshot(snapshot(4)));
        s.tick(0.0, 15.625);
        assert!(s.outbox().drain_asset_requests().is_empty());

        s.tick(1000.0, 15.625);
        let requests = s.outbox().drain_asset_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].sprite_base, PLAYER_SPRITE);
        assert_eq!(requests[1].sprite_base, "nurse");

        s.resolve_assets(EntityId(1), true);
        assert_eq!(s.world().get(EntityId(1)).map(Entity::assets), Some(AssetState::Ready));
        s.render(1000.0);
        let Some(FrameView {
            scene: Scene::World { sprites, .. },
            ..
        }) = s.last_frame()
        else {
            panic!("expected a world frame");
        };
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].sprite, "player_down_1.png");
    }

    #[test]
    fn test_disconnect_clears_everything() {
        let mut s = session();
        s.receive(0.0, ServerMessage::Snapshot(snapshot(4)));
        s.tick(0.0, 15.625);
        s.disconnect();
        assert!(!s.is_connected());
        assert_eq!(s.world().entity_count(), 0);
        assert_eq!(s.outbox().drain_intents(), vec![ClientIntent::LogOut]);
        assert_eq!(s.click_tile(IVec2::ZERO), Err(SessionError::Disconnected));
    }

    fn global_chat(sender: &str, message: &str, sent_at_ms: u64) -> ChatMessage {
        ChatMessage {
            sender_id: EntityId(7),
            sender_name: sender.to_string(),
            message: message.to_string(),
            sent_at_ms,
            global: true,
            challenger: None,
        }
    }

    #[test]
    fn test_resent_chat_history_logged_once() {
        let mut s = session();
        let mut snap = snapshot(4);
        snap.chat_messages.push(global_chat("Lyra", "hello", 10));
        for i in 0..5 {
            s.receive(i as f64 * 200.0, ServerMessage::Snapshot(snap.clone()));
            s.tick(i as f64 * 200.0, 15.625);
        }
        assert_eq!(s.chat_log().collect::<Vec<_>>(), vec!["[global] Lyra: hello"]);

        snap.chat_messages = vec![global_chat("Kris", "later", 30), global_chat("Lyra", "hello", 10)];
        s.receive(1000.0, ServerMessage::Snapshot(snap));
        s.tick(1000.0, 15.625);
        assert_eq!(
            s.chat_log().collect::<Vec<_>>(),
            vec!["[global] Lyra: hello", "[global] Kris: later"]
        );
    }

    #[test]
    fn test_chat_keeps_newest_history() {
        let mut s = session();
        let mut snap = snapshot(4);
        snap.chat_messages = (1..=60).map(|t| global_chat("Lyra", &t.to_string(), t)).collect();
        s.receive(0.0, ServerMessage::Snapshot(snap));
        s.tick(0.0, 15.625);
        let lines: Vec<_> = s.chat_log().collect();
        assert_eq!(lines.len(), 50);
        assert_eq!(lines[0], "[global] Lyra: 11");
        assert_eq!(lines[49], "[global] Lyra: 60");
    }

    #[test]
    fn test_reconnect_starts_fresh() {
        let mut s = session();
        s.receive(0.0, ServerMessage::Snapshot(snapshot(4)));
        s.tick(0.0, 15.625);
        s.tick(PING_INTERVAL_MS, 15.625);
        s.receive(PING_INTERVAL_MS, ServerMessage::Pong { timestamp_ms: 1000 });
        s.tick(PING_INTERVAL_MS + 20.0, 15.625);
        s.disconnect();
        assert_eq!(s.world().snapshots_applied(), 0);
        assert_eq!(s.world().clock().last_snapshot_ms(), 0.0);

        s.connect(0);
        s.outbox().drain_intents();
        s.tick(5000.0, 15.625);
        assert!(s.outbox().drain_intents().is_empty());
        s.tick(5000.0 + PING_INTERVAL_MS, 15.625);
        assert_eq!(
            s.outbox().drain_intents(),
            vec![ClientIntent::Ping { timestamp_ms: 6000 }]
        );
        s.render(6000.0);
        assert_eq!(s.last_frame().and_then(|f| f.latency_ms), None);
    }

    #[test]
    fn test_ping_sent_on_interval() {
        let mut s = session();
        s.tick(0.0, 15.625);
        s.tick(PING_INTERVAL_MS + 1.0, 15.625);
        let pings = s
            .outbox()
            .drain_intents()
            .into_iter()
            .filter(|i| matches!(i, ClientIntent::Ping { .. }))
            .count();
        assert!(pings >= 1);
    }
}
