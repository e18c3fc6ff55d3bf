use glam::IVec2;
use log::{debug, info};

use tallgrass::battle::{BattleTurnEvent, Side, TurnAction, TurnFlags};
use tallgrass::data::{ItemInfo, MoveInfo, MusicArea, NpcInfo, Species};
use tallgrass::entity::{Creature, InventorySlot};
use tallgrass::net::{BattleAction, ChatMessage, EncounterEvent, NpcState, PlayerState, TalkEvent};
use tallgrass::{ClientIntent, Direction, EntityId, ServerMessage, StaticTables, WorldSnapshot};

const LOCAL: EntityId = EntityId(1);
const WANDERER: EntityId = EntityId(100);
const NURSE: EntityId = EntityId(101);
const POKE_BALL: u32 = 4;
const STEP_MS: f64 = 200.0;
const STEPS_BEFORE_ENCOUNTER: u32 = 12;
const CHAT_HISTORY: usize = 50;

pub fn tables() -> StaticTables {
    let mut tables = StaticTables::new();
    for (id, name, kind) in [
        (152, "Chikorita", "grass"),
        (155, "Cyndaquil", "fire"),
        (158, "Totodile", "water"),
        (16, "Pidgey", "normal"),
        (19, "Rattata", "normal"),
    ] {
        tables.add_species(Species {
            id,
            name: name.to_string(),
            sprite: name.to_lowercase(),
            kind: kind.to_string(),
            secondary_kind: None,
        });
    }
    tables
        .add_move(MoveInfo {
            id: 10,
            name: "Scratch".to_string(),
            kind: "normal".to_string(),
            power: Some(40),
            accuracy: Some(100),
            pp: 35,
        })
        .add_move(MoveInfo {
            id: 43,
            name: "Leer".to_string(),
            kind: "normal".to_string(),
            power: None,
            accuracy: Some(100),
            pp: 30,
        })
        .add_item(ItemInfo {
            id: POKE_BALL,
            name: "Poke Ball".to_string(),
            examine: "A device for catching wild creatures.".to_string(),
            stackable: true,
            sprite: "poke_ball.png".to_string(),
            captures: true,
        })
        .add_item(ItemInfo {
            id: 17,
            name: "Potion".to_string(),
            examine: "Restores 20 vitality.".to_string(),
            stackable: true,
            sprite: "potion.png".to_string(),
            captures: false,
        })
        .add_npc(NpcInfo {
            index: 11,
            name: "Nurse".to_string(),
            sprite: "nurse".to_string(),
            talkable: true,
        })
        .add_npc(NpcInfo {
            index: 30,
            name: "Youngster".to_string(),
            sprite: "youngster".to_string(),
            talkable: false,
        })
        .add_music_area(MusicArea {
            name: "Route 29".to_string(),
            music: "route_29.ogg".to_string(),
            top_left: [-50, -50],
            bottom_right: [50, 50],
        });
    tables
}

fn step_toward(from: IVec2, to: IVec2) -> Option<Direction> {
    let delta = to - from;
    if delta.x != 0 {
        Some(if delta.x > 0 { Direction::Right } else { Direction::Left })
    } else if delta.y != 0 {
        Some(if delta.y > 0 { Direction::Down } else { Direction::Up })
    } else {
        None
    }
}

struct WildBattle {
    creature: Creature,
}

/// A tiny in-process world standing in for a server: one player, a pacing
/// npc, a nurse, and a wild encounter after a short walk.
pub struct DemoServer {
    player: PlayerState,
    wanderer: NpcState,
    nurse: NpcState,
    destination: Option<IVec2>,
    steps_walked: u32,
    encountered: bool,
    battle: Option<WildBattle>,
    pending: WorldSnapshot,
    chat: Vec<ChatMessage>,
    replies: Vec<ServerMessage>,
    last_step_ms: Option<f64>,
}

impl Default for DemoServer {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoServer {
    pub fn new() -> Self {
        let starter = Creature {
            species_id: 155,
            experience: 135,
            vitality: 39,
            max_vitality: 39,
            moves: vec![10, 43],
        };
        Self {
            player: PlayerState {
                id: LOCAL,
                name: "Gold".to_string(),
                tile: [0, 0],
                pending: None,
                facing: Direction::Down,
                current_chunk: 0,
                party: vec![starter],
                inventory: vec![
                    InventorySlot { item_id: POKE_BALL, amount: 5 },
                    InventorySlot { item_id: 17, amount: 2 },
                ],
                story_progress: 0,
            },
            wanderer: NpcState {
                id: WANDERER,
                npc_index: 30,
                name: "Youngster".to_string(),
                tile: [4, -3],
                pending: None,
                facing: Direction::Right,
                current_chunk: 0,
                party: Vec::new(),
            },
            nurse: NpcState {
                id: NURSE,
                npc_index: 11,
                name: "Nurse".to_string(),
                tile: [-3, 2],
                pending: None,
                facing: Direction::Down,
                current_chunk: 0,
                party: Vec::new(),
            },
            destination: None,
            steps_walked: 0,
            encountered: false,
            battle: None,
            pending: WorldSnapshot::default(),
            chat: Vec::new(),
            replies: Vec::new(),
            last_step_ms: None,
        }
    }

    pub fn handle(&mut self, now_ms: f64, intent: ClientIntent) {
        debug!("demo received {}", intent.kind());
        match intent {
            ClientIntent::Move { tile } => self.destination = Some(IVec2::from_array(tile)),
            ClientIntent::MoveAndTalk { tile, target } => {
                self.destination = Some(IVec2::from_array(tile));
                let npc_index = [&self.wanderer, &self.nurse]
                    .into_iter()
                    .find(|n| n.id == target)
                    .map(|n| n.npc_index);
                if let Some(npc_index) = npc_index {
                    self.pending.talk_events.push(TalkEvent {
                        talker_id: LOCAL,
                        target_id: target,
                        npc_index,
                        dialogue_number: 0,
                    });
                }
            }
            ClientIntent::HealParty { .. } => {
                for creature in &mut self.player.party {
                    creature.vitality = creature.max_vitality;
                }
            }
            ClientIntent::UpdateStoryProgress { progress } => self.player.story_progress = progress,
            ClientIntent::BattleAction(action) => self.battle_action(action),
            ClientIntent::Chat { message, global } => {
                self.chat.push(ChatMessage {
                    sender_id: LOCAL,
                    sender_name: self.player.name.clone(),
                    message,
                    sent_at_ms: now_ms.max(1.0) as u64,
                    global,
                    challenger: None,
                });
                if self.chat.len() > CHAT_HISTORY {
                    self.chat.remove(0);
                }
            }
            ClientIntent::Ping { timestamp_ms } => self.replies.push(ServerMessage::Pong { timestamp_ms }),
            ClientIntent::LogOut => info!("demo session ended"),
            other => debug!("demo ignores {}", other.kind()),
        }
    }

    fn battle_action(&mut self, action: BattleAction) {
        let Some(battle) = self.battle.as_mut() else {
            return;
        };
        let Some(active) = self.player.party.first_mut() else {
            return;
        };

        let mut events = Vec::new();
        let mut over = false;
        match action {
            BattleAction::Attack { move_id } => {
                let damage = if move_id == 10 { 7 } else { 0 };
                battle.creature.vitality = battle.creature.vitality.saturating_sub(damage);
                let mut event = BattleTurnEvent::new(
                    LOCAL,
                    Side::Player,
                    TurnAction::Attack { move_id },
                    active.vitality,
                    battle.creature.vitality,
                );
                if battle.creature.is_fainted() {
                    event = event.with_flags(TurnFlags::BATTLE_OVER | TurnFlags::PLAYER_WON);
                    over = true;
                }
                events.push(event);
            }
            BattleAction::Item { inventory_index } => {
                let slot = self.player.inventory.get_mut(inventory_index as usize);
                let item_id = slot.as_ref().map_or(0, |s| s.item_id);
                if let Some(slot) = slot {
                    slot.amount = slot.amount.saturating_sub(1);
                }
                let mut event = BattleTurnEvent::new(
                    LOCAL,
                    Side::Player,
                    TurnAction::Item { item_id },
                    active.vitality,
                    battle.creature.vitality,
                );
                if item_id == POKE_BALL && battle.creature.vitality * 2 <= battle.creature.max_vitality {
                    event = event.with_flags(TurnFlags::BATTLE_OVER | TurnFlags::CAPTURED);
                    over = true;
                } else if item_id != POKE_BALL {
                    active.vitality = (active.vitality + 20).min(active.max_vitality);
                    event.player_vitality = active.vitality;
                }
                events.push(event);
            }
            BattleAction::Swap { party_index } => events.push(BattleTurnEvent::new(
                LOCAL,
                Side::Player,
                TurnAction::Swap { party_index },
                active.vitality,
                battle.creature.vitality,
            )),
            BattleAction::Flee => {
                events.push(
                    BattleTurnEvent::new(LOCAL, Side::Player, TurnAction::Flee, active.vitality, battle.creature.vitality)
                        .with_flags(TurnFlags::BATTLE_OVER | TurnFlags::FLED),
                );
                over = true;
            }
        }

        if !over {
            active.vitality = active.vitality.saturating_sub(4);
            let mut reply = BattleTurnEvent::new(
                LOCAL,
                Side::Opponent,
                TurnAction::Attack { move_id: 10 },
                active.vitality,
                battle.creature.vitality,
            );
            if active.is_fainted() {
                reply = reply.with_flags(TurnFlags::BATTLE_OVER | TurnFlags::ALL_FAINTED);
                over = true;
            }
            events.push(reply);
        }

        self.pending.turn_events.extend(events);
        if over {
            info!("demo battle finished");
            self.battle = None;
        }
    }

    fn step(&mut self) {
        if let Some(direction) = self.player.pending.take() {
            self.player.tile = (self.player.tile() + direction.offset()).to_array();
            self.steps_walked += 1;
        }
        if self.battle.is_none() {
            let next = self.destination.and_then(|to| step_toward(self.player.tile(), to));
            if next.is_none() {
                self.destination = None;
            }
            if let Some(direction) = next {
                self.player.facing = direction;
            }
            self.player.pending = next;
        }

        if let Some(direction) = self.wanderer.pending.take() {
            self.wanderer.tile = (self.wanderer.tile() + direction.offset()).to_array();
        }
        let x = self.wanderer.tile[0];
        let direction = match self.wanderer.facing {
            Direction::Right if x >= 8 => Direction::Left,
            Direction::Left if x <= 4 => Direction::Right,
            facing => facing,
        };
        self.wanderer.facing = direction;
        self.wanderer.pending = Some(direction);

        if !self.encountered && self.steps_walked >= STEPS_BEFORE_ENCOUNTER {
            self.encountered = true;
            self.destination = None;
            self.player.pending = None;
            let creature = Creature {
                species_id: 16,
                experience: 27,
                vitality: 18,
                max_vitality: 18,
                moves: vec![10],
            };
            info!("demo wild encounter");
            self.pending.encounter_events.push(EncounterEvent {
                target_id: LOCAL,
                creature: creature.clone(),
            });
            self.battle = Some(WildBattle { creature });
        }
    }

    /// Advances the scripted world on its own 200ms cadence.
    pub fn poll(&mut self, now_ms: f64) -> Vec<ServerMessage> {
        let mut messages = std::mem::take(&mut self.replies);
        let first = self.last_step_ms.is_none();
        let due = self.last_step_ms.is_none_or(|last| now_ms - last >= STEP_MS);
        if due {
            self.last_step_ms = Some(now_ms);
            self.step();
            let mut snapshot = std::mem::take(&mut self.pending);
            snapshot.viewpoint_id = first.then_some(LOCAL);
            snapshot.players = vec![self.player.clone()];
            snapshot.npcs = vec![self.wanderer.clone(), self.nurse.clone()];
            snapshot.connected_ids = vec![LOCAL];
            snapshot.chat_messages = self.chat.clone();
            messages.push(ServerMessage::Snapshot(snapshot));
        }
        messages
    }
}
