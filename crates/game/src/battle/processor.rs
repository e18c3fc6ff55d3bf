use std::collections::VecDeque;

use log::{debug, info, warn};

use super::capture::CapturePhase;
use super::event::{BattleTurnEvent, Side};
use super::script::{
    self, BattleKind, Resolution, ScriptContext, Stage, StepAction, Vitals, CONTINUE_PROMPT,
};
use super::timing::BattleTiming;
use crate::data::{level_for_experience, level_progress, AudioCatalog, GameData};
use crate::entity::{Creature, EntityId, InventorySlot, Player};
use crate::net::{BattleAction, ClientIntent};
use crate::simulation::Sequence;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattlePhase {
    Idle,
    IntroAnimating,
    AwaitingPlayerChoice { forced_swap: bool },
    /// `presenting` is the gating flag: while set no other event starts.
    TurnInFlight { presenting: bool },
    Terminal { message: String },
}

impl BattlePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BattlePhase::Idle => "idle",
            BattlePhase::IntroAnimating => "intro",
            BattlePhase::AwaitingPlayerChoice { .. } => "awaiting choice",
            BattlePhase::TurnInFlight { .. } => "turn in flight",
            BattlePhase::Terminal { .. } => "terminal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleChoice {
    Attack { slot: usize },
    Item { inventory_index: usize },
    Swap { party_index: usize },
    Flee,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChoiceError {
    #[error("battle is not waiting for a choice")]
    NotAwaitingChoice,
    #[error("active creature fainted, a swap is required")]
    SwapRequired,
    #[error("no move in slot {0}")]
    EmptyMoveSlot(usize),
    #[error("no item in inventory slot {0}")]
    EmptyInventorySlot(usize),
    #[error("no creature in party slot {0}")]
    EmptyPartySlot(usize),
    #[error("creature in party slot {0} has fainted")]
    FaintedCreature(usize),
    #[error("creature in party slot {0} is already out")]
    AlreadyActive(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleCue {
    Sfx(String),
    Music(String),
    Message(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRows {
    pub row1: String,
    pub row2: String,
}

impl TextRows {
    pub fn is_empty(&self) -> bool {
        self.row1.is_empty() && self.row2.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatureDisplay {
    pub name: String,
    pub sprite: String,
    pub level: u32,
    pub vitality: u32,
    pub max_vitality: u32,
    pub experience_fraction: f32,
}

impl CreatureDisplay {
    fn new(data: &dyn GameData, creature: &Creature, vitality: u32) -> Option<Self> {
        let species = data.species(creature.species_id)?;
        Some(Self {
            name: species.name.clone(),
            sprite: species.sprite.clone(),
            level: level_for_experience(creature.experience),
            vitality,
            max_vitality: creature.max_vitality,
            experience_fraction: level_progress(creature.experience),
        })
    }

    pub fn vitality_fraction(&self) -> f32 {
        if self.max_vitality == 0 {
            return 0.0;
        }
        (self.vitality as f32 / self.max_vitality as f32).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattleView {
    pub phase: BattlePhase,
    pub stage: Stage,
    pub stage_ticks: u32,
    pub text: TextRows,
    pub player: Option<CreatureDisplay>,
    pub opponent: Option<CreatureDisplay>,
    pub capture: Option<CapturePhase>,
    pub show_options: bool,
    pub forced_swap: bool,
    pub queued: usize,
}

pub struct BattleProcessor {
    kind: BattleKind,
    player_id: EntityId,
    player_name: String,
    party: Vec<Creature>,
    inventory: Vec<InventorySlot>,
    opponent: Creature,
    active: usize,
    displayed: Vitals,
    phase: BattlePhase,
    stage: Stage,
    queue: VecDeque<BattleTurnEvent>,
    current: Option<BattleTurnEvent>,
    sequence: Sequence<StepAction>,
    text: TextRows,
    timing: BattleTiming,
    cues: Vec<BattleCue>,
    presented: u64,
}

impl BattleProcessor {
    pub fn new(kind: BattleKind, player: &Player, opponent: Creature, timing: BattleTiming) -> Self {
        let active = player
            .party
            .iter()
            .position(|c| !c.is_fainted())
            .unwrap_or(0);
        let displayed = Vitals {
            player: player.party.get(active).map_or(0, |c| c.vitality),
            opponent: opponent.vitality,
        };

        Self {
            kind,
            player_id: player.id,
            player_name: player.name.clone(),
            party: player.party.clone(),
            inventory: player.inventory.clone(),
            opponent,
            active,
            displayed,
            phase: BattlePhase::Idle,
            stage: Stage::Flash,
            queue: VecDeque::new(),
            current: None,
            sequence: Sequence::new(),
            text: TextRows::default(),
            timing,
            cues: Vec::new(),
            presented: 0,
        }
    }

    pub fn kind(&self) -> &BattleKind {
        &self.kind
    }

    pub fn player_id(&self) -> EntityId {
        self.player_id
    }

    pub fn phase(&self) -> &BattlePhase {
        &self.phase
    }

    pub fn is_presenting(&self) -> bool {
        matches!(self.phase, BattlePhase::TurnInFlight { presenting: true })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, BattlePhase::Terminal { .. })
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn current_event(&self) -> Option<&BattleTurnEvent> {
        self.current.as_ref()
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn displayed(&self) -> Vitals {
        self.displayed
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn text(&self) -> &TextRows {
        &self.text
    }

    pub fn drain_cues(&mut self) -> Vec<BattleCue> {
        std::mem::take(&mut self.cues)
    }

    fn context<'a>(&'a self, data: &'a dyn GameData, audio: &'a dyn AudioCatalog) -> ScriptContext<'a> {
        ScriptContext {
            data,
            audio,
            timing: &self.timing,
            kind: &self.kind,
            player_name: &self.player_name,
            party: &self.party,
            active: self.active,
            opponent: &self.opponent,
            displayed: self.displayed,
        }
    }

    pub fn start(&mut self, data: &dyn GameData, audio: &dyn AudioCatalog) {
        if self.phase != BattlePhase::Idle {
            return;
        }
        info!("battle started: {:?}", self.kind);
        let sequence = script::intro(&self.context(data, audio));
        self.sequence = sequence;
        self.phase = BattlePhase::IntroAnimating;
        self.advance(0.0);
    }

    pub fn enqueue(&mut self, event: BattleTurnEvent) {
        if event.player_id != self.player_id {
            debug!("ignoring turn event for {}", event.player_id);
            return;
        }
        self.queue.push_back(event);
    }

    /// Refreshes the local party and inventory from a snapshot. Ignored
    /// while an event is presenting so displayed values stay consistent.
    pub fn sync_player(&mut self, player: &Player) {
        if self.is_presenting() || matches!(self.phase, BattlePhase::IntroAnimating) {
            return;
        }
        self.party.clone_from(&player.party);
        self.inventory.clone_from(&player.inventory);
    }

    pub fn update(&mut self, dt_ms: f64, data: &dyn GameData, audio: &dyn AudioCatalog) {
        if matches!(
            self.phase,
            BattlePhase::IntroAnimating | BattlePhase::TurnInFlight { presenting: true }
        ) {
            self.advance(dt_ms);
        }

        let ready = matches!(
            self.phase,
            BattlePhase::AwaitingPlayerChoice { .. } | BattlePhase::TurnInFlight { presenting: false }
        );
        if ready && let Some(event) = self.queue.pop_front() {
            self.present(event, data, audio);
        }
    }

    fn present(&mut self, event: BattleTurnEvent, data: &dyn GameData, audio: &dyn AudioCatalog) {
        debug!(
            "presenting {:?} by {:?} ({} queued)",
            event.action,
            event.mover,
            self.queue.len()
        );
        let sequence = script::turn(&self.context(data, audio), &event);
        self.sequence = sequence;
        self.current = Some(event);
        self.phase = BattlePhase::TurnInFlight { presenting: true };
        self.presented += 1;
        self.advance(0.0);
    }

    fn advance(&mut self, dt_ms: f64) {
        let before = self.sequence.current().cloned();
        let entered = self.sequence.advance(dt_ms);

        if !entered.is_empty()
            && let Some(StepAction::Tween(side, tween)) = before
        {
            self.displayed.set(side, tween.to);
        }
        for action in entered {
            self.perform(action);
        }

        if let Some(StepAction::Tween(side, tween)) = self.sequence.current() {
            let value = tween.value_at(self.sequence.elapsed_in_step());
            self.displayed.set(*side, value);
        }
    }

    fn perform(&mut self, action: StepAction) {
        match action {
            StepAction::Stage(stage) => self.stage = stage,
            StepAction::Text { row1, row2 } => {
                if !row1.is_empty() {
                    self.cues.push(BattleCue::Message(row1.clone()));
                }
                self.text = TextRows { row1, row2 };
            }
            StepAction::SecondRow(row2) => self.text.row2 = row2,
            StepAction::ClearText => self.text = TextRows::default(),
            StepAction::Sfx(name) => self.cues.push(BattleCue::Sfx(name)),
            StepAction::Music(name) => self.cues.push(BattleCue::Music(name)),
            StepAction::Tween(side, tween) => self.displayed.set(side, tween.to),
            StepAction::SendOut(index) => match self.party.get(index) {
                Some(creature) => {
                    self.active = index;
                    self.displayed.player = creature.vitality;
                }
                None => warn!("send out of missing party slot {index}"),
            },
            StepAction::Capture(_) => self.stage = Stage::Capture,
            StepAction::Hold => {}
            StepAction::Finish(resolution) => self.resolve(resolution),
        }
    }

    fn resolve(&mut self, resolution: Resolution) {
        if let Some(event) = self.current.take() {
            self.displayed = Vitals {
                player: event.player_vitality,
                opponent: event.opponent_vitality,
            };
            if let Some(creature) = self.party.get_mut(self.active) {
                creature.vitality = event.player_vitality;
            }
            self.opponent.vitality = event.opponent_vitality;
        }

        match resolution {
            Resolution::IntroDone => {
                info!("battle intro finished");
                self.phase = BattlePhase::AwaitingPlayerChoice { forced_swap: false };
            }
            Resolution::Retire => {
                self.phase = BattlePhase::AwaitingPlayerChoice { forced_swap: false };
            }
            Resolution::ForcedSwap => {
                info!("active creature fainted, waiting for a swap");
                self.phase = BattlePhase::AwaitingPlayerChoice { forced_swap: true };
            }
            Resolution::Terminal(message) => {
                info!("battle over: {message}");
                if !self.queue.is_empty() {
                    debug!("{} turn events left after battle end", self.queue.len());
                }
                self.cues.push(BattleCue::Message(message.clone()));
                self.text = TextRows {
                    row1: message.clone(),
                    row2: CONTINUE_PROMPT.to_string(),
                };
                self.phase = BattlePhase::Terminal { message };
            }
        }
    }

    pub fn choose(&mut self, choice: BattleChoice) -> Result<ClientIntent, ChoiceError> {
        let BattlePhase::AwaitingPlayerChoice { forced_swap } = self.phase else {
            return Err(ChoiceError::NotAwaitingChoice);
        };
        if forced_swap && !matches!(choice, BattleChoice::Swap { .. }) {
            return Err(ChoiceError::SwapRequired);
        }

        let action = match choice {
            BattleChoice::Attack { slot } => {
                let move_id = self
                    .party
                    .get(self.active)
                    .and_then(|c| c.move_at(slot))
                    .ok_or(ChoiceError::EmptyMoveSlot(slot))?;
                BattleAction::Attack { move_id }
            }
            BattleChoice::Item { inventory_index } => {
                self.inventory
                    .get(inventory_index)
                    .filter(|slot| slot.amount > 0)
                    .ok_or(ChoiceError::EmptyInventorySlot(inventory_index))?;
                BattleAction::Item {
                    inventory_index: inventory_index as u32,
                }
            }
            BattleChoice::Swap { party_index } => {
                let creature = self
                    .party
                    .get(party_index)
                    .ok_or(ChoiceError::EmptyPartySlot(party_index))?;
                if creature.is_fainted() {
                    return Err(ChoiceError::FaintedCreature(party_index));
                }
                if party_index == self.active {
                    return Err(ChoiceError::AlreadyActive(party_index));
                }
                BattleAction::Swap {
                    party_index: party_index as u32,
                }
            }
            BattleChoice::Flee => BattleAction::Flee,
        };

        debug!("choice submitted: {action:?}");
        self.phase = BattlePhase::TurnInFlight { presenting: false };
        Ok(ClientIntent::BattleAction(action))
    }

    /// Acknowledges the final message. Returns true when the battle is
    /// over and can be dropped.
    pub fn dismiss(&mut self) -> bool {
        self.is_terminal()
    }

    pub fn view(&self, data: &dyn GameData) -> BattleView {
        let elapsed = self.sequence.elapsed_in_step();
        let stage_ticks = (elapsed / self.timing.tick_ms).floor() as u32;
        let capture = match self.sequence.current() {
            Some(StepAction::Capture(animation)) => Some(animation.phase_at(stage_ticks)),
            _ => None,
        };
        let show_options = matches!(self.phase, BattlePhase::AwaitingPlayerChoice { .. })
            && self.text.is_empty()
            && self.queue.is_empty();

        BattleView {
            phase: self.phase.clone(),
            stage: self.stage,
            stage_ticks,
            text: self.text.clone(),
            player: self
                .party
                .get(self.active)
                .and_then(|c| CreatureDisplay::new(data, c, self.displayed.get(Side::Player))),
            opponent: CreatureDisplay::new(data, &self.opponent, self.displayed.get(Side::Opponent)),
            capture,
            show_options,
            forced_swap: matches!(
                self.phase,
                BattlePhase::AwaitingPlayerChoice { forced_swap: true }
            ),
            queued: self.queue.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{TurnAction, TurnFlags};
    use crate::data::{ItemInfo, MoveInfo, SoundLengths, Species, StaticTables};
    use crate::entity::{AssetState, Direction, Motion};
    use glam::IVec2;

    const TICK: f64 = 1000.0 / 64.0;

    fn tables() -> StaticTables {
        let mut tables = StaticTables::new();
        for (id, name) in [(1, "Chikorita"), (2, "Sentret"), (3, "Totodile")] {
            tables.add_species(Species {
                id,
                name: name.into(),
                sprite: name.to_lowercase(),
                kind: "normal".into(),
                secondary_kind: None,
            });
        }
        tables
            .add_move(MoveInfo {
                id: 33,
                name: "Tackle".into(),
                kind: "normal".into(),
                power: Some(40),
                accuracy: Some(100),
                pp: 35,
            })
            .add_item(ItemInfo {
                id: 4,
                name: "Poke Ball".into(),
                examine: "Catches creatures.".into(),
                stackable: true,
                sprite: "pokeball.png".into(),
                captures: true,
            })
            .add_item(ItemInfo {
                id: 9,
                name: "Antidote".into(),
                examine: "Cures poison.".into(),
                stackable: true,
                sprite: "antidote.png".into(),
                captures: false,
            });
        tables
    }

    fn player() -> Player {
        let creature = |species_id, vitality| Creature {
            species_id,
            experience: 125,
            vitality,
            max_vitality: 40,
            moves: vec![33],
        };
        Player {
            id: EntityId(1),
            name: "Gold".into(),
            motion: Motion::new(IVec2::ZERO, None, Direction::Down),
            current_chunk: 0,
            party: vec![creature(1, 40), creature(3, 0), creature(3, 25)],
            inventory: vec![
                InventorySlot { item_id: 4, amount: 5 },
                InventorySlot { item_id: 9, amount: 0 },
            ],
            story_progress: 4,
            assets: AssetState::Ready,
        }
    }

    fn wild() -> Creature {
        Creature {
            species_id: 2,
            experience: 27,
            vitality: 30,
            max_vitality: 30,
            moves: vec![33],
        }
    }

    fn started(data: &StaticTables, audio: &SoundLengths) -> BattleProcessor {
        let mut battle = BattleProcessor::new(BattleKind::Wild, &player(), wild(), BattleTiming::default());
        battle.start(data, audio);
        run(&mut battle, data, audio, 20_000.0);
        battle
    }

    fn run(battle: &mut BattleProcessor, data: &StaticTables, audio: &SoundLengths, ms: f64) {
        let mut elapsed = 0.0;
        while elapsed < ms {
            battle.update(TICK, data, audio);
            elapsed += TICK;
        }
    }

    fn messages(battle: &mut BattleProcessor) -> Vec<String> {
        battle
            .drain_cues()
            .into_iter()
            .filter_map(|c| match c {
                BattleCue::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn intro_reaches_choice() {
        let data = tables();
        let audio = SoundLengths::default();
        let mut battle = BattleProcessor::new(BattleKind::Wild, &player(), wild(), BattleTiming::default());
        assert_eq!(battle.phase(), &BattlePhase::Idle);

        battle.start(&data, &audio);
        assert_eq!(battle.phase(), &BattlePhase::IntroAnimating);
        assert!(battle.choose(BattleChoice::Flee).is_err());

        run(&mut battle, &data, &audio, 20_000.0);
        assert_eq!(
            battle.phase(),
            &BattlePhase::AwaitingPlayerChoice { forced_swap: false }
        );
        assert_eq!(
            messages(&mut battle),
            vec!["Wild SENTRET appeared!", "Go! CHIKORITA!"]
        );
        assert!(battle.view(&data).show_options);
    }

    #[test]
    fn choice_emits_intent_and_waits() {
        let data = tables();
        let audio = SoundLengths::default();
        let mut battle = started(&data, &audio);

        let intent = battle.choose(BattleChoice::Attack { slot: 0 }).unwrap();
        assert_eq!(
            intent,
            ClientIntent::BattleAction(BattleAction::Attack { move_id: 33 })
        );
        assert_eq!(battle.phase(), &BattlePhase::TurnInFlight { presenting: false });
        assert!(!battle.is_presenting());
        assert_eq!(
            battle.choose(BattleChoice::Flee),
            Err(ChoiceError::NotAwaitingChoice)
        );
    }

    #[test]
    fn invalid_choices_are_rejected() {
        let data = tables();
        let audio = SoundLengths::default();
        let mut battle = started(&data, &audio);

        assert_eq!(
            battle.choose(BattleChoice::Attack { slot: 2 }),
            Err(ChoiceError::EmptyMoveSlot(2))
        );
        assert_eq!(
            battle.choose(BattleChoice::Item { inventory_index: 1 }),
            Err(ChoiceError::EmptyInventorySlot(1))
        );
        assert_eq!(
            battle.choose(BattleChoice::Swap { party_index: 1 }),
            Err(ChoiceError::FaintedCreature(1))
        );
        assert_eq!(
            battle.choose(BattleChoice::Swap { party_index: 0 }),
            Err(ChoiceError::AlreadyActive(0))
        );
        assert_eq!(
            battle.choose(BattleChoice::Swap { party_index: 7 }),
            Err(ChoiceError::EmptyPartySlot(7))
        );
    }

    #[test]
    fn damage_tween_then_retire() {
        let data = tables();
        let audio = SoundLengths::default();
        let mut battle = started(&data, &audio);
        battle.drain_cues();

        battle.enqueue(BattleTurnEvent::new(
            EntityId(1),
            Side::Player,
            TurnAction::Attack { move_id: 33 },
            40,
            20,
        ));
        battle.update(0.0, &data, &audio);
        assert!(battle.is_presenting());
        assert_eq!(battle.displayed().opponent, 30);

        // text hold of 1000ms, then 500ms into a 1000ms tween
        run(&mut battle, &data, &audio, 1500.0);
        let mid = battle.displayed().opponent;
        assert!(mid < 30 && mid > 20, "mid tween value {mid}");

        run(&mut battle, &data, &audio, 3000.0);
        assert!(!battle.is_presenting());
        assert_eq!(battle.displayed().opponent, 20);
        assert!(battle.text().is_empty());
        assert_eq!(
            battle.phase(),
            &BattlePhase::AwaitingPlayerChoice { forced_swap: false }
        );
    }

    #[test]
    fn fainted_active_forces_swap() {
        let data = tables();
        let audio = SoundLengths::default();
        let mut battle = started(&data, &audio);

        battle.enqueue(
            BattleTurnEvent::new(
                EntityId(1),
                Side::Opponent,
                TurnAction::Attack { move_id: 33 },
                0,
                30,
            )
            .with_flags(TurnFlags::BATTLE_OVER),
        );
        run(&mut battle, &data, &audio, 10_000.0);
        assert_eq!(
            battle.phase(),
            &BattlePhase::AwaitingPlayerChoice { forced_swap: true }
        );
        assert!(battle.view(&data).forced_swap);
        assert_eq!(battle.choose(BattleChoice::Flee), Err(ChoiceError::SwapRequired));
        assert_eq!(
            battle.choose(BattleChoice::Swap { party_index: 0 }),
            Err(ChoiceError::FaintedCreature(0))
        );

        let intent = battle.choose(BattleChoice::Swap { party_index: 2 }).unwrap();
        assert_eq!(
            intent,
            ClientIntent::BattleAction(BattleAction::Swap { party_index: 2 })
        );

        battle.enqueue(BattleTurnEvent::new(
            EntityId(1),
            Side::Player,
            TurnAction::Swap { party_index: 2 },
            25,
            30,
        ));
        run(&mut battle, &data, &audio, 5000.0);
        assert_eq!(battle.active_index(), 2);
        assert_eq!(battle.displayed().player, 25);
        assert!(messages(&mut battle).contains(&"Go! TOTODILE!".to_string()));
    }

    #[test]
    fn failed_flee_retires_after_hold() {
        let data = tables();
        let audio = SoundLengths::default();
        let mut battle = started(&data, &audio);
        battle.drain_cues();

        battle.enqueue(BattleTurnEvent::new(EntityId(1), Side::Player, TurnAction::Flee, 40, 30));
        run(&mut battle, &data, &audio, 2900.0);
        assert!(battle.is_presenting());
        assert_eq!(battle.text().row1, "Can't escape!");
        run(&mut battle, &data, &audio, 200.0);
        assert!(!battle.is_presenting());
    }

    #[test]
    fn successful_flee_is_terminal() {
        let data = tables();
        let audio = SoundLengths::default();
        let mut battle = started(&data, &audio);

        assert!(!battle.dismiss());
        battle.enqueue(
            BattleTurnEvent::new(EntityId(1), Side::Player, TurnAction::Flee, 40, 30)
                .with_flags(TurnFlags::BATTLE_OVER | TurnFlags::FLED),
        );
        battle.update(TICK, &data, &audio);
        assert_eq!(
            battle.phase(),
            &BattlePhase::Terminal {
                message: "Got away safely!".into()
            }
        );
        assert_eq!(battle.text().row2, CONTINUE_PROMPT);
        assert!(battle.dismiss());
    }

    #[test]
    fn useless_item_never_stalls() {
        let data = tables();
        let audio = SoundLengths::default();
        let mut battle = started(&data, &audio);
        battle.drain_cues();

        battle.enqueue(BattleTurnEvent::new(
            EntityId(1),
            Side::Player,
            TurnAction::Item { item_id: 9 },
            40,
            30,
        ));
        run(&mut battle, &data, &audio, 2100.0);
        assert!(!battle.is_presenting());
        assert_eq!(messages(&mut battle), vec!["Absolutely nothing happened!"]);
    }

    #[test]
    fn capture_failure_retires() {
        let data = tables();
        let audio = SoundLengths::default();
        let mut battle = started(&data, &audio);
        battle.drain_cues();

        battle.enqueue(BattleTurnEvent::new(
            EntityId(1),
            Side::Player,
            TurnAction::Item { item_id: 4 },
            40,
            30,
        ));
        run(&mut battle, &data, &audio, 1000.0);
        let capture = battle.view(&data).capture;
        assert!(
            matches!(capture, Some(CapturePhase::ShellOpen { .. })),
            "{capture:?}"
        );

        run(&mut battle, &data, &audio, 10_000.0);
        assert!(!battle.is_presenting());
        assert_eq!(
            messages(&mut battle),
            vec!["Gold used the Poke Ball.", "The wild Sentret broke free!"]
        );
    }

    #[test]
    fn events_for_other_players_are_ignored() {
        let data = tables();
        let audio = SoundLengths::default();
        let mut battle = started(&data, &audio);
        battle.enqueue(BattleTurnEvent::new(EntityId(99), Side::Player, TurnAction::Flee, 1, 1));
        assert_eq!(battle.queued(), 0);
    }

    #[test]
    fn missing_species_skips_display_only() {
        let data = StaticTables::new();
        let audio = SoundLengths::default();
        let mut battle = started(&data, &audio);
        let view = battle.view(&data);
        assert!(view.player.is_none());
        assert!(view.opponent.is_none());

        battle.enqueue(BattleTurnEvent::new(
            EntityId(1),
            Side::Player,
            TurnAction::Attack { move_id: 33 },
            40,
            29,
        ));
        run(&mut battle, &data, &audio, 5000.0);
        assert!(!battle.is_presenting());
        assert_eq!(battle.displayed().opponent, 29);
    }
}
