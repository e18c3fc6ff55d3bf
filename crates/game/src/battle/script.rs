use log::warn;

use super::capture::CaptureAnimation;
use super::event::{BattleTurnEvent, Side, TurnAction, TurnFlags};
use super::timing::BattleTiming;
use super::tween::VitalityTween;
use crate::data::{AudioCatalog, GameData};
use crate::entity::{Creature, EntityId};
use crate::simulation::Sequence;

pub const WILD_BATTLE_MUSIC: &str = "wild_battle_johto.ogg";
pub const TRAINER_BATTLE_MUSIC: &str = "trainer_battle_johto.ogg";
pub const VICTORY_MUSIC: &str = "wild_victory.ogg";
pub const POSITIONED_SFX: &str = "positioned.ogg";
pub const BALL_POOF_SFX: &str = "ball_poof.ogg";
pub const TAKE_DAMAGE_SFX: &str = "take_damage.ogg";
pub const CONTINUE_PROMPT: &str = "Click here to continue...";

const UNKNOWN_NAME: &str = "???";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleKind {
    Wild,
    Trainer { opponent_id: EntityId, opponent_name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Flash,
    SlideIn,
    Appeared,
    SendOut,
    Turn,
    Capture,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    IntroDone,
    Retire,
    ForcedSwap,
    Terminal(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    Stage(Stage),
    Text { row1: String, row2: String },
    SecondRow(String),
    ClearText,
    Sfx(String),
    Music(String),
    Tween(Side, VitalityTween),
    SendOut(usize),
    Capture(CaptureAnimation),
    Hold,
    Finish(Resolution),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vitals {
    pub player: u32,
    pub opponent: u32,
}

impl Vitals {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Opponent => self.opponent,
        }
    }

    pub fn set(&mut self, side: Side, value: u32) {
        match side {
            Side::Player => self.player = value,
            Side::Opponent => self.opponent = value,
        }
    }
}

/// Everything a script needs to know about the battle at the moment an
/// event starts presenting.
pub struct ScriptContext<'a> {
    pub data: &'a dyn GameData,
    pub audio: &'a dyn AudioCatalog,
    pub timing: &'a BattleTiming,
    pub kind: &'a BattleKind,
    pub player_name: &'a str,
    pub party: &'a [Creature],
    pub active: usize,
    pub opponent: &'a Creature,
    pub displayed: Vitals,
}

impl ScriptContext<'_> {
    fn species_name(&self, creature: Option<&Creature>) -> String {
        match creature.and_then(|c| self.data.species(c.species_id)) {
            Some(species) => species.name.clone(),
            None => {
                warn!("missing species for {:?}", creature.map(|c| c.species_id));
                UNKNOWN_NAME.to_string()
            }
        }
    }

    fn active_name(&self) -> String {
        self.species_name(self.party.get(self.active))
    }

    fn opponent_name(&self) -> String {
        self.species_name(Some(self.opponent))
    }

    fn sound_ms(&self, name: &str) -> f64 {
        self.audio.duration_ms(name).unwrap_or(0.0)
    }

    fn tween(&self, from: u32, to: u32) -> VitalityTween {
        VitalityTween::new(from, to, self.timing.tween_step, self.timing.tween_interval_ms)
    }

    fn defeated_message(&self) -> String {
        match self.kind {
            BattleKind::Wild => format!("Enemy {} was defeated!", self.opponent_name()),
            BattleKind::Trainer { opponent_name, .. } => format!("{opponent_name} was defeated!"),
        }
    }
}

fn send_out(seq: &mut Sequence<StepAction>, ctx: &ScriptContext, party_index: usize) {
    let name = ctx.species_name(ctx.party.get(party_index)).to_uppercase();
    seq.push(0.0, StepAction::Stage(Stage::SendOut));
    seq.push(0.0, StepAction::SendOut(party_index));
    seq.push(
        ctx.timing.ticks(ctx.timing.send_out_text_ticks),
        StepAction::Text {
            row1: format!("Go! {name}!"),
            row2: String::new(),
        },
    );
    seq.push(0.0, StepAction::Sfx(BALL_POOF_SFX.to_string()));
    seq.push(ctx.timing.ticks(ctx.timing.send_out_spawn_ticks), StepAction::Hold);
    seq.push(0.0, StepAction::ClearText);
    seq.push(0.0, StepAction::Stage(Stage::Turn));
}

pub fn intro(ctx: &ScriptContext) -> Sequence<StepAction> {
    let timing = ctx.timing;
    let music = match ctx.kind {
        BattleKind::Wild => WILD_BATTLE_MUSIC,
        BattleKind::Trainer { .. } => TRAINER_BATTLE_MUSIC,
    };
    let appeared = match ctx.kind {
        BattleKind::Wild => format!("Wild {} appeared!", ctx.opponent_name().to_uppercase()),
        BattleKind::Trainer { opponent_name, .. } => format!(
            "{opponent_name} sent out {}!",
            ctx.opponent_name().to_uppercase()
        ),
    };

    let mut seq = Sequence::new()
        .then(0.0, StepAction::Music(music.to_string()))
        .then(timing.flash_ms(), StepAction::Stage(Stage::Flash))
        .then(timing.ticks(timing.slide_in_ticks), StepAction::Stage(Stage::SlideIn))
        .then(0.0, StepAction::Stage(Stage::Appeared))
        .then(0.0, StepAction::Sfx(POSITIONED_SFX.to_string()))
        .then(
            timing.appeared_hold_ms,
            StepAction::Text {
                row1: appeared,
                row2: String::new(),
            },
        );
    send_out(&mut seq, ctx, ctx.active);
    seq.push(0.0, StepAction::Finish(Resolution::IntroDone));
    seq
}

pub fn turn(ctx: &ScriptContext, event: &BattleTurnEvent) -> Sequence<StepAction> {
    match event.action {
        TurnAction::Attack { move_id } => attack(ctx, event, move_id),
        TurnAction::Item { item_id } => item(ctx, event, item_id),
        TurnAction::Swap { party_index } => swap(ctx, party_index as usize),
        TurnAction::Flee => flee(ctx, event),
    }
}

fn retire(seq: &mut Sequence<StepAction>, pause_ms: f64) {
    seq.push(pause_ms, StepAction::Hold);
    seq.push(0.0, StepAction::ClearText);
    seq.push(0.0, StepAction::Finish(Resolution::Retire));
}

fn attack(ctx: &ScriptContext, event: &BattleTurnEvent, move_id: u32) -> Sequence<StepAction> {
    let timing = ctx.timing;
    let info = ctx.data.move_info(move_id);
    if info.is_none() {
        warn!("missing move {move_id}, presenting without name or sound");
    }

    let move_name = info.map_or(UNKNOWN_NAME.to_string(), |m| m.name.clone());
    let sound = info.map(|m| m.sound_name());
    let sound_ms = sound.as_deref().map_or(0.0, |s| ctx.sound_ms(s));
    // an unknown move still drives the bar to the authoritative value
    let has_power = info.is_none_or(|m| m.power.is_some());
    let deals_damage = info.is_none_or(|m| m.deals_damage());

    let target = event.mover.opposite();
    let before = ctx.displayed.get(target);
    let after = event.vitality(target);

    let row1 = match event.mover {
        Side::Player => format!("{} used {move_name}!", ctx.active_name()),
        Side::Opponent => format!("Enemy {} used {move_name}!", ctx.opponent_name()),
    };
    let row2 = if has_power && before == after {
        "But it missed!".to_string()
    } else {
        String::new()
    };

    let mut seq = Sequence::new().then(0.0, StepAction::Stage(Stage::Turn));
    if let Some(sound) = sound {
        seq.push(0.0, StepAction::Sfx(sound));
    }
    seq.push(sound_ms + timing.text_hold_ms, StepAction::Text { row1, row2 });

    if !deals_damage {
        seq.push(timing.failed_move_ms, StepAction::SecondRow("But it failed!".to_string()));
        seq.push(0.0, StepAction::ClearText);
        seq.push(0.0, StepAction::Finish(Resolution::Retire));
        return seq;
    }

    seq.push(0.0, StepAction::Sfx(TAKE_DAMAGE_SFX.to_string()));
    if let Some(message) = event.effect.message() {
        seq.push(0.0, StepAction::SecondRow(message.to_string()));
    }
    let tween = ctx.tween(before, after);
    seq.push(tween.duration_ms(), StepAction::Tween(target, tween));

    let flags = event.flags();
    let over = flags.contains(TurnFlags::BATTLE_OVER);
    match event.mover {
        Side::Player if over => {
            seq.push(timing.post_tween_pause_ms, StepAction::Hold);
            seq.push(0.0, StepAction::Music(VICTORY_MUSIC.to_string()));
            seq.push(0.0, StepAction::Finish(Resolution::Terminal(ctx.defeated_message())));
        }
        Side::Opponent if over && flags.contains(TurnFlags::ALL_FAINTED) => {
            seq.push(
                0.0,
                StepAction::Finish(Resolution::Terminal(
                    "All of your creatures have fainted!".to_string(),
                )),
            );
        }
        Side::Opponent if over => {
            seq.push(timing.post_tween_pause_ms, StepAction::Hold);
            seq.push(0.0, StepAction::ClearText);
            seq.push(0.0, StepAction::Finish(Resolution::ForcedSwap));
        }
        _ => retire(&mut seq, timing.post_tween_pause_ms),
    }
    seq
}

fn item(ctx: &ScriptContext, event: &BattleTurnEvent, item_id: u32) -> Sequence<StepAction> {
    let timing = ctx.timing;
    let info = ctx.data.item(item_id);
    let item_name = info.map_or(UNKNOWN_NAME.to_string(), |i| i.name.clone());
    let mut seq = Sequence::new().then(0.0, StepAction::Stage(Stage::Turn));

    if info.is_some_and(|i| i.captures) {
        let captured = event.flags().contains(TurnFlags::CAPTURED);
        let animation = CaptureAnimation::new(timing.shake_cycles, captured);
        seq.push(
            0.0,
            StepAction::Text {
                row1: format!("{} used the {item_name}.", ctx.player_name),
                row2: String::new(),
            },
        );
        seq.push(0.0, StepAction::Stage(Stage::Capture));
        seq.push(timing.ticks(animation.total_ticks()), StepAction::Capture(animation));

        let name = ctx.opponent_name();
        if captured {
            seq.push(0.0, StepAction::Music(VICTORY_MUSIC.to_string()));
            seq.push(
                0.0,
                StepAction::Finish(Resolution::Terminal(format!("Gotcha! Wild {name} was caught!"))),
            );
        } else {
            seq.push(0.0, StepAction::Stage(Stage::Turn));
            seq.push(
                timing.broke_free_ms,
                StepAction::Text {
                    row1: format!("The wild {name} broke free!"),
                    row2: String::new(),
                },
            );
            seq.push(0.0, StepAction::ClearText);
            seq.push(0.0, StepAction::Finish(Resolution::Retire));
        }
        return seq;
    }

    let before = ctx.displayed.player;
    if event.player_vitality != before {
        let tween = ctx.tween(before, event.player_vitality);
        seq.push(
            timing.text_hold_ms,
            StepAction::Text {
                row1: format!("{} used the {item_name}.", ctx.player_name),
                row2: String::new(),
            },
        );
        seq.push(tween.duration_ms(), StepAction::Tween(Side::Player, tween));
        retire(&mut seq, timing.post_tween_pause_ms);
    } else {
        seq.push(
            0.0,
            StepAction::Text {
                row1: "Absolutely nothing happened!".to_string(),
                row2: String::new(),
            },
        );
        retire(&mut seq, timing.nothing_happened_ms);
    }
    seq
}

fn swap(ctx: &ScriptContext, party_index: usize) -> Sequence<StepAction> {
    let mut seq = Sequence::new().then(0.0, StepAction::ClearText);
    send_out(&mut seq, ctx, party_index);
    seq.push(0.0, StepAction::Finish(Resolution::Retire));
    seq
}

fn flee(ctx: &ScriptContext, event: &BattleTurnEvent) -> Sequence<StepAction> {
    let mut seq = Sequence::new().then(0.0, StepAction::Stage(Stage::Turn));
    if event.flags().contains(TurnFlags::FLED) {
        seq.push(0.0, StepAction::Finish(Resolution::Terminal("Got away safely!".to_string())));
    } else {
        seq.push(
            0.0,
            StepAction::Text {
                row1: "Can't escape!".to_string(),
                row2: String::new(),
            },
        );
        retire(&mut seq, ctx.timing.failed_flee_ms);
    }
    seq
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::Effect;
    use crate::data::{MoveInfo, SoundLengths, Species, StaticTables};

    fn tables() -> StaticTables {
        let mut tables = StaticTables::new();
        tables
            .add_species(Species {
                id: 1,
                name: "Chikorita".into(),
                sprite: "chikorita".into(),
                kind: "grass".into(),
                secondary_kind: None,
            })
            .add_species(Species {
                id: 2,
                name: "Rattata".into(),
                sprite: "rattata".into(),
                kind: "normal".into(),
                secondary_kind: None,
            })
            .add_move(MoveInfo {
                id: 33,
                name: "Tackle".into(),
                kind: "normal".into(),
                power: Some(40),
                accuracy: Some(100),
                pp: 35,
            })
            .add_move(MoveInfo {
                id: 45,
                name: "Growl".into(),
                kind: "normal".into(),
                power: None,
                accuracy: Some(100),
                pp: 40,
            });
        tables
    }

    fn creature(species_id: u32, vitality: u32) -> Creature {
        Creature {
            species_id,
            experience: 125,
            vitality,
            max_vitality: 40,
            moves: vec![33, 45],
        }
    }

    fn texts(seq: &mut Sequence<StepAction>) -> Vec<String> {
        seq.advance(1_000_000.0)
            .into_iter()
            .filter_map(|a| match a {
                StepAction::Text { row1, .. } => Some(row1),
                StepAction::SecondRow(row2) => Some(row2),
                StepAction::Finish(Resolution::Terminal(msg)) => Some(msg),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn attack_hold_includes_sound_length() {
        let data = tables();
        let audio = SoundLengths::default().with("tackle.ogg", 500.0);
        let timing = BattleTiming::default();
        let party = [creature(1, 40)];
        let opponent = creature(2, 40);
        let ctx = ScriptContext {
            data: &data,
            audio: &audio,
            timing: &timing,
            kind: &BattleKind::Wild,
            player_name: "Gold",
            party: &party,
            active: 0,
            opponent: &opponent,
            displayed: Vitals {
                player: 40,
                opponent: 40,
            },
        };
        let event = BattleTurnEvent::new(
            EntityId(1),
            Side::Player,
            TurnAction::Attack { move_id: 33 },
            40,
            10,
        )
        .with_effect(Effect::Super);
        let seq = turn(&ctx, &event);
        // text hold, tween of 30 steps, pause
        assert_eq!(seq.remaining_ms(), 1500.0 + 3000.0 + 1000.0);

        let mut seq = seq;
        assert_eq!(
            texts(&mut seq),
            vec!["Chikorita used Tackle!", "It's super effective!"]
        );
    }

    #[test]
    fn status_move_fails() {
        let data = tables();
        let audio = SoundLengths::default();
        let timing = BattleTiming::default();
        let party = [creature(1, 40)];
        let opponent = creature(2, 40);
        let ctx = ScriptContext {
            data: &data,
            audio: &audio,
            timing: &timing,
            kind: &BattleKind::Wild,
            player_name: "Gold",
            party: &party,
            active: 0,
            opponent: &opponent,
            displayed: Vitals {
                player: 40,
                opponent: 40,
            },
        };
        let event = BattleTurnEvent::new(
            EntityId(1),
            Side::Opponent,
            TurnAction::Attack { move_id: 45 },
            40,
            40,
        );
        let mut seq = turn(&ctx, &event);
        assert_eq!(
            texts(&mut seq),
            vec!["Enemy Rattata used Growl!", "But it failed!"]
        );
    }

    #[test]
    fn unchanged_target_misses() {
        let data = tables();
        let audio = SoundLengths::default();
        let timing = BattleTiming::default();
        let party = [creature(1, 40)];
        let opponent = creature(2, 40);
        let ctx = ScriptContext {
            data: &data,
            audio: &audio,
            timing: &timing,
            kind: &BattleKind::Wild,
            player_name: "Gold",
            party: &party,
            active: 0,
            opponent: &opponent,
            displayed: Vitals {
                player: 40,
                opponent: 40,
            },
        };
        let event = BattleTurnEvent::new(
            EntityId(1),
            Side::Player,
            TurnAction::Attack { move_id: 33 },
            40,
            40,
        );
        let mut seq = turn(&ctx, &event);
        let all = seq.advance(0.0);
        assert!(all.contains(&StepAction::Text {
            row1: "Chikorita used Tackle!".into(),
            row2: "But it missed!".into()
        }));
    }

    #[test]
    fn missing_species_uses_placeholder() {
        let data = StaticTables::new();
        let audio = SoundLengths::default();
        let timing = BattleTiming::default();
        let party = [creature(1, 40)];
        let opponent = creature(2, 40);
        let ctx = ScriptContext {
            data: &data,
            audio: &audio,
            timing: &timing,
            kind: &BattleKind::Wild,
            player_name: "Gold",
            party: &party,
            active: 0,
            opponent: &opponent,
            displayed: Vitals {
                player: 40,
                opponent: 40,
            },
        };
        let mut seq = intro(&ctx);
        assert_eq!(texts(&mut seq), vec!["Wild ??? appeared!", "Go! ???!"]);
        assert!(seq.is_finished());
    }
}
