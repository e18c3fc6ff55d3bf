mod capture;
mod event;
mod processor;
mod script;
mod timing;
mod tween;

pub use capture::{arc_position, CaptureAnimation, CapturePhase};
pub use event::{BattleTurnEvent, Effect, Side, TurnAction, TurnFlags};
pub use processor::{
    BattleChoice, BattleCue, BattlePhase, BattleProcessor, BattleView, ChoiceError,
    CreatureDisplay, TextRows,
};
pub use script::{
    BattleKind, Stage, StepAction, Vitals, CONTINUE_PROMPT, TRAINER_BATTLE_MUSIC, WILD_BATTLE_MUSIC,
};
pub use timing::BattleTiming;
pub use tween::VitalityTween;
