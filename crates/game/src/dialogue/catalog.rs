use super::conversation::{npc_says, yes_no, DialogueAction, Line};

pub const UNWILLING_TO_TALK: &str = "He doesn't seem to want to talk to you.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueContext<'a> {
    pub player_name: &'a str,
    pub story_progress: u32,
    pub npc_index: u32,
    pub dialogue_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub speaker: String,
    pub lines: Vec<Line>,
}

impl Script {
    fn new(speaker: &str, lines: Vec<Line>) -> Self {
        Self {
            speaker: speaker.to_string(),
            lines,
        }
    }
}

/// Scripts for talkable npcs. `None` means the npc has nothing to say.
pub trait DialogueCatalog {
    fn script(&self, ctx: &DialogueContext) -> Option<Script>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDialogues;

impl DialogueCatalog for BuiltinDialogues {
    fn script(&self, ctx: &DialogueContext) -> Option<Script> {
        match ctx.npc_index {
            1 => Some(Script::new(
                "???",
                vec![
                    npc_says("..."),
                    npc_says("So this is the famous creature lab..."),
                    npc_says("...What are you staring at?"),
                ],
            )),
            2 => mom(ctx),
            5 => Some(professor(ctx)),
            9 => Some(Script::new(
                "Officer",
                vec![
                    npc_says("Different kinds of creatures appear past here."),
                    npc_says("If you want to catch them all, you have to look everywhere."),
                ],
            )),
            11 => Some(Script::new(
                "Nurse",
                vec![
                    npc_says("Welcome to our healing center."),
                    npc_says("Shall we heal your creatures?"),
                    yes_no(
                        vec![
                            npc_says("OK, may I see your creatures?"),
                            Line::Act(DialogueAction::HealParty {
                                npc_index: ctx.npc_index,
                            }),
                            npc_says("Your creatures are fully healed."),
                            npc_says("We hope to see you again!"),
                        ],
                        vec![npc_says("OK, come back anytime!")],
                    ),
                ],
            )),
            20 => Some(Script::new(
                "Will",
                vec![
                    npc_says(&format!("Welcome to the league, {}.", ctx.player_name)),
                    npc_says("I have trained all around the world."),
                    npc_says("Losing is not an option."),
                    Line::Act(DialogueAction::StartBattle),
                ],
            )),
            _ => None,
        }
    }
}

fn mom(ctx: &DialogueContext) -> Option<Script> {
    let lines = match ctx.story_progress {
        3 => vec![
            npc_says("So, what was the professor's errand?"),
            npc_says("... That does sound challenging."),
            npc_says("But you should be proud that people rely on you."),
        ],
        1 | 2 => vec![
            npc_says("The professor is waiting for you."),
            npc_says("Hurry up!"),
        ],
        _ => return None,
    };
    Some(Script::new("Mom", lines))
}

fn professor(ctx: &DialogueContext) -> Script {
    let starter = match ctx.dialogue_number {
        152 => Some("You like CHIKORITA, the grass creature?"),
        155 => Some("You'll take CYNDAQUIL, the fire creature?"),
        158 => Some("Do you want TOTODILE, the water creature?"),
        _ => None,
    };

    let lines = if let Some(question) = starter {
        vec![
            npc_says(question),
            yes_no(
                vec![
                    npc_says("I think that's a great creature too!"),
                    npc_says("If your creature is hurt, heal it with this machine."),
                    Line::Act(DialogueAction::UpdateStoryProgress(3)),
                ],
                vec![npc_says("Think it over carefully. Your partner is important.")],
            ),
        ]
    } else {
        match ctx.story_progress {
            3 => vec![
                npc_says("My acquaintance goes everywhere and finds rarities."),
                npc_says(&format!("{}, I'm counting on you!", ctx.player_name)),
            ],
            2 => vec![npc_says("Go on, pick one!")],
            _ => vec![
                npc_says(&format!("{}! There you are! I need a favor.", ctx.player_name)),
                npc_says("Could you look into a discovery for us?"),
                npc_says("I'll give you a creature for a partner."),
                npc_says("Go on, pick one!"),
                Line::Act(DialogueAction::UpdateStoryProgress(2)),
            ],
        }
    };
    Script::new("Elm", lines)
}
