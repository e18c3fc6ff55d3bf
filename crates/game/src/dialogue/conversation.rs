use std::collections::VecDeque;

use crate::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Npc,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueAction {
    HealParty { npc_index: u32 },
    UpdateStoryProgress(u32),
    StartBattle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Say { speaker: Speaker, text: String },
    Choice { options: Vec<String>, branches: Vec<Vec<Line>> },
    Act(DialogueAction),
}

pub fn npc_says(text: &str) -> Line {
    Line::Say {
        speaker: Speaker::Npc,
        text: text.to_string(),
    }
}

pub fn player_says(text: &str) -> Line {
    Line::Say {
        speaker: Speaker::Player,
        text: text.to_string(),
    }
}

pub fn yes_no(yes: Vec<Line>, no: Vec<Line>) -> Line {
    Line::Choice {
        options: vec!["Yes".to_string(), "No".to_string()],
        branches: vec![yes, no],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    AwaitingDismiss,
    AwaitingChoice,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueInput {
    Dismiss,
    Choose(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogueError {
    #[error("conversation already finished")]
    Finished,
    #[error("waiting for a choice, not a dismiss")]
    ExpectedChoice,
    #[error("waiting for a dismiss, not a choice")]
    ExpectedDismiss,
    #[error("no option {0}")]
    NoSuchOption(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt<'a> {
    pub title: &'a str,
    pub text: Option<&'a str>,
    pub options: &'a [String],
}

const PLAYER_TITLE: &str = "You";
const CHOICE_TITLE: &str = "Choose an option";

/// A suspended script. Each input resumes it up to the next line that needs
/// the player again; actions met on the way are queued for the caller.
#[derive(Debug, Clone)]
pub struct Conversation {
    npc_name: String,
    target: EntityId,
    pending: VecDeque<Line>,
    current: Option<Line>,
    actions: Vec<DialogueAction>,
}

impl Conversation {
    pub fn new(npc_name: &str, target: EntityId, lines: Vec<Line>) -> Self {
        let mut conversation = Self {
            npc_name: npc_name.to_string(),
            target,
            pending: lines.into(),
            current: None,
            actions: Vec::new(),
        };
        conversation.settle();
        conversation
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn npc_name(&self) -> &str {
        &self.npc_name
    }

    fn settle(&mut self) {
        self.current = None;
        while let Some(line) = self.pending.pop_front() {
            match line {
                Line::Act(action) => self.actions.push(action),
                line => {
                    self.current = Some(line);
                    return;
                }
            }
        }
    }

    pub fn state(&self) -> ConversationState {
        match &self.current {
            Some(Line::Say { .. }) => ConversationState::AwaitingDismiss,
            Some(Line::Choice { .. }) => ConversationState::AwaitingChoice,
            Some(Line::Act(_)) | None => ConversationState::Finished,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == ConversationState::Finished
    }

    pub fn input(&mut self, input: DialogueInput) -> Result<ConversationState, DialogueError> {
        match (self.current.take(), input) {
            (None, _) => return Err(DialogueError::Finished),
            (Some(Line::Say { .. }), DialogueInput::Dismiss) => self.settle(),
            (Some(Line::Choice { options, branches }), DialogueInput::Choose(index)) => {
                if index >= options.len() {
                    self.current = Some(Line::Choice { options, branches });
                    return Err(DialogueError::NoSuchOption(index));
                }
                let branch = branches.into_iter().nth(index).unwrap_or_default();
                for line in branch.into_iter().rev() {
                    self.pending.push_front(line);
                }
                self.settle();
            }
            (Some(line @ Line::Choice { .. }), DialogueInput::Dismiss) => {
                self.current = Some(line);
                return Err(DialogueError::ExpectedChoice);
            }
            (Some(line), DialogueInput::Choose(_)) => {
                self.current = Some(line);
                return Err(DialogueError::ExpectedDismiss);
            }
            (Some(Line::Act(action)), DialogueInput::Dismiss) => {
                self.actions.push(action);
                self.settle();
            }
        }
        Ok(self.state())
    }

    pub fn prompt(&self) -> Option<Prompt<'_>> {
        match self.current.as_ref()? {
            Line::Say { speaker, text } => Some(Prompt {
                title: match speaker {
                    Speaker::Npc => &self.npc_name,
                    Speaker::Player => PLAYER_TITLE,
                },
                text: Some(text),
                options: &[],
            }),
            Line::Choice { options, .. } => Some(Prompt {
                title: CHOICE_TITLE,
                text: None,
                options,
            }),
            Line::Act(_) => None,
        }
    }

    pub fn drain_actions(&mut self) -> Vec<DialogueAction> {
        std::mem::take(&mut self.actions)
    }
}
