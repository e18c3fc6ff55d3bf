mod catalog;
mod conversation;
mod tutorial;

pub use catalog::{BuiltinDialogues, DialogueCatalog, DialogueContext, Script, UNWILLING_TO_TALK};
pub use conversation::{
    npc_says, player_says, yes_no, Conversation, ConversationState, DialogueAction,
    DialogueError, DialogueInput, Line, Prompt, Speaker,
};
pub use tutorial::{Tutorial, TUTORIAL_MUSIC, TUTORIAL_STORY_PROGRESS};
