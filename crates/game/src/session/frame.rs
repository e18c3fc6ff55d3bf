use glam::{IVec2, Vec2};

use crate::battle::BattleView;
use crate::entity::{Camera, EntityId};

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteView {
    pub id: EntityId,
    pub name: String,
    pub sprite: String,
    pub tile: IVec2,
    pub screen: Vec2,
    pub local: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogueView {
    pub title: String,
    pub text: Option<String>,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    Loading,
    World { camera: Camera, sprites: Vec<SpriteView> },
    Battle(BattleView),
    Tutorial { page: usize, row1: String, row2: String },
}

impl Scene {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scene::Loading => "loading",
            Scene::World { .. } => "world",
            Scene::Battle(_) => "battle",
            Scene::Tutorial { .. } => "tutorial",
        }
    }
}

/// One render pass worth of state, detached from the session.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub now_ms: f64,
    pub scene: Scene,
    pub dialogue: Option<DialogueView>,
    pub chat: Vec<String>,
    pub latency_ms: Option<f64>,
    pub entity_count: usize,
}
