use std::collections::{HashMap, HashSet};

use glam::{IVec2, Vec2};
use log::debug;

use super::events::TickEvents;
use crate::entity::{
    occupies, AssetState, Entity, EntityId, Interpolated, Npc, Player, WorldClock, WorldConfig,
};
use crate::net::{GroundItem, WorldSnapshot};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub spawned: Vec<EntityId>,
    pub removed: Vec<EntityId>,
    pub viewpoint_assigned: bool,
}

#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    clock: WorldClock,
    local_id: Option<EntityId>,
    login_at_ms: u64,
    entities: HashMap<EntityId, Entity>,
    events: TickEvents,
    ground_items: Vec<GroundItem>,
    snapshots_applied: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            clock: WorldClock::default(),
            local_id: None,
            login_at_ms: 0,
            entities: HashMap::new(),
            events: TickEvents::default(),
            ground_items: Vec::new(),
            snapshots_applied: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn clock(&self) -> WorldClock {
        self.clock
    }

    pub fn local_id(&self) -> Option<EntityId> {
        self.local_id
    }

    pub fn set_login_time(&mut self, epoch_ms: u64) {
        self.login_at_ms = epoch_ms;
    }

    pub fn snapshots_applied(&self) -> u64 {
        self.snapshots_applied
    }

    pub fn apply_snapshot(&mut self, snapshot: &WorldSnapshot, received_at_ms: f64) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        if let Some(viewpoint) = snapshot.viewpoint_id
            && self.local_id != Some(viewpoint)
        {
            self.local_id = Some(viewpoint);
            report.viewpoint_assigned = true;
        }

        let connected: HashSet<EntityId> = snapshot.connected_ids.iter().copied().collect();
        let npcs_present: HashSet<EntityId> = snapshot.npcs.iter().map(|n| n.id).collect();

        self.entities.retain(|id, entity| {
            let keep = match entity {
                Entity::Controllable(_) => connected.contains(id),
                Entity::NonControllable(_) => npcs_present.contains(id),
            };
            if !keep {
                report.removed.push(*id);
            }
            keep
        });

        let asset_at = received_at_ms + self.config.asset_init_delay_ms;

        for state in snapshot.players.iter().filter(|p| connected.contains(&p.id)) {
            match self.entities.get_mut(&state.id) {
                Some(Entity::Controllable(player)) => player.apply(state),
                Some(existing) => {
                    // an id switched kind, keep the existing instance's assets
                    let assets = existing.assets();
                    *existing = Entity::Controllable(Player::from_state(state, assets));
                }
                None => {
                    let player = Player::from_state(state, AssetState::Scheduled { at_ms: asset_at });
                    self.entities.insert(state.id, Entity::Controllable(player));
                    report.spawned.push(state.id);
                }
            }
        }

        for state in &snapshot.npcs {
            match self.entities.get_mut(&state.id) {
                Some(Entity::NonControllable(npc)) => npc.apply(state),
                Some(existing) => {
                    let assets = existing.assets();
                    *existing = Entity::NonControllable(Npc::from_state(state, assets));
                }
                None => {
                    let npc = Npc::from_state(state, AssetState::Scheduled { at_ms: asset_at });
                    self.entities.insert(state.id, Entity::NonControllable(npc));
                    report.spawned.push(state.id);
                }
            }
        }

        self.clock.reset(received_at_ms);
        self.events = TickEvents::for_viewpoint(snapshot, self.local_id, self.login_at_ms);
        self.ground_items.clone_from(&snapshot.ground_items);
        self.snapshots_applied += 1;

        if !report.spawned.is_empty() || !report.removed.is_empty() {
            debug!(
                "snapshot reconciled: {} spawned, {} removed, {} total",
                report.spawned.len(),
                report.removed.len(),
                self.entities.len()
            );
        }

        report
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn local_player(&self) -> Option<&Player> {
        self.local_id
            .and_then(|id| self.entities.get(&id))
            .and_then(Entity::as_player)
    }

    pub fn events(&self) -> &TickEvents {
        &self.events
    }

    pub fn take_events(&mut self) -> TickEvents {
        std::mem::take(&mut self.events)
    }

    pub fn ground_items(&self) -> &[GroundItem] {
        &self.ground_items
    }

    pub fn screen_position(&self, id: EntityId, now_ms: f64) -> Option<Vec2> {
        self.entities
            .get(&id)
            .map(|entity| entity.screen_position(self.clock, now_ms, &self.config))
    }

    pub fn entity_at(&self, tile: IVec2) -> Option<&Entity> {
        let mut hits: Vec<&Entity> = self
            .entities
            .values()
            .filter(|e| Some(e.id()) != self.local_id && occupies(e.motion(), tile))
            .collect();
        hits.sort_by_key(|e| e.id());
        hits.into_iter().next()
    }

    /// Entities in draw order: rows top to bottom, ties broken by id.
    pub fn draw_order(&self) -> Vec<&Entity> {
        let mut order: Vec<&Entity> = self.entities.values().collect();
        order.sort_by_key(|e| (e.motion().tile.y, e.id()));
        order
    }

    pub fn tick_animations(&mut self) {
        let threshold = self.config.walk_frame_threshold;
        for entity in self.entities.values_mut() {
            entity.advance_walk(threshold);
        }
    }

    /// Entities whose deliberate asset delay has elapsed; each is marked
    /// `Requested` and returned once.
    pub fn due_asset_requests(&mut self, now_ms: f64) -> Vec<EntityId> {
        let mut due = Vec::new();
        for entity in self.entities.values_mut() {
            if let AssetState::Scheduled { at_ms } = entity.assets()
                && now_ms >= at_ms
            {
                entity.set_assets(AssetState::Requested);
                due.push(entity.id());
            }
        }
        due.sort();
        due
    }

    pub fn resolve_assets(&mut self, id: EntityId, available: bool) {
        if let Some(entity) = self.entities.get_mut(&id) {
            let state = if available {
                AssetState::Ready
            } else {
                AssetState::Unavailable
            };
            entity.set_assets(state);
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.events = TickEvents::default();
        self.ground_items.clear();
        self.local_id = None;
        self.clock = WorldClock::default();
        self.snapshots_applied = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Creature, Direction};
    use crate::net::{NpcState, PlayerState};

    fn player(id: u64, tile: [i32; 2], pending: Option<Direction>) -> PlayerState {
        PlayerState {
            id: EntityId(id),
            name: format!("player{id}"),
            tile,
            pending,
            facing: pending.unwrap_or_default(),
            current_chunk: 0,
            party: vec![Creature {
                species_id: 1,
                experience: 27,
                vitality: 10,
                max_vitality: 12,
                moves: vec![1],
            }],
            inventory: Vec::new(),
            story_progress: 2,
        }
    }

    fn npc(id: u64, tile: [i32; 2]) -> NpcState {
        NpcState {
            id: EntityId(id),
            npc_index: 1,
            name: "Elm".into(),
            tile,
            pending: None,
            facing: Direction::Down,
            current_chunk: 0,
            party: Vec::new(),
        }
    }

    fn snapshot(players: Vec<PlayerState>, npcs: Vec<NpcState>) -> WorldSnapshot {
        WorldSnapshot {
            viewpoint_id: Some(EntityId(1)),
            connected_ids: players.iter().map(|p| p.id).collect(),
            players,
            npcs,
            ..Default::default()
        }
    }

    #[test]
    fn creates_then_updates_in_place() {
        let mut world = World::default();
        let report = world.apply_snapshot(&snapshot(vec![player(1, [0, 0], None)], vec![]), 0.0);
        assert!(report.viewpoint_assigned);
        assert_eq!(report.spawned, vec![EntityId(1)]);

        world.resolve_assets(EntityId(1), true);
        let report = world.apply_snapshot(&snapshot(vec![player(1, [5, 0], None)], vec![]), 200.0);
        assert!(report.spawned.is_empty());
        assert!(!report.viewpoint_assigned);

        let local = world.local_player().unwrap();
        assert_eq!(local.motion.tile, IVec2::new(5, 0));
        // instance kept, so local asset state survived
        assert_eq!(local.assets, AssetState::Ready);
    }

    #[test]
    fn prunes_disconnected_players_even_if_listed() {
        let mut world = World::default();
        world.apply_snapshot(
            &snapshot(vec![player(1, [0, 0], None), player(2, [1, 1], None)], vec![]),
            0.0,
        );
        assert_eq!(world.entity_count(), 2);

        let mut next = snapshot(vec![player(1, [0, 0], None), player(2, [1, 1], None)], vec![]);
        next.connected_ids = vec![EntityId(1)];
        let report = world.apply_snapshot(&next, 200.0);
        assert_eq!(report.removed, vec![EntityId(2)]);
        assert!(world.get(EntityId(2)).is_none());
    }

    #[test]
    fn prunes_npcs_absent_from_snapshot() {
        let mut world = World::default();
        world.apply_snapshot(&snapshot(vec![], vec![npc(10, [0, 0]), npc(11, [4, 4])]), 0.0);
        world.apply_snapshot(&snapshot(vec![], vec![npc(11, [4, 4])]), 200.0);
        assert!(world.get(EntityId(10)).is_none());
        assert!(world.get(EntityId(11)).is_some());
    }

    #[test]
    fn reapplying_is_idempotent() {
        let mut world = World::default();
        let snap = snapshot(
            vec![player(1, [3, 4], Some(Direction::Right))],
            vec![npc(10, [2, 2])],
        );
        world.apply_snapshot(&snap, 0.0);
        let first: Vec<_> = world.draw_order().into_iter().map(|e| format!("{e:?}")).collect();
        world.apply_snapshot(&snap, 0.0);
        let second: Vec<_> = world.draw_order().into_iter().map(|e| format!("{e:?}")).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn clock_tracks_receipt_time() {
        let mut world = World::default();
        world.apply_snapshot(&snapshot(vec![player(1, [3, 4], Some(Direction::Right))], vec![]), 1000.0);
        assert_eq!(world.clock().last_snapshot_ms(), 1000.0);
        assert_eq!(world.screen_position(EntityId(1), 1100.0).unwrap().x, 112.0);
    }

    #[test]
    fn clear_forgets_clock_and_count() {
        let mut world = World::default();
        world.apply_snapshot(&snapshot(vec![player(1, [3, 4], None)], vec![]), 1000.0);
        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.snapshots_applied(), 0);
        assert_eq!(world.clock().last_snapshot_ms(), 0.0);
        assert!(world.local_id().is_none());
    }

    #[test]
    fn assets_requested_after_delay() {
        let mut world = World::default();
        world.apply_snapshot(&snapshot(vec![player(1, [0, 0], None)], vec![npc(10, [1, 1])]), 0.0);
        assert!(world.due_asset_requests(999.0).is_empty());
        assert_eq!(world.due_asset_requests(1000.0), vec![EntityId(1), EntityId(10)]);
        assert!(world.due_asset_requests(5000.0).is_empty());

        world.resolve_assets(EntityId(10), false);
        assert_eq!(world.get(EntityId(10)).unwrap().assets(), AssetState::Unavailable);
    }

    #[test]
    fn picking_skips_local_player() {
        let mut world = World::default();
        world.apply_snapshot(&snapshot(vec![player(1, [4, 4], None)], vec![npc(10, [4, 4])]), 0.0);
        assert_eq!(world.entity_at(IVec2::new(4, 3)).map(|e| e.id()), Some(EntityId(10)));
        assert!(world.entity_at(IVec2::new(9, 9)).is_none());
    }
}
