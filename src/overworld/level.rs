//! Level entities
//!
//! Spawning, lookup and removal of tile entities for the loaded scene.

use hecs::{Entity, World};

use crate::game::{EventPayload, EventSchedule};

use super::components::{ActionValue, Collision, EntityId, EntityKind, Removable, TilePos};

/// The loaded level
pub struct Level {
    level_file: String,
    scene_index: u32,
    /// Whether the player is currently surfing
    pub surfing: bool,
    world: World,
}

impl Level {
    pub fn new(level_file: impl Into<String>, scene_index: u32) -> Self {
        Self {
            level_file: level_file.into(),
            scene_index,
            surfing: false,
            world: World::new(),
        }
    }

    /// Map file name, used to look up encounter and item tables
    pub fn level_file(&self) -> &str {
        &self.level_file
    }

    pub fn scene_index(&self) -> u32 {
        self.scene_index
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Spawn a tile entity
    pub fn spawn(
        &mut self,
        id: &str,
        kind: EntityKind,
        pos: TilePos,
        collision: bool,
        action_value: i32,
    ) -> Entity {
        self.world.spawn((
            EntityId(id.to_string()),
            kind,
            pos,
            Collision(collision),
            ActionValue(action_value),
            Removable(false),
        ))
    }

    /// Spawn a breakable rock
    pub fn spawn_smash_rock(&mut self, id: &str, pos: TilePos) -> Entity {
        self.spawn(id, EntityKind::SmashRock, pos, true, 0)
    }

    /// Spawn one waterfall tile
    pub fn spawn_waterfall(&mut self, id: &str, pos: TilePos, action_value: i32) -> Entity {
        self.spawn(id, EntityKind::Waterfall, pos, true, action_value)
    }

    /// Get the entity of a kind at a tile (if any)
    pub fn entity_at(&self, pos: TilePos, kind: EntityKind) -> Option<Entity> {
        self.world
            .query::<(&TilePos, &EntityKind)>()
            .iter()
            .find(|(_, (p, k))| **p == pos && **k == kind)
            .map(|(entity, _)| entity)
    }

    /// Find an entity by its level id
    pub fn find(&self, id: &str) -> Option<Entity> {
        self.world
            .query::<&EntityId>()
            .iter()
            .find(|(_, eid)| eid.as_str() == id)
            .map(|(entity, _)| entity)
    }

    /// Count consecutive entities of a kind starting at `from`, stepping with `next`
    pub fn count_stack(&self, from: TilePos, kind: EntityKind, next: fn(&TilePos) -> TilePos) -> u32 {
        let mut count = 0;
        let mut pos = from;
        while self.entity_at(pos, kind).is_some() {
            count += 1;
            pos = next(&pos);
        }
        count
    }

    pub fn position(&self, entity: Entity) -> Option<TilePos> {
        self.world.get::<&TilePos>(entity).ok().map(|p| *p)
    }

    pub fn kind(&self, entity: Entity) -> Option<EntityKind> {
        self.world.get::<&EntityKind>(entity).ok().map(|k| *k)
    }

    pub fn entity_id(&self, entity: Entity) -> Option<String> {
        self.world.get::<&EntityId>(entity).ok().map(|id| id.0.clone())
    }

    pub fn collision(&self, entity: Entity) -> bool {
        self.world.get::<&Collision>(entity).map(|c| c.0).unwrap_or(false)
    }

    pub fn action_value(&self, entity: Entity) -> i32 {
        self.world.get::<&ActionValue>(entity).map(|a| a.0).unwrap_or(0)
    }

    /// Flag an entity for removal
    pub fn mark_removable(&mut self, entity: Entity) {
        if let Ok(mut removable) = self.world.get::<&mut Removable>(entity) {
            removable.0 = true;
        }
    }

    pub fn is_removable(&self, entity: Entity) -> bool {
        self.world.get::<&Removable>(entity).map(|r| r.0).unwrap_or(false)
    }

    /// Despawn every flagged entity, returning their ids
    pub fn remove_marked(&mut self) -> Vec<String> {
        let marked: Vec<(Entity, String)> = self
            .world
            .query::<(&Removable, &EntityId)>()
            .iter()
            .filter(|(_, (r, _))| r.0)
            .map(|(entity, (_, id))| (entity, id.0.clone()))
            .collect();

        marked
            .into_iter()
            .filter_map(|(entity, id)| self.world.despawn(entity).ok().map(|_| id))
            .collect()
    }

    /// Despawn entities that scheduled events say are gone (after loading a scene)
    pub fn restore_removed(&mut self, events: &EventSchedule) -> usize {
        let gone: Vec<Entity> = events
            .relevant(self.scene_index)
            .into_iter()
            .filter_map(|e| match &e.payload {
                EventPayload::EntityRemoved { entity_id } => self.find(entity_id),
                _ => None,
            })
            .collect();

        let mut removed = 0;
        for entity in gone {
            if self.world.despawn(entity).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            log::debug!("Removed {} entities from {} per scheduled events", removed, self.level_file);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::EventRecord;

    #[test]
    fn test_entity_at_matches_kind() {
        let mut level = Level::new("route45.dat", 3);
        let rock = level.spawn_smash_rock("rock_1", TilePos::new(2, 0, 5));

        assert_eq!(level.entity_at(TilePos::new(2, 0, 5), EntityKind::SmashRock), Some(rock));
        assert_eq!(level.entity_at(TilePos::new(2, 0, 5), EntityKind::Waterfall), None);
        assert_eq!(level.find("rock_1"), Some(rock));
        assert!(level.collision(rock));
    }

    #[test]
    fn test_count_stack_stops_at_gap() {
        let mut level = Level::new("falls.dat", 1);
        for y in [1, 2, 3, 5] {
            level.spawn_waterfall(&format!("wf_{}", y), TilePos::new(0, y, 0), 0);
        }
        assert_eq!(level.count_stack(TilePos::new(0, 1, 0), EntityKind::Waterfall, TilePos::above), 3);
        assert_eq!(level.count_stack(TilePos::new(0, 3, 0), EntityKind::Waterfall, TilePos::below), 3);
        assert_eq!(level.count_stack(TilePos::new(0, 4, 0), EntityKind::Waterfall, TilePos::above), 0);
    }

    #[test]
    fn test_remove_marked() {
        let mut level = Level::new("route45.dat", 3);
        let rock = level.spawn_smash_rock("rock_1", TilePos::new(0, 0, 0));
        level.spawn_smash_rock("rock_2", TilePos::new(1, 0, 0));

        level.mark_removable(rock);
        assert!(level.is_removable(rock));
        assert_eq!(level.remove_marked(), vec!["rock_1".to_string()]);
        assert_eq!(level.len(), 1);
        assert!(level.remove_marked().is_empty());
    }

    #[test]
    fn test_restore_removed_only_for_this_scene() {
        let mut level = Level::new("route45.dat", 3);
        level.spawn_smash_rock("rock_1", TilePos::new(0, 0, 0));
        level.spawn_smash_rock("rock_2", TilePos::new(1, 0, 0));

        let mut events = EventSchedule::new();
        events.register(EventRecord::new(3, 10, EventPayload::EntityRemoved { entity_id: "rock_1".into() }));
        events.register(EventRecord::new(4, 10, EventPayload::EntityRemoved { entity_id: "rock_2".into() }));

        assert_eq!(level.restore_removed(&events), 1);
        assert!(level.find("rock_1").is_none());
        assert!(level.find("rock_2").is_some());
    }
}
