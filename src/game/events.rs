//! Scheduled world events
//!
//! Deferred world-state changes tied to a scene and a trigger time. The
//! schedule is always kept sorted ascending by trigger time.

use serde::{Deserialize, Serialize};

/// What a scheduled event does when it fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// An overworld entity (smashed rock, cut tree) is gone
    EntityRemoved { entity_id: String },
    /// A ground item was picked up
    ItemCollected { item_id: u32 },
    /// A story flag changed
    FlagSet { key: String, value: bool },
    /// Free-form data owned by the embedding game
    Custom(String),
}

/// A deferred world event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Scene the event applies to
    pub scene_index: u32,
    /// Game clock second at which the event takes effect
    pub trigger_time: u64,
    pub payload: EventPayload,
}

impl EventRecord {
    pub fn new(scene_index: u32, trigger_time: u64, payload: EventPayload) -> Self {
        Self { scene_index, trigger_time, payload }
    }
}

/// All events the player has encountered, sorted by trigger time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSchedule {
    events: Vec<EventRecord>,
}

impl EventSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event and restore ordering
    pub fn register(&mut self, event: EventRecord) {
        log::debug!(
            "Registered event {:?} for scene {} at t={}",
            event.payload, event.scene_index, event.trigger_time
        );
        self.events.push(event);
        self.sort();
    }

    /// Replace the whole schedule (used when a snapshot is loaded)
    pub fn replace(&mut self, events: Vec<EventRecord>) {
        self.events = events;
        self.sort();
    }

    /// Events for one scene, in stored order
    pub fn relevant(&self, scene_index: u32) -> Vec<&EventRecord> {
        self.events.iter().filter(|e| e.scene_index == scene_index).collect()
    }

    /// Whether an entity in the given scene has been removed for good
    pub fn is_entity_removed(&self, scene_index: u32, entity_id: &str) -> bool {
        self.events.iter().any(|e| {
            e.scene_index == scene_index
                && matches!(&e.payload, EventPayload::EntityRemoved { entity_id: id } if id == entity_id)
        })
    }

    pub fn as_slice(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn to_vec(&self) -> Vec<EventRecord> {
        self.events.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    // Stable: events with equal trigger times keep registration order.
    fn sort(&mut self) {
        self.events.sort_by_key(|e| e.trigger_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(scene: u32, time: u64, key: &str) -> EventRecord {
        EventRecord::new(scene, time, EventPayload::FlagSet { key: key.to_string(), value: true })
    }

    #[test]
    fn test_register_keeps_sorted() {
        let mut schedule = EventSchedule::new();
        schedule.register(flag(1, 5, "a"));
        schedule.register(flag(1, 1, "b"));
        schedule.register(flag(1, 3, "c"));

        let times: Vec<u64> = schedule.iter().map(|e| e.trigger_time).collect();
        assert_eq!(times, vec![1, 3, 5]);
    }

    #[test]
    fn test_equal_times_keep_registration_order() {
        let mut schedule = EventSchedule::new();
        schedule.register(flag(1, 2, "first"));
        schedule.register(flag(1, 2, "second"));
        schedule.register(flag(1, 1, "early"));

        let keys: Vec<&str> = schedule
            .iter()
            .map(|e| match &e.payload {
                EventPayload::FlagSet { key, .. } => key.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(keys, vec!["early", "first", "second"]);
    }

    #[test]
    fn test_relevant_filters_by_scene() {
        let mut schedule = EventSchedule::new();
        schedule.register(flag(1, 9, "a"));
        schedule.register(flag(2, 4, "b"));
        schedule.register(flag(1, 2, "c"));

        let relevant = schedule.relevant(1);
        assert_eq!(relevant.len(), 2);
        assert!(relevant.iter().all(|e| e.scene_index == 1));
        assert_eq!(relevant[0].trigger_time, 2);
        assert!(schedule.relevant(7).is_empty());
    }

    #[test]
    fn test_replace_sorts_loaded_events() {
        let mut schedule = EventSchedule::new();
        schedule.replace(vec![flag(1, 8, "x"), flag(1, 0, "y")]);
        assert_eq!(schedule.as_slice()[0].trigger_time, 0);
    }

    #[test]
    fn test_entity_removed_lookup() {
        let mut schedule = EventSchedule::new();
        schedule.register(EventRecord::new(
            3,
            10,
            EventPayload::EntityRemoved { entity_id: "rock_1".to_string() },
        ));
        assert!(schedule.is_entity_removed(3, "rock_1"));
        assert!(!schedule.is_entity_removed(4, "rock_1"));
        assert!(!schedule.is_entity_removed(3, "rock_2"));
    }
}
