//! Breakable rocks
//!
//! Clicking a rock asks whether to use Rock Smash. Smashing it may start a
//! wild encounter or drop an item, and the rock is gone for good.

use hecs::Entity;
use rand::Rng;

use crate::game::{EventPayload, EventRecord, HmMove};
use crate::pokemon::Pokemon;
use crate::script::ActionScript;

use super::components::EntityKind;
use super::encounters::EncounterMethod;
use super::Interaction;

/// Percent chance of a wild encounter, then of an item
const ENCOUNTER_CHANCE: u32 = 20;
const ITEM_CHANCE: u32 = 20;

const ROCK_TEXT: &str = "This rock looks like~it can be broken!";
const SMASH_PROMPT: &str = "~Do you want to~use Rock Smash?%Yes|No%";

/// Statistic counted on every smash
pub const SMASH_STATISTIC: &str = "Rock Smash used";

/// What came out of a smashed rock
#[derive(Debug, Clone, PartialEq)]
pub enum SmashOutcome {
    Encounter(Pokemon),
    Item(u32),
    Nothing,
}

/// Player interacts with a rock
pub fn click(it: &mut Interaction<'_>, rock: Entity) {
    if it.ctx.text_box_showing || it.level.kind(rock) != Some(EntityKind::SmashRock) {
        return;
    }

    let mut text = String::from(ROCK_TEXT);
    if it.field_move_user(HmMove::RockSmash).is_some() || it.unrestricted() {
        text.push_str(SMASH_PROMPT);
    }
    it.ctx.text_box_showing = true;
    it.host.show_text(&text);
    it.host.play_sound("select");
}

/// Answer to the prompt opened by `click` (0 = Yes)
pub fn result(it: &mut Interaction<'_>, rock: Entity, choice: usize) -> Option<SmashOutcome> {
    it.ctx.text_box_showing = false;
    if choice != 0 {
        return None;
    }

    let user = it
        .field_move_user(HmMove::RockSmash)
        .map(|(name, _)| name)
        .unwrap_or_else(|| it.ctx.trainer.name.clone());

    let outcome = roll_outcome(it);
    it.host.start_script(&smash_script(&user, &outcome));
    it.ctx.statistics.track(SMASH_STATISTIC, 1);
    it.level.mark_removable(rock);

    if let Some(entity_id) = it.level.entity_id(rock) {
        let event = EventRecord::new(
            it.level.scene_index(),
            it.ctx.clock(),
            EventPayload::EntityRemoved { entity_id },
        );
        it.ctx.register_event(event);
    }
    log::info!("{} smashed a rock on {}: {:?}", user, it.level.level_file(), outcome);
    Some(outcome)
}

fn roll_outcome(it: &mut Interaction<'_>) -> SmashOutcome {
    let map = it.level.level_file();
    if it.ctx.rng().gen_range(0..100) < ENCOUNTER_CHANCE {
        return it
            .data
            .encounters
            .roll(map, EncounterMethod::RockSmash, it.ctx.rng())
            .map(SmashOutcome::Encounter)
            .unwrap_or(SmashOutcome::Nothing);
    }
    if it.ctx.rng().gen_range(0..100) < ITEM_CHANCE {
        return SmashOutcome::Item(it.data.smash_items.pick(map, it.ctx.rng()));
    }
    SmashOutcome::Nothing
}

/// Script played after the player agrees to smash the rock
pub fn smash_script(user: &str, outcome: &SmashOutcome) -> ActionScript {
    let script = ActionScript::default()
        .show_text(&format!("{} used~Rock Smash!", user))
        .play_sound("destroy");

    match outcome {
        SmashOutcome::Encounter(wild) => script
            .update_level()
            .show_text("A wild Pokémon~appeared!")
            .command("battle", "wild", [u32::from(wild.species), u32::from(wild.level)]),
        SmashOutcome::Item(item_id) => script
            .update_level()
            .command("item", "give", [*item_id, 1])
            .command("item", "messagegive", [*item_id, 1]),
        SmashOutcome::Nothing => script,
    }
}
