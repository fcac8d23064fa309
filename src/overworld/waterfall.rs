//! Waterfalls
//!
//! Climbing up needs the Waterfall move and its badge. Walking onto the top
//! of a waterfall slides the player down the whole stack.

use hecs::Entity;

use crate::game::HmMove;
use crate::script::ActionScript;

use super::components::{EntityKind, TilePos};
use super::Interaction;

/// Statistic counted on every climb
pub const WATERFALL_STATISTIC: &str = "Waterfall used";

/// Cry played when nobody in the party knows the move
const DEFAULT_CRY: u16 = 1;

/// Player walks against a waterfall
///
/// Returns whether the player is blocked.
pub fn walk_against(it: &mut Interaction<'_>, waterfall: Entity) -> bool {
    let collision = it.level.collision(waterfall);
    if it.level.action_value(waterfall) == 1 {
        return collision;
    }

    let user = it.field_move_user(HmMove::Waterfall);
    let allowed = (it.data.can_use_hm(it.ctx, HmMove::Waterfall) && user.is_some()) || it.unrestricted();
    let Some(pos) = it.level.position(waterfall).filter(|_| allowed) else {
        return !collision;
    };

    let (name, cry) = user.unwrap_or_else(|| (it.ctx.trainer.name.clone(), DEFAULT_CRY));
    let steps = u32::from(it.level.surfing) + stack_height(it, pos.above(), TilePos::above);

    it.ctx.statistics.track(WATERFALL_STATISTIC, 1);
    it.host.start_script(&climb_script(&name, cry, steps));
    log::debug!("{} climbs a waterfall of {} steps", name, steps);
    false
}

/// Player steps onto a waterfall tile from above
///
/// Returns whether a descent script was started.
pub fn walk_onto(it: &mut Interaction<'_>, waterfall: Entity) -> bool {
    if it.level.action_value(waterfall) == 1 {
        return false;
    }
    let Some(pos) = it.level.position(waterfall) else {
        return false;
    };
    // Only the topmost tile of a stack acts
    if it.level.entity_at(pos.above(), EntityKind::Waterfall).is_some() {
        return false;
    }

    let steps = u32::from(!it.level.surfing) + stack_height(it, pos.below(), TilePos::below);
    it.host.start_script(&descend_script(steps));
    true
}

fn stack_height(it: &Interaction<'_>, from: TilePos, next: fn(&TilePos) -> TilePos) -> u32 {
    it.level.count_stack(from, EntityKind::Waterfall, next)
}

pub fn climb_script(user: &str, cry: u16, steps: u32) -> ActionScript {
    ActionScript::default()
        .command("pokemon", "cry", [cry])
        .play_sound("select")
        .show_text(&format!("{} used~Waterfall.", user))
        .move_player(steps)
        .hide_follower()
        .move_player(2)
        .hide_follower()
}

pub fn descend_script(steps: u32) -> ActionScript {
    ActionScript::default()
        .hide_follower()
        .move_player(2)
        .command("player", "setmovement", [0, -1, 0])
        .hide_follower()
        .move_player(steps)
        .hide_follower()
}
