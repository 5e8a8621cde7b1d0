/// Door activation and door-driven transitions.
///
/// A door opens when, on the tick the open key is freshly pressed, the
/// player stands exactly on the door's row with their left edge within
/// two units right of the door's left edge, and the Door Key is held.
/// The first matching door in stage order wins.
///
/// An activated door saves where it was entered from, so the
/// destination stage can stand the player in the reciprocal doorway.
use log::warn;

use crate::sim::event::TickEvent;
use crate::sim::level::{self, Door, NUM_LEVELS, STAGES_PER_LEVEL};
use crate::sim::world::WorldState;

/// Try to open a door under the player. Returns true when a door
/// activated (and the transition already happened).
pub fn check_door_activation(
    world: &mut WorldState,
    open_pressed: bool,
    events: &mut Vec<TickEvent>,
) -> bool {
    if !open_pressed {
        return false;
    }
    let Some(stage) = world.stage() else {
        return false;
    };

    let mut hit: Option<Door> = None;
    for door in &stage.doors {
        if world.player.y != door.y {
            continue;
        }
        let x_offset = world.player.x as i16 - door.x as i16;
        if !(0..=2).contains(&x_offset) {
            continue;
        }
        if !world.inventory.has_door_key {
            // Locked: keep scanning, a later door might overlap too.
            continue;
        }
        hit = Some(*door);
        break;
    }

    match hit {
        Some(door) => {
            activate_door(world, door, events);
            true
        }
        None => false,
    }
}

/// Transition through a door: save the source, retarget, and load the
/// destination stage (or whole level when crossing levels). Doors with
/// out-of-range targets are ignored with a warning.
pub fn activate_door(world: &mut WorldState, door: Door, events: &mut Vec<TickEvent>) {
    if door.target_stage as usize >= STAGES_PER_LEVEL {
        warn!("door targets invalid stage {}", door.target_stage);
        return;
    }
    if door.target_level as usize >= NUM_LEVELS {
        warn!("door targets invalid level {}", door.target_level);
        return;
    }

    let source_level = world.current_level;
    world.source_door = Some((world.current_level, world.current_stage));
    world.current_stage = door.target_stage;
    world.current_level = door.target_level;

    events.push(TickEvent::DoorOpened {
        target_level: door.target_level,
        target_stage: door.target_stage,
    });

    if door.target_level != source_level {
        level::load_new_level(world);
    } else {
        level::load_new_stage(world);
    }
    events.push(TickEvent::StageTransition {
        level: world.current_level,
        stage: world.current_stage,
    });
}

// ══════════════════════════════════════════════════════════════════════
