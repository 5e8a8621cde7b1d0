/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Jump input edge detection
///   2. Grounded walking (airborne steering lives inside physics)
///   3. Vertical physics: jump arc, gravity, drift, terrain probes
///   4. Door activation
///   5. Item pickup
///   6. Actor slots: spawn, behave, animate, despawn, touch the player
///
/// Stage transitions triggered anywhere above (edge exit or door) swap
/// the map in place, so everything after the trigger already runs in
/// the destination stage, and transitions complete within one tick.
use crate::domain::entity::FrameInput;
use crate::domain::physics::{self, MoveOutcome, JUMP_POWER_BOOTS};
use crate::sim::event::TickEvent;
use crate::sim::level::{self, ItemKind};
use crate::sim::world::WorldState;
use crate::sim::{actors, doors};

// ══════════════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: FrameInput) -> Vec<TickEvent> {
    if !world.level_loaded {
        return vec![];
    }

    let mut events: Vec<TickEvent> = Vec::new();
    world.tick += 1;

    physics::process_jump_input(&mut world.player, &input);

    // Grounded walking. In the air the held keys feed momentum instead,
    // inside advance_physics.
    if !world.player.airborne {
        if input.left_held {
            let exits = world.stage_exits();
            let outcome =
                physics::move_left(&mut world.player, &world.map, exits, &mut world.camera.x);
            if let MoveOutcome::ExitStage { to_stage, .. } = outcome {
                edge_transition(world, to_stage, &mut events);
            }
        }
        if input.right_held {
            let exits = world.stage_exits();
            let outcome =
                physics::move_right(&mut world.player, &world.map, exits, &mut world.camera.x);
            if let MoveOutcome::ExitStage { to_stage, .. } = outcome {
                edge_transition(world, to_stage, &mut events);
            }
        }
    }

    let exits = world.stage_exits();
    let gravity = world.gravity();
    let outcome = physics::advance_physics(
        &mut world.player,
        &input,
        &world.map,
        exits,
        &mut world.camera.x,
        gravity,
    );
    if let Some((to_stage, _side)) = outcome.stage_exit {
        edge_transition(world, to_stage, &mut events);
    }
    if outcome.respawned {
        events.push(TickEvent::PlayerRespawned);
    }

    doors::check_door_activation(world, input.open_pressed, &mut events);

    collect_item(world, &mut events);

    actors::update_actors(world, &mut events);

    events
}

/// Walking off an open stage edge. The player has already been placed
/// at the far side of the destination; load its tiles and actors.
fn edge_transition(world: &mut WorldState, to_stage: u8, events: &mut Vec<TickEvent>) {
    world.current_stage = to_stage;
    world.source_door = None;
    level::load_new_stage(world);
    events.push(TickEvent::StageTransition {
        level: world.current_level,
        stage: to_stage,
    });
}

// ══════════════════════════════════════════════════════════════════════
// Item pickup
// ══════════════════════════════════════════════════════════════════════

/// Pick up the stage's item when the player overlaps it. Items are one
/// tile square; the player is one tile wide and three tall.
fn collect_item(world: &mut WorldState, events: &mut Vec<TickEvent>) {
    let Some(item) = world.stage_item else {
        return;
    };
    let dx = world.player.x as i16 - item.x as i16;
    if dx.abs() > 1 {
        return;
    }
    let py = world.player.y as i16;
    let iy = item.y as i16;
    if py > iy + 1 || py + 5 < iy {
        return;
    }

    match item.kind {
        ItemKind::DoorKey => world.inventory.has_door_key = true,
        ItemKind::Boots => {
            world.inventory.has_boots = true;
            world.player.jump_power = JUMP_POWER_BOOTS;
        }
        _ => {}
    }
    events.push(TickEvent::ItemCollected { kind: item.kind });
    world.stage_item = None;
}

// ══════════════════════════════════════════════════════════════════════
