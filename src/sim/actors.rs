/// The enemy actor system: spawning, lifecycle, and per-tick dispatch.
///
/// ## Slot pass
///
/// `update_actors` walks the four slots once per tick:
///   - Despawned slots count their spawn timer down and, at zero, try
///     to spawn. At most one enemy enters the world per tick.
///   - Sparking slots advance the death animation; the last sub-frame
///     despawns the slot and reseeds its timer from the shared respawn
///     cycle, which then advances 20→40→60→80→100→20.
///   - Spawned slots advance animation, run their behavior, then take
///     the despawn-by-distance and player-collision checks.
///
/// ## Spawn placement
///
/// Spawn x positions come from a cycling offset ahead of (or behind)
/// the camera, on the side the player faces; y starts at the player's
/// row and steps up out of solid ground, two probes at most. The
/// offset cycle survives stage loads on purpose, so spawn points vary
/// between visits.
use log::warn;

use crate::domain::ai::{self, ActorEnv};
use crate::domain::entity::{Behavior, Enemy, Facing, Lifecycle, Restraint, SPARK_LAST_FRAME};
use crate::domain::tile::PLAYFIELD_WIDTH;
use crate::sim::event::TickEvent;
use crate::sim::level::{MAX_ENEMIES, MAX_SPRITES};
use crate::sim::world::WorldState;

pub const RESPAWN_TIMER_MIN: u8 = 20;
pub const RESPAWN_TIMER_STEP: u8 = 20;
pub const RESPAWN_TIMER_MAX: u8 = 100;

/// Horizontal distance from the player past which an enemy despawns.
pub const DESPAWN_RADIUS: i16 = 30;

/// Spawn timer for slots that can never spawn (unarmed or broken).
const INERT_TIMER: u8 = 100;

// ── Stage setup ──

/// Arm the slots from the current stage's spawn records. Records with
/// a bad sprite index or an unavailable sprite are disarmed with a
/// warning rather than failing the load.
pub fn setup_enemies_for_stage(world: &mut WorldState) {
    let (records, sprites) = match (world.stage(), world.level()) {
        (Some(stage), Some(level)) => (stage.enemies, level.sprites),
        _ => return,
    };

    for (i, slot) in world.enemies.iter_mut().enumerate() {
        let Some(record) = records[i] else {
            *slot = Enemy::inert();
            continue;
        };
        if record.sprite as usize >= MAX_SPRITES {
            warn!("enemy slot {i}: sprite index {} out of range", record.sprite);
            *slot = Enemy::inert();
            continue;
        }
        let desc = sprites[record.sprite as usize];
        if desc.num_frames == 0 {
            warn!("enemy slot {i}: sprite '{}' unavailable", desc.name);
            *slot = Enemy::inert();
            continue;
        }

        slot.behavior = Some(record.behavior);
        slot.fast = record.fast;
        slot.num_anim_frames = desc.num_frames;
        slot.x_vel = 0;
        slot.y_vel = 0;
        slot.facing = Facing::Left;
        slot.restraint = Restraint::MoveThisTick;
    }

    reset_for_stage(world);
}

/// Despawn every slot and seed its timer from the shared respawn
/// cycle. The spawn offset cycle is intentionally left alone.
pub fn reset_for_stage(world: &mut WorldState) {
    let seed = world.respawn_timer_cycle;
    for enemy in &mut world.enemies {
        enemy.state = Lifecycle::Despawned;
        enemy.spawn_timer = seed;
    }
    world.spawned_this_tick = false;
}

// ── Per-tick pass ──

pub fn update_actors(world: &mut WorldState, events: &mut Vec<TickEvent>) {
    let env = ActorEnv {
        player_x: world.player.x,
        player_y: world.player.y,
        player_facing: world.player.facing,
        camera_x: world.camera.x,
    };

    world.spawned_this_tick = false;

    for i in 0..MAX_ENEMIES {
        match world.enemies[i].state {
            Lifecycle::Despawned => {
                if world.enemies[i].spawn_timer > 0 {
                    world.enemies[i].spawn_timer -= 1;
                }
                if world.enemies[i].spawn_timer == 0 {
                    maybe_spawn(world, i, &env, events);
                }
            }
            Lifecycle::WhiteSpark(frame) | Lifecycle::RedSpark(frame) => {
                if frame == SPARK_LAST_FRAME {
                    world.enemies[i].state = Lifecycle::Despawned;
                    world.enemies[i].spawn_timer = world.respawn_timer_cycle;
                    world.respawn_timer_cycle += RESPAWN_TIMER_STEP;
                    if world.respawn_timer_cycle > RESPAWN_TIMER_MAX {
                        world.respawn_timer_cycle = RESPAWN_TIMER_MIN;
                    }
                    events.push(TickEvent::EnemyDespawned { slot: i });
                } else {
                    let enemy = &mut world.enemies[i];
                    enemy.state = match enemy.state {
                        Lifecycle::WhiteSpark(f) => Lifecycle::WhiteSpark(f + 1),
                        Lifecycle::RedSpark(f) => Lifecycle::RedSpark(f + 1),
                        other => other,
                    };
                }
            }
            Lifecycle::Spawned => {
                advance_animation(&mut world.enemies[i]);
                dispatch_behavior(world, i, &env);
                check_despawn_by_distance(world, i, &env, events);
                check_player_collision(world, i, &env, events);
            }
        }
    }
}

fn dispatch_behavior(world: &mut WorldState, i: usize, env: &ActorEnv) {
    let Some(behavior) = world.enemies[i].behavior else {
        return;
    };
    let map = &world.map;
    let enemy = &mut world.enemies[i];
    match behavior {
        Behavior::Bounce => ai::behavior_bounce(enemy, map, env),
        Behavior::Leap => ai::behavior_leap(enemy, map, env),
        Behavior::Roll => ai::behavior_roll(enemy, map, env),
        Behavior::Seek => ai::behavior_seek(enemy, map, env),
        Behavior::Shy => ai::behavior_shy(enemy, map, env),
    }
}

fn advance_animation(enemy: &mut Enemy) {
    if enemy.num_anim_frames == 0 {
        return;
    }
    enemy.anim_frame += 1;
    if enemy.anim_frame >= enemy.num_anim_frames {
        enemy.anim_frame = 0;
    }
}

/// Spawn the slot if nothing else already spawned this tick.
fn maybe_spawn(world: &mut WorldState, i: usize, env: &ActorEnv, events: &mut Vec<TickEvent>) {
    if world.spawned_this_tick {
        return;
    }
    if world.enemies[i].behavior.is_none() {
        world.enemies[i].state = Lifecycle::Despawned;
        world.enemies[i].spawn_timer = INERT_TIMER;
        return;
    }

    world.spawn_offset_cycle += 2;
    if world.spawn_offset_cycle as i16 >= PLAYFIELD_WIDTH + 7 {
        world.spawn_offset_cycle = PLAYFIELD_WIDTH as u8;
    }

    // Ahead of the player when facing right, behind the view when
    // facing left.
    let offset = world.spawn_offset_cycle as i16;
    let spawn_x_raw = match env.player_facing {
        Facing::Right => env.camera_x + offset,
        Facing::Left => env.camera_x - (offset - PLAYFIELD_WIDTH + 2),
    };
    let spawn_x = spawn_x_raw.clamp(0, 255) as u8;

    // Start at the player's row and step up out of solid ground.
    let mut spawn_y = env.player_y;
    for _ in 0..2 {
        if !world.map.solid_at(spawn_x, spawn_y) {
            break;
        }
        spawn_y = spawn_y.wrapping_sub(1);
    }

    world.spawned_this_tick = true;
    let enemy = &mut world.enemies[i];
    enemy.x = spawn_x;
    enemy.y = spawn_y;
    enemy.state = Lifecycle::Spawned;
    enemy.anim_frame = 0;

    match enemy.behavior {
        Some(Behavior::Bounce) | Some(Behavior::Shy) => {
            enemy.x_vel = -1;
            enemy.y_vel = -1;
            enemy.facing = Facing::Left;
        }
        _ => {
            enemy.x_vel = 0;
            enemy.y_vel = 0;
            enemy.facing = Facing::Left;
        }
    }
    enemy.restraint = if enemy.fast {
        Restraint::MoveEveryTick
    } else {
        Restraint::MoveThisTick
    };

    events.push(TickEvent::EnemySpawned { slot: i, x: spawn_x, y: spawn_y });
}

/// Despawn-by-distance: reseeds from the shared cycle without
/// advancing it (only completed deaths advance the cycle).
fn check_despawn_by_distance(
    world: &mut WorldState,
    i: usize,
    env: &ActorEnv,
    events: &mut Vec<TickEvent>,
) {
    let dx = world.enemies[i].x as i16 - env.player_x as i16;
    if dx < -DESPAWN_RADIUS || dx > DESPAWN_RADIUS {
        world.enemies[i].state = Lifecycle::Despawned;
        world.enemies[i].spawn_timer = world.respawn_timer_cycle;
        events.push(TickEvent::EnemyDespawned { slot: i });
    }
}

fn check_player_collision(
    world: &mut WorldState,
    i: usize,
    env: &ActorEnv,
    events: &mut Vec<TickEvent>,
) {
    let dx = world.enemies[i].x as i16 - env.player_x as i16;
    let dy = world.enemies[i].y as i16 - env.player_y as i16;
    if (-1..=1).contains(&dx) && (0..4).contains(&dy) {
        world.enemies[i].state = Lifecycle::RedSpark(0);
        events.push(TickEvent::PlayerHit { slot: i });
    }
}

// ══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{self, demo_levels};

    fn loaded_world() -> WorldState {
        let mut world = WorldState::new(demo_levels());
        level::start(&mut world, 0, 0);
        world
    }

    fn tick_actors(world: &mut WorldState) -> Vec<TickEvent> {
        let mut events = vec![];
        update_actors(world, &mut events);
        events
    }

    #[test]
    fn at_most_one_spawn_per_tick() {
        let mut world = loaded_world();
        // Both armed slots ready on the same tick.
        world.enemies[0].spawn_timer = 1;
        world.enemies[1].spawn_timer = 1;
        let events = tick_actors(&mut world);
        let spawns = events
            .iter()
            .filter(|e| matches!(e, TickEvent::EnemySpawned { .. }))
            .count();
        assert_eq!(spawns, 1);
        assert_eq!(world.enemies[0].state, Lifecycle::Spawned);
        assert_eq!(world.enemies[1].state, Lifecycle::Despawned);
        // The loser spawns on the following tick.
        let events = tick_actors(&mut world);
        assert!(events.iter().any(|e| matches!(e, TickEvent::EnemySpawned { slot: 1, .. })));
    }

    #[test]
    fn respawn_cycle_advances_per_completed_death() {
        let mut world = loaded_world();
        let mut seeds = vec![];
        for _ in 0..6 {
            world.enemies[0].state = Lifecycle::RedSpark(SPARK_LAST_FRAME);
            tick_actors(&mut world);
            seeds.push(world.enemies[0].spawn_timer);
        }
        assert_eq!(seeds, vec![20, 40, 60, 80, 100, 20]);
    }

    #[test]
    fn spark_animation_runs_six_subframes() {
        let mut world = loaded_world();
        world.enemies[0].state = Lifecycle::WhiteSpark(0);
        for expected in 1..=SPARK_LAST_FRAME {
            tick_actors(&mut world);
            assert_eq!(world.enemies[0].state, Lifecycle::WhiteSpark(expected));
        }
        tick_actors(&mut world);
        assert_eq!(world.enemies[0].state, Lifecycle::Despawned);
    }

    #[test]
    fn distant_enemy_despawns_without_advancing_cycle() {
        let mut world = loaded_world();
        world.player.x = 100;
        world.enemies[0].state = Lifecycle::Spawned;
        world.enemies[0].x = 135; // 35 > 30
        world.enemies[0].y = 5;
        let cycle_before = world.respawn_timer_cycle;
        let events = tick_actors(&mut world);
        assert_eq!(world.enemies[0].state, Lifecycle::Despawned);
        assert_eq!(world.enemies[0].spawn_timer, cycle_before);
        assert_eq!(world.respawn_timer_cycle, cycle_before);
        assert!(events.iter().any(|e| matches!(e, TickEvent::EnemyDespawned { slot: 0 })));
    }

    #[test]
    fn colocated_enemy_red_sparks_but_edge_of_box_does_not() {
        let mut world = loaded_world();
        world.player.x = 100;
        world.player.y = 10;
        world.enemies[0].state = Lifecycle::Spawned;
        world.enemies[0].x = 100;
        world.enemies[0].y = 10;
        world.enemies[0].restraint = Restraint::SkipThisTick; // hold still
        tick_actors(&mut world);
        assert!(matches!(world.enemies[0].state, Lifecycle::RedSpark(_)));

        // Δy = 4 is outside the collision box.
        world.enemies[1].state = Lifecycle::Spawned;
        world.enemies[1].behavior = Some(Behavior::Seek);
        world.enemies[1].x = 100;
        world.enemies[1].y = 14;
        world.enemies[1].restraint = Restraint::SkipThisTick; // hold still
        tick_actors(&mut world);
        assert_eq!(world.enemies[1].state, Lifecycle::Spawned);
    }

    #[test]
    fn spawn_offset_cycle_survives_stage_reload() {
        let mut world = loaded_world();
        world.enemies[0].spawn_timer = 1;
        tick_actors(&mut world);
        let cycle = world.spawn_offset_cycle;
        assert_ne!(cycle, PLAYFIELD_WIDTH as u8); // advanced by the spawn
        world.current_stage = 1;
        level::load_new_stage(&mut world);
        assert_eq!(world.spawn_offset_cycle, cycle);
    }

    #[test]
    fn broken_sprite_slot_is_disarmed() {
        let mut world = WorldState::new(demo_levels());
        // woods stage 0 slot 0 uses sprite 0 which is present; point a
        // record at an unused sprite instead.
        world.levels[1].stages[0].enemies[1] = Some(crate::sim::level::EnemySpawn {
            sprite: 1,
            behavior: Behavior::Bounce,
            fast: false,
        });
        level::start(&mut world, 1, 0);
        assert!(world.enemies[1].behavior.is_none());
        // Disarmed slots never spawn no matter how long we wait.
        for _ in 0..500 {
            tick_actors(&mut world);
        }
        assert_eq!(world.enemies[1].state, Lifecycle::Despawned);
    }
}
