/// Enemy AI — the five behavior state machines.
///
/// Each function advances one spawned enemy by one tick. They are pure
/// over the tile map and a read-only view of the player/camera; lifecycle
/// bookkeeping (spawning, despawn-by-distance, player collision, death
/// animation) lives in the actor system, not here. The only lifecycle
/// edge a behavior may take itself is falling out of the playfield,
/// which jumps straight to the last white-spark frame.
///
/// Movement is one unit per active tick. Slow enemies are throttled by
/// the restraint flag to move on alternating ticks; Leap is special in
/// that its throttle skips only horizontal motion, never gravity.
use super::entity::{Enemy, Facing, Lifecycle, Restraint, SPARK_LAST_FRAME};
use super::physics::TERMINAL_VELOCITY;
use super::tile::{TileMap, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

/// Downward acceleration for ballistic enemies (Leap), per tick.
pub const ENEMY_GRAVITY: i8 = 2;
/// Initial upward velocity of a Leap hop.
pub const ENEMY_JUMP_VELOCITY: i8 = -7;

/// Read-only world view handed to the behavior functions.
#[derive(Clone, Copy, Debug)]
pub struct ActorEnv {
    pub player_x: u8,
    pub player_y: u8,
    pub player_facing: Facing,
    pub camera_x: i16,
}

/// Advance the restraint flag, returning true when this tick's movement
/// should be skipped entirely.
fn throttled(enemy: &mut Enemy) -> bool {
    match enemy.restraint {
        Restraint::SkipThisTick => {
            enemy.restraint = Restraint::MoveThisTick;
            true
        }
        Restraint::MoveThisTick => {
            enemy.restraint = Restraint::SkipThisTick;
            false
        }
        Restraint::MoveEveryTick => false,
    }
}

/// Shared horizontal bouncing step (Bounce, Shy, and Leap's ground
/// track all use it): advance one unit along `x_vel`, reversing on a
/// solid tile two units ahead or on crossing a playfield edge.
/// `probe_y` is the row the wall probe runs at. Bounce and Shy also
/// turn the sprite; Leap keeps its facing.
fn horizontal_bounce_step(
    enemy: &mut Enemy,
    map: &TileMap,
    camera_x: i16,
    probe_y: u8,
    update_facing: bool,
) {
    if enemy.x_vel > 0 {
        if update_facing {
            enemy.facing = Facing::Right;
        }
        let next_x = enemy.x.wrapping_add(2);
        if map.horizontal_collision(next_x, probe_y) {
            enemy.x_vel = -1;
        } else {
            enemy.x = enemy.x.wrapping_add(1);
            if enemy.x as i16 - camera_x >= PLAYFIELD_WIDTH - 2 {
                enemy.x_vel = -1;
            }
        }
    } else {
        if update_facing {
            enemy.facing = Facing::Left;
        }
        if enemy.x == 0 {
            enemy.x_vel = 1;
        } else {
            let next_x = enemy.x - 1;
            if map.horizontal_collision(next_x, probe_y) {
                enemy.x_vel = 1;
            } else {
                enemy.x = next_x;
                if enemy.x as i16 - camera_x <= 0 {
                    enemy.x_vel = 1;
                }
            }
        }
    }
}

/// Bounce: diagonal bouncing on independent axes.
pub fn behavior_bounce(enemy: &mut Enemy, map: &TileMap, env: &ActorEnv) {
    if throttled(enemy) {
        return;
    }

    horizontal_bounce_step(enemy, map, env.camera_x, enemy.y, true);

    if enemy.y_vel > 0 {
        if enemy.y >= PLAYFIELD_HEIGHT - 2 {
            enemy.y_vel = -1;
        } else {
            let next_y = enemy.y + 2;
            if map.vertical_collision(enemy.x, next_y) {
                enemy.y_vel = -1;
            } else {
                enemy.y += 1;
                if enemy.y >= PLAYFIELD_HEIGHT - 2 {
                    enemy.y_vel = -1;
                }
            }
        }
    } else if enemy.y == 0 {
        enemy.y_vel = 1;
    } else {
        let next_y = enemy.y - 1;
        if map.vertical_collision(enemy.x, next_y) {
            enemy.y_vel = 1;
        } else {
            enemy.y = next_y;
            if enemy.y == 0 {
                enemy.y_vel = 1;
            }
        }
    }
}

/// Leap: ballistic hops toward the player.
///
/// At rest on solid ground it launches toward the player's side and
/// returns without gravity that tick. In every other case gravity runs,
/// the restraint throttle gates only the horizontal track, and a
/// downward tick that finds ground three units below snaps the enemy
/// onto the even tile boundary and zeroes vertical velocity. Passing
/// the bottom of the playfield kills the enemy outright.
pub fn behavior_leap(enemy: &mut Enemy, map: &TileMap, env: &ActorEnv) {
    let mut proposed_y = enemy.y;

    if enemy.y_vel < 0 {
        // Rising: undo the move on ceiling contact or top-of-field
        // underflow, but keep falling through to gravity.
        let delta = enemy.y_vel >> 3;
        let new_y = proposed_y as i16 + delta as i16;
        if new_y >= 0 {
            let target_y = new_y as u8;
            if !map.vertical_collision(enemy.x, target_y) {
                proposed_y = target_y;
            }
        }
    } else if enemy.y_vel > 0 {
        let delta = enemy.y_vel >> 3;
        let new_y = proposed_y.wrapping_add_signed(delta);
        if new_y >= PLAYFIELD_HEIGHT - 2 {
            enemy.state = Lifecycle::WhiteSpark(SPARK_LAST_FRAME);
            enemy.y = PLAYFIELD_HEIGHT - 2;
            return;
        }
        // Look one unit past the new position; a solid there cancels
        // the whole move rather than clipping into the floor.
        if !map.vertical_collision(enemy.x, new_y + 1) {
            proposed_y = new_y;
        }
    } else {
        // At rest. Solid ground two units below means launch.
        if map.vertical_collision(enemy.x, enemy.y.wrapping_add(2)) {
            enemy.x_vel = if env.player_x >= enemy.x { 1 } else { -1 };
            enemy.y_vel = ENEMY_JUMP_VELOCITY;
            return;
        }
        // Ground vanished underfoot: stay put this tick, let gravity
        // start the fall below.
    }

    enemy.y_vel = (enemy.y_vel as i16 + ENEMY_GRAVITY as i16).min(TERMINAL_VELOCITY as i16) as i8;

    let skip_horizontal = throttled(enemy);
    if !skip_horizontal && enemy.x_vel != 0 {
        horizontal_bounce_step(enemy, map, env.camera_x, proposed_y, false);
    }

    enemy.y = proposed_y;

    if enemy.y_vel > 0 && map.vertical_collision(enemy.x, enemy.y.wrapping_add(3)) {
        enemy.y = (enemy.y + 1) & 0xFE;
        enemy.y_vel = 0;
    }
}

/// Roll: ground-hugging chaser. Rolls along the floor toward the
/// player, drops straight down off ledges, dies at the bottom.
pub fn behavior_roll(enemy: &mut Enemy, map: &TileMap, env: &ActorEnv) {
    if enemy.y_vel > 0 {
        if enemy.y as i16 + 1 >= (PLAYFIELD_HEIGHT - 3) as i16 {
            enemy.state = Lifecycle::WhiteSpark(SPARK_LAST_FRAME);
            enemy.y = PLAYFIELD_HEIGHT - 2;
            return;
        }
        // Falling keeps whatever horizontal momentum it had.
        enemy.y += 1;
    } else if enemy.x < env.player_x {
        enemy.x_vel = 1;
    } else if enemy.x > env.player_x {
        enemy.x_vel = -1;
    } else {
        enemy.x_vel = 0;
    }

    if throttled(enemy) {
        return;
    }

    if enemy.x_vel == 0 {
        // Parked under the player: rearm the throttle so motion resumes
        // immediately once the player moves aside.
        enemy.restraint = Restraint::MoveThisTick;
        return;
    }

    if enemy.x_vel > 0 {
        let next_x = enemy.x.wrapping_add(2);
        if !map.horizontal_collision(next_x, enemy.y) {
            enemy.x = enemy.x.wrapping_add(1);
        }
    } else if enemy.x == 0 {
        enemy.x_vel = 1;
    } else {
        let next_x = enemy.x - 1;
        if !map.horizontal_collision(next_x, enemy.y) {
            enemy.x = next_x;
        }
    }

    if !map.vertical_collision(enemy.x, enemy.y.wrapping_add(3)) {
        enemy.y_vel = 1;
        return;
    }
    enemy.y_vel = 0;
}

/// Seek: greedy axis-aligned closure, horizontal first. Moves along
/// exactly one axis per active tick and remembers a reversal when
/// blocked so the next attempt goes the other way.
pub fn behavior_seek(enemy: &mut Enemy, map: &TileMap, env: &ActorEnv) {
    if throttled(enemy) {
        return;
    }

    if enemy.x != env.player_x {
        if enemy.x < env.player_x {
            let next_x = enemy.x + 1;
            if !map.horizontal_collision(next_x.wrapping_add(1), enemy.y) {
                enemy.x = next_x;
                enemy.x_vel = 1;
            } else {
                enemy.x_vel = -1;
            }
        } else if enemy.x == 0 {
            enemy.x_vel = 1;
        } else {
            let next_x = enemy.x - 1;
            if !map.horizontal_collision(next_x, enemy.y) {
                enemy.x = next_x;
                enemy.x_vel = -1;
            } else {
                enemy.x_vel = 1;
            }
        }
        enemy.facing = if enemy.x_vel < 0 { Facing::Left } else { Facing::Right };
        return;
    }

    if enemy.y != env.player_y {
        if enemy.y < env.player_y {
            let next_y = enemy.y + 1;
            if !map.vertical_collision(enemy.x, next_y.wrapping_add(1)) {
                enemy.y = next_y;
                enemy.y_vel = 1;
            } else {
                enemy.y_vel = -1;
            }
        } else {
            let next_y = enemy.y - 1;
            if !map.vertical_collision(enemy.x, next_y) {
                enemy.y = next_y;
                enemy.y_vel = -1;
            } else {
                enemy.y_vel = 1;
            }
        }
    }

    enemy.facing = if enemy.x_vel < 0 { Facing::Left } else { Facing::Right };
}

/// Shy: bounces horizontally like Bounce, but its vertical track
/// watches the player's facing — fleeing straight up whenever the
/// player looks at it, drifting toward the player's row otherwise.
pub fn behavior_shy(enemy: &mut Enemy, map: &TileMap, env: &ActorEnv) {
    if throttled(enemy) {
        return;
    }

    let player_facing_enemy = match env.player_facing {
        Facing::Right => enemy.x > env.player_x,
        Facing::Left => enemy.x < env.player_x,
    };

    horizontal_bounce_step(enemy, map, env.camera_x, enemy.y, true);

    if player_facing_enemy {
        enemy.y_vel = -1;
    } else if enemy.y < env.player_y {
        enemy.y_vel = 1;
    } else if enemy.y > env.player_y {
        enemy.y_vel = -1;
    } else {
        enemy.y_vel = 0;
    }

    if enemy.y_vel > 0 {
        let next_y = enemy.y + 2;
        if map.vertical_collision(enemy.x, next_y) {
            enemy.y_vel = -1;
        } else {
            enemy.y += 1;
            if enemy.y >= PLAYFIELD_HEIGHT - 2 {
                enemy.y_vel = -1;
            }
        }
    } else if enemy.y_vel < 0 {
        if enemy.y == 0 {
            enemy.y_vel = 1;
        } else {
            let next_y = enemy.y - 1;
            if map.vertical_collision(enemy.x, next_y) {
                enemy.y_vel = 1;
            } else {
                enemy.y = next_y;
                if enemy.y == 0 {
                    enemy.y_vel = 1;
                }
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════
