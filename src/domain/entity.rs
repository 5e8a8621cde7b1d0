/// Entities: Player, Enemy, and the per-tick input snapshot.
///
/// All position fields are unsigned 8-bit game units; velocities are signed
/// 8-bit. The narrow types are deliberate — wrap/clamp behavior of the
/// original machine code falls out of them.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

/// Per-tick input snapshot fed in by the external driver.
/// Held keys are level-triggered; `open_pressed` is an edge (fresh press).
/// The jump edge is derived internally from `jump_held` across ticks.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub jump_held: bool,
    pub left_held: bool,
    pub right_held: bool,
    pub open_pressed: bool,
}

/// Items the player can hold that the simulation core cares about.
#[derive(Clone, Copy, Debug, Default)]
pub struct Inventory {
    /// Door Key: gates door activation.
    pub has_door_key: bool,
    /// Boots: raises jump power from 4 to 5.
    pub has_boots: bool,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: u8,
    pub y: u8,
    /// Vertical velocity, scaled by 8: displacement per tick = vel >> 3.
    pub y_vel: i8,
    /// Horizontal momentum, roughly ±5; decays by 1 toward zero per tick.
    pub x_momentum: i8,
    pub facing: Facing,
    /// Set while falling or jumping (the single airborne flag).
    pub airborne: bool,
    /// Counts down jump-held frames while airborne. Equality with
    /// `jump_power` while grounded means "a new jump may start".
    pub jump_counter: u8,
    /// 4 normally, 5 with the Boots item.
    pub jump_power: u8,
    /// Jump key state last tick, for edge detection.
    pub prev_jump_held: bool,
    /// Set when the last airborne tick ended stuck against a ceiling;
    /// forces a one-unit push-down on the next integration.
    pub ceiling_stick: bool,
    /// Last stage-entry position, refreshed on every stage-edge
    /// crossing. The core only records it; a driver with a lives or
    /// death system reads it to decide where to put the player back.
    pub checkpoint_x: u8,
    pub checkpoint_y: u8,
}

impl Player {
    pub fn new(x: u8, y: u8) -> Self {
        Player {
            x,
            y,
            y_vel: 0,
            x_momentum: 0,
            facing: Facing::Right,
            airborne: false,
            jump_counter: super::physics::JUMP_POWER_DEFAULT,
            jump_power: super::physics::JUMP_POWER_DEFAULT,
            prev_jump_held: false,
            ceiling_stick: false,
            checkpoint_x: x,
            checkpoint_y: y,
        }
    }
}

// ── Enemies ──

/// The five AI behaviors. The "fast" modifier is a separate flag
/// (`Enemy::fast`), not a bit OR'd into the discriminant.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Behavior {
    /// Diagonal bouncing on independent axes.
    Bounce,
    /// Ballistic hops toward the player.
    Leap,
    /// Ground-hugging chaser.
    Roll,
    /// Greedy axis-aligned closure, horizontal first.
    Seek,
    /// Flees upward while the player faces it, approaches otherwise.
    Shy,
}

/// Movement throttle: slow enemies alternate move/skip ticks, fast
/// enemies move every tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Restraint {
    MoveThisTick,
    SkipThisTick,
    MoveEveryTick,
}

/// Enemy lifecycle. Spark variants carry the death-animation sub-frame
/// (0..=5); at sub-frame 5 the next tick despawns the enemy.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Lifecycle {
    Despawned,
    Spawned,
    /// Environmental death (fell out of the playfield).
    WhiteSpark(u8),
    /// Player-collision death.
    RedSpark(u8),
}

/// Death animations span 6 sub-frames, 0 through this value.
pub const SPARK_LAST_FRAME: u8 = 5;

/// One enemy slot. Slots are fixed at stage load and never reallocated;
/// an unarmed slot (`behavior == None`) stays Despawned forever.
///
/// `spawn_timer` is meaningful only while Despawned, `anim_frame` only
/// while Spawned — the original packed both into one byte; the split keeps
/// the timing behavior while making the interpretation explicit.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: u8,
    pub y: u8,
    pub x_vel: i8,
    pub y_vel: i8,
    pub state: Lifecycle,
    /// Ticks until the next spawn attempt (Despawned only).
    pub spawn_timer: u8,
    /// Current animation frame index (Spawned only).
    pub anim_frame: u8,
    /// Frame count of the slot's sprite, cached from the sprite catalog.
    pub num_anim_frames: u8,
    /// None for an unarmed or failed-to-load slot.
    pub behavior: Option<Behavior>,
    pub fast: bool,
    pub facing: Facing,
    pub restraint: Restraint,
}

impl Enemy {
    /// An inert slot: despawned, unarmed, never spawns.
    pub fn inert() -> Self {
        Enemy {
            x: 0,
            y: 0,
            x_vel: 0,
            y_vel: 0,
            state: Lifecycle::Despawned,
            spawn_timer: 100,
            anim_frame: 0,
            num_anim_frames: 0,
            behavior: None,
            fast: false,
            facing: Facing::Left,
            restraint: Restraint::MoveThisTick,
        }
    }

    /// Is this enemy in either death animation?
    pub fn in_spark(&self) -> bool {
        matches!(self.state, Lifecycle::WhiteSpark(_) | Lifecycle::RedSpark(_))
    }
}
