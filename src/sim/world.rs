/// WorldState: the complete snapshot of a running simulation.
///
/// ## Ownership
///
/// The world owns everything a tick touches: the current stage's tile
/// map, the player, the four enemy slots, the camera, and the level set.
/// Behavior functions and probe helpers receive borrows of the pieces
/// they need; nothing in the simulation reaches for hidden globals.
///
/// ## Shared cycles
///
/// Two counters the original kept as module statics live here as plain
/// fields, because their sharing is semantic, not incidental:
///   - `respawn_timer_cycle` — seeds every death's respawn timer and
///     advances 20→40→60→80→100→20 per completed death, across all
///     slots in the stage.
///   - `spawn_offset_cycle` — staggers spawn x positions; deliberately
///     NOT reset on stage load, so spawn points vary across stages.
use crate::domain::entity::{Enemy, Inventory, Player};
use crate::domain::physics::{StageExits, GRAVITY, GRAVITY_SPACE};
use crate::domain::tile::{TileMap, MAP_WIDTH_UNITS, PLAYFIELD_WIDTH};
use crate::sim::actors::RESPAWN_TIMER_MIN;
use crate::sim::level::{Item, Level, Stage, LEVEL_NUMBER_SPACE, MAX_ENEMIES};

/// One-dimensional viewport into the 256-unit-wide stage. `x` is the
/// world coordinate of the leftmost visible unit.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub x: i16,
}

impl Camera {
    pub fn new() -> Self {
        Camera { x: 0 }
    }

    /// Snap so the target sits at the playfield midpoint, clamped to
    /// the stage bounds. Used on stage entry; per-move nudging happens
    /// in the movement functions.
    pub fn center_on(&mut self, target_x: u8) {
        let max = MAP_WIDTH_UNITS - PLAYFIELD_WIDTH;
        self.x = (target_x as i16 - PLAYFIELD_WIDTH / 2).clamp(0, max);
    }
}

pub struct WorldState {
    // ── Current stage ──
    pub map: TileMap,
    /// Collectible item still present in the current stage, if any.
    pub stage_item: Option<Item>,

    // ── Entities ──
    pub player: Player,
    pub inventory: Inventory,
    pub enemies: [Enemy; MAX_ENEMIES],

    // ── Shared actor cycles ──
    pub spawned_this_tick: bool,
    pub spawn_offset_cycle: u8,
    pub respawn_timer_cycle: u8,

    // ── Level tracking ──
    pub levels: Vec<Level>,
    pub current_level: u8,
    pub current_stage: u8,
    pub level_loaded: bool,
    /// Set while a door transition is in flight: the (level, stage) the
    /// player came from, used to find the reciprocal door on the far
    /// side. Cleared by the stage load.
    pub source_door: Option<(u8, u8)>,

    // ── Meta ──
    pub camera: Camera,
    pub tick: u64,
}

impl WorldState {
    pub fn new(levels: Vec<Level>) -> Self {
        WorldState {
            map: TileMap::empty(),
            stage_item: None,
            player: Player::new(4, 14),
            inventory: Inventory::default(),
            enemies: std::array::from_fn(|_| Enemy::inert()),
            spawned_this_tick: false,
            spawn_offset_cycle: PLAYFIELD_WIDTH as u8,
            respawn_timer_cycle: RESPAWN_TIMER_MIN,
            levels,
            current_level: 0,
            current_stage: 0,
            level_loaded: false,
            source_door: None,
            camera: Camera::new(),
            tick: 0,
        }
    }

    /// The stage the player is currently in, if a level is loaded and
    /// the stage number is sane.
    pub fn stage(&self) -> Option<&Stage> {
        if !self.level_loaded {
            return None;
        }
        self.levels
            .get(self.current_level as usize)
            .and_then(|level| level.stages.get(self.current_stage as usize))
    }

    pub fn level(&self) -> Option<&Level> {
        if !self.level_loaded {
            return None;
        }
        self.levels.get(self.current_level as usize)
    }

    /// Left/right exits of the current stage, for the movement code.
    /// An unloaded world has no exits, which turns edge walks into
    /// plain blocks.
    pub fn stage_exits(&self) -> StageExits {
        match self.stage() {
            Some(stage) => StageExits { left: stage.exit_left, right: stage.exit_right },
            None => StageExits::default(),
        }
    }

    /// Per-level gravity: the space level pulls gentler.
    #[inline]
    pub fn gravity(&self) -> i8 {
        if self.current_level == LEVEL_NUMBER_SPACE {
            GRAVITY_SPACE
        } else {
            GRAVITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_centering_clamps_to_stage_bounds() {
        let mut cam = Camera::new();
        cam.center_on(4);
        assert_eq!(cam.x, 0);
        cam.center_on(128);
        assert_eq!(cam.x, 116);
        cam.center_on(250);
        assert_eq!(cam.x, 232);
    }

    #[test]
    fn unloaded_world_has_no_exits() {
        let world = WorldState::new(vec![]);
        let exits = world.stage_exits();
        assert!(exits.left.is_none() && exits.right.is_none());
    }
}
