/// Level data model and stage loading.
///
/// ## Shape
///
/// A level is three 128×10-tile stages sharing one tileset threshold
/// and one set of enemy sprites. Stages connect sideways through edge
/// exits and anywhere through doors; doors may also cross levels.
///
/// ## Entry positioning
///
/// `load_new_stage` places the player according to how the stage was
/// entered:
///   - via door (`world.source_door` is set): find the door in the new
///     stage whose target points back at the source and stand the
///     player in it, one unit right of the door's left edge;
///   - via edge exit or initial spawn: the player position is already
///     set by the caller, only the camera is recentered.
///
/// A door transition whose destination has no reciprocal door is
/// logged and otherwise ignored; the player keeps their coordinates.
use log::warn;

use crate::domain::entity::{Behavior, Player};
use crate::domain::physics::{JUMP_POWER_BOOTS, JUMP_POWER_DEFAULT};
use crate::domain::tile::{TileMap, MAP_HEIGHT_TILES, MAP_WIDTH_TILES};
use crate::sim::actors;
use crate::sim::world::WorldState;

pub const NUM_LEVELS: usize = 8;
pub const STAGES_PER_LEVEL: usize = 3;
pub const MAX_DOORS: usize = 3;
pub const MAX_ENEMIES: usize = 4;
pub const MAX_SPRITES: usize = 4;

/// Level number with reduced gravity.
pub const LEVEL_NUMBER_SPACE: u8 = 2;

const TILES_PER_STAGE: usize = MAP_WIDTH_TILES as usize * MAP_HEIGHT_TILES as usize;

/// A two-unit-wide door. `(x, y)` is its upper-left corner in game
/// units; the target names where it leads.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Door {
    pub x: u8,
    pub y: u8,
    pub target_level: u8,
    pub target_stage: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ItemKind {
    Corkscrew,
    DoorKey,
    Boots,
    Lantern,
    TeleportWand,
    Gems,
    Crown,
    Gold,
    BlastolaCola,
    Shield,
}

/// A collectible placed in a stage, coordinates in game units.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Item {
    pub kind: ItemKind,
    pub x: u8,
    pub y: u8,
}

/// Enemy spawn record: which sprite slot and which brain.
#[derive(Clone, Copy, Debug)]
pub struct EnemySpawn {
    pub sprite: u8,
    pub behavior: Behavior,
    pub fast: bool,
}

/// Sprite metadata for one of a level's four enemy sprite slots.
/// `num_frames == 0` marks the slot's asset as unavailable.
#[derive(Clone, Copy, Debug)]
pub struct SpriteDesc {
    pub name: &'static str,
    pub num_frames: u8,
}

impl SpriteDesc {
    pub const UNUSED: SpriteDesc = SpriteDesc { name: "", num_frames: 0 };
}

#[derive(Clone, Debug)]
pub struct Stage {
    /// Row-major 128×10 tile ids.
    pub tiles: Vec<u8>,
    pub exit_left: Option<u8>,
    pub exit_right: Option<u8>,
    pub doors: Vec<Door>,
    pub enemies: [Option<EnemySpawn>; MAX_ENEMIES],
    pub item: Option<Item>,
}

#[derive(Clone, Debug)]
pub struct Level {
    pub name: &'static str,
    /// Tile ids above this are solid.
    pub last_passable: u8,
    pub sprites: [SpriteDesc; MAX_SPRITES],
    pub stages: Vec<Stage>,
}

// ══════════════════════════════════════════════════════════════════════
// Loading
// ══════════════════════════════════════════════════════════════════════

/// Begin play at the given level and stage, with the player at the
/// default entry position.
pub fn start(world: &mut WorldState, level: u8, stage: u8) {
    world.current_level = level;
    world.current_stage = stage;
    world.source_door = None;

    let power = if world.inventory.has_boots { JUMP_POWER_BOOTS } else { JUMP_POWER_DEFAULT };
    world.player = Player::new(4, 14);
    world.player.jump_power = power;
    world.player.jump_counter = power;

    load_new_level(world);
}

/// Load the current level's assets and its current stage. Invalid
/// level numbers leave the world unloaded.
pub fn load_new_level(world: &mut WorldState) {
    let n = world.current_level as usize;
    if n >= NUM_LEVELS || n >= world.levels.len() {
        warn!("ignoring load of invalid level {}", world.current_level);
        world.level_loaded = false;
        return;
    }
    world.level_loaded = true;
    load_new_stage(world);
}

/// Swap in the current stage's tiles, item, and enemy slots, and
/// position the player and camera per the entry mode.
pub fn load_new_stage(world: &mut WorldState) {
    // Copy what the load needs out of the descriptor up front; the
    // rest of the function mutates the world freely.
    let (tiles, last_passable, doors, item) = {
        let Some(level) = world.level() else {
            warn!("stage load with no level loaded");
            return;
        };
        let Some(stage) = level.stages.get(world.current_stage as usize) else {
            warn!(
                "ignoring load of invalid stage {} in level {}",
                world.current_stage, world.current_level
            );
            return;
        };
        (stage.tiles.clone(), level.last_passable, stage.doors.clone(), stage.item)
    };

    world.map = TileMap::from_stage(&tiles, last_passable);
    world.stage_item = item;

    if let Some((src_level, src_stage)) = world.source_door {
        let reciprocal = doors
            .iter()
            .find(|d| d.target_level == src_level && d.target_stage == src_stage)
            .copied();
        match reciprocal {
            Some(door) => {
                // Center the two-unit player in the two-unit doorway.
                world.player.x = door.x.wrapping_add(1);
                world.player.y = door.y;
                world.player.y_vel = 0;
                world.camera.center_on(world.player.x);
            }
            None => {
                warn!(
                    "no reciprocal door back to level {} stage {}; keeping player position",
                    src_level, src_stage
                );
                world.camera.center_on(world.player.x);
            }
        }
        world.source_door = None;
    } else {
        world.camera.center_on(world.player.x);
    }

    actors::setup_enemies_for_stage(world);
}

// ══════════════════════════════════════════════════════════════════════
// Embedded demo level set
// ══════════════════════════════════════════════════════════════════════

/// Tile id used for solid terrain in the demo set.
pub const DEMO_SOLID: u8 = 0x40;
/// Solidity threshold of the demo set.
pub const DEMO_LAST_PASSABLE: u8 = 0x3F;

pub fn blank_grid() -> Vec<u8> {
    vec![0u8; TILES_PER_STAGE]
}

pub fn set_tile(grid: &mut [u8], tx: u8, ty: u8, id: u8) {
    grid[ty as usize * MAP_WIDTH_TILES as usize + tx as usize] = id;
}

/// A grid with a solid floor along the bottom tile row.
pub fn floored_grid() -> Vec<u8> {
    let mut grid = blank_grid();
    for tx in 0..MAP_WIDTH_TILES {
        set_tile(&mut grid, tx, 9, DEMO_SOLID);
    }
    grid
}

fn plain_stage(exit_left: Option<u8>, exit_right: Option<u8>) -> Stage {
    Stage {
        tiles: floored_grid(),
        exit_left,
        exit_right,
        doors: vec![],
        enemies: [None; MAX_ENEMIES],
        item: None,
    }
}

/// A small built-in level set: three levels of three stages each, wired
/// with edge exits, doors (including one cross-level pair), items, and
/// a spread of enemy behaviors. Useful as a default world and as the
/// fixture the simulation tests run against.
pub fn demo_levels() -> Vec<Level> {
    // ── Level 0: lakeside ──
    let mut lake0 = plain_stage(None, Some(1));
    lake0.doors.push(Door { x: 40, y: 14, target_level: 0, target_stage: 1 });
    lake0.doors.push(Door { x: 80, y: 14, target_level: 1, target_stage: 0 });
    lake0.item = Some(Item { kind: ItemKind::DoorKey, x: 20, y: 16 });
    lake0.enemies[0] =
        Some(EnemySpawn { sprite: 0, behavior: Behavior::Bounce, fast: false });
    lake0.enemies[1] = Some(EnemySpawn { sprite: 1, behavior: Behavior::Leap, fast: true });

    let mut lake1 = plain_stage(Some(0), Some(2));
    lake1.doors.push(Door { x: 60, y: 14, target_level: 0, target_stage: 0 });
    lake1.enemies[0] = Some(EnemySpawn { sprite: 2, behavior: Behavior::Roll, fast: false });

    let mut lake2 = plain_stage(Some(1), None);
    lake2.enemies[0] = Some(EnemySpawn { sprite: 3, behavior: Behavior::Seek, fast: false });

    let lake = Level {
        name: "lakeside",
        last_passable: DEMO_LAST_PASSABLE,
        sprites: [
            SpriteDesc { name: "fireball", num_frames: 2 },
            SpriteDesc { name: "toad", num_frames: 4 },
            SpriteDesc { name: "globe", num_frames: 3 },
            SpriteDesc { name: "bee", num_frames: 2 },
        ],
        stages: vec![lake0, lake1, lake2],
    };

    // ── Level 1: woods ──
    let mut woods0 = plain_stage(None, Some(1));
    woods0.doors.push(Door { x: 30, y: 14, target_level: 0, target_stage: 0 });
    woods0.item = Some(Item { kind: ItemKind::Boots, x: 100, y: 16 });
    woods0.enemies[0] = Some(EnemySpawn { sprite: 0, behavior: Behavior::Shy, fast: false });

    let woods1 = plain_stage(Some(0), Some(2));
    let woods2 = plain_stage(Some(1), None);

    let woods = Level {
        name: "woods",
        last_passable: DEMO_LAST_PASSABLE,
        sprites: [
            SpriteDesc { name: "shybird", num_frames: 3 },
            SpriteDesc::UNUSED,
            SpriteDesc::UNUSED,
            SpriteDesc::UNUSED,
        ],
        stages: vec![woods0, woods1, woods2],
    };

    // ── Level 2: orbit (reduced gravity) ──
    let orbit0 = plain_stage(None, Some(1));
    let orbit1 = plain_stage(Some(0), Some(2));
    let orbit2 = plain_stage(Some(1), None);

    let orbit = Level {
        name: "orbit",
        last_passable: DEMO_LAST_PASSABLE,
        sprites: [SpriteDesc::UNUSED; MAX_SPRITES],
        stages: vec![orbit0, orbit1, orbit2],
    };

    vec![lake, woods, orbit]
}

// ══════════════════════════════════════════════════════════════════════
