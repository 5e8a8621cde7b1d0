/// Tile map and solidity queries — single source of truth for collision.
///
/// ## Coordinate system
///
/// Dynamic entities live in *game units*: 2 units = 1 tile. A stage map is
/// 128×10 tiles = 256×20 game units. Converting a unit coordinate to a tile
/// index is an integer division by 2, so an entity at an odd coordinate
/// straddles two tiles — the probe helpers below account for that.
///
/// ## Solidity
///
/// A tile id is solid when it is *greater than* the tileset's
/// `last_passable` threshold; ids at or below the threshold are passable.
/// Any out-of-bounds query returns tile 0, which is always passable: the
/// playfield edges are handled by explicit bounds checks in physics and AI,
/// never by phantom walls.

// ── Map geometry (game units unless noted) ──

/// Stage width in tiles.
pub const MAP_WIDTH_TILES: u8 = 128;
/// Stage height in tiles.
pub const MAP_HEIGHT_TILES: u8 = 10;
/// Stage width in game units as a wide integer, for camera math.
pub const MAP_WIDTH_UNITS: i16 = 256;
/// Visible playfield width in game units.
pub const PLAYFIELD_WIDTH: i16 = 24;
/// Visible playfield height in game units.
pub const PLAYFIELD_HEIGHT: u8 = 20;

/// One stage's tile grid plus its solidity threshold.
///
/// The grid is a flat row-major byte array copied out of the stage
/// descriptor at load time; the simulation never mutates it.
#[derive(Clone, Debug)]
pub struct TileMap {
    tiles: Vec<u8>,
    last_passable: u8,
}

impl TileMap {
    /// An all-passable map (used before the first stage load).
    pub fn empty() -> Self {
        TileMap {
            tiles: vec![0; MAP_WIDTH_TILES as usize * MAP_HEIGHT_TILES as usize],
            last_passable: 0xFF,
        }
    }

    /// Build from a stage's raw tile bytes and the tileset threshold.
    /// Short grids are zero-padded rather than rejected: a truncated map
    /// degrades to passable space, it never crashes the tick.
    pub fn from_stage(tiles: &[u8], last_passable: u8) -> Self {
        let want = MAP_WIDTH_TILES as usize * MAP_HEIGHT_TILES as usize;
        let mut grid = vec![0u8; want];
        let n = tiles.len().min(want);
        if tiles.len() != want {
            log::warn!(
                "stage tile grid is {} bytes, expected {}; padding with passable tiles",
                tiles.len(),
                want
            );
        }
        grid[..n].copy_from_slice(&tiles[..n]);
        TileMap { tiles: grid, last_passable }
    }

    /// Tile id at a game-unit coordinate. Out of bounds ⇒ 0 (passable).
    #[inline]
    pub fn get_tile(&self, x: u8, y: u8) -> u8 {
        let tile_x = x / 2;
        let tile_y = y / 2;
        if tile_x >= MAP_WIDTH_TILES || tile_y >= MAP_HEIGHT_TILES {
            return 0;
        }
        self.tiles[tile_y as usize * MAP_WIDTH_TILES as usize + tile_x as usize]
    }

    /// Is this tile id solid under the current tileset?
    #[inline]
    pub fn is_solid(&self, tile_id: u8) -> bool {
        tile_id > self.last_passable
    }

    /// Solidity at a game-unit coordinate.
    #[inline]
    pub fn solid_at(&self, x: u8, y: u8) -> bool {
        self.is_solid(self.get_tile(x, y))
    }

    /// Probe for the player's 2-unit-wide footprint: checks (x, y) and,
    /// when x is odd (straddling a tile boundary), also (x+1, y).
    pub fn solid_at_wide(&self, x: u8, y: u8) -> bool {
        if self.solid_at(x, y) {
            return true;
        }
        if x & 1 != 0 {
            return self.solid_at(x.wrapping_add(1), y);
        }
        false
    }

    /// Enemy horizontal-movement probe: checks (x, y) and, when y is odd
    /// (enemy spans two tile rows), also (x, y+1).
    pub fn horizontal_collision(&self, x: u8, y: u8) -> bool {
        if self.solid_at(x, y) {
            return true;
        }
        if y & 1 != 0 {
            return self.solid_at(x, y.wrapping_add(1));
        }
        false
    }

    /// Enemy vertical-movement probe: checks (x, y) and, when x is odd
    /// (enemy spans two tile columns), also (x+1, y).
    pub fn vertical_collision(&self, x: u8, y: u8) -> bool {
        if self.solid_at(x, y) {
            return true;
        }
        if x & 1 != 0 {
            return self.solid_at(x.wrapping_add(1), y);
        }
        false
    }

    pub fn last_passable(&self) -> u8 {
        self.last_passable
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
