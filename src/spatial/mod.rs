//! Spatial model - tile-based world grid

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Tile coordinates in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub row: usize,
    pub col: usize,
}

impl TilePos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Chebyshev distance, the metric the square radius enumeration uses.
    pub fn chebyshev(self, other: TilePos) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// Euclidean distance between tile centers.
    pub fn distance(self, other: TilePos) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }

    pub fn center(self) -> (f64, f64) {
        (self.row as f64 + 0.5, self.col as f64 + 0.5)
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One grid cell: physical attributes plus the handles of the entities
/// standing on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pos: TilePos,
    pub(crate) elevation: f64,
    pub(crate) water: f64,
    pub(crate) saturation: f64,
    pub(crate) cloud_cover: f64,
    entities: Vec<EntityId>,
}

impl Tile {
    fn new(pos: TilePos) -> Self {
        Self {
            pos,
            elevation: 0.0,
            water: 0.0,
            saturation: 0.0,
            cloud_cover: 0.0,
            entities: Vec::new(),
        }
    }

    pub fn pos(&self) -> TilePos {
        self.pos
    }

    /// Meters above sea level.
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Standing water, never negative.
    pub fn water(&self) -> f64 {
        self.water
    }

    /// Sets the standing water, clamped at zero.
    pub fn set_water(&mut self, water: f64) {
        self.water = if water.is_nan() { 0.0 } else { water.max(0.0) };
    }

    /// Proximity to standing water, in `[0, 1]`.
    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Weather overlay, in `[0, 1]`.
    pub fn cloud_cover(&self) -> f64 {
        self.cloud_cover
    }

    /// Elevation plus standing water, the level hydrology equalizes.
    pub fn level(&self) -> f64 {
        self.elevation + self.water
    }

    pub fn has_water(&self) -> bool {
        self.water > 0.0
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains(&id)
    }

    pub(crate) fn insert(&mut self, id: EntityId) {
        if !self.entities.contains(&id) {
            self.entities.push(id);
        }
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> bool {
        match self.entities.iter().position(|e| *e == id) {
            Some(index) => {
                self.entities.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_entities(&mut self) {
        self.entities.clear();
    }
}

/// Fixed-size, row-major grid of tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(width: usize, height: usize) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                tiles.push(Tile::new(TilePos::new(row, col)));
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    fn index(&self, pos: TilePos) -> Option<usize> {
        if pos.row < self.height && pos.col < self.width {
            Some(pos.row * self.width + pos.col)
        } else {
            None
        }
    }

    pub fn get(&self, pos: TilePos) -> Option<&Tile> {
        self.index(pos).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, pos: TilePos) -> Option<&mut Tile> {
        self.index(pos).map(move |i| &mut self.tiles[i])
    }

    /// Signed lookup for callers probing past the edges.
    pub fn at(&self, row: i64, col: i64) -> Option<&Tile> {
        if self.in_bounds(row, col) {
            self.get(TilePos::new(row as usize, col as usize))
        } else {
            None
        }
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    pub fn positions(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.tiles.iter().map(|t| t.pos)
    }

    /// Direct neighbors (4-connectivity): north, south, west, east.
    pub fn neighbors4(&self, pos: TilePos) -> Vec<TilePos> {
        let mut neighbors = Vec::with_capacity(4);
        if pos.row > 0 {
            neighbors.push(TilePos::new(pos.row - 1, pos.col));
        }
        if pos.row + 1 < self.height {
            neighbors.push(TilePos::new(pos.row + 1, pos.col));
        }
        if pos.col > 0 {
            neighbors.push(TilePos::new(pos.row, pos.col - 1));
        }
        if pos.col + 1 < self.width {
            neighbors.push(TilePos::new(pos.row, pos.col + 1));
        }
        neighbors
    }

    /// Tiles exactly `radius` away (Chebyshev), clockwise from the top-left
    /// corner. Radius 0 is the origin itself. Out-of-bounds cells are skipped.
    pub fn ring(&self, origin: TilePos, radius: usize) -> Vec<TilePos> {
        if self.index(origin).is_none() {
            return Vec::new();
        }
        if radius == 0 {
            return vec![origin];
        }
        let r = radius as i64;
        let (row0, col0) = (origin.row as i64, origin.col as i64);
        let mut ring = Vec::with_capacity(8 * radius);
        let mut push = |row: i64, col: i64| {
            if self.in_bounds(row, col) {
                ring.push(TilePos::new(row as usize, col as usize));
            }
        };
        // top edge, left to right
        for col in (col0 - r)..(col0 + r) {
            push(row0 - r, col);
        }
        // right edge, top to bottom
        for row in (row0 - r)..(row0 + r) {
            push(row, col0 + r);
        }
        // bottom edge, right to left
        for col in ((col0 - r + 1)..=(col0 + r)).rev() {
            push(row0 + r, col);
        }
        // left edge, bottom to top
        for row in ((row0 - r + 1)..=(row0 + r)).rev() {
            push(row, col0 - r);
        }
        ring
    }

    /// Every tile within `radius`, spiraling outward: the origin first, then
    /// each ring in turn. Consumers that take the first match rely on this
    /// order being stable.
    pub fn spiral(&self, origin: TilePos, radius: usize) -> Vec<TilePos> {
        let mut tiles = Vec::new();
        for r in 0..=radius {
            tiles.extend(self.ring(origin, r));
        }
        tiles
    }
}
