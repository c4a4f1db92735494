// The terrain grid and the walkability map derived from it.
//
// `TileGrid` is a dense row-major `Vec<TerrainKind>` indexed by
// `x + y * width`, giving O(1) reads. Out-of-bounds reads return `None`,
// out-of-bounds writes are ignored.
//
// `Walkability` is the single passability policy every movement decision
// goes through: a cell is walkable if it is on the map, its terrain is
// passable (deep water and lava are not), and no built, non-passable
// structure covers it. Blueprints never block. It also precomputes the
// per-cell speed factor (terrain multiplier times the floor multiplier of a
// built floor on that cell). It is rebuilt from scratch at the start of
// each agent phase, since structures only change between phases.
//
// See also: `pathfinding.rs` which searches over a walkability predicate,
// `worldgen.rs` which fills the grid, `catalog.rs` for terrain definitions.

use crate::config::GameConfig;
use crate::structure::Structure;
use crate::types::{GridCoord, Layer, TerrainKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: u32,
    pub height: u32,
    tiles: Vec<TerrainKind>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, fill: TerrainKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; width as usize * height as usize],
        }
    }

    pub fn in_bounds(&self, c: GridCoord) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as u32) < self.width && (c.y as u32) < self.height
    }

    fn index(&self, c: GridCoord) -> Option<usize> {
        self.in_bounds(c)
            .then(|| c.x as usize + c.y as usize * self.width as usize)
    }

    pub fn get(&self, c: GridCoord) -> Option<TerrainKind> {
        self.index(c).map(|i| self.tiles[i])
    }

    pub fn set(&mut self, c: GridCoord, terrain: TerrainKind) {
        if let Some(i) = self.index(c) {
            self.tiles[i] = terrain;
        }
    }

    /// Every cell, row by row.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + use<> {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..h).flat_map(move |y| (0..w).map(move |x| GridCoord::new(x, y)))
    }

    pub fn count(&self, terrain: TerrainKind) -> usize {
        self.tiles.iter().filter(|t| **t == terrain).count()
    }
}

/// Per-cell passability and speed, derived from terrain and structures.
#[derive(Clone, Debug)]
pub struct Walkability {
    width: u32,
    height: u32,
    walkable: Vec<bool>,
    speed: Vec<f32>,
}

impl Walkability {
    pub fn build<'a>(
        grid: &TileGrid,
        structures: impl IntoIterator<Item = &'a Structure>,
        config: &GameConfig,
    ) -> Self {
        let cells = grid.width as usize * grid.height as usize;
        let mut walkable = Vec::with_capacity(cells);
        let mut speed = Vec::with_capacity(cells);
        for c in grid.coords() {
            let def = grid.get(c).and_then(|t| config.terrain_def(t));
            walkable.push(def.is_some_and(|d| d.passable));
            speed.push(def.map_or(1.0, |d| d.speed_multiplier));
        }
        let mut map = Self {
            width: grid.width,
            height: grid.height,
            walkable,
            speed,
        };
        for s in structures {
            if s.is_blueprint {
                continue;
            }
            let Some(def) = config.structure_def(s.kind) else {
                continue;
            };
            for cell in def.footprint(s.origin) {
                let Some(i) = map.index(cell) else { continue };
                if !def.passable {
                    map.walkable[i] = false;
                }
                if def.layer == Layer::Floor {
                    map.speed[i] *= def.walk_speed_multiplier;
                }
            }
        }
        map
    }

    fn index(&self, c: GridCoord) -> Option<usize> {
        (c.x >= 0 && c.y >= 0 && (c.x as u32) < self.width && (c.y as u32) < self.height)
            .then(|| c.x as usize + c.y as usize * self.width as usize)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_walkable(&self, c: GridCoord) -> bool {
        self.index(c).is_some_and(|i| self.walkable[i])
    }

    /// Terrain times floor multiplier at `c` (1.0 off-map).
    pub fn speed_at(&self, c: GridCoord) -> f32 {
        self.index(c).map_or(1.0, |i| self.speed[i])
    }
}
