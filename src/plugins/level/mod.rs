//! Level data: the RON level document and the validated `Level` resource.
//!
//! The document is a tile grid (one string per row, top row first) plus a list of
//! named point markers. Validation happens once, at load time, and everything the
//! gameplay systems need afterwards is precomputed here:
//! - merged solid runs (one collider per horizontal run of solid tiles),
//! - water / climb / spike sensor volumes,
//! - resolved spawn, checkpoint and victory positions.
//!
//! Missing singleton markers are a load-time error, never a runtime surprise.

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::common::geometry::overlaps;

/// The level shipped with the game. Embedded so headless runs need no asset server.
pub const BUILTIN_LEVEL: &str = include_str!("../../../assets/levels/level1.ron");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum MarkerKind {
    PlayerSpawn,
    CheckpointSpawn,
    VictoryFlag,
    Coin,
    ItemBox,
    EnemySpawn,
    EnemyBouncer,
    BossSpawn,
    MovingTile,
    TileBouncer,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    /// Footprint of tile-derived markers (`MovingTile`, `TileBouncer`).
    pub size: Option<(f32, f32)>,
}

impl Marker {
    pub fn new(kind: MarkerKind, x: f32, y: f32) -> Self {
        Self { kind, x, y, size: None }
    }

    pub fn sized(kind: MarkerKind, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { kind, x, y, size: Some((w, h)) }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Raw level document as written on disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelData {
    pub tile_size: f32,
    pub rows: Vec<String>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Empty,
    Solid,
    Water,
    Climb,
    Spikes,
}

impl TileKind {
    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' | ' ' => Some(TileKind::Empty),
            '#' => Some(TileKind::Solid),
            '~' => Some(TileKind::Water),
            'H' => Some(TileKind::Climb),
            '^' => Some(TileKind::Spikes),
            _ => None,
        }
    }

    #[inline]
    pub fn collides(self) -> bool {
        matches!(self, TileKind::Solid)
    }
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level document: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("level has no tile rows")]
    Empty,
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(f32),
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile glyph {glyph:?} at row {row}, column {column}")]
    UnknownTile { row: usize, column: usize, glyph: char },
    #[error("level is missing a {0:?} marker")]
    MissingMarker(MarkerKind),
    #[error("level has more than one {0:?} marker")]
    DuplicateMarker(MarkerKind),
    #[error("{0:?} marker needs a size")]
    MissingSize(MarkerKind),
}

/// Static overlap-only regions, derived once from tiles.
#[derive(Debug, Clone, Default)]
pub struct SensorVolumes {
    pub water: Vec<Aabb2d>,
    pub climb: Vec<Aabb2d>,
    pub spikes: Vec<Aabb2d>,
}

impl SensorVolumes {
    #[inline]
    pub fn in_water(&self, bounds: &Aabb2d) -> bool {
        self.water.iter().any(|v| overlaps(bounds, v))
    }

    #[inline]
    pub fn in_climb(&self, bounds: &Aabb2d) -> bool {
        self.climb.iter().any(|v| overlaps(bounds, v))
    }

    #[inline]
    pub fn on_spikes(&self, bounds: &Aabb2d) -> bool {
        self.spikes.iter().any(|v| overlaps(bounds, v))
    }
}

/// Validated level. Read-only after load.
#[derive(Resource, Debug, Clone)]
pub struct Level {
    pub tile_size: f32,
    pub columns: usize,
    pub rows: usize,
    /// Row-major, top row first.
    pub tiles: Vec<TileKind>,
    pub spawn: Vec2,
    pub checkpoint: Vec2,
    pub victory: Vec2,
    pub coins: Vec<Vec2>,
    pub item_boxes: Vec<Vec2>,
    pub enemy_spawns: Vec<Vec2>,
    pub enemy_bouncers: Vec<Vec2>,
    pub boss_spawns: Vec<Vec2>,
    pub moving_tiles: Vec<Rect>,
    pub tile_bouncers: Vec<Rect>,
    /// Horizontal runs of solid tiles, one rectangle per run.
    pub solids: Vec<Rect>,
    pub sensors: SensorVolumes,
}

impl Level {
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_ron(BUILTIN_LEVEL)
    }

    pub fn from_ron(src: &str) -> Result<Self, LevelError> {
        let data: LevelData = ron::from_str(src)?;
        Self::from_data(data)
    }

    pub fn from_data(data: LevelData) -> Result<Self, LevelError> {
        if data.tile_size.is_nan() || data.tile_size <= 0.0 {
            return Err(LevelError::InvalidTileSize(data.tile_size));
        }
        let rows = data.rows.len();
        let columns = data.rows.first().map(|r| r.chars().count()).ok_or(LevelError::Empty)?;
        if columns == 0 {
            return Err(LevelError::Empty);
        }

        let mut tiles = Vec::with_capacity(rows * columns);
        for (row, line) in data.rows.iter().enumerate() {
            let found = line.chars().count();
            if found != columns {
                return Err(LevelError::RaggedRow { row, expected: columns, found });
            }
            for (column, glyph) in line.chars().enumerate() {
                let tile = TileKind::from_glyph(glyph)
                    .ok_or(LevelError::UnknownTile { row, column, glyph })?;
                tiles.push(tile);
            }
        }

        let single = |kind: MarkerKind| -> Result<Vec2, LevelError> {
            let mut found = data.markers.iter().filter(|m| m.kind == kind);
            let first = found.next().ok_or(LevelError::MissingMarker(kind))?;
            if found.next().is_some() {
                return Err(LevelError::DuplicateMarker(kind));
            }
            Ok(first.position())
        };
        let points = |kind: MarkerKind| -> Vec<Vec2> {
            data.markers.iter().filter(|m| m.kind == kind).map(Marker::position).collect()
        };
        let rects = |kind: MarkerKind| -> Result<Vec<Rect>, LevelError> {
            data.markers
                .iter()
                .filter(|m| m.kind == kind)
                .map(|m| {
                    let (w, h) = m.size.ok_or(LevelError::MissingSize(kind))?;
                    Ok(Rect::from_center_size(m.position(), Vec2::new(w, h)))
                })
                .collect()
        };

        let mut level = Self {
            tile_size: data.tile_size,
            columns,
            rows,
            tiles,
            spawn: single(MarkerKind::PlayerSpawn)?,
            checkpoint: single(MarkerKind::CheckpointSpawn)?,
            victory: single(MarkerKind::VictoryFlag)?,
            coins: points(MarkerKind::Coin),
            item_boxes: points(MarkerKind::ItemBox),
            enemy_spawns: points(MarkerKind::EnemySpawn),
            enemy_bouncers: points(MarkerKind::EnemyBouncer),
            boss_spawns: points(MarkerKind::BossSpawn),
            moving_tiles: rects(MarkerKind::MovingTile)?,
            tile_bouncers: rects(MarkerKind::TileBouncer)?,
            solids: Vec::new(),
            sensors: SensorVolumes::default(),
        };
        level.solids = level.solid_runs();
        level.sensors = level.sensor_volumes();
        Ok(level)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_size
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// World-space extent of the grid; the bottom edge is y = 0.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width(), self.height())
    }

    #[inline]
    pub fn tile(&self, column: usize, row: usize) -> TileKind {
        self.tiles[row * self.columns + column]
    }

    /// Center of a tile. Rows count from the top, world y points up.
    #[inline]
    pub fn tile_center(&self, column: usize, row: usize) -> Vec2 {
        let ts = self.tile_size;
        Vec2::new(
            (column as f32 + 0.5) * ts,
            (self.rows - 1 - row) as f32 * ts + 0.5 * ts,
        )
    }

    pub fn tiles_of(&self, kind: TileKind) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.columns).map(move |column| (column, row)))
            .filter(move |&(column, row)| self.tile(column, row) == kind)
    }

    fn solid_runs(&self) -> Vec<Rect> {
        let ts = self.tile_size;
        let mut runs = Vec::new();
        for row in 0..self.rows {
            let bottom = (self.rows - 1 - row) as f32 * ts;
            let mut column = 0;
            while column < self.columns {
                if !self.tile(column, row).collides() {
                    column += 1;
                    continue;
                }
                let start = column;
                while column < self.columns && self.tile(column, row).collides() {
                    column += 1;
                }
                runs.push(Rect::new(start as f32 * ts, bottom, column as f32 * ts, bottom + ts));
            }
        }
        runs
    }

    fn sensor_volumes(&self) -> SensorVolumes {
        let half = Vec2::splat(self.tile_size * 0.5);
        let full = |(c, r): (usize, usize)| Aabb2d::new(self.tile_center(c, r), half);
        // Spikes only hurt on their lower half, where the points are drawn.
        let quarter = self.tile_size * 0.25;
        let spike = |(c, r): (usize, usize)| {
            Aabb2d::new(
                self.tile_center(c, r) - Vec2::Y * quarter,
                Vec2::new(half.x, quarter),
            )
        };

        SensorVolumes {
            water: self.tiles_of(TileKind::Water).map(full).collect(),
            climb: self.tiles_of(TileKind::Climb).map(full).collect(),
            spikes: self.tiles_of(TileKind::Spikes).map(spike).collect(),
        }
    }
}

pub fn plugin(app: &mut App) {
    // Tests and tools may install their own level before the plugin runs.
    if app.world().contains_resource::<Level>() {
        return;
    }
    let level = Level::builtin().unwrap_or_else(|err| panic!("built-in level is invalid: {err}"));
    info!(
        "level loaded: {}x{} tiles, {} coins, {} item boxes, {} enemies, {} bosses",
        level.columns,
        level.rows,
        level.coins.len(),
        level.item_boxes.len(),
        level.enemy_spawns.len(),
        level.boss_spawns.len(),
    );
    app.insert_resource(level);
}
