//! A single tile of the infinite terrain grid and its generation lifecycle.

use std::sync::Arc;

use glam::Vec2;
use mesa_mesh::MeshData;
use mesa_terrain::MapData;

/// Integer chunk position on the infinite grid, in chunk-size multiples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    /// Coordinate pair constructor.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The chunk containing a world position, by rounding.
    pub fn from_world(position: Vec2, chunk_size: f32) -> Self {
        Self {
            x: (position.x / chunk_size).round() as i32,
            y: (position.y / chunk_size).round() as i32,
        }
    }

    /// World-space center of this chunk.
    pub fn world_center(&self, chunk_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * chunk_size, self.y as f32 * chunk_size)
    }
}

/// Axis-aligned 2D bounds in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2 {
    min: Vec2,
    max: Vec2,
}

impl Bounds2 {
    /// Bounds of a square of side `size` centered at `center`.
    pub fn from_center_size(center: Vec2, size: f32) -> Self {
        let half = Vec2::splat(size / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Squared distance from `point` to the nearest point of the bounds
    /// (zero when inside).
    pub fn sq_distance(&self, point: Vec2) -> f32 {
        let nearest = point.clamp(self.min, self.max);
        point.distance_squared(nearest)
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec2 {
        self.min
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec2 {
        self.max
    }
}

/// Chunk lifecycle state. Mesh states are re-entered with a new LOD whenever
/// the viewer's distance band changes; the most recently requested LOD is
/// authoritative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Just created, nothing requested yet.
    Created,
    /// Map data generation submitted.
    MapRequested,
    /// Map data available; mesh not yet requested.
    MapReady,
    /// Mesh generation submitted at the given LOD.
    MeshRequested(u8),
    /// Mesh available at the given LOD.
    MeshReady(u8),
}

/// One square tile of the terrain grid. Created on first sight of its
/// coordinate and never destroyed; visibility is toggled per tick instead.
pub struct Chunk {
    coord: ChunkCoord,
    bounds: Bounds2,
    state: ChunkState,
    visible: bool,
    map: Option<Arc<MapData>>,
    mesh: Option<MeshData>,
    requested_lod: Option<u8>,
}

impl Chunk {
    /// Create a chunk for `coord` with world bounds derived from the chunk size.
    pub fn new(coord: ChunkCoord, chunk_size: f32) -> Self {
        Self {
            coord,
            bounds: Bounds2::from_center_size(coord.world_center(chunk_size), chunk_size),
            state: ChunkState::Created,
            visible: false,
            map: None,
            mesh: None,
            requested_lod: None,
        }
    }

    /// Grid coordinate.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// World-space bounds.
    pub fn bounds(&self) -> Bounds2 {
        self.bounds
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Whether the chunk is currently shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Toggle visibility for this tick.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Map data, once generated.
    pub fn map_data(&self) -> Option<&Arc<MapData>> {
        self.map.as_ref()
    }

    /// Geometry at the most recently accepted LOD, once generated.
    pub fn mesh_data(&self) -> Option<&MeshData> {
        self.mesh.as_ref()
    }

    /// The LOD of the most recent mesh request, if any.
    pub fn requested_lod(&self) -> Option<u8> {
        self.requested_lod
    }

    /// Record that map generation was submitted.
    pub fn mark_map_requested(&mut self) {
        debug_assert_eq!(self.state, ChunkState::Created);
        self.state = ChunkState::MapRequested;
    }

    /// Accept generated map data. Map data is set exactly once and never
    /// replaced afterwards.
    pub fn apply_map_data(&mut self, map: Arc<MapData>) {
        debug_assert!(self.map.is_none(), "map data must never be replaced");
        if self.map.is_none() {
            self.map = Some(map);
            self.state = ChunkState::MapReady;
        }
    }

    /// Record that a mesh was requested at `lod`, superseding any in-flight
    /// request at another LOD.
    pub fn mark_mesh_requested(&mut self, lod: u8) {
        self.requested_lod = Some(lod);
        self.state = ChunkState::MeshRequested(lod);
    }

    /// Accept generated geometry if `lod` is still the most recently
    /// requested one. Returns `false` when the result is stale and was
    /// discarded.
    pub fn apply_mesh_data(&mut self, lod: u8, mesh: MeshData) -> bool {
        if self.requested_lod != Some(lod) {
            return false;
        }
        self.mesh = Some(mesh);
        self.state = ChunkState::MeshReady(lod);
        true
    }
}
