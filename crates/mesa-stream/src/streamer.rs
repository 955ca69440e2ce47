//! Viewer-relative chunk lifecycle management over the infinite grid.
//!
//! Each tick the streamer hides everything, re-evaluates the square ring of
//! coordinates around the viewer, creates never-seen chunks (kicking off map
//! generation), and keeps visible chunks' mesh LOD in step with the viewer's
//! distance band. Chunks are never evicted; the table grows monotonically
//! for the life of the process.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use glam::Vec2;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use mesa_config::TerrainConfig;
use mesa_lod::LodBands;
use mesa_mesh::MeshData;
use mesa_terrain::MapData;

use crate::chunk::{Chunk, ChunkCoord};
use crate::pipeline::{GenerationPipeline, GeneratorSettings};

/// Generation results routed back from pipeline callbacks into streamer
/// state. Callbacks run on the interactive thread during the pipeline
/// drain, so this channel is a same-thread mailbox, not a synchronization
/// point.
enum StreamEvent {
    MapReady(ChunkCoord, Arc<MapData>),
    MeshReady(ChunkCoord, u8, MeshData),
}

/// Streams terrain chunks around a moving viewer.
pub struct ChunkStreamer {
    chunk_size: f32,
    max_view_distance: f32,
    visible_radius: i32,
    lod_bands: LodBands,
    pipeline: GenerationPipeline,
    chunks: HashMap<ChunkCoord, Chunk>,
    visible: Vec<ChunkCoord>,
    viewer: Vec2,
    events_tx: Sender<StreamEvent>,
    events_rx: Receiver<StreamEvent>,
}

impl ChunkStreamer {
    /// Create a streamer over an existing pipeline.
    ///
    /// `visible_chunk_radius` is derived as `floor(max_view_distance / chunk_size)`.
    pub fn new(
        pipeline: GenerationPipeline,
        chunk_size: u32,
        max_view_distance: f32,
        lod_bands: LodBands,
    ) -> Self {
        let chunk_size = chunk_size as f32;
        let (events_tx, events_rx) = unbounded();
        Self {
            chunk_size,
            max_view_distance,
            visible_radius: (max_view_distance / chunk_size).floor() as i32,
            lod_bands,
            pipeline,
            chunks: HashMap::new(),
            visible: Vec::new(),
            viewer: Vec2::ZERO,
            events_tx,
            events_rx,
        }
    }

    /// Build a streamer (and its pipeline) from configuration.
    pub fn from_config(config: &TerrainConfig) -> Self {
        let config = config.normalized();
        let pipeline =
            GenerationPipeline::with_default_workers(GeneratorSettings::from_config(&config));
        Self::new(
            pipeline,
            config.world.chunk_size,
            config.world.max_view_distance,
            LodBands::for_view_distance(config.world.max_view_distance),
        )
    }

    /// Advance one tick: record the viewer position, drain finished
    /// generation work, then re-evaluate visibility and generation for the
    /// ring of coordinates around the viewer. Call once per tick from the
    /// interactive thread.
    pub fn update(&mut self, viewer_position: Vec2) {
        self.viewer = viewer_position;

        self.pipeline.drain();
        self.apply_events();

        // Hide everything; the ring walk below re-shows what is in range.
        for coord in self.visible.drain(..) {
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                chunk.set_visible(false);
            }
        }

        let center = ChunkCoord::from_world(self.viewer, self.chunk_size);
        let max_sq = self.max_view_distance * self.max_view_distance;

        for dy in -self.visible_radius..=self.visible_radius {
            for dx in -self.visible_radius..=self.visible_radius {
                let coord = ChunkCoord::new(center.x + dx, center.y + dy);
                match self.chunks.entry(coord) {
                    Entry::Occupied(entry) => {
                        let chunk = entry.into_mut();
                        let sq_distance = chunk.bounds().sq_distance(self.viewer);
                        let visible = sq_distance <= max_sq;
                        chunk.set_visible(visible);
                        if !visible {
                            continue;
                        }
                        self.visible.push(coord);

                        // Keep the mesh LOD in step with the distance band,
                        // superseding any in-flight request at a stale LOD.
                        if let Some(map) = chunk.map_data() {
                            let desired = self.lod_bands.select(sq_distance.sqrt());
                            if chunk.requested_lod() != Some(desired) {
                                let map = Arc::clone(map);
                                chunk.mark_mesh_requested(desired);
                                let events = self.events_tx.clone();
                                self.pipeline.request_mesh_data(map, desired, move |mesh| {
                                    let _ = events.send(StreamEvent::MeshReady(
                                        coord, desired, mesh,
                                    ));
                                });
                            }
                        }
                    }
                    Entry::Vacant(entry) => {
                        // Never-seen coordinate: create the chunk and kick
                        // off map generation immediately. It stays hidden
                        // until the next tick re-evaluates it.
                        let mut chunk = Chunk::new(coord, self.chunk_size);
                        let events = self.events_tx.clone();
                        self.pipeline.request_map_data(
                            coord.world_center(self.chunk_size),
                            move |map| {
                                let _ = events.send(StreamEvent::MapReady(coord, map));
                            },
                        );
                        chunk.mark_map_requested();
                        tracing::debug!(x = coord.x, y = coord.y, "chunk created");
                        entry.insert(chunk);
                    }
                }
            }
        }
    }

    fn apply_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                StreamEvent::MapReady(coord, map) => {
                    if let Some(chunk) = self.chunks.get_mut(&coord) {
                        chunk.apply_map_data(map);
                    }
                }
                StreamEvent::MeshReady(coord, lod, mesh) => {
                    if let Some(chunk) = self.chunks.get_mut(&coord)
                        && !chunk.apply_mesh_data(lod, mesh)
                    {
                        tracing::debug!(
                            x = coord.x,
                            y = coord.y,
                            lod,
                            "discarded stale mesh result"
                        );
                    }
                }
            }
        }
    }

    /// The chunk at `coord`, if it was ever created.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Total number of chunks ever created (the table never shrinks).
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Coordinates shown this tick.
    pub fn visible_coords(&self) -> &[ChunkCoord] {
        &self.visible
    }

    /// Chunks shown this tick, for the rendering collaborator.
    pub fn visible_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.visible.iter().filter_map(|coord| self.chunks.get(coord))
    }

    /// The viewer position recorded by the last tick.
    pub fn viewer(&self) -> Vec2 {
        self.viewer
    }

    /// The underlying pipeline.
    pub fn pipeline(&self) -> &GenerationPipeline {
        &self.pipeline
    }
}
