//! Asynchronous generation pipeline with a worker thread pool.
//!
//! Offloads map-data and mesh-data jobs to background threads and delivers
//! the results as bound callbacks through a single FIFO completion channel,
//! drained once per tick on the interactive thread. Callbacks never execute
//! on a worker, so downstream consumers need no synchronization of their own.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};
use glam::Vec2;
use mesa_config::{NormalizeModeConfig, TerrainConfig};
use mesa_mesh::{HeightCurve, MeshData, build_terrain_mesh};
use mesa_terrain::{
    MapData, NoiseParams, NormalizeMode, Rgba8, TerrainType, default_regions, generate_map_data,
};

/// A result callback bound to its result, ready to invoke on the
/// interactive thread.
type Completion = Box<dyn FnOnce() + Send>;

/// A unit of generation work. Returns `None` when the job failed and no
/// result should be delivered.
type Job = Box<dyn FnOnce() -> Option<Completion> + Send>;

/// Immutable generation parameters shared by every worker.
#[derive(Clone, Debug)]
pub struct GeneratorSettings {
    /// Noise field parameters.
    pub noise: NoiseParams,
    /// Terrain bands, ascending by height threshold.
    pub regions: Vec<TerrainType>,
    /// Vertical exaggeration applied after the height curve.
    pub height_multiplier: f32,
    /// Height remap curve.
    pub height_curve: HeightCurve,
}

impl GeneratorSettings {
    /// Build settings from a (normalized) configuration. An empty region
    /// table falls back to the default bands; curve keys are sorted and
    /// deduplicated before constructing the height curve.
    pub fn from_config(config: &TerrainConfig) -> Self {
        let config = config.normalized();

        let noise = NoiseParams {
            seed: config.noise.seed,
            scale: config.noise.scale,
            octaves: config.noise.octaves,
            persistence: config.noise.persistence,
            lacunarity: config.noise.lacunarity,
            offset: Vec2::from(config.noise.offset),
            normalize: match config.noise.normalize {
                NormalizeModeConfig::Local => NormalizeMode::Local,
                NormalizeModeConfig::Global => NormalizeMode::Global,
            },
        };

        let regions = if config.regions.is_empty() {
            default_regions()
        } else {
            config
                .regions
                .iter()
                .map(|r| {
                    TerrainType::new(&r.name, r.height, Rgba8::rgb(r.color[0], r.color[1], r.color[2]))
                })
                .collect()
        };

        let mut keys: Vec<(f32, f32)> = config
            .mesh
            .height_curve
            .iter()
            .map(|k| (k[0], k[1]))
            .collect();
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        keys.dedup_by(|a, b| a.0 == b.0);
        let height_curve = if keys.len() >= 2 {
            HeightCurve::from_keys(keys)
        } else {
            HeightCurve::identity()
        };

        Self {
            noise,
            regions,
            height_multiplier: config.mesh.height_multiplier,
            height_curve,
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            noise: NoiseParams::default(),
            regions: default_regions(),
            height_multiplier: 20.0,
            height_curve: HeightCurve::identity(),
        }
    }
}

/// Orchestrates off-thread map and mesh generation.
///
/// Requests are fire-and-forget: the interactive thread never blocks on
/// generation. Results arrive in completion order (not request order) and
/// are handed back through [`drain`](Self::drain). There is no cancellation;
/// superseded results are still delivered and must be discarded downstream.
pub struct GenerationPipeline {
    settings: Arc<GeneratorSettings>,
    job_sender: Option<Sender<Job>>,
    completions: Receiver<Completion>,
    workers: Vec<JoinHandle<()>>,
    in_flight: Arc<AtomicUsize>,
}

impl GenerationPipeline {
    /// Spawn a pipeline with the given number of worker threads.
    pub fn new(settings: GeneratorSettings, worker_count: usize) -> Self {
        let (job_sender, job_receiver) = unbounded::<Job>();
        let (completion_sender, completions) = unbounded::<Completion>();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let mut workers = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let jobs: Receiver<Job> = job_receiver.clone();
            let done = completion_sender.clone();
            let flight = Arc::clone(&in_flight);

            let handle = std::thread::Builder::new()
                .name(format!("terrain-gen-{i}"))
                .spawn(move || {
                    while let Ok(job) = jobs.recv() {
                        // A panicking job must not take the worker (or any
                        // other in-flight request) down with it; the request
                        // simply never completes.
                        match catch_unwind(AssertUnwindSafe(move || job())) {
                            Ok(Some(completion)) => {
                                let _ = done.send(completion);
                            }
                            Ok(None) => {}
                            Err(_) => {
                                tracing::warn!("generation job panicked; request dropped");
                            }
                        }
                        flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })
                .expect("failed to spawn terrain generation worker");
            workers.push(handle);
        }

        Self {
            settings: Arc::new(settings),
            job_sender: Some(job_sender),
            completions,
            workers,
            in_flight,
        }
    }

    /// Spawn a pipeline sized to the machine, leaving a core for the
    /// interactive thread.
    pub fn with_default_workers(settings: GeneratorSettings) -> Self {
        let workers = num_cpus::get().saturating_sub(1).max(1);
        Self::new(settings, workers)
    }

    /// The shared generation parameters.
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Request map data (noise heights + region colors) for the chunk
    /// centered at `center`, in sample-grid units. The callback runs during
    /// a later [`drain`](Self::drain) on the interactive thread.
    pub fn request_map_data(
        &self,
        center: Vec2,
        callback: impl FnOnce(Arc<MapData>) + Send + 'static,
    ) {
        let settings = Arc::clone(&self.settings);
        self.submit(Box::new(move || {
            let map = Arc::new(generate_map_data(
                &settings.noise,
                &settings.regions,
                center,
            ));
            Some(Box::new(move || callback(map)) as Completion)
        }));
    }

    /// Request a mesh for previously generated map data at the given LOD.
    ///
    /// A stride that does not divide the grid is a caller contract
    /// violation: it is reported at error level and the request is dropped,
    /// never delivered.
    pub fn request_mesh_data(
        &self,
        map: Arc<MapData>,
        level_of_detail: u8,
        callback: impl FnOnce(MeshData) + Send + 'static,
    ) {
        let settings = Arc::clone(&self.settings);
        self.submit(Box::new(move || {
            match build_terrain_mesh(
                &map.heights,
                settings.height_multiplier,
                &settings.height_curve,
                level_of_detail,
            ) {
                Ok(mesh) => Some(Box::new(move || callback(mesh)) as Completion),
                Err(err) => {
                    tracing::error!(lod = level_of_detail, "mesh build rejected: {err}");
                    None
                }
            }
        }));
    }

    fn submit(&self, job: Job) {
        let Some(sender) = &self.job_sender else {
            tracing::warn!("pipeline shut down; request dropped");
            return;
        };
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        if sender.send(job).is_err() {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            tracing::warn!("pipeline shut down; request dropped");
        }
    }

    /// Invoke every pending completion callback in FIFO completion order
    /// and leave the queue empty. Must be called from the interactive
    /// thread only, once per tick. Returns the number of callbacks run.
    pub fn drain(&self) -> usize {
        let mut count = 0;
        while let Ok(completion) = self.completions.try_recv() {
            completion();
            count += 1;
        }
        count
    }

    /// Number of requests submitted but not yet finished by a worker.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Shut down workers: close the job channel and join the threads.
    /// Already-queued completions remain drainable.
    pub fn shutdown(&mut self) {
        self.job_sender.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for GenerationPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
