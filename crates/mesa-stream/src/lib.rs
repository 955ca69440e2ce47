//! Asynchronous terrain generation pipeline and viewer-relative chunk
//! streaming over an infinite grid.

mod chunk;
mod pipeline;
mod preview;
mod streamer;

pub use chunk::{Bounds2, Chunk, ChunkCoord, ChunkState};
pub use pipeline::{GenerationPipeline, GeneratorSettings};
pub use preview::{Preview, PreviewMode, TextureData, generate_preview};
pub use streamer::ChunkStreamer;
