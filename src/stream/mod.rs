// Windowed chunk streaming for text files far larger than RAM.
//
// reader:   ChunkReader over a FileAccess collaborator (seek + read)
// window:   WindowCache, SLOT_COUNT fixed buffers tagged by chunk index
// estimate: SizeEstimator, per-chunk height from the first measurement
// session:  StreamSession, scroll-driven window shifts and spacer math
// config:   StreamConfig tunables
// error:    StreamError

pub mod config;
pub mod error;
pub mod estimate;
pub mod reader;
pub mod session;
pub mod window;

pub use config::StreamConfig;
pub use error::StreamError;
pub use estimate::{Measure, SizeEstimator};
pub use reader::{CHUNK_BYTES, ChunkReader, FileAccess, chunk_count};
pub use session::{ScrollUpdate, StreamSession};
pub use window::{SLOT_COUNT, Slot, WindowCache};
