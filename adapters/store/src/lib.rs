#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Raster store adapters for the raster life engine.
//!
//! [`FileStore`] persists each raster as a single-line, versioned text file
//! so externalized generations survive the process; [`MemoryStore`] backs
//! tests and embedded use. Both implement the [`RasterStore`] seam and map
//! their failures into the shared store error taxonomy.

mod encoding;
mod fs;
mod memory;

pub use fs::FileStore;
pub use memory::MemoryStore;
