//! # Ingest Module
//!
//! Turns a raw, host-supplied file into a self-contained [`PortableImage`]
//! (a base64 data URI), enforcing the size ceiling before any bytes are read.

pub mod file;
pub mod ingestor;
pub mod portable;

pub use file::{DiskFile, MemoryFile, RawFile};
pub use ingestor::{ImageIngestor, MAX_FILE_BYTES};
pub use portable::PortableImage;
