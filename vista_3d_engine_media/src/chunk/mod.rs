//! SI chunk envelope and chunk buffers.
//!
//! The wire format is little-endian and bit-exact: a 6-byte chunk
//! header (`u32` size including the header, `u16` kind), extended by
//! file and frame headers. Stored chunk records additionally carry a
//! `u16` side-band flags word in front of the envelope; its split bit
//! marks a chunk whose body continues in the following record.

mod buffer;
mod envelope;

pub use buffer::{
    reassemble_split_chunks, records, write_chunk_record, BufferPool, ChunkBuffer, ChunkRecord,
    ChunkStoreFlags,
};
pub use envelope::{
    ChunkHeader, ChunkKind, FileHeader, FrameHeader, CHUNK_HEADER_SIZE, FILE_HEADER_SIZE,
    FRAME_HEADER_SIZE,
};
