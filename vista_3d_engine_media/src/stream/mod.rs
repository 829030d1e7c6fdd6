//! Stream providers: chunked SI resource loading.
//!
//! The RAM provider loads a whole file up front and reassembles split
//! chunks in place; the disk provider streams chunks through a worker
//! thread, preserving on-disk delivery order per controller.

mod disk;
mod ram;
mod streaming_action;

pub use disk::{CancelMatch, DiskChunkStream, DiskStreamProvider};
pub use ram::{RamChunkStream, RamStreamProvider};
pub use streaming_action::StreamingAction;

use crate::chunk::ChunkBuffer;
use vista_3d_engine::error::Result;

/// Common surface of the stream providers.
pub trait StreamProvider {
    /// Size of the backing resource in bytes
    fn file_size(&self) -> u32;

    /// How many stream buffers the resource is served through
    fn stream_buffer_count(&self) -> i32;

    /// Resource length in 32-bit words
    fn length_in_dwords(&self) -> u32;

    /// Resident dword view of the resource; empty when the provider
    /// does not keep the resource in memory
    fn dword_view(&self) -> &[u32];
}

/// Controller callback contract for streamed chunk delivery.
///
/// For any single sink, chunks arrive in the order they are stored on
/// disk. End-of-stream is reported once per exhausted request.
pub trait StreamSink: Send + Sync {
    fn on_chunk(&self, action: &StreamingAction, chunk: ChunkBuffer);
    fn on_end_of_stream(&self, action: &StreamingAction);
}

/// Synchronous pull interface consumed by media presenters.
///
/// `next_chunk` returning `None` means "nothing available right now";
/// [`exhausted`](ChunkStream::exhausted) distinguishes a dry spell from
/// the end of the stream.
pub trait ChunkStream: Send {
    fn next_chunk(&mut self) -> Result<Option<ChunkBuffer>>;

    /// Restart the stream from its beginning (used by looping media).
    fn rewind(&mut self) -> Result<()>;

    fn exhausted(&self) -> bool;
}
