/// RAM stream provider: whole-file loading with chunk reassembly.

use std::path::Path;
use std::sync::Arc;

use vista_3d_engine::engine_err;
use vista_3d_engine::error::Result;

use crate::chunk::{records, reassemble_split_chunks, ChunkBuffer};

use super::{ChunkStream, StreamProvider};

/// Serves an SI resource out of one memory allocation.
///
/// The buffer is reassembled on load: no reachable chunk carries the
/// split flag afterwards.
pub struct RamStreamProvider {
    bytes: Vec<u8>,
    dwords: Vec<u32>,
}

impl RamStreamProvider {
    /// Take ownership of raw resource bytes and reassemble them.
    pub fn from_bytes(mut bytes: Vec<u8>) -> Result<Self> {
        reassemble_split_chunks(&mut bytes)?;

        // Dword view of the reassembled buffer, zero-padded to alignment
        let mut padded = bytes.clone();
        while padded.len() % 4 != 0 {
            padded.push(0);
        }
        let dwords: Vec<u32> = bytemuck::pod_collect_to_vec(&padded);

        Ok(Self { bytes, dwords })
    }

    /// Load a resource file from disk into memory.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|error| {
            engine_err!(ResourceAllocation, "vista3d::RamStream",
                "cannot read '{}': {}", path.display(), error)
        })?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// All chunks of the resource, in stored order.
    pub fn chunks(&self) -> Result<Vec<ChunkBuffer>> {
        Ok(records(&self.bytes)?.iter().map(|record| record.to_buffer()).collect())
    }
}

impl StreamProvider for RamStreamProvider {
    fn file_size(&self) -> u32 {
        self.bytes.len() as u32
    }

    fn stream_buffer_count(&self) -> i32 {
        1
    }

    fn length_in_dwords(&self) -> u32 {
        self.dwords.len() as u32
    }

    fn dword_view(&self) -> &[u32] {
        &self.dwords
    }
}

/// Pull-based chunk stream over a RAM provider.
pub struct RamChunkStream {
    chunks: Vec<ChunkBuffer>,
    cursor: usize,
}

impl RamChunkStream {
    pub fn new(provider: &Arc<RamStreamProvider>) -> Result<Self> {
        Ok(Self { chunks: provider.chunks()?, cursor: 0 })
    }
}

impl ChunkStream for RamChunkStream {
    fn next_chunk(&mut self) -> Result<Option<ChunkBuffer>> {
        match self.chunks.get(self.cursor) {
            Some(chunk) => {
                self.cursor += 1;
                Ok(Some(chunk.clone()))
            }
            None => Ok(None),
        }
    }

    fn rewind(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }

    fn exhausted(&self) -> bool {
        self.cursor >= self.chunks.len()
    }
}

#[cfg(test)]
#[path = "ram_tests.rs"]
mod tests;
