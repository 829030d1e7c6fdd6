/// Stored chunk records, split-chunk reassembly and buffer recycling.
///
/// A stored record is `[u16 flags][u32 size][u16 kind][body]` where
/// `size` counts the envelope (header + body, flags word excluded).
/// The split flag marks a chunk whose body continues in the next
/// record; reassembly merges such runs into single records.

use bitflags::bitflags;

use vista_3d_engine::engine_err;
use vista_3d_engine::error::Result;

use super::envelope::{ChunkHeader, CHUNK_HEADER_SIZE};

/// Bytes in front of every stored record.
const RECORD_PREFIX_SIZE: usize = 2;

bitflags! {
    /// Side-band flags stored in front of each chunk record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChunkStoreFlags: u16 {
        /// Body continues in the following record
        const SPLIT = 0x0010;
    }
}

/// One chunk's worth of bytes, as delivered to stream controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkBuffer {
    pub flags: ChunkStoreFlags,
    pub kind: u16,
    pub body: Vec<u8>,
}

impl ChunkBuffer {
    pub fn new(kind: u16, body: Vec<u8>) -> Self {
        Self { flags: ChunkStoreFlags::empty(), kind, body }
    }

    pub fn is_split(&self) -> bool {
        self.flags.contains(ChunkStoreFlags::SPLIT)
    }

    /// Append a continuation's body and take over its remaining flags.
    pub fn absorb_continuation(&mut self, continuation: ChunkBuffer) {
        self.body.extend_from_slice(&continuation.body);
        self.flags = continuation.flags;
    }
}

/// Borrowed view of one stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRecord<'a> {
    pub flags: ChunkStoreFlags,
    pub kind: u16,
    pub body: &'a [u8],
    /// Offset of the record's flags word inside the buffer
    pub offset: usize,
}

impl<'a> ChunkRecord<'a> {
    /// Total stored bytes of this record.
    pub fn stored_len(&self) -> usize {
        RECORD_PREFIX_SIZE + CHUNK_HEADER_SIZE + self.body.len()
    }

    pub fn to_buffer(&self) -> ChunkBuffer {
        ChunkBuffer { flags: self.flags, kind: self.kind, body: self.body.to_vec() }
    }
}

/// Append one stored record.
pub fn write_chunk_record(out: &mut Vec<u8>, flags: ChunkStoreFlags, kind: u16, body: &[u8]) {
    out.extend_from_slice(&flags.bits().to_le_bytes());
    let header = ChunkHeader { size: (CHUNK_HEADER_SIZE + body.len()) as u32, kind };
    header.write_to(out);
    out.extend_from_slice(body);
}

/// Parse a buffer of stored records.
pub fn records(data: &[u8]) -> Result<Vec<ChunkRecord<'_>>> {
    let mut result = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let record = read_record(data, offset)?;
        offset += record.stored_len();
        result.push(record);
    }
    Ok(result)
}

fn read_record(data: &[u8], offset: usize) -> Result<ChunkRecord<'_>> {
    if offset + RECORD_PREFIX_SIZE + CHUNK_HEADER_SIZE > data.len() {
        return Err(engine_err!(InvalidParameters, "vista3d::ChunkBuffer",
            "truncated chunk record at offset {}", offset));
    }
    let flags =
        ChunkStoreFlags::from_bits_truncate(u16::from_le_bytes([data[offset], data[offset + 1]]));
    let header = ChunkHeader::read_from(&data[offset + RECORD_PREFIX_SIZE..])?;
    let body_start = offset + RECORD_PREFIX_SIZE + CHUNK_HEADER_SIZE;
    let body_len = header.body_len();
    if body_start + body_len > data.len() {
        return Err(engine_err!(InvalidParameters, "vista3d::ChunkBuffer",
            "chunk body of {} bytes overruns buffer at offset {}", body_len, offset));
    }
    Ok(ChunkRecord {
        flags,
        kind: header.kind,
        body: &data[body_start..body_start + body_len],
        offset,
    })
}

/// Merge split chunk runs into single records, in place.
///
/// After the pass no reachable record carries the split flag. Running
/// the pass on an already-reassembled buffer is a no-op.
pub fn reassemble_split_chunks(buffer: &mut Vec<u8>) -> Result<()> {
    let mut merged = Vec::with_capacity(buffer.len());
    let mut pending: Option<ChunkBuffer> = None;

    for record in records(buffer)? {
        if let Some(mut current) = pending.take() {
            current.absorb_continuation(record.to_buffer());
            if current.is_split() {
                pending = Some(current);
            } else {
                write_chunk_record(
                    &mut merged,
                    ChunkStoreFlags::empty(),
                    current.kind,
                    &current.body,
                );
            }
        } else if record.flags.contains(ChunkStoreFlags::SPLIT) {
            pending = Some(record.to_buffer());
        } else {
            write_chunk_record(&mut merged, record.flags, record.kind, record.body);
        }
    }

    if pending.is_some() {
        return Err(engine_err!(InvalidParameters, "vista3d::ChunkBuffer",
            "buffer ends inside a split chunk run"));
    }

    *buffer = merged;
    Ok(())
}

/// Recycles chunk body allocations.
///
/// Cancelled disk reads return their buffers here instead of delivering
/// them; later reads reuse the allocations.
#[derive(Default)]
pub struct BufferPool {
    free: Vec<Vec<u8>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self { free: Vec::new() }
    }

    /// Take a cleared buffer with at least `capacity` bytes reserved.
    pub fn acquire(&mut self, capacity: usize) -> Vec<u8> {
        match self.free.pop() {
            Some(mut buffer) => {
                buffer.clear();
                buffer.reserve(capacity);
                buffer
            }
            None => Vec::with_capacity(capacity),
        }
    }

    /// Return a buffer to the pool.
    pub fn recycle(&mut self, buffer: Vec<u8>) {
        self.free.push(buffer);
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
