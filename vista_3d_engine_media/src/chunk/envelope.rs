/// Chunk envelope headers, bit-exact little-endian.

use vista_3d_engine::engine_err;
use vista_3d_engine::error::Result;

/// Bytes occupied by [`ChunkHeader`] on the wire.
pub const CHUNK_HEADER_SIZE: usize = 6;
/// Bytes occupied by [`FileHeader`] on the wire.
pub const FILE_HEADER_SIZE: usize = CHUNK_HEADER_SIZE + 14;
/// Bytes occupied by [`FrameHeader`] on the wire.
pub const FRAME_HEADER_SIZE: usize = CHUNK_HEADER_SIZE + 10;

/// Chunk payload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ChunkKind {
    /// 256-entry palette data
    Palette = 0x0004,
    /// Word-oriented delta compression
    DeltaWord = 0x0007,
    /// 64-entry palette data
    Palette64 = 0x000B,
    /// Byte-oriented delta compression
    DeltaByte = 0x000C,
    /// Whole frame filled with color index 0
    BlackFrame = 0x000D,
    /// Byte run-length compression
    Rle = 0x000F,
    /// Uncompressed pixel data
    Raw = 0x0010,
    /// Preview thumbnail
    Thumbnail = 0x0012,
    /// Start of an animation frame
    Frame = 0xF1FA,
}

impl ChunkKind {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0004 => Some(ChunkKind::Palette),
            0x0007 => Some(ChunkKind::DeltaWord),
            0x000B => Some(ChunkKind::Palette64),
            0x000C => Some(ChunkKind::DeltaByte),
            0x000D => Some(ChunkKind::BlackFrame),
            0x000F => Some(ChunkKind::Rle),
            0x0010 => Some(ChunkKind::Raw),
            0x0012 => Some(ChunkKind::Thumbnail),
            0xF1FA => Some(ChunkKind::Frame),
            _ => None,
        }
    }
}

/// Generic chunk header; every chunk starts with this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Total chunk size in bytes, header included
    pub size: u32,
    /// Raw kind tag (see [`ChunkKind`])
    pub kind: u16,
}

impl ChunkHeader {
    pub fn read_from(data: &[u8]) -> Result<Self> {
        if data.len() < CHUNK_HEADER_SIZE {
            return Err(engine_err!(InvalidParameters, "vista3d::Chunk",
                "chunk header needs {} bytes, got {}", CHUNK_HEADER_SIZE, data.len()));
        }
        Ok(Self {
            size: u32::from_le_bytes([data[0], data[1], data[2], data[3]]),
            kind: u16::from_le_bytes([data[4], data[5]]),
        })
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.size.to_le_bytes());
        out.extend_from_slice(&self.kind.to_le_bytes());
    }

    /// Bytes of payload following the header.
    pub fn body_len(&self) -> usize {
        (self.size as usize).saturating_sub(CHUNK_HEADER_SIZE)
    }
}

/// File header: the chunk header extended with animation properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub chunk: ChunkHeader,
    pub frames: u16,
    pub width: u16,
    pub height: u16,
    pub depth_bpp: u16,
    pub flags: u16,
    /// Time between frames, in ms
    pub speed_ms: u32,
}

impl FileHeader {
    pub fn read_from(data: &[u8]) -> Result<Self> {
        if data.len() < FILE_HEADER_SIZE {
            return Err(engine_err!(InvalidParameters, "vista3d::Chunk",
                "file header needs {} bytes, got {}", FILE_HEADER_SIZE, data.len()));
        }
        Ok(Self {
            chunk: ChunkHeader::read_from(data)?,
            frames: u16::from_le_bytes([data[6], data[7]]),
            width: u16::from_le_bytes([data[8], data[9]]),
            height: u16::from_le_bytes([data[10], data[11]]),
            depth_bpp: u16::from_le_bytes([data[12], data[13]]),
            flags: u16::from_le_bytes([data[14], data[15]]),
            speed_ms: u32::from_le_bytes([data[16], data[17], data[18], data[19]]),
        })
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        self.chunk.write_to(out);
        out.extend_from_slice(&self.frames.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.depth_bpp.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.speed_ms.to_le_bytes());
    }
}

/// Frame header: the chunk header extended with per-frame properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub chunk: ChunkHeader,
    /// Number of subchunks composing this frame
    pub subchunks: u16,
    /// Delay before the frame is shown, in ms
    pub delay_ms: u16,
    /// Always zero
    pub reserved: u16,
    /// Overrides the file width when non-zero
    pub width_override: u16,
    /// Overrides the file height when non-zero
    pub height_override: u16,
}

impl FrameHeader {
    pub fn read_from(data: &[u8]) -> Result<Self> {
        if data.len() < FRAME_HEADER_SIZE {
            return Err(engine_err!(InvalidParameters, "vista3d::Chunk",
                "frame header needs {} bytes, got {}", FRAME_HEADER_SIZE, data.len()));
        }
        Ok(Self {
            chunk: ChunkHeader::read_from(data)?,
            subchunks: u16::from_le_bytes([data[6], data[7]]),
            delay_ms: u16::from_le_bytes([data[8], data[9]]),
            reserved: u16::from_le_bytes([data[10], data[11]]),
            width_override: u16::from_le_bytes([data[12], data[13]]),
            height_override: u16::from_le_bytes([data[14], data[15]]),
        })
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        self.chunk.write_to(out);
        out.extend_from_slice(&self.subchunks.to_le_bytes());
        out.extend_from_slice(&self.delay_ms.to_le_bytes());
        out.extend_from_slice(&self.reserved.to_le_bytes());
        out.extend_from_slice(&self.width_override.to_le_bytes());
        out.extend_from_slice(&self.height_override.to_le_bytes());
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
