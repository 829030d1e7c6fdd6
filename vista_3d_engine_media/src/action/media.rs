/// Media action payload data.

/// Sustain sentinel: hold the last frame until cancelled.
pub const SUSTAIN_INDEFINITE: i32 = -1;

/// What kind of media a media action drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Anim,
    Still,
    Sound,
    Event,
    ObjectAction,
}

/// Media-specific action fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    /// Source path of the media payload inside the SI file
    pub media_src_path: String,
    /// Playback rate in frames per second
    pub frame_rate: u32,
    /// Container-defined media format tag
    pub media_format: u32,
    /// Palette management mode
    pub palette_mode: u32,
    /// How long the last frame is held after playback, in ms;
    /// [`SUSTAIN_INDEFINITE`] holds forever, 0 releases immediately
    pub sustain_time: i32,
}

impl Default for MediaInfo {
    fn default() -> Self {
        Self {
            media_src_path: String::new(),
            frame_rate: 0,
            media_format: 0,
            palette_mode: 0,
            sustain_time: 0,
        }
    }
}
