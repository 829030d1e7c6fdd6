/// Action tree: shared core fields plus a tagged payload.

use bitflags::bitflags;
use glam::Vec3;

use crate::atom::AtomId;

use super::media::{MediaInfo, MediaKind, SUSTAIN_INDEFINITE};

/// "Unset" sentinel for durations.
pub const DURATION_UNSET: i32 = i32::MIN;
/// "Unset" sentinel for start times and timestamps.
pub const TIME_UNSET: i32 = i32::MIN;
/// "Unset" sentinel for loop counts (-1 also means "loop forever").
pub const LOOP_UNSET: i32 = -1;
/// "Unset" sentinel for vector components.
pub const FLOAT_UNSET: f32 = f32::MAX;

bitflags! {
    /// Flow-control bits carried by every action.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ActionFlags: u32 {
        /// Repeat when the duration elapses
        const LOOPING = 0x01;
        const BIT3 = 0x04;
        const BIT4 = 0x08;
        const BIT5 = 0x10;
        /// Action is currently enabled
        const ENABLED = 0x20;
        const BIT7 = 0x40;
        /// Location/direction/up are world-space
        const WORLD_SPACE = 0x80;
        const BIT9 = 0x100;
        const BIT10 = 0x200;
        const BIT11 = 0x400;
    }
}

/// Fields shared by every action node.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCore {
    /// Script resource this action came from
    pub atom_id: AtomId,
    /// Object id inside the script
    pub object_id: u32,
    pub flags: ActionFlags,
    /// Scheduled start offset in ms, or [`TIME_UNSET`]
    pub start_time: i32,
    /// Playback duration in ms, or [`DURATION_UNSET`]
    pub duration: i32,
    /// Remaining repeats; -1 repeats forever
    pub loop_count: i32,
    pub location: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    /// Opaque script-defined configuration blob
    pub extra: Vec<u8>,
    /// Wall-clock ms at which playback started, or [`TIME_UNSET`]
    pub start_timestamp: i32,
}

impl Default for ActionCore {
    fn default() -> Self {
        Self {
            atom_id: AtomId::default(),
            object_id: 0,
            flags: ActionFlags::ENABLED,
            start_time: TIME_UNSET,
            duration: DURATION_UNSET,
            loop_count: LOOP_UNSET,
            location: Vec3::splat(FLOAT_UNSET),
            direction: Vec3::splat(FLOAT_UNSET),
            up: Vec3::splat(FLOAT_UNSET),
            extra: Vec::new(),
            start_timestamp: TIME_UNSET,
        }
    }
}

/// How a multi-action schedules its children.
#[derive(Debug, Clone, PartialEq)]
pub enum MultiKind {
    /// All children run concurrently from the same origin
    Parallel,
    /// Children run one after another
    Serial,
    /// Parallel carrying the selection data it was deserialised with;
    /// after deserialisation exactly one child remains
    Select { variable: String, choices: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionPayload {
    /// Plain action with no media or children
    Leaf,
    /// Composite over owned children
    Multi { kind: MultiKind, children: Vec<Action> },
    /// Media leaf
    Media { kind: MediaKind, info: MediaInfo },
}

/// One node of an SI action tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub core: ActionCore,
    pub payload: ActionPayload,
}

impl Action {
    pub fn leaf() -> Self {
        Self { core: ActionCore::default(), payload: ActionPayload::Leaf }
    }

    pub fn parallel(children: Vec<Action>) -> Self {
        Self {
            core: ActionCore::default(),
            payload: ActionPayload::Multi { kind: MultiKind::Parallel, children },
        }
    }

    pub fn serial(children: Vec<Action>) -> Self {
        Self {
            core: ActionCore::default(),
            payload: ActionPayload::Multi { kind: MultiKind::Serial, children },
        }
    }

    pub fn select(variable: String, choices: Vec<String>, children: Vec<Action>) -> Self {
        Self {
            core: ActionCore::default(),
            payload: ActionPayload::Multi { kind: MultiKind::Select { variable, choices }, children },
        }
    }

    pub fn media(kind: MediaKind, info: MediaInfo) -> Self {
        Self { core: ActionCore::default(), payload: ActionPayload::Media { kind, info } }
    }

    pub fn is_looping(&self) -> bool {
        self.core.flags.contains(ActionFlags::LOOPING)
    }

    pub fn is_enabled(&self) -> bool {
        self.core.flags.contains(ActionFlags::ENABLED)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.core.flags.set(ActionFlags::ENABLED, enabled);
    }

    pub fn children(&self) -> &[Action] {
        match &self.payload {
            ActionPayload::Multi { children, .. } => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut [Action] {
        match &mut self.payload {
            ActionPayload::Multi { children, .. } => children,
            _ => &mut [],
        }
    }

    pub fn media_info(&self) -> Option<&MediaInfo> {
        match &self.payload {
            ActionPayload::Media { info, .. } => Some(info),
            _ => None,
        }
    }

    /// Effective duration of this node in ms.
    ///
    /// An explicitly set duration wins. Otherwise parallels report the
    /// latest child end (`max(start + duration-or-sustain)`), serials the
    /// sum of every child's `start + duration`, leaves 0.
    pub fn duration(&self) -> i32 {
        if self.core.duration != DURATION_UNSET {
            return self.core.duration;
        }
        match &self.payload {
            ActionPayload::Multi { kind, children } => match kind {
                MultiKind::Serial => children
                    .iter()
                    .map(|child| child.start_offset() + child.duration_with_sustain())
                    .sum(),
                MultiKind::Parallel | MultiKind::Select { .. } => children
                    .iter()
                    .map(|child| child.start_offset() + child.duration_with_sustain())
                    .max()
                    .unwrap_or(0),
            },
            _ => 0,
        }
    }

    pub fn set_duration(&mut self, duration: i32) {
        self.core.duration = duration;
    }

    /// Start time with the unset sentinel mapped to zero.
    pub fn start_offset(&self) -> i32 {
        if self.core.start_time == TIME_UNSET {
            0
        } else {
            self.core.start_time
        }
    }

    /// Duration plus any finite media sustain.
    fn duration_with_sustain(&self) -> i32 {
        let base = self.duration();
        match &self.payload {
            ActionPayload::Media { info, .. }
                if info.sustain_time != SUSTAIN_INDEFINITE && info.sustain_time > 0 =>
            {
                base + info.sustain_time
            }
            _ => base,
        }
    }

    /// Whether this action or any descendant carries `object_id`.
    pub fn has_id(&self, object_id: u32) -> bool {
        if self.core.object_id == object_id {
            return true;
        }
        self.children().iter().any(|child| child.has_id(object_id))
    }

    /// Assign the atom id to this node and every descendant.
    pub fn set_atom_id(&mut self, atom_id: AtomId) {
        self.core.atom_id = atom_id.clone();
        for child in self.children_mut() {
            child.set_atom_id(atom_id.clone());
        }
    }

    /// Stamp the playback start on this node and every descendant.
    pub fn set_start_timestamp(&mut self, timestamp: i32) {
        self.core.start_timestamp = timestamp;
        for child in self.children_mut() {
            child.set_start_timestamp(timestamp);
        }
    }

    /// Milliseconds since the start timestamp, 0 before playback.
    pub fn elapsed(&self, now_ms: i32) -> i32 {
        if self.core.start_timestamp == TIME_UNSET {
            0
        } else {
            now_ms - self.core.start_timestamp
        }
    }

    /// Merge set fields of `other` into this action (and recursively
    /// into children). Unset sentinels on `other` leave fields alone;
    /// extra data concatenates behind a `:` separator.
    pub fn merge_from(&mut self, other: &Action) {
        let core = &mut self.core;
        if other.core.start_time != TIME_UNSET {
            core.start_time = other.core.start_time;
        }
        if other.core.duration != DURATION_UNSET {
            core.duration = other.core.duration;
        }
        if other.core.loop_count != LOOP_UNSET {
            core.loop_count = other.core.loop_count;
        }
        if other.core.location.x != FLOAT_UNSET {
            core.location = other.core.location;
        }
        if other.core.direction.x != FLOAT_UNSET {
            core.direction = other.core.direction;
        }
        if other.core.up.x != FLOAT_UNSET {
            core.up = other.core.up;
        }
        if !other.core.extra.is_empty() {
            if core.extra.is_empty() {
                core.extra = other.core.extra.clone();
            } else {
                core.extra.push(b':');
                core.extra.extend_from_slice(&other.core.extra);
            }
        }

        for child in self.children_mut() {
            child.merge_from(other);
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
