/// Binary (de)serialisation of action trees.
///
/// Layout is little-endian throughout. Every action record starts with a
/// `u16` kind tag, followed by the core fields (object id, flags, timing,
/// vectors, extra blob) and the payload:
///
/// - multi kinds carry a `u16` child count and the child records,
/// - select additionally carries the variable/token string and the
///   choice strings before its children,
/// - media kinds carry the source path, frame rate, format, palette
///   mode and sustain time.
///
/// Deserialising a select action resolves the selection immediately:
/// the variable is looked up in the context's [`VariableTable`] (or a
/// uniformly random index is drawn for `RANDOM_n` tokens) and only the
/// matching child is kept.

use glam::Vec3;
use rand::{Rng, RngCore};
use rustc_hash::FxHashMap;
use vista_3d_engine::error::Result;
use vista_3d_engine::{engine_err, engine_warn};

use super::action::{Action, ActionFlags, ActionPayload, MultiKind};
use super::media::{MediaInfo, MediaKind};

// Action record kind tags
const KIND_LEAF: u16 = 0x00;
const KIND_PARALLEL: u16 = 0x01;
const KIND_SERIAL: u16 = 0x02;
const KIND_SELECT: u16 = 0x03;
const KIND_ANIM: u16 = 0x10;
const KIND_STILL: u16 = 0x11;
const KIND_SOUND: u16 = 0x12;
const KIND_EVENT: u16 = 0x13;
const KIND_OBJECT_ACTION: u16 = 0x14;

const RANDOM_TOKEN_PREFIX: &str = "RANDOM_";

/// Named string values consulted by select actions.
#[derive(Debug, Default, Clone)]
pub struct VariableTable {
    values: FxHashMap<String, String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self { values: FxHashMap::default() }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Everything a deserialisation pass needs besides the bytes.
pub struct DeserializeContext<'a> {
    pub variables: &'a VariableTable,
    pub rng: &'a mut dyn RngCore,
}

/// Parse one action tree from `data`.
pub fn deserialize_action(data: &[u8], ctx: &mut DeserializeContext<'_>) -> Result<Action> {
    let mut cursor = Cursor { data, offset: 0 };
    read_action(&mut cursor, ctx)
}

/// Serialise one action tree, appending to `out`.
pub fn serialize_action(action: &Action, out: &mut Vec<u8>) {
    let tag = match &action.payload {
        ActionPayload::Leaf => KIND_LEAF,
        ActionPayload::Multi { kind, .. } => match kind {
            MultiKind::Parallel => KIND_PARALLEL,
            MultiKind::Serial => KIND_SERIAL,
            MultiKind::Select { .. } => KIND_SELECT,
        },
        ActionPayload::Media { kind, .. } => match kind {
            MediaKind::Anim => KIND_ANIM,
            MediaKind::Still => KIND_STILL,
            MediaKind::Sound => KIND_SOUND,
            MediaKind::Event => KIND_EVENT,
            MediaKind::ObjectAction => KIND_OBJECT_ACTION,
        },
    };
    out.extend_from_slice(&tag.to_le_bytes());

    write_core(action, out);

    match &action.payload {
        ActionPayload::Leaf => {}
        ActionPayload::Multi { kind, children } => {
            if let MultiKind::Select { variable, choices } = kind {
                write_string(variable, out);
                out.extend_from_slice(&(choices.len() as u16).to_le_bytes());
                for choice in choices {
                    write_string(choice, out);
                }
            }
            out.extend_from_slice(&(children.len() as u16).to_le_bytes());
            for child in children {
                serialize_action(child, out);
            }
        }
        ActionPayload::Media { info, .. } => {
            write_string(&info.media_src_path, out);
            out.extend_from_slice(&info.frame_rate.to_le_bytes());
            out.extend_from_slice(&info.media_format.to_le_bytes());
            out.extend_from_slice(&info.palette_mode.to_le_bytes());
            out.extend_from_slice(&info.sustain_time.to_le_bytes());
        }
    }
}

fn read_action(cursor: &mut Cursor<'_>, ctx: &mut DeserializeContext<'_>) -> Result<Action> {
    let tag = cursor.read_u16()?;
    let core = read_core(cursor)?;

    let payload = match tag {
        KIND_LEAF => ActionPayload::Leaf,
        KIND_PARALLEL => ActionPayload::Multi {
            kind: MultiKind::Parallel,
            children: read_children(cursor, ctx)?,
        },
        KIND_SERIAL => ActionPayload::Multi {
            kind: MultiKind::Serial,
            children: read_children(cursor, ctx)?,
        },
        KIND_SELECT => {
            let variable = read_string(cursor)?;
            let choice_count = cursor.read_u16()? as usize;
            let mut choices = Vec::with_capacity(choice_count);
            for _ in 0..choice_count {
                choices.push(read_string(cursor)?);
            }

            // All children must be parsed to advance the cursor; only the
            // selected one survives
            let children = read_children(cursor, ctx)?;
            let selected = select_child_index(&variable, &choices, children.len(), ctx);
            let children = match selected {
                Some(index) => {
                    let mut children = children;
                    vec![children.swap_remove(index)]
                }
                None => {
                    engine_warn!("vista3d::ActionDeserialize",
                        "select action '{}' matched no choice, keeping none", variable);
                    Vec::new()
                }
            };
            ActionPayload::Multi { kind: MultiKind::Select { variable, choices }, children }
        }
        KIND_ANIM | KIND_STILL | KIND_SOUND | KIND_EVENT | KIND_OBJECT_ACTION => {
            let kind = match tag {
                KIND_ANIM => MediaKind::Anim,
                KIND_STILL => MediaKind::Still,
                KIND_SOUND => MediaKind::Sound,
                KIND_EVENT => MediaKind::Event,
                _ => MediaKind::ObjectAction,
            };
            let info = MediaInfo {
                media_src_path: read_string(cursor)?,
                frame_rate: cursor.read_u32()?,
                media_format: cursor.read_u32()?,
                palette_mode: cursor.read_u32()?,
                sustain_time: cursor.read_i32()?,
            };
            ActionPayload::Media { kind, info }
        }
        unknown => {
            return Err(engine_err!(InvalidParameters, "vista3d::ActionDeserialize",
                "unknown action kind tag 0x{:04x}", unknown));
        }
    };

    Ok(Action { core, payload })
}

/// Resolve which child a select keeps: a uniformly random index for
/// `RANDOM_n` tokens, otherwise the choice matching the variable's value.
fn select_child_index(
    variable: &str,
    choices: &[String],
    child_count: usize,
    ctx: &mut DeserializeContext<'_>,
) -> Option<usize> {
    if child_count == 0 {
        return None;
    }

    if let Some(range) = variable.strip_prefix(RANDOM_TOKEN_PREFIX) {
        if let Ok(n) = range.parse::<usize>() {
            if n > 0 {
                let index = ctx.rng.random_range(0..n.min(child_count));
                return Some(index);
            }
        }
        return None;
    }

    let value = ctx.variables.get(variable)?;
    choices
        .iter()
        .position(|choice| choice == value)
        .filter(|&index| index < child_count)
}

fn read_children(cursor: &mut Cursor<'_>, ctx: &mut DeserializeContext<'_>) -> Result<Vec<Action>> {
    let count = cursor.read_u16()? as usize;
    let mut children = Vec::with_capacity(count);
    for _ in 0..count {
        children.push(read_action(cursor, ctx)?);
    }
    Ok(children)
}

fn write_core(action: &Action, out: &mut Vec<u8>) {
    let core = &action.core;
    out.extend_from_slice(&core.object_id.to_le_bytes());
    out.extend_from_slice(&core.flags.bits().to_le_bytes());
    out.extend_from_slice(&core.start_time.to_le_bytes());
    out.extend_from_slice(&core.duration.to_le_bytes());
    out.extend_from_slice(&core.loop_count.to_le_bytes());
    for vector in [core.location, core.direction, core.up] {
        out.extend_from_slice(&vector.x.to_le_bytes());
        out.extend_from_slice(&vector.y.to_le_bytes());
        out.extend_from_slice(&vector.z.to_le_bytes());
    }
    out.extend_from_slice(&(core.extra.len() as u16).to_le_bytes());
    out.extend_from_slice(&core.extra);
}

fn read_core(cursor: &mut Cursor<'_>) -> Result<super::action::ActionCore> {
    let mut core = super::action::ActionCore {
        object_id: cursor.read_u32()?,
        flags: ActionFlags::from_bits_truncate(cursor.read_u32()?),
        start_time: cursor.read_i32()?,
        duration: cursor.read_i32()?,
        loop_count: cursor.read_i32()?,
        ..Default::default()
    };
    core.location = read_vec3(cursor)?;
    core.direction = read_vec3(cursor)?;
    core.up = read_vec3(cursor)?;
    let extra_len = cursor.read_u16()? as usize;
    core.extra = cursor.read_bytes(extra_len)?.to_vec();
    Ok(core)
}

fn read_vec3(cursor: &mut Cursor<'_>) -> Result<Vec3> {
    Ok(Vec3::new(cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?))
}

fn write_string(value: &str, out: &mut Vec<u8>) {
    out.extend_from_slice(&(value.len() as u16).to_le_bytes());
    out.extend_from_slice(value.as_bytes());
}

fn read_string(cursor: &mut Cursor<'_>) -> Result<String> {
    let len = cursor.read_u16()? as usize;
    let bytes = cursor.read_bytes(len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| {
        engine_err!(InvalidParameters, "vista3d::ActionDeserialize", "string is not valid utf-8")
    })
}

// Minimal little-endian reader over a byte slice
struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.offset + len > self.data.len() {
            return Err(engine_err!(InvalidParameters, "vista3d::ActionDeserialize",
                "truncated action record: wanted {} bytes at offset {}", len, self.offset));
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }
}

#[cfg(test)]
#[path = "deserialize_tests.rs"]
mod tests;
