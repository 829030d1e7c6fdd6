/// Mesh appearance descriptor.
///
/// One drawable sub-mesh's rendering attributes as stored in model
/// data: color and transparency, shading mode, texture mapping, the
/// optional texture reference and the index of the sub-mesh group
/// inside the lower-level mesh object it belongs to. Blob layout is
/// little-endian: group index, texturised flag, RGB color, alpha,
/// shading byte, mapping byte, then the texture and material names.

use std::sync::Arc;

use crate::engine_err;
use crate::error::Result;
use crate::renderer::{ShadingModel, Texture, TextureMappingMode};

#[derive(Clone)]
pub struct Mesh {
    /// Sub-mesh group index inside the owning mesh object
    group_index: u32,
    is_textured: bool,
    red: u8,
    green: u8,
    blue: u8,
    alpha: f32,
    shading: ShadingModel,
    mapping: TextureMappingMode,
    texture_name: Option<String>,
    material_name: Option<String>,
    texture: Option<Arc<dyn Texture>>,
}

impl Mesh {
    pub fn new(group_index: u32) -> Self {
        Self {
            group_index,
            is_textured: false,
            red: 255,
            green: 255,
            blue: 255,
            alpha: 1.0,
            shading: ShadingModel::Flat,
            mapping: TextureMappingMode::Linear,
            texture_name: None,
            material_name: None,
            texture: None,
        }
    }

    pub fn group_index(&self) -> u32 {
        self.group_index
    }

    pub fn is_textured(&self) -> bool {
        self.is_textured
    }

    pub fn color(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    pub fn set_color(&mut self, red: u8, green: u8, blue: u8) {
        self.red = red;
        self.green = green;
        self.blue = blue;
    }

    /// 0.0 = fully transparent, 1.0 = fully opaque.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn shading(&self) -> ShadingModel {
        self.shading
    }

    pub fn set_shading(&mut self, shading: ShadingModel) {
        self.shading = shading;
    }

    pub fn mapping(&self) -> TextureMappingMode {
        self.mapping
    }

    pub fn set_mapping(&mut self, mapping: TextureMappingMode) {
        self.mapping = mapping;
    }

    /// Lowercase texture resource name, if any.
    pub fn texture_name(&self) -> Option<&str> {
        self.texture_name.as_deref()
    }

    pub fn material_name(&self) -> Option<&str> {
        self.material_name.as_deref()
    }

    pub fn texture(&self) -> Option<&Arc<dyn Texture>> {
        self.texture.as_ref()
    }

    /// Attach or, with `None`, detach the resolved texture resource.
    pub fn set_texture(&mut self, texture: Option<Arc<dyn Texture>>) {
        self.is_textured = texture.is_some();
        self.texture = texture;
    }

    /// Parse a descriptor from its little-endian blob form.
    pub fn read_from(data: &[u8]) -> Result<Self> {
        const FIXED_LEN: usize = 4 + 1 + 3 + 4 + 1 + 1;
        if data.len() < FIXED_LEN {
            return Err(engine_err!(InvalidParameters, "vista3d::Mesh",
                "mesh descriptor needs at least {} bytes, got {}", FIXED_LEN, data.len()));
        }

        let group_index = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let is_textured = data[4] != 0;
        let (red, green, blue) = (data[5], data[6], data[7]);
        let alpha = f32::from_le_bytes([data[8], data[9], data[10], data[11]]);
        let shading = match data[12] {
            0 => ShadingModel::Flat,
            1 => ShadingModel::Gouraud,
            2 => ShadingModel::Wireframe,
            3 => ShadingModel::UnlitFlat,
            4 => ShadingModel::Phong,
            other => {
                return Err(engine_err!(InvalidParameters, "vista3d::Mesh",
                    "unknown shading byte {}", other));
            }
        };
        let mapping = if data[13] == 0 {
            TextureMappingMode::Linear
        } else {
            TextureMappingMode::PerspectiveCorrect
        };

        let (texture_name, rest) = read_name(&data[FIXED_LEN..])?;
        let (material_name, _) = read_name(rest)?;

        let mut mesh = Mesh::new(group_index);
        mesh.is_textured = is_textured;
        mesh.set_color(red, green, blue);
        mesh.set_alpha(alpha);
        mesh.shading = shading;
        mesh.mapping = mapping;
        mesh.texture_name = texture_name;
        mesh.material_name = material_name;
        Ok(mesh)
    }

    /// Serialise to the blob form read by [`Mesh::read_from`].
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.group_index.to_le_bytes());
        out.push(self.is_textured as u8);
        out.push(self.red);
        out.push(self.green);
        out.push(self.blue);
        out.extend_from_slice(&self.alpha.to_le_bytes());
        out.push(match self.shading {
            ShadingModel::Flat => 0,
            ShadingModel::Gouraud => 1,
            ShadingModel::Wireframe => 2,
            ShadingModel::UnlitFlat => 3,
            ShadingModel::Phong => 4,
        });
        out.push(match self.mapping {
            TextureMappingMode::Linear => 0,
            TextureMappingMode::PerspectiveCorrect => 1,
        });
        write_name(self.texture_name.as_deref(), out);
        write_name(self.material_name.as_deref(), out);
    }
}

fn write_name(name: Option<&str>, out: &mut Vec<u8>) {
    let name = name.unwrap_or("");
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(name.as_bytes());
}

fn read_name(data: &[u8]) -> Result<(Option<String>, &[u8])> {
    if data.len() < 2 {
        return Err(engine_err!(InvalidParameters, "vista3d::Mesh",
            "truncated name field"));
    }
    let len = u16::from_le_bytes([data[0], data[1]]) as usize;
    if data.len() < 2 + len {
        return Err(engine_err!(InvalidParameters, "vista3d::Mesh",
            "name of {} bytes overruns descriptor", len));
    }
    let bytes = &data[2..2 + len];
    let rest = &data[2 + len..];
    if len == 0 {
        return Ok((None, rest));
    }
    let name = std::str::from_utf8(bytes)
        .map_err(|_| engine_err!(InvalidParameters, "vista3d::Mesh", "name is not valid utf-8"))?;
    Ok((Some(name.to_ascii_lowercase()), rest))
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
