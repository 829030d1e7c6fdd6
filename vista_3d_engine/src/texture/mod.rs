//! Palette image and named texture descriptors.

pub mod image;

pub use image::{Image, NamedTexture, Palette, PaletteEntry};
