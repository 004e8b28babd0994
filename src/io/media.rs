// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo loading.
//!
//! This module decodes photo files into RGBA pixels ready to be uploaded
//! as egui textures.

use anyhow::{Context, Result};
use std::path::Path;

/// A decoded photo.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

/// Decode an image file.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to open image {}", path.display()))?;
    load_image_bytes(&bytes).with_context(|| format!("Failed to decode image {}", path.display()))
}

/// Decode an image already in memory.
pub fn load_image_bytes(bytes: &[u8]) -> Result<LoadedImage> {
    let img = image::load_from_memory(bytes).context("Failed to decode image data")?;
    Ok(from_dynamic(img))
}

fn from_dynamic(img: image::DynamicImage) -> LoadedImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    }
}
