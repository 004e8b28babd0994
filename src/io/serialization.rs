// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo set import.
//!
//! A photo set lists the photos of a job (and optionally annotations already
//! made on them) in YAML or JSON. Loading it seeds the photo collection.

use crate::models::photo::{Photo, PhotoCollection};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// On-disk layout of a photo set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSet {
    pub photos: Vec<Photo>,
}

impl PhotoSet {
    /// Validate and turn into a collection.
    ///
    /// Relative photo sources are resolved against `base_dir`.
    pub fn into_collection(self, base_dir: Option<&Path>) -> Result<PhotoCollection> {
        let mut seen = HashSet::new();
        let mut photos = Vec::with_capacity(self.photos.len());
        for entry in self.photos {
            if !seen.insert(entry.id.clone()) {
                bail!("Duplicate photo id {:?}", entry.id);
            }
            let source = match base_dir {
                Some(dir) if Path::new(&entry.source).is_relative() => {
                    dir.join(&entry.source).to_string_lossy().to_string()
                }
                _ => entry.source.clone(),
            };
            let mut photo = Photo::new(entry.id, source, entry.label);
            let rejected = photo.seed_annotations(entry.annotations);
            if rejected > 0 {
                log::warn!("Photo {}: dropped {} invalid annotations", photo.id, rejected);
            }
            photos.push(photo);
        }
        Ok(PhotoCollection::new(photos))
    }
}

/// Parse a photo set from YAML text.
pub fn parse_yaml(text: &str) -> Result<PhotoSet> {
    Ok(serde_yaml::from_str(text)?)
}

/// Parse a photo set from JSON text.
pub fn parse_json(text: &str) -> Result<PhotoSet> {
    Ok(serde_json::from_str(text)?)
}

/// Load a photo set file, picking the format from its extension.
pub fn import_photo_set(path: &Path) -> Result<PhotoCollection> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read photo set {}", path.display()))?;
    let extension = path.extension().and_then(|s| s.to_str());
    let set = match extension {
        Some("yaml") | Some("yml") => parse_yaml(&text),
        Some("json") => parse_json(&text),
        _ => bail!("Unsupported file extension: {:?}", extension),
    }
    .with_context(|| format!("Failed to parse photo set {}", path.display()))?;

    let collection = set.into_collection(path.parent())?;
    log::info!("Imported {} photos from {}", collection.len(), path.display());
    Ok(collection)
}

/// Render a photo as pretty JSON (used by the default save hook).
pub fn photo_to_json(photo: &Photo) -> Result<String> {
    Ok(serde_json::to_string_pretty(photo)?)
}
