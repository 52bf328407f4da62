//! Deck loading: manifest.json plus one JSON document per slide.
//!
//! Directory layout:
//! slides/
//!   manifest.json      { "slides": ["01-intro.json", "02-chart.json"] }
//!   01-intro.json
//!   02-chart.json
//!
//! Only slides listed in the manifest are loaded, in manifest order. Each
//! slide is validated (fail closed) and then sanitized. A slide that fails
//! is logged and recorded in `Deck::skipped`; it never aborts the deck.

use crate::Result;
use crate::sanitize::SanitizedSlide;
use crate::validate::Validator;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path};
use tracing::{debug, error, info, warn};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub slides: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Deck {
    pub slides: Vec<LoadedSlide>,
    pub skipped: Vec<SkippedSlide>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadedSlide {
    pub file: String,
    pub slide: SanitizedSlide,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSlide {
    pub file: String,
    pub reason: String,
}

/// Read `dir/manifest.json`. A missing manifest is not an error.
pub fn load_manifest(dir: &Path) -> Result<Option<Manifest>> {
    let path = dir.join(MANIFEST_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "no manifest found");
            return Ok(None);
        }
        Err(err) => {
            return Err(err).with_context(|| format!("read manifest {}", path.display()));
        }
    };

    let manifest: Manifest = serde_json::from_str(&text)
        .with_context(|| format!("parse manifest {}", path.display()))?;
    info!(slides = manifest.slides.len(), "manifest loaded");
    Ok(Some(manifest))
}

/// Load one slide: read, parse, validate, sanitize.
pub fn load_slide(dir: &Path, file: &str, validator: &Validator) -> Result<SanitizedSlide> {
    check_file_name(file)?;

    let path = dir.join(file);
    let text = fs::read_to_string(&path)
        .with_context(|| format!("read slide file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parse slide file {}", path.display()))?;

    let slide = validator
        .validate_and_sanitize(&value)
        .with_context(|| format!("validate slide file {}", path.display()))?;
    debug!(file, id = slide.id.as_deref().unwrap_or(""), "slide loaded");
    Ok(slide)
}

/// Load every slide listed in the manifest, skipping the ones that fail.
pub fn load_deck(dir: &Path, validator: &Validator) -> Result<Deck> {
    let manifest = load_manifest(dir)?.unwrap_or_default();

    if manifest.slides.is_empty() {
        warn!(dir = %dir.display(), "no slides listed in manifest");
    }

    let mut deck = Deck::default();
    for file in &manifest.slides {
        match load_slide(dir, file, validator) {
            Ok(slide) => deck.slides.push(LoadedSlide {
                file: file.clone(),
                slide,
            }),
            Err(err) => {
                error!(file = %file, "skipping invalid slide: {:#}", err);
                deck.skipped.push(SkippedSlide {
                    file: file.clone(),
                    reason: format!("{:#}", err),
                });
            }
        }
    }

    info!(
        loaded = deck.slides.len(),
        skipped = deck.skipped.len(),
        "deck loaded"
    );
    Ok(deck)
}

/// Manifest entries are bare file names inside the deck directory.
fn check_file_name(file: &str) -> Result<()> {
    let mut components = Path::new(file).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => bail!("manifest entry must be a plain file name: {:?}", file),
    }
}
