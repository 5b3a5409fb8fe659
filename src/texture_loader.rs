use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, anyhow};
use exif::{In, Reader, Tag, Value};
use raylib::prelude::*;

use crate::catalog::Catalog;

/// Loads every catalog image as a texture, keeping slots aligned with the
/// catalog indices. A file that is missing or fails to decode leaves a `None`
/// behind and a warning on stderr; the engines simply skip those cards.
pub fn load_catalog_textures(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    catalog: &Catalog,
) -> Vec<Option<Texture2D>> {
    catalog
        .paths()
        .iter()
        .map(|path| match load_texture_with_exif_rotation(rl, thread, path) {
            Ok(texture) => Some(texture),
            Err(e) => {
                eprintln!("Warning: skipping {}: {e:#}", path.display());
                None
            }
        })
        .collect()
}

/// Loads an image, applies its EXIF orientation (JPEG only), and uploads it
/// as a texture.
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> anyhow::Result<Texture2D> {
    let file_bytes = fs::read(image_path)
        .with_context(|| format!("failed to read {}", image_path.display()))?;

    let mut orientation = 1; // Default: no rotation

    // EXIF orientation only reliably exists in JPEG containers.
    let extension = image_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension == "jpg" || extension == "jpeg" {
        match Reader::new().read_from_container(&mut Cursor::new(&file_bytes)) {
            Ok(exif) => {
                if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                    if let Value::Short(values) = &field.value {
                        if let Some(&value) = values.first() {
                            orientation = value;
                        }
                    }
                }
            }
            Err(e) => {
                // Non-critical: proceed without rotation.
                eprintln!(
                    "Warning: could not read EXIF data for {}: {}",
                    image_path.display(),
                    e
                );
            }
        }
    }

    let mut image = Image::load_image_from_mem(&(".".to_string() + &extension), &file_bytes)
        .map_err(|e| anyhow!("failed to decode {}: {}", image_path.display(), e))?;

    // 1 = normal, 3 = 180deg, 6 = 90deg CW, 8 = 90deg CCW. Mirrored
    // orientations are ignored.
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => {
            image.rotate_cw();
        }
        8 => {
            image.rotate_ccw();
        }
        _ => {}
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow!("failed to create texture for {}: {}", image_path.display(), e))?;

    Ok(texture)
}
