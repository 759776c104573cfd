//! PNG export of the color map and heightmap for offline inspection.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use vista_terrain::{ColorMap, Heightmap};

/// Errors produced while writing an image.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Encode an 8-bit PNG into `writer`.
fn encode_png<W: Write>(
    writer: W,
    width: u32,
    height: u32,
    color: png::ColorType,
    data: &[u8],
) -> Result<(), ExportError> {
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;
    writer.finish()?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })
}

/// Write the biome color map as an RGBA PNG, top row first.
pub fn write_color_map_png(path: &Path, colors: &ColorMap) -> Result<(), ExportError> {
    encode_png(
        create(path)?,
        colors.width(),
        colors.height(),
        png::ColorType::Rgba,
        colors.as_bytes(),
    )?;
    tracing::info!(path = %path.display(), "wrote color map");
    Ok(())
}

/// Map a normalized height to an 8-bit gray level.
pub fn height_to_gray(h: f32) -> u8 {
    (h.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Write the heightmap as an 8-bit grayscale PNG, black at 0 and white at 1.
pub fn write_heightmap_png(path: &Path, heightmap: &Heightmap) -> Result<(), ExportError> {
    let gray: Vec<u8> = heightmap.samples().iter().copied().map(height_to_gray).collect();
    encode_png(
        create(path)?,
        heightmap.width(),
        heightmap.height(),
        png::ColorType::Grayscale,
        &gray,
    )?;
    tracing::info!(path = %path.display(), "wrote heightmap");
    Ok(())
}
