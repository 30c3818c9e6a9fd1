use crate::error::{Error, Result};
use image::ImageReader;
use ndarray::Array2;
use std::path::Path;

/// Number of channels after conversion to RGBA.
pub const CHANNELS: usize = 4;

/// Decode an image and return one of its RGBA channels as `rows x cols` intensities.
///
/// Grayscale images expand to equal R, G and B channels, so channel 0 is the
/// luma for them.
pub fn load_intensity(path: &Path, channel: usize) -> Result<Array2<f64>> {
    if channel >= CHANNELS {
        return Err(Error::InvalidInput {
            path: path.to_path_buf(),
            reason: format!("channel {channel} is not one of the {CHANNELS} RGBA channels"),
        });
    }

    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|source| Error::InvalidInput {
            path: path.to_path_buf(),
            reason: source.to_string(),
        })?
        .decode()
        .map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();

    let (width, height) = image.dimensions();
    log::debug!("decoded {path:?} as {width}x{height}");

    let intensities: Vec<f64> = image
        .pixels()
        .map(|pixel| f64::from(pixel.0[channel]))
        .collect();

    Ok(Array2::from_shape_vec((height as usize, width as usize), intensities)
        .expect("one intensity per pixel"))
}
