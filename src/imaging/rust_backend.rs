//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF) | `image` crate (pure Rust decoders) |
//! | Orientation | EXIF orientation via `ImageDecoder::orientation` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode | format from output extension; JPEG at configured quality |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::fit_within;
use super::params::FitParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> BackendError {
    BackendError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Load an image from disk and rotate/flip it upright according to its
/// embedded EXIF orientation.
fn load_upright(path: &Path) -> Result<DynamicImage, BackendError> {
    let reader = ImageReader::open(path)
        .map_err(|source| BackendError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .with_guessed_format()
        .map_err(|source| BackendError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let mut decoder = reader.into_decoder().map_err(|e| decode_error(path, e))?;
    let orientation = decoder.orientation().map_err(|e| decode_error(path, e))?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Scale `img` to fit the params' box and write it out.
fn write_fitted(img: &DynamicImage, params: &FitParams) -> Result<Dimensions, BackendError> {
    let (w, h) = fit_within(
        (img.width(), img.height()),
        (params.max_width, params.max_height),
    );
    let resized;
    let out = if (w, h) == (img.width(), img.height()) {
        img
    } else {
        resized = img.resize_exact(w, h, FilterType::Lanczos3);
        &resized
    };
    save_image(out, &params.output, params.quality.value())?;
    Ok(Dimensions::new(w, h))
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let encode_error = |message: String| BackendError::Encode {
        path: path.to_path_buf(),
        message,
    };
    let format = ImageFormat::from_path(path).map_err(|e| encode_error(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path).map_err(|source| BackendError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let writer = std::io::BufWriter::new(file);
            let encoder = JpegEncoder::new_with_quality(writer, quality.clamp(1, 100) as u8);
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(encoder)
                .map_err(|e| encode_error(e.to_string()))
        }
        ImageFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8())
            .save_with_format(path, format)
            .map_err(|e| encode_error(e.to_string())),
        other => img
            .save_with_format(path, other)
            .map_err(|e| encode_error(e.to_string())),
    }
}

impl ImageBackend for RustBackend {
    fn fit(&self, params: &FitParams) -> Result<Dimensions, BackendError> {
        let img = load_upright(&params.source)?;
        write_fitted(&img, params)
    }

    fn fit_all(&self, params: &[FitParams]) -> Result<Vec<Dimensions>, BackendError> {
        let mut results = Vec::with_capacity(params.len());
        let mut loaded: Option<(&Path, DynamicImage)> = None;
        for p in params {
            let reuse = matches!(&loaded, Some((src, _)) if *src == p.source.as_path());
            if !reuse {
                loaded = Some((p.source.as_path(), load_upright(&p.source)?));
            }
            if let Some((_, img)) = &loaded {
                results.push(write_fitted(img, p)?);
            }
        }
        Ok(results)
    }
}
