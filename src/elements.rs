//! Image loading for hero thumbnails.
//!
//! Image references are either `http(s)` URLs or local file paths.  Decoding is delegated to the
//! [`image`] crate so the PDF backend only ever sees a [`DynamicImage`].

use std::path::Path;
use std::time::Duration;

use image::{DynamicImage, GenericImageView};
use reqwest::blocking::Client;
use thiserror::Error;

const MM_PER_INCH: f64 = 25.4;
const IMAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors produced while resolving an image reference.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("image reference is empty")]
    EmptyReference,

    #[error("failed to download image {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("image {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to open image file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {reference}: {source}")]
    Decode {
        reference: String,
        #[source]
        source: image::ImageError,
    },
}

/// Turns an image reference into decoded pixels.
pub trait ImageResolver {
    fn resolve(&self, reference: &str) -> Result<DynamicImage, ImageLoadError>;
}

/// Loads an image from in-memory bytes using the [`image`] crate with descriptive errors.
pub fn decode_image_from_bytes(
    reference: &str,
    bytes: impl AsRef<[u8]>,
) -> Result<DynamicImage, ImageLoadError> {
    image::load_from_memory(bytes.as_ref()).map_err(|source| ImageLoadError::Decode {
        reference: reference.to_string(),
        source,
    })
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<DynamicImage, ImageLoadError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let reader = image::io::Reader::open(path).map_err(|source| ImageLoadError::Io {
        path: display.clone(),
        source,
    })?;
    reader
        .with_guessed_format()
        .map_err(|source| ImageLoadError::Io {
            path: display.clone(),
            source,
        })?
        .decode()
        .map_err(|source| ImageLoadError::Decode {
            reference: display,
            source,
        })
}

/// Returns the natural size of `image` in millimetres when printed at `dpi`.
pub fn natural_size_mm(image: &DynamicImage, dpi: f64) -> (f64, f64) {
    let (px_width, px_height) = image.dimensions();
    (
        MM_PER_INCH * f64::from(px_width) / dpi,
        MM_PER_INCH * f64::from(px_height) / dpi,
    )
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Resolves URLs over HTTP and everything else from the filesystem.
pub struct DefaultImageResolver {
    http: Client,
}

impl DefaultImageResolver {
    /// Creates a resolver with its own blocking HTTP client.
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(IMAGE_TIMEOUT).build()?;
        Ok(Self { http })
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, ImageLoadError> {
        let to_error = |source| ImageLoadError::Download {
            url: url.to_string(),
            source,
        };
        let response = self.http.get(url).send().map_err(to_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageLoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().map_err(to_error)?;
        Ok(bytes.to_vec())
    }
}

impl ImageResolver for DefaultImageResolver {
    fn resolve(&self, reference: &str) -> Result<DynamicImage, ImageLoadError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ImageLoadError::EmptyReference);
        }

        if is_remote(reference) {
            let bytes = self.download(reference)?;
            decode_image_from_bytes(reference, bytes)
        } else {
            decode_image_from_path(reference)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgb, RgbImage};

    fn png_bytes() -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 4, Rgb([200, 30, 30])));
        let mut bytes = Vec::new();
        image
            .write_to(&mut bytes, ImageOutputFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn decodes_png_bytes() {
        let image = decode_image_from_bytes("inline", png_bytes()).expect("decodes");
        assert_eq!(image.dimensions(), (3, 4));
    }

    #[test]
    fn loads_image_from_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("hero.png");
        std::fs::write(&path, png_bytes()).expect("write png");

        let resolver = DefaultImageResolver::new().expect("resolver");
        let image = resolver
            .resolve(path.to_str().expect("utf-8 path"))
            .expect("resolves");
        assert_eq!(image.dimensions(), (3, 4));
    }

    #[test]
    fn missing_file_is_reported() {
        let resolver = DefaultImageResolver::new().expect("resolver");
        let err = resolver
            .resolve("/__superhero_pdf_missing__/hero.png")
            .unwrap_err();
        assert!(matches!(err, ImageLoadError::Io { .. }));
    }

    #[test]
    fn empty_reference_is_rejected() {
        let resolver = DefaultImageResolver::new().expect("resolver");
        assert!(matches!(
            resolver.resolve("  "),
            Err(ImageLoadError::EmptyReference)
        ));
    }

    #[test]
    fn natural_size_follows_dpi() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(300, 600));
        let (width, height) = natural_size_mm(&image, 300.0);
        assert!((width - 25.4).abs() < 1e-9);
        assert!((height - 50.8).abs() < 1e-9);
    }
}
