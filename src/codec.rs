//! Image decode/encode boundary.
//!
//! Pixels cross this boundary as `(height, width, 3)` RGB arrays. The input
//! format is sniffed from the file contents, so a PNG saved as `.jpg` still
//! decodes. Whatever color type a file carries is converted to RGB8 on
//! decode; the output format is picked from the destination file extension
//! on encode.

use std::path::Path;

use image::{ImageError, ImageReader, RgbImage};
use ndarray::{Array3, ArrayView3};

use crate::error::CodecError;

/// Reads and writes RGB images.
pub trait Codec: Send + Sync {
    fn decode(&self, path: &Path) -> Result<Array3<u8>, CodecError>;

    fn encode(&self, image: ArrayView3<u8>, path: &Path) -> Result<(), CodecError>;
}

/// [`Codec`] backed by the `image` crate (PNG, JPEG, BMP).
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn decode(&self, path: &Path) -> Result<Array3<u8>, CodecError> {
        let decoded = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(ImageError::IoError)
            .and_then(|reader| reader.decode())
            .map_err(|source| CodecError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        rgb_to_array(decoded.into_rgb8())
    }

    fn encode(&self, image: ArrayView3<u8>, path: &Path) -> Result<(), CodecError> {
        array_to_rgb(image)?
            .save(path)
            .map_err(|source| CodecError::Encode {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Convert an RGB image buffer into a `(height, width, 3)` array.
pub fn rgb_to_array(image: RgbImage) -> Result<Array3<u8>, CodecError> {
    let (width, height) = image.dimensions();
    Array3::from_shape_vec((height as usize, width as usize, 3), image.into_raw())
        .map_err(|e| CodecError::Buffer(e.to_string()))
}

/// Convert a `(height, width, 3)` array into an RGB image buffer.
pub fn array_to_rgb(image: ArrayView3<u8>) -> Result<RgbImage, CodecError> {
    let (height, width, channels) = image.dim();
    if channels != 3 {
        return Err(CodecError::Buffer(format!(
            "expected 3 channels, got {channels}"
        )));
    }

    // iter() walks in logical (row-major) order regardless of memory layout
    let raw: Vec<u8> = image.iter().copied().collect();
    RgbImage::from_raw(width as u32, height as u32, raw)
        .ok_or_else(|| CodecError::Buffer(format!("buffer does not fit {width}x{height}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use ndarray::s;

    #[test]
    fn test_rgb_to_array_layout() {
        let img = RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 200]));
        let arr = rgb_to_array(img).unwrap();

        assert_eq!(arr.dim(), (2, 3, 3));
        assert_eq!(arr[[1, 2, 0]], 2);
        assert_eq!(arr[[1, 2, 1]], 1);
        assert_eq!(arr[[0, 0, 2]], 200);
    }

    #[test]
    fn test_array_to_rgb_from_strided_view() {
        let arr = Array3::from_shape_fn((2, 6, 3), |(y, x, c)| (y * 60 + x * 10 + c) as u8);
        let view = arr.slice(s![.., 2..5, ..]);

        let img = array_to_rgb(view).unwrap();

        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 1).0, [80, 81, 82]);
    }

    #[test]
    fn test_array_to_rgb_rejects_rgba() {
        let arr = Array3::<u8>::zeros((1, 1, 4));
        assert!(matches!(array_to_rgb(arr.view()), Err(CodecError::Buffer(_))));
    }

    #[test]
    fn test_png_disk_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strip.png");
        let arr = Array3::from_shape_fn((4, 5, 3), |(y, x, c)| (y * 50 + x * 7 + c) as u8);

        ImageCodec.encode(arr.view(), &path).unwrap();
        let back = ImageCodec.decode(&path).unwrap();

        assert_eq!(back, arr);
    }

    #[test]
    fn test_decode_sniffs_format_from_contents() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("real.png");
        let arr = Array3::from_shape_fn((3, 4, 3), |(y, x, c)| (y * 60 + x * 9 + c) as u8);
        ImageCodec.encode(arr.view(), &png_path).unwrap();

        let misnamed = dir.path().join("photo.jpg");
        std::fs::copy(&png_path, &misnamed).unwrap();

        assert_eq!(ImageCodec.decode(&misnamed).unwrap(), arr);
    }

    #[test]
    fn test_decode_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.png");

        assert!(matches!(ImageCodec.decode(&path), Err(CodecError::Decode { .. })));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(matches!(ImageCodec.decode(&path), Err(CodecError::Decode { .. })));
    }
}
