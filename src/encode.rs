//! Upload validation and JPEG/base64 encoding of images.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

/// Quality used when re-encoding uploads as JPEG.
pub const JPEG_QUALITY: u8 = 85;

/// Image encodings accepted from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Jpeg,
    Png,
}

impl UploadFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            UploadFormat::Jpeg => "image/jpeg",
            UploadFormat::Png => "image/png",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            UploadFormat::Jpeg => ImageFormat::Jpeg,
            UploadFormat::Png => ImageFormat::Png,
        }
    }
}

/// Errors raised while validating or encoding an image.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Image is empty")]
    Empty,

    #[error("Unsupported image format: {0} (expected JPEG or PNG)")]
    UnsupportedFormat(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image as JPEG: {0}")]
    Encode(String),

    #[error("Invalid base64 image data: {0}")]
    Base64(String),
}

/// Identify the upload format from its magic bytes.
pub fn detect_format(bytes: &[u8]) -> Result<UploadFormat, EncodeError> {
    if bytes.is_empty() {
        return Err(EncodeError::Empty);
    }
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => Ok(UploadFormat::Jpeg),
        Ok(ImageFormat::Png) => Ok(UploadFormat::Png),
        Ok(other) => Err(EncodeError::UnsupportedFormat(format!("{:?}", other))),
        Err(_) => Err(EncodeError::UnsupportedFormat("unrecognized".to_string())),
    }
}

/// Validate a JPEG/PNG upload, flatten it to RGB, re-encode it as JPEG,
/// and return the base64 text for an `inline_data` part.
pub fn encode_jpeg_base64(bytes: &[u8]) -> Result<String, EncodeError> {
    let format = detect_format(bytes)?;
    let img = image::load_from_memory_with_format(bytes, format.image_format())
        .map_err(|e| EncodeError::Decode(e.to_string()))?;

    let rgb = img.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| EncodeError::Encode(e.to_string()))?;

    tracing::debug!(
        source = format.mime_type(),
        width = rgb.width(),
        height = rgb.height(),
        jpeg_bytes = jpeg.len(),
        "Encoded image for upload"
    );

    Ok(STANDARD.encode(&jpeg))
}

/// Decode a base64 image payload back into a raster image.
pub fn decode_base64_image(data: &str) -> Result<DynamicImage, EncodeError> {
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| EncodeError::Base64(e.to_string()))?;
    image::load_from_memory(&bytes).map_err(|e| EncodeError::Decode(e.to_string()))
}

/// Render raw upload bytes as a `data:` URL for inline preview.
pub fn data_url(bytes: &[u8], format: UploadFormat) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x * 7) as u8, (y * 11) as u8, 128, if x % 2 == 0 { 255 } else { 80 }])
        });
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]));
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, 90)
            .encode_image(&img)
            .unwrap();
        buf
    }

    #[test]
    fn png_round_trip_keeps_dimensions() {
        let encoded = encode_jpeg_base64(&png_bytes(37, 21)).unwrap();
        let decoded = decode_base64_image(&encoded).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (37, 21));
    }

    #[test]
    fn jpeg_round_trip_keeps_dimensions() {
        let encoded = encode_jpeg_base64(&jpeg_bytes(64, 48)).unwrap();
        let decoded = decode_base64_image(&encoded).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn output_is_jpeg() {
        let encoded = encode_jpeg_base64(&png_bytes(8, 8)).unwrap();
        let bytes = STANDARD.decode(encoded).unwrap();
        assert_eq!(detect_format(&bytes).unwrap(), UploadFormat::Jpeg);
    }

    #[test]
    fn detects_accepted_formats() {
        assert_eq!(detect_format(&png_bytes(2, 2)).unwrap(), UploadFormat::Png);
        assert_eq!(detect_format(&jpeg_bytes(2, 2)).unwrap(), UploadFormat::Jpeg);
    }

    #[test]
    fn rejects_other_formats() {
        assert!(matches!(
            detect_format(b"GIF89a\x01\x00\x01\x00\x00\x00\x00"),
            Err(EncodeError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            encode_jpeg_base64(b"definitely not an image"),
            Err(EncodeError::UnsupportedFormat(_))
        ));
        assert!(matches!(encode_jpeg_base64(b""), Err(EncodeError::Empty)));
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let mut bytes = png_bytes(16, 16);
        bytes.truncate(20);
        assert!(matches!(
            encode_jpeg_base64(&bytes),
            Err(EncodeError::Decode(_))
        ));
    }

    #[test]
    fn bad_base64_is_reported() {
        assert!(matches!(
            decode_base64_image("***"),
            Err(EncodeError::Base64(_))
        ));
    }

    #[test]
    fn data_url_carries_mime_type() {
        let url = data_url(b"abc", UploadFormat::Png);
        assert_eq!(url, "data:image/png;base64,YWJj");
    }
}
