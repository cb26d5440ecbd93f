use crate::ResourceKind;
use crate::error::{ImageSizeSnafu, InvalidFormatSnafu, ValidationError, ZeroSizeSnafu};
use crate::store::StoreType;
use snafu::ensure;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    GreyScale8,
    Rgb24,
    Rgba32,
    Invalid,
}

impl ColorFormat {
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            ColorFormat::GreyScale8 => 1,
            ColorFormat::Rgb24 => 3,
            ColorFormat::Rgba32 => 4,
            ColorFormat::Invalid => 0,
        }
    }

    pub fn from_name(name: &str) -> ColorFormat {
        match name.trim().to_ascii_lowercase().as_str() {
            "grey" | "gray" | "greyscale8" | "r8" => ColorFormat::GreyScale8,
            "rgb" | "rgb24" => ColorFormat::Rgb24,
            "rgba" | "rgba32" => ColorFormat::Rgba32,
            _ => ColorFormat::Invalid,
        }
    }
}

/// Raw pixel payload, rows top to bottom, channels tightly packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: ColorFormat,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32, format: ColorFormat) -> Self {
        Self {
            bytes,
            width,
            height,
            format,
        }
    }

    /// A `width` x `height` image with every pixel set to `pixel`.
    pub fn filled(width: u32, height: u32, pixel: &[u8], format: ColorFormat) -> Self {
        debug_assert_eq!(pixel.len(), format.channels());

        let bytes = pixel.repeat(width as usize * height as usize);
        Self::new(bytes, width, height, format)
    }

    #[inline]
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.channels()
    }

    /// The pixel data widened to four channels, as most GPU formats expect.
    pub fn to_rgba(&self) -> Vec<u8> {
        match self.format {
            ColorFormat::Rgba32 | ColorFormat::Invalid => self.bytes.clone(),
            ColorFormat::Rgb24 => self
                .bytes
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], u8::MAX])
                .collect(),
            ColorFormat::GreyScale8 => self
                .bytes
                .iter()
                .flat_map(|v| [*v, *v, *v, u8::MAX])
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure!(
            self.format != ColorFormat::Invalid,
            InvalidFormatSnafu {
                format: self.format
            }
        );
        ensure!(
            self.width > 0 && self.height > 0,
            ZeroSizeSnafu {
                width: self.width,
                height: self.height
            }
        );
        ensure!(
            self.bytes.len() == self.expected_len(),
            ImageSizeSnafu {
                expected: self.expected_len(),
                actual: self.bytes.len()
            }
        );
        Ok(())
    }
}

impl StoreType for ImageData {
    const KIND: ResourceKind = ResourceKind::Image;

    fn validate(&self) -> Result<(), ValidationError> {
        ImageData::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_length_must_match_format() {
        let image = ImageData::new(vec![0; 4 * 4 * 3], 4, 4, ColorFormat::Rgb24);
        assert_eq!(image.validate(), Ok(()));

        let image = ImageData::new(Vec::new(), 4, 4, ColorFormat::Rgb24);
        assert_eq!(
            image.validate(),
            Err(ValidationError::ImageSize {
                expected: 48,
                actual: 0
            })
        );
    }

    #[test]
    fn invalid_format_is_rejected() {
        let image = ImageData::new(Vec::new(), 0, 0, ColorFormat::Invalid);
        assert!(matches!(
            image.validate(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn widens_to_rgba() {
        let grey = ImageData::new(vec![7, 9], 2, 1, ColorFormat::GreyScale8);
        assert_eq!(grey.to_rgba(), vec![7, 7, 7, 255, 9, 9, 9, 255]);

        let rgb = ImageData::filled(1, 2, &[1, 2, 3], ColorFormat::Rgb24);
        assert_eq!(rgb.to_rgba(), vec![1, 2, 3, 255, 1, 2, 3, 255]);
    }
}
