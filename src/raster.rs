//! In-memory raster images.
//!
//! [`RasterImage`] is the unit of work shared by every analysis stage. It wraps
//! either an 8-bit grayscale or an 8-bit RGB buffer and guarantees a non-zero
//! area, so downstream arithmetic (means, ratios, variances) is always defined.
//! Images are immutable once built: every transformation returns a new image.

use std::borrow::Cow;
use std::path::Path;

use image::{DynamicImage, GrayImage, Luma, RgbImage};

use crate::error::{Error, Result};

/// Number of interleaved channels in a raster buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// Single intensity channel
    Gray,
    /// Red, green, blue
    Rgb,
}

impl Channels {
    /// Bytes per pixel for this layout.
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
        }
    }
}

/// Pixel storage behind a [`RasterImage`].
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    /// 8-bit grayscale
    Gray(GrayImage),
    /// 8-bit RGB
    Rgb(RgbImage),
}

/// A decoded, non-empty raster image.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    buffer: PixelBuffer,
}

impl RasterImage {
    /// Wrap a grayscale buffer.
    ///
    /// Fails with [`Error::InvalidInput`] when either dimension is zero.
    pub fn from_gray(image: GrayImage) -> Result<Self> {
        ensure_area(image.width(), image.height())?;
        Ok(Self {
            buffer: PixelBuffer::Gray(image),
        })
    }

    /// Wrap an RGB buffer.
    ///
    /// Fails with [`Error::InvalidInput`] when either dimension is zero.
    pub fn from_rgb(image: RgbImage) -> Result<Self> {
        ensure_area(image.width(), image.height())?;
        Ok(Self {
            buffer: PixelBuffer::Rgb(image),
        })
    }

    /// Build an image from raw interleaved bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use docscan::raster::{Channels, RasterImage};
    ///
    /// let image = RasterImage::from_raw(2, 1, Channels::Gray, vec![0, 255]).unwrap();
    /// assert_eq!(image.dimensions(), (2, 1));
    ///
    /// // Length must be width * height * channels
    /// assert!(RasterImage::from_raw(2, 1, Channels::Rgb, vec![0, 255]).is_err());
    /// ```
    pub fn from_raw(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self> {
        ensure_area(width, height)?;
        let expected = width as usize * height as usize * channels.count();
        if data.len() != expected {
            return Err(Error::InvalidInput(format!(
                "pixel buffer holds {} bytes, expected {} for {}x{} with {} channel(s)",
                data.len(),
                expected,
                width,
                height,
                channels.count()
            )));
        }

        // Length was checked above, so the buffer constructors cannot fail.
        let buffer = match channels {
            Channels::Gray => GrayImage::from_raw(width, height, data).map(PixelBuffer::Gray),
            Channels::Rgb => RgbImage::from_raw(width, height, data).map(PixelBuffer::Rgb),
        };
        buffer
            .map(|buffer| Self { buffer })
            .ok_or_else(|| Error::invalid_input("pixel buffer does not match its dimensions"))
    }

    /// Decode an encoded raster (PNG, JPEG, TIFF) from memory.
    ///
    /// Color inputs keep three channels; grayscale inputs stay single-channel.
    /// Alpha is dropped.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| Error::InvalidInput(format!("failed to decode image: {}", e)))?;
        Self::from_dynamic(decoded)
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::decode(&bytes).map_err(|e| match e {
            Error::InvalidInput(msg) => {
                Error::InvalidInput(format!("{}: {}", path.as_ref().display(), msg))
            },
            other => other,
        })
    }

    /// Convert from an `image` crate buffer of any pixel layout.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        if image.color().has_color() {
            Self::from_rgb(image.to_rgb8())
        } else {
            Self::from_gray(image.to_luma8())
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        match &self.buffer {
            PixelBuffer::Gray(g) => g.width(),
            PixelBuffer::Rgb(c) => c.width(),
        }
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        match &self.buffer {
            PixelBuffer::Gray(g) => g.height(),
            PixelBuffer::Rgb(c) => c.height(),
        }
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Number of pixels.
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Channel layout of the underlying buffer.
    pub fn channels(&self) -> Channels {
        match &self.buffer {
            PixelBuffer::Gray(_) => Channels::Gray,
            PixelBuffer::Rgb(_) => Channels::Rgb,
        }
    }

    /// Borrow the underlying pixel storage.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Single-channel intensity view; borrows when already grayscale.
    pub fn to_gray(&self) -> Cow<'_, GrayImage> {
        match &self.buffer {
            PixelBuffer::Gray(g) => Cow::Borrowed(g),
            PixelBuffer::Rgb(c) => Cow::Owned(DynamicImage::ImageRgb8(c.clone()).to_luma8()),
        }
    }

    /// Black-and-white version of this image.
    ///
    /// Pixels brighter than `threshold` become white, everything else black.
    pub fn to_monochrome(&self, threshold: u8) -> RasterImage {
        let gray = self.to_gray();
        let mono = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            if gray.get_pixel(x, y)[0] > threshold {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        RasterImage {
            buffer: PixelBuffer::Gray(mono),
        }
    }

    /// Copy into an `image` crate buffer, e.g. for encoding.
    pub fn to_dynamic(&self) -> DynamicImage {
        match &self.buffer {
            PixelBuffer::Gray(g) => DynamicImage::ImageLuma8(g.clone()),
            PixelBuffer::Rgb(c) => DynamicImage::ImageRgb8(c.clone()),
        }
    }

    pub(crate) fn from_buffer_unchecked(buffer: PixelBuffer) -> Self {
        Self { buffer }
    }
}

fn ensure_area(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput(format!("zero-area image ({}x{})", width, height)));
    }
    Ok(())
}
