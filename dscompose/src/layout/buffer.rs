//! Owned software framebuffer.

use crate::constants::ds::PIXEL_SIZE;

/// Pixels in XRGB8888 format, row-major.
///
/// Only exists while composing in software.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Make a zeroed buffer holding `len` pixels.
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![0; len]
        }
    }

    /// Size of the buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len() * PIXEL_SIZE
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// View the buffer as raw bytes, for uploading to the frontend.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Fill with black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }
}
