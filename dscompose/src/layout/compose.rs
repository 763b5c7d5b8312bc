//! Copying screens into the software framebuffer.

use super::{ScreenLayoutData, ScreenLayout, Screen, ScreenId, PixelBuffer};

impl ScreenLayoutData {
    /// Copy a rendered screen into its place in the buffer.
    ///
    /// `src` holds one screen in XRGB8888 format.
    pub fn copy_screen(&mut self, src: &[u32], screen: Screen) {
        let geometry = self.geometry;
        let offset = match screen {
            Screen::Top => geometry.top_screen_offset,
            Screen::Bottom => geometry.bottom_screen_offset,
        };
        let (width, height) = (geometry.screen_width, geometry.screen_height);
        let pixels = software_buffer(&mut self.buffer).pixels_mut();

        if geometry.direct_copy {
            let size = width * height;
            pixels[offset..(offset + size)].copy_from_slice(&src[..size]);
        } else {
            // Rows are shared with the other screen.
            let row_pixels = geometry.row_pixels();
            for (y, src_row) in src.chunks_exact(width).take(height).enumerate() {
                let start = offset + (y * row_pixels);
                pixels[start..(start + width)].copy_from_slice(src_row);
            }
        }
    }

    /// Copy a rendered screen into a hybrid layout slot.
    ///
    /// The primary screen is magnified by the hybrid ratio.
    pub fn copy_hybrid_screen(&mut self, src: &[u32], screen_id: ScreenId) {
        let geometry = self.geometry;
        let ratio = geometry.hybrid_ratio;
        let (width, height) = (geometry.screen_width, geometry.screen_height);
        let row_pixels = geometry.row_pixels();
        let pixels = software_buffer(&mut self.buffer).pixels_mut();

        match screen_id {
            ScreenId::Primary => {
                let buffer_width = width * ratio;
                for (buffer_y, buffer_row) in pixels.chunks_exact_mut(row_pixels).take(height * ratio).enumerate() {
                    let y = buffer_y / ratio;
                    let src_row = &src[(y * width)..((y + 1) * width)];
                    // Each pixel is written `ratio` times from its column.
                    // The last write to a column wins.
                    for buffer_x in 0..buffer_width {
                        let pixel_data = src_row[buffer_x / ratio];
                        buffer_row[buffer_x..(buffer_x + ratio)].fill(pixel_data);
                    }
                }
            },
            ScreenId::Top | ScreenId::Bottom => {
                let offset = geometry.hybrid_screen_offset(screen_id);
                for (y, src_row) in src.chunks_exact(width).take(height).enumerate() {
                    let start = offset + (y * row_pixels);
                    pixels[start..(start + width)].copy_from_slice(src_row);
                }
            },
        }
    }

    /// Invert the colours of a square around (x, y) on the touchscreen.
    ///
    /// Coordinates are in touchscreen pixels.
    pub fn draw_cursor(&mut self, x: i32, y: i32, cursor_size: u32) {
        let geometry = self.geometry;
        let scale = if geometry.layout == ScreenLayout::HybridBottom {geometry.hybrid_ratio} else {1};
        let size = cursor_size as i32;
        let clamp = |n: i32, max: usize| (n.clamp(0, max as i32) as usize) * scale;

        let start_y = clamp(y - size, geometry.screen_height);
        let end_y = clamp(y + size, geometry.screen_height);
        let start_x = clamp(x - size, geometry.screen_width);
        let end_x = clamp(x + size, geometry.screen_width);

        let row_pixels = geometry.row_pixels();
        let pixels = software_buffer(&mut self.buffer).pixels_mut();
        for buffer_y in start_y..end_y {
            let row = (buffer_y + geometry.touch_offset_y) * row_pixels;
            for buffer_x in start_x..end_x {
                let pixel = &mut pixels[row + buffer_x + geometry.touch_offset_x];
                *pixel = 0xFF_FF_FF_u32.wrapping_sub(*pixel) | 0xFF00_0000;
            }
        }
    }
}

fn software_buffer(buffer: &mut Option<PixelBuffer>) -> &mut PixelBuffer {
    buffer.as_mut().expect("screens can only be composited with the software renderer")
}
