//! Output buffer geometry for each layout.

use crate::constants::{
    ds::{H_RES, V_RES, PIXEL_SIZE},
    render::MIN_GL_SCALE
};
use super::{ScreenLayout, Renderer, ScreenId};

/// Dimensions and screen placement of the output buffer.
///
/// All offsets are in pixels from the start of the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferGeometry {
    pub layout:         ScreenLayout,

    /// Buffer width in pixels.
    pub width:          usize,
    /// Buffer height in pixels.
    pub height:         usize,
    /// Bytes per row.
    pub stride:         usize,
    pub pixel_size:     usize,

    /// Width of a single (unmagnified) screen at the renderer scale.
    pub screen_width:   usize,
    /// Height of a single (unmagnified) screen at the renderer scale.
    pub screen_height:  usize,
    /// Renderer scale.
    pub scale:          usize,
    pub hybrid_ratio:   usize,

    pub top_screen_offset:      usize,
    pub bottom_screen_offset:   usize,

    /// Position of the touchscreen inside the buffer.
    pub touch_offset_x: usize,
    pub touch_offset_y: usize,

    /// Screens can be copied in one go, rather than row-by-row.
    pub direct_copy:    bool,
}

impl BufferGeometry {
    pub fn new(layout: ScreenLayout, renderer: Renderer, scale_factor: usize, hybrid_ratio: usize, screen_gap: usize) -> Self {
        use ScreenLayout::*;

        let scale = match renderer {
            Renderer::Software => 1,
            Renderer::OpenGl => if scale_factor > MIN_GL_SCALE {scale_factor} else {MIN_GL_SCALE},
        };

        let screen_width = H_RES * scale;
        let screen_height = V_RES * scale;
        let gap = screen_gap * scale;

        let mut geometry = Self {
            layout,
            width:          screen_width,
            height:         screen_height,
            stride:         screen_width * PIXEL_SIZE,
            pixel_size:     PIXEL_SIZE,
            screen_width,
            screen_height,
            scale,
            hybrid_ratio,
            top_screen_offset:      0,
            bottom_screen_offset:   0,
            touch_offset_x: 0,
            touch_offset_y: 0,
            direct_copy:    false,
        };

        match layout {
            TopBottom => {
                geometry.direct_copy = true;
                geometry.height = screen_height * 2 + gap;
                geometry.touch_offset_y = screen_height + gap;
                geometry.bottom_screen_offset = screen_width * (screen_height + gap);
            },
            BottomTop => {
                geometry.direct_copy = true;
                geometry.height = screen_height * 2 + gap;
                geometry.top_screen_offset = screen_width * (screen_height + gap);
            },
            LeftRight => {
                geometry.width = screen_width * 2;
                geometry.touch_offset_x = screen_width;
                geometry.bottom_screen_offset = screen_width;
            },
            RightLeft => {
                geometry.width = screen_width * 2;
                geometry.top_screen_offset = screen_width;
            },
            // Touch is unavailable in top-only.
            TopOnly | BottomOnly => {
                geometry.direct_copy = true;
            },
            HybridTop | HybridBottom => {
                geometry.width = (screen_width * hybrid_ratio) + screen_width + (hybrid_ratio * 2);
                geometry.height = screen_height * hybrid_ratio;

                if layout == HybridTop {
                    geometry.touch_offset_x = (screen_width * hybrid_ratio) + (hybrid_ratio / 2);
                    geometry.touch_offset_y = screen_height * (hybrid_ratio - 1);
                }
            },
        }
        geometry.stride = geometry.width * PIXEL_SIZE;

        // The small screen placement depends on the final stride.
        match layout {
            HybridTop => geometry.bottom_screen_offset = geometry.hybrid_screen_offset(ScreenId::Bottom),
            HybridBottom => geometry.top_screen_offset = geometry.hybrid_screen_offset(ScreenId::Top),
            _ => {}
        }

        debug_assert!(geometry.screens_fit(), "screens overflow buffer: {:?}", geometry);
        geometry
    }

    /// Size of the whole buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.stride * self.height
    }

    /// Pixels per row.
    pub fn row_pixels(&self) -> usize {
        self.stride / self.pixel_size
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Multiplier from touchscreen pixels to buffer pixels.
    ///
    /// Only the magnified bottom screen of HybridBottom is scaled.
    pub fn touch_scale(&self) -> usize {
        if self.layout == ScreenLayout::HybridBottom {
            self.hybrid_ratio
        } else {
            1
        }
    }

    /// Offset of a screen in a hybrid layout.
    ///
    /// The small screens sit past the magnified one, separated by a padding
    /// band. The padding is counted in 16-bit units:
    /// even ratios use the ratio itself, odd ratios use (ratio / 2) * 4.
    pub fn hybrid_screen_offset(&self, screen: ScreenId) -> usize {
        let ratio = self.hybrid_ratio;
        let padding = if ratio % 2 == 0 {ratio} else {(ratio / 2) * 4};
        let x = ((self.screen_width * ratio * 2) + padding) / 2;
        match screen {
            ScreenId::Primary => 0,
            ScreenId::Top => x,
            ScreenId::Bottom => x + (self.screen_height * (ratio - 1) * self.row_pixels()),
        }
    }

    /// Check that every screen copied for this layout stays inside the buffer.
    pub fn screens_fit(&self) -> bool {
        use ScreenLayout::*;

        let buffer_size = self.row_pixels() * self.height;
        let screen_end = |offset: usize, width: usize, height: usize| {
            offset + ((height - 1) * self.row_pixels()) + width
        };
        let (w, h) = (self.screen_width, self.screen_height);
        if self.stride < self.width * self.pixel_size {
            return false;
        }
        match self.layout {
            TopOnly => screen_end(self.top_screen_offset, w, h) <= buffer_size,
            BottomOnly => screen_end(self.bottom_screen_offset, w, h) <= buffer_size,
            HybridTop | HybridBottom => {
                let ratio = self.hybrid_ratio;
                // Magnification writes a full ratio run from the last column.
                let primary_end = screen_end(0, (w * ratio) + ratio - 1, h * ratio);
                primary_end <= buffer_size &&
                    screen_end(self.hybrid_screen_offset(ScreenId::Top), w, h) <= buffer_size &&
                    screen_end(self.hybrid_screen_offset(ScreenId::Bottom), w, h) <= buffer_size
            },
            _ => screen_end(self.top_screen_offset, w, h) <= buffer_size &&
                screen_end(self.bottom_screen_offset, w, h) <= buffer_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_bottom() {
        let geometry = BufferGeometry::new(ScreenLayout::TopBottom, Renderer::Software, 1, 2, 0);
        assert_eq!(geometry.width, 256);
        assert_eq!(geometry.height, 384);
        assert_eq!(geometry.stride, 1024);
        assert_eq!(geometry.top_screen_offset, 0);
        assert_eq!(geometry.bottom_screen_offset, 256 * 192);
        assert_eq!((geometry.touch_offset_x, geometry.touch_offset_y), (0, 192));
        assert!(geometry.direct_copy);
    }

    #[test]
    fn test_screen_gap() {
        let geometry = BufferGeometry::new(ScreenLayout::TopBottom, Renderer::Software, 1, 2, 16);
        assert_eq!(geometry.height, 192 * 2 + 16);
        assert_eq!(geometry.bottom_screen_offset, 256 * (192 + 16));
        assert_eq!(geometry.touch_offset_y, 192 + 16);

        let geometry = BufferGeometry::new(ScreenLayout::BottomTop, Renderer::Software, 1, 2, 16);
        assert_eq!(geometry.top_screen_offset, 256 * (192 + 16));
        assert_eq!(geometry.bottom_screen_offset, 0);
        assert_eq!(geometry.touch_offset_y, 0);
    }

    #[test]
    fn test_side_by_side() {
        let geometry = BufferGeometry::new(ScreenLayout::LeftRight, Renderer::Software, 1, 2, 0);
        assert_eq!((geometry.width, geometry.height), (512, 192));
        assert_eq!(geometry.stride, 2048);
        assert_eq!(geometry.bottom_screen_offset, 256);
        assert_eq!(geometry.touch_offset_x, 256);
        assert!(!geometry.direct_copy);

        let geometry = BufferGeometry::new(ScreenLayout::RightLeft, Renderer::Software, 1, 2, 0);
        assert_eq!(geometry.top_screen_offset, 256);
        assert_eq!(geometry.bottom_screen_offset, 0);
        assert_eq!(geometry.touch_offset_x, 0);
    }

    #[test]
    fn test_single_screen() {
        for layout in [ScreenLayout::TopOnly, ScreenLayout::BottomOnly] {
            let geometry = BufferGeometry::new(layout, Renderer::Software, 1, 2, 0);
            assert_eq!((geometry.width, geometry.height), (256, 192));
            assert_eq!((geometry.touch_offset_x, geometry.touch_offset_y), (0, 0));
            assert!(geometry.direct_copy);
        }
    }

    #[test]
    fn test_hybrid() {
        let geometry = BufferGeometry::new(ScreenLayout::HybridTop, Renderer::Software, 1, 2, 0);
        assert_eq!(geometry.width, 512 + 256 + 4);
        assert_eq!(geometry.height, 384);
        assert_eq!(geometry.touch_offset_x, 513);
        assert_eq!(geometry.touch_offset_y, 192);
        assert_eq!(geometry.hybrid_screen_offset(ScreenId::Top), 513);
        assert_eq!(geometry.hybrid_screen_offset(ScreenId::Bottom), 513 + (192 * 772));
        assert_eq!(geometry.bottom_screen_offset, 513 + (192 * 772));
        assert_eq!(geometry.touch_scale(), 1);

        let geometry = BufferGeometry::new(ScreenLayout::HybridBottom, Renderer::Software, 1, 3, 0);
        assert_eq!(geometry.width, 768 + 256 + 6);
        assert_eq!(geometry.height, 576);
        assert_eq!((geometry.touch_offset_x, geometry.touch_offset_y), (0, 0));
        // Odd ratio: padding is (3 / 2) * 4 half-words.
        assert_eq!(geometry.hybrid_screen_offset(ScreenId::Top), 768 + 2);
        assert_eq!(geometry.top_screen_offset, 770);
        assert_eq!(geometry.touch_scale(), 3);
    }

    #[test]
    fn test_gl_scale() {
        let geometry = BufferGeometry::new(ScreenLayout::TopBottom, Renderer::OpenGl, 1, 2, 0);
        assert_eq!(geometry.scale, 4);
        assert_eq!((geometry.screen_width, geometry.screen_height), (1024, 768));

        let geometry = BufferGeometry::new(ScreenLayout::TopBottom, Renderer::OpenGl, 6, 2, 0);
        assert_eq!(geometry.scale, 6);

        let geometry = BufferGeometry::new(ScreenLayout::TopBottom, Renderer::Software, 6, 2, 0);
        assert_eq!(geometry.scale, 1);
    }

    #[test]
    fn test_screens_fit() {
        for layout in ScreenLayout::ALL {
            for ratio in 2..=3 {
                for gap in [0, 8] {
                    let geometry = BufferGeometry::new(layout, Renderer::Software, 1, ratio, gap);
                    assert!(geometry.screens_fit(), "{:?}", geometry);
                    assert!(geometry.stride >= geometry.width * geometry.pixel_size);
                }
            }
        }
    }
}
