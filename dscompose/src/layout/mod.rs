//! Arranging the two screens into a single output buffer.

mod buffer;
mod compose;
mod geometry;

use log::{debug, info};

use crate::constants::ds::{FPS, SAMPLE_RATE};
pub use buffer::PixelBuffer;
pub use geometry::BufferGeometry;

/// Arrangement of the two screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScreenLayout {
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
    TopOnly,
    BottomOnly,
    /// Top screen magnified, both screens small on the side.
    HybridTop,
    /// Bottom screen magnified, both screens small on the side.
    HybridBottom,
    // TODO: rotated-left, rotated-right and upside-down layouts.
}

impl ScreenLayout {
    pub const ALL: [ScreenLayout; 8] = [
        ScreenLayout::TopBottom,
        ScreenLayout::BottomTop,
        ScreenLayout::LeftRight,
        ScreenLayout::RightLeft,
        ScreenLayout::TopOnly,
        ScreenLayout::BottomOnly,
        ScreenLayout::HybridTop,
        ScreenLayout::HybridBottom,
    ];

    /// The same layout with the screens switched.
    pub fn swap(self) -> Self {
        use ScreenLayout::*;
        match self {
            TopBottom       => BottomTop,
            BottomTop       => TopBottom,
            LeftRight       => RightLeft,
            RightLeft       => LeftRight,
            TopOnly         => BottomOnly,
            BottomOnly      => TopOnly,
            HybridTop       => HybridBottom,
            HybridBottom    => HybridTop,
        }
    }

    pub fn is_hybrid(self) -> bool {
        matches!(self, ScreenLayout::HybridTop | ScreenLayout::HybridBottom)
    }
}

/// Which renderer draws the 3D engine, and composites the screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Renderer {
    /// Screens are composited into a `PixelBuffer`.
    Software,
    /// Screens are composited on the GPU. No pixel buffer is kept.
    OpenGl,
}

/// One of the two native screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Top,
    Bottom,
}

/// Slot for a screen in a hybrid layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenId {
    /// The large, magnified screen.
    Primary,
    /// The small screen in the upper slot.
    Top,
    /// The small screen in the lower slot.
    Bottom,
}

/// Video geometry and timing reported to the frontend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvInfo {
    pub base_width:     usize,
    pub base_height:    usize,
    pub max_width:      usize,
    pub max_height:     usize,
    pub aspect_ratio:   f32,
    pub fps:            f64,
    pub sample_rate:    f64,
}

/// Owns the output buffer and its geometry.
pub struct ScreenLayoutData {
    geometry:   BufferGeometry,
    screen_gap: usize,
    buffer:     Option<PixelBuffer>,
}

impl ScreenLayoutData {
    /// No buffer is allocated until the first `update`.
    pub fn new() -> Self {
        Self {
            geometry:   BufferGeometry::new(ScreenLayout::TopBottom, Renderer::Software, 1, 2, 0),
            screen_gap: 0,
            buffer:     None,
        }
    }

    /// Set the gap between stacked screens, in native pixels.
    ///
    /// Applies from the next `update`.
    pub fn set_screen_gap(&mut self, screen_gap: usize) {
        self.screen_gap = screen_gap;
    }

    /// Recalculate the geometry.
    ///
    /// The buffer is reallocated only if its size changes,
    /// and cleared if the geometry changes.
    pub fn update(&mut self, layout: ScreenLayout, renderer: Renderer, scale_factor: usize, hybrid_ratio: usize) -> &BufferGeometry {
        let geometry = BufferGeometry::new(layout, renderer, scale_factor, hybrid_ratio, self.screen_gap);
        let changed = geometry != self.geometry;
        if changed {
            debug!("layout {:?}: {}x{} (stride {})", layout, geometry.width, geometry.height, geometry.stride);
        }
        self.geometry = geometry;

        match renderer {
            Renderer::OpenGl => if self.buffer.take().is_some() {
                info!("released software framebuffer");
            },
            Renderer::Software => {
                let new_size = geometry.byte_size();
                match &mut self.buffer {
                    Some(buffer) if buffer.byte_size() == new_size => if changed {
                        buffer.clear();
                    },
                    _ => {
                        info!("allocating {} byte framebuffer", new_size);
                        self.buffer = Some(PixelBuffer::new(geometry.row_pixels() * geometry.height));
                    }
                }
            }
        }

        &self.geometry
    }

    pub fn geometry(&self) -> &BufferGeometry {
        &self.geometry
    }

    /// The layout currently in use.
    pub fn layout(&self) -> ScreenLayout {
        self.geometry.layout
    }

    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }

    /// Zero the whole buffer.
    pub fn clean(&mut self) {
        if let Some(buffer) = &mut self.buffer {
            buffer.clear();
        }
    }

    pub fn av_info(&self) -> AvInfo {
        AvInfo {
            base_width:     self.geometry.width,
            base_height:    self.geometry.height,
            max_width:      self.geometry.width,
            max_height:     self.geometry.height,
            aspect_ratio:   self.geometry.aspect_ratio(),
            fps:            FPS,
            sample_rate:    SAMPLE_RATE,
        }
    }
}

impl Default for ScreenLayoutData {
    fn default() -> Self {
        Self::new()
    }
}
