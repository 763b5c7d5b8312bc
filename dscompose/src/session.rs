//! Per-frame driver tying the layout engine and input together.

use log::{debug, info, trace};

use crate::{
    TouchPoint,
    config::{CoreConfig, ConfigError, HybridSmallScreen},
    input::{InputState, InputSource},
    layout::{ScreenLayoutData, ScreenLayout, Renderer, Screen, ScreenId, AvInfo},
};

/// The emulated console, as seen from the frontend layer.
pub trait Console {
    /// Set held keys. Keys are active-low.
    fn set_key_mask(&mut self, mask: u32);
    fn is_lid_closed(&self) -> bool;
    fn set_lid_closed(&mut self, closed: bool);
    fn touch_screen(&mut self, point: TouchPoint);
    fn release_screen(&mut self);
    fn set_mic_active(&mut self, active: bool);
}

/// A composited frame ready for presentation.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    /// XRGB8888 pixels.
    pub data:   &'a [u8],
    pub width:  usize,
    pub height: usize,
    /// Bytes per row.
    pub pitch:  usize,
}

/// Frontend state for one emulation session.
///
/// Each frame, call `run_input` and then `render`.
pub struct Session {
    config:             CoreConfig,
    layout_index:       usize,
    layout_data:        ScreenLayoutData,
    input:              InputState,
    geometry_changed:   bool,
}

impl Session {
    pub fn new(config: CoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut layout_data = ScreenLayoutData::new();
        layout_data.set_screen_gap(config.screen_gap);
        let input = InputState::new(&config);
        let mut session = Self {
            config,
            layout_index:       0,
            layout_data,
            input,
            geometry_changed:   true,
        };
        session.update_layout();
        Ok(session)
    }

    /// Swap in new options.
    ///
    /// Invalid options leave the session unchanged.
    pub fn apply_config(&mut self, config: CoreConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.input.apply(&config);
        self.layout_data.set_screen_gap(config.screen_gap);
        if self.layout_index >= config.layouts.len() {
            self.layout_index = 0;
        }
        self.config = config;
        self.update_layout();
        Ok(())
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn layout(&self) -> &ScreenLayoutData {
        &self.layout_data
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// The layout picked from the config, before swapping screens.
    pub fn selected_layout(&self) -> ScreenLayout {
        self.config.layouts[self.layout_index]
    }

    /// Move to the next layout in the config list.
    pub fn next_layout(&mut self) {
        self.layout_index = (self.layout_index + 1) % self.config.layouts.len();
        info!("switching to layout {:?}", self.selected_layout());
        self.update_layout();
    }

    /// Move to the previous layout in the config list.
    pub fn previous_layout(&mut self) {
        let len = self.config.layouts.len();
        self.layout_index = (self.layout_index + len - 1) % len;
        info!("switching to layout {:?}", self.selected_layout());
        self.update_layout();
    }

    /// Sample input for this frame and pass it on to the console.
    pub fn run_input(&mut self, source: &impl InputSource, console: &mut impl Console) {
        let geometry = *self.layout_data.geometry();
        self.input.update(source, &geometry);

        if self.input.take_settings_dirty() {
            debug!("cursor settings: {:?}, {:?}, timeout {}",
                self.input.cursor_mode(), self.input.touch_mode(), self.input.max_cursor_timeout());
            self.input.reset_cursor_timeout();
        }

        console.set_key_mask(self.input.console_buttons().key_mask());

        if self.input.toggle_lid().pressed() {
            let closed = !console.is_lid_closed();
            info!("lid {}", if closed {"closed"} else {"opened"});
            console.set_lid_closed(closed);
        }

        if self.input.mic().pressed() {
            console.set_mic_active(true);
        } else if self.input.mic().released() {
            console.set_mic_active(false);
        }

        if let Some(point) = self.input.console_touch_coordinates(&geometry) {
            trace!("touch at {}, {}", point.x, point.y);
            console.touch_screen(point);
        } else if self.input.screen_released() {
            trace!("touch released");
            console.release_screen();
        }

        if self.input.cycle_next_layout().pressed() {
            self.next_layout();
        }
        if self.input.cycle_previous_layout().pressed() {
            self.previous_layout();
        }
    }

    /// Composite both screens, and the cursor if visible.
    ///
    /// Does nothing for the hardware renderer.
    pub fn render(&mut self, top: &[u32], bottom: &[u32]) {
        if self.config.renderer == Renderer::OpenGl {
            return;
        }

        let both_small = self.config.hybrid_small_screen == HybridSmallScreen::Both;
        let layout = self.layout_data.layout();
        match layout {
            ScreenLayout::TopBottom | ScreenLayout::BottomTop |
            ScreenLayout::LeftRight | ScreenLayout::RightLeft => {
                self.layout_data.copy_screen(top, Screen::Top);
                self.layout_data.copy_screen(bottom, Screen::Bottom);
            },
            ScreenLayout::TopOnly => self.layout_data.copy_screen(top, Screen::Top),
            ScreenLayout::BottomOnly => self.layout_data.copy_screen(bottom, Screen::Bottom),
            ScreenLayout::HybridTop => {
                self.layout_data.copy_hybrid_screen(top, ScreenId::Primary);
                self.layout_data.copy_hybrid_screen(bottom, ScreenId::Bottom);
                if both_small {
                    self.layout_data.copy_hybrid_screen(top, ScreenId::Top);
                }
            },
            ScreenLayout::HybridBottom => {
                self.layout_data.copy_hybrid_screen(bottom, ScreenId::Primary);
                self.layout_data.copy_hybrid_screen(top, ScreenId::Top);
                if both_small {
                    self.layout_data.copy_hybrid_screen(bottom, ScreenId::Bottom);
                }
            },
        }

        // The touchscreen isn't shown in top-only.
        if layout != ScreenLayout::TopOnly && self.input.cursor_visible() {
            let position = self.input.touch_position(self.layout_data.geometry());
            self.layout_data.draw_cursor(position.x, position.y, self.config.cursor_size);
        }
    }

    /// Returns the new video geometry if it changed since the last call.
    pub fn take_geometry_update(&mut self) -> Option<AvInfo> {
        if std::mem::replace(&mut self.geometry_changed, false) {
            Some(self.layout_data.av_info())
        } else {
            None
        }
    }

    /// The composited frame. Only available with the software renderer.
    pub fn framebuffer(&self) -> Option<FrameView<'_>> {
        let geometry = self.layout_data.geometry();
        self.layout_data.buffer().map(|buffer| FrameView {
            data:   buffer.as_bytes(),
            width:  geometry.width,
            height: geometry.height,
            pitch:  geometry.stride,
        })
    }
}

// Internal
impl Session {
    fn effective_layout(&self) -> ScreenLayout {
        let layout = self.selected_layout();
        if self.config.swap_screens {
            layout.swap()
        } else {
            layout
        }
    }

    fn update_layout(&mut self) {
        let old_geometry = *self.layout_data.geometry();
        let layout = self.effective_layout();
        let geometry = *self.layout_data.update(layout, self.config.renderer, self.config.scale_factor, self.config.hybrid_ratio);
        if geometry != old_geometry {
            self.geometry_changed = true;
        }
    }
}
