//! Translating frontend input into console input.
//!
//! Once a frame, `InputState::update` samples the frontend. Digital inputs
//! keep the previous frame's value for edge detection, and the pointer and
//! joystick are turned into positions on the touchscreen.

mod button;
mod joypad;
mod source;

use crate::{
    Coords, TouchPoint,
    config::{CoreConfig, HybridSmallScreen},
    constants::{
        ds::{H_RES, V_RES},
        retro::{POINTER_RANGE, POINTER_BIAS, ANALOG_DIVISOR}
    },
    layout::{BufferGeometry, ScreenLayout, ScreenId}
};

pub use button::ButtonState;
pub use joypad::{RetroButton, ConsoleButtons, Action, ButtonMap};
pub use source::{InputSource, RawInput, PointerSample};

/// When to draw the touch cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorMode {
    Never,
    /// Only while the screen is touched.
    Touching,
    /// Until the cursor has been idle for too long.
    Timeout,
    Always,
}

/// Which devices can touch the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchMode {
    Disabled,
    Pointer,
    Joystick,
    /// Pointer and joystick. The most recently moved one controls the cursor.
    Auto,
}

impl TouchMode {
    fn pointer_enabled(self) -> bool {
        matches!(self, TouchMode::Pointer | TouchMode::Auto)
    }

    fn joystick_enabled(self) -> bool {
        matches!(self, TouchMode::Joystick | TouchMode::Auto)
    }
}

pub struct InputState {
    cursor_settings_dirty:  bool,
    cursor_mode:            CursorMode,
    touch_mode:             TouchMode,
    /// Idle frames.
    cursor_timeout:         u32,
    max_cursor_timeout:     u32,

    button_map:             ButtonMap,
    sensitivity:            f32,
    /// The small bottom screen of HybridBottom can be touched.
    hybrid_small_touch:     bool,
    console_buttons:        ConsoleButtons,

    frame:                  u64,

    pointer_touch:          ButtonState,
    pointer_raw_position:   Coords<i16>,
    /// In touchscreen pixels at the renderer scale.
    pointer_touch_position: Coords<i32>,
    pointer_in_bounds:      bool,
    pointer_timestamp:      u64,

    joystick_touch:             ButtonState,
    joystick_raw_direction:     Coords<i16>,
    /// In console pixels.
    joystick_cursor_position:   Coords<i32>,
    joystick_timestamp:         u64,

    toggle_lid:             ButtonState,
    mic:                    ButtonState,
    cycle_previous_layout:  ButtonState,
    cycle_next_layout:      ButtonState,
}

impl InputState {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            cursor_settings_dirty:  true,
            cursor_mode:            config.cursor_mode,
            touch_mode:             config.touch_mode,
            cursor_timeout:         0,
            max_cursor_timeout:     config.cursor_timeout,

            button_map:             config.button_map.clone(),
            sensitivity:            config.joystick_sensitivity,
            hybrid_small_touch:     config.hybrid_small_screen == HybridSmallScreen::Both,
            console_buttons:        ConsoleButtons::default(),

            frame:                  0,

            pointer_touch:          ButtonState::default(),
            pointer_raw_position:   Coords::default(),
            pointer_touch_position: Coords::default(),
            pointer_in_bounds:      false,
            pointer_timestamp:      0,

            joystick_touch:             ButtonState::default(),
            joystick_raw_direction:     Coords::default(),
            joystick_cursor_position:   Coords{x: (H_RES / 2) as i32, y: (V_RES / 2) as i32},
            joystick_timestamp:         0,

            toggle_lid:             ButtonState::default(),
            mic:                    ButtonState::default(),
            cycle_previous_layout:  ButtonState::default(),
            cycle_next_layout:      ButtonState::default(),
        }
    }

    /// Take new settings from the config.
    ///
    /// Cursor settings that change will mark the settings as dirty.
    pub fn apply(&mut self, config: &CoreConfig) {
        self.set_cursor_mode(config.cursor_mode);
        self.set_touch_mode(config.touch_mode);
        self.set_max_cursor_timeout(config.cursor_timeout);
        self.button_map = config.button_map.clone();
        self.sensitivity = config.joystick_sensitivity;
        self.hybrid_small_touch = config.hybrid_small_screen == HybridSmallScreen::Both;
    }

    /// Sample the frontend for a new frame.
    pub fn update(&mut self, source: &impl InputSource, geometry: &BufferGeometry) {
        self.frame += 1;
        self.update_buttons(source);

        let pointer_moved = if self.touch_mode.pointer_enabled() {
            self.update_pointer(source, geometry)
        } else {
            self.pointer_touch.update(false);
            self.pointer_in_bounds = false;
            false
        };

        let joystick_moved = if self.touch_mode.joystick_enabled() {
            self.update_joystick(source)
        } else {
            self.joystick_touch.update(false);
            false
        };

        if pointer_moved || joystick_moved || self.is_touching_screen() {
            self.cursor_timeout = 0;
        } else {
            self.cursor_timeout = self.cursor_timeout.saturating_add(1);
        }
    }

    /// Console keys held this frame.
    pub fn console_buttons(&self) -> ConsoleButtons {
        self.console_buttons
    }

    /// Where the console should see the touchscreen pressed, if anywhere.
    ///
    /// The pointer takes priority over the joystick.
    pub fn console_touch_coordinates(&self, geometry: &BufferGeometry) -> Option<TouchPoint> {
        if self.pointer_touch.down() {
            let position = self.pointer_touch_position;
            Some(TouchPoint {
                x: ((position.x as usize * H_RES) / geometry.screen_width) as u32,
                y: ((position.y as usize * V_RES) / geometry.screen_height) as u32,
            })
        } else if self.joystick_touch.down() {
            let position = self.joystick_cursor_position;
            Some(TouchPoint {
                x: position.x as u32,
                y: position.y as u32,
            })
        } else {
            None
        }
    }

    /// Cursor position in touchscreen pixels at the renderer scale.
    pub fn touch_position(&self, geometry: &BufferGeometry) -> Coords<i32> {
        if self.joystick_controls_cursor() {
            let scale = geometry.scale as i32;
            Coords {
                x: self.joystick_cursor_position.x * scale,
                y: self.joystick_cursor_position.y * scale,
            }
        } else {
            self.pointer_touch_position
        }
    }

    pub fn is_touching_screen(&self) -> bool {
        self.pointer_touch.down() || self.joystick_touch.down()
    }

    /// Either device started touching the screen this frame.
    pub fn screen_touched(&self) -> bool {
        self.pointer_touch.pressed() || self.joystick_touch.pressed()
    }

    /// Either device stopped touching the screen this frame.
    pub fn screen_released(&self) -> bool {
        self.pointer_touch.released() || self.joystick_touch.released()
    }

    pub fn cursor_visible(&self) -> bool {
        let mode_allows_cursor = match self.cursor_mode {
            CursorMode::Never => false,
            CursorMode::Touching => self.is_touching_screen(),
            CursorMode::Timeout => self.max_cursor_timeout == 0 || self.cursor_timeout <= self.max_cursor_timeout,
            CursorMode::Always => true,
        };
        mode_allows_cursor && self.is_cursor_input_in_bounds()
    }

    pub fn pointer_touch(&self) -> ButtonState {
        self.pointer_touch
    }

    pub fn joystick_touch(&self) -> ButtonState {
        self.joystick_touch
    }

    pub fn toggle_lid(&self) -> ButtonState {
        self.toggle_lid
    }

    pub fn mic(&self) -> ButtonState {
        self.mic
    }

    pub fn cycle_previous_layout(&self) -> ButtonState {
        self.cycle_previous_layout
    }

    pub fn cycle_next_layout(&self) -> ButtonState {
        self.cycle_next_layout
    }

    /// Raw pointer coordinates from the frontend.
    pub fn pointer_input(&self) -> Coords<i16> {
        self.pointer_raw_position
    }

    pub fn pointer_touch_position(&self) -> Coords<i32> {
        self.pointer_touch_position
    }

    pub fn joystick_touch_position(&self) -> Coords<i32> {
        self.joystick_cursor_position
    }

    pub fn joystick_raw_direction(&self) -> Coords<i16> {
        self.joystick_raw_direction
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    pub fn touch_mode(&self) -> TouchMode {
        self.touch_mode
    }

    pub fn max_cursor_timeout(&self) -> u32 {
        self.max_cursor_timeout
    }

    pub fn set_cursor_mode(&mut self, mode: CursorMode) {
        if mode != self.cursor_mode {
            self.cursor_settings_dirty = true;
        }
        self.cursor_mode = mode;
    }

    pub fn set_touch_mode(&mut self, mode: TouchMode) {
        if mode != self.touch_mode {
            self.cursor_settings_dirty = true;
        }
        self.touch_mode = mode;
    }

    pub fn set_max_cursor_timeout(&mut self, timeout: u32) {
        if timeout != self.max_cursor_timeout {
            self.cursor_settings_dirty = true;
        }
        self.max_cursor_timeout = timeout;
    }

    /// Cursor settings have changed and not yet been applied.
    pub fn settings_dirty(&self) -> bool {
        self.cursor_settings_dirty
    }

    /// Returns true if the settings were dirty, and marks them as applied.
    pub fn take_settings_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.cursor_settings_dirty, false)
    }

    /// Reset the idle counter, showing the cursor again.
    pub fn reset_cursor_timeout(&mut self) {
        self.cursor_timeout = 0;
    }
}

// Internal
impl InputState {
    fn update_buttons(&mut self, source: &impl InputSource) {
        let mut console_buttons = ConsoleButtons::default();
        let mut toggle_lid = false;
        let mut mic = false;
        let mut cycle_previous_layout = false;
        let mut cycle_next_layout = false;
        let mut joystick_touch = false;

        for button in RetroButton::ALL {
            if !source.joypad(button) {
                continue;
            }
            match self.button_map.action(button) {
                Some(Action::Console(buttons))          => console_buttons |= buttons,
                Some(Action::ToggleLid)                 => toggle_lid = true,
                Some(Action::Microphone)                => mic = true,
                Some(Action::CyclePreviousLayout)       => cycle_previous_layout = true,
                Some(Action::CycleNextLayout)           => cycle_next_layout = true,
                Some(Action::JoystickTouch)             => joystick_touch = true,
                None => {},
            }
        }

        self.console_buttons = console_buttons;
        self.toggle_lid.update(toggle_lid);
        self.mic.update(mic);
        self.cycle_previous_layout.update(cycle_previous_layout);
        self.cycle_next_layout.update(cycle_next_layout);
        if self.touch_mode.joystick_enabled() {
            self.joystick_touch.update(joystick_touch);
        }
    }

    /// Returns true if the pointer moved.
    fn update_pointer(&mut self, source: &impl InputSource, geometry: &BufferGeometry) -> bool {
        let sample = source.pointer();
        let raw_position = Coords{x: sample.x, y: sample.y};
        let moved = raw_position != self.pointer_raw_position;
        self.pointer_raw_position = raw_position;
        self.pointer_touch.update(sample.pressed);

        let buffer_x = ((sample.x as i32 + POINTER_BIAS) * geometry.width as i32) / POINTER_RANGE;
        let buffer_y = ((sample.y as i32 + POINTER_BIAS) * geometry.height as i32) / POINTER_RANGE;
        if let Some(position) = self.hybrid_small_touch_position(buffer_x, buffer_y, geometry) {
            self.pointer_in_bounds = true;
            self.pointer_touch_position = position;
        } else {
            self.update_pointer_position(buffer_x, buffer_y, geometry);
        }

        if moved {
            self.pointer_timestamp = self.frame;
        }
        moved
    }

    fn update_pointer_position(&mut self, buffer_x: i32, buffer_y: i32, geometry: &BufferGeometry) {
        let touch_x = buffer_x - geometry.touch_offset_x as i32;
        let touch_y = buffer_y - geometry.touch_offset_y as i32;
        let touch_scale = geometry.touch_scale() as i32;
        let screen_width = geometry.screen_width as i32;
        let screen_height = geometry.screen_height as i32;

        self.pointer_in_bounds = (0..(screen_width * touch_scale)).contains(&touch_x) &&
            (0..(screen_height * touch_scale)).contains(&touch_y);
        self.pointer_touch_position = Coords {
            x: touch_x.div_euclid(touch_scale).clamp(0, screen_width - 1),
            y: touch_y.div_euclid(touch_scale).clamp(0, screen_height - 1),
        };
    }

    /// Position on the unscaled copy of the touchscreen in HybridBottom,
    /// if the pointer is over it.
    fn hybrid_small_touch_position(&self, buffer_x: i32, buffer_y: i32, geometry: &BufferGeometry) -> Option<Coords<i32>> {
        if !self.hybrid_small_touch || geometry.layout != ScreenLayout::HybridBottom {
            return None;
        }
        let offset = geometry.hybrid_screen_offset(ScreenId::Bottom);
        let row_pixels = geometry.row_pixels();
        let x = buffer_x - (offset % row_pixels) as i32;
        let y = buffer_y - (offset / row_pixels) as i32;
        if (0..geometry.screen_width as i32).contains(&x) && (0..geometry.screen_height as i32).contains(&y) {
            Some(Coords{x, y})
        } else {
            None
        }
    }

    /// Returns true if the joystick cursor moved.
    fn update_joystick(&mut self, source: &impl InputSource) -> bool {
        let (x, y) = source.right_analog();
        self.joystick_raw_direction = Coords{x, y};

        let delta_x = ((x as f32 / ANALOG_DIVISOR) * self.sensitivity) as i32;
        let delta_y = ((y as f32 / ANALOG_DIVISOR) * self.sensitivity) as i32;
        let old_position = self.joystick_cursor_position;
        self.joystick_cursor_position = Coords {
            x: (old_position.x + delta_x).clamp(0, H_RES as i32 - 1),
            y: (old_position.y + delta_y).clamp(0, V_RES as i32 - 1),
        };

        let moved = self.joystick_cursor_position != old_position;
        if moved {
            self.joystick_timestamp = self.frame;
        }
        moved
    }

    fn joystick_controls_cursor(&self) -> bool {
        match self.touch_mode {
            TouchMode::Joystick => true,
            TouchMode::Auto => self.joystick_timestamp > self.pointer_timestamp,
            TouchMode::Pointer | TouchMode::Disabled => false,
        }
    }

    fn is_cursor_input_in_bounds(&self) -> bool {
        match self.touch_mode {
            TouchMode::Disabled => false,
            _ if self.joystick_controls_cursor() => true,
            _ => self.pointer_in_bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ScreenLayout, Renderer};

    fn geometry(layout: ScreenLayout) -> BufferGeometry {
        BufferGeometry::new(layout, Renderer::Software, 1, 2, 0)
    }

    fn config(touch_mode: TouchMode) -> CoreConfig {
        CoreConfig {
            touch_mode,
            cursor_mode: CursorMode::Timeout,
            cursor_timeout: 60,
            ..CoreConfig::default()
        }
    }

    /// Raw pointer coordinate for a buffer pixel.
    fn raw_coord(pixel: usize, size: usize) -> i16 {
        (((pixel as i32 * POINTER_RANGE) / size as i32) - POINTER_BIAS + 1) as i16
    }

    fn pointer_at(x: usize, y: usize, pressed: bool, geometry: &BufferGeometry) -> RawInput {
        RawInput {
            pointer: PointerSample {
                x: raw_coord(x, geometry.width),
                y: raw_coord(y, geometry.height),
                pressed
            },
            ..RawInput::default()
        }
    }

    #[test]
    fn test_pointer_touch() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut input = InputState::new(&config(TouchMode::Pointer));

        input.update(&pointer_at(100, 192 + 50, true, &geometry), &geometry);
        assert!(input.is_touching_screen());
        assert!(input.screen_touched());
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 100, y: 50}));
        assert!(input.cursor_visible());

        // Pointer on the top screen clamps to the bottom screen's edge.
        input.update(&pointer_at(100, 20, true, &geometry), &geometry);
        assert!(!input.screen_touched());
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 100, y: 0}));
        assert!(!input.cursor_visible());

        input.update(&pointer_at(100, 20, false, &geometry), &geometry);
        assert!(input.screen_released());
        assert_eq!(input.console_touch_coordinates(&geometry), None);
    }

    #[test]
    fn test_pointer_extremes() {
        let geometry = geometry(ScreenLayout::LeftRight);
        let mut input = InputState::new(&config(TouchMode::Pointer));

        let mut raw = RawInput::default();
        raw.pointer = PointerSample{x: i16::MAX, y: i16::MAX, pressed: true};
        input.update(&raw, &geometry);
        assert_eq!(input.pointer_input(), Coords{x: i16::MAX, y: i16::MAX});
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 255, y: 191}));

        raw.pointer = PointerSample{x: i16::MIN, y: i16::MIN, pressed: true};
        input.update(&raw, &geometry);
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 0, y: 0}));
    }

    #[test]
    fn test_pointer_hybrid_bottom() {
        let geometry = geometry(ScreenLayout::HybridBottom);
        let mut input = InputState::new(&config(TouchMode::Pointer));

        input.update(&pointer_at(200, 300, true, &geometry), &geometry);
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 100, y: 150}));
        assert!(input.cursor_visible());

        // The small top screen is outside the touchscreen.
        input.update(&pointer_at(600, 100, true, &geometry), &geometry);
        assert!(!input.cursor_visible());
    }

    #[test]
    fn test_pointer_hybrid_bottom_small_screen() {
        let geometry = geometry(ScreenLayout::HybridBottom);
        let mut input = InputState::new(&config(TouchMode::Pointer));

        // The small bottom screen starts at column 513, row 192.
        input.update(&pointer_at(513 + 10, 192 + 10, true, &geometry), &geometry);
        assert_eq!(input.pointer_touch_position(), Coords{x: 10, y: 10});
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 10, y: 10}));
        assert!(input.cursor_visible());

        // Without the duplicate, that part of the buffer is empty.
        let mut config = config(TouchMode::Pointer);
        config.hybrid_small_screen = HybridSmallScreen::One;
        input.apply(&config);
        input.update(&pointer_at(513 + 10, 192 + 10, true, &geometry), &geometry);
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 255, y: 101}));
        assert!(!input.cursor_visible());
    }

    #[test]
    fn test_pointer_hybrid_top() {
        let geometry = geometry(ScreenLayout::HybridTop);
        let mut input = InputState::new(&config(TouchMode::Pointer));

        input.update(&pointer_at(513 + 10, 192 + 20, true, &geometry), &geometry);
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 10, y: 20}));
    }

    #[test]
    fn test_gl_scale() {
        let geometry = BufferGeometry::new(ScreenLayout::TopBottom, Renderer::OpenGl, 4, 2, 0);
        let mut input = InputState::new(&config(TouchMode::Pointer));

        input.update(&pointer_at(400, 768 + 200, true, &geometry), &geometry);
        assert_eq!(input.pointer_touch_position(), Coords{x: 400, y: 200});
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 100, y: 50}));
    }

    #[test]
    fn test_joystick() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut input = InputState::new(&config(TouchMode::Joystick));
        let mut raw = RawInput::default();

        raw.right_analog = (0x4000, -0x4000);
        input.update(&raw, &geometry);
        assert_eq!(input.joystick_raw_direction(), Coords{x: 0x4000, y: -0x4000});
        assert_eq!(input.joystick_touch_position(), Coords{x: 128 + 8, y: 96 - 8});
        assert_eq!(input.console_touch_coordinates(&geometry), None);

        raw.right_analog = (i16::MAX, i16::MAX);
        for _ in 0..20 {
            input.update(&raw, &geometry);
        }
        assert_eq!(input.joystick_touch_position(), Coords{x: 255, y: 191});

        raw.right_analog = (0, 0);
        raw.set_button(RetroButton::R3, true);
        input.update(&raw, &geometry);
        assert!(input.screen_touched());
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 255, y: 191}));
        assert_eq!(input.touch_position(&geometry), Coords{x: 255, y: 191});

        raw.set_button(RetroButton::R3, false);
        input.update(&raw, &geometry);
        assert!(input.screen_released());
    }

    #[test]
    fn test_sensitivity() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut config = config(TouchMode::Joystick);
        config.joystick_sensitivity = 0.5;
        let mut input = InputState::new(&config);
        let mut raw = RawInput::default();

        raw.right_analog = (0x4000, 0);
        input.update(&raw, &geometry);
        assert_eq!(input.joystick_touch_position(), Coords{x: 128 + 4, y: 96});
    }

    #[test]
    fn test_pointer_preferred() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut input = InputState::new(&config(TouchMode::Auto));

        let mut raw = pointer_at(10, 192 + 10, true, &geometry);
        raw.set_button(RetroButton::R3, true);
        input.update(&raw, &geometry);
        assert!(input.pointer_touch().down());
        assert!(input.joystick_touch().down());
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 10, y: 10}));

        raw.pointer.pressed = false;
        input.update(&raw, &geometry);
        assert_eq!(input.console_touch_coordinates(&geometry), Some(TouchPoint{x: 128, y: 96}));
    }

    #[test]
    fn test_auto_cursor_follows_last_moved() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut input = InputState::new(&config(TouchMode::Auto));

        let mut raw = pointer_at(10, 192 + 10, false, &geometry);
        input.update(&raw, &geometry);
        assert_eq!(input.touch_position(&geometry), Coords{x: 10, y: 10});

        raw.right_analog = (0x4000, 0);
        input.update(&raw, &geometry);
        assert_eq!(input.touch_position(&geometry), Coords{x: 136, y: 96});

        raw.right_analog = (0, 0);
        raw.pointer = pointer_at(20, 192 + 10, false, &geometry).pointer;
        input.update(&raw, &geometry);
        assert_eq!(input.touch_position(&geometry), Coords{x: 20, y: 10});
    }

    #[test]
    fn test_touch_disabled() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut input = InputState::new(&config(TouchMode::Disabled));

        let mut raw = pointer_at(10, 192 + 10, true, &geometry);
        raw.set_button(RetroButton::R3, true);
        input.update(&raw, &geometry);
        assert!(!input.is_touching_screen());
        assert_eq!(input.console_touch_coordinates(&geometry), None);
        assert!(!input.cursor_visible());
    }

    #[test]
    fn test_touch_edges() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut input = InputState::new(&config(TouchMode::Pointer));

        let mut touched = 0;
        let mut released = 0;
        for pressed in [false, true, true, false] {
            input.update(&pointer_at(50, 250, pressed, &geometry), &geometry);
            touched += input.screen_touched() as usize;
            released += input.screen_released() as usize;
        }
        assert_eq!(touched, 1);
        assert_eq!(released, 1);
    }

    #[test]
    fn test_idle_timeout() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut input = InputState::new(&config(TouchMode::Joystick));
        let mut raw = RawInput::default();

        raw.right_analog = (0x4000, 0);
        input.update(&raw, &geometry);
        assert!(input.cursor_visible());

        raw.right_analog = (0, 0);
        for _ in 0..60 {
            input.update(&raw, &geometry);
            assert!(input.cursor_visible());
        }
        input.update(&raw, &geometry);
        assert!(!input.cursor_visible());

        raw.set_button(RetroButton::R3, true);
        input.update(&raw, &geometry);
        assert!(input.cursor_visible());
    }

    #[test]
    fn test_idle_timeout_reset_by_movement() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut input = InputState::new(&config(TouchMode::Auto));
        let mut raw = RawInput::default();

        for _ in 0..61 {
            input.update(&raw, &geometry);
        }
        assert!(!input.cursor_visible());

        raw.right_analog = (0x4000, 0);
        input.update(&raw, &geometry);
        assert!(input.cursor_visible());

        raw.right_analog = (0, 0);
        for _ in 0..61 {
            input.update(&raw, &geometry);
        }
        assert!(!input.cursor_visible());

        raw.pointer = pointer_at(20, 192 + 20, false, &geometry).pointer;
        input.update(&raw, &geometry);
        assert!(input.cursor_visible());
    }

    #[test]
    fn test_no_timeout() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut config = config(TouchMode::Joystick);
        config.cursor_timeout = 0;
        let mut input = InputState::new(&config);

        for _ in 0..1000 {
            input.update(&RawInput::default(), &geometry);
        }
        assert!(input.cursor_visible());
    }

    #[test]
    fn test_cursor_modes() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut input = InputState::new(&config(TouchMode::Joystick));
        let mut raw = RawInput::default();

        input.set_cursor_mode(CursorMode::Never);
        input.update(&raw, &geometry);
        assert!(!input.cursor_visible());

        input.set_cursor_mode(CursorMode::Touching);
        input.update(&raw, &geometry);
        assert!(!input.cursor_visible());
        raw.set_button(RetroButton::R3, true);
        input.update(&raw, &geometry);
        assert!(input.cursor_visible());

        input.set_cursor_mode(CursorMode::Always);
        raw.set_button(RetroButton::R3, false);
        for _ in 0..100 {
            input.update(&raw, &geometry);
        }
        assert!(input.cursor_visible());
    }

    #[test]
    fn test_buttons() {
        let geometry = geometry(ScreenLayout::TopBottom);
        let mut input = InputState::new(&config(TouchMode::Pointer));
        let mut raw = RawInput::default();

        raw.set_button(RetroButton::A, true);
        raw.set_button(RetroButton::Up, true);
        raw.set_button(RetroButton::L3, true);
        input.update(&raw, &geometry);
        assert_eq!(input.console_buttons(), ConsoleButtons::A | ConsoleButtons::UP);
        assert!(input.toggle_lid().pressed());

        raw.set_button(RetroButton::A, false);
        raw.set_button(RetroButton::L2, true);
        input.update(&raw, &geometry);
        assert_eq!(input.console_buttons(), ConsoleButtons::UP);
        assert!(input.toggle_lid().down());
        assert!(!input.toggle_lid().pressed());
        assert!(input.mic().pressed());

        raw.set_button(RetroButton::L3, false);
        raw.set_button(RetroButton::R2, true);
        input.update(&raw, &geometry);
        assert!(input.toggle_lid().released());
        assert!(input.cycle_next_layout().pressed());
        assert!(!input.cycle_previous_layout().down());
    }

    #[test]
    fn test_settings_dirty() {
        let mut config = config(TouchMode::Pointer);
        let mut input = InputState::new(&config);
        assert!(input.take_settings_dirty());
        assert!(!input.settings_dirty());

        input.apply(&config);
        assert!(!input.settings_dirty());

        input.set_max_cursor_timeout(60);
        assert!(!input.settings_dirty());

        config.cursor_mode = CursorMode::Always;
        input.apply(&config);
        assert!(input.settings_dirty());
        assert!(input.settings_dirty());
        assert!(input.take_settings_dirty());
        assert!(!input.settings_dirty());

        input.set_touch_mode(TouchMode::Joystick);
        assert!(input.settings_dirty());
    }
}
