//! Raw input from the frontend.

use super::joypad::RetroButton;

/// Absolute pointer position for one frame.
///
/// Coordinates span -0x7FFF to 0x7FFF across the whole output buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerSample {
    pub x: i16,
    pub y: i16,
    /// The frontend reports a valid press this frame.
    pub pressed: bool,
}

/// Polled once per frame for the current state of each input device.
pub trait InputSource {
    fn joypad(&self, button: RetroButton) -> bool;
    fn pointer(&self) -> PointerSample;
    /// Right analog stick (x, y).
    fn right_analog(&self) -> (i16, i16);
}

/// A captured set of input for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawInput {
    /// One bit per `RetroButton`.
    pub joypad:         u16,
    pub pointer:        PointerSample,
    pub right_analog:   (i16, i16),
}

impl RawInput {
    pub fn set_button(&mut self, button: RetroButton, pressed: bool) {
        let bit = 1 << button.id();
        if pressed {
            self.joypad |= bit;
        } else {
            self.joypad &= !bit;
        }
    }
}

impl InputSource for RawInput {
    fn joypad(&self, button: RetroButton) -> bool {
        (self.joypad & (1 << button.id())) != 0
    }

    fn pointer(&self) -> PointerSample {
        self.pointer
    }

    fn right_analog(&self) -> (i16, i16) {
        self.right_analog
    }
}
