//! Edge detection for digital inputs.

/// The state of a digital input for this frame and the one before.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    current:    bool,
    previous:   bool,
}

impl ButtonState {
    /// Start a new frame.
    pub fn update(&mut self, down: bool) {
        self.previous = self.current;
        self.current = down;
    }

    /// Held this frame.
    pub fn down(&self) -> bool {
        self.current
    }

    /// Went down this frame.
    pub fn pressed(&self) -> bool {
        self.current && !self.previous
    }

    /// Went up this frame.
    pub fn released(&self) -> bool {
        !self.current && self.previous
    }
}
