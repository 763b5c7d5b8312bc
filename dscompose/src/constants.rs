//! Constants for video and timing.

/// DS video and audio constants.
pub mod ds {
    /// Visible horizontal resolution of a single screen.
    pub const H_RES: usize = 256;
    /// Visible vertical resolution of a single screen.
    pub const V_RES: usize = 192;

    /// Bytes per pixel. Output is always XRGB8888.
    pub const PIXEL_SIZE: usize = 4;

    /// Cycles for the ARM7 to run a whole frame.
    const FRAME_CYCLES: f64 = 560190.0;
    /// ARM7 clock rate.
    const CLOCK_RATE: f64 = 32.0 * 1024.0 * 1024.0;
    /// Frames per second.
    pub const FPS: f64 = CLOCK_RATE / FRAME_CYCLES;
    /// Native audio output rate.
    pub const SAMPLE_RATE: f64 = 32.0 * 1024.0;
}

/// Libretro-side constants.
pub mod retro {
    /// Pointer coordinates are reported in the range -0x7FFF to 0x7FFF.
    pub const POINTER_RANGE: i32 = 0x10000;
    pub const POINTER_BIAS: i32 = 0x8000;

    /// Analog stick values are divided by this to get a per-frame cursor delta.
    pub const ANALOG_DIVISOR: f32 = 2048.0;
}

/// Renderer constants.
pub mod render {
    /// The hardware renderer needs at least this scale to avoid artifacts.
    pub const MIN_GL_SCALE: usize = 4;
}
