//! Screen compositing and input translation for a DS emulator frontend.
//!
//! The two DS screens are arranged into a single output buffer according
//! to a `ScreenLayout`, and frontend input is turned into console button
//! and touchscreen state.

mod common;
mod constants;

pub mod config;
pub mod layout;
pub mod input;
pub mod session;

pub use config::{CoreConfig, ConfigError, HybridSmallScreen};
pub use layout::{
    ScreenLayout, Renderer, Screen, ScreenId, ScreenLayoutData, BufferGeometry, PixelBuffer, AvInfo
};
pub use input::{
    InputState, InputSource, RawInput, PointerSample, ButtonState,
    RetroButton, ConsoleButtons, ButtonMap, Action,
    CursorMode, TouchMode
};
pub use session::{Session, Console, FrameView};
pub use constants::ds::{H_RES, V_RES};

/// A pair of coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coords<T> {
    pub x: T,
    pub y: T
}

/// A position on the touchscreen, in console pixels.
pub type TouchPoint = Coords<u32>;
