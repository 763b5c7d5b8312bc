//! Core options.
//!
//! Option values arrive from the frontend as strings, and are parsed into
//! the types used by the layout engine and input translator.

use std::str::FromStr;

use crate::{
    layout::{ScreenLayout, Renderer},
    input::{CursorMode, TouchMode, ButtonMap},
};

/// Hybrid ratios supported by the layout engine.
pub const HYBRID_RATIOS: std::ops::RangeInclusive<usize> = 2..=3;
/// Scale factors supported by the hardware renderer.
pub const SCALE_FACTORS: std::ops::RangeInclusive<usize> = 1..=8;
/// Cursor half-widths, in touchscreen pixels.
pub const CURSOR_SIZES: std::ops::RangeInclusive<usize> = 1..=32;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Option string did not name a known value.
    #[error("unknown {option} '{value}'")]
    UnknownValue {
        option: &'static str,
        value:  String,
    },
    /// Numeric option out of range.
    #[error("{option} must be between {min} and {max} (got {value})")]
    OutOfRange {
        option: &'static str,
        value:  usize,
        min:    usize,
        max:    usize,
    },
    #[error("at least one screen layout is needed")]
    NoLayouts,
    #[error("joystick sensitivity must be positive")]
    InvalidSensitivity,
}

/// What to draw in the small screen slots of a hybrid layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HybridSmallScreen {
    /// Only the screen that isn't magnified.
    One,
    /// The magnified screen is duplicated in the other slot.
    Both,
}

/// Options for the layout engine and input translator.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    /// Layouts to cycle through. The first one is used at startup.
    pub layouts:                Vec<ScreenLayout>,
    /// Switch the top and bottom screens in every layout.
    pub swap_screens:           bool,
    pub renderer:               Renderer,
    /// Internal resolution multiplier for the hardware renderer.
    pub scale_factor:           usize,
    /// Gap between stacked screens, in native pixels.
    pub screen_gap:             usize,
    pub hybrid_ratio:           usize,
    pub hybrid_small_screen:    HybridSmallScreen,

    pub cursor_mode:            CursorMode,
    pub cursor_size:            u32,
    /// Idle frames before the cursor hides. 0 never hides it.
    pub cursor_timeout:         u32,
    pub touch_mode:             TouchMode,
    pub joystick_sensitivity:   f32,
    pub button_map:             ButtonMap,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            layouts:                vec![ScreenLayout::TopBottom],
            swap_screens:           false,
            renderer:               Renderer::Software,
            scale_factor:           1,
            screen_gap:             0,
            hybrid_ratio:           2,
            hybrid_small_screen:    HybridSmallScreen::Both,

            cursor_mode:            CursorMode::Timeout,
            cursor_size:            2,
            cursor_timeout:         3 * 60,
            touch_mode:             TouchMode::Auto,
            joystick_sensitivity:   1.0,
            button_map:             ButtonMap::default(),
        }
    }
}

impl CoreConfig {
    /// Check every option is within the range the core supports.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layouts.is_empty() {
            return Err(ConfigError::NoLayouts);
        }
        check_range("hybrid ratio", self.hybrid_ratio, HYBRID_RATIOS)?;
        check_range("scale factor", self.scale_factor, SCALE_FACTORS)?;
        check_range("cursor size", self.cursor_size as usize, CURSOR_SIZES)?;
        if !(self.joystick_sensitivity > 0.0) {
            return Err(ConfigError::InvalidSensitivity);
        }
        Ok(())
    }
}

fn check_range(option: &'static str, value: usize, range: std::ops::RangeInclusive<usize>) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            option, value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

fn unknown(option: &'static str, value: &str) -> ConfigError {
    ConfigError::UnknownValue {
        option,
        value: value.to_string()
    }
}

impl FromStr for ScreenLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ScreenLayout::*;
        match s {
            "top-bottom"    => Ok(TopBottom),
            "bottom-top"    => Ok(BottomTop),
            "left-right"    => Ok(LeftRight),
            "right-left"    => Ok(RightLeft),
            "top"           => Ok(TopOnly),
            "bottom"        => Ok(BottomOnly),
            "hybrid-top"    => Ok(HybridTop),
            "hybrid-bottom" => Ok(HybridBottom),
            _ => Err(unknown("screen layout", s)),
        }
    }
}

impl FromStr for Renderer {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "software"  => Ok(Renderer::Software),
            "opengl"    => Ok(Renderer::OpenGl),
            _ => Err(unknown("renderer", s)),
        }
    }
}

impl FromStr for CursorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled"  => Ok(CursorMode::Never),
            "touching"  => Ok(CursorMode::Touching),
            "timeout"   => Ok(CursorMode::Timeout),
            "always"    => Ok(CursorMode::Always),
            _ => Err(unknown("cursor mode", s)),
        }
    }
}

impl FromStr for TouchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disabled"  => Ok(TouchMode::Disabled),
            "pointer"   => Ok(TouchMode::Pointer),
            "joystick"  => Ok(TouchMode::Joystick),
            "auto"      => Ok(TouchMode::Auto),
            _ => Err(unknown("touch mode", s)),
        }
    }
}

impl FromStr for HybridSmallScreen {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one"   => Ok(HybridSmallScreen::One),
            "both"  => Ok(HybridSmallScreen::Both),
            _ => Err(unknown("hybrid small screen", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_valid() {
        assert_eq!(CoreConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate() {
        let config = CoreConfig {
            hybrid_ratio: 4,
            ..CoreConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::OutOfRange {
            option: "hybrid ratio", value: 4, min: 2, max: 3
        }));

        let config = CoreConfig {
            layouts: Vec::new(),
            ..CoreConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoLayouts));

        let config = CoreConfig {
            scale_factor: 0,
            ..CoreConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CoreConfig {
            joystick_sensitivity: 0.0,
            ..CoreConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidSensitivity));
    }

    #[test]
    fn test_parse() {
        assert_eq!("hybrid-bottom".parse::<ScreenLayout>(), Ok(ScreenLayout::HybridBottom));
        assert_eq!("top".parse::<ScreenLayout>(), Ok(ScreenLayout::TopOnly));
        assert_eq!("opengl".parse::<Renderer>(), Ok(Renderer::OpenGl));
        assert_eq!("disabled".parse::<CursorMode>(), Ok(CursorMode::Never));
        assert_eq!("auto".parse::<TouchMode>(), Ok(TouchMode::Auto));
        assert_eq!("one".parse::<HybridSmallScreen>(), Ok(HybridSmallScreen::One));

        let err = "sideways".parse::<ScreenLayout>().unwrap_err();
        assert_eq!(err.to_string(), "unknown screen layout 'sideways'");
    }
}
