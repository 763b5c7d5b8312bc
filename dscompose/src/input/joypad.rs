//! Mapping frontend buttons to console buttons.

use bitflags::bitflags;
use crate::common::bits::u32;

/// Frontend joypad buttons, in libretro order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RetroButton {
    B,
    Y,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
    A,
    X,
    L,
    R,
    L2,
    R2,
    L3,
    R3
}

impl RetroButton {
    pub const ALL: [RetroButton; 16] = [
        RetroButton::B, RetroButton::Y, RetroButton::Select, RetroButton::Start,
        RetroButton::Up, RetroButton::Down, RetroButton::Left, RetroButton::Right,
        RetroButton::A, RetroButton::X, RetroButton::L, RetroButton::R,
        RetroButton::L2, RetroButton::R2, RetroButton::L3, RetroButton::R3,
    ];

    /// Libretro joypad ID.
    pub fn id(self) -> usize {
        self as usize
    }
}

bitflags!{
    /// Console keys, as set in the key mask.
    #[derive(Default)]
    pub struct ConsoleButtons: u32 {
        const Y         = u32::bit(11);
        const X         = u32::bit(10);
        const L         = u32::bit(9);
        const R         = u32::bit(8);
        const DOWN      = u32::bit(7);
        const UP        = u32::bit(6);
        const LEFT      = u32::bit(5);
        const RIGHT     = u32::bit(4);
        const START     = u32::bit(3);
        const SELECT    = u32::bit(2);
        const B         = u32::bit(1);
        const A         = u32::bit(0);
    }
}

impl ConsoleButtons {
    /// The console reads keys active-low.
    pub fn key_mask(self) -> u32 {
        !self.bits() & u32::bits(0, 11)
    }
}

/// What a frontend button does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Console(ConsoleButtons),
    ToggleLid,
    Microphone,
    CyclePreviousLayout,
    CycleNextLayout,
    /// Touch the screen at the joystick cursor.
    JoystickTouch,
}

/// Action for each frontend button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonMap {
    actions: [Option<Action>; 16],
}

impl ButtonMap {
    /// A map with nothing bound.
    pub fn empty() -> Self {
        Self {
            actions: [None; 16]
        }
    }

    pub fn action(&self, button: RetroButton) -> Option<Action> {
        self.actions[button.id()]
    }

    pub fn set(&mut self, button: RetroButton, action: Option<Action>) {
        self.actions[button.id()] = action;
    }
}

impl Default for ButtonMap {
    fn default() -> Self {
        use RetroButton::*;
        let mut map = Self::empty();
        let console = [
            (A, ConsoleButtons::A),
            (B, ConsoleButtons::B),
            (X, ConsoleButtons::X),
            (Y, ConsoleButtons::Y),
            (L, ConsoleButtons::L),
            (R, ConsoleButtons::R),
            (Select, ConsoleButtons::SELECT),
            (Start, ConsoleButtons::START),
            (Up, ConsoleButtons::UP),
            (Down, ConsoleButtons::DOWN),
            (Left, ConsoleButtons::LEFT),
            (Right, ConsoleButtons::RIGHT),
        ];
        for (button, console_button) in console {
            map.set(button, Some(Action::Console(console_button)));
        }
        map.set(L2, Some(Action::Microphone));
        map.set(R2, Some(Action::CycleNextLayout));
        map.set(L3, Some(Action::ToggleLid));
        map.set(R3, Some(Action::JoystickTouch));
        map
    }
}
