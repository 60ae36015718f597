//! Buttons on the X4 resistance ladders and what they mean to the viewer.
//!
//! Each ladder is read via ADC and decoded by comparing the millivolt
//! reading against known thresholds.

/// Physical buttons reachable through the two ADC ladders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    // Row 1 - GPIO1
    Right,
    Left,
    Confirm,
    Back,
    // Row 2 - GPIO2
    VolUp,
    VolDown,
}

/// What the stream view does with a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    ScrollDown,
    ScrollUp,
    /// restart the session at chunk 0
    Reopen,
    /// end the session; later scrolls are ignored
    Close,
}

impl Button {
    pub const fn name(self) -> &'static str {
        match self {
            Button::Right => "Right",
            Button::Left => "Left",
            Button::Confirm => "Confirm",
            Button::Back => "Back",
            Button::VolUp => "Vol Up",
            Button::VolDown => "Vol Down",
        }
    }

    pub const fn action(self) -> ViewAction {
        match self {
            Button::Right | Button::VolDown => ViewAction::ScrollDown,
            Button::Left | Button::VolUp => ViewAction::ScrollUp,
            Button::Confirm => ViewAction::Reopen,
            Button::Back => ViewAction::Close,
        }
    }

    // held buttons repeat only when scrolling
    pub const fn repeats(self) -> bool {
        matches!(self.action(), ViewAction::ScrollDown | ViewAction::ScrollUp)
    }
}

impl core::fmt::Display for Button {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// (center_mv, tolerance_mv, button); matches center +/- tolerance
pub const DEFAULT_TOLERANCE: u16 = 150;

pub const ROW1_THRESHOLDS: &[(u16, u16, Button)] = &[
    (3, 50, Button::Right), // near ground
    (1113, DEFAULT_TOLERANCE, Button::Left),
    (1984, DEFAULT_TOLERANCE, Button::Back),
    (2556, DEFAULT_TOLERANCE, Button::Confirm),
];

pub const ROW2_THRESHOLDS: &[(u16, u16, Button)] = &[
    (3, 50, Button::VolDown), // near ground
    (1659, DEFAULT_TOLERANCE, Button::VolUp),
];

pub fn decode_ladder(mv: u16, thresholds: &[(u16, u16, Button)]) -> Option<Button> {
    thresholds
        .iter()
        .find(|&&(center, tolerance, _)| {
            mv >= center.saturating_sub(tolerance) && mv <= center.saturating_add(tolerance)
        })
        .map(|&(_, _, button)| button)
}
