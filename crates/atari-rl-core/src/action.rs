//! Controller and meta actions with their fixed engine wire codes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A controller or meta action understood by the emulation engine.
///
/// The discriminants are the engine's wire codes and must never be
/// renumbered: the engine interprets raw integers, not names. Codes 0-17
/// drive the player A joystick, 18-35 the player B joystick, and 40-45 are
/// meta actions. Codes 36-39 and everything past 45 are unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum Action {
    PlayerANoop = 0,
    PlayerAFire = 1,
    PlayerAUp = 2,
    PlayerARight = 3,
    PlayerALeft = 4,
    PlayerADown = 5,
    PlayerAUpRight = 6,
    PlayerAUpLeft = 7,
    PlayerADownRight = 8,
    PlayerADownLeft = 9,
    PlayerAUpFire = 10,
    PlayerARightFire = 11,
    PlayerALeftFire = 12,
    PlayerADownFire = 13,
    PlayerAUpRightFire = 14,
    PlayerAUpLeftFire = 15,
    PlayerADownRightFire = 16,
    PlayerADownLeftFire = 17,
    PlayerBNoop = 18,
    PlayerBFire = 19,
    PlayerBUp = 20,
    PlayerBRight = 21,
    PlayerBLeft = 22,
    PlayerBDown = 23,
    PlayerBUpRight = 24,
    PlayerBUpLeft = 25,
    PlayerBDownRight = 26,
    PlayerBDownLeft = 27,
    PlayerBUpFire = 28,
    PlayerBRightFire = 29,
    PlayerBLeftFire = 30,
    PlayerBDownFire = 31,
    PlayerBUpRightFire = 32,
    PlayerBUpLeftFire = 33,
    PlayerBDownRightFire = 34,
    PlayerBDownLeftFire = 35,
    /// In-game reset button. Use [`Action::SystemReset`] to reset the console.
    Reset = 40,
    Undefined = 41,
    Random = 42,
    SaveState = 43,
    LoadState = 44,
    SystemReset = 45,
}

impl Action {
    /// Every action, in wire-code order.
    pub const ALL: [Action; 42] = [
        Action::PlayerANoop,
        Action::PlayerAFire,
        Action::PlayerAUp,
        Action::PlayerARight,
        Action::PlayerALeft,
        Action::PlayerADown,
        Action::PlayerAUpRight,
        Action::PlayerAUpLeft,
        Action::PlayerADownRight,
        Action::PlayerADownLeft,
        Action::PlayerAUpFire,
        Action::PlayerARightFire,
        Action::PlayerALeftFire,
        Action::PlayerADownFire,
        Action::PlayerAUpRightFire,
        Action::PlayerAUpLeftFire,
        Action::PlayerADownRightFire,
        Action::PlayerADownLeftFire,
        Action::PlayerBNoop,
        Action::PlayerBFire,
        Action::PlayerBUp,
        Action::PlayerBRight,
        Action::PlayerBLeft,
        Action::PlayerBDown,
        Action::PlayerBUpRight,
        Action::PlayerBUpLeft,
        Action::PlayerBDownRight,
        Action::PlayerBDownLeft,
        Action::PlayerBUpFire,
        Action::PlayerBRightFire,
        Action::PlayerBLeftFire,
        Action::PlayerBDownFire,
        Action::PlayerBUpRightFire,
        Action::PlayerBUpLeftFire,
        Action::PlayerBDownRightFire,
        Action::PlayerBDownLeftFire,
        Action::Reset,
        Action::Undefined,
        Action::Random,
        Action::SaveState,
        Action::LoadState,
        Action::SystemReset,
    ];

    /// The engine wire code for this action.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Map an engine wire code back to its action.
    ///
    /// Returns `None` for unassigned codes. Callers translating
    /// engine-reported sets drop unknown codes rather than failing; see the
    /// legal-action query in `ale-bridge`.
    pub fn from_code(code: i32) -> Option<Action> {
        Action::ALL.iter().copied().find(|action| action.code() == code)
    }

    /// Canonical lower-snake name, matching the serde representation.
    pub const fn name(self) -> &'static str {
        match self {
            Action::PlayerANoop => "player_a_noop",
            Action::PlayerAFire => "player_a_fire",
            Action::PlayerAUp => "player_a_up",
            Action::PlayerARight => "player_a_right",
            Action::PlayerALeft => "player_a_left",
            Action::PlayerADown => "player_a_down",
            Action::PlayerAUpRight => "player_a_up_right",
            Action::PlayerAUpLeft => "player_a_up_left",
            Action::PlayerADownRight => "player_a_down_right",
            Action::PlayerADownLeft => "player_a_down_left",
            Action::PlayerAUpFire => "player_a_up_fire",
            Action::PlayerARightFire => "player_a_right_fire",
            Action::PlayerALeftFire => "player_a_left_fire",
            Action::PlayerADownFire => "player_a_down_fire",
            Action::PlayerAUpRightFire => "player_a_up_right_fire",
            Action::PlayerAUpLeftFire => "player_a_up_left_fire",
            Action::PlayerADownRightFire => "player_a_down_right_fire",
            Action::PlayerADownLeftFire => "player_a_down_left_fire",
            Action::PlayerBNoop => "player_b_noop",
            Action::PlayerBFire => "player_b_fire",
            Action::PlayerBUp => "player_b_up",
            Action::PlayerBRight => "player_b_right",
            Action::PlayerBLeft => "player_b_left",
            Action::PlayerBDown => "player_b_down",
            Action::PlayerBUpRight => "player_b_up_right",
            Action::PlayerBUpLeft => "player_b_up_left",
            Action::PlayerBDownRight => "player_b_down_right",
            Action::PlayerBDownLeft => "player_b_down_left",
            Action::PlayerBUpFire => "player_b_up_fire",
            Action::PlayerBRightFire => "player_b_right_fire",
            Action::PlayerBLeftFire => "player_b_left_fire",
            Action::PlayerBDownFire => "player_b_down_fire",
            Action::PlayerBUpRightFire => "player_b_up_right_fire",
            Action::PlayerBUpLeftFire => "player_b_up_left_fire",
            Action::PlayerBDownRightFire => "player_b_down_right_fire",
            Action::PlayerBDownLeftFire => "player_b_down_left_fire",
            Action::Reset => "reset",
            Action::Undefined => "undefined",
            Action::Random => "random",
            Action::SaveState => "save_state",
            Action::LoadState => "load_state",
            Action::SystemReset => "system_reset",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for parsing an action from its canonical name.
#[derive(Debug, Clone, Error)]
#[error("unknown action name: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.name() == s)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}
