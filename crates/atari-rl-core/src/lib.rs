//! # atari-rl-core
//!
//! Core types for the Atari-RL session wrapper:
//! - The controller/meta action enumeration and its engine wire codes
//! - Screen geometry
//! - Error types

pub mod action;
pub mod error;
pub mod screen;

pub use action::{Action, ParseActionError};
pub use error::{AtariError, Result};
pub use screen::{RGB_BYTES_PER_PIXEL, ScreenDim};
