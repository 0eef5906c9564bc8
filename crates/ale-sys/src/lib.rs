//! Raw bindings to the native ALE engine's exported C interface.
//!
//! Symbol names and signatures match the engine's C wrapper verbatim, hence
//! the camelCase. Every call is blocking and synchronous, and none of them
//! reports failure: absence of a crash is the only success signal the engine
//! offers. The safe session layer over these lives in `ale-bridge`.
//!
//! Without the `native` feature the extern block is replaced by an
//! in-process stand-in engine with identical signatures (see [`mock`]), so
//! dependent crates compile and test on hosts without the native library.

#![allow(non_snake_case)]

#[cfg(feature = "native")]
use libc::{c_char, c_int, size_t};

/// Opaque engine instance. Only ever handled behind a raw pointer; the
/// engine owns all state behind it.
#[repr(C)]
pub struct AleInterface {
    _opaque: [u8; 0],
}

#[cfg(feature = "native")]
unsafe extern "C" {
    /// Create a fresh engine instance. The engine allocates unconditionally
    /// and never returns null.
    pub fn initializeInterface() -> *mut AleInterface;

    /// Destroy an engine instance. Must be called exactly once per handle,
    /// and only after every buffer the engine renders into is out of use.
    pub fn deleteInterface(ale: *mut AleInterface);

    /// Load a ROM into the engine. Void call with no success signal.
    pub fn loadROM(ale: *mut AleInterface, rom_file: *const c_char);

    /// Apply one action by wire code and return the reward for that step.
    /// Codes outside the loaded ROM's legal set are ignored, not rejected.
    pub fn act(ale: *mut AleInterface, action: c_int) -> c_int;

    /// Non-zero while the current episode is in a terminal state.
    pub fn game_over(ale: *mut AleInterface) -> c_char;

    /// Reset the current game to its initial state. Does not reload the ROM.
    pub fn reset_game(ale: *mut AleInterface);

    /// Screen width in pixels for the loaded ROM.
    pub fn getScreenWidth(ale: *mut AleInterface) -> c_int;

    /// Screen height in pixels for the loaded ROM.
    pub fn getScreenHeight(ale: *mut AleInterface) -> c_int;

    /// Render the current frame as row-major RGB into `buffer`, which must
    /// hold at least `width * height * 3` bytes.
    pub fn getScreenRGB(ale: *mut AleInterface, buffer: *mut u8);

    /// Number of entries the next `getLegalActionSet` call will write for
    /// the loaded ROM. Callers size the destination from this, never from a
    /// fixed upper bound.
    pub fn getLegalActionCount(ale: *mut AleInterface) -> size_t;

    /// Fill `actions` with the legal wire codes for the loaded ROM and
    /// write the number of entries to `count`. `actions` must hold at least
    /// `getLegalActionCount` entries.
    pub fn getLegalActionSet(ale: *mut AleInterface, actions: *mut c_int, count: *mut size_t);

    /// Encode the current frame as a PNG at `path`. The engine does not
    /// create missing directories.
    pub fn saveScreenPNG(ale: *mut AleInterface, path: *const c_char);
}

#[cfg(not(feature = "native"))]
pub mod mock;
#[cfg(not(feature = "native"))]
pub use mock::*;
