//! Deterministic in-process stand-in for the native engine.
//!
//! Mirrors the C surface exactly, so the safe layer compiles unchanged
//! against it: fixed 160x210 geometry, non-black frames that change with
//! every step, a terminal flag after [`MOCK_EPISODE_LEN`] steps, and a legal
//! set containing one deliberately unassigned code so callers' drop filters
//! get exercised. A live-handle counter makes release-ordering defects
//! observable from tests.

use libc::{c_char, c_int, size_t};
use std::ffi::CStr;
use std::fs;
use std::slice;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::AleInterface;

/// Screen width reported for every "ROM".
pub const MOCK_WIDTH: c_int = 160;
/// Screen height reported for every "ROM".
pub const MOCK_HEIGHT: c_int = 210;
/// Steps until the episode reports terminal.
pub const MOCK_EPISODE_LEN: u32 = 96;
/// Wire codes in the reported legal set: the full player A range plus one
/// unassigned code (99) that wrappers are expected to drop.
pub const MOCK_LEGAL_CODES: [c_int; 19] =
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 99];

static LIVE_HANDLES: AtomicUsize = AtomicUsize::new(0);

/// Engine handles created and not yet deleted. Test hook for
/// release-ordering assertions; counts across the whole process.
pub fn live_handles() -> usize {
    LIVE_HANDLES.load(Ordering::SeqCst)
}

struct MockEngine {
    steps: u32,
}

fn engine<'a>(ale: *mut AleInterface) -> &'a mut MockEngine {
    unsafe { &mut *(ale as *mut MockEngine) }
}

pub unsafe extern "C" fn initializeInterface() -> *mut AleInterface {
    LIVE_HANDLES.fetch_add(1, Ordering::SeqCst);
    Box::into_raw(Box::new(MockEngine { steps: 0 })) as *mut AleInterface
}

pub unsafe extern "C" fn deleteInterface(ale: *mut AleInterface) {
    LIVE_HANDLES.fetch_sub(1, Ordering::SeqCst);
    drop(unsafe { Box::from_raw(ale as *mut MockEngine) });
}

pub unsafe extern "C" fn loadROM(ale: *mut AleInterface, rom_file: *const c_char) {
    // The stand-in accepts any ROM path; it only dereferences the string.
    let _rom = unsafe { CStr::from_ptr(rom_file) };
    engine(ale).steps = 0;
}

pub unsafe extern "C" fn act(ale: *mut AleInterface, action: c_int) -> c_int {
    let engine = engine(ale);
    engine.steps += 1;
    // Unassigned codes are accepted and ignored, like the real engine.
    if action != 0 && engine.steps % 8 == 0 { 1 } else { 0 }
}

pub unsafe extern "C" fn game_over(ale: *mut AleInterface) -> c_char {
    (engine(ale).steps >= MOCK_EPISODE_LEN) as c_char
}

pub unsafe extern "C" fn reset_game(ale: *mut AleInterface) {
    engine(ale).steps = 0;
}

pub unsafe extern "C" fn getScreenWidth(_ale: *mut AleInterface) -> c_int {
    MOCK_WIDTH
}

pub unsafe extern "C" fn getScreenHeight(_ale: *mut AleInterface) -> c_int {
    MOCK_HEIGHT
}

pub unsafe extern "C" fn getScreenRGB(ale: *mut AleInterface, buffer: *mut u8) {
    let steps = engine(ale).steps;
    let len = (MOCK_WIDTH * MOCK_HEIGHT) as usize * 3;
    let out = unsafe { slice::from_raw_parts_mut(buffer, len) };
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = ((i as u32).wrapping_add(steps) % 251) as u8 + 1;
    }
}

pub unsafe extern "C" fn getLegalActionCount(_ale: *mut AleInterface) -> size_t {
    MOCK_LEGAL_CODES.len() as size_t
}

pub unsafe extern "C" fn getLegalActionSet(
    _ale: *mut AleInterface,
    actions: *mut c_int,
    count: *mut size_t,
) {
    let out = unsafe { slice::from_raw_parts_mut(actions, MOCK_LEGAL_CODES.len()) };
    out.copy_from_slice(&MOCK_LEGAL_CODES);
    unsafe { *count = MOCK_LEGAL_CODES.len() as size_t };
}

pub unsafe extern "C" fn saveScreenPNG(_ale: *mut AleInterface, path: *const c_char) {
    let path = unsafe { CStr::from_ptr(path) }.to_string_lossy().into_owned();
    // Just the eight-byte PNG signature; enough for callers to see the file.
    let _ = fs::write(path, b"\x89PNG\r\n\x1a\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::sync::Mutex;

    // The live-handle counter is process-global; serialize tests that touch it.
    static COUNTER_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn handle_lifecycle_is_counted() {
        let _guard = COUNTER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = live_handles();
        let ale = unsafe { initializeInterface() };
        assert_eq!(live_handles(), before + 1);
        unsafe { deleteInterface(ale) };
        assert_eq!(live_handles(), before);
    }

    #[test]
    fn episode_terminates_and_resets() {
        let _guard = COUNTER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let ale = unsafe { initializeInterface() };
        let rom = CString::new("pong.bin").unwrap();
        unsafe { loadROM(ale, rom.as_ptr()) };

        assert_eq!(unsafe { game_over(ale) }, 0);
        for _ in 0..MOCK_EPISODE_LEN {
            unsafe { act(ale, 4) };
        }
        assert_ne!(unsafe { game_over(ale) }, 0);

        unsafe { reset_game(ale) };
        assert_eq!(unsafe { game_over(ale) }, 0);

        unsafe { deleteInterface(ale) };
    }

    #[test]
    fn legal_set_reports_declared_codes() {
        let _guard = COUNTER_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let ale = unsafe { initializeInterface() };
        let n = unsafe { getLegalActionCount(ale) };
        assert_eq!(n, MOCK_LEGAL_CODES.len());

        let mut codes = vec![0 as c_int; n];
        let mut written: size_t = 0;
        unsafe { getLegalActionSet(ale, codes.as_mut_ptr(), &mut written) };
        assert_eq!(written, n);
        assert_eq!(codes, MOCK_LEGAL_CODES);

        unsafe { deleteInterface(ale) };
    }
}
