//! Session lifecycle: one engine handle, one frame buffer, one loaded ROM

use std::ffi::CString;
use std::fmt;
use std::fs;
use std::path::Path;

use atari_rl_core::{Action, AtariError, Result, ScreenDim};
use tracing::{debug, info, trace, warn};

use crate::handle::AleHandle;

/// One playable session over the native engine.
///
/// Construction loads the ROM, queries the screen geometry, and sizes the
/// frame buffer; no half-initialized session is ever observable. The buffer
/// is allocated once and never resized — one ROM per session.
pub struct AtariSession {
    // Field order is load-bearing: the engine handle must be released
    // before the frame buffer it renders into, and Rust drops fields in
    // declaration order.
    handle: AleHandle,
    frame: Vec<u8>,
    dim: ScreenDim,
    steps: u64,
    episode: u32,
}

impl AtariSession {
    /// Load a ROM and open a session on it.
    ///
    /// Fails with [`AtariError::RomNotFound`] when `rom_path` does not name
    /// an existing file; the engine is only constructed after that check
    /// passes. The ROM load itself is a void foreign call with no success
    /// signal — the engine reports trouble only by crashing or by returning
    /// empty queries afterwards.
    pub fn new(rom_path: impl AsRef<Path>) -> Result<Self> {
        let rom_path = rom_path.as_ref();
        if !rom_path.is_file() {
            return Err(AtariError::RomNotFound { path: rom_path.to_path_buf() });
        }
        // A path that passed the existence check but cannot cross the C
        // boundary still cannot name a loadable ROM.
        let c_path = rom_path
            .to_str()
            .and_then(|p| CString::new(p).ok())
            .ok_or_else(|| AtariError::RomNotFound { path: rom_path.to_path_buf() })?;

        let handle = AleHandle::new();
        unsafe { ale_sys::loadROM(handle.as_ptr(), c_path.as_ptr()) };

        let dim = ScreenDim {
            width: unsafe { ale_sys::getScreenWidth(handle.as_ptr()) } as u32,
            height: unsafe { ale_sys::getScreenHeight(handle.as_ptr()) } as u32,
        };
        let frame = vec![0u8; dim.frame_len()];
        info!(
            rom = %rom_path.display(),
            width = dim.width,
            height = dim.height,
            "ROM loaded"
        );

        Ok(Self { handle, frame, dim, steps: 0, episode: 0 })
    }

    /// Apply one action and return the engine's reward for that step.
    ///
    /// No legality check happens here: the engine ignores actions outside
    /// the current ROM's legal set rather than rejecting them, and this
    /// wrapper passes them through unchanged.
    pub fn send(&mut self, action: Action) -> i32 {
        let reward = unsafe { ale_sys::act(self.handle.as_ptr(), action.code()) };
        self.steps += 1;
        trace!(action = %action, reward, step = self.steps, "step");
        reward
    }

    /// The legal action set for the loaded ROM, in engine order.
    ///
    /// Recomputed on every call, never cached. The destination buffer is
    /// sized from the engine-reported count, not a fixed upper bound. Codes
    /// the engine reports that this wrapper does not recognize are dropped
    /// rather than surfaced as errors — a deliberate lossy filter that keeps
    /// wrapper/engine version skew from becoming a hard failure. Every drop
    /// is logged, since a drop usually means exactly such a skew.
    pub fn legal_actions(&self) -> Vec<Action> {
        let count = unsafe { ale_sys::getLegalActionCount(self.handle.as_ptr()) };
        let mut codes = vec![0i32; count];
        let mut written: usize = 0;
        unsafe {
            ale_sys::getLegalActionSet(self.handle.as_ptr(), codes.as_mut_ptr(), &mut written)
        };
        // The fill call restates how many entries it wrote; trust it only to
        // shrink the read, never to grow it past our allocation.
        codes.truncate(written.min(count));

        let mut actions = Vec::with_capacity(codes.len());
        let mut dropped = 0usize;
        for code in codes {
            match Action::from_code(code) {
                Some(action) => actions.push(action),
                None => {
                    dropped += 1;
                    warn!(code, "dropping unrecognized legal action code");
                }
            }
        }
        if dropped > 0 {
            debug!(dropped, kept = actions.len(), "legal action set filtered");
        }
        actions
    }

    /// Whether the engine reports the current episode as finished.
    pub fn is_over(&self) -> bool {
        unsafe { ale_sys::game_over(self.handle.as_ptr()) != 0 }
    }

    /// Reset the current game to its initial state.
    ///
    /// Touches neither the handle nor the frame buffer — geometry is
    /// ROM-invariant. Whether the fresh episode is already terminal is the
    /// engine's call and is never overridden here.
    pub fn reset(&mut self) {
        unsafe { ale_sys::reset_game(self.handle.as_ptr()) };
        self.episode += 1;
        debug!(episode = self.episode, "game reset");
    }

    /// Screen geometry of the loaded ROM. Stable for the session's lifetime.
    pub fn screen_size(&self) -> ScreenDim {
        self.dim
    }

    /// Render the current frame and return an owned copy.
    ///
    /// The returned buffer is always exactly `width * height * 3` bytes:
    /// row-major RGB in the engine's channel order. A copy, never a view —
    /// the engine keeps rendering into the session-owned buffer.
    pub fn capture_frame(&mut self) -> Vec<u8> {
        unsafe { ale_sys::getScreenRGB(self.handle.as_ptr(), self.frame.as_mut_ptr()) };
        self.frame.clone()
    }

    /// Save the current frame as a PNG at `path`.
    ///
    /// Missing parent directories are created first; the PNG encoding
    /// itself is the engine's job. Fails with
    /// [`AtariError::CannotComputePath`] — before the engine is invoked —
    /// when the destination cannot be prepared or represented.
    pub fn save_frame(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| AtariError::CannotComputePath {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            }
        }
        let c_path = path
            .to_str()
            .and_then(|p| CString::new(p).ok())
            .ok_or_else(|| AtariError::CannotComputePath {
                path: path.to_path_buf(),
                reason: "path is not representable for the engine".into(),
            })?;
        unsafe { ale_sys::saveScreenPNG(self.handle.as_ptr(), c_path.as_ptr()) };
        trace!(path = %path.display(), "frame saved");
        Ok(())
    }

    /// Steps taken since the ROM was loaded, across resets.
    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    /// Completed resets. The first episode is index zero.
    pub fn episode(&self) -> u32 {
        self.episode
    }
}

impl fmt::Debug for AtariSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtariSession")
            .field("dim", &self.dim)
            .field("steps", &self.steps)
            .field("episode", &self.episode)
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, not(feature = "native")))]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // The stand-in engine's live-handle counter is process-global;
    // serialize every test that constructs sessions.
    static ENGINE_LOCK: Mutex<()> = Mutex::new(());

    fn rom_file(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("pong.bin");
        fs::write(&path, [0x4c, 0x00, 0xf0, 0x00]).unwrap();
        path
    }

    #[test]
    fn missing_rom_is_rejected_without_a_session() {
        let _guard = ENGINE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let before = ale_sys::live_handles();
        let err = AtariSession::new(dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, AtariError::RomNotFound { .. }));
        // Failed construction must not leave an engine instance behind.
        assert_eq!(ale_sys::live_handles(), before);
    }

    #[test]
    fn capture_length_matches_geometry() {
        let _guard = ENGINE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let mut session = AtariSession::new(rom_file(&dir)).unwrap();

        let dim = session.screen_size();
        assert_eq!(session.screen_size(), dim);
        let frame = session.capture_frame();
        assert_eq!(frame.len(), dim.frame_len());
    }

    #[test]
    fn legal_set_drops_unknown_codes() {
        let _guard = ENGINE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let session = AtariSession::new(rom_file(&dir)).unwrap();

        let actions = session.legal_actions();
        assert!(!actions.is_empty());
        // The stand-in reports one unassigned code; the filter drops exactly it.
        assert_eq!(actions.len(), ale_sys::MOCK_LEGAL_CODES.len() - 1);
        let mut seen = HashSet::new();
        for action in &actions {
            assert!(seen.insert(*action), "duplicate {action} in legal set");
        }
    }

    #[test]
    fn episode_runs_to_terminal_and_resets() {
        let _guard = ENGINE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let mut session = AtariSession::new(rom_file(&dir)).unwrap();

        let geometry = session.screen_size();
        let mut saw_non_black = false;
        let mut guard = 0u32;
        while !session.is_over() {
            session.send(Action::PlayerALeft);
            if session.capture_frame().iter().any(|&b| b != 0) {
                saw_non_black = true;
            }
            guard += 1;
            assert!(guard < 10_000, "episode never reached a terminal state");
        }
        assert!(saw_non_black, "every captured frame was uniformly black");

        session.reset();
        assert!(!session.is_over());
        assert_eq!(session.screen_size(), geometry);
        assert_eq!(session.episode(), 1);
    }

    #[test]
    fn construct_then_drop_releases_the_handle() {
        let _guard = ENGINE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let before = ale_sys::live_handles();
        let session = AtariSession::new(rom_file(&dir)).unwrap();
        assert_eq!(ale_sys::live_handles(), before + 1);
        drop(session);
        assert_eq!(ale_sys::live_handles(), before);
    }

    #[test]
    fn drop_after_capture_and_save_releases_cleanly() {
        let _guard = ENGINE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let before = ale_sys::live_handles();
        let mut session = AtariSession::new(rom_file(&dir)).unwrap();

        session.send(Action::PlayerAFire);
        let _ = session.capture_frame();
        let target = dir.path().join("frames").join("shot.png");
        session.save_frame(&target).unwrap();
        assert!(target.is_file(), "save_frame must create missing directories");

        drop(session);
        assert_eq!(ale_sys::live_handles(), before);
    }

    #[test]
    fn unrepresentable_save_path_fails_before_the_engine() {
        let _guard = ENGINE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let session = AtariSession::new(rom_file(&dir)).unwrap();

        let err = session.save_frame(dir.path().join("shot\0.png")).unwrap_err();
        assert!(matches!(err, AtariError::CannotComputePath { .. }));
    }

    #[test]
    fn send_passes_illegal_actions_through() {
        let _guard = ENGINE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = TempDir::new().unwrap();
        let mut session = AtariSession::new(rom_file(&dir)).unwrap();

        // SystemReset is outside the stand-in's legal set; the engine
        // accepts it anyway and the wrapper does not second-guess it.
        session.send(Action::SystemReset);
        assert_eq!(session.steps_taken(), 1);
    }
}
