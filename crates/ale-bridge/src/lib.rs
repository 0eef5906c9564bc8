//! Safe single-session bridge to the native ALE engine
//!
//! One [`AtariSession`] owns one engine handle and one frame buffer for one
//! loaded ROM. Every operation is a blocking, synchronous foreign call with
//! no cancellation and no timeout; an engine stall or crash is fatal to the
//! process, not something this layer recovers from. The raw engine pointer
//! keeps sessions out of `Send`/`Sync` — callers wanting parallel games
//! open independent sessions.

mod handle;
mod session;

pub use session::AtariSession;
