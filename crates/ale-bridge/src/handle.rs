//! RAII ownership of the opaque engine handle

use ale_sys::AleInterface;
use std::ptr::NonNull;
use tracing::trace;

/// Exclusively-owned native engine instance.
///
/// Exactly one per session; released exactly once, on drop. The raw pointer
/// keeps this type (and everything embedding it) out of `Send`/`Sync`.
pub(crate) struct AleHandle {
    ptr: NonNull<AleInterface>,
}

impl AleHandle {
    /// Construct a fresh engine instance.
    pub(crate) fn new() -> Self {
        // The engine allocates unconditionally; null here is a defect in the
        // engine build, not a recoverable condition.
        let raw = unsafe { ale_sys::initializeInterface() };
        let ptr = NonNull::new(raw).expect("engine returned a null interface");
        Self { ptr }
    }

    pub(crate) fn as_ptr(&self) -> *mut AleInterface {
        self.ptr.as_ptr()
    }
}

impl Drop for AleHandle {
    fn drop(&mut self) {
        trace!("releasing engine handle");
        unsafe { ale_sys::deleteInterface(self.ptr.as_ptr()) };
    }
}
