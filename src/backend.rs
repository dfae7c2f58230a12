//! The seam between [`PresenceSession`](crate::PresenceSession) and the
//! library that actually talks to Discord

use std::ffi::CStr;
use std::sync::Arc;

use crate::events::PresenceEvents;
use crate::ffi::DiscordRichPresence;

/// The six operations of the native presence library
///
/// Every call is synchronous. Pointers inside a [`DiscordRichPresence`] are
/// only valid until `update_presence` returns.
pub trait PresenceBackend {
    fn initialize(
        &mut self,
        application_id: &CStr,
        events: Arc<dyn PresenceEvents>,
        auto_register: bool,
        steam_id: Option<&CStr>,
    );

    fn shutdown(&mut self);

    /// Deliver queued events to the registered [`PresenceEvents`]
    fn run_callbacks(&mut self);

    fn update_presence(&mut self, presence: &DiscordRichPresence);

    fn clear_presence(&mut self);

    fn update_handlers(&mut self, events: Arc<dyn PresenceEvents>);
}

#[cfg(feature = "native")]
pub use native::DiscordRpc;

#[cfg(feature = "native")]
mod native {
    use std::ffi::{c_int, CStr};
    use std::ptr;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::PresenceBackend;
    use crate::error::{PresenceError, Result};
    use crate::events::PresenceEvents;
    use crate::ffi::{self, callbacks, DiscordRichPresence};

    static SESSION_LIVE: AtomicBool = AtomicBool::new(false);

    /// Binding to the linked `discord-rpc` library
    ///
    /// The library keeps one session per process, so only one `DiscordRpc`
    /// may exist at a time.
    #[derive(Debug)]
    pub struct DiscordRpc {
        _private: (),
    }

    impl DiscordRpc {
        /// Claim the process-wide native session
        ///
        /// # Errors
        ///
        /// Returns [`PresenceError::AlreadyInitialized`] while another
        /// `DiscordRpc` is alive.
        pub fn acquire() -> Result<Self> {
            if SESSION_LIVE.swap(true, Ordering::AcqRel) {
                return Err(PresenceError::AlreadyInitialized);
            }
            Ok(Self { _private: () })
        }
    }

    impl Drop for DiscordRpc {
        fn drop(&mut self) {
            SESSION_LIVE.store(false, Ordering::Release);
        }
    }

    impl PresenceBackend for DiscordRpc {
        fn initialize(
            &mut self,
            application_id: &CStr,
            events: Arc<dyn PresenceEvents>,
            auto_register: bool,
            steam_id: Option<&CStr>,
        ) {
            callbacks::install(events);
            let handlers = callbacks::event_handlers();
            let steam_id = steam_id.map_or(ptr::null(), CStr::as_ptr);

            // SAFETY: every pointer is valid for the call; the library copies
            // the handler record and both strings.
            unsafe {
                ffi::Discord_Initialize(
                    application_id.as_ptr(),
                    &handlers,
                    c_int::from(auto_register),
                    steam_id,
                );
            }
        }

        fn shutdown(&mut self) {
            // SAFETY: no arguments; the library tolerates an idle session.
            unsafe { ffi::Discord_Shutdown() };
            callbacks::uninstall();
        }

        fn run_callbacks(&mut self) {
            // SAFETY: trampolines are installed before initialize.
            unsafe { ffi::Discord_RunCallbacks() };
        }

        fn update_presence(&mut self, presence: &DiscordRichPresence) {
            // SAFETY: the caller keeps every string alive for this call.
            unsafe { ffi::Discord_UpdatePresence(presence) };
        }

        fn clear_presence(&mut self) {
            // SAFETY: no arguments.
            unsafe { ffi::Discord_ClearPresence() };
        }

        fn update_handlers(&mut self, events: Arc<dyn PresenceEvents>) {
            callbacks::install(events);
            let handlers = callbacks::event_handlers();
            // SAFETY: the library copies the record.
            unsafe { ffi::Discord_UpdateHandlers(&handlers) };
        }
    }
}
