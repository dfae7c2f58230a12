//! Trampolines from native callbacks to [`PresenceEvents`]
//!
//! `discord-rpc` callbacks carry no user data pointer, so the receiver lives in
//! a process-wide slot. The native library only runs one session at a time,
//! which makes a single slot sufficient.

use std::borrow::Cow;
use std::ffi::{c_char, c_int, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, error, info, warn};

use super::{DiscordEventHandlers, DiscordUser};
use crate::events::PresenceEvents;

static HANDLER: Mutex<Option<Arc<dyn PresenceEvents>>> = Mutex::new(None);

/// Make `events` the receiver of every trampoline
pub fn install(events: Arc<dyn PresenceEvents>) {
    *HANDLER.lock().unwrap_or_else(PoisonError::into_inner) = Some(events);
}

/// Drop the current receiver; later callbacks are only logged
pub fn uninstall() {
    HANDLER.lock().unwrap_or_else(PoisonError::into_inner).take();
}

/// Handler record pointing at the trampolines in this module
pub fn event_handlers() -> DiscordEventHandlers {
    DiscordEventHandlers {
        ready: Some(ready),
        disconnected: Some(disconnected),
        errored: Some(errored),
        ..DiscordEventHandlers::default()
    }
}

fn dispatch(kind: &str, deliver: impl FnOnce(&dyn PresenceEvents)) {
    // Clone out of the lock so a handler may call `install` itself.
    let handler = HANDLER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();

    let Some(handler) = handler else {
        debug!("[Discord] No handler installed for {} callback", kind);
        return;
    };

    // Unwinding into C is undefined behaviour.
    if panic::catch_unwind(AssertUnwindSafe(|| deliver(handler.as_ref()))).is_err() {
        error!("[Discord] {} handler panicked", kind);
    }
}

/// # Safety
///
/// `ptr` must be null or point at a NUL-terminated string that outlives `'a`.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        Cow::Borrowed("")
    } else {
        CStr::from_ptr(ptr).to_string_lossy()
    }
}

/// # Safety
///
/// Called by `discord-rpc` with a null or valid `DiscordUser`.
pub unsafe extern "C" fn ready(user: *const DiscordUser) {
    if let Some(user) = user.as_ref() {
        debug!(
            "[Discord] Connected as {} ({})",
            borrow_str(user.username),
            borrow_str(user.userId)
        );
    }
    info!("[Discord] Ready.");
    dispatch("ready", |events| events.on_ready());
}

/// # Safety
///
/// Called by `discord-rpc` with a null or NUL-terminated `message`.
pub unsafe extern "C" fn disconnected(error_code: c_int, message: *const c_char) {
    let message = borrow_str(message);
    warn!("[Discord] Disconnected: {} {}", error_code, message);
    dispatch("disconnected", |events| {
        events.on_disconnected(error_code, &message)
    });
}

/// # Safety
///
/// Called by `discord-rpc` with a null or NUL-terminated `message`.
pub unsafe extern "C" fn errored(error_code: c_int, message: *const c_char) {
    let message = borrow_str(message);
    error!("[Discord] Error occurred: {} {}", error_code, message);
    dispatch("error", |events| events.on_error(error_code, &message));
}
