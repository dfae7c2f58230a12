use log::debug;

/// Receiver for the diagnostics the native library reports
///
/// The native library delivers these from inside
/// [`PresenceSession::run_callbacks`](crate::PresenceSession::run_callbacks).
/// `message` borrows native memory and is only valid for the call.
pub trait PresenceEvents: Send + Sync {
    /// The library finished its handshake with the Discord client
    fn on_ready(&self);

    /// The connection to the Discord client was lost
    fn on_disconnected(&self, code: i32, message: &str);

    /// The Discord client reported an error
    fn on_error(&self, code: i32, message: &str);
}

/// Events that only write to the `log` facade
///
/// The trampolines already log every report at its own level on receipt;
/// this receiver adds a debug line for hosts that want no other handling.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEvents;

impl PresenceEvents for LogEvents {
    fn on_ready(&self) {
        debug!("[Discord] ready event");
    }

    fn on_disconnected(&self, code: i32, message: &str) {
        debug!("[Discord] disconnected event: {} {}", code, message);
    }

    fn on_error(&self, code: i32, message: &str) {
        debug!("[Discord] error event: {} {}", code, message);
    }
}
