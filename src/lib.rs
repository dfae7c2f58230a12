//! # TaikoPresence
//!
//! Discord Rich Presence for rhythm-game clients, driven through the native
//! `discord-rpc` library.
//!
//! The native library does all of the talking to Discord. This crate owns the
//! session lifecycle, copies presence text into NUL-terminated buffers that
//! live exactly as long as each native call, and relays the library's
//! callbacks to a [`PresenceEvents`] receiver.
//!
//! ## Example
//!
//! Needs the `native` feature and the `discord-rpc` shared library at link
//! time, so it is not built as a doctest.
//!
//! ```ignore
//! use std::sync::Arc;
//! use taikopresence::{LogEvents, PresenceBuilder, PresenceConfig, PresenceSession};
//!
//! let mut session = PresenceSession::native(
//!     "your_client_id",
//!     PresenceConfig::for_version("1.5.8"),
//!     Arc::new(LogEvents),
//! )?;
//!
//! let update = PresenceBuilder::new()
//!     .details("Playing: Yoru ni Kakeru")
//!     .state("Oni")
//!     .start_timestamp_now()?
//!     .build();
//! session.update_presence(&update)?;
//!
//! // Once per frame
//! session.run_callbacks()?;
//!
//! session.shutdown();
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod ffi;
pub mod presence;
pub mod scratch;
pub mod session;
pub mod time;

// Re-export the main public API
pub use backend::PresenceBackend;
#[cfg(feature = "native")]
pub use backend::DiscordRpc;
pub use config::PresenceConfig;
pub use error::{ErrorCategory, PresenceError, Result};
pub use events::{LogEvents, PresenceEvents};
pub use presence::{PresenceBuilder, PresenceUpdate};
pub use scratch::{ScratchArena, ScratchHandle};
pub use session::PresenceSession;
pub use time::{unix_now, unix_now_string};
